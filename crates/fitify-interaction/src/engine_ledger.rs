//! [`CreditLedger`] backed by the engine's user stats endpoint.

use crate::engine_client::EngineClient;
use async_trait::async_trait;
use fitify_core::ledger::CreditLedger;
use fitify_core::{FitifyError, Result};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct UserStats {
    current_coins: i64,
}

impl UserStats {
    /// A negative balance reads as zero.
    fn balance(&self) -> u64 {
        u64::try_from(self.current_coins).unwrap_or(0)
    }
}

#[derive(Clone)]
pub struct EngineLedger {
    client: EngineClient,
}

impl EngineLedger {
    pub fn new(client: EngineClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CreditLedger for EngineLedger {
    async fn get_balance(&self) -> Result<u64> {
        let user_id = self
            .client
            .user_id()
            .ok_or_else(|| FitifyError::config("engine.user_id is not set"))?;
        let stats: UserStats = self.client.get_json(&format!("users/{user_id}/stats")).await?;
        debug!(user_id, coins = stats.current_coins, "Fetched balance");
        Ok(stats.balance())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitify_core::config::EngineSettings;

    #[test]
    fn test_stats_parsing() {
        let stats: UserStats =
            serde_json::from_str(r#"{"current_coins": 12, "total_spent": 40}"#).unwrap();
        assert_eq!(stats.balance(), 12);

        let stats: UserStats = serde_json::from_str(r#"{"current_coins": -2}"#).unwrap();
        assert_eq!(stats.balance(), 0);
    }

    #[tokio::test]
    async fn test_missing_user_id_is_a_config_error() {
        let client = EngineClient::new(&EngineSettings::default()).unwrap();
        let err = EngineLedger::new(client).get_balance().await.unwrap_err();
        assert!(err.is_config());
    }
}
