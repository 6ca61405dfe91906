//! [`Generator`] backed by the engine's `/generate/*` endpoints.

use crate::engine_client::{EngineClient, encode_image};
use async_trait::async_trait;
use fitify_core::generator::{GenerationError, Generator};
use fitify_core::image::ImageRef;
use fitify_core::pose::Pose;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Serialize)]
struct ModelRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<u64>,
    image: String,
}

#[derive(Serialize)]
struct TryOnRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<u64>,
    model_image: String,
    garment_image: String,
}

#[derive(Serialize)]
struct PoseRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<u64>,
    image: String,
    pose_instruction: &'a str,
}

#[derive(Deserialize)]
struct ImageResponse {
    image_url: String,
}

impl ImageResponse {
    fn into_image(self) -> Result<ImageRef, GenerationError> {
        if self.image_url.trim().is_empty() {
            return Err(GenerationError::generic("Engine returned no image"));
        }
        Ok(ImageRef::new(self.image_url))
    }
}

/// Calls the generation engine over HTTP.
///
/// The engine debits the user's credit for every successful call.
#[derive(Clone)]
pub struct EngineGenerator {
    client: EngineClient,
}

impl EngineGenerator {
    pub fn new(client: EngineClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Generator for EngineGenerator {
    async fn transform(&self, raw_image: &ImageRef) -> Result<ImageRef, GenerationError> {
        let body = ModelRequest {
            user_id: self.client.user_id(),
            image: encode_image(raw_image).await?,
        };
        let response: ImageResponse = self.client.post_json("generate/model", &body).await?;
        info!("Engine produced model image");
        response.into_image()
    }

    async fn apply_garment(
        &self,
        base_image: &ImageRef,
        garment_image: &ImageRef,
    ) -> Result<ImageRef, GenerationError> {
        let body = TryOnRequest {
            user_id: self.client.user_id(),
            model_image: encode_image(base_image).await?,
            garment_image: encode_image(garment_image).await?,
        };
        let response: ImageResponse = self.client.post_json("generate/try-on", &body).await?;
        response.into_image()
    }

    async fn change_pose(
        &self,
        base_image: &ImageRef,
        pose: &Pose,
    ) -> Result<ImageRef, GenerationError> {
        let body = PoseRequest {
            user_id: self.client.user_id(),
            image: encode_image(base_image).await?,
            pose_instruction: pose.instruction(),
        };
        let response: ImageResponse = self.client.post_json("generate/pose", &body).await?;
        response.into_image()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_bodies() {
        let body = TryOnRequest {
            user_id: None,
            model_image: "https://a".into(),
            garment_image: "https://b".into(),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"model_image": "https://a", "garment_image": "https://b"})
        );

        let body = PoseRequest {
            user_id: Some(3),
            image: "https://a".into(),
            pose_instruction: "Side profile view",
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"user_id": 3, "image": "https://a", "pose_instruction": "Side profile view"})
        );
    }

    #[test]
    fn test_empty_image_url_is_an_error() {
        let response: ImageResponse = serde_json::from_str(r#"{"image_url": ""}"#).unwrap();
        assert!(response.into_image().is_err());

        let response: ImageResponse =
            serde_json::from_str(r#"{"image_url": "https://cdn/x.png", "extra": 1}"#).unwrap();
        assert_eq!(response.into_image().unwrap().as_str(), "https://cdn/x.png");
    }
}
