use super::compensation::PoseSelection;
use super::flight::{FlightSlot, PendingRequest, RequestKind};
use super::notifier::{NoopNotifier, SessionNotifier};
use super::outcome::{DispatchError, DispatchOutcome, RejectReason, friendly_message};
use super::state::SessionState;
use fitify_core::cache::{CacheKey, GenerationCache, GenerationRepository, NewGeneratedImage};
use fitify_core::config::TryOnConfig;
use fitify_core::garment::{GarmentRef, GarmentUpload, Wardrobe, default_wardrobe};
use fitify_core::generator::{GenerationError, Generator};
use fitify_core::image::{self, ImageRef, SourceImage};
use fitify_core::ledger::CreditLedger;
use fitify_core::pose::{Pose, PoseCatalog};
use fitify_core::timeline::Layer;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

/// Turns user actions into timeline updates, cache hits or generator calls.
///
/// The dispatcher owns the session state and the generation cache; nothing
/// else mutates them. At most one generation is in flight: every action
/// checks the flight slot under the state write lock, and a generation claims
/// the slot before that lock is released, so a completion can never land on a
/// cursor another action has moved.
pub struct GenerationDispatcher {
    generator: Arc<dyn Generator>,
    ledger: Arc<dyn CreditLedger>,
    history: Option<Arc<dyn GenerationRepository>>,
    notifier: Arc<dyn SessionNotifier>,
    poses: PoseCatalog,
    default_wardrobe: Wardrobe,
    cache: Mutex<GenerationCache>,
    state: RwLock<SessionState>,
    flight: FlightSlot,
}

impl GenerationDispatcher {
    /// Creates a dispatcher with an empty wardrobe, no history and no notifier.
    pub fn new(
        generator: Arc<dyn Generator>,
        ledger: Arc<dyn CreditLedger>,
        poses: PoseCatalog,
        cache: GenerationCache,
    ) -> Self {
        Self {
            generator,
            ledger,
            history: None,
            notifier: Arc::new(NoopNotifier),
            poses,
            default_wardrobe: Wardrobe::default(),
            cache: Mutex::new(cache),
            state: RwLock::new(SessionState::new(Wardrobe::default())),
            flight: FlightSlot::default(),
        }
    }

    /// Creates a dispatcher with the poses, cache capacity and default
    /// wardrobe from `config`.
    pub fn from_config(
        config: &TryOnConfig,
        generator: Arc<dyn Generator>,
        ledger: Arc<dyn CreditLedger>,
    ) -> fitify_core::Result<Self> {
        let poses = config.pose_catalog()?;
        let cache = GenerationCache::new(config.cache_capacity());
        Ok(Self::new(generator, ledger, poses, cache)
            .with_default_wardrobe(default_wardrobe(&config.wardrobe.media_url)))
    }

    /// Persists every successful generation to `history`.
    pub fn with_history(mut self, history: Arc<dyn GenerationRepository>) -> Self {
        self.history = Some(history);
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn SessionNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Sets the wardrobe a session starts (and restarts) with.
    pub fn with_default_wardrobe(mut self, wardrobe: Wardrobe) -> Self {
        self.state.get_mut().wardrobe = wardrobe.clone();
        self.default_wardrobe = wardrobe;
        self
    }

    pub fn poses(&self) -> &PoseCatalog {
        &self.poses
    }

    // ============================================================================
    // Session lifecycle
    // ============================================================================

    /// Fills the cache from the persisted history.
    ///
    /// Returns the number of records replayed.
    pub async fn restore_cache(&self) -> fitify_core::Result<usize> {
        let Some(history) = &self.history else {
            return Ok(0);
        };
        let records = history.load_all().await?;
        let count = records.len();
        let mut cache = self.cache.lock().await;
        for record in records {
            let key = record.cache_key();
            cache.store(key, record.generated_image);
        }
        info!("Restored {} cached generations", count);
        Ok(count)
    }

    /// Accepts `source` as the model as-is, without transforming it.
    pub async fn finalize_model(&self, source: SourceImage) -> DispatchOutcome {
        let mut state = self.state.write().await;
        if !self.flight.is_idle() {
            return DispatchOutcome::Rejected(RejectReason::Busy);
        }
        debug!(identity = %source.identity, "Model finalized");
        state.finalize(self.poses.clone(), source);
        DispatchOutcome::ModelReady
    }

    /// Validates the uploaded photo's type, then accepts it as the model.
    pub async fn finalize_upload(
        &self,
        file_name: &str,
        mime_type: Option<&str>,
        source: SourceImage,
    ) -> Result<DispatchOutcome, DispatchError> {
        if let Err(err) = image::ensure_image(file_name, mime_type) {
            let err = DispatchError::from(err);
            self.notifier.error(&err.to_string());
            return Err(err);
        }
        Ok(self.finalize_model(source).await)
    }

    /// Clears the model, history and pose, and restores the default wardrobe.
    ///
    /// Refused while a generation is pending, since its completion would land
    /// in the fresh session.
    pub async fn start_over(&self) -> DispatchOutcome {
        let mut state = self.state.write().await;
        if !self.flight.is_idle() {
            return DispatchOutcome::Rejected(RejectReason::Busy);
        }
        state.reset(self.default_wardrobe.clone());
        self.notifier.error_cleared();
        info!("Session reset");
        DispatchOutcome::SessionReset
    }

    /// Runs the initial transform of the uploaded photo into a model image.
    pub async fn transform_model(&self) -> Result<DispatchOutcome, DispatchError> {
        let key;
        let original;
        let mut guard = {
            let mut state = self.state.write().await;
            if !self.flight.is_idle() {
                return Ok(DispatchOutcome::Rejected(RejectReason::Busy));
            }
            let Some(source) = state.original.clone() else {
                return Ok(DispatchOutcome::Rejected(RejectReason::NoModel));
            };
            if state.model_transformed {
                return Ok(DispatchOutcome::Rejected(RejectReason::AlreadyTransformed));
            }

            key = CacheKey::transform(source.identity);
            if let Some(cached) = self.cache.lock().await.lookup(&key) {
                debug!(%key, "Transform served from cache");
                state.seed_transformed(self.poses.clone(), cached);
                return Ok(DispatchOutcome::CacheHit);
            }

            original = source;
            match self.flight.try_begin(PendingRequest {
                kind: RequestKind::InitialTransform,
                key: key.clone(),
            }) {
                Some(guard) => guard,
                None => return Ok(DispatchOutcome::Rejected(RejectReason::Busy)),
            }
        };

        if let Ok(0) = self.read_balance().await {
            info!("Transform refused: no credit left");
            self.notifier.credit_prompt(Some(0));
            return Err(DispatchError::InsufficientCredit {
                message: friendly_message("Failed to transform image", "No credit left"),
            });
        }

        self.notifier.error_cleared();
        guard.show_loading(self.notifier.as_ref(), "Creating your AI model...");

        match self.generator.transform(&original.image).await {
            Ok(model) => {
                self.cache.lock().await.store(key, model.clone());
                self.state
                    .write()
                    .await
                    .seed_transformed(self.poses.clone(), model.clone());
                self.record_history(NewGeneratedImage {
                    base_identity: original.identity,
                    model_image: original.image.clone(),
                    garment_id: None,
                    garment_name: None,
                    generated_image: model,
                    pose: None,
                })
                .await;
                self.refresh_balance().await;
                info!(identity = %original.identity, "Model transformed");
                Ok(DispatchOutcome::Generated)
            }
            Err(err) => Err(self.fail("Failed to transform image", err).await),
        }
    }

    // ============================================================================
    // Garments
    // ============================================================================

    /// Validates an uploaded garment file, then applies it.
    pub async fn apply_upload(
        &self,
        upload: GarmentUpload,
    ) -> Result<DispatchOutcome, DispatchError> {
        match upload.into_garment() {
            Ok(garment) => self.apply_garment(garment).await,
            Err(err) => {
                let err = DispatchError::from(err);
                self.notifier.error(&err.to_string());
                Err(err)
            }
        }
    }

    /// Puts `garment` on top of the current outfit.
    ///
    /// Tried in order: re-entering the undone layer for the same garment, the
    /// cache, and finally the generator.
    pub async fn apply_garment(
        &self,
        garment: GarmentRef,
    ) -> Result<DispatchOutcome, DispatchError> {
        let pose;
        let key;
        let display_image;
        let base_identity;
        let mut guard = {
            let mut state = self.state.write().await;
            if !self.flight.is_idle() {
                return Ok(DispatchOutcome::Rejected(RejectReason::Busy));
            }
            let pose_index = state.pose_index;
            let Some(identity) = state.original.as_ref().map(|o| o.identity) else {
                return Ok(DispatchOutcome::Rejected(RejectReason::NoModel));
            };
            let Some(timeline) = state.timeline.as_mut() else {
                return Ok(DispatchOutcome::Rejected(RejectReason::NoModel));
            };

            let redo = timeline.peek_next_layer().and_then(Layer::garment_id)
                == Some(garment.id.as_str());
            if redo && timeline.step_forward() {
                debug!(garment = %garment.id, "Re-entered undone layer");
                state.pose_index = 0;
                return Ok(DispatchOutcome::BranchReused);
            }

            let current_pose = self
                .poses
                .get(pose_index)
                .unwrap_or_else(|| self.poses.default_pose())
                .clone();
            let cache_key = CacheKey::garment(identity, &garment.id, &current_pose);
            if let Some(cached) = self.cache.lock().await.lookup(&cache_key) {
                debug!(key = %cache_key, "Garment served from cache");
                timeline.append_layer(Layer::with_garment(garment, current_pose, cached));
                state.pose_index = 0;
                return Ok(DispatchOutcome::CacheHit);
            }

            display_image = timeline.display_image(pose_index).clone();
            base_identity = identity;
            pose = current_pose;
            key = cache_key;
            match self.flight.try_begin(PendingRequest {
                kind: RequestKind::ApplyGarment,
                key: key.clone(),
            }) {
                Some(guard) => guard,
                None => return Ok(DispatchOutcome::Rejected(RejectReason::Busy)),
            }
        };

        self.notifier.error_cleared();
        guard.show_loading(
            self.notifier.as_ref(),
            &format!("Adding {}...", garment.display_name),
        );
        info!(garment = %garment.id, pose = %pose, "Generating garment layer");

        let result = self
            .generator
            .apply_garment(&display_image, &garment.source_locator)
            .await;

        match result {
            Ok(image) => {
                self.cache.lock().await.store(key, image.clone());
                {
                    let mut state = self.state.write().await;
                    match state.timeline.as_mut() {
                        Some(timeline) => timeline.append_layer(Layer::with_garment(
                            garment.clone(),
                            pose.clone(),
                            image.clone(),
                        )),
                        None => warn!("Timeline vanished while a garment was generating"),
                    }
                    if state.wardrobe.add_if_absent(garment.clone()) {
                        debug!(garment = %garment.id, "Added garment to wardrobe");
                    }
                }
                self.record_history(NewGeneratedImage {
                    base_identity,
                    model_image: display_image,
                    garment_id: Some(garment.id.clone()),
                    garment_name: Some(garment.display_name.clone()),
                    generated_image: image,
                    pose: Some(pose),
                })
                .await;
                self.refresh_balance().await;
                Ok(DispatchOutcome::Generated)
            }
            Err(err) => Err(self.fail("Failed to apply garment", err).await),
        }
    }

    /// Takes off the top garment by moving the cursor back.
    ///
    /// The layer stays in history so re-applying the same garment is free.
    pub async fn remove_last_garment(&self) -> DispatchOutcome {
        let mut state = self.state.write().await;
        if !self.flight.is_idle() {
            return DispatchOutcome::Rejected(RejectReason::Busy);
        }
        let Some(timeline) = state.timeline.as_mut() else {
            return DispatchOutcome::Rejected(RejectReason::NoModel);
        };
        if !timeline.step_back() {
            return DispatchOutcome::Rejected(RejectReason::NothingToRemove);
        }
        state.pose_index = 0;
        DispatchOutcome::GarmentRemoved
    }

    // ============================================================================
    // Poses
    // ============================================================================

    /// Switches the current layer to the pose at `index`, generating it if
    /// needed.
    pub async fn select_pose(&self, index: usize) -> Result<DispatchOutcome, DispatchError> {
        let pose;
        let base_image;
        let cursor;
        let selection;
        let mut guard = {
            let mut state = self.state.write().await;
            if !self.flight.is_idle() {
                return Ok(DispatchOutcome::Rejected(RejectReason::Busy));
            }
            let Some(timeline) = state.timeline.as_ref() else {
                return Ok(DispatchOutcome::Rejected(RejectReason::NoModel));
            };
            if index == state.pose_index {
                return Ok(DispatchOutcome::Rejected(RejectReason::SamePose));
            }
            let Some(requested) = self.poses.get(index).cloned() else {
                let err = DispatchError::InvalidInput(format!("Unknown pose index {index}"));
                self.notifier.error(&err.to_string());
                return Err(err);
            };

            let layer = timeline.current_layer();
            if layer.image_for(&requested).is_some() {
                state.pose_index = index;
                return Ok(DispatchOutcome::PoseSwitched);
            }
            let Some(base) = layer.any_image().cloned() else {
                return Ok(DispatchOutcome::Rejected(RejectReason::NoModel));
            };
            let Some(identity) = state.original.as_ref().map(|o| o.identity) else {
                return Ok(DispatchOutcome::Rejected(RejectReason::NoModel));
            };

            let key = CacheKey::new(identity, layer.garment_id(), Some(&requested));
            cursor = timeline.cursor();
            let guard = match self.flight.try_begin(PendingRequest {
                kind: RequestKind::ChangePose,
                key,
            }) {
                Some(guard) => guard,
                None => return Ok(DispatchOutcome::Rejected(RejectReason::Busy)),
            };
            selection = PoseSelection::apply(&mut state, index);
            pose = requested;
            base_image = base;
            guard
        };

        self.notifier.error_cleared();
        guard.show_loading(self.notifier.as_ref(), "Changing pose...");
        info!(pose = %pose, "Generating pose");

        match self.generator.change_pose(&base_image, &pose).await {
            Ok(image) => {
                selection.commit();
                self.record_pose(cursor, pose, image).await;
                self.refresh_balance().await;
                Ok(DispatchOutcome::PoseGenerated)
            }
            Err(err) => {
                selection.revert(&mut *self.state.write().await);
                Err(self.fail("Failed to change pose", err).await)
            }
        }
    }

    /// Selects the pose after the current one, wrapping around.
    pub async fn next_pose(&self) -> Result<DispatchOutcome, DispatchError> {
        let index = self.poses.next_index(self.state.read().await.pose_index);
        self.select_pose(index).await
    }

    /// Selects the pose before the current one, wrapping around.
    pub async fn previous_pose(&self) -> Result<DispatchOutcome, DispatchError> {
        let index = self.poses.previous_index(self.state.read().await.pose_index);
        self.select_pose(index).await
    }

    async fn record_pose(&self, cursor: usize, pose: Pose, image: ImageRef) {
        let mut state = self.state.write().await;
        match state.timeline.as_mut() {
            Some(timeline) if timeline.cursor() == cursor => {
                timeline.record_pose_image(pose, image);
            }
            _ => warn!(cursor, "Cursor moved while a pose was generating; render dropped"),
        }
    }

    // ============================================================================
    // Credit
    // ============================================================================

    /// Re-reads the balance from the ledger and publishes it.
    ///
    /// On ledger failure the last known balance is returned.
    pub async fn refresh_balance(&self) -> Option<u64> {
        match self.read_balance().await {
            Ok(balance) => Some(balance),
            Err(err) => {
                warn!("Failed to refresh credit balance: {}", err);
                self.state.read().await.balance
            }
        }
    }

    async fn read_balance(&self) -> fitify_core::Result<u64> {
        let balance = self.ledger.get_balance().await?;
        self.state.write().await.balance = Some(balance);
        self.notifier.balance_changed(balance);
        Ok(balance)
    }

    // ============================================================================
    // Queries
    // ============================================================================

    /// A copy of the current session state.
    pub async fn snapshot(&self) -> SessionState {
        self.state.read().await.clone()
    }

    pub async fn display_image(&self) -> Option<ImageRef> {
        self.state.read().await.display_image().cloned()
    }

    pub async fn active_layers(&self) -> Vec<Layer> {
        self.state.read().await.active_layers().to_vec()
    }

    pub async fn pose_index(&self) -> usize {
        self.state.read().await.pose_index
    }

    pub async fn current_pose(&self) -> Option<Pose> {
        self.state.read().await.current_pose().cloned()
    }

    /// Poses already rendered for the current layer.
    pub async fn available_poses(&self) -> Vec<Pose> {
        self.state.read().await.available_poses()
    }

    pub async fn is_model_transformed(&self) -> bool {
        self.state.read().await.model_transformed
    }

    pub async fn balance(&self) -> Option<u64> {
        self.state.read().await.balance
    }

    pub async fn wardrobe(&self) -> Wardrobe {
        self.state.read().await.wardrobe.clone()
    }

    /// The generation currently in flight, if any.
    pub fn pending_request(&self) -> Option<PendingRequest> {
        self.flight.current()
    }

    pub fn is_busy(&self) -> bool {
        !self.flight.is_idle()
    }

    // ============================================================================
    // Helpers
    // ============================================================================

    async fn record_history(&self, entry: NewGeneratedImage) {
        let Some(history) = &self.history else {
            return;
        };
        if let Err(err) = history.append(entry.into_record()).await {
            warn!("Failed to persist generation history: {}", err);
        }
    }

    /// Surfaces a generator failure and classifies it.
    async fn fail(&self, context: &str, err: GenerationError) -> DispatchError {
        let message = friendly_message(context, &err.message);
        warn!(kind = ?err.kind, "{}", message);
        if err.is_insufficient_credit() {
            let balance = self.refresh_balance().await;
            self.notifier.credit_prompt(balance);
        }
        self.notifier.error(&message);
        DispatchError::from_generation(&err, message)
    }
}
