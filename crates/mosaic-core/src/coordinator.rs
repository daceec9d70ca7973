// ── Refresh coordinator ──
//
// Owns the published snapshot for one Mosaic service. A background task
// refreshes it on a fixed interval; every mutating command goes through
// the client and then triggers one out-of-band refresh.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures_util::future::join_all;
use serde_json::Value;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use mosaic_api::{Display, MosaicClient, RotationConfig};

use crate::command::{
    ClearRequest, Command, PushImageRequest, PushTextRequest, SetBrightnessRequest,
    SetPowerRequest, SetRotationRequest, ShowAppRequest, SkipRequest,
};
use crate::config::CoordinatorConfig;
use crate::error::CoreError;
use crate::snapshot::{DisplayStatus, RefreshState, Snapshot};
use crate::stream::SnapshotStream;

// ── Coordinator ──────────────────────────────────────────────────

/// Session object for one Mosaic service.
///
/// Cheaply cloneable via `Arc<CoordinatorInner>`. Reads never perform
/// I/O; they return whatever the latest refresh published. Overlapping
/// refreshes are allowed and the last one to finish wins.
#[derive(Clone)]
pub struct Coordinator {
    inner: Arc<CoordinatorInner>,
}

struct CoordinatorInner {
    config: CoordinatorConfig,
    client: MosaicClient,
    snapshot: watch::Sender<Arc<Snapshot>>,
    state: watch::Sender<RefreshState>,
    cancel: CancellationToken,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Coordinator {
    /// Build a coordinator from configuration. Does NOT touch the network;
    /// call [`start()`](Self::start) for the first refresh.
    pub fn new(config: CoordinatorConfig) -> Result<Self, CoreError> {
        let client = MosaicClient::with_transport(
            config.url.as_str(),
            config.api_key.clone(),
            config.transport(),
        )?;
        let (snapshot, _) = watch::channel(Arc::new(Snapshot::default()));
        let (state, _) = watch::channel(RefreshState::Uninitialized);

        Ok(Self {
            inner: Arc::new(CoordinatorInner {
                config,
                client,
                snapshot,
                state,
                cancel: CancellationToken::new(),
                task: Mutex::new(None),
            }),
        })
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.inner.config
    }

    /// The underlying API client, for calls that don't touch the snapshot.
    pub fn client(&self) -> &MosaicClient {
        &self.inner.client
    }

    // ── Session lifecycle ────────────────────────────────────────

    /// Run the first refresh, then spawn the periodic refresh task.
    ///
    /// Fails if the first refresh fails; no task is spawned in that case.
    pub async fn start(&self) -> Result<(), CoreError> {
        self.ensure_running()?;
        self.refresh().await?;

        let interval = self.inner.config.poll_interval;
        if !interval.is_zero() {
            let mut task = self.inner.task.lock().await;
            if task.is_none() {
                let cancel = self.inner.cancel.clone();
                *task = Some(tokio::spawn(refresh_task(self.clone(), interval, cancel)));
            }
        }

        info!(
            url = %self.inner.config.url,
            displays = self.inner.snapshot.borrow().displays.len(),
            poll_secs = interval.as_secs(),
            "coordinator started"
        );
        Ok(())
    }

    /// Stop the refresh task, release the connection pool and drop the
    /// cached snapshot. The coordinator can't be restarted afterwards.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();

        let handle = self.inner.task.lock().await.take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }

        self.inner.client.close();
        self.inner.snapshot.send_replace(Arc::new(Snapshot::default()));
        self.inner.state.send_replace(RefreshState::Uninitialized);
        debug!("coordinator shut down");
    }

    /// Whether [`shutdown()`](Self::shutdown) has been called.
    pub fn is_shut_down(&self) -> bool {
        self.inner.cancel.is_cancelled()
    }

    // ── Refresh ──────────────────────────────────────────────────

    /// Fetch every display and its rotation settings, then publish the
    /// round as one snapshot.
    ///
    /// A display-list failure returns [`CoreError::UpdateFailed`] and
    /// leaves the published snapshot untouched. A failed rotation fetch
    /// only defaults that display's rotation entry. A round still in
    /// flight when [`shutdown()`](Self::shutdown) runs is abandoned and
    /// publishes nothing.
    pub async fn refresh(&self) -> Result<(), CoreError> {
        self.ensure_running()?;

        let round = tokio::select! {
            biased;
            () = self.inner.cancel.cancelled() => return Err(shut_down_error()),
            round = self.fetch_round() => round,
        };

        let snapshot = match round {
            Ok(snapshot) => Arc::new(snapshot),
            Err(e) => {
                let message = e.to_string();
                self.publish_state(RefreshState::Failed {
                    message: message.clone(),
                });
                return Err(CoreError::UpdateFailed { message });
            }
        };

        let displays = snapshot.displays.len();
        // Checked under the channel lock: shutdown cancels before it resets.
        let published = self.inner.snapshot.send_if_modified(|current| {
            if self.is_shut_down() {
                return false;
            }
            *current = snapshot;
            true
        });
        if !published {
            debug!("coordinator shut down mid-refresh, round dropped");
            return Err(shut_down_error());
        }
        self.publish_state(RefreshState::Ready);
        debug!(displays, "refresh complete");
        Ok(())
    }

    async fn fetch_round(&self) -> Result<Snapshot, mosaic_api::Error> {
        let client = &self.inner.client;
        let displays = client.get_displays().await?;

        let rotations = join_all(displays.iter().map(|d| async move {
            let display_id = d.id.as_str();
            let rotation = client
                .get_rotation_config(display_id)
                .await
                .unwrap_or_else(|e| {
                    warn!(display_id, error = %e, "rotation fetch failed, using default");
                    RotationConfig::default()
                });
            (d.id.clone(), rotation)
        }))
        .await;

        Ok(Snapshot::from_round(displays, rotations, Utc::now()))
    }

    fn publish_state(&self, state: RefreshState) {
        self.inner.state.send_if_modified(|current| {
            if self.is_shut_down() {
                return false;
            }
            *current = state;
            true
        });
    }

    /// Refresh after a successful command. A failure here is published
    /// through [`refresh_state()`](Self::refresh_state), not returned.
    async fn refresh_after_command(&self) {
        if let Err(e) = self.refresh().await {
            warn!(error = %e, "refresh after command failed");
        }
    }

    // ── Commands ─────────────────────────────────────────────────

    /// Validate and route a command to the matching method.
    pub async fn execute(&self, command: Command) -> Result<Value, CoreError> {
        command.validate()?;
        match command {
            Command::PushText(req) => self.push_text(&req).await,
            Command::PushImage(req) => self.push_image(&req).await,
            Command::Clear(ClearRequest { target }) => self.clear(&target).await,
            Command::ShowApp(ShowAppRequest {
                target,
                app,
                duration,
            }) => self.show_app(&target, &app, duration).await,
            Command::SetRotationEnabled(SetRotationRequest { target, enabled }) => {
                self.set_rotation_enabled(&target, enabled).await
            }
            Command::Skip(SkipRequest { target }) => self.skip(&target).await,
            Command::SetBrightness(SetBrightnessRequest { target, brightness }) => {
                self.set_brightness(&target, brightness).await
            }
            Command::SetPower(SetPowerRequest { target, power }) => {
                self.set_power(&target, power).await
            }
        }
    }

    pub async fn push_text(&self, req: &PushTextRequest) -> Result<Value, CoreError> {
        self.ensure_running()?;
        info!(display = %req.target, priority = %req.priority, "pushing text");
        let ack = self.inner.client.push_text(&req.to_notification()).await?;
        self.refresh_after_command().await;
        Ok(ack)
    }

    pub async fn push_image(&self, req: &PushImageRequest) -> Result<Value, CoreError> {
        self.ensure_running()?;
        info!(display = %req.target, priority = %req.priority, "pushing image");
        let ack = self.inner.client.push_image(&req.to_notification()).await?;
        self.refresh_after_command().await;
        Ok(ack)
    }

    pub async fn clear(&self, display_id: &str) -> Result<Value, CoreError> {
        self.ensure_running()?;
        info!(display = display_id, "clearing notifications");
        let ack = self.inner.client.clear(display_id).await?;
        self.refresh_after_command().await;
        Ok(ack)
    }

    pub async fn show_app(
        &self,
        display_id: &str,
        app_id: &str,
        duration: u32,
    ) -> Result<Value, CoreError> {
        self.ensure_running()?;
        info!(display = display_id, app = app_id, duration, "showing app");
        let ack = self
            .inner
            .client
            .show_app(display_id, app_id, duration)
            .await?;
        self.refresh_after_command().await;
        Ok(ack)
    }

    pub async fn set_brightness(
        &self,
        display_id: &str,
        brightness: u8,
    ) -> Result<Value, CoreError> {
        self.ensure_running()?;
        info!(display = display_id, brightness, "setting brightness");
        let ack = self
            .inner
            .client
            .set_brightness(display_id, brightness)
            .await?;
        self.refresh_after_command().await;
        Ok(ack)
    }

    pub async fn set_power(&self, display_id: &str, power: bool) -> Result<Value, CoreError> {
        self.ensure_running()?;
        info!(display = display_id, power, "setting power");
        let ack = self.inner.client.set_power(display_id, power).await?;
        self.refresh_after_command().await;
        Ok(ack)
    }

    pub async fn set_rotation_enabled(
        &self,
        display_id: &str,
        enabled: bool,
    ) -> Result<Value, CoreError> {
        self.ensure_running()?;
        info!(display = display_id, enabled, "setting rotation");
        let ack = self
            .inner
            .client
            .set_rotation_enabled(display_id, enabled)
            .await?;
        self.refresh_after_command().await;
        Ok(ack)
    }

    /// Advance the display's rotation to the next app.
    pub async fn skip(&self, display_id: &str) -> Result<Value, CoreError> {
        self.ensure_running()?;
        info!(display = display_id, "skipping app");
        let ack = self.inner.client.skip_app(display_id).await?;
        self.refresh_after_command().await;
        Ok(ack)
    }

    // ── Reads (no I/O) ───────────────────────────────────────────

    /// The latest published snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.inner.snapshot.borrow().clone()
    }

    /// The display with `id`, or an all-default display if unknown.
    pub fn get_display(&self, id: &str) -> Display {
        self.inner.snapshot.borrow().display(id)
    }

    /// Display ids from the latest snapshot, in service order.
    pub fn get_display_ids(&self) -> Vec<String> {
        self.inner.snapshot.borrow().display_ids()
    }

    /// Rotation settings for `id`, or the fallback entry if unknown.
    pub fn rotation(&self, id: &str) -> RotationConfig {
        self.inner.snapshot.borrow().rotation(id)
    }

    pub fn display_status(&self, id: &str) -> DisplayStatus {
        self.inner.snapshot.borrow().status_of(id)
    }

    // ── State observation ────────────────────────────────────────

    /// Subscribe to published snapshots.
    pub fn subscribe(&self) -> SnapshotStream {
        SnapshotStream::new(self.inner.snapshot.subscribe())
    }

    /// Subscribe to refresh outcomes.
    pub fn refresh_state(&self) -> watch::Receiver<RefreshState> {
        self.inner.state.subscribe()
    }

    fn ensure_running(&self) -> Result<(), CoreError> {
        if self.is_shut_down() {
            return Err(shut_down_error());
        }
        Ok(())
    }
}

fn shut_down_error() -> CoreError {
    CoreError::NotReady {
        message: "coordinator has been shut down".into(),
    }
}

// ── Background tasks ─────────────────────────────────────────────

/// Periodically refresh the snapshot until cancelled.
async fn refresh_task(coordinator: Coordinator, interval: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(interval);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                if let Err(e) = coordinator.refresh().await {
                    warn!(error = %e, "periodic refresh failed");
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn coordinator() -> Coordinator {
        let config = CoordinatorConfig::new("http://127.0.0.1:8176".parse().unwrap());
        Coordinator::new(config).unwrap()
    }

    #[test]
    fn starts_empty_and_uninitialized() {
        let coord = coordinator();
        assert!(coord.snapshot().is_empty());
        assert!(coord.get_display_ids().is_empty());
        assert_eq!(*coord.refresh_state().borrow(), RefreshState::Uninitialized);
        assert!(!coord.client().is_open());
    }

    #[test]
    fn reads_of_unknown_ids_are_defaults() {
        let coord = coordinator();
        assert_eq!(coord.get_display("lobby"), Display::default());
        assert_eq!(coord.rotation("lobby"), RotationConfig::default());
        assert_eq!(coord.display_status("lobby"), DisplayStatus::Disconnected);
    }

    #[tokio::test]
    async fn commands_after_shutdown_are_rejected() {
        let coord = coordinator();
        coord.shutdown().await;
        assert!(coord.is_shut_down());
        let err = coord.skip("lobby").await.unwrap_err();
        assert!(matches!(err, CoreError::NotReady { .. }), "got {err:?}");
        assert!(matches!(
            coord.start().await,
            Err(CoreError::NotReady { .. })
        ));
    }

    #[tokio::test]
    async fn execute_validates_before_sending() {
        let coord = coordinator();
        let err = coord
            .execute(Command::ShowApp(ShowAppRequest::new("lobby", "")))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation { .. }), "got {err:?}");
    }
}
