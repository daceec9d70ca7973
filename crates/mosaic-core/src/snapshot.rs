// ── Cached display state ──
//
// One `Snapshot` per successful fetch round. The coordinator publishes
// each round as a fresh `Arc<Snapshot>`; nothing mutates a snapshot after
// it has been published.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;

use mosaic_api::{Display, RotationConfig};

/// Display state from a single refresh round.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Snapshot {
    /// Displays keyed by id, in the order the service listed them.
    pub displays: IndexMap<String, Display>,
    /// Rotation settings keyed by display id. Holds an entry for every
    /// display, defaulted when its rotation fetch failed.
    pub rotations: IndexMap<String, RotationConfig>,
    /// When the round completed. `None` until the first refresh.
    pub fetched_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    /// Assemble a snapshot from one fetch round.
    ///
    /// A duplicated id keeps its first position and its last value.
    pub fn from_round(
        displays: Vec<Display>,
        rotations: impl IntoIterator<Item = (String, RotationConfig)>,
        fetched_at: DateTime<Utc>,
    ) -> Self {
        let displays = displays
            .into_iter()
            .map(|d| (d.id.clone(), d))
            .collect();
        Self {
            displays,
            rotations: rotations.into_iter().collect(),
            fetched_at: Some(fetched_at),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.displays.is_empty()
    }

    pub fn display_ids(&self) -> Vec<String> {
        self.displays.keys().cloned().collect()
    }

    /// The display with `id`, or an all-default display if unknown.
    pub fn display(&self, id: &str) -> Display {
        self.displays.get(id).cloned().unwrap_or_default()
    }

    /// Rotation settings for `id`, or the fallback entry if unknown.
    pub fn rotation(&self, id: &str) -> RotationConfig {
        self.rotations.get(id).cloned().unwrap_or_default()
    }

    pub fn status_of(&self, id: &str) -> DisplayStatus {
        if self.displays.contains_key(id) {
            DisplayStatus::Connected
        } else {
            DisplayStatus::Disconnected
        }
    }
}

/// Whether a display showed up in the latest round.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DisplayStatus {
    Connected,
    Disconnected,
}

/// Outcome of the most recent refresh, observable by consumers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RefreshState {
    /// No refresh has completed yet.
    #[default]
    Uninitialized,
    /// The last refresh succeeded.
    Ready,
    /// The last refresh failed; the previous snapshot is still published.
    Failed { message: String },
}

impl RefreshState {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}
