//! Editor tuning knobs.

use crate::snap::{SNAP_THRESHOLD, SnapPolicy};
use serde::{Deserialize, Serialize};

/// Smallest width or height a resize gesture may produce.
pub const MIN_ITEM_SIZE: f64 = 20.0;

/// Side length of a resize grip.
pub const GRIP_SIZE: f64 = 6.0;

/// Gap between an item placed on top and the previous top item.
pub const Z_STEP: f64 = 0.1;

/// Editor configuration, loadable from JSON.
///
/// Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Snap distance while dragging.
    pub snap_threshold: f64,
    pub snap_policy: SnapPolicy,
    pub min_item_size: f64,
    pub grip_size: f64,
    pub z_step: f64,
    /// Maximum number of undo steps kept; 0 keeps everything.
    pub undo_limit: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            snap_threshold: SNAP_THRESHOLD,
            snap_policy: SnapPolicy::default(),
            min_item_size: MIN_ITEM_SIZE,
            grip_size: GRIP_SIZE,
            z_step: Z_STEP,
            undo_limit: 0,
        }
    }
}

impl EditorConfig {
    /// Parse a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
