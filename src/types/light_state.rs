//! Hub-side light state.

use serde::{Deserialize, Serialize};

use super::ColorState;

/// Normalized light state handed to the hub device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LightState {
    pub on_off: bool,
    /// Fraction in `[0, 1]`.
    pub brightness: f64,
    pub color: ColorState,
}
