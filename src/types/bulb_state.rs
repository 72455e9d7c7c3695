//! Vendor-side bulb state snapshot.

use serde::{Deserialize, Serialize};

/// State snapshot pushed by the vendor client whenever a bulb changes.
///
/// Brightness, hue and saturation span the full `u16` range; `kelvin` is the
/// white color temperature.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulbState {
    pub power: u16,
    pub brightness: u16,
    pub hue: u16,
    pub saturation: u16,
    pub kelvin: u16,
}

impl BulbState {
    /// Whether this snapshot describes a white (temperature) light.
    pub fn is_white(&self) -> bool {
        self.saturation == 0
    }
}
