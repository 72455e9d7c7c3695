//! Vendor state to hub state conversion.

use log::debug;

use crate::types::{BulbState, ColorState, LightState};

/// Full scale of the vendor's 16-bit brightness, hue and saturation fields.
const FULL_SCALE: f64 = u16::MAX as f64;

fn fraction(raw: u16) -> f64 {
    f64::from(raw) / FULL_SCALE
}

/// Translate a vendor bulb snapshot into the hub's light state.
///
/// Saturation alone selects the color mode: a zero saturation is always a
/// white light at `kelvin`, whatever the hue field holds.
///
/// # Examples
///
/// ```
/// use limitless_driver::{BulbState, ColorMode, translate};
///
/// let state = translate(&BulbState {
///     power: 1,
///     brightness: 65535,
///     hue: 0,
///     saturation: 0,
///     kelvin: 2700,
/// });
/// assert!(state.on_off);
/// assert_eq!(state.brightness, 1.0);
/// assert_eq!(state.color.mode(), ColorMode::Temperature);
/// assert_eq!(state.color.temperature(), Some(2700.0));
/// ```
pub fn translate(state: &BulbState) -> LightState {
    if log::log_enabled!(log::Level::Debug) {
        match serde_json::to_string(state) {
            Ok(json) => debug!("Incoming state: {}", json),
            Err(e) => debug!("Incoming state: {:?} ({})", state, e),
        }
    }
    LightState::from(state)
}

impl From<&BulbState> for LightState {
    fn from(state: &BulbState) -> Self {
        let color = if state.is_white() {
            ColorState::Temperature {
                temperature: f64::from(state.kelvin),
            }
        } else {
            ColorState::Hue {
                hue: fraction(state.hue),
                saturation: fraction(state.saturation),
            }
        };

        LightState {
            on_off: state.power > 0,
            brightness: fraction(state.brightness),
            color,
        }
    }
}
