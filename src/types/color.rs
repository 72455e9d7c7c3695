//! Hub color representation.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Which of the two mutually exclusive color modes a light is in.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use limitless_driver::ColorMode;
///
/// assert_eq!(ColorMode::Temperature.to_string(), "temperature");
/// assert_eq!(ColorMode::from_str("hue").unwrap(), ColorMode::Hue);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ColorMode {
    Temperature,
    Hue,
}

/// Color of a hub light: either a white temperature or a hue/saturation pair.
///
/// Serialized with a `mode` tag the way the hub expects:
///
/// ```
/// use limitless_driver::ColorState;
///
/// let white = ColorState::Temperature { temperature: 2700.0 };
/// assert_eq!(
///     serde_json::to_string(&white).unwrap(),
///     r#"{"mode":"temperature","temperature":2700.0}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum ColorState {
    /// White light at the given temperature in Kelvin.
    Temperature { temperature: f64 },
    /// Colored light; both components are fractions in `[0, 1]`.
    Hue { hue: f64, saturation: f64 },
}

impl ColorState {
    pub fn mode(&self) -> ColorMode {
        match self {
            ColorState::Temperature { .. } => ColorMode::Temperature,
            ColorState::Hue { .. } => ColorMode::Hue,
        }
    }

    pub fn temperature(&self) -> Option<f64> {
        match self {
            ColorState::Temperature { temperature } => Some(*temperature),
            ColorState::Hue { .. } => None,
        }
    }

    pub fn hue(&self) -> Option<f64> {
        match self {
            ColorState::Hue { hue, .. } => Some(*hue),
            ColorState::Temperature { .. } => None,
        }
    }

    pub fn saturation(&self) -> Option<f64> {
        match self {
            ColorState::Hue { saturation, .. } => Some(*saturation),
            ColorState::Temperature { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hue_mode_json() {
        let color: ColorState =
            serde_json::from_str(r#"{"mode":"hue","hue":0.5,"saturation":1.0}"#).unwrap();
        assert_eq!(color.mode(), ColorMode::Hue);
        assert_eq!(color.hue(), Some(0.5));
        assert_eq!(color.saturation(), Some(1.0));
        assert_eq!(color.temperature(), None);
    }

    #[test]
    fn test_mode_as_ref() {
        assert_eq!(ColorMode::Hue.as_ref(), "hue");
    }
}
