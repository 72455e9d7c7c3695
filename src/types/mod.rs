//! Value types shared between the vendor client, the driver and the hub.

mod address;
mod bulb_state;
mod color;
mod device_info;
mod light_state;

pub use address::{Bulb, BulbAddress};
pub use bulb_state::BulbState;
pub use color::{ColorMode, ColorState};
pub use device_info::DeviceInfo;
pub use light_state::LightState;
