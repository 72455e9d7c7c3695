//! Seam to the hub's device model.

use std::future::Future;

use crate::errors::BoxError;
use crate::event::BulbCommander;
use crate::types::{DeviceInfo, LightState};

/// The home-automation hub the driver exports light devices to.
pub trait Hub: Send + 'static {
    type Device: LightDevice;

    /// Create a light device for a newly discovered bulb.
    ///
    /// `commander` is how the hub switches that bulb; requests made through it
    /// are queued behind any events already waiting in the dispatcher.
    fn create_light(
        &mut self,
        info: &DeviceInfo,
        commander: BulbCommander,
    ) -> impl Future<Output = Result<Self::Device, BoxError>> + Send;
}

/// A light device living on the hub.
///
/// Only the on-off channel is enabled by the driver; brightness, color and
/// transition channels stay off.
pub trait LightDevice: Send + 'static {
    fn enable_on_off_channel(&mut self) -> impl Future<Output = Result<(), BoxError>> + Send;

    fn set_light_state(
        &mut self,
        state: &LightState,
    ) -> impl Future<Output = Result<(), BoxError>> + Send;
}
