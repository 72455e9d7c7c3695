//! Seam to the vendor bulb client.

use std::future::Future;

use crate::errors::BoxError;
use crate::event::DriverHandle;
use crate::types::Bulb;

/// The vendor library that talks to Limitless bulbs.
///
/// Discovery announcements and state pushes are delivered through the
/// [`DriverHandle`] given to [`BulbClient::subscribe`]; commands are the
/// async methods below. Implementations own their transport entirely.
pub trait BulbClient: Send + Sync + 'static {
    /// Route this client's discovery and state events into the driver.
    ///
    /// Called once, when the driver is created. Announcements should use
    /// [`DriverHandle::bulb_discovered`] and state pushes
    /// [`DriverHandle::state_changed`].
    fn subscribe(&self, events: DriverHandle);

    /// Begin looking for bulbs on the local network.
    fn start_discovery(&self) -> impl Future<Output = Result<(), BoxError>> + Send;

    /// Ask a bulb to report its state; the answer arrives as a state event.
    fn request_state(&self, bulb: &Bulb) -> impl Future<Output = Result<(), BoxError>> + Send;

    fn turn_on(&self, bulb: &Bulb) -> impl Future<Output = Result<(), BoxError>> + Send;

    fn turn_off(&self, bulb: &Bulb) -> impl Future<Output = Result<(), BoxError>> + Send;
}
