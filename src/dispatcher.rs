//! The event loop that turns vendor announcements into hub devices.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::channel::{mpsc::UnboundedReceiver, oneshot};
use futures::{FutureExt, StreamExt};
use log::{debug, error, info, warn};

use crate::client::BulbClient;
use crate::config::DriverConfig;
use crate::errors::{BoxError, Error};
use crate::event::{DriverHandle, Event};
use crate::history::EventHistory;
use crate::hub::{Hub, LightDevice};
use crate::registry::BulbRegistry;
use crate::runtime;
use crate::translate::translate;
use crate::types::{Bulb, BulbAddress, BulbState, DeviceInfo};

type Result<T> = std::result::Result<T, Error>;

/// Counters shared between the dispatcher task and the driver.
#[derive(Debug, Default)]
pub(crate) struct DispatchStats {
    pub running: bool,
    pub known_bulbs: usize,
    pub history: EventHistory,
}

pub(crate) type SharedStats = Arc<Mutex<DispatchStats>>;

/// Consumes the driver's event channel one event at a time.
///
/// Owns the hub and the bulb registry outright: nothing else reads or writes
/// them while the loop runs.
pub struct Dispatcher<C, H: Hub> {
    client: Arc<C>,
    hub: H,
    registry: BulbRegistry<H::Device>,
    sender: DriverHandle,
    config: DriverConfig,
    stats: SharedStats,
}

impl<C: BulbClient, H: Hub> Dispatcher<C, H> {
    pub fn new(client: Arc<C>, hub: H, sender: DriverHandle, config: DriverConfig) -> Self {
        Self {
            client,
            hub,
            registry: BulbRegistry::new(),
            sender,
            config,
            stats: SharedStats::default(),
        }
    }

    pub(crate) fn with_stats(mut self, stats: SharedStats) -> Self {
        self.stats = stats;
        self
    }

    pub fn registry(&self) -> &BulbRegistry<H::Device> {
        &self.registry
    }

    pub fn hub(&self) -> &H {
        &self.hub
    }

    /// Drain `events` until `stop` fires or its sender is dropped.
    ///
    /// The stop signal is raced against each handler, so a vendor or hub call
    /// that never resolves is abandoned mid-event; events still queued when it
    /// fires are dropped. The channel itself only closes if `sender` belongs
    /// to a different channel, since the dispatcher keeps its own sender.
    /// Returns an error only when [`DriverConfig::fail_fast`] is set and a
    /// bulb could not be brought onto the hub.
    pub async fn run(
        mut self,
        mut events: UnboundedReceiver<Event>,
        stop: oneshot::Receiver<()>,
    ) -> Result<()> {
        info!("Dispatcher started");
        self.stats().running = true;

        let mut stop = stop.fuse();
        let outcome = loop {
            let event = futures::select_biased! {
                signal = stop => break stopped(signal),
                event = events.next() => event,
            };
            let Some(event) = event else {
                debug!("Event channel closed");
                break Ok(());
            };

            let work = self.handle(event).fuse();
            futures::pin_mut!(work);
            futures::select_biased! {
                signal = stop => {
                    debug!("Abandoning in-flight event");
                    break stopped(signal);
                }
                handled = work => {
                    if let Err(e) = handled {
                        break Err(e);
                    }
                }
            }
        };

        self.stats().running = false;
        info!("Dispatcher stopped");
        outcome
    }

    /// Handle a single event.
    pub async fn handle(&mut self, event: Event) -> Result<()> {
        let kind = event.kind();
        let origin = event.address().cloned();

        let outcome = match event {
            Event::Discovered(bulb) => self.on_discovered(bulb).await,
            Event::State { address, state } => {
                self.on_state(&address, &state).await;
                Ok(())
            }
            Event::ApplyOnOff { address, on } => {
                self.on_apply_on_off(&address, on).await;
                Ok(())
            }
            Event::Unknown(description) => {
                info!("Event {}", description);
                Ok(())
            }
        };

        self.stats().history.record(kind, origin.as_ref());
        outcome
    }

    async fn on_discovered(&mut self, bulb: Bulb) -> Result<()> {
        if self.registry.is_known(bulb.address()) {
            debug!("Bulb {} already has a light device", bulb.address());
            return Ok(());
        }

        info!("Creating new light");
        let device = match self.bring_up(&bulb).await {
            Ok(device) => device,
            Err(e) if self.config.fail_fast => {
                error!("Could not create light device: {}", e);
                self.note_error(&e);
                return Err(e);
            }
            Err(e) => {
                error!("Error creating light instance, skipping bulb: {}", e);
                self.note_error(&e);
                return Ok(());
            }
        };

        self.registry.record(bulb.clone(), device);
        self.stats().known_bulbs = self.registry.len();

        let request = self.client.request_state(&bulb);
        let timeout = self.config.command_timeout();
        if let Err(e) = command(timeout, "request state", bulb.address(), request).await {
            warn!("Unable to initiate bulb state request: {}", e);
            self.note_error(&e);
        }
        Ok(())
    }

    async fn bring_up(&mut self, bulb: &Bulb) -> Result<H::Device> {
        let address = bulb.address();
        info!(
            "Making light with ID: {} Label: {}",
            address,
            bulb.label()
        );

        let info = DeviceInfo::for_bulb(bulb);
        let commander = self.sender.commander(address.clone());
        let mut device = self
            .hub
            .create_light(&info, commander)
            .await
            .map_err(|e| Error::device_creation(address, e))?;

        device
            .enable_on_off_channel()
            .await
            .map_err(|e| Error::channel_enable(address, "on-off", e))?;

        Ok(device)
    }

    async fn on_state(&mut self, address: &BulbAddress, state: &BulbState) {
        let Some(entry) = self.registry.get_mut(address) else {
            debug!("State for unknown bulb {}, ignoring", address);
            return;
        };

        let light_state = translate(state);
        let pushed = entry.device.set_light_state(&light_state).await;

        if let Err(source) = pushed {
            let e = Error::SetState {
                address: address.clone(),
                source,
            };
            warn!("{}", e);
            self.note_error(&e);
        }
    }

    async fn on_apply_on_off(&mut self, address: &BulbAddress, on: bool) {
        let Some(entry) = self.registry.get(address) else {
            warn!("On-off request for unknown bulb {}", address);
            return;
        };
        let bulb = entry.bulb.clone();

        let timeout = self.config.command_timeout();
        let result = if on {
            let request = self.client.turn_on(&bulb);
            command(timeout, "turn on", address, request).await
        } else {
            let request = self.client.turn_off(&bulb);
            command(timeout, "turn off", address, request).await
        };

        if let Err(e) = result {
            warn!("Failed to set on-off state: {}", e);
            self.note_error(&e);
        }
    }

    fn note_error(&self, e: &Error) {
        self.stats().history.record_error(&e.to_string());
    }

    fn stats(&self) -> MutexGuard<'_, DispatchStats> {
        self.stats.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn stopped(signal: std::result::Result<(), oneshot::Canceled>) -> Result<()> {
    match signal {
        Ok(()) => debug!("Stop requested"),
        Err(_) => debug!("Driver dropped, stopping"),
    }
    Ok(())
}

/// Await a vendor command, bounded by `timeout` if one is configured.
async fn command<F>(
    timeout: Option<Duration>,
    action: &str,
    address: &BulbAddress,
    request: F,
) -> Result<()>
where
    F: Future<Output = std::result::Result<(), BoxError>>,
{
    let outcome = match timeout {
        Some(limit) => runtime::timeout(limit, request)
            .await
            .map_err(|_| Error::command_timeout(action, address))?,
        None => request.await,
    };
    outcome.map_err(|e| Error::command(action, address, e))
}
