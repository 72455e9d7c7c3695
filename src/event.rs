//! Events flowing into the dispatcher and the handles that produce them.

use futures::channel::mpsc::UnboundedSender;
use strum_macros::IntoStaticStr;

use crate::errors::Error;
use crate::types::{Bulb, BulbAddress, BulbState};

type Result<T> = std::result::Result<T, Error>;

/// One unit of work for the dispatcher.
///
/// Vendor discovery, vendor state pushes and hub on/off requests all travel
/// through the same ordered channel and are handled one at a time.
#[derive(Debug, Clone, PartialEq, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Event {
    /// The vendor client announced a bulb (possibly one it announced before).
    Discovered(Bulb),
    /// The vendor client reported a bulb's current state.
    State {
        address: BulbAddress,
        state: BulbState,
    },
    /// The hub asked for a bulb to be switched on or off.
    ApplyOnOff { address: BulbAddress, on: bool },
    /// Anything the driver does not understand; logged and dropped.
    Unknown(String),
}

impl Event {
    pub fn kind(&self) -> &'static str {
        self.into()
    }

    pub fn address(&self) -> Option<&BulbAddress> {
        match self {
            Event::Discovered(bulb) => Some(bulb.address()),
            Event::State { address, .. } | Event::ApplyOnOff { address, .. } => Some(address),
            Event::Unknown(_) => None,
        }
    }
}

/// Cloneable sender side of the dispatcher's event channel.
///
/// Vendor client adapters use it to deliver discovery and state events.
#[derive(Debug, Clone)]
pub struct DriverHandle {
    tx: UnboundedSender<Event>,
}

impl DriverHandle {
    pub fn new(tx: UnboundedSender<Event>) -> Self {
        Self { tx }
    }

    /// Queue an event. Fails once the dispatcher has gone away.
    pub fn send(&self, event: Event) -> Result<()> {
        self.tx.unbounded_send(event).map_err(|_| Error::NotRunning)
    }

    pub fn bulb_discovered(&self, bulb: Bulb) -> Result<()> {
        self.send(Event::Discovered(bulb))
    }

    pub fn state_changed(&self, address: BulbAddress, state: BulbState) -> Result<()> {
        self.send(Event::State { address, state })
    }

    pub fn commander(&self, address: BulbAddress) -> BulbCommander {
        BulbCommander {
            address,
            handle: self.clone(),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Hub-side control of one bulb.
///
/// Given to the hub when the bulb's device is created; on/off requests made
/// through it are applied by the dispatcher in arrival order.
#[derive(Debug, Clone)]
pub struct BulbCommander {
    address: BulbAddress,
    handle: DriverHandle,
}

impl BulbCommander {
    pub fn address(&self) -> &BulbAddress {
        &self.address
    }

    pub fn apply_on_off(&self, on: bool) -> Result<()> {
        self.handle.send(Event::ApplyOnOff {
            address: self.address.clone(),
            on,
        })
    }
}
