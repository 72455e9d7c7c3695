//! # limitless_driver
//!
//! A home-automation hub driver for Limitless networked light bulbs.
//!
//! The driver sits between two systems it does not own: a vendor client that
//! discovers bulbs and reports their state, and a hub that models every bulb
//! as a generic light device. Both are plugged in through traits
//! ([`BulbClient`], [`Hub`], [`LightDevice`]); this crate supplies the
//! pipeline in between.
//!
//! ## Quick Start
//!
//! ```ignore
//! use limitless_driver::{Driver, DriverConfig, ModuleInfo};
//!
//! async fn run(client: MyVendorClient, hub: MyHub) -> Result<(), limitless_driver::Error> {
//!     let info = ModuleInfo::load("./package.json")?;
//!     let mut driver = Driver::new(info, client, hub);
//!
//!     driver.start(DriverConfig::default()).await?;
//!     // ... bulbs are discovered and mirrored onto the hub ...
//!     driver.stop().await
//! }
//! ```
//!
//! ## Pipeline
//!
//! - **Discovery**: each announced bulb gets exactly one hub device, keyed by
//!   its hardware address ([`BulbRegistry`]). Re-announcements are ignored.
//! - **State**: vendor snapshots are converted with [`translate`]; 16-bit
//!   fields become fractions of 65535 and a zero saturation selects the white
//!   (temperature) color mode.
//! - **Control**: the hub switches bulbs on and off through the
//!   [`BulbCommander`] it receives at device creation.
//!
//! Every event, whichever side it comes from, goes through one ordered
//! channel consumed by a single [`Dispatcher`] task.
//!
//! ## Runtime Selection
//!
//! This library is runtime-agnostic. Select your preferred runtime using feature flags:
//!
//! - `runtime-tokio` (default): Use the tokio async runtime
//! - `runtime-async-std`: Use the async-std runtime
//! - `runtime-smol`: Use the smol runtime

mod client;
mod config;
mod dispatcher;
mod driver;
mod errors;
mod event;
mod history;
mod hub;
mod registry;
pub mod runtime;
mod translate;
mod types;

#[cfg(test)]
mod testing;

// Re-export public API
pub use client::BulbClient;
pub use config::{DriverConfig, ModuleInfo};
pub use dispatcher::Dispatcher;
pub use driver::{Driver, DriverDiagnostics};
pub use errors::{BoxError, Error};
pub use event::{BulbCommander, DriverHandle, Event};
pub use history::{EventHistory, HistoryEntry, HistorySummary};
pub use hub::{Hub, LightDevice};
pub use registry::{BulbRegistry, RegistryEntry};
pub use translate::translate;
pub use types::{Bulb, BulbAddress, BulbState, ColorMode, ColorState, DeviceInfo, LightState};
