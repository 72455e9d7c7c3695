use std::path::{Path, PathBuf};

use crate::types::BulbAddress;

/// Error type produced by hub and vendor client collaborators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// All error types that can occur while running the driver.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failed to deserialize JSON data.
    #[error("failed to load json: {0:?}")]
    JsonLoad(serde_json::Error),

    /// Failed to read a file from disk.
    #[error("failed to read {path:?}: {err:?}")]
    Io { path: PathBuf, err: std::io::Error },

    /// The vendor client could not begin discovering bulbs.
    #[error("failed to discover bulbs: {0}")]
    Discovery(#[source] BoxError),

    /// The hub refused to create a device for a newly discovered bulb.
    #[error("could not create light device for {address}: {source}")]
    DeviceCreation {
        address: BulbAddress,
        #[source]
        source: BoxError,
    },

    /// The hub refused to enable a channel on a freshly created device.
    #[error("could not enable {channel} channel for {address}: {source}")]
    ChannelEnable {
        address: BulbAddress,
        channel: String,
        #[source]
        source: BoxError,
    },

    /// The hub refused a state push for a known device.
    #[error("could not set light state for {address}: {source}")]
    SetState {
        address: BulbAddress,
        #[source]
        source: BoxError,
    },

    /// A command sent to a bulb through the vendor client failed.
    #[error("bulb {address} {action} failed: {source}")]
    Command {
        action: String,
        address: BulbAddress,
        #[source]
        source: BoxError,
    },

    /// A command sent to a bulb did not complete within the configured timeout.
    #[error("bulb {address} {action} timed out")]
    CommandTimeout { action: String, address: BulbAddress },

    /// `start` was called after discovery had already been started.
    #[error("driver already started")]
    AlreadyStarted,

    /// The driver has been stopped and cannot be started again.
    #[error("driver stopped")]
    Stopped,

    /// The dispatcher is no longer accepting events.
    #[error("dispatcher is not running")]
    NotRunning,
}

impl Error {
    /// Create a new io error for the given path
    pub fn io(path: &Path, err: std::io::Error) -> Self {
        Error::Io {
            path: path.to_path_buf(),
            err,
        }
    }

    /// Create a new device creation error
    pub fn device_creation(address: &BulbAddress, source: BoxError) -> Self {
        Error::DeviceCreation {
            address: address.clone(),
            source,
        }
    }

    /// Create a new channel enable error
    pub fn channel_enable(address: &BulbAddress, channel: &str, source: BoxError) -> Self {
        Error::ChannelEnable {
            address: address.clone(),
            channel: channel.to_string(),
            source,
        }
    }

    /// Create a new command error
    pub fn command(action: &str, address: &BulbAddress, source: BoxError) -> Self {
        Error::Command {
            action: action.to_string(),
            address: address.clone(),
            source,
        }
    }

    /// Create a new command timeout error
    pub fn command_timeout(action: &str, address: &BulbAddress) -> Self {
        Error::CommandTimeout {
            action: action.to_string(),
            address: address.clone(),
        }
    }

    /// Whether this error belongs to bringing a new bulb onto the hub.
    pub fn is_bring_up(&self) -> bool {
        matches!(
            self,
            Error::DeviceCreation { .. } | Error::ChannelEnable { .. }
        )
    }
}

/// Hacky implementation of PartialEq for testing
#[cfg(test)]
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}
