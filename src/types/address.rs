//! Bulb identity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Hardware address of a bulb, used as its identity.
///
/// Addresses are normalized to upper case so that announcements from the
/// vendor client compare equal regardless of how they were formatted.
///
/// # Examples
///
/// ```
/// use limitless_driver::BulbAddress;
///
/// let a = BulbAddress::new("d0:73:d5:00:11:22");
/// assert_eq!(a.as_str(), "D0:73:D5:00:11:22");
/// assert_eq!(a, BulbAddress::new("D0:73:D5:00:11:22"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct BulbAddress(String);

impl BulbAddress {
    pub fn new(address: &str) -> Self {
        BulbAddress(address.to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for BulbAddress {
    fn from(address: String) -> Self {
        BulbAddress::new(&address)
    }
}

impl From<&str> for BulbAddress {
    fn from(address: &str) -> Self {
        BulbAddress::new(address)
    }
}

impl From<BulbAddress> for String {
    fn from(address: BulbAddress) -> Self {
        address.0
    }
}

impl fmt::Display for BulbAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A physical bulb as announced by the vendor client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bulb {
    address: BulbAddress,
    label: String,
}

impl Bulb {
    pub fn new(address: impl Into<BulbAddress>, label: &str) -> Self {
        Bulb {
            address: address.into(),
            label: label.to_string(),
        }
    }

    pub fn address(&self) -> &BulbAddress {
        &self.address
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}
