//! Identity metadata for hub device creation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Bulb;

/// Identity the hub records for a light device.
///
/// # Examples
///
/// ```
/// use limitless_driver::{Bulb, DeviceInfo};
///
/// let info = DeviceInfo::for_bulb(&Bulb::new("d073d5001122", "Porch"));
/// assert_eq!(info.natural_id, "D073D5001122");
/// assert_eq!(info.natural_id_type, "Limitless");
/// assert_eq!(info.name.as_deref(), Some("Porch"));
/// assert_eq!(info.signatures["ninja:thingType"], "light");
/// ```
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    pub natural_id: String,
    pub natural_id_type: String,
    pub name: Option<String>,
    pub signatures: BTreeMap<String, String>,
}

impl DeviceInfo {
    pub const NATURAL_ID_TYPE: &'static str = "Limitless";

    const SIGNATURES: [(&'static str, &'static str); 4] = [
        ("ninja:manufacturer", "Limitless"),
        ("ninja:productName", "Limitless Bulb"),
        ("ninja:productType", "Light"),
        ("ninja:thingType", "light"),
    ];

    pub fn for_bulb(bulb: &Bulb) -> Self {
        let label = bulb.label();
        DeviceInfo {
            natural_id: bulb.address().to_string(),
            natural_id_type: Self::NATURAL_ID_TYPE.to_string(),
            name: (!label.is_empty()).then(|| label.to_string()),
            signatures: Self::SIGNATURES
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}
