//! Device roster types returned by the external device-management service.

use serde::{Deserialize, Serialize};

/// Whether a device transmits into a console location or receives from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceRole {
    Tx,
    Rx,
}

/// One device in the roster. Field names follow the management service's
/// wire format (`c_name`, `d_location`, `d_type`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    #[serde(rename = "c_name")]
    pub name: String,
    #[serde(rename = "d_location")]
    pub location: String,
    #[serde(rename = "d_type")]
    pub role: DeviceRole,
}

impl Device {
    pub fn new(name: impl Into<String>, location: impl Into<String>, role: DeviceRole) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            role,
        }
    }
}

/// The resolved console for a channel: the physical location identifier plus
/// the names of the receiver channels that share it (used by clients to
/// filter broadcasts).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleResolution {
    pub location: String,
    pub channels: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_wire_format() {
        let json = r#"{"c_name": "TX1", "d_location": "loc1", "d_type": "tx"}"#;
        let device: Device = serde_json::from_str(json).unwrap();
        assert_eq!(device.name, "TX1");
        assert_eq!(device.location, "loc1");
        assert_eq!(device.role, DeviceRole::Tx);
    }
}
