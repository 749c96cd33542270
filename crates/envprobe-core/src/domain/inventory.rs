//! Allow-listed native system inventory categories (`system_profiler` data types).

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, IntoStaticStr};

use crate::error::ValidationError;

/// Closed set of inventory categories. Anything outside it is rejected
/// before a command is built.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    IntoStaticStr,
)]
pub enum InventoryCategory {
    /// Wi-Fi interfaces and networks.
    #[strum(to_string = "SPAirPortDataType")]
    AirPort,
    /// Installed applications.
    #[strum(to_string = "SPApplicationsDataType")]
    Applications,
    /// Audio devices.
    #[strum(to_string = "SPAudioDataType")]
    Audio,
    /// Bluetooth controller and paired devices.
    #[strum(to_string = "SPBluetoothDataType")]
    Bluetooth,
    /// Cameras.
    #[strum(to_string = "SPCameraDataType")]
    Camera,
    /// Power-on self-test results.
    #[strum(to_string = "SPDiagnosticsDataType")]
    Diagnostics,
    /// Displays and graphics hardware.
    #[strum(to_string = "SPDisplaysDataType")]
    Displays,
    /// Application firewall settings.
    #[strum(to_string = "SPFirewallDataType")]
    Firewall,
    /// Model and processor overview.
    #[strum(to_string = "SPHardwareDataType")]
    Hardware,
    /// Location services.
    #[strum(to_string = "SPLocationDataType")]
    Location,
    /// Installed memory modules.
    #[strum(to_string = "SPMemoryDataType")]
    Memory,
    /// Network services and interfaces.
    #[strum(to_string = "SPNetworkDataType")]
    Network,
    /// NVMe storage controllers.
    #[strum(to_string = "SPNVMeDataType")]
    NVMe,
    /// PCI devices.
    #[strum(to_string = "SPPCIDataType")]
    Pci,
    /// Battery and power settings.
    #[strum(to_string = "SPPowerDataType")]
    Power,
    /// OS version and boot details.
    #[strum(to_string = "SPSoftwareDataType")]
    Software,
    /// Volumes and storage devices.
    #[strum(to_string = "SPStorageDataType")]
    Storage,
    /// Thunderbolt ports and connected devices.
    #[strum(to_string = "SPThunderboltDataType")]
    Thunderbolt,
    /// USB buses and devices.
    #[strum(to_string = "SPUSBDataType")]
    Usb,
}

impl InventoryCategory {
    /// The data type identifier passed to `system_profiler`.
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Comma-separated list of every accepted identifier.
    pub fn allowed_list() -> String {
        Self::iter()
            .map(Self::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for InventoryCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownInventoryCategory {
                given: s.to_string(),
                allowed: Self::allowed_list(),
            })
    }
}
