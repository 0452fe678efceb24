//! Audio input device resolution using cpal

use cpal::traits::{DeviceTrait, HostTrait};
use cpal::DeviceId;
use std::str::FromStr;

/// One input device the host can currently see
#[derive(Debug, Clone)]
pub struct InputDevice {
    /// Identifier stable across restarts, usable in the config file
    pub id: String,
    /// Name as the OS reports it
    pub name: String,
    /// True for the system default input
    pub is_default: bool,
}

/// Human-readable name for a device.
///
/// `description()` is the cpal 0.17 way; the deprecated `name()` covers
/// devices that report no description.
pub fn display_name(device: &cpal::Device) -> String {
    match device.description() {
        Ok(desc) => desc.name().to_string(),
        Err(_) => {
            #[allow(deprecated)]
            device.name().unwrap_or_else(|_| "unknown input".to_string())
        }
    }
}

/// Enumerate every input device the host exposes, with debug logging.
///
/// Runs at startup for diagnostics and again when a configured device
/// turns out not to exist.
pub fn list_input_devices() -> Vec<InputDevice> {
    let host = cpal::default_host();
    tracing::debug!("Enumerating inputs on host {}", host.id().name());

    let default_id = host
        .default_input_device()
        .and_then(|d| d.id().ok())
        .map(|id| id.to_string());

    let mut devices = Vec::new();
    let Ok(iter) = host.input_devices() else {
        tracing::debug!("Input enumeration failed; treating as no devices");
        return devices;
    };

    for device in iter {
        let Ok(id) = device.id() else { continue };
        let id = id.to_string();
        let name = display_name(&device);

        if let Ok(config) = device.default_input_config() {
            tracing::debug!(
                "Input: {} [{}] {} Hz, {} ch",
                name,
                id,
                config.sample_rate(),
                config.channels()
            );
        }

        devices.push(InputDevice {
            is_default: default_id.as_deref() == Some(id.as_str()),
            id,
            name,
        });
    }

    tracing::debug!("{} input device(s) visible", devices.len());
    devices
}

/// Look up a device by the ID string stored in the config file.
pub fn find_by_id(id_str: &str) -> Option<cpal::Device> {
    let wanted = DeviceId::from_str(id_str).ok()?;
    cpal::default_host().device_by_id(&wanted)
}

/// Pick the device to capture from.
///
/// A configured ID wins when it resolves. When it doesn't, the miss is
/// logged together with the devices that do exist and the system default
/// takes over. `None` means the machine has no usable input at all.
pub fn resolve_input_device(configured: Option<&str>) -> Option<cpal::Device> {
    if let Some(id) = configured {
        if let Some(device) = find_by_id(id) {
            tracing::info!("Capturing from configured device {}", display_name(&device));
            return Some(device);
        }

        let present: Vec<String> = list_input_devices()
            .iter()
            .map(|d| format!("{} [{}]", d.name, d.id))
            .collect();
        tracing::warn!(
            "Input device '{}' is not present (have: {}); using the system default",
            id,
            present.join(", ")
        );
    }

    let device = cpal::default_host().default_input_device();
    match &device {
        Some(d) => match d.default_input_config() {
            Ok(config) => tracing::info!(
                "Capturing from default device {} ({} Hz, {} ch, {:?})",
                display_name(d),
                config.sample_rate(),
                config.channels(),
                config.sample_format()
            ),
            Err(_) => tracing::info!(
                "Capturing from default device {} (config unreadable)",
                display_name(d)
            ),
        },
        None => tracing::error!("No input device available"),
    }
    device
}
