//! Battery state from `/sys/class/power_supply`.

use std::path::Path;

use tracing::debug;

pub const POWER_SUPPLY_DIR: &str = "/sys/class/power_supply";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatteryStatus {
    Charging,
    Discharging,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatteryInfo {
    /// Charge level, 0-100.
    pub capacity: u8,
    pub status: BatteryStatus,
}

/// First `BAT*` device under `root` with a readable `capacity` and
/// `status`. `None` when the machine has no battery.
pub fn read_battery(root: &Path) -> Option<BatteryInfo> {
    let mut names: Vec<String> = std::fs::read_dir(root)
        .ok()?
        .flatten()
        .filter_map(|e| e.file_name().into_string().ok())
        .filter(|n| n.starts_with("BAT"))
        .collect();
    names.sort();

    names.iter().find_map(|name| {
        let dir = root.join(name);
        let capacity = std::fs::read_to_string(dir.join("capacity"))
            .ok()?
            .trim()
            .parse::<u16>()
            .ok()?;
        let status = std::fs::read_to_string(dir.join("status")).ok()?;
        let status = if status.trim().eq_ignore_ascii_case("charging") {
            BatteryStatus::Charging
        } else {
            BatteryStatus::Discharging
        };
        debug!(device = %name, capacity, "battery read");
        Some(BatteryInfo {
            capacity: capacity.min(100) as u8,
            status,
        })
    })
}
