//! CPU, memory and temperature sampling via `sysinfo`.

use sysinfo::{Components, System};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SystemSample {
    pub cpu_percent: f32,
    pub ram_percent: f32,
    /// Degrees Celsius, when a sensor is available.
    pub temperature: Option<f32>,
}

/// Long-lived probe. CPU usage is a delta between refreshes, so the same
/// probe must be sampled repeatedly; the first sample reads 0%.
pub struct SystemProbe {
    system: System,
    components: Components,
}

impl Default for SystemProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemProbe {
    pub fn new() -> Self {
        Self {
            system: System::new(),
            components: Components::new_with_refreshed_list(),
        }
    }

    pub fn sample(&mut self) -> SystemSample {
        self.system.refresh_cpu_usage();
        self.system.refresh_memory();
        self.components.refresh(false);

        let total = self.system.total_memory();
        let ram_percent = if total == 0 {
            0.0
        } else {
            self.system.used_memory() as f32 * 100.0 / total as f32
        };

        let readings = self
            .components
            .iter()
            .map(|c| (c.label(), c.temperature()));

        SystemSample {
            cpu_percent: self.system.global_cpu_usage(),
            ram_percent,
            temperature: pick_temperature(readings),
        }
    }
}

/// Prefer the Intel package sensor, then the AMD one, then anything that
/// reports a value.
pub fn pick_temperature<'a>(
    readings: impl IntoIterator<Item = (&'a str, Option<f32>)>,
) -> Option<f32> {
    let readings: Vec<(&str, f32)> = readings
        .into_iter()
        .filter_map(|(label, temp)| Some((label, temp.filter(|t| t.is_finite())?)))
        .collect();

    ["coretemp", "k10temp"]
        .iter()
        .find_map(|driver| {
            readings
                .iter()
                .find(|(label, _)| label.starts_with(driver))
                .map(|(_, t)| *t)
        })
        .or_else(|| readings.first().map(|(_, t)| *t))
}
