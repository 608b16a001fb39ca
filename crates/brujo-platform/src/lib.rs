pub mod battery;
pub mod desktop_entry;
pub mod launch;
pub mod paths;
pub mod process;
pub mod sysmon;
pub mod window;

pub use battery::{read_battery, BatteryInfo, BatteryStatus};
pub use desktop_entry::{strip_field_codes, DesktopEntry, DesktopIndex};
pub use launch::{launch_command, open_path};
pub use paths::{application_dirs, data_dir, ensure_dirs, icon_theme_dirs, log_dir, pixmap_dirs};
pub use process::{read_cmdline, read_exe, ProcReader};
pub use sysmon::{SystemProbe, SystemSample};
pub use window::{
    NoopWindowSystem, WindowEvent, WindowIcon, WindowImage, WindowInfo, WindowSystem,
    X11WindowSystem,
};

#[cfg(any(test, feature = "testing"))]
pub use window::{FakeCall, FakeWindowSystem};
