//! Configuration file handling.
//!
//! Settings live in an INI file at `~/.config/fencebell/config.ini`:
//!
//! ```ini
//! [alerts]
//! window_minutes = 10
//! enabled = true
//! ```
//!
//! Missing file or missing keys fall back to defaults. CLI arguments
//! override file values when specified.

mod file;
mod key;

pub use file::{config_file_path, AlertsConfig, ConfigError, ConfigFile};
pub use key::ConfigKey;
