//! Configuration: types, default paths and the optional XML file.
//!
//! Precedence: built-in defaults < config.xml < CLI flags.

pub mod paths;
pub mod types;
pub mod xml;

pub use paths::{default_config_path, default_log_path, path_has_symlink_ancestor};
pub use types::{Config, LogLevel};
pub use xml::{load_config, load_config_from_xml_path};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "LSWAP_CONFIG";
