//! XML configuration support.
//!
//! Uses quick-xml + serde to parse a simple <config> XML file:
//! <config>
//!   <from>/path/to/source</from>
//!   <to>/path/to/destination</to>
//!   <contents>pkg,bin</contents>
//!   <log_level>normal</log_level>
//!   <log_file>/path/to/lswap.log</log_file>
//! </config>
//!
//! Notes:
//! - Every element is optional; blank values are ignored.
//! - Unknown elements are rejected so typos surface instead of being ignored.

use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::errors::LswapError;
use crate::fs_ops::describe_io_error;

use super::CONFIG_ENV;
use super::paths::default_config_path;
use super::types::{Config, LogLevel};

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    from: Option<String>,
    to: Option<String>,
    contents: Option<String>,
    log_level: Option<String>,
    log_file: Option<String>,
}

fn trimmed(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn xml_to_config(path: &Path, parsed: XmlConfig) -> Result<Config, LswapError> {
    let mut cfg = Config {
        from: trimmed(parsed.from),
        to: trimmed(parsed.to),
        contents: trimmed(parsed.contents).into_iter().collect(),
        log_file: trimmed(parsed.log_file).map(PathBuf::from),
        ..Config::default()
    };

    if let Some(s) = trimmed(parsed.log_level) {
        cfg.log_level = s.parse::<LogLevel>().map_err(|reason| LswapError::InvalidConfig {
            path: path.to_path_buf(),
            reason,
        })?;
    }
    Ok(cfg)
}

/// Load a Config from a specific XML file path.
pub fn load_config_from_xml_path(path: &Path) -> Result<Config, LswapError> {
    let contents = fs::read_to_string(path).map_err(|e| LswapError::InvalidConfig {
        path: path.to_path_buf(),
        reason: describe_io_error("read config", path, &e),
    })?;
    let parsed: XmlConfig = from_xml_str(&contents).map_err(|e| LswapError::InvalidConfig {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    xml_to_config(path, parsed)
}

/// Load the config file if there is one.
///
/// - `$LSWAP_CONFIG` set: the file must exist and parse.
/// - otherwise the default location is used when present; absence is fine.
pub fn load_config() -> Result<Option<(PathBuf, Config)>, LswapError> {
    let explicit = env::var_os(CONFIG_ENV).is_some();
    let path = match default_config_path() {
        Ok(p) => p,
        Err(e) => {
            debug!(error = %e, "no config location available");
            return Ok(None);
        }
    };

    if !explicit && !path.exists() {
        debug!(path = %path.display(), "no config file; using defaults");
        return Ok(None);
    }

    let cfg = load_config_from_xml_path(&path)?;
    debug!(path = %path.display(), "loaded config");
    Ok(Some((path, cfg)))
}
