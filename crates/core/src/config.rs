//! Runtime settings shared by the editor, catalog and command line.

use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Environment variable listing extra scheme directories
pub const SCHEME_DIRS_ENV: &str = "BITFLAG_SCHEME_DIRS";
/// Environment variable overriding the bit-position edit limit
pub const MAX_BITS_ENV: &str = "BITFLAG_MAX_BITS";

/// Longest bit range accepted when a bit position is typed in
pub const DEFAULT_MAX_BITS_PER_PARAMETER: u32 = 4;

/// Whether state 0 takes part in a parameter's tri-state visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZeroStatePolicy {
    /// State 0 is ignored when aggregating and is never toggled by cascades
    #[default]
    Exclude,
    /// State 0 is treated like every other state
    Include,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub scheme_directories: Vec<PathBuf>,
    pub max_bits_per_parameter: u32,
    pub zero_state_policy: ZeroStatePolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scheme_directories: Vec::new(),
            max_bits_per_parameter: DEFAULT_MAX_BITS_PER_PARAMETER,
            zero_state_policy: ZeroStatePolicy::default(),
        }
    }
}

impl Settings {
    /// Defaults overlaid with the process environment
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        if let Some(dirs) = env::var_os(SCHEME_DIRS_ENV) {
            settings.scheme_directories = env::split_paths(&dirs)
                .filter(|p| !p.as_os_str().is_empty())
                .collect();
        }
        if let Ok(raw) = env::var(MAX_BITS_ENV) {
            match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => settings.max_bits_per_parameter = n,
                _ => warn!("ignoring {}={:?}: not a positive integer", MAX_BITS_ENV, raw),
            }
        }
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = Settings::default();
        assert!(s.scheme_directories.is_empty());
        assert_eq!(s.max_bits_per_parameter, 4);
        assert_eq!(s.zero_state_policy, ZeroStatePolicy::Exclude);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let s: Settings = serde_json::from_str(r#"{"zero_state_policy": "include"}"#).unwrap();
        assert_eq!(s.zero_state_policy, ZeroStatePolicy::Include);
        assert_eq!(s.max_bits_per_parameter, DEFAULT_MAX_BITS_PER_PARAMETER);
    }
}
