use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Widest field without named values that still gets one constant per value.
pub const DEFAULT_NARROW_FIELD_MAX_WIDTH: u32 = 5;
/// Column at which banner descriptions are wrapped.
pub const DEFAULT_BANNER_WIDTH: usize = 62;

/// Generator options, every key of the YAML file is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub narrow_field_max_width: u32,
    pub banner_width: usize,
    /// Fail instead of warning when fields sharing an enumeration group
    /// differ in width.
    pub strict_enum_widths: bool,
    /// Replace enumeration headers that already exist on disk.
    pub overwrite_enumerations: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            narrow_field_max_width: DEFAULT_NARROW_FIELD_MAX_WIDTH,
            banner_width: DEFAULT_BANNER_WIDTH,
            strict_enum_widths: false,
            overwrite_enumerations: false,
        }
    }
}

impl GeneratorConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config =
            GeneratorConfig::from_yaml("narrow_field_max_width: 3\n").unwrap();
        assert_eq!(config.narrow_field_max_width, 3);
        assert_eq!(config.banner_width, DEFAULT_BANNER_WIDTH);
        assert!(!config.strict_enum_widths);
    }

    #[test]
    fn unknown_type_is_an_error() {
        assert!(GeneratorConfig::from_yaml("banner_width: wide\n").is_err());
    }
}
