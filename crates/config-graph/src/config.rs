use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};

/// Settings for template expansion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpandConfig {
    /// Upper bound on expansion passes for placeholders introduced by
    /// replacement text. Self-referential values stop here.
    pub max_passes: usize,
}

impl Default for ExpandConfig {
    fn default() -> Self {
        Self { max_passes: 5 }
    }
}

impl ExpandConfig {
    /// One pass only: replacement text is never expanded again
    pub fn single_pass() -> Self {
        Self { max_passes: 1 }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_passes == 0 {
            return Err(ConfigError::invalid_config("max_passes must be > 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        assert!(ExpandConfig::default().validate().is_ok());
        assert!(ExpandConfig::single_pass().validate().is_ok());
        assert_eq!(ExpandConfig::default().max_passes, 5);
    }

    #[test]
    fn test_zero_passes_rejected() {
        let config = ExpandConfig { max_passes: 0 };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidConfig(_))));
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let config: ExpandConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ExpandConfig::default());
    }
}
