//! Bring-up configuration.
//!
//! How many slave ports exist, and what they are called, is decided by
//! configuration before bring-up; the port registry is immutable after
//! [`FabricContext::new`](crate::FabricContext::new) consumes this.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FabricError, FabricResult};

/// Configuration of one logical slave port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlavePortConfig {
    /// Interface name presented to upper layers (e.g. "lan1").
    pub name: String,
}

/// Bring-up configuration for one switch fabric.
///
/// # Example (YAML)
///
/// ```yaml
/// device: switch0
/// master: eth0
/// slave_ports:
///   - name: lan1
///   - name: lan2
///   - name: lan3
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FabricConfig {
    /// Switch device name, used for logging.
    pub device: String,
    /// Name of the master (physical) interface.
    pub master: String,
    /// Ordered slave-port list; index in this list is the port index.
    pub slave_ports: Vec<SlavePortConfig>,
}

impl FabricConfig {
    /// Convenience constructor: `count` ports named `lan1..lanN`.
    pub fn with_port_count(device: impl Into<String>, master: impl Into<String>, count: usize) -> Self {
        FabricConfig {
            device: device.into(),
            master: master.into(),
            slave_ports: (1..=count)
                .map(|i| SlavePortConfig {
                    name: format!("lan{}", i),
                })
                .collect(),
        }
    }

    /// Number of configured slave ports.
    pub fn num_slave_ports(&self) -> usize {
        self.slave_ports.len()
    }

    /// Parses a YAML configuration string.
    pub fn from_yaml_str(yaml: &str) -> FabricResult<Self> {
        let config: FabricConfig = serde_yaml::from_str(yaml)
            .map_err(|e| FabricError::config(format!("yaml parse error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and parses a YAML configuration file.
    pub fn load(path: impl AsRef<Path>) -> FabricResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            FabricError::config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&contents)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> FabricResult<()> {
        if self.device.is_empty() {
            return Err(FabricError::config("device name is empty"));
        }
        if self.master.is_empty() {
            return Err(FabricError::config("master interface name is empty"));
        }

        let mut seen = HashSet::new();
        for port in &self.slave_ports {
            if port.name.is_empty() {
                return Err(FabricError::config("slave port with empty name"));
            }
            if port.name == self.master {
                return Err(FabricError::config(format!(
                    "slave port '{}' collides with the master interface",
                    port.name
                )));
            }
            if !seen.insert(port.name.as_str()) {
                return Err(FabricError::config(format!(
                    "duplicate slave port name '{}'",
                    port.name
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_yaml() {
        let yaml = "
device: switch0
master: eth0
slave_ports:
  - name: lan1
  - name: lan2
  - name: lan3
";
        let config = FabricConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.device, "switch0");
        assert_eq!(config.master, "eth0");
        assert_eq!(config.num_slave_ports(), 3);
        assert_eq!(config.slave_ports[1].name, "lan2");
    }

    #[test]
    fn test_with_port_count() {
        let config = FabricConfig::with_port_count("switch0", "eth0", 3);
        assert_eq!(config.num_slave_ports(), 3);
        assert_eq!(config.slave_ports[0].name, "lan1");
        assert_eq!(config.slave_ports[2].name, "lan3");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_duplicate_names() {
        let mut config = FabricConfig::with_port_count("switch0", "eth0", 2);
        config.slave_ports[1].name = "lan1".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_master_collision() {
        let mut config = FabricConfig::with_port_count("switch0", "eth0", 1);
        config.slave_ports[0].name = "eth0".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_bad_yaml() {
        assert!(FabricConfig::from_yaml_str("not: [valid").is_err());
        assert!(FabricConfig::from_yaml_str("device: x").is_err());
    }
}
