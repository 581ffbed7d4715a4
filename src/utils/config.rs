use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::core::AnchorLayout;
use crate::processing::anomaly::DetectorConfig;
use crate::utils::logging::LogConfig;
use crate::validation::error::ConfigError;

/// System-wide configuration parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    /// Access point positions, in the order their readings appear per ping
    pub anchors: AnchorLayout,
    /// Damage detection thresholds
    pub detector: DetectorConfig,
    /// Log verbosity and format
    pub logging: LogConfig,
}

impl SystemConfig {
    /// Parse and validate a JSON document
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: SystemConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every parameter. Anchor geometry is already checked on construction.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.detector.validate()
    }
}

/// Main configuration manager
#[derive(Debug, Default)]
pub struct ConfigurationManager {
    /// Current system configuration
    system_config: SystemConfig,
    /// Configuration file path
    config_file_path: Option<String>,
    /// Whether configuration has been modified
    is_modified: bool,
}

impl ConfigurationManager {
    /// Create a new configuration manager with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create configuration manager and load from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut manager = Self::new();
        manager.load_from_file(path)?;
        Ok(manager)
    }

    pub fn get_system_config(&self) -> &SystemConfig {
        &self.system_config
    }

    /// Replace the whole configuration after validating it
    pub fn update_system_config(&mut self, config: SystemConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.system_config = config;
        self.is_modified = true;
        Ok(())
    }

    pub fn set_anchor_layout(&mut self, anchors: AnchorLayout) {
        self.system_config.anchors = anchors;
        self.is_modified = true;
    }

    pub fn set_detector_config(&mut self, detector: DetectorConfig) -> Result<(), ConfigError> {
        detector.validate()?;
        self.system_config.detector = detector;
        self.is_modified = true;
        Ok(())
    }

    pub fn set_log_config(&mut self, logging: LogConfig) {
        self.system_config.logging = logging;
        self.is_modified = true;
    }

    /// Load configuration from JSON file
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path_str.clone(),
            source,
        })?;

        self.system_config = SystemConfig::from_json(&content)?;
        info!(path = %path_str, "configuration loaded");

        self.config_file_path = Some(path_str);
        self.is_modified = false;
        Ok(())
    }

    /// Save configuration to JSON file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = serde_json::to_string_pretty(&self.system_config)?;
        fs::write(&path, content).map_err(|source| ConfigError::Io {
            path: path_str.clone(),
            source,
        })?;

        self.config_file_path = Some(path_str);
        self.is_modified = false;
        Ok(())
    }

    /// Save to the currently loaded file path
    pub fn save(&mut self) -> Result<(), ConfigError> {
        match self.config_file_path.clone() {
            Some(path) => self.save_to_file(path),
            None => Err(ConfigError::InvalidParameter {
                parameter: "config_file_path".to_string(),
                value: "none".to_string(),
                reason: "no file path set for saving configuration".to_string(),
            }),
        }
    }

    /// Check if configuration has been modified since last save
    pub fn is_modified(&self) -> bool {
        self.is_modified
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Anchor, Point};
    use crate::utils::logging::LogLevel;
    use std::path::PathBuf;

    #[test]
    fn test_default_system_config() {
        let config = SystemConfig::default();
        assert_eq!(config.anchors, AnchorLayout::default());
        assert_eq!(config.detector.accel_threshold, 2.0);
        assert_eq!(config.detector.collision_distance, 1.0);
        assert_eq!(config.detector.time_tolerance, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SystemConfig::from_json(r#"{"detector": {"time_tolerance": 10}}"#).unwrap();
        assert_eq!(config.detector.time_tolerance, 10);
        assert_eq!(config.detector.accel_threshold, 2.0);
        assert_eq!(config.anchors, AnchorLayout::default());
    }

    #[test]
    fn test_collinear_anchors_in_file_rejected() {
        let json = r#"{"anchors": [
            {"id": "AP1", "position": {"x": 0.0, "y": 0.0}},
            {"id": "AP2", "position": {"x": 1.0, "y": 1.0}},
            {"id": "AP3", "position": {"x": 2.0, "y": 2.0}}
        ]}"#;
        assert!(matches!(
            SystemConfig::from_json(json),
            Err(ConfigError::Serialization(_))
        ));
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let json = r#"{"detector": {"collision_distance": -1.0}}"#;
        assert!(matches!(
            SystemConfig::from_json(json),
            Err(ConfigError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_manager_updates_mark_modified() {
        let mut manager = ConfigurationManager::new();
        assert!(!manager.is_modified());

        let bad = DetectorConfig {
            accel_threshold: f64::NAN,
            ..Default::default()
        };
        assert!(manager.set_detector_config(bad).is_err());
        assert!(!manager.is_modified());

        manager.set_log_config(LogConfig {
            level: LogLevel::Debug,
            ..Default::default()
        });
        assert!(manager.is_modified());
        assert!(manager.save().is_err());
    }

    #[test]
    fn test_config_round_trip_through_file() {
        let mut manager = ConfigurationManager::new();
        let layout = AnchorLayout::new([
            Anchor::new("north", Point::new(0.0, 20.0)),
            Anchor::new("east", Point::new(20.0, 0.0)),
            Anchor::new("west", Point::new(-20.0, 0.0)),
        ])
        .unwrap();
        manager.set_anchor_layout(layout.clone());

        let temp_path = std::env::temp_dir().join(format!(
            "warehouse_tracking_config_{}.json",
            std::process::id()
        ));
        manager.save_to_file(&temp_path).unwrap();
        assert!(!manager.is_modified());

        let loaded = ConfigurationManager::from_file(&temp_path).unwrap();
        assert_eq!(loaded.get_system_config().anchors, layout);

        let _ = fs::remove_file(temp_path);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let path = PathBuf::from("no_such_dir/config.json");
        assert!(matches!(
            ConfigurationManager::from_file(path),
            Err(ConfigError::Io { .. })
        ));
    }
}
