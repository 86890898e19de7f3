//! Global calibration knobs, cycle timeline and the default equipment loadout
//!
//! Everything here can come from an optional TOML file:
//!
//! ```toml
//! [global]
//! currency_symbol = "€"
//! kwh_cost = 0.31
//! grower_skill = 1.2
//!
//! [cycle]
//! veg_days = 28
//!
//! [[devices]]
//! name = "Main Grow Light"
//! watts = 480
//! veg_duty = 1.0
//! flower_duty = 1.0
//! dry_duty = 0.0
//! ```
//!
//! Missing sections and fields fall back to the defaults below.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{require_positive, require_range, CalcError, Result};
use crate::models::DeviceEntry;

pub const MIN_GROWER_SKILL: f64 = 0.5;
pub const MAX_GROWER_SKILL: f64 = 1.5;

/// User-tunable calibration shared by the engines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// Display only
    pub currency_symbol: String,
    pub kwh_cost: f64,
    /// 0.5 = newbie, 1.0 = average, 1.5 = master grower
    pub grower_skill: f64,
    /// Reference max LED efficiency (g/W)
    pub ref_grams_per_watt: f64,
    /// Reference max canopy density (g/sqft)
    pub ref_grams_per_sqft: f64,
    /// Used for the market value estimate only
    pub price_per_ounce: f64,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_string(),
            kwh_cost: 0.14,
            grower_skill: 1.0,
            ref_grams_per_watt: 2.2,
            ref_grams_per_sqft: 65.0,
            price_per_ounce: 150.0,
        }
    }
}

impl GlobalConfig {
    pub fn validate(&self) -> Result<()> {
        require_range("kwh_cost", self.kwh_cost, 0.0, f64::MAX)?;
        require_range(
            "grower_skill",
            self.grower_skill,
            MIN_GROWER_SKILL,
            MAX_GROWER_SKILL,
        )?;
        require_positive("ref_grams_per_watt", self.ref_grams_per_watt)?;
        require_positive("ref_grams_per_sqft", self.ref_grams_per_sqft)?;
        require_range("price_per_ounce", self.price_per_ounce, 0.0, f64::MAX)?;
        Ok(())
    }
}

/// Length of each phase of one grow cycle, in days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CycleDurations {
    /// 18/6 light schedule
    pub veg_days: u32,
    /// 12/12 light schedule
    pub flower_days: u32,
    /// Lights off, climate gear running 24/7
    pub dry_days: u32,
}

impl Default for CycleDurations {
    fn default() -> Self {
        Self {
            veg_days: 35,
            flower_days: 63,
            dry_days: 14,
        }
    }
}

/// Seed loadout for a typical tent, with the main light drawing `light_watts`
pub fn default_devices(light_watts: f64) -> Vec<DeviceEntry> {
    vec![
        DeviceEntry::new("Main Grow Light", light_watts, 1.0, 1.0, 0.0),
        DeviceEntry::new("Inline Fan (Exhaust)", 60.0, 0.5, 1.0, 0.5),
        DeviceEntry::new("Clip Fans", 30.0, 1.0, 1.0, 1.0),
        DeviceEntry::new("Dehumidifier", 400.0, 0.1, 0.4, 0.3),
        DeviceEntry::new("AC Unit", 800.0, 0.0, 0.0, 0.0),
        DeviceEntry::new("Humidifier", 50.0, 0.5, 0.1, 0.0),
        DeviceEntry::new("Heater", 1000.0, 0.0, 0.0, 0.0),
    ]
}

/// Contents of a grow configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowFile {
    pub global: GlobalConfig,
    pub cycle: CycleDurations,
    /// Replaces the default loadout when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub devices: Option<Vec<DeviceEntry>>,
}

impl GrowFile {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: GrowFile =
            toml::from_str(content).map_err(|e| CalcError::Config(e.to_string()))?;
        file.global.validate()?;
        Ok(file)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CalcError::Config(format!("failed to read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| CalcError::Config(e.to_string()))
    }

    /// Loadout from the file, or the default seed list built around `light_watts`
    pub fn devices_or_default(&self, light_watts: f64) -> Vec<DeviceEntry> {
        match &self.devices {
            Some(devices) => devices.clone(),
            None => default_devices(light_watts),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DeviceKind;

    #[test]
    fn test_defaults_are_valid() {
        let config = GlobalConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.ref_grams_per_watt, 2.2);
        assert_eq!(config.ref_grams_per_sqft, 65.0);
        assert_eq!(CycleDurations::default().flower_days, 63);
    }

    #[test]
    fn test_skill_out_of_range() {
        let config = GlobalConfig {
            grower_skill: 1.6,
            ..GlobalConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(CalcError::OutOfRangeConfig {
                field: "grower_skill",
                ..
            })
        ));
    }

    #[test]
    fn test_negative_kwh_cost_rejected() {
        let config = GlobalConfig {
            kwh_cost: -0.01,
            ..GlobalConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_seed_list() {
        let devices = default_devices(480.0);
        assert_eq!(devices.len(), 7);
        assert_eq!(devices[0].watts, 480.0);
        assert_eq!(devices[0].kind(), DeviceKind::Light);
        assert!(devices[1..].iter().all(|d| d.kind() == DeviceKind::Climate));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let file = GrowFile::from_toml_str(
            r#"
[global]
kwh_cost = 0.31

[cycle]
veg_days = 28
"#,
        )
        .unwrap();

        assert_eq!(file.global.kwh_cost, 0.31);
        assert_eq!(file.global.grower_skill, 1.0);
        assert_eq!(file.cycle.veg_days, 28);
        assert_eq!(file.cycle.flower_days, 63);
        assert!(file.devices.is_none());
        assert_eq!(file.devices_or_default(600.0).len(), 7);
    }

    #[test]
    fn test_file_with_devices() {
        let file = GrowFile::from_toml_str(
            r#"
[[devices]]
name = "Bar"
watts = 300.0
veg_duty = 1.0
flower_duty = 1.0
dry_duty = 0.0
kind = "light"

[[devices]]
name = "Fan"
watts = 25.0
veg_duty = 1.0
flower_duty = 1.0
dry_duty = 1.0
"#,
        )
        .unwrap();

        let devices = file.devices_or_default(600.0);
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].kind(), DeviceKind::Light);
        assert_eq!(devices[1].kind(), DeviceKind::Climate);
    }

    #[test]
    fn test_invalid_file_rejected() {
        assert!(matches!(
            GrowFile::from_toml_str("[global]\ngrower_skill = 3.0\n"),
            Err(CalcError::OutOfRangeConfig { .. })
        ));
        assert!(matches!(
            GrowFile::from_toml_str("[global\n"),
            Err(CalcError::Config(_))
        ));
    }

    #[test]
    fn test_toml_roundtrip_of_defaults() {
        let text = GrowFile::default().to_toml_string().unwrap();
        let parsed = GrowFile::from_toml_str(&text).unwrap();
        assert_eq!(parsed, GrowFile::default());
    }
}
