//! Data models for grow inputs and calculation results

use std::collections::BTreeSet;
use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Lighting technology, ordered from most to least efficient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum LightTech {
    HighEndLed,
    BudgetLed,
    HpsCmh,
    Blurple,
}

impl LightTech {
    /// Fraction of the reference g/W a fixture of this class can reach
    pub fn efficiency(self) -> f64 {
        match self {
            LightTech::HighEndLed => 1.0,
            LightTech::BudgetLed => 0.85,
            LightTech::HpsCmh => 0.70,
            LightTech::Blurple => 0.50,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum MediumType {
    Soil,
    Coco,
    Hydro,
    Aero,
}

impl MediumType {
    /// Yield multiplier relative to soil
    pub fn efficiency(self) -> f64 {
        match self {
            MediumType::Soil => 1.0,
            MediumType::Coco => 1.10,
            MediumType::Hydro => 1.20,
            MediumType::Aero => 1.25,
        }
    }

    /// Root-zone efficiency per gallon; water culture roots do more with less volume
    pub fn root_efficiency(self) -> f64 {
        match self {
            MediumType::Hydro | MediumType::Aero => 1.5,
            MediumType::Soil | MediumType::Coco => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum StrainType {
    Photoperiod,
    Autoflower,
    Regular,
}

impl StrainType {
    /// Biological maximum for a single plant, in grams
    pub fn plant_ceiling_grams(self) -> f64 {
        match self {
            StrainType::Autoflower => 400.0,
            StrainType::Photoperiod | StrainType::Regular => 800.0,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum TrainingMethod {
    Topping,
    Lst,
    Scrog,
    Mainlining,
}

/// Tent footprint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentInput {
    pub length_ft: f64,
    pub width_ft: f64,
}

impl EnvironmentInput {
    pub fn area_sqft(&self) -> f64 {
        self.length_ft * self.width_ft
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightingInput {
    /// Measured draw at the wall, not the fixture's marketing rating
    pub true_watts: f64,
    pub light_tech: LightTech,
    pub co2_supplemented: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiologyInput {
    pub plant_count: u32,
    pub pot_size_gallons: f64,
    pub strain_type: StrainType,
    pub training_methods: BTreeSet<TrainingMethod>,
    pub medium_type: MediumType,
}

/// The resource that bounds the predicted yield
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Bottleneck {
    Light,
    Space,
    Root,
}

impl Bottleneck {
    /// What the grower should change to lift this ceiling
    pub fn advice(self) -> &'static str {
        match self {
            Bottleneck::Light => "You have enough space and plants, but not enough wattage.",
            Bottleneck::Space => "Your tent is too small for this much equipment/plants.",
            Bottleneck::Root => "Add more plants or bigger pots to utilize your light/space.",
        }
    }
}

impl fmt::Display for Bottleneck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Bottleneck::Light => "LIGHT",
            Bottleneck::Space => "SPACE",
            Bottleneck::Root => "ROOTS",
        };
        f.write_str(label)
    }
}

/// Result of a yield prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldResult {
    pub predicted_grams: f64,
    pub limit_light_grams: f64,
    pub limit_space_grams: f64,
    pub limit_root_grams: f64,
    pub bottleneck: Bottleneck,
    /// True when the physical watts x 3.0 cap was applied
    pub capped: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum DeviceKind {
    /// Runs on the photoperiod schedule and is off while drying
    Light,
    /// Fans, climate control and anything else that runs around the clock
    Climate,
}

/// One row of the equipment loadout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceEntry {
    pub name: String,
    pub watts: f64,
    pub veg_duty: f64,
    pub flower_duty: f64,
    pub dry_duty: f64,
    /// Explicit classification; inferred from the name when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<DeviceKind>,
}

impl DeviceEntry {
    pub fn new(name: &str, watts: f64, veg_duty: f64, flower_duty: f64, dry_duty: f64) -> Self {
        Self {
            name: name.to_string(),
            watts,
            veg_duty,
            flower_duty,
            dry_duty,
            kind: None,
        }
    }

    pub fn with_kind(mut self, kind: DeviceKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Resolved classification: the override if set, else any name containing "light"
    pub fn kind(&self) -> DeviceKind {
        match self.kind {
            Some(kind) => kind,
            None if self.name.to_ascii_lowercase().contains("light") => DeviceKind::Light,
            None => DeviceKind::Climate,
        }
    }

    pub fn duty(&self, phase: Phase) -> f64 {
        match phase {
            Phase::Veg => self.veg_duty,
            Phase::Flower => self.flower_duty,
            Phase::Dry => self.dry_duty,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Veg,
    Flower,
    Dry,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::Veg, Phase::Flower, Phase::Dry];
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Phase::Veg => "Veg",
            Phase::Flower => "Flower",
            Phase::Dry => "Dry",
        };
        f.write_str(label)
    }
}

/// A value split across the three cycle phases
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseBreakdown {
    pub veg: f64,
    pub flower: f64,
    pub dry: f64,
}

impl PhaseBreakdown {
    pub fn get(&self, phase: Phase) -> f64 {
        match phase {
            Phase::Veg => self.veg,
            Phase::Flower => self.flower,
            Phase::Dry => self.dry,
        }
    }

    pub fn add(&mut self, phase: Phase, value: f64) {
        match phase {
            Phase::Veg => self.veg += value,
            Phase::Flower => self.flower += value,
            Phase::Dry => self.dry += value,
        }
    }

    pub fn total(&self) -> f64 {
        self.veg + self.flower + self.dry
    }
}

/// Energy drawn by a single device over the cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceUsage {
    pub name: String,
    pub kind: DeviceKind,
    pub kwh: PhaseBreakdown,
    pub cost: PhaseBreakdown,
}

/// Result of an energy calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyResult {
    pub total_kwh: f64,
    pub total_cost: f64,
    pub phase_kwh: PhaseBreakdown,
    pub phase_costs: PhaseBreakdown,
    pub devices: Vec<DeviceUsage>,
    /// Zero when there is no predicted yield to spread the cost over
    pub cost_per_gram: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SourceMaterial {
    /// Dried and cured flower pressed directly
    DryCured,
    /// Whole-plant fresh frozen, washed to hash before pressing
    FreshFrozen,
}

/// Stage yield percentages; only the ones relevant to the material are used
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtractionParams {
    pub press_return_pct: f64,
    pub wash_yield_pct: f64,
    pub press_yield_pct: f64,
}

impl Default for ExtractionParams {
    fn default() -> Self {
        Self {
            press_return_pct: 20.0,
            wash_yield_pct: 4.0,
            press_yield_pct: 75.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtractionInput {
    pub source_material: SourceMaterial,
    pub input_mass_grams: f64,
    pub params: ExtractionParams,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub source_material: SourceMaterial,
    pub input_mass_grams: f64,
    /// Bubble hash after washing; only present for fresh frozen material
    pub hash_grams: Option<f64>,
    pub rosin_grams: f64,
}

/// Mass units accepted for targets and inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum MassUnit {
    Grams,
    Ounces,
    Pounds,
    Kilograms,
}

pub const GRAMS_PER_OUNCE: f64 = 28.35;
pub const GRAMS_PER_POUND: f64 = 453.59;
pub const GRAMS_PER_KILOGRAM: f64 = 1000.0;

impl MassUnit {
    pub fn grams_per_unit(self) -> f64 {
        match self {
            MassUnit::Grams => 1.0,
            MassUnit::Ounces => GRAMS_PER_OUNCE,
            MassUnit::Pounds => GRAMS_PER_POUND,
            MassUnit::Kilograms => GRAMS_PER_KILOGRAM,
        }
    }

    pub fn to_grams(self, value: f64) -> f64 {
        value * self.grams_per_unit()
    }
}

impl fmt::Display for MassUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MassUnit::Grams => "g",
            MassUnit::Ounces => "oz",
            MassUnit::Pounds => "lb",
            MassUnit::Kilograms => "kg",
        };
        f.write_str(label)
    }
}

/// Equipment band chosen from the required canopy area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SetupTier {
    Micro,
    Small,
    Standard,
    Large,
    Room,
}

impl SetupTier {
    pub fn tent_label(self) -> &'static str {
        match self {
            SetupTier::Micro => "2x2.5 or 2x4 Tent",
            SetupTier::Small => "3x3 or 2x4 Tent",
            SetupTier::Standard => "4x4 Tent",
            SetupTier::Large => "5x5 Tent",
            SetupTier::Room => "Multiple Tents or Dedicated Room",
        }
    }

    pub fn light_label(self) -> &'static str {
        match self {
            SetupTier::Micro => "200-300W LED",
            SetupTier::Small => "300-480W LED",
            SetupTier::Standard => "600-720W Bar LED",
            SetupTier::Large => "800-1000W Bar LED + CO2",
            SetupTier::Room => "Multi-light Setup",
        }
    }
}

/// Result of the reverse (target to hardware) calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub target_grams: f64,
    pub required_watts: f64,
    pub required_sqft: f64,
    pub tier: SetupTier,
    pub tent: String,
    pub light: String,
    pub estimated_plants: u32,
}
