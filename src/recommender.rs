//! Reverse calculation: from a target harvest to the hardware needed for it

use tracing::debug;

use crate::error::{require_range, Result};
use crate::models::{MassUnit, RecommendationResult, SetupTier};

/// Average achievable efficiency, fixed independently of the yield calibration
pub const AVERAGE_GRAMS_PER_WATT: f64 = 1.5;
/// Average achievable canopy density
pub const AVERAGE_GRAMS_PER_SQFT: f64 = 40.0;
/// Roughly 4oz per plant in a 5 gallon pot
pub const GRAMS_PER_PLANT: f64 = 112.0;

/// Upper bounds (exclusive) of required canopy area for each tier
const TIER_BANDS: [(f64, SetupTier); 4] = [
    (5.0, SetupTier::Micro),
    (10.0, SetupTier::Small),
    (17.0, SetupTier::Standard),
    (26.0, SetupTier::Large),
];

pub fn tier_for_area(required_sqft: f64) -> SetupTier {
    TIER_BANDS
        .iter()
        .find(|(upper, _)| required_sqft < *upper)
        .map_or(SetupTier::Room, |(_, tier)| *tier)
}

pub fn recommend(target_value: f64, target_unit: MassUnit) -> Result<RecommendationResult> {
    require_range("target_value", target_value, 0.0, f64::MAX)?;

    let target_grams = require_range(
        "target_grams",
        target_unit.to_grams(target_value),
        0.0,
        f64::MAX,
    )?;
    let required_watts = target_grams / AVERAGE_GRAMS_PER_WATT;
    let required_sqft = target_grams / AVERAGE_GRAMS_PER_SQFT;
    let tier = tier_for_area(required_sqft);

    // Checked before the cast so a huge target cannot saturate to u32::MAX
    let plants = (target_grams / GRAMS_PER_PLANT).ceil();
    let estimated_plants =
        require_range("estimated_plants", plants, 0.0, u32::MAX as f64)? as u32;

    debug!(
        target: "grow.recommend",
        target_grams,
        required_watts,
        required_sqft,
        ?tier,
        estimated_plants,
        "Recommendation computed"
    );

    Ok(RecommendationResult {
        target_grams,
        required_watts,
        required_sqft,
        tier,
        tent: tier.tent_label().to_string(),
        light: tier.light_label().to_string(),
        estimated_plants,
    })
}
