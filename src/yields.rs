//! Yield prediction using a limiting-factor model
//!
//! Three independent ceilings are computed (light, canopy space, root/plant
//! capacity) and the harvest is bounded by the smallest of them. Modifiers for
//! grower skill, training and medium scale that bottleneck, and the result is
//! finally capped at what the light source can physically support.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GlobalConfig;
use crate::error::{require_positive, require_range, safe_ratio, Result};
use crate::models::{
    BiologyInput, Bottleneck, EnvironmentInput, LightingInput, TrainingMethod, YieldResult,
    GRAMS_PER_OUNCE,
};

/// Light ceiling multiplier with supplemental CO2 (>1200ppm)
pub const CO2_MULTIPLIER: f64 = 1.25;
/// Hard physical cap, grams per watt at the wall
pub const MAX_GRAMS_PER_WATT: f64 = 3.0;
pub const TRAINING_BONUS_PER_METHOD: f64 = 0.08;
pub const SCROG_BONUS: f64 = 0.05;
/// Per-plant root capacity: base grams plus grams per gallon of pot
pub const ROOT_BASE_GRAMS: f64 = 30.0;
pub const ROOT_GRAMS_PER_GALLON: f64 = 35.0;

/// Training multiplier: +8% per method, plus a flat +5% when a scrog net is used
pub fn training_multiplier(biology: &BiologyInput) -> f64 {
    let methods = &biology.training_methods;
    let mut mult = 1.0 + methods.len() as f64 * TRAINING_BONUS_PER_METHOD;
    if methods.contains(&TrainingMethod::Scrog) {
        mult += SCROG_BONUS;
    }
    mult
}

/// Maximum grams a single plant can carry given pot volume, medium and genetics
pub fn per_plant_max(biology: &BiologyInput) -> f64 {
    let root_capacity = ROOT_BASE_GRAMS
        + biology.pot_size_gallons * ROOT_GRAMS_PER_GALLON * biology.medium_type.root_efficiency();
    root_capacity.min(biology.strain_type.plant_ceiling_grams())
}

/// Pick the binding ceiling. Exact ties resolve light, then space, then root.
pub fn select_bottleneck(light: f64, space: f64, root: f64) -> (Bottleneck, f64) {
    let ordered = [
        (Bottleneck::Light, light),
        (Bottleneck::Space, space),
        (Bottleneck::Root, root),
    ];

    let mut best = ordered[0];
    for candidate in &ordered[1..] {
        if candidate.1 < best.1 {
            best = *candidate;
        }
    }
    best
}

/// Predict dry harvest mass for one grow
pub fn compute_yield(
    env: &EnvironmentInput,
    lighting: &LightingInput,
    biology: &BiologyInput,
    config: &GlobalConfig,
) -> Result<YieldResult> {
    require_positive("length_ft", env.length_ft)?;
    require_positive("width_ft", env.width_ft)?;
    require_positive("true_watts", lighting.true_watts)?;
    require_positive("pot_size_gallons", biology.pot_size_gallons)?;
    require_positive("plant_count", biology.plant_count as f64)?;
    config.validate()?;

    let light_eff = lighting.light_tech.efficiency();
    let med_eff = biology.medium_type.efficiency();
    let train_mult = training_multiplier(biology);

    let co2_mult = if lighting.co2_supplemented {
        CO2_MULTIPLIER
    } else {
        1.0
    };
    // Finite inputs can still multiply past f64::MAX
    let limit_light = require_range(
        "limit_light_grams",
        lighting.true_watts * config.ref_grams_per_watt * light_eff * co2_mult,
        0.0,
        f64::MAX,
    )?;
    let limit_space = require_range(
        "limit_space_grams",
        env.area_sqft() * config.ref_grams_per_sqft,
        0.0,
        f64::MAX,
    )?;
    let limit_root = require_range(
        "limit_root_grams",
        per_plant_max(biology) * biology.plant_count as f64,
        0.0,
        f64::MAX,
    )?;

    let (bottleneck, ceiling) = select_bottleneck(limit_light, limit_space, limit_root);

    let uncapped = ceiling * config.grower_skill * train_mult * med_eff;
    let max_physics = require_range(
        "max_physics_grams",
        lighting.true_watts * MAX_GRAMS_PER_WATT,
        0.0,
        f64::MAX,
    )?;
    let capped = uncapped > max_physics;
    let predicted = uncapped.min(max_physics);

    debug!(
        target: "grow.yield",
        limit_light,
        limit_space,
        limit_root,
        ?bottleneck,
        train_mult,
        med_eff,
        predicted,
        capped,
        "Yield computed"
    );

    Ok(YieldResult {
        predicted_grams: predicted,
        limit_light_grams: limit_light,
        limit_space_grams: limit_space,
        limit_root_grams: limit_root,
        bottleneck,
        capped,
    })
}

/// Headline figures derived from a prediction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YieldMetrics {
    pub predicted_ounces: f64,
    pub grams_per_watt: f64,
    pub grams_per_sqft: f64,
    pub market_value: f64,
}

pub fn yield_metrics(
    result: &YieldResult,
    env: &EnvironmentInput,
    lighting: &LightingInput,
    config: &GlobalConfig,
) -> YieldMetrics {
    let ounces = result.predicted_grams / GRAMS_PER_OUNCE;
    YieldMetrics {
        predicted_ounces: ounces,
        grams_per_watt: safe_ratio(result.predicted_grams, lighting.true_watts),
        grams_per_sqft: safe_ratio(result.predicted_grams, env.area_sqft()),
        market_value: ounces * config.price_per_ounce,
    }
}
