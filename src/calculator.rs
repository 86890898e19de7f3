//! Full grow plan: yield feeds energy and extraction in one pass

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{CycleDurations, GlobalConfig};
use crate::energy::compute_energy;
use crate::error::Result;
use crate::extraction::compute_extraction;
use crate::models::{
    BiologyInput, DeviceEntry, EnergyResult, EnvironmentInput, ExtractionInput, ExtractionParams,
    ExtractionResult, LightingInput, Phase, RecommendationResult, SourceMaterial, YieldResult,
    GRAMS_PER_OUNCE,
};
use crate::yields::{compute_yield, yield_metrics, YieldMetrics};

/// Everything needed to run all three forward engines
#[derive(Debug, Clone)]
pub struct PlanInput {
    pub env: EnvironmentInput,
    pub lighting: LightingInput,
    pub biology: BiologyInput,
    pub devices: Vec<DeviceEntry>,
    pub cycle: CycleDurations,
    pub source_material: SourceMaterial,
    pub extraction_params: ExtractionParams,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowPlan {
    pub currency_symbol: String,
    pub yield_result: YieldResult,
    pub metrics: YieldMetrics,
    pub energy: EnergyResult,
    pub extraction: ExtractionResult,
}

/// Predict the harvest, then cost it and run the whole harvest through extraction
pub fn calculate_grow_plan(input: &PlanInput, config: &GlobalConfig) -> Result<GrowPlan> {
    let yield_result = compute_yield(&input.env, &input.lighting, &input.biology, config)?;
    let metrics = yield_metrics(&yield_result, &input.env, &input.lighting, config);

    let energy = compute_energy(
        &input.devices,
        &input.cycle,
        config.kwh_cost,
        Some(yield_result.predicted_grams),
    )?;

    let extraction = compute_extraction(&ExtractionInput {
        source_material: input.source_material,
        input_mass_grams: yield_result.predicted_grams,
        params: input.extraction_params,
    })?;

    Ok(GrowPlan {
        currency_symbol: config.currency_symbol.clone(),
        yield_result,
        metrics,
        energy,
        extraction,
    })
}

/// Format a yield prediction with its bottleneck analysis
pub fn format_yield(result: &YieldResult, metrics: &YieldMetrics, currency: &str) -> String {
    let mut output = String::new();
    output.push_str("=== Yield Prediction ===\n");
    output.push_str(&format!(
        "Predicted dry weight: {:.0} g ({:.1} oz)\n",
        result.predicted_grams, metrics.predicted_ounces
    ));
    output.push_str(&format!("Efficiency:           {:.2} g/W\n", metrics.grams_per_watt));
    output.push_str(&format!("Canopy density:       {:.1} g/sqft\n", metrics.grams_per_sqft));
    output.push_str(&format!(
        "Market value:         {}{:.0}\n",
        currency, metrics.market_value
    ));
    if result.capped {
        output.push_str("  (capped at the light's physical maximum)\n");
    }
    output.push('\n');

    output.push_str("Ceilings:\n");
    output.push_str(&format!("  Light limit:      {:>8.0} g\n", result.limit_light_grams));
    output.push_str(&format!("  Space limit:      {:>8.0} g\n", result.limit_space_grams));
    output.push_str(&format!("  Root/Plant limit: {:>8.0} g\n", result.limit_root_grams));
    output.push_str(&format!(
        "Limiting factor: {}. {}\n",
        result.bottleneck,
        result.bottleneck.advice()
    ));
    output
}

pub fn format_energy(result: &EnergyResult, currency: &str) -> String {
    let mut output = String::new();
    output.push_str("=== Energy ===\n");
    output.push_str(&format!(
        "{:<24} {:>10} {:>10} {:>10} {:>10}\n",
        "Device", "Veg kWh", "Flower kWh", "Dry kWh", "Cost"
    ));
    output.push_str(&format!("{}\n", "-".repeat(68)));
    for device in &result.devices {
        output.push_str(&format!(
            "{:<24} {:>10.1} {:>10.1} {:>10.1} {:>10}\n",
            device.name,
            device.kwh.veg,
            device.kwh.flower,
            device.kwh.dry,
            format!("{}{:.2}", currency, device.cost.total())
        ));
    }
    output.push('\n');

    output.push_str("Phase costs:\n");
    for phase in Phase::ALL {
        output.push_str(&format!(
            "  {:<7} {}{:.2} ({:.1} kWh)\n",
            phase,
            currency,
            result.phase_costs.get(phase),
            result.phase_kwh.get(phase)
        ));
    }
    output.push_str(&format!(
        "Total:   {}{:.2} ({:.1} kWh)\n",
        currency, result.total_cost, result.total_kwh
    ));
    output.push_str(&format!("Cost per gram: {}{:.2}\n", currency, result.cost_per_gram));
    output
}

pub fn format_extraction(result: &ExtractionResult) -> String {
    let mut output = String::new();
    output.push_str("=== Extraction ===\n");
    output.push_str(&format!(
        "Input: {:.1} g ({:.1} oz)\n",
        result.input_mass_grams,
        result.input_mass_grams / GRAMS_PER_OUNCE
    ));
    match result.hash_grams {
        Some(hash) => {
            output.push_str(&format!("Bubble hash: {:.1} g\n", hash));
            output.push_str(&format!("Live rosin:  {:.1} g\n", result.rosin_grams));
        }
        None => {
            output.push_str(&format!("Flower rosin: {:.1} g\n", result.rosin_grams));
        }
    }
    output
}

pub fn format_recommendation(result: &RecommendationResult) -> String {
    let mut output = String::new();
    output.push_str("=== Setup Recommendation ===\n");
    output.push_str(&format!("Target: {:.0} g\n", result.target_grams));
    output.push_str(&format!("Minimum light: {:.0} W\n", result.required_watts));
    output.push_str(&format!("Minimum space: {:.1} sqft\n", result.required_sqft));
    output.push_str(&format!("Tent:  {}\n", result.tent));
    output.push_str(&format!("Light: {}\n", result.light));
    output.push_str(&format!(
        "Plant count: {} plants in 5gal pots (estimated)\n",
        result.estimated_plants
    ));
    output
}

impl fmt::Display for GrowPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}",
            format_yield(&self.yield_result, &self.metrics, &self.currency_symbol)
        )?;
        writeln!(f, "{}", format_energy(&self.energy, &self.currency_symbol))?;
        write!(f, "{}", format_extraction(&self.extraction))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use approx::assert_relative_eq;

    use super::*;
    use crate::config::default_devices;
    use crate::models::{Bottleneck, LightTech, MassUnit, MediumType, StrainType};
    use crate::recommender::recommend;

    fn reference_plan() -> PlanInput {
        PlanInput {
            env: EnvironmentInput {
                length_ft: 4.0,
                width_ft: 4.0,
            },
            lighting: LightingInput {
                true_watts: 600.0,
                light_tech: LightTech::HighEndLed,
                co2_supplemented: false,
            },
            biology: BiologyInput {
                plant_count: 4,
                pot_size_gallons: 5.0,
                strain_type: StrainType::Photoperiod,
                training_methods: BTreeSet::new(),
                medium_type: MediumType::Soil,
            },
            devices: default_devices(600.0),
            cycle: CycleDurations::default(),
            source_material: SourceMaterial::DryCured,
            extraction_params: ExtractionParams::default(),
        }
    }

    #[test]
    fn test_plan_chains_yield_into_energy_and_extraction() {
        let plan = calculate_grow_plan(&reference_plan(), &GlobalConfig::default()).unwrap();

        assert_relative_eq!(plan.yield_result.predicted_grams, 820.0);
        assert_relative_eq!(plan.extraction.input_mass_grams, 820.0);
        assert_relative_eq!(plan.extraction.rosin_grams, 164.0);
        assert_relative_eq!(plan.energy.cost_per_gram, plan.energy.total_cost / 820.0);
    }

    #[test]
    fn test_plan_propagates_errors() {
        let mut input = reference_plan();
        input.devices.push(DeviceEntry::new("Broken", 10.0, 2.0, 0.0, 0.0));
        assert!(calculate_grow_plan(&input, &GlobalConfig::default()).is_err());
    }

    #[test]
    fn test_plan_summary_text() {
        let config = GlobalConfig {
            currency_symbol: "€".to_string(),
            ..GlobalConfig::default()
        };
        let plan = calculate_grow_plan(&reference_plan(), &config).unwrap();
        assert_eq!(plan.yield_result.bottleneck, Bottleneck::Root);

        let text = plan.to_string();
        assert!(text.contains("Predicted dry weight: 820 g"));
        assert!(text.contains("Limiting factor: ROOTS."));
        assert!(text.contains("Main Grow Light"));
        assert!(text.contains("€"));
        assert!(text.contains("Flower rosin: 164.0 g"));
    }

    #[test]
    fn test_recommendation_text() {
        let text = format_recommendation(&recommend(1.0, MassUnit::Pounds).unwrap());
        assert!(text.contains("Minimum light: 302 W"));
        assert!(text.contains("Minimum space: 11.3 sqft"));
        assert!(text.contains("Tent:  4x4 Tent"));
        assert!(text.contains("5 plants"));
    }
}
