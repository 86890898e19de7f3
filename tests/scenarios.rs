//! End-to-end scenarios through the public library API

use std::collections::BTreeSet;

use approx::{assert_abs_diff_eq, assert_relative_eq};

use grow_calculator::config::{default_devices, CycleDurations, GlobalConfig};
use grow_calculator::energy::compute_energy;
use grow_calculator::extraction::compute_extraction;
use grow_calculator::models::{
    BiologyInput, Bottleneck, DeviceEntry, EnvironmentInput, ExtractionInput, ExtractionParams,
    LightTech, LightingInput, MassUnit, MediumType, SetupTier, SourceMaterial, StrainType,
    TrainingMethod,
};
use grow_calculator::recommender::recommend;
use grow_calculator::yields::{compute_yield, training_multiplier};
use grow_calculator::CalcError;

fn biology(plants: u32, pot: f64, medium: MediumType, training: &[TrainingMethod]) -> BiologyInput {
    BiologyInput {
        plant_count: plants,
        pot_size_gallons: pot,
        strain_type: StrainType::Photoperiod,
        training_methods: training.iter().copied().collect::<BTreeSet<_>>(),
        medium_type: medium,
    }
}

#[test]
fn test_reference_tent_yields_820g() {
    let env = EnvironmentInput {
        length_ft: 4.0,
        width_ft: 4.0,
    };
    let lighting = LightingInput {
        true_watts: 600.0,
        light_tech: LightTech::HighEndLed,
        co2_supplemented: false,
    };
    let result = compute_yield(
        &env,
        &lighting,
        &biology(4, 5.0, MediumType::Soil, &[]),
        &GlobalConfig::default(),
    )
    .unwrap();

    assert_relative_eq!(result.limit_light_grams, 1320.0);
    assert_relative_eq!(result.limit_space_grams, 1040.0);
    assert_relative_eq!(result.limit_root_grams, 820.0);
    assert_eq!(result.bottleneck, Bottleneck::Root);
    assert_relative_eq!(result.predicted_grams, 820.0);
}

#[test]
fn test_yield_bounds_hold_across_inputs() {
    let config = GlobalConfig {
        grower_skill: 1.3,
        ..GlobalConfig::default()
    };
    let techs = [
        LightTech::HighEndLed,
        LightTech::BudgetLed,
        LightTech::HpsCmh,
        LightTech::Blurple,
    ];
    let media = [
        MediumType::Soil,
        MediumType::Coco,
        MediumType::Hydro,
        MediumType::Aero,
    ];
    let training = [TrainingMethod::Topping, TrainingMethod::Scrog];

    for watts in [100.0, 450.0, 1000.0, 2000.0] {
        for side in [2.0, 4.0, 8.0] {
            for tech in techs {
                for medium in media {
                    let env = EnvironmentInput {
                        length_ft: side,
                        width_ft: side,
                    };
                    let lighting = LightingInput {
                        true_watts: watts,
                        light_tech: tech,
                        co2_supplemented: watts > 900.0,
                    };
                    let bio = biology(6, 7.0, medium, &training);
                    let result = compute_yield(&env, &lighting, &bio, &config).unwrap();

                    let floor = result
                        .limit_light_grams
                        .min(result.limit_space_grams)
                        .min(result.limit_root_grams);
                    let bound = floor
                        * config.grower_skill
                        * training_multiplier(&bio)
                        * medium.efficiency();
                    assert!(result.predicted_grams <= bound + 1e-9);
                    assert!(result.predicted_grams <= watts * 3.0 + 1e-9);

                    let expected = match result.bottleneck {
                        Bottleneck::Light => result.limit_light_grams,
                        Bottleneck::Space => result.limit_space_grams,
                        Bottleneck::Root => result.limit_root_grams,
                    };
                    assert_eq!(expected, floor);
                }
            }
        }
    }
}

#[test]
fn test_single_light_energy_bill() {
    let light = DeviceEntry::new("Main Grow Light", 600.0, 1.0, 1.0, 0.0);
    let cycle = CycleDurations {
        veg_days: 35,
        flower_days: 63,
        dry_days: 14,
    };
    let result = compute_energy(&[light], &cycle, 0.14, None).unwrap();

    assert_relative_eq!(result.phase_kwh.veg, 378.0);
    assert_relative_eq!(result.phase_kwh.flower, 453.6);
    assert_abs_diff_eq!(result.total_cost, 116.424, epsilon = 1e-9);
}

#[test]
fn test_default_loadout_costs_add_up() {
    let result = compute_energy(
        &default_devices(600.0),
        &CycleDurations::default(),
        0.14,
        None,
    )
    .unwrap();

    let by_device: f64 = result.devices.iter().map(|d| d.cost.total()).sum();
    assert_abs_diff_eq!(by_device, result.total_cost, epsilon = 1e-9);
    assert_abs_diff_eq!(result.phase_costs.total(), result.total_cost, epsilon = 1e-12);
    assert_abs_diff_eq!(result.total_kwh * 0.14, result.total_cost, epsilon = 1e-9);
}

#[test]
fn test_extraction_never_gains_mass() {
    for pct in [0.0, 10.0, 33.3, 75.0, 100.0] {
        let params = ExtractionParams {
            press_return_pct: pct,
            wash_yield_pct: pct,
            press_yield_pct: pct,
        };
        let wet = compute_extraction(&ExtractionInput {
            source_material: SourceMaterial::FreshFrozen,
            input_mass_grams: 1000.0,
            params,
        })
        .unwrap();
        let hash = wet.hash_grams.unwrap();
        assert!(wet.rosin_grams <= hash && hash <= 1000.0);
    }
}

#[test]
fn test_one_pound_recommendation() {
    let rec = recommend(1.0, MassUnit::Pounds).unwrap();
    assert_eq!(rec.target_grams, 453.59);
    assert_abs_diff_eq!(rec.required_watts, 302.39, epsilon = 0.005);
    assert_abs_diff_eq!(rec.required_sqft, 11.34, epsilon = 0.005);
    assert_eq!(rec.tier, SetupTier::Standard);
    assert_eq!(rec.tent, "4x4 Tent");
    assert_eq!(rec.light, "600-720W Bar LED");
}

#[test]
fn test_invalid_inputs_are_domain_errors() {
    let env = EnvironmentInput {
        length_ft: 4.0,
        width_ft: -4.0,
    };
    let lighting = LightingInput {
        true_watts: 600.0,
        light_tech: LightTech::HighEndLed,
        co2_supplemented: false,
    };
    let err = compute_yield(
        &env,
        &lighting,
        &biology(4, 5.0, MediumType::Soil, &[]),
        &GlobalConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, CalcError::InvalidDimension { .. }));

    let err = compute_energy(
        &[DeviceEntry::new("Fan", 60.0, 0.5, -0.5, 0.5)],
        &CycleDurations::default(),
        0.14,
        None,
    )
    .unwrap_err();
    assert!(matches!(err, CalcError::OutOfRangeConfig { .. }));
}
