//! Solventless extraction: flower rosin, or ice water hash pressed to live rosin

use std::ops::RangeInclusive;

use tracing::debug;

use crate::error::{require_range, Result};
use crate::models::{ExtractionInput, ExtractionParams, ExtractionResult, SourceMaterial};

/// Typical press return for dry cured flower, in percent
pub const PRESS_RETURN_BAND: RangeInclusive<f64> = 10.0..=30.0;
/// Typical wash yield for whole-plant fresh frozen, in percent of wet weight
pub const WASH_YIELD_BAND: RangeInclusive<f64> = 1.0..=8.0;
/// Typical hash-to-rosin press yield, in percent
pub const PRESS_YIELD_BAND: RangeInclusive<f64> = 40.0..=90.0;

fn fraction(field: &'static str, pct: f64) -> Result<f64> {
    Ok(require_range(field, pct, 0.0, 100.0)? / 100.0)
}

/// Parameters that fall outside the usual bands for the chosen material.
///
/// These are still computed; the caller decides whether to warn.
pub fn atypical_params(
    material: SourceMaterial,
    params: &ExtractionParams,
) -> Vec<(&'static str, f64, RangeInclusive<f64>)> {
    let checks = match material {
        SourceMaterial::DryCured => vec![(
            "press_return_pct",
            params.press_return_pct,
            PRESS_RETURN_BAND,
        )],
        SourceMaterial::FreshFrozen => vec![
            ("wash_yield_pct", params.wash_yield_pct, WASH_YIELD_BAND),
            ("press_yield_pct", params.press_yield_pct, PRESS_YIELD_BAND),
        ],
    };

    checks
        .into_iter()
        .filter(|(_, value, band)| !band.contains(value))
        .collect()
}

pub fn compute_extraction(input: &ExtractionInput) -> Result<ExtractionResult> {
    let mass = require_range("input_mass_grams", input.input_mass_grams, 0.0, f64::MAX)?;
    let params = &input.params;

    let (hash_grams, rosin_grams) = match input.source_material {
        SourceMaterial::DryCured => {
            let rosin = mass * fraction("press_return_pct", params.press_return_pct)?;
            (None, rosin)
        }
        SourceMaterial::FreshFrozen => {
            let hash = mass * fraction("wash_yield_pct", params.wash_yield_pct)?;
            let rosin = hash * fraction("press_yield_pct", params.press_yield_pct)?;
            (Some(hash), rosin)
        }
    };

    debug!(
        target: "grow.extract",
        material = ?input.source_material,
        mass,
        ?hash_grams,
        rosin_grams,
        "Extraction computed"
    );

    Ok(ExtractionResult {
        source_material: input.source_material,
        input_mass_grams: mass,
        hash_grams,
        rosin_grams,
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::error::CalcError;

    fn input(material: SourceMaterial, grams: f64, params: ExtractionParams) -> ExtractionInput {
        ExtractionInput {
            source_material: material,
            input_mass_grams: grams,
            params,
        }
    }

    #[test]
    fn test_dry_cured_single_stage() {
        let result = compute_extraction(&input(
            SourceMaterial::DryCured,
            453.59,
            ExtractionParams::default(),
        ))
        .unwrap();
        assert_eq!(result.hash_grams, None);
        assert_relative_eq!(result.rosin_grams, 453.59 * 0.20);
    }

    #[test]
    fn test_fresh_frozen_two_stage() {
        let result = compute_extraction(&input(
            SourceMaterial::FreshFrozen,
            2000.0,
            ExtractionParams::default(),
        ))
        .unwrap();
        let hash = result.hash_grams.unwrap();
        assert_relative_eq!(hash, 80.0);
        assert_relative_eq!(result.rosin_grams, 60.0);
    }

    #[test]
    fn test_unused_params_are_ignored() {
        let params = ExtractionParams {
            press_return_pct: 20.0,
            wash_yield_pct: 400.0,
            press_yield_pct: -1.0,
        };
        assert!(compute_extraction(&input(SourceMaterial::DryCured, 100.0, params)).is_ok());
        assert!(compute_extraction(&input(SourceMaterial::FreshFrozen, 100.0, params)).is_err());
    }

    #[test]
    fn test_masses_never_grow() {
        for pct in [0.0, 0.5, 12.5, 50.0, 99.9, 100.0] {
            let params = ExtractionParams {
                press_return_pct: pct,
                wash_yield_pct: pct,
                press_yield_pct: pct,
            };
            let dry = compute_extraction(&input(SourceMaterial::DryCured, 250.0, params)).unwrap();
            assert!(dry.rosin_grams <= 250.0);

            let wet =
                compute_extraction(&input(SourceMaterial::FreshFrozen, 250.0, params)).unwrap();
            let hash = wet.hash_grams.unwrap();
            assert!(wet.rosin_grams <= hash);
            assert!(hash <= 250.0);
        }
    }

    #[test]
    fn test_out_of_range_rejected() {
        let params = ExtractionParams {
            press_return_pct: 101.0,
            ..ExtractionParams::default()
        };
        let err = compute_extraction(&input(SourceMaterial::DryCured, 100.0, params)).unwrap_err();
        assert!(matches!(
            err,
            CalcError::OutOfRangeConfig {
                field: "press_return_pct",
                ..
            }
        ));

        assert!(compute_extraction(&input(
            SourceMaterial::DryCured,
            -1.0,
            ExtractionParams::default()
        ))
        .is_err());
    }

    #[test]
    fn test_zero_mass() {
        let result = compute_extraction(&input(
            SourceMaterial::FreshFrozen,
            0.0,
            ExtractionParams::default(),
        ))
        .unwrap();
        assert_eq!(result.hash_grams, Some(0.0));
        assert_eq!(result.rosin_grams, 0.0);
    }

    #[test]
    fn test_atypical_params() {
        assert!(atypical_params(SourceMaterial::DryCured, &ExtractionParams::default()).is_empty());

        let params = ExtractionParams {
            press_return_pct: 35.0,
            wash_yield_pct: 9.0,
            press_yield_pct: 75.0,
        };
        let dry = atypical_params(SourceMaterial::DryCured, &params);
        assert_eq!(dry.len(), 1);
        assert_eq!(dry[0].0, "press_return_pct");

        let wet = atypical_params(SourceMaterial::FreshFrozen, &params);
        assert_eq!(wet.len(), 1);
        assert_eq!(wet[0].0, "wash_yield_pct");
    }
}
