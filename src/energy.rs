//! Electricity consumption and cost over a veg / flower / dry timeline

use tracing::debug;

use crate::config::CycleDurations;
use crate::error::{require_range, safe_ratio, Result};
use crate::models::{DeviceEntry, DeviceKind, DeviceUsage, EnergyResult, Phase, PhaseBreakdown};

/// Hours per day a device of the given kind draws power during a phase, at 100% duty
pub fn active_hours(kind: DeviceKind, phase: Phase) -> f64 {
    match (kind, phase) {
        (DeviceKind::Light, Phase::Veg) => 18.0,
        (DeviceKind::Light, Phase::Flower) => 12.0,
        (DeviceKind::Light, Phase::Dry) => 0.0,
        (DeviceKind::Climate, _) => 24.0,
    }
}

fn phase_days(cycle: &CycleDurations, phase: Phase) -> f64 {
    match phase {
        Phase::Veg => cycle.veg_days as f64,
        Phase::Flower => cycle.flower_days as f64,
        Phase::Dry => cycle.dry_days as f64,
    }
}

/// Watts must be non-negative and every duty cycle within [0, 1]
pub fn validate_device(device: &DeviceEntry) -> Result<()> {
    require_range("watts", device.watts, 0.0, f64::MAX)?;
    require_range("veg_duty", device.veg_duty, 0.0, 1.0)?;
    require_range("flower_duty", device.flower_duty, 0.0, 1.0)?;
    require_range("dry_duty", device.dry_duty, 0.0, 1.0)?;
    Ok(())
}

/// Energy drawn by one device in each phase, in kWh
pub fn device_kwh(device: &DeviceEntry, cycle: &CycleDurations) -> PhaseBreakdown {
    let kind = device.kind();
    let mut kwh = PhaseBreakdown::default();
    for phase in Phase::ALL {
        let energy = device.watts
            * active_hours(kind, phase)
            * device.duty(phase)
            * phase_days(cycle, phase)
            / 1000.0;
        kwh.add(phase, energy);
    }
    kwh
}

/// Compute cycle energy and cost for a loadout.
///
/// The whole list is validated before anything is summed, so a bad row fails
/// the call instead of being skipped. `predicted_grams`, usually taken from a
/// `YieldResult`, is only used for the cost-per-gram figure.
pub fn compute_energy(
    devices: &[DeviceEntry],
    cycle: &CycleDurations,
    kwh_cost: f64,
    predicted_grams: Option<f64>,
) -> Result<EnergyResult> {
    require_range("kwh_cost", kwh_cost, 0.0, f64::MAX)?;
    for device in devices {
        validate_device(device)?;
    }

    let mut phase_kwh = PhaseBreakdown::default();
    let mut phase_costs = PhaseBreakdown::default();
    let mut usage = Vec::with_capacity(devices.len());

    for device in devices {
        let kwh = device_kwh(device, cycle);
        let mut cost = PhaseBreakdown::default();
        for phase in Phase::ALL {
            let phase_cost = kwh.get(phase) * kwh_cost;
            cost.add(phase, phase_cost);
            phase_kwh.add(phase, kwh.get(phase));
            phase_costs.add(phase, phase_cost);
        }

        debug!(
            target: "grow.energy",
            device = %device.name,
            kwh = kwh.total(),
            cost = cost.total(),
            "Device usage"
        );

        usage.push(DeviceUsage {
            name: device.name.clone(),
            kind: device.kind(),
            kwh,
            cost,
        });
    }

    let total_cost = phase_costs.total();
    let cost_per_gram = safe_ratio(total_cost, predicted_grams.unwrap_or(0.0));

    debug!(
        target: "grow.energy",
        devices = devices.len(),
        total_kwh = phase_kwh.total(),
        total_cost,
        cost_per_gram,
        "Energy computed"
    );

    Ok(EnergyResult {
        total_kwh: phase_kwh.total(),
        total_cost,
        phase_kwh,
        phase_costs,
        devices: usage,
        cost_per_gram,
    })
}
