//! Parsing of command-line quantities and device specs
//!
//! Masses are written the way growers say them (`1lb`, `2.5 oz`, `820g`).
//! Devices use a compact colon-separated form:
//!
//! ```text
//! Name:watts:veg_duty:flower_duty:dry_duty[:light|climate]
//! Main Grow Light:600:1:1:0
//! CMH 315:315:1:1:0:light
//! ```

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{CalcError, Result};
use crate::models::{DeviceEntry, DeviceKind, MassUnit};

static MASS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d+(?:\.\d*)?|\.\d+)\s*([A-Za-z]*)\s*$").expect("valid mass pattern")
});

static DEVICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    let number = r"\s*(\d+(?:\.\d*)?|\.\d+)\s*";
    Regex::new(&format!(
        r"^\s*([^:]*[^:\s])\s*:{n}:{n}:{n}:{n}(?::\s*(\w+)\s*)?$",
        n = number
    ))
    .expect("valid device pattern")
});

fn parse_error(input: &str, reason: impl Into<String>) -> CalcError {
    CalcError::Parse {
        input: input.to_string(),
        reason: reason.into(),
    }
}

fn unit_from_suffix(suffix: &str) -> Option<MassUnit> {
    match suffix.to_ascii_lowercase().as_str() {
        "g" | "gram" | "grams" => Some(MassUnit::Grams),
        "oz" | "ounce" | "ounces" => Some(MassUnit::Ounces),
        "lb" | "lbs" | "pound" | "pounds" => Some(MassUnit::Pounds),
        "kg" | "kilo" | "kilos" | "kilogram" | "kilograms" => Some(MassUnit::Kilograms),
        _ => None,
    }
}

/// Parse a mass such as `1lb` or `2.5 oz`; a bare number is read in `default_unit`
pub fn parse_mass(input: &str, default_unit: MassUnit) -> Result<(f64, MassUnit)> {
    let cap = MASS_RE
        .captures(input)
        .ok_or_else(|| parse_error(input, "expected a number with an optional unit"))?;

    let value = cap[1]
        .parse::<f64>()
        .map_err(|e| parse_error(input, e.to_string()))?;

    let unit = match &cap[2] {
        "" => default_unit,
        suffix => unit_from_suffix(suffix)
            .ok_or_else(|| parse_error(input, format!("unknown mass unit '{}'", suffix)))?,
    };

    Ok((value, unit))
}

/// Parse a device spec of the form `Name:watts:veg:flower:dry[:kind]`
pub fn parse_device(input: &str) -> Result<DeviceEntry> {
    let cap = DEVICE_RE
        .captures(input)
        .ok_or_else(|| parse_error(input, "expected Name:watts:veg:flower:dry[:kind]"))?;

    let mut fields = [0.0; 4];
    for (i, slot) in fields.iter_mut().enumerate() {
        *slot = cap[i + 2]
            .parse::<f64>()
            .map_err(|e| parse_error(input, e.to_string()))?;
    }
    let [watts, veg, flower, dry] = fields;

    let mut device = DeviceEntry::new(&cap[1], watts, veg, flower, dry);
    if let Some(kind) = cap.get(6) {
        let kind = match kind.as_str().to_ascii_lowercase().as_str() {
            "light" => DeviceKind::Light,
            "climate" => DeviceKind::Climate,
            other => return Err(parse_error(input, format!("unknown device kind '{}'", other))),
        };
        device = device.with_kind(kind);
    }

    Ok(device)
}
