//! Temperature conversion engine
//!
//! Pure functions for validating, normalizing and converting temperatures.
//! Every conversion is routed through Kelvin, so each unit needs exactly one
//! formula in each direction.

use std::time::Instant;

use chrono::{SecondsFormat, Utc};

use super::error::ConversionError;
use super::units::{PrecisionContext, RoundingRule, TemperatureUnit, KELVIN_OFFSET, RANKINE_OFFSET};
use crate::models::{
    BatchConversionRequest, BatchConversionResult, ConversionRequest, ConversionResult,
    TemperatureValue,
};

/// Convert a value in the given unit to Kelvin
pub fn to_kelvin(value: f64, unit: TemperatureUnit) -> f64 {
    match unit {
        TemperatureUnit::Celsius => value + KELVIN_OFFSET,
        TemperatureUnit::Fahrenheit => (value + RANKINE_OFFSET) * 5.0 / 9.0,
        TemperatureUnit::Kelvin => value,
    }
}

/// Convert a Kelvin value to the given unit
pub fn from_kelvin(kelvin: f64, unit: TemperatureUnit) -> f64 {
    match unit {
        TemperatureUnit::Celsius => kelvin - KELVIN_OFFSET,
        // K * 9/5 - 459.67, with the offset scaled first so that 273.15 K
        // lands on exactly 32 °F instead of 31.99999999999994
        TemperatureUnit::Fahrenheit => (kelvin * 9.0 - 5.0 * RANKINE_OFFSET) / 5.0,
        TemperatureUnit::Kelvin => kelvin,
    }
}

/// Round to a fixed number of decimal places
pub fn round_to_decimals(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    let scaled = value * factor;
    if !scaled.is_finite() {
        // Too large to carry any fractional digits anyway
        return value;
    }
    scaled.round() / factor
}

/// Round to a number of significant digits
///
/// Goes through the shortest scientific representation so the result is the
/// double nearest to the rounded decimal, e.g. 32.000000000000014 -> 32.
pub fn round_to_significant(value: f64, digits: u32) -> f64 {
    if value == 0.0 || !value.is_finite() || digits == 0 {
        return value;
    }
    let precision = (digits - 1) as usize;
    format!("{:.*e}", precision, value)
        .parse()
        .unwrap_or(value)
}

/// Apply the rounding rule of a precision context
pub fn apply_precision(value: f64, precision: PrecisionContext) -> f64 {
    match precision.rounding_rule() {
        RoundingRule::DecimalPlaces(places) => round_to_decimals(value, places),
        RoundingRule::SignificantDigits(digits) => round_to_significant(value, digits),
    }
}

/// Check a temperature is finite and not below absolute zero in its own unit
pub fn validate_temperature(temperature: &TemperatureValue) -> Result<(), ConversionError> {
    if !temperature.value.is_finite() {
        return Err(ConversionError::InvalidValue {
            field: "value",
            value: temperature.value,
        });
    }

    let minimum = temperature.unit.absolute_zero();
    if temperature.value < minimum {
        return Err(ConversionError::BelowAbsoluteZero {
            value: temperature.value,
            unit: temperature.unit,
            minimum,
        });
    }

    Ok(())
}

/// Label identifying the unit pair of a conversion, e.g. "celsius_to_kelvin"
pub fn conversion_method(from: TemperatureUnit, to: TemperatureUnit) -> String {
    format!("{}_to_{}", from.as_str(), to.as_str())
}

/// Convert a single temperature
///
/// Identical source and target units return the original value untouched;
/// otherwise the value goes through Kelvin and is rounded once at the end.
pub fn convert(request: &ConversionRequest) -> Result<ConversionResult, ConversionError> {
    let original = request.temperature;
    validate_temperature(&original)?;

    let precision = request.effective_precision();
    let target = request.target_unit;

    let value = if original.unit == target {
        original.value
    } else {
        let kelvin = to_kelvin(original.value, original.unit);
        apply_precision(from_kelvin(kelvin, target), precision)
    };

    if !value.is_finite() {
        return Err(ConversionError::OutOfRange {
            value: original.value,
            unit: original.unit,
            target,
        });
    }

    Ok(ConversionResult {
        original,
        converted: TemperatureValue::new(value, target).with_precision(precision),
        precision,
        conversion_method: conversion_method(original.unit, target),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

/// Convert every temperature in a batch, preserving input order
///
/// The first invalid item fails the whole batch with its index attached. An
/// empty batch is not an error and yields an empty result.
pub fn batch_convert(
    batch: &BatchConversionRequest,
) -> Result<BatchConversionResult, ConversionError> {
    let start = Instant::now();

    let results = batch
        .temperatures
        .iter()
        .enumerate()
        .map(|(index, temperature)| {
            convert(&batch.request_for(*temperature)).map_err(|e| e.at_index(index))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let processing_time_ms = round_to_decimals(start.elapsed().as_secs_f64() * 1000.0, 3);

    tracing::debug!(
        "Converted batch of {} to {} in {} ms",
        results.len(),
        batch.target_unit,
        processing_time_ms
    );

    Ok(BatchConversionResult {
        count: results.len(),
        results,
        processing_time_ms,
    })
}
