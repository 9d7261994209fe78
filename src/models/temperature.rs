//! Temperature models
//!
//! Values, conversion requests and conversion results exchanged between the
//! engine and the service layer.

use serde::{Deserialize, Serialize};

use crate::conversion::{ConversionError, PrecisionContext, TemperatureUnit};

/// A temperature measurement or converted result
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureValue {
    pub value: f64,
    pub unit: TemperatureUnit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<PrecisionContext>,
}

impl TemperatureValue {
    pub const fn new(value: f64, unit: TemperatureUnit) -> Self {
        Self {
            value,
            unit,
            precision: None,
        }
    }

    pub fn with_precision(self, precision: PrecisionContext) -> Self {
        Self {
            precision: Some(precision),
            ..self
        }
    }

    /// Build a value from raw input: finite check first, then the unit
    pub fn parse(
        value: f64,
        unit: &str,
        unit_field: &'static str,
    ) -> Result<Self, ConversionError> {
        if !value.is_finite() {
            return Err(ConversionError::InvalidValue { field: "value", value });
        }
        let unit = TemperatureUnit::parse(unit, unit_field)?;
        Ok(Self::new(value, unit))
    }

    /// Format as e.g. "25.5 °C"
    pub fn format_value(&self) -> String {
        format!("{} {}", self.value, self.unit.symbol())
    }
}

/// Data for a single conversion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConversionRequest {
    pub temperature: TemperatureValue,
    pub target_unit: TemperatureUnit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<PrecisionContext>,
}

impl ConversionRequest {
    pub const fn new(temperature: TemperatureValue, target_unit: TemperatureUnit) -> Self {
        Self {
            temperature,
            target_unit,
            precision: None,
        }
    }

    pub fn with_precision(self, precision: PrecisionContext) -> Self {
        Self {
            precision: Some(precision),
            ..self
        }
    }

    /// Precision in force for this request (Scientific when unspecified)
    pub fn effective_precision(&self) -> PrecisionContext {
        self.precision.unwrap_or_default()
    }

    /// Build a request from raw input strings
    ///
    /// Checks run in order: value finiteness, source unit, target unit,
    /// precision context.
    pub fn parse(
        value: f64,
        unit: &str,
        target_unit: &str,
        precision: Option<&str>,
    ) -> Result<Self, ConversionError> {
        let temperature = TemperatureValue::parse(value, unit, "unit")?;
        let target_unit = TemperatureUnit::parse(target_unit, "target_unit")?;
        let precision = precision.map(PrecisionContext::parse).transpose()?;
        Ok(Self {
            temperature,
            target_unit,
            precision,
        })
    }
}

/// Outcome of a single conversion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionResult {
    pub original: TemperatureValue,
    pub converted: TemperatureValue,
    pub precision: PrecisionContext,
    pub conversion_method: String,
    /// Completion time, ISO 8601 UTC
    pub timestamp: String,
}

/// Data for converting many values to one target unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchConversionRequest {
    pub temperatures: Vec<TemperatureValue>,
    pub target_unit: TemperatureUnit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<PrecisionContext>,
}

impl BatchConversionRequest {
    pub fn new(temperatures: Vec<TemperatureValue>, target_unit: TemperatureUnit) -> Self {
        Self {
            temperatures,
            target_unit,
            precision: None,
        }
    }

    pub fn with_precision(mut self, precision: PrecisionContext) -> Self {
        self.precision = Some(precision);
        self
    }

    /// The single-item request for a batch entry
    pub fn request_for(&self, temperature: TemperatureValue) -> ConversionRequest {
        ConversionRequest {
            temperature,
            target_unit: self.target_unit,
            precision: self.precision,
        }
    }
}

/// Outcome of a batch conversion, in input order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchConversionResult {
    pub results: Vec<ConversionResult>,
    pub count: usize,
    /// Wall-clock time for the whole batch, in milliseconds
    pub processing_time_ms: f64,
}
