//! Temperature units, precision contexts and physical constants
//!
//! Provides the closed sets of units and rounding policies, plus the
//! absolute-zero bound for each unit.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::ConversionError;

// ============================================================================
// Physical Constants
// ============================================================================

/// Offset between the Celsius and Kelvin scales
pub const KELVIN_OFFSET: f64 = 273.15;
/// Offset between the Fahrenheit and Rankine scales
pub const RANKINE_OFFSET: f64 = 459.67;

/// Absolute zero in Kelvin
pub const ABSOLUTE_ZERO_KELVIN: f64 = 0.0;
/// Absolute zero in degrees Celsius
pub const ABSOLUTE_ZERO_CELSIUS: f64 = -273.15;
/// Absolute zero in degrees Fahrenheit
pub const ABSOLUTE_ZERO_FAHRENHEIT: f64 = -459.67;

// ============================================================================
// Temperature Unit
// ============================================================================

/// Supported temperature unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl TemperatureUnit {
    pub const ALL: [TemperatureUnit; 3] = [
        TemperatureUnit::Celsius,
        TemperatureUnit::Fahrenheit,
        TemperatureUnit::Kelvin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "celsius",
            TemperatureUnit::Fahrenheit => "fahrenheit",
            TemperatureUnit::Kelvin => "kelvin",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
            TemperatureUnit::Kelvin => "K",
        }
    }

    /// Lowest physically possible value expressed in this unit
    pub fn absolute_zero(&self) -> f64 {
        match self {
            TemperatureUnit::Celsius => ABSOLUTE_ZERO_CELSIUS,
            TemperatureUnit::Fahrenheit => ABSOLUTE_ZERO_FAHRENHEIT,
            TemperatureUnit::Kelvin => ABSOLUTE_ZERO_KELVIN,
        }
    }

    /// Parse from a unit name or symbol, case-insensitively
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "celsius" | "c" | "°c" | "degc" => Some(TemperatureUnit::Celsius),
            "fahrenheit" | "f" | "°f" | "degf" => Some(TemperatureUnit::Fahrenheit),
            "kelvin" | "k" => Some(TemperatureUnit::Kelvin),
            _ => None,
        }
    }

    /// Parse a unit, reporting the offending field on failure
    pub fn parse(s: &str, field: &'static str) -> Result<Self, ConversionError> {
        Self::from_str(s).ok_or_else(|| ConversionError::InvalidUnit {
            field,
            unit: s.to_string(),
        })
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Precision Context
// ============================================================================

/// Rounding rule selected by a precision context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundingRule {
    DecimalPlaces(u32),
    SignificantDigits(u32),
}

/// Named rounding policy for a usage domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrecisionContext {
    Consumer,
    Industrial,
    Medical,
    #[default]
    Scientific,
}

impl PrecisionContext {
    pub const ALL: [PrecisionContext; 4] = [
        PrecisionContext::Consumer,
        PrecisionContext::Industrial,
        PrecisionContext::Medical,
        PrecisionContext::Scientific,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PrecisionContext::Consumer => "consumer",
            PrecisionContext::Industrial => "industrial",
            PrecisionContext::Medical => "medical",
            PrecisionContext::Scientific => "scientific",
        }
    }

    pub fn rounding_rule(&self) -> RoundingRule {
        match self {
            PrecisionContext::Consumer => RoundingRule::DecimalPlaces(2),
            PrecisionContext::Medical => RoundingRule::DecimalPlaces(3),
            PrecisionContext::Industrial => RoundingRule::DecimalPlaces(4),
            PrecisionContext::Scientific => RoundingRule::SignificantDigits(15),
        }
    }

    /// Human-readable description of the rounding rule
    pub fn describe(&self) -> String {
        match self.rounding_rule() {
            RoundingRule::DecimalPlaces(n) => format!("round to {} decimal places", n),
            RoundingRule::SignificantDigits(n) => format!("round to {} significant digits", n),
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "consumer" => Some(PrecisionContext::Consumer),
            "industrial" => Some(PrecisionContext::Industrial),
            "medical" => Some(PrecisionContext::Medical),
            "scientific" => Some(PrecisionContext::Scientific),
            _ => None,
        }
    }

    pub fn parse(s: &str) -> Result<Self, ConversionError> {
        Self::from_str(s).ok_or_else(|| ConversionError::InvalidPrecision {
            precision: s.to_string(),
        })
    }
}

impl fmt::Display for PrecisionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
