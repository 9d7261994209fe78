//! Conversion error types
//!
//! Every rejection the engine can produce, with its status-code and
//! problem-details mapping for the service layer.

use serde::Serialize;
use thiserror::Error;

use super::units::TemperatureUnit;

/// Conversion error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("Invalid value for {field}: {value} is not a finite number")]
    InvalidValue { field: &'static str, value: f64 },

    #[error("Invalid unit for {field}: '{unit}' (expected celsius, fahrenheit or kelvin)")]
    InvalidUnit { field: &'static str, unit: String },

    #[error("Invalid precision context: '{precision}' (expected consumer, industrial, medical or scientific)")]
    InvalidPrecision { precision: String },

    #[error("Temperature {value} {unit} is below absolute zero ({minimum} {unit})")]
    BelowAbsoluteZero {
        value: f64,
        unit: TemperatureUnit,
        minimum: f64,
    },

    #[error("Temperature {value} {unit} cannot be expressed in {target}: result is out of range")]
    OutOfRange {
        value: f64,
        unit: TemperatureUnit,
        target: TemperatureUnit,
    },

    #[error("Batch item {index} failed: {source}")]
    BatchItemFailure {
        index: usize,
        #[source]
        source: Box<ConversionError>,
    },
}

impl ConversionError {
    /// Wrap this error as the failure of a batch item
    pub fn at_index(self, index: usize) -> Self {
        ConversionError::BatchItemFailure {
            index,
            source: Box::new(self),
        }
    }

    /// The underlying error, looking through batch attribution
    pub fn root(&self) -> &ConversionError {
        match self {
            ConversionError::BatchItemFailure { source, .. } => source.root(),
            other => other,
        }
    }

    /// Index of the failing batch item, if attributed
    pub fn batch_index(&self) -> Option<usize> {
        match self {
            ConversionError::BatchItemFailure { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// Stable machine-readable kind
    pub fn kind(&self) -> &'static str {
        match self.root() {
            ConversionError::InvalidValue { .. } => "invalid_value",
            ConversionError::InvalidUnit { .. } => "invalid_unit",
            ConversionError::InvalidPrecision { .. } => "invalid_precision",
            ConversionError::BelowAbsoluteZero { .. } => "below_absolute_zero",
            ConversionError::OutOfRange { .. } => "out_of_range",
            ConversionError::BatchItemFailure { .. } => "batch_item_failure",
        }
    }

    /// HTTP-style status code: input validation 400, physical bound 422
    pub fn status_code(&self) -> u16 {
        match self.root() {
            ConversionError::BelowAbsoluteZero { .. } => 422,
            _ => 400,
        }
    }

    fn title(&self) -> &'static str {
        match self.root() {
            ConversionError::InvalidValue { .. } => "Invalid temperature value",
            ConversionError::InvalidUnit { .. } => "Invalid temperature unit",
            ConversionError::InvalidPrecision { .. } => "Invalid precision context",
            ConversionError::BelowAbsoluteZero { .. } => "Temperature below absolute zero",
            ConversionError::OutOfRange { .. } => "Converted temperature out of range",
            ConversionError::BatchItemFailure { .. } => "Batch item failure",
        }
    }

    /// Build the caller-facing problem-details body
    pub fn to_problem(&self) -> ProblemDetails {
        let (field, value) = match self.root() {
            ConversionError::InvalidValue { field, value } => (Some(*field), Some(value.to_string())),
            ConversionError::InvalidUnit { field, unit } => (Some(*field), Some(unit.clone())),
            ConversionError::InvalidPrecision { precision } => {
                (Some("precision"), Some(precision.clone()))
            }
            ConversionError::BelowAbsoluteZero { value, .. }
            | ConversionError::OutOfRange { value, .. } => (Some("value"), Some(value.to_string())),
            ConversionError::BatchItemFailure { .. } => (None, None),
        };

        ProblemDetails {
            problem_type: format!("/problems/{}", self.kind().replace('_', "-")),
            title: self.title().to_string(),
            status: self.status_code(),
            detail: self.to_string(),
            field,
            value,
            index: self.batch_index(),
        }
    }
}

/// Structured problem-details body returned to callers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub problem_type: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
}

impl ProblemDetails {
    /// Opaque body for faults that are not caller errors
    pub fn internal(detail: impl Into<String>) -> Self {
        Self {
            problem_type: "/problems/internal-error".to_string(),
            title: "Internal error".to_string(),
            status: 500,
            detail: detail.into(),
            field: None,
            value: None,
            index: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let invalid = ConversionError::InvalidValue {
            field: "value",
            value: f64::NAN,
        };
        assert_eq!(invalid.status_code(), 400);

        let unit = ConversionError::InvalidUnit {
            field: "unit",
            unit: "rankine".to_string(),
        };
        assert_eq!(unit.status_code(), 400);

        let below = ConversionError::BelowAbsoluteZero {
            value: -300.0,
            unit: TemperatureUnit::Celsius,
            minimum: -273.15,
        };
        assert_eq!(below.status_code(), 422);
    }

    #[test]
    fn test_batch_failure_keeps_inner_kind() {
        let err = ConversionError::BelowAbsoluteZero {
            value: -1.0,
            unit: TemperatureUnit::Kelvin,
            minimum: 0.0,
        }
        .at_index(3);

        assert_eq!(err.batch_index(), Some(3));
        assert_eq!(err.kind(), "below_absolute_zero");
        assert_eq!(err.status_code(), 422);
        assert!(matches!(err.root(), ConversionError::BelowAbsoluteZero { .. }));
    }

    #[test]
    fn test_problem_details() {
        let err = ConversionError::InvalidUnit {
            field: "target_unit",
            unit: "rankine".to_string(),
        }
        .at_index(1);

        let problem = err.to_problem();
        assert_eq!(problem.problem_type, "/problems/invalid-unit");
        assert_eq!(problem.status, 400);
        assert_eq!(problem.field, Some("target_unit"));
        assert_eq!(problem.value.as_deref(), Some("rankine"));
        assert_eq!(problem.index, Some(1));
        assert!(problem.detail.starts_with("Batch item 1 failed"));

        let json = serde_json::to_value(&problem).unwrap();
        assert_eq!(json["type"], "/problems/invalid-unit");
    }

    #[test]
    fn test_problem_details_omits_missing_index() {
        let err = ConversionError::InvalidValue {
            field: "value",
            value: f64::INFINITY,
        };
        let json = serde_json::to_value(err.to_problem()).unwrap();
        assert!(json.get("index").is_none());
        assert_eq!(json["value"], "inf");
    }

    #[test]
    fn test_out_of_range_problem() {
        let err = ConversionError::OutOfRange {
            value: 1e308,
            unit: TemperatureUnit::Celsius,
            target: TemperatureUnit::Fahrenheit,
        };
        let problem = err.to_problem();
        assert_eq!(problem.status, 400);
        assert_eq!(problem.problem_type, "/problems/out-of-range");
        assert_eq!(problem.field, Some("value"));
    }

    #[test]
    fn test_internal_problem() {
        let problem = ProblemDetails::internal("boom");
        assert_eq!(problem.status, 500);
        assert_eq!(problem.problem_type, "/problems/internal-error");
    }
}
