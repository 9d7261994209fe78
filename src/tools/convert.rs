//! Conversion Tools
//!
//! Parses raw tool input, enforces service-level batch bounds and calls into
//! the conversion engine.

use chrono::{SecondsFormat, Utc};
use rmcp::schemars;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::build_info::API_VERSION;
use crate::config::ServiceConfig;
use crate::conversion::{self, ConversionError, PrecisionContext, ProblemDetails, TemperatureUnit};
use crate::models::{
    BatchConversionRequest, BatchConversionResult, ConversionRequest, ConversionResult,
    TemperatureValue,
};

/// Service error types
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error("Batch must contain at least one temperature")]
    EmptyBatch,

    #[error("Batch of {size} temperatures exceeds the limit of {max}")]
    BatchTooLarge { size: usize, max: usize },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::Conversion(e) => e.status_code(),
            ServiceError::EmptyBatch | ServiceError::BatchTooLarge { .. } => 400,
            ServiceError::Internal(_) => 500,
        }
    }

    pub fn to_problem(&self) -> ProblemDetails {
        match self {
            ServiceError::Conversion(e) => e.to_problem(),
            ServiceError::EmptyBatch => ProblemDetails {
                problem_type: "/problems/empty-batch".to_string(),
                title: "Empty batch".to_string(),
                status: self.status_code(),
                detail: self.to_string(),
                field: Some("temperatures"),
                value: None,
                index: None,
            },
            ServiceError::BatchTooLarge { size, .. } => ProblemDetails {
                problem_type: "/problems/batch-too-large".to_string(),
                title: "Batch too large".to_string(),
                status: self.status_code(),
                detail: self.to_string(),
                field: Some("temperatures"),
                value: Some(size.to_string()),
                index: None,
            },
            ServiceError::Internal(_) => ProblemDetails::internal(self.to_string()),
        }
    }
}

/// One raw entry of a batch request
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct BatchItemInput {
    /// Temperature value
    pub value: f64,
    /// Unit of this value: celsius, fahrenheit or kelvin
    pub unit: String,
}

/// Envelope wrapped around every successful tool response
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub api_version: &'static str,
    pub request_id: u64,
    pub timestamp: String,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(request_id: u64, data: T) -> Self {
        Self {
            api_version: API_VERSION,
            request_id,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            data,
        }
    }
}

/// Unit entry for list_temperature_units
#[derive(Debug, Serialize)]
pub struct UnitInfo {
    pub name: &'static str,
    pub symbol: &'static str,
    pub absolute_zero: f64,
}

/// Precision entry for list_temperature_units
#[derive(Debug, Serialize)]
pub struct PrecisionInfo {
    pub name: &'static str,
    pub rule: String,
    pub is_default: bool,
}

/// Response for list_temperature_units
#[derive(Debug, Serialize)]
pub struct UnitsCatalog {
    pub units: Vec<UnitInfo>,
    pub precision_contexts: Vec<PrecisionInfo>,
    pub reference_unit: &'static str,
    pub max_batch_size: usize,
}

fn resolve_precision(
    config: &ServiceConfig,
    precision: Option<&str>,
) -> Result<PrecisionContext, ConversionError> {
    match precision {
        Some(p) => PrecisionContext::parse(p),
        None => Ok(config.default_precision),
    }
}

/// Convert a single temperature given as raw strings
pub fn convert_temperature(
    config: &ServiceConfig,
    value: f64,
    unit: &str,
    target_unit: &str,
    precision: Option<&str>,
) -> Result<ConversionResult, ServiceError> {
    let request = ConversionRequest::parse(value, unit, target_unit, None)?;
    let request = request.with_precision(resolve_precision(config, precision)?);

    let result = conversion::convert(&request)?;
    tracing::debug!(
        "{} -> {} ({})",
        result.original.format_value(),
        result.converted.format_value(),
        result.conversion_method
    );
    Ok(result)
}

/// Convert a batch of temperatures to one target unit
///
/// The batch must hold between 1 and the configured maximum items. Item-level
/// failures are reported with the index of the offending item.
pub fn batch_convert_temperatures(
    config: &ServiceConfig,
    items: &[BatchItemInput],
    target_unit: &str,
    precision: Option<&str>,
) -> Result<BatchConversionResult, ServiceError> {
    if items.is_empty() {
        return Err(ServiceError::EmptyBatch);
    }
    if items.len() > config.max_batch_size {
        return Err(ServiceError::BatchTooLarge {
            size: items.len(),
            max: config.max_batch_size,
        });
    }

    // Each item runs the full single-conversion check sequence (value, unit,
    // target unit, absolute zero) before the next item is looked at
    let target = TemperatureUnit::from_str(target_unit);
    let mut temperatures = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let temperature = TemperatureValue::parse(item.value, &item.unit, "unit")
            .and_then(|temperature| {
                target.ok_or_else(|| ConversionError::InvalidUnit {
                    field: "target_unit",
                    unit: target_unit.to_string(),
                })?;
                conversion::validate_temperature(&temperature)?;
                Ok(temperature)
            })
            .map_err(|e| e.at_index(index))?;
        temperatures.push(temperature);
    }

    let target_unit = target.ok_or_else(|| ConversionError::InvalidUnit {
        field: "target_unit",
        unit: target_unit.to_string(),
    })?;
    let precision = resolve_precision(config, precision)?;

    let batch = BatchConversionRequest::new(temperatures, target_unit).with_precision(precision);
    let result = conversion::batch_convert(&batch)?;

    tracing::info!(
        "Batch of {} converted to {} in {} ms",
        result.count,
        target_unit,
        result.processing_time_ms
    );
    Ok(result)
}

/// Describe the supported units and precision contexts
pub fn list_temperature_units(config: &ServiceConfig) -> UnitsCatalog {
    UnitsCatalog {
        units: TemperatureUnit::ALL
            .iter()
            .map(|unit| UnitInfo {
                name: unit.as_str(),
                symbol: unit.symbol(),
                absolute_zero: unit.absolute_zero(),
            })
            .collect(),
        precision_contexts: PrecisionContext::ALL
            .iter()
            .map(|precision| PrecisionInfo {
                name: precision.as_str(),
                rule: precision.describe(),
                is_default: *precision == config.default_precision,
            })
            .collect(),
        reference_unit: TemperatureUnit::Kelvin.as_str(),
        max_batch_size: config.max_batch_size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(value: f64, unit: &str) -> BatchItemInput {
        BatchItemInput {
            value,
            unit: unit.to_string(),
        }
    }

    #[test]
    fn test_convert_temperature() {
        let config = ServiceConfig::default();
        let result =
            convert_temperature(&config, 100.0, "celsius", "fahrenheit", Some("consumer")).unwrap();
        assert_eq!(result.converted.value, 212.0);
        assert_eq!(result.precision, PrecisionContext::Consumer);
        assert_eq!(result.conversion_method, "celsius_to_fahrenheit");
    }

    #[test]
    fn test_convert_uses_configured_default_precision() {
        let config = ServiceConfig {
            default_precision: PrecisionContext::Consumer,
            ..ServiceConfig::default()
        };
        let result = convert_temperature(&config, 25.123456, "c", "f", None).unwrap();
        assert_eq!(result.converted.value, 77.22);
        assert_eq!(result.precision, PrecisionContext::Consumer);
    }

    #[test]
    fn test_convert_rejections_map_to_status() {
        let config = ServiceConfig::default();

        let err = convert_temperature(&config, 1.0, "rankine", "celsius", None).unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.to_problem().field, Some("unit"));

        let err = convert_temperature(&config, -300.0, "celsius", "kelvin", None).unwrap_err();
        assert_eq!(err.status_code(), 422);
        assert_eq!(err.to_problem().problem_type, "/problems/below-absolute-zero");

        let err = convert_temperature(&config, 1.0, "celsius", "kelvin", Some("lab")).unwrap_err();
        assert_eq!(err.to_problem().problem_type, "/problems/invalid-precision");
    }

    #[test]
    fn test_batch_bounds() {
        let config = ServiceConfig {
            max_batch_size: 2,
            ..ServiceConfig::default()
        };

        let err = batch_convert_temperatures(&config, &[], "kelvin", None).unwrap_err();
        assert!(matches!(err, ServiceError::EmptyBatch));
        assert_eq!(err.status_code(), 400);

        let items = vec![item(1.0, "c"), item(2.0, "c"), item(3.0, "c")];
        let err = batch_convert_temperatures(&config, &items, "kelvin", None).unwrap_err();
        assert!(matches!(err, ServiceError::BatchTooLarge { size: 3, max: 2 }));
        assert_eq!(err.to_problem().value.as_deref(), Some("3"));
    }

    #[test]
    fn test_batch_item_unit_error_has_index() {
        let config = ServiceConfig::default();
        let items = vec![item(1.0, "celsius"), item(2.0, "rankine")];
        let err = batch_convert_temperatures(&config, &items, "kelvin", None).unwrap_err();
        let problem = err.to_problem();
        assert_eq!(problem.index, Some(1));
        assert_eq!(problem.problem_type, "/problems/invalid-unit");
    }

    #[test]
    fn test_batch_below_absolute_zero_fails_whole_batch() {
        let config = ServiceConfig::default();
        let items = vec![item(20.0, "celsius"), item(30.0, "celsius"), item(-1.0, "kelvin")];
        let err = batch_convert_temperatures(&config, &items, "fahrenheit", None).unwrap_err();
        assert_eq!(err.status_code(), 422);
        assert_eq!(err.to_problem().index, Some(2));
    }

    #[test]
    fn test_batch_earlier_bound_failure_wins_over_later_unit() {
        let config = ServiceConfig::default();
        let items = vec![item(-300.0, "celsius"), item(1.0, "rankine")];
        let problem = batch_convert_temperatures(&config, &items, "kelvin", None)
            .unwrap_err()
            .to_problem();
        assert_eq!(problem.problem_type, "/problems/below-absolute-zero");
        assert_eq!(problem.status, 422);
        assert_eq!(problem.index, Some(0));
    }

    #[test]
    fn test_batch_item_value_checked_before_target_unit() {
        let config = ServiceConfig::default();
        let items = vec![item(f64::NAN, "celsius")];
        let problem = batch_convert_temperatures(&config, &items, "reaumur", None)
            .unwrap_err()
            .to_problem();
        assert_eq!(problem.problem_type, "/problems/invalid-value");
        assert_eq!(problem.index, Some(0));
    }

    #[test]
    fn test_batch_invalid_target_reported_on_first_item() {
        let config = ServiceConfig::default();
        let items = vec![item(10.0, "celsius"), item(-500.0, "fahrenheit")];
        let problem = batch_convert_temperatures(&config, &items, "reaumur", None)
            .unwrap_err()
            .to_problem();
        assert_eq!(problem.problem_type, "/problems/invalid-unit");
        assert_eq!(problem.field, Some("target_unit"));
        assert_eq!(problem.index, Some(0));
    }

    #[test]
    fn test_batch_items_checked_before_precision() {
        let config = ServiceConfig::default();
        let items = vec![item(20.0, "celsius"), item(-1.0, "kelvin")];
        let err = batch_convert_temperatures(&config, &items, "celsius", Some("lab")).unwrap_err();
        assert_eq!(err.to_problem().index, Some(1));
        assert_eq!(err.status_code(), 422);

        let items = vec![item(20.0, "celsius")];
        let err = batch_convert_temperatures(&config, &items, "celsius", Some("lab")).unwrap_err();
        assert_eq!(err.to_problem().problem_type, "/problems/invalid-precision");
    }

    #[test]
    fn test_batch_overflowing_item_has_index() {
        let config = ServiceConfig::default();
        let items = vec![item(0.0, "celsius"), item(1.7e308, "kelvin")];
        let problem = batch_convert_temperatures(&config, &items, "fahrenheit", None)
            .unwrap_err()
            .to_problem();
        assert_eq!(problem.problem_type, "/problems/out-of-range");
        assert_eq!(problem.index, Some(1));
    }

    #[test]
    fn test_convert_overflow_is_rejected() {
        let config = ServiceConfig::default();
        let err = convert_temperature(&config, 1e308, "celsius", "fahrenheit", Some("consumer"))
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.to_problem().problem_type, "/problems/out-of-range");
    }

    #[test]
    fn test_internal_error_problem() {
        let err = ServiceError::Internal("Serialization error: key must be a string".to_string());
        assert_eq!(err.status_code(), 500);

        let problem = err.to_problem();
        assert_eq!(problem.problem_type, "/problems/internal-error");
        assert_eq!(problem.status, 500);
        assert!(problem.detail.contains("key must be a string"));
    }

    #[test]
    fn test_batch_mixed_units() {
        let config = ServiceConfig::default();
        let items = vec![item(0.0, "celsius"), item(32.0, "fahrenheit"), item(273.15, "kelvin")];
        let result = batch_convert_temperatures(&config, &items, "kelvin", None).unwrap();
        assert_eq!(result.count, 3);
        assert_eq!(result.results[0].converted.value, 273.15);
        assert_eq!(result.results[2].converted.value, 273.15);
        assert_eq!(result.results[1].original.unit, TemperatureUnit::Fahrenheit);
    }

    #[test]
    fn test_list_units() {
        let catalog = list_temperature_units(&ServiceConfig::default());
        assert_eq!(catalog.units.len(), 3);
        assert_eq!(catalog.precision_contexts.len(), 4);
        assert_eq!(catalog.reference_unit, "kelvin");
        let defaults: Vec<_> = catalog
            .precision_contexts
            .iter()
            .filter(|p| p.is_default)
            .map(|p| p.name)
            .collect();
        assert_eq!(defaults, vec!["scientific"]);
    }

    #[test]
    fn test_api_response_envelope() {
        let response = ApiResponse::new(7, "ok");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["api_version"], API_VERSION);
        assert_eq!(json["request_id"], 7);
        assert_eq!(json["data"], "ok");
    }
}
