//! Temperature conversion module
//!
//! Unit normalization through Kelvin, precision rounding and absolute-zero
//! validation. Stateless; safe to call from any number of handlers at once.

pub mod converter;
pub mod error;
pub mod units;

pub use converter::{
    apply_precision, batch_convert, conversion_method, convert, from_kelvin, to_kelvin,
    validate_temperature,
};
pub use error::{ConversionError, ProblemDetails};
pub use units::{PrecisionContext, RoundingRule, TemperatureUnit};
