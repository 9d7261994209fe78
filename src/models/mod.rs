//! Data models
//!
//! Rust structs representing conversion inputs and outputs.

mod temperature;

pub use temperature::{
    BatchConversionRequest, BatchConversionResult, ConversionRequest, ConversionResult,
    TemperatureValue,
};
