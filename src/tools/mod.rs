//! Tools module
//!
//! MCP tool implementations for the temperature conversion service.

pub mod convert;
pub mod status;
