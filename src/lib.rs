//! Temperature Conversion Service Library
//!
//! Core conversion engine plus the MCP tool layer built on it.

pub mod build_info;
pub mod config;
pub mod conversion;
pub mod mcp;
pub mod models;
pub mod tools;
