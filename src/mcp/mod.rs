//! MCP server module
//!
//! Exposes the conversion tools over the Model Context Protocol.

pub mod server;

pub use server::TempConvService;
