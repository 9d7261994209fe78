//! Temperature Conversion MCP Server Implementation
//!
//! Implements the MCP server with all conversion tools.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};

use crate::config::ServiceConfig;
use crate::tools::convert::{self, ApiResponse, BatchItemInput, ServiceError};
use crate::tools::status::StatusTracker;

/// Temperature conversion MCP service
#[derive(Clone)]
pub struct TempConvService {
    config: Arc<ServiceConfig>,
    status_tracker: Arc<StatusTracker>,
    tool_router: ToolRouter<TempConvService>,
}

impl TempConvService {
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            status_tracker: Arc::new(StatusTracker::new(config.max_batch_size)),
            config: Arc::new(config),
            tool_router: Self::tool_router(),
        }
    }

    /// Serialize a tool outcome: envelope on success, problem details on failure
    fn respond<T: Serialize>(
        &self,
        tool: &str,
        result: Result<T, ServiceError>,
    ) -> Result<CallToolResult, McpError> {
        let request_id = self.status_tracker.next_request_id();
        let outcome = result.and_then(|data| {
            serde_json::to_string_pretty(&ApiResponse::new(request_id, data))
                .map_err(|e| ServiceError::Internal(format!("Serialization error: {}", e)))
        });
        match outcome {
            Ok(json) => Ok(CallToolResult::success(vec![Content::text(json)])),
            Err(e) => self.reject(request_id, tool, &e),
        }
    }

    fn reject(
        &self,
        request_id: u64,
        tool: &str,
        error: &ServiceError,
    ) -> Result<CallToolResult, McpError> {
        self.status_tracker.record_rejection();
        if error.status_code() >= 500 {
            tracing::error!(request_id, tool, "Failed: {}", error);
        } else {
            tracing::warn!(request_id, tool, status = error.status_code(), "Rejected: {}", error);
        }
        let json = serde_json::to_string_pretty(&error.to_problem())
            .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
        Ok(CallToolResult::error(vec![Content::text(json)]))
    }
}

// ============================================================================
// Conversion Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ConvertTemperatureParams {
    /// Temperature value to convert
    pub value: f64,
    /// Unit of the value: celsius, fahrenheit or kelvin
    pub unit: String,
    /// Unit to convert to: celsius, fahrenheit or kelvin
    pub target_unit: String,
    /// Precision context: consumer, industrial, medical or scientific (default scientific)
    pub precision: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct BatchConvertTemperaturesParams {
    /// Temperatures to convert, each with its own unit
    pub items: Vec<BatchItemInput>,
    /// Unit to convert every item to
    pub target_unit: String,
    /// Precision context shared by all items (default scientific)
    pub precision: Option<String>,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl TempConvService {
    // --- Status ---

    #[tool(description = "Get the current status of the temperature conversion service including build info, usage counters and process information")]
    fn temperature_status(&self) -> Result<CallToolResult, McpError> {
        let status = self.status_tracker.get_status();
        self.respond("temperature_status", Ok(status))
    }

    #[tool(description = "Get instructions for converting temperatures: accepted units, precision contexts, batch rules and error types.")]
    fn conversion_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::CONVERSION_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(CONVERSION_INSTRUCTIONS)]))
    }

    #[tool(description = "List supported temperature units with their absolute-zero bounds, and the available precision contexts")]
    fn list_temperature_units(&self) -> Result<CallToolResult, McpError> {
        let catalog = convert::list_temperature_units(&self.config);
        self.respond("list_temperature_units", Ok(catalog))
    }

    // --- Conversion ---

    #[tool(description = "Convert a temperature between celsius, fahrenheit and kelvin with a precision context (consumer, industrial, medical, scientific)")]
    fn convert_temperature(
        &self,
        Parameters(p): Parameters<ConvertTemperatureParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = convert::convert_temperature(
            &self.config,
            p.value,
            &p.unit,
            &p.target_unit,
            p.precision.as_deref(),
        );
        if result.is_ok() {
            self.status_tracker.record_conversion();
        }
        self.respond("convert_temperature", result)
    }

    #[tool(description = "Convert many temperatures to one target unit in a single call. Results keep input order; any invalid item fails the whole batch and the error names its index.")]
    fn batch_convert_temperatures(
        &self,
        Parameters(p): Parameters<BatchConvertTemperaturesParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = convert::batch_convert_temperatures(
            &self.config,
            &p.items,
            &p.target_unit,
            p.precision.as_deref(),
        );
        if let Ok(batch) = &result {
            self.status_tracker.record_batch(batch.count);
        }
        self.respond("batch_convert_temperatures", result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for TempConvService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "tempconv".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Temperature Conversion Service".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Temperature Conversion Service - converts between celsius, fahrenheit and kelvin. \
                 Call conversion_instructions first if unsure of units or precision contexts. \
                 Single values: convert_temperature. Several values: batch_convert_temperatures. \
                 Reference data: list_temperature_units. Service health: temperature_status."
                    .into(),
            ),
        }
    }
}
