use rmcp::{
    handler::server::{tool::ToolRouter, wrapper::Parameters, ServerHandler},
    model::{CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
    ErrorData as McpError,
};
use std::sync::Arc;

use crate::error::WeatherError;
use crate::formatters::{format_locations, format_weather};
use crate::models::{GetWeatherRequest, SearchLocationsRequest};
use crate::weather::WeatherService;

/// MCP front end over [`WeatherService`]
#[derive(Clone)]
pub struct WeatherServer {
    service: Arc<WeatherService>,
    tool_router: ToolRouter<Self>,
}

impl WeatherServer {
    pub fn new(service: Arc<WeatherService>) -> Self {
        Self {
            service,
            tool_router: Self::tool_router(),
        }
    }
}

/// Unknown locations are the caller's mistake; everything else is ours
fn to_mcp_error(err: WeatherError) -> McpError {
    match err {
        WeatherError::LocationNotFound { .. } => McpError::invalid_params(err.user_message(), None),
        _ => McpError::internal_error(err.user_message(), None),
    }
}

#[tool_handler]
impl ServerHandler for WeatherServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "mcp-thai-weather".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                title: None,
                website_url: None,
            },
            instructions: Some(
                "Weather reports and 5-day forecasts for Bangkok's districts and the \
                surrounding provinces. Use search_locations to find valid names."
                    .to_string(),
            ),
        }
    }
}

#[tool_router]
impl WeatherServer {
    /// Gets current weather and a 5-day forecast
    #[tool(description = "Get current weather and a 5-day forecast for a district or province in the Bangkok area (e.g., 'Bang Rak', 'Pak Kret, Nonthaburi', or 'Samut Prakan'). Omit the location to use the default.")]
    async fn get_weather(
        &self,
        Parameters(request): Parameters<GetWeatherRequest>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!("Getting weather for: {:?}", request.location);

        let data = self
            .service
            .get_weather(request.location.as_deref())
            .await
            .map_err(to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(format_weather(
            &data,
        ))]))
    }

    /// Suggests locations matching a partial name
    #[tool(description = "Search known districts and provinces. Every word must appear in the result (e.g., 'bang nonthaburi'). An empty query lists all locations.")]
    async fn search_locations(
        &self,
        Parameters(request): Parameters<SearchLocationsRequest>,
    ) -> Result<CallToolResult, McpError> {
        let query = request.query.unwrap_or_default();
        tracing::info!("Searching locations for: {:?}", query);

        let results = self.service.search_locations(&query);

        Ok(CallToolResult::success(vec![Content::text(
            format_locations(&results),
        )]))
    }
}
