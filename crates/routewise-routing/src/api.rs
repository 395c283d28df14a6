//! Wire shapes exchanged with the transport layer.

use routewise_core::{TaskCategory, TaskRequest};
use serde::{Deserialize, Serialize};

use crate::RoutingError;
use crate::orchestrator::{RouteOrchestrator, RouteOutcome, placeholder_response};

/// Successful route, as serialized to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResponse {
    pub selected_model: String,
    pub cost: f64,
    pub estimated_time: f64,
    /// Backend text, or the simulated placeholder
    pub response: String,
    pub task_type: TaskCategory,
    pub success: bool,
    pub is_real_response: bool,
    pub cache_hit: bool,
}

impl From<RouteOutcome> for RouteResponse {
    fn from(outcome: RouteOutcome) -> Self {
        let RouteOutcome {
            result,
            cache_hit,
            is_real_response,
        } = outcome;
        let response = result.response_text.unwrap_or_else(|| {
            placeholder_response(
                &result.selected_model,
                result.cost_usd,
                result.estimated_time_ms,
            )
        });
        Self {
            selected_model: result.selected_model,
            cost: result.cost_usd,
            estimated_time: result.estimated_time_ms,
            response,
            task_type: result.task_category,
            success: true,
            is_real_response,
            cache_hit,
        }
    }
}

/// Failed route, as serialized to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub success: bool,
    /// HTTP status for the transport layer; not serialized
    #[serde(skip)]
    pub status: u16,
}

impl From<&RoutingError> for ErrorResponse {
    fn from(error: &RoutingError) -> Self {
        let status = error.status_code();
        // Internal failures are not described to clients
        let message = if status == 500 {
            "Internal server error".to_owned()
        } else {
            error.to_string()
        };
        Self {
            error: message,
            success: false,
            status,
        }
    }
}

impl RouteOrchestrator {
    /// Routes a transport payload end to end.
    ///
    /// # Errors
    /// Returns the client-facing error body with its HTTP status.
    pub async fn handle(&self, request: TaskRequest) -> Result<RouteResponse, ErrorResponse> {
        let task = request.into_task();
        match self.route_detailed(&task).await {
            Ok(outcome) => Ok(RouteResponse::from(outcome)),
            Err(error) => {
                tracing::warn!(task_id = %task.id, "route failed: {error}");
                Err(ErrorResponse::from(&error))
            }
        }
    }
}
