//! Weight lookup command
//!
//! Order of checks for every request: server configuration, then input
//! validation, then the resolution pipeline. Panics inside the pipeline are
//! caught here and reported as a generic internal error.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tracing::{Instrument, error, info, info_span, warn};
use uuid::Uuid;

use crate::application::{WeightError, WeightRequest, WeightResolutionService, WeightResponse};
use crate::infrastructure::config::AppConfig;

/// Shared handler state. An unconfigured server still answers every request,
/// with a configuration error.
#[derive(Clone)]
pub struct AppState {
    resolver: Result<Arc<WeightResolutionService>, WeightError>,
}

impl AppState {
    /// Build the production state; a missing credential is kept as the error
    /// every request will report.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        let resolver = WeightResolutionService::from_config(config).map(Arc::new);
        if let Err(e) = &resolver {
            warn!("Weight resolution is not configured: {}", e);
        }
        Self { resolver }
    }

    #[must_use]
    pub fn with_service(service: Arc<WeightResolutionService>) -> Self {
        Self {
            resolver: Ok(service),
        }
    }

    #[must_use]
    pub fn unconfigured(message: impl Into<String>) -> Self {
        Self {
            resolver: Err(WeightError::Configuration {
                message: message.into(),
            }),
        }
    }

    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.resolver.is_ok()
    }
}

/// Status code and body for one request
#[derive(Debug, Clone, PartialEq)]
pub struct CommandResponse {
    pub status: u16,
    pub body: WeightResponse,
}

impl CommandResponse {
    fn ok(body: WeightResponse) -> Self {
        Self { status: 200, body }
    }

    fn failure(error: &WeightError) -> Self {
        Self {
            status: error.status_code(),
            body: WeightResponse::from(error),
        }
    }
}

/// Resolve the weight of `request.part` x `request.qty`
pub async fn resolve_part_weight(state: &AppState, request: WeightRequest) -> CommandResponse {
    let service = match &state.resolver {
        Ok(service) => Arc::clone(service),
        Err(e) => return CommandResponse::failure(e),
    };

    let query = match request.to_query() {
        Ok(query) => query,
        Err(e) => {
            info!("Rejected weight request: {}", e);
            return CommandResponse::failure(&WeightError::from(e));
        }
    };

    let span = info_span!(
        "weight_request",
        request_id = %Uuid::new_v4(),
        part = %query.identifier(),
        qty = query.quantity()
    );

    async move {
        let outcome = AssertUnwindSafe(service.resolve(&query)).catch_unwind().await;
        match outcome {
            Ok(Ok(result)) => CommandResponse::ok(WeightResponse::from(result)),
            Ok(Err(e)) => {
                error!("Weight resolution failed: {}", e);
                CommandResponse::failure(&e)
            }
            Err(panic) => {
                let message = panic_message(&*panic);
                error!("Weight resolution panicked: {}", message);
                CommandResponse::failure(&WeightError::Internal { message })
            }
        }
    }
    .instrument(span)
    .await
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_state_wins_over_invalid_input() {
        let state = AppState::unconfigured("MOUSER_API_KEY is not set");
        let response = resolve_part_weight(&state, WeightRequest::default()).await;
        assert_eq!(response.status, 500);
        assert_eq!(
            response.body.error.as_deref(),
            Some("Server configuration error: MOUSER_API_KEY is not set")
        );
    }

    #[test]
    fn test_default_config_is_unconfigured() {
        let state = AppState::from_config(&AppConfig::default());
        assert!(!state.is_configured());
    }

    #[test]
    fn test_panic_message() {
        let boxed: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(&*boxed), "boom");
        let boxed: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(&*boxed), "owned");
        let boxed: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(&*boxed), "unknown panic");
    }
}
