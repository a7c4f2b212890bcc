//! Router construction and the single generic handler behind every route.
//!
//! Control flow per request: parse body → fill template → one completion
//! call → return the completion text verbatim as `text/plain`.

use std::borrow::Cow;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, State};
use axum::routing::{get, post};
use axum::Router;
use serde_json::{Map, Value};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::completion::CompletionClient;
use crate::prompt::{PromptEngine, TemplateError};
use crate::routes::{PromptRoute, RouteMethod, Source, ROUTES};
use crate::server::error::ApiError;

/// Application state shared across handlers.
pub struct AppState {
    pub completions: Arc<dyn CompletionClient>,
    pub prompts: PromptEngine,
}

impl AppState {
    /// Compile the route templates and wrap `completions`.
    pub fn new(completions: Arc<dyn CompletionClient>) -> Result<Self, TemplateError> {
        Ok(Self {
            completions,
            prompts: PromptEngine::new(ROUTES)?,
        })
    }
}

/// Build the axum router with one route per entry of [`ROUTES`].
///
/// Request bodies are unbounded: scraped admissions pages routinely exceed
/// axum's 2 MB default.
pub fn build_router(state: Arc<AppState>) -> Router {
    let mut router = Router::new();

    for route in ROUTES {
        let handler = move |State(state): State<Arc<AppState>>, body: Bytes| async move {
            relay(state, route, body).await
        };
        router = match route.method {
            RouteMethod::Get => router.route(route.path, get(handler)),
            RouteMethod::Post => router.route(route.path, post(handler)),
        };
    }

    router
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn relay(
    state: Arc<AppState>,
    route: &'static PromptRoute,
    body: Bytes,
) -> Result<String, ApiError> {
    let request_id = Uuid::new_v4().to_string();

    let result = async {
        let fields = if route.reads_body() {
            parse_body(&body)?
        } else {
            Map::new()
        };
        let prompt = render_prompt(&state.prompts, route, &fields)?;

        info!(
            request_id = %request_id,
            route = route.path,
            model = state.completions.model(),
            prompt_len = prompt.len(),
            "Forwarding prompt"
        );

        let text = state.completions.complete(&prompt).await?;

        if route.log_response {
            info!(request_id = %request_id, route = route.path, response = %text, "Completion received");
        } else {
            debug!(request_id = %request_id, route = route.path, response_len = text.len(), "Completion received");
        }

        Ok::<_, ApiError>(text)
    }
    .await;

    if let Err(e) = &result {
        error!(request_id = %request_id, route = route.path, error = %e, "Request failed");
    }
    result
}

/// Parse a request body into its top-level JSON object.
pub fn parse_body(body: &[u8]) -> Result<Map<String, Value>, ApiError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(ApiError::InvalidBody(format!("expected object, got {other}"))),
        Err(e) => Err(ApiError::InvalidBody(e.to_string())),
    }
}

/// Fill `route`'s template from fixed bindings and body `fields`.
///
/// String fields are substituted verbatim; any other JSON value is
/// substituted as its compact JSON text, so `true` and `null` arrive
/// spelled as in JSON (never `True` or `None`).
pub fn render_prompt(
    prompts: &PromptEngine,
    route: &PromptRoute,
    fields: &Map<String, Value>,
) -> Result<String, ApiError> {
    let mut values: Vec<(&str, Cow<'_, str>)> = Vec::with_capacity(route.bindings.len());

    for binding in route.bindings {
        let value = match binding.source {
            Source::Fixed(value) => Cow::Borrowed(value),
            Source::Body(field) => match fields.get(field) {
                Some(Value::String(s)) => Cow::Borrowed(s.as_str()),
                Some(other) => Cow::Owned(other.to_string()),
                None => return Err(ApiError::MissingField(field)),
            },
        };
        values.push((binding.placeholder, value));
    }

    let pairs: Vec<(&str, &str)> = values.iter().map(|(name, value)| (*name, &**value)).collect();
    Ok(prompts.render(route.path, &pairs)?)
}
