//! The HTTP service: the streaming chat endpoint and the branding endpoint.
//!
//! [`AppState`] is the composition root's bundle of injected collaborators.
//! The two providers are shared read-mostly caches; the model provider is
//! absent when no credential was configured.

mod config;
mod routes;

use std::sync::Arc;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::brand::BrandContentProvider;
use crate::client::Anthropic;
use crate::config::ConfigProvider;
use crate::provider::ModelProvider;
use crate::types::Model;
use crate::Result;

pub use config::{
    API_KEY_ENV, DEFAULT_BIND, DEFAULT_MAX_TOKENS, ServerArgs, ServerConfig,
};
pub use routes::{router, serve, serve_with_listener};

/// Shared state for every route.
#[derive(Clone)]
pub struct AppState {
    /// Branding document cache.
    pub config: Arc<ConfigProvider>,
    /// Guideline text cache.
    pub brand: Arc<BrandContentProvider>,
    /// The model provider, if a credential was configured.
    pub provider: Option<Arc<dyn ModelProvider>>,
    /// Model every request goes to.
    pub model: Model,
    /// Reply length cap.
    pub max_tokens: u32,
}

impl AppState {
    /// Bundle explicitly constructed collaborators.
    pub fn new(
        config: ConfigProvider,
        brand: BrandContentProvider,
        provider: Option<Arc<dyn ModelProvider>>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            brand: Arc::new(brand),
            provider,
            model: Model::default(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Sets the model.
    pub fn with_model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    /// Sets the reply length cap.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Build the state a [`ServerConfig`] describes.
    ///
    /// A missing credential is not an error here; it is reported per request.
    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        let provider: Option<Arc<dyn ModelProvider>> = match &config.api_key {
            Some(key) => Some(Arc::new(Anthropic::with_options(
                key,
                Some(config.base_url.clone()),
                None,
            )?)),
            None => {
                tracing::warn!(
                    "{API_KEY_ENV} is not set; chat requests will fail until it is configured"
                );
                None
            }
        };
        Ok(Self::new(
            ConfigProvider::new(&config.config_path),
            BrandContentProvider::with_extension(&config.content_dir, &config.content_extension),
            provider,
        )
        .with_model(config.model.clone())
        .with_max_tokens(config.max_tokens))
    }
}

/// Failures reported to HTTP callers before any streaming starts.
///
/// The body is always `{"error": <message>}`; internal detail stays in the
/// log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiError {
    /// The request carried no usable message.
    MessageRequired,
    /// The request body was not the expected JSON object.
    InvalidBody,
    /// No provider credential is configured.
    CredentialMissing,
    /// Anything else.
    Internal,
}

impl ApiError {
    /// The HTTP status for this failure.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MessageRequired | ApiError::InvalidBody => StatusCode::BAD_REQUEST,
            ApiError::CredentialMissing | ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The caller-visible message.
    pub fn message(&self) -> &'static str {
        match self {
            ApiError::MessageRequired => "message required",
            ApiError::InvalidBody => "invalid request body",
            ApiError::CredentialMissing => "provider credential missing",
            ApiError::Internal => "An error occurred processing your request",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.message() }))).into_response()
    }
}
