use std::{any::Any, sync::Arc};

use axum::{
    Router,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::{
    config::Config,
    cors::{OriginPolicy, origin_guard},
    email::MessageSender,
    error::AppError,
};

pub mod contact;
pub mod diagnostics;
pub mod health;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub sender: Arc<dyn MessageSender>,
}

impl AppState {
    pub fn new(config: Config, sender: impl MessageSender) -> Self {
        Self {
            config: Arc::new(config),
            sender: Arc::new(sender),
        }
    }
}

pub async fn fallback() -> impl IntoResponse {
    AppError::NotFound
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    AppError::InternalError(format!("handler panicked: {detail}")).into_response()
}

pub fn router(app_state: AppState) -> Router {
    let policy = OriginPolicy::from_config(&app_state.config.cors);

    let mut router = Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .route("/api/contact", post(contact::action));

    if let Some(path) = app_state.config.diag_path() {
        router = router.route(path, get(diagnostics::page));
    }

    router
        .fallback(fallback)
        .with_state(app_state)
        .layer(policy.layer())
        .layer(middleware::from_fn_with_state(policy, origin_guard))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
}
