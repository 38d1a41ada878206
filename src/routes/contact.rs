use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use mailrelay_contact::{OutboundMessage, Submission};
use serde::Serialize;

use crate::{error::AppError, routes::AppState};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionOutput {
    pub ok: bool,
    pub message_id: String,
}

/// POST /api/contact - Relay a contact form submission to the configured inbox
///
/// One delivery attempt per request, no retry.
pub async fn action(
    State(app_state): State<AppState>,
    payload: Result<Json<Submission>, JsonRejection>,
) -> Result<Json<ActionOutput>, AppError> {
    let Json(input) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "Unreadable contact request body");
        AppError::ValidationError("invalid request body".to_string())
    })?;

    let message = OutboundMessage::from_submission(&input)?;

    if app_state.config.email.verify_connection {
        if let Err(e) = app_state.sender.verify().await {
            tracing::warn!(error = %e, "SMTP verification failed, attempting delivery anyway");
        }
    }

    let message_id = app_state.sender.send(&message).await?;

    tracing::info!(
        message_id = %message_id,
        reply_to_domain = message.reply_to.rsplit('@').next().unwrap_or_default(),
        "Contact submission relayed"
    );

    Ok(Json(ActionOutput {
        ok: true,
        message_id,
    }))
}
