#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use mailrelay::{
    AppState, MessageSender, SendError,
    config::{Config, CorsConfig, EmailConfig, ObservabilityConfig, ServerConfig},
};
use mailrelay_contact::OutboundMessage;
use tower::ServiceExt;

/// How the fake transport behaves on `send`
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum SendBehavior {
    Deliver,
    FailAuth,
    Panic,
}

/// Records every message instead of talking to an SMTP server
#[derive(Clone)]
pub struct RecordingSender {
    pub sent: Arc<Mutex<Vec<OutboundMessage>>>,
    pub verify_calls: Arc<Mutex<usize>>,
    pub send_behavior: SendBehavior,
    pub verify_fails: bool,
}

impl RecordingSender {
    pub fn new(send_behavior: SendBehavior) -> Self {
        Self {
            sent: Arc::default(),
            verify_calls: Arc::default(),
            send_behavior,
            verify_fails: false,
        }
    }

    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn verify_calls(&self) -> usize {
        *self.verify_calls.lock().unwrap()
    }
}

#[async_trait]
impl MessageSender for RecordingSender {
    async fn send(&self, message: &OutboundMessage) -> Result<String, SendError> {
        match self.send_behavior {
            SendBehavior::Deliver => {
                let mut sent = self.sent.lock().unwrap();
                sent.push(message.clone());
                Ok(format!("<test-{}@relay.test>", sent.len()))
            }
            SendBehavior::FailAuth => Err(SendError::Transport(
                "permanent error (535): 5.7.8 authentication failed".to_string(),
            )),
            SendBehavior::Panic => panic!("transport exploded"),
        }
    }

    async fn verify(&self) -> Result<(), SendError> {
        *self.verify_calls.lock().unwrap() += 1;

        if self.verify_fails {
            return Err(SendError::Transport("connection refused".to_string()));
        }

        Ok(())
    }
}

pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3001,
            diag_path: None,
        },
        email: EmailConfig {
            smtp_host: "smtp.relay.test".to_string(),
            smtp_username: "relay@relay.test".to_string(),
            smtp_password: "secret-password".to_string(),
            contact_address: "inbox@owner.test".to_string(),
            ..EmailConfig::default()
        },
        cors: CorsConfig {
            allowed_origins: "https://owner.test".to_string(),
        },
        observability: ObservabilityConfig::default(),
    }
}

pub fn create_test_app(config: Config, sender: RecordingSender) -> Router {
    mailrelay::router(AppState::new(config, sender))
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

pub async fn send(router: &Router, request: Request<Body>) -> TestResponse {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes();

    TestResponse {
        status,
        headers,
        body: String::from_utf8(body.to_vec()).unwrap(),
    }
}

pub fn post_contact(body: impl Into<String>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/contact")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.into()))
        .unwrap()
}
