pub mod config;
pub mod cors;
pub mod email;
pub mod error;
pub mod observability;
pub mod routes;
pub mod server;

pub use config::Config;
pub use email::{MessageSender, SendError, SmtpSender};
pub use routes::{AppState, router};
