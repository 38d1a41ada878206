mod error;
mod message;
mod submission;

pub use error::*;
pub use message::*;
pub use submission::*;
