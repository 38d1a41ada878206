#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("missing required fields")]
    MissingFields,

    #[error("invalid email")]
    InvalidEmail,

    #[error("{0}")]
    Render(#[from] askama::Error),
}

impl Error {
    /// Whether the caller sent bad input, as opposed to a fault on our side.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::MissingFields | Self::InvalidEmail)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
