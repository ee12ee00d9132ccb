//! Boundary error taxonomy
//!
//! Every variant maps to a status and a fixed public body. The detail
//! string is for logs only and never reaches the client.

use thiserror::Error;

use crate::http::{Response, Status};

#[derive(Error, Debug)]
pub enum ServeError {
    #[error("Server misconfigured: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServeError {
    pub fn status(&self) -> Status {
        match self {
            Self::Config(_) | Self::Internal(_) | Self::Io(_) => Status::InternalServerError,
            Self::NotFound(_) => Status::NotFound,
            Self::BadRequest(_) => Status::BadRequest,
        }
    }

    /// Body sent to the client
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::Config(_) => "Server misconfigured",
            Self::NotFound(_) => "Not Found",
            Self::BadRequest(_) => "Bad Request",
            Self::Internal(_) | Self::Io(_) => "Internal Server Error",
        }
    }

    /// Log the detail and build the safe response.
    pub fn to_response(&self) -> Response {
        match self.status() {
            Status::InternalServerError => log::error!("{}", self),
            _ => log::debug!("{}", self),
        }
        Response::text(self.status(), self.public_message())
    }
}
