//! Request outcome status.

use serde::Serialize;

/// Outcome of processing one request.
///
/// Attached to an [`Agent`](crate::Agent) once the dispatch pipeline has
/// finished. Each status maps to the HTTP code an embedding web server would
/// answer with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Status {
    /// Handler ran to completion.
    Ok,
    /// Malformed or incomplete payload, or unknown action.
    InvalidData,
    /// Shared secret did not match.
    AccessDenied,
    /// Requested resource does not exist.
    NotFound,
    /// Fault inside the application.
    InternalError,
}

impl Status {
    /// HTTP status code for this outcome.
    #[inline]
    pub fn http_code(self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::InvalidData => 400,
            Status::AccessDenied => 403,
            Status::NotFound => 404,
            Status::InternalError => 500,
        }
    }

    /// Whether this status represents a successful request.
    #[inline]
    pub fn is_ok(self) -> bool {
        self == Status::Ok
    }
}
