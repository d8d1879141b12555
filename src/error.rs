use std::num::ParseIntError;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::resolver::ResolveError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("error parsing {segment}: {source}")]
    InvalidSegment {
        segment: &'static str,
        #[source]
        source: ParseIntError,
    },

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidSegment { .. } | AppError::Resolve(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
