use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use lifeline_db::StoreError;

/// Request-level error taxonomy. Every variant maps to a status code and a
/// structured `{"error": ...}` body. Provider faults deliberately have no
/// variant here: they are folded into alert outcomes and never fail the
/// request on their own.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidArgument(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(&'static str),
    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound => Self::NotFound("record"),
            StoreError::NotOwner => Self::Unauthorized,
            other => {
                error!("Store fault: {}", other);
                Self::Internal
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_taxonomy() {
        assert!(matches!(
            ApiError::from(StoreError::NotFound),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from(StoreError::NotOwner),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            ApiError::from(StoreError::Poisoned),
            ApiError::Internal
        ));
    }

    #[test]
    fn status_codes() {
        assert_eq!(ApiError::invalid("bad").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::NotFound("zone").status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
