use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::{debug, error};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::QueryError;

/// Body for every failed request, `{"Error": "<message>"}`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct ErrorBody {
    #[serde(rename = "Error")]
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl ToString) -> Self {
        Self {
            error: error.to_string(),
        }
    }
}

// Bad input keeps a 200 status, clients look for the "Error" key instead
impl IntoResponse for QueryError {
    fn into_response(self) -> Response {
        let status = if self.is_user_facing() {
            debug!("rejected request: {}", self);
            StatusCode::OK
        } else {
            error!("error querying observations: {}", self);
            StatusCode::INTERNAL_SERVER_ERROR
        };

        (status, Json(ErrorBody::new(self))).into_response()
    }
}
