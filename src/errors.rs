use axum::http::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum KpiError {
    #[error("failed to load dataset from {path}: {reason}")]
    DataLoad { path: String, reason: String },

    #[error("dataset is missing required column(s): {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("no rows match the selected location and satisfaction threshold")]
    EmptyResult,
}

impl KpiError {
    pub fn data_load(path: impl Into<String>, reason: impl ToString) -> Self {
        Self::DataLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<KpiError> for AppError {
    fn from(err: KpiError) -> Self {
        match err {
            KpiError::EmptyResult => Self::not_found(err.to_string()),
            other => Self::internal(other),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
