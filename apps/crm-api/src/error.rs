use axum::{
	Json,
	extract::rejection::{JsonRejection, PathRejection, QueryRejection},
	http::StatusCode,
	response::{IntoResponse, Response},
};
use serde::Serialize;

use crm_service::Error as ServiceError;

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: &'static str,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	pub fn new(status: StatusCode, error_code: &'static str, message: impl Into<String>) -> Self {
		Self { status, error_code, message: message.into(), fields: None }
	}

	pub fn with_fields(mut self, fields: Vec<String>) -> Self {
		self.fields = Some(fields);

		self
	}

	pub fn invalid(message: impl Into<String>) -> Self {
		Self::new(StatusCode::BAD_REQUEST, "INVALID_REQUEST", message)
	}

	pub fn unauthorized(message: impl Into<String>) -> Self {
		Self::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message)
	}

	pub fn status(&self) -> StatusCode {
		self.status
	}
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::InvalidRequest { message } => Self::invalid(message),
			ServiceError::Unauthorized { message } => Self::unauthorized(message),
			ServiceError::Forbidden { message } =>
				Self::new(StatusCode::FORBIDDEN, "FORBIDDEN", message),
			ServiceError::NotFound { message } =>
				Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message),
			ServiceError::Conflict { message } =>
				Self::new(StatusCode::CONFLICT, "CONFLICT", message),
			ServiceError::Upstream { message } =>
				Self::new(StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", message),
			ServiceError::Storage { message } => {
				tracing::error!(error = %message, "Storage failure.");

				Self::new(
					StatusCode::SERVICE_UNAVAILABLE,
					"STORAGE_ERROR",
					"Storage is unavailable. Retry later.",
				)
			},
			ServiceError::Contention { message } => {
				tracing::warn!(error = %message, "Write retries exhausted.");

				Self::new(
					StatusCode::SERVICE_UNAVAILABLE,
					"CONTENTION",
					"The record is busy. Retry later.",
				)
			},
		}
	}
}

impl From<JsonRejection> for ApiError {
	fn from(rejection: JsonRejection) -> Self {
		Self::invalid(rejection.body_text())
	}
}

impl From<QueryRejection> for ApiError {
	fn from(rejection: QueryRejection) -> Self {
		Self::invalid(rejection.body_text())
	}
}

impl From<PathRejection> for ApiError {
	fn from(rejection: PathRejection) -> Self {
		Self::invalid(rejection.body_text())
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody {
			error_code: self.error_code.to_string(),
			message: self.message,
			fields: self.fields,
		};

		(self.status, Json(body)).into_response()
	}
}
