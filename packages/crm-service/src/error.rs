pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Unauthorized: {message}")]
	Unauthorized { message: String },
	#[error("Forbidden: {message}")]
	Forbidden { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Conflict: {message}")]
	Conflict { message: String },
	#[error("Upstream error: {message}")]
	Upstream { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
	/// The write lost a race with another transaction and may succeed if repeated.
	#[error("Write contention: {message}")]
	Contention { message: String },
}
impl Error {
	pub(crate) fn invalid(message: impl Into<String>) -> Self {
		Self::InvalidRequest { message: message.into() }
	}

	pub(crate) fn not_found(message: impl Into<String>) -> Self {
		Self::NotFound { message: message.into() }
	}

	pub(crate) fn forbidden(message: impl Into<String>) -> Self {
		Self::Forbidden { message: message.into() }
	}
}

impl From<sqlx::Error> for Error {
	fn from(err: sqlx::Error) -> Self {
		if crate::retry::is_transient(&err) {
			Self::Contention { message: err.to_string() }
		} else {
			Self::Storage { message: err.to_string() }
		}
	}
}

impl From<crm_storage::Error> for Error {
	fn from(err: crm_storage::Error) -> Self {
		match err {
			crm_storage::Error::Sqlx(inner) => inner.into(),
			crm_storage::Error::Conflict(message) => Self::Conflict { message },
		}
	}
}
