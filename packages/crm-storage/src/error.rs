#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Sqlx(#[from] sqlx::Error),
	#[error("Conflict: {0}")]
	Conflict(String),
}
impl Error {
	/// Postgres SQLSTATE of the underlying database error, if any.
	pub fn sqlstate(&self) -> Option<String> {
		match self {
			Self::Sqlx(sqlx::Error::Database(err)) => err.code().map(|code| code.into_owned()),
			_ => None,
		}
	}
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
	matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}
