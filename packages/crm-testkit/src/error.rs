pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("CRM_PG_DSN is not a valid Postgres DSN: {0}.")]
	InvalidDsn(sqlx::Error),

	#[error("Failed to {action}: {source}.")]
	Admin { action: &'static str, source: sqlx::Error },
}
