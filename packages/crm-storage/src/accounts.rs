//! Users and login sessions.

use sqlx::{Executor, Postgres};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
	Error, Result,
	error::is_unique_violation,
	models::{SessionUser, User},
};

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";

const USER_COLUMNS: &str = "user_id, username, password_hash, role, email, is_active, created_at";

pub async fn find_user_by_username<'e, E>(executor: E, username: &str) -> Result<Option<User>>
where
	E: Executor<'e, Database = Postgres>,
{
	let user = sqlx::query_as::<_, User>(&format!(
		"SELECT {USER_COLUMNS} FROM users WHERE username = $1"
	))
	.bind(username)
	.fetch_optional(executor)
	.await?;

	Ok(user)
}

pub async fn find_user<'e, E>(executor: E, user_id: i64) -> Result<Option<User>>
where
	E: Executor<'e, Database = Postgres>,
{
	let user =
		sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = $1"))
			.bind(user_id)
			.fetch_optional(executor)
			.await?;

	Ok(user)
}

pub async fn list_users<'e, E>(executor: E) -> Result<Vec<User>>
where
	E: Executor<'e, Database = Postgres>,
{
	let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY user_id");
	let users = sqlx::query_as::<_, User>(&sql).fetch_all(executor).await?;

	Ok(users)
}

pub async fn insert_user<'e, E>(
	executor: E,
	username: &str,
	password_hash: &str,
	role: &str,
	email: Option<&str>,
) -> Result<User>
where
	E: Executor<'e, Database = Postgres>,
{
	let result = sqlx::query_as::<_, User>(&format!(
		"\
INSERT INTO users (username, password_hash, role, email)
VALUES ($1, $2, $3, $4)
RETURNING {USER_COLUMNS}"
	))
	.bind(username)
	.bind(password_hash)
	.bind(role)
	.bind(email)
	.fetch_one(executor)
	.await;

	match result {
		Ok(user) => Ok(user),
		Err(err) if is_unique_violation(&err) =>
			Err(Error::Conflict(format!("Username {username:?} is already taken."))),
		Err(err) => Err(err.into()),
	}
}

/// Creates the admin account if the username is free. Returns whether a row was inserted.
pub async fn insert_admin_if_absent<'e, E>(
	executor: E,
	username: &str,
	password_hash: &str,
	email: Option<&str>,
) -> Result<bool>
where
	E: Executor<'e, Database = Postgres>,
{
	let result = sqlx::query(
		"\
INSERT INTO users (username, password_hash, role, email)
VALUES ($1, $2, 'admin', $3)
ON CONFLICT (username) DO NOTHING",
	)
	.bind(username)
	.bind(password_hash)
	.bind(email)
	.execute(executor)
	.await?;

	Ok(result.rows_affected() > 0)
}

/// Creates or restores the admin account: new password, admin role, active.
pub async fn upsert_admin<'e, E>(
	executor: E,
	username: &str,
	password_hash: &str,
	email: Option<&str>,
) -> Result<User>
where
	E: Executor<'e, Database = Postgres>,
{
	let user = sqlx::query_as::<_, User>(&format!(
		"\
INSERT INTO users (username, password_hash, role, email)
VALUES ($1, $2, 'admin', $3)
ON CONFLICT (username) DO UPDATE
SET
	password_hash = EXCLUDED.password_hash,
	role = 'admin',
	is_active = TRUE
RETURNING {USER_COLUMNS}"
	))
	.bind(username)
	.bind(password_hash)
	.bind(email)
	.fetch_one(executor)
	.await?;

	Ok(user)
}

pub async fn set_user_active<'e, E>(executor: E, user_id: i64, is_active: bool) -> Result<bool>
where
	E: Executor<'e, Database = Postgres>,
{
	let result = sqlx::query("UPDATE users SET is_active = $1 WHERE user_id = $2")
		.bind(is_active)
		.bind(user_id)
		.execute(executor)
		.await?;

	Ok(result.rows_affected() > 0)
}

pub async fn insert_session<'e, E>(
	executor: E,
	session_id: Uuid,
	user_id: i64,
	created_at: OffsetDateTime,
	expires_at: OffsetDateTime,
) -> Result<()>
where
	E: Executor<'e, Database = Postgres>,
{
	sqlx::query(
		"\
INSERT INTO sessions (session_id, user_id, created_at, expires_at)
VALUES ($1, $2, $3, $4)",
	)
	.bind(session_id)
	.bind(user_id)
	.bind(created_at)
	.bind(expires_at)
	.execute(executor)
	.await?;

	Ok(())
}

/// Resolves an unexpired session to its user.
pub async fn find_session_user<'e, E>(
	executor: E,
	session_id: Uuid,
	now: OffsetDateTime,
) -> Result<Option<SessionUser>>
where
	E: Executor<'e, Database = Postgres>,
{
	let row = sqlx::query_as::<_, SessionUser>(
		"\
SELECT
	s.session_id,
	s.user_id,
	u.username,
	u.role,
	u.is_active,
	s.expires_at
FROM sessions s
JOIN users u ON u.user_id = s.user_id
WHERE s.session_id = $1
	AND s.expires_at > $2",
	)
	.bind(session_id)
	.bind(now)
	.fetch_optional(executor)
	.await?;

	Ok(row)
}

pub async fn delete_session<'e, E>(executor: E, session_id: Uuid) -> Result<bool>
where
	E: Executor<'e, Database = Postgres>,
{
	let result = sqlx::query("DELETE FROM sessions WHERE session_id = $1")
		.bind(session_id)
		.execute(executor)
		.await?;

	Ok(result.rows_affected() > 0)
}

pub async fn delete_user_sessions<'e, E>(executor: E, user_id: i64) -> Result<u64>
where
	E: Executor<'e, Database = Postgres>,
{
	let result = sqlx::query("DELETE FROM sessions WHERE user_id = $1")
		.bind(user_id)
		.execute(executor)
		.await?;

	Ok(result.rows_affected())
}

pub async fn delete_expired_sessions<'e, E>(executor: E, now: OffsetDateTime) -> Result<u64>
where
	E: Executor<'e, Database = Postgres>,
{
	let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= $1")
		.bind(now)
		.execute(executor)
		.await?;

	Ok(result.rows_affected())
}
