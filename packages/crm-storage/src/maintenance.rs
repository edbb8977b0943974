//! Bulk wipes for the admin danger zone. Callers run these inside a transaction.

use sqlx::PgConnection;

use crate::Result;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WipeCounts {
	pub reminders: u64,
	pub call_logs: u64,
	pub leads: u64,
	pub pitch_templates: u64,
	pub users: u64,
}

/// Removes reminders, call logs, and leads, then restarts their id sequences.
pub async fn wipe_lead_data(conn: &mut PgConnection) -> Result<WipeCounts> {
	let reminders = sqlx::query("DELETE FROM reminders").execute(&mut *conn).await?.rows_affected();
	let call_logs = sqlx::query("DELETE FROM call_logs").execute(&mut *conn).await?.rows_affected();
	let leads = sqlx::query("DELETE FROM leads").execute(&mut *conn).await?.rows_affected();

	for statement in [
		"ALTER TABLE reminders ALTER COLUMN reminder_id RESTART WITH 1",
		"ALTER TABLE call_logs ALTER COLUMN call_log_id RESTART WITH 1",
		"ALTER TABLE leads ALTER COLUMN lead_id RESTART WITH 1",
	] {
		sqlx::query(statement).execute(&mut *conn).await?;
	}

	Ok(WipeCounts { reminders, call_logs, leads, ..Default::default() })
}

/// Removes every row in every table, sessions included, and restarts all id sequences.
pub async fn wipe_everything(conn: &mut PgConnection) -> Result<WipeCounts> {
	let mut counts = wipe_lead_data(&mut *conn).await?;

	counts.pitch_templates =
		sqlx::query("DELETE FROM pitch_templates").execute(&mut *conn).await?.rows_affected();

	sqlx::query("DELETE FROM sessions").execute(&mut *conn).await?;

	counts.users = sqlx::query("DELETE FROM users").execute(&mut *conn).await?.rows_affected();

	for statement in [
		"ALTER TABLE pitch_templates ALTER COLUMN template_id RESTART WITH 1",
		"ALTER TABLE users ALTER COLUMN user_id RESTART WITH 1",
	] {
		sqlx::query(statement).execute(&mut *conn).await?;
	}

	Ok(counts)
}
