use time::{Date, OffsetDateTime};
use uuid::Uuid;

#[derive(Debug, sqlx::FromRow)]
pub struct User {
	pub user_id: i64,
	pub username: String,
	pub password_hash: String,
	pub role: String,
	pub email: Option<String>,
	pub is_active: bool,
	pub created_at: OffsetDateTime,
}

/// Session joined with its owner.
#[derive(Debug, sqlx::FromRow)]
pub struct SessionUser {
	pub session_id: Uuid,
	pub user_id: i64,
	pub username: String,
	pub role: String,
	pub is_active: bool,
	pub expires_at: OffsetDateTime,
}

#[derive(Debug, sqlx::FromRow)]
pub struct Lead {
	pub lead_id: i64,
	pub database_name: Option<String>,
	pub customer_name: Option<String>,
	pub phone: Option<String>,
	pub location: Option<String>,
	pub customer_type: Option<String>,
	pub current_status: String,
	pub assigned_user: Option<String>,
	pub last_call_date: Option<Date>,
	pub no_response_attempts: i32,
	pub catalogue_attempts: i32,
	pub is_active: bool,
	pub created_at: OffsetDateTime,
}

#[derive(Debug, Default)]
pub struct NewLead {
	pub database_name: Option<String>,
	pub customer_name: Option<String>,
	pub phone: Option<String>,
	pub location: Option<String>,
	pub customer_type: Option<String>,
}

/// Fields written back after a call outcome.
#[derive(Debug)]
pub struct LeadStatusUpdate<'a> {
	pub lead_id: i64,
	pub current_status: &'a str,
	pub last_call_date: Date,
	pub no_response_attempts: i32,
	pub catalogue_attempts: i32,
	pub is_active: bool,
	pub assigned_user: Option<&'a str>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct CallLog {
	pub call_log_id: i64,
	pub lead_id: i64,
	pub user_name: String,
	pub call_date: Date,
	pub outcome: String,
	pub pitch_used: String,
	pub notes: String,
	pub logged_at: OffsetDateTime,
}

#[derive(Debug)]
pub struct NewCallLog<'a> {
	pub lead_id: i64,
	pub user_name: &'a str,
	pub call_date: Date,
	pub outcome: &'a str,
	pub pitch_used: &'a str,
	pub notes: &'a str,
}

#[derive(Debug, sqlx::FromRow)]
pub struct Reminder {
	pub reminder_id: i64,
	pub lead_id: i64,
	pub reminder_date: Date,
	pub reminder_type: String,
	pub user_name: String,
	pub is_done: bool,
	pub created_at: OffsetDateTime,
}

/// Undone reminder joined with the lead contact fields shown on the follow-up list.
#[derive(Debug, sqlx::FromRow)]
pub struct PendingReminder {
	pub reminder_id: i64,
	pub lead_id: i64,
	pub reminder_date: Date,
	pub reminder_type: String,
	pub customer_name: Option<String>,
	pub phone: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct PitchTemplate {
	pub template_id: i64,
	pub user_name: String,
	pub title: String,
	pub pitch_text: String,
	pub created_at: OffsetDateTime,
}

#[derive(Debug, sqlx::FromRow)]
pub struct DailyCalls {
	pub call_date: Date,
	pub calls: i64,
}

#[derive(Debug, sqlx::FromRow)]
pub struct LabelCount {
	pub label: String,
	pub count: i64,
}
