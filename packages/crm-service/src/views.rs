//! JSON shapes returned by service operations.

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crm_storage::models::{
	CallLog, DailyCalls, LabelCount, Lead, PendingReminder, PitchTemplate, Reminder, User,
};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LeadView {
	pub lead_id: i64,
	pub database_name: Option<String>,
	pub customer_name: Option<String>,
	pub phone: Option<String>,
	pub location: Option<String>,
	pub customer_type: Option<String>,
	pub current_status: String,
	pub assigned_user: Option<String>,
	#[serde(default, with = "crate::time_serde::date::option")]
	pub last_call_date: Option<Date>,
	pub no_response_attempts: u32,
	pub catalogue_attempts: u32,
	pub is_active: bool,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
}
impl From<Lead> for LeadView {
	fn from(lead: Lead) -> Self {
		Self {
			lead_id: lead.lead_id,
			database_name: lead.database_name,
			customer_name: lead.customer_name,
			phone: lead.phone,
			location: lead.location,
			customer_type: lead.customer_type,
			current_status: lead.current_status,
			assigned_user: lead.assigned_user,
			last_call_date: lead.last_call_date,
			no_response_attempts: counter(lead.no_response_attempts),
			catalogue_attempts: counter(lead.catalogue_attempts),
			is_active: lead.is_active,
			created_at: lead.created_at,
		}
	}
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CallLogView {
	pub call_log_id: i64,
	pub lead_id: i64,
	pub user_name: String,
	#[serde(with = "crate::time_serde::date")]
	pub call_date: Date,
	pub outcome: String,
	pub pitch_used: String,
	pub notes: String,
	#[serde(with = "crate::time_serde")]
	pub logged_at: OffsetDateTime,
}
impl From<CallLog> for CallLogView {
	fn from(row: CallLog) -> Self {
		Self {
			call_log_id: row.call_log_id,
			lead_id: row.lead_id,
			user_name: row.user_name,
			call_date: row.call_date,
			outcome: row.outcome,
			pitch_used: row.pitch_used,
			notes: row.notes,
			logged_at: row.logged_at,
		}
	}
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReminderView {
	pub reminder_id: i64,
	pub lead_id: i64,
	#[serde(with = "crate::time_serde::date")]
	pub reminder_date: Date,
	pub reminder_type: String,
	pub user_name: String,
	pub is_done: bool,
}
impl From<Reminder> for ReminderView {
	fn from(row: Reminder) -> Self {
		Self {
			reminder_id: row.reminder_id,
			lead_id: row.lead_id,
			reminder_date: row.reminder_date,
			reminder_type: row.reminder_type,
			user_name: row.user_name,
			is_done: row.is_done,
		}
	}
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PendingReminderView {
	pub reminder_id: i64,
	pub lead_id: i64,
	#[serde(with = "crate::time_serde::date")]
	pub reminder_date: Date,
	pub reminder_type: String,
	pub customer_name: Option<String>,
	pub phone: Option<String>,
}
impl From<PendingReminder> for PendingReminderView {
	fn from(row: PendingReminder) -> Self {
		Self {
			reminder_id: row.reminder_id,
			lead_id: row.lead_id,
			reminder_date: row.reminder_date,
			reminder_type: row.reminder_type,
			customer_name: row.customer_name,
			phone: row.phone,
		}
	}
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PitchView {
	pub template_id: i64,
	pub user_name: String,
	pub title: String,
	pub pitch_text: String,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
}
impl From<PitchTemplate> for PitchView {
	fn from(row: PitchTemplate) -> Self {
		Self {
			template_id: row.template_id,
			user_name: row.user_name,
			title: row.title,
			pitch_text: row.pitch_text,
			created_at: row.created_at,
		}
	}
}

/// Account details safe to return to clients. The password hash never leaves the service.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserView {
	pub user_id: i64,
	pub username: String,
	pub role: String,
	pub email: Option<String>,
	pub is_active: bool,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
}
impl From<User> for UserView {
	fn from(user: User) -> Self {
		Self {
			user_id: user.user_id,
			username: user.username,
			role: user.role,
			email: user.email,
			is_active: user.is_active,
			created_at: user.created_at,
		}
	}
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DailyCallsView {
	#[serde(with = "crate::time_serde::date")]
	pub call_date: Date,
	pub calls: i64,
}
impl From<DailyCalls> for DailyCallsView {
	fn from(row: DailyCalls) -> Self {
		Self { call_date: row.call_date, calls: row.calls }
	}
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LabelCountView {
	pub label: String,
	pub count: i64,
}
impl From<LabelCount> for LabelCountView {
	fn from(row: LabelCount) -> Self {
		Self { label: row.label, count: row.count }
	}
}

// Counters carry a non-negative CHECK constraint.
pub(crate) fn counter(value: i32) -> u32 {
	u32::try_from(value).unwrap_or_default()
}
