//! Lead status and reminder planning for a recorded call outcome.
//!
//! [`compute_update`] is pure: it never reads the clock or the store. The service layer loads the
//! lead snapshot under a row lock, calls it, and writes the call log, reminders, and lead fields
//! in the same transaction.

use serde::{Deserialize, Serialize};
use time::{Date, Duration};

use crate::outcome::Outcome;

/// Highest `no_response_attempts` value that still gets a next-day retry.
pub const NO_RESPONSE_SHORT_LIMIT: u32 = 3;
/// Highest `catalogue_attempts` value that still gets a next-day retry.
pub const CATALOGUE_SHORT_LIMIT: u32 = 5;
pub const SHORT_INTERVAL_DAYS: i64 = 1;
pub const LONG_INTERVAL_DAYS: [i64; 3] = [30, 60, 90];

pub const NO_RESPONSE_LONG_KIND: &str = "No response long interval";
pub const CATALOGUE_LONG_KIND: &str = "Catalogue long interval";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LeadSnapshot {
	pub no_response_attempts: u32,
	pub catalogue_attempts: u32,
	pub assigned_user: Option<String>,
}

#[derive(Clone, Debug)]
pub struct CallOutcome<'a> {
	pub outcome: &'a Outcome,
	pub call_date: Date,
	pub assignee: Option<&'a str>,
	pub followup_date: Option<Date>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadFields {
	pub current_status: String,
	pub last_call_date: Date,
	pub no_response_attempts: u32,
	pub catalogue_attempts: u32,
	pub is_active: bool,
	pub assigned_user: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedReminder {
	pub due_date: Date,
	pub kind: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeadUpdate {
	pub fields: LeadFields,
	pub reminders: Vec<PlannedReminder>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlanError {
	/// A reminder offset pushed the due date past the supported calendar range.
	DateOutOfRange { offset_days: i64 },
}

pub fn compute_update(
	snapshot: &LeadSnapshot,
	call: &CallOutcome<'_>,
) -> Result<LeadUpdate, PlanError> {
	let mut no_response_attempts = snapshot.no_response_attempts;
	let mut catalogue_attempts = snapshot.catalogue_attempts;
	let reminders = match call.outcome {
		Outcome::NoResponse => {
			no_response_attempts = no_response_attempts.saturating_add(1);

			attempt_reminders(
				call.call_date,
				no_response_attempts,
				NO_RESPONSE_SHORT_LIMIT,
				call.outcome.label(),
				NO_RESPONSE_LONG_KIND,
			)?
		},
		Outcome::Catalogue => {
			catalogue_attempts = catalogue_attempts.saturating_add(1);

			attempt_reminders(
				call.call_date,
				catalogue_attempts,
				CATALOGUE_SHORT_LIMIT,
				call.outcome.label(),
				CATALOGUE_LONG_KIND,
			)?
		},
		other => match call.followup_date {
			Some(due_date) => vec![PlannedReminder { due_date, kind: other.label().to_string() }],
			None => Vec::new(),
		},
	};
	let assigned_user = match call.assignee.map(str::trim).filter(|value| !value.is_empty()) {
		Some(assignee) => Some(assignee.to_string()),
		None => snapshot.assigned_user.clone(),
	};
	let fields = LeadFields {
		current_status: call.outcome.label().to_string(),
		last_call_date: call.call_date,
		no_response_attempts,
		catalogue_attempts,
		is_active: !call.outcome.closes_lead(),
		assigned_user,
	};

	Ok(LeadUpdate { fields, reminders })
}

fn attempt_reminders(
	call_date: Date,
	attempts: u32,
	short_limit: u32,
	short_kind: &str,
	long_kind: &str,
) -> Result<Vec<PlannedReminder>, PlanError> {
	if attempts <= short_limit {
		let due_date = offset(call_date, SHORT_INTERVAL_DAYS)?;

		return Ok(vec![PlannedReminder { due_date, kind: short_kind.to_string() }]);
	}

	LONG_INTERVAL_DAYS
		.iter()
		.map(|days| {
			Ok(PlannedReminder { due_date: offset(call_date, *days)?, kind: long_kind.to_string() })
		})
		.collect()
}

fn offset(date: Date, offset_days: i64) -> Result<Date, PlanError> {
	date.checked_add(Duration::days(offset_days)).ok_or(PlanError::DateOutOfRange { offset_days })
}
