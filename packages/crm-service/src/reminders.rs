use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{Actor, CallLogView, CrmService, Error, PendingReminderView, Result, retry};
use crm_domain::outcome::FOLLOW_UP;
use crm_storage::{calls, models::NewCallLog, reminders};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PendingRemindersRequest {
	#[serde(default, with = "crate::time_serde::date::option")]
	pub start: Option<Date>,
	#[serde(default, with = "crate::time_serde::date::option")]
	pub end: Option<Date>,
	/// Ignore the date range and return every undone reminder.
	#[serde(default)]
	pub all: bool,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MarkDoneRequest {
	#[serde(default)]
	pub notes: String,
	/// Date recorded on the follow-up call log. Defaults to today (UTC).
	#[serde(default, with = "crate::time_serde::date::option")]
	pub done_on: Option<Date>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MarkDoneResponse {
	pub reminder_id: i64,
	pub call_log: CallLogView,
}

impl CrmService {
	/// Undone reminders owned by the actor, soonest first.
	pub async fn pending_reminders(
		&self,
		actor: &Actor,
		req: PendingRemindersRequest,
	) -> Result<Vec<PendingReminderView>> {
		let (start, end) = if req.all { (None, None) } else { (req.start, req.end) };

		if let (Some(start), Some(end)) = (start, end)
			&& start > end
		{
			return Err(Error::invalid("start must not be after end."));
		}

		let rows = reminders::pending_for_user(&self.db.pool, &actor.username, start, end).await?;

		Ok(rows.into_iter().map(Into::into).collect())
	}

	/// Closes a reminder and logs a `Follow up` call for its lead in the same transaction.
	pub async fn mark_reminder_done(
		&self,
		actor: &Actor,
		reminder_id: i64,
		req: MarkDoneRequest,
	) -> Result<MarkDoneResponse> {
		let done_on = req.done_on.unwrap_or_else(|| OffsetDateTime::now_utc().date());
		let notes = req.notes.trim();

		retry::with_write_retry(&self.cfg.storage.postgres, "mark_reminder_done", move || {
			self.mark_reminder_done_once(actor, reminder_id, done_on, notes)
		})
		.await
	}

	async fn mark_reminder_done_once(
		&self,
		actor: &Actor,
		reminder_id: i64,
		done_on: Date,
		notes: &str,
	) -> Result<MarkDoneResponse> {
		let mut tx = self.db.pool.begin().await?;
		let reminder = reminders::find_reminder(&mut *tx, reminder_id)
			.await?
			.ok_or_else(|| Error::not_found(format!("Reminder {reminder_id} not found.")))?;

		if reminder.user_name != actor.username && !actor.is_admin() {
			return Err(Error::forbidden("Reminder belongs to another user."));
		}
		if reminder.is_done {
			return Err(Error::Conflict { message: "Reminder is already done.".to_string() });
		}

		reminders::mark_done(&mut *tx, reminder_id).await?;

		let call_log = calls::insert_call_log(
			&mut *tx,
			&NewCallLog {
				lead_id: reminder.lead_id,
				user_name: &actor.username,
				call_date: done_on,
				outcome: FOLLOW_UP,
				pitch_used: "",
				notes,
			},
		)
		.await?;

		tx.commit().await?;

		tracing::info!(
			reminder_id,
			lead_id = reminder.lead_id,
			user = %actor.username,
			"Reminder done."
		);

		Ok(MarkDoneResponse { reminder_id, call_log: call_log.into() })
	}
}
