//! Call outcome recording: the lifecycle engine applied inside one transaction.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
	Actor, CallLogView, CrmService, Error, LeadView, ReminderView, Result, non_blank, retry,
	views::counter,
};
use crm_domain::{CallOutcome, LeadSnapshot, Outcome, PlanError, lifecycle, outcome};
use crm_storage::{
	calls, leads,
	models::{LeadStatusUpdate, NewCallLog},
	reminders::{self, NewReminder},
};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RecordOutcomeRequest {
	/// Filled from the route path over HTTP.
	#[serde(default)]
	pub lead_id: i64,
	pub outcome: String,
	#[serde(with = "crate::time_serde::date")]
	pub call_date: Date,
	#[serde(default)]
	pub notes: String,
	#[serde(default)]
	pub pitch: String,
	#[serde(default)]
	pub assignee: Option<String>,
	#[serde(default, with = "crate::time_serde::date::option")]
	pub followup_date: Option<Date>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RecordOutcomeResponse {
	pub lead: LeadView,
	pub reminders: Vec<ReminderView>,
	pub call_log: CallLogView,
}

impl CrmService {
	pub async fn record_outcome(
		&self,
		actor: &Actor,
		req: RecordOutcomeRequest,
	) -> Result<RecordOutcomeResponse> {
		let outcome = self.parse_outcome(&req.outcome)?;
		let req = &req;
		let outcome = &outcome;

		retry::with_write_retry(&self.cfg.storage.postgres, "record_outcome", move || {
			self.record_outcome_once(actor, req, outcome)
		})
		.await
	}

	async fn record_outcome_once(
		&self,
		actor: &Actor,
		req: &RecordOutcomeRequest,
		outcome: &Outcome,
	) -> Result<RecordOutcomeResponse> {
		let mut tx = self.db.pool.begin().await?;
		let lead = leads::lock_lead(&mut *tx, req.lead_id)
			.await?
			.ok_or_else(|| Error::not_found(format!("Lead {} not found.", req.lead_id)))?;
		let snapshot = LeadSnapshot {
			no_response_attempts: counter(lead.no_response_attempts),
			catalogue_attempts: counter(lead.catalogue_attempts),
			assigned_user: lead.assigned_user,
		};
		let update = lifecycle::compute_update(
			&snapshot,
			&CallOutcome {
				outcome,
				call_date: req.call_date,
				assignee: non_blank(req.assignee.as_deref()),
				followup_date: req.followup_date,
			},
		)
		.map_err(plan_error)?;
		let call_log = calls::insert_call_log(
			&mut *tx,
			&NewCallLog {
				lead_id: req.lead_id,
				user_name: &actor.username,
				call_date: req.call_date,
				outcome: outcome.label(),
				pitch_used: req.pitch.trim(),
				notes: req.notes.trim(),
			},
		)
		.await?;
		let planned: Vec<NewReminder<'_>> = update
			.reminders
			.iter()
			.map(|reminder| NewReminder {
				reminder_date: reminder.due_date,
				reminder_type: &reminder.kind,
			})
			.collect();
		let created =
			reminders::insert_reminders(&mut *tx, req.lead_id, &actor.username, &planned).await?;
		let fields = &update.fields;
		let lead = leads::apply_status_update(
			&mut *tx,
			&LeadStatusUpdate {
				lead_id: req.lead_id,
				current_status: &fields.current_status,
				last_call_date: fields.last_call_date,
				no_response_attempts: stored_counter(fields.no_response_attempts)?,
				catalogue_attempts: stored_counter(fields.catalogue_attempts)?,
				is_active: fields.is_active,
				assigned_user: fields.assigned_user.as_deref(),
			},
		)
		.await?;

		tx.commit().await?;

		tracing::info!(
			lead_id = req.lead_id,
			user = %actor.username,
			outcome = %outcome,
			reminders = created.len(),
			is_active = fields.is_active,
			"Call outcome recorded."
		);

		Ok(RecordOutcomeResponse {
			lead: lead.into(),
			reminders: created.into_iter().map(Into::into).collect(),
			call_log: call_log.into(),
		})
	}

	pub async fn lead_summary(&self, lead_id: i64) -> Result<LeadView> {
		let lead = leads::find_lead(&self.db.pool, lead_id)
			.await?
			.ok_or_else(|| Error::not_found(format!("Lead {lead_id} not found.")))?;

		Ok(lead.into())
	}

	/// Most recent calls for a lead, newest call date first.
	pub async fn call_history(&self, lead_id: i64) -> Result<Vec<CallLogView>> {
		if leads::find_lead(&self.db.pool, lead_id).await?.is_none() {
			return Err(Error::not_found(format!("Lead {lead_id} not found.")));
		}

		let limit = i64::from(self.cfg.workflow.call_history_limit);
		let rows = calls::recent_calls(&self.db.pool, lead_id, limit).await?;

		Ok(rows.into_iter().map(Into::into).collect())
	}

	fn parse_outcome(&self, raw: &str) -> Result<Outcome> {
		let label = raw.trim();

		if label.is_empty() {
			return Err(Error::invalid("outcome must be non-empty."));
		}

		let outcome = Outcome::from_label(label);

		if self.cfg.workflow.strict_outcomes && !outcome.is_known() {
			return Err(Error::invalid(format!(
				"Unknown outcome {label:?}. Expected one of: {}.",
				outcome::KNOWN_LABELS.join(", ")
			)));
		}

		Ok(outcome)
	}
}

fn plan_error(err: PlanError) -> Error {
	match err {
		PlanError::DateOutOfRange { offset_days } => Error::invalid(format!(
			"Reminder date {offset_days} days after the call date is out of range."
		)),
	}
}

fn stored_counter(value: u32) -> Result<i32> {
	i32::try_from(value).map_err(|_| Error::Storage {
		message: "Attempt counter exceeds the storable range.".to_string(),
	})
}
