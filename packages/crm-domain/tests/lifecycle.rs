use time::{Date, macros::date};

use crm_domain::{
	CallOutcome, LeadSnapshot, LeadUpdate, Outcome, PlannedReminder,
	lifecycle::{self, CATALOGUE_LONG_KIND, NO_RESPONSE_LONG_KIND},
	outcome,
};

const CALL_DATE: Date = date!(2024 - 01 - 10);

fn plan(snapshot: &LeadSnapshot, outcome: &Outcome, followup_date: Option<Date>) -> LeadUpdate {
	lifecycle::compute_update(
		snapshot,
		&CallOutcome { outcome, call_date: CALL_DATE, assignee: None, followup_date },
	)
	.expect("Planning must succeed.")
}

fn snapshot(no_response_attempts: u32, catalogue_attempts: u32) -> LeadSnapshot {
	LeadSnapshot { no_response_attempts, catalogue_attempts, assigned_user: None }
}

fn long_interval(kind: &str) -> Vec<PlannedReminder> {
	[date!(2024 - 02 - 09), date!(2024 - 03 - 10), date!(2024 - 04 - 09)]
		.into_iter()
		.map(|due_date| PlannedReminder { due_date, kind: kind.to_string() })
		.collect()
}

#[test]
fn third_no_response_schedules_next_day_retry() {
	let update = plan(&snapshot(2, 0), &Outcome::NoResponse, None);

	assert_eq!(update.fields.no_response_attempts, 3);
	assert_eq!(update.fields.current_status, outcome::NO_RESPONSE);
	assert_eq!(update.fields.last_call_date, CALL_DATE);
	assert!(update.fields.is_active);
	assert_eq!(
		update.reminders,
		vec![PlannedReminder { due_date: date!(2024 - 01 - 11), kind: "No response".to_string() }]
	);
}

#[test]
fn fourth_no_response_switches_to_long_interval() {
	let update = plan(&snapshot(3, 0), &Outcome::NoResponse, None);

	assert_eq!(update.fields.no_response_attempts, 4);
	assert_eq!(update.reminders, long_interval(NO_RESPONSE_LONG_KIND));
}

#[test]
fn no_response_schedule_over_many_attempts() {
	for before in 0..10_u32 {
		let update = plan(&snapshot(before, 7), &Outcome::NoResponse, None);

		assert_eq!(update.fields.no_response_attempts, before + 1);
		assert_eq!(update.fields.catalogue_attempts, 7, "Catalogue counter must not move.");

		if before < lifecycle::NO_RESPONSE_SHORT_LIMIT {
			assert_eq!(update.reminders.len(), 1, "attempt {}", before + 1);
			assert_eq!(update.reminders[0].due_date, date!(2024 - 01 - 11));
		} else {
			assert_eq!(update.reminders, long_interval(NO_RESPONSE_LONG_KIND));
		}
	}
}

#[test]
fn catalogue_allows_five_short_retries() {
	for before in 0..10_u32 {
		let update = plan(&snapshot(2, before), &Outcome::Catalogue, Some(date!(2024 - 06 - 01)));

		assert_eq!(update.fields.catalogue_attempts, before + 1);
		assert_eq!(update.fields.no_response_attempts, 2, "No-response counter must not move.");
		assert!(update.fields.is_active);

		if before < lifecycle::CATALOGUE_SHORT_LIMIT {
			assert_eq!(
				update.reminders,
				vec![PlannedReminder {
					due_date: date!(2024 - 01 - 11),
					kind: outcome::CATALOGUE.to_string(),
				}],
				"Follow-up date is ignored for counted outcomes.",
			);
		} else {
			assert_eq!(update.reminders, long_interval(CATALOGUE_LONG_KIND));
		}
	}
}

#[test]
fn closing_outcomes_deactivate_the_lead() {
	for label in [outcome::PURCHASED, outcome::NOT_INTERESTED, outcome::INVALID_NUMBER] {
		let update = plan(&snapshot(1, 1), &Outcome::from_label(label), None);

		assert!(!update.fields.is_active, "{label} must close the lead.");
		assert_eq!(update.fields.current_status, label);
		assert_eq!(update.fields.no_response_attempts, 1);
		assert_eq!(update.fields.catalogue_attempts, 1);
		assert!(update.reminders.is_empty());
	}
}

#[test]
fn follow_up_date_yields_single_reminder_named_after_outcome() {
	let due = date!(2024 - 01 - 20);

	for label in [outcome::FOLLOW_UP, outcome::STORE_VISIT_MUMBAI, outcome::OTHERS, "Callback"] {
		let update = plan(&snapshot(0, 0), &Outcome::from_label(label), Some(due));

		assert!(update.fields.is_active);
		assert_eq!(
			update.reminders,
			vec![PlannedReminder { due_date: due, kind: label.to_string() }]
		);
	}
}

#[test]
fn closing_outcome_with_follow_up_date_still_plans_reminder() {
	let due = date!(2024 - 02 - 01);
	let update = plan(&snapshot(0, 0), &Outcome::Purchased, Some(due));

	assert!(!update.fields.is_active);
	assert_eq!(
		update.reminders,
		vec![PlannedReminder { due_date: due, kind: outcome::PURCHASED.to_string() }]
	);
}

#[test]
fn missing_follow_up_date_plans_nothing() {
	let update = plan(&snapshot(0, 0), &Outcome::StoreVisitDelhi, None);

	assert!(update.reminders.is_empty());
	assert_eq!(update.fields.current_status, outcome::STORE_VISIT_DELHI);
}

#[test]
fn assignee_overrides_only_when_present() {
	let existing = LeadSnapshot { assigned_user: Some("ravi".to_string()), ..Default::default() };
	let outcome = Outcome::Others;
	let reassigned = lifecycle::compute_update(
		&existing,
		&CallOutcome {
			outcome: &outcome,
			call_date: CALL_DATE,
			assignee: Some(" meera "),
			followup_date: None,
		},
	)
	.expect("Planning must succeed.");
	let kept = plan(&existing, &outcome, None);

	assert_eq!(reassigned.fields.assigned_user.as_deref(), Some("meera"));
	assert_eq!(kept.fields.assigned_user.as_deref(), Some("ravi"));
}

#[test]
fn outcome_labels_round_trip_through_json() {
	for label in outcome::KNOWN_LABELS {
		let parsed: Outcome =
			serde_json::from_value(serde_json::json!(label)).expect("Label must deserialize.");

		assert!(parsed.is_known());
		assert_eq!(serde_json::to_value(&parsed).expect("Serialize."), serde_json::json!(label));
	}

	let custom: Outcome =
		serde_json::from_value(serde_json::json!("no response")).expect("Label must deserialize.");

	assert_eq!(custom, Outcome::Custom("no response".to_string()));
}
