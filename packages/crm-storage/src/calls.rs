//! Call log writes and the aggregates behind the reports view.

use sqlx::{Executor, Postgres};
use time::Date;

use crate::{
	Result,
	models::{CallLog, DailyCalls, LabelCount, NewCallLog},
};

const CALL_LOG_COLUMNS: &str =
	"call_log_id, lead_id, user_name, call_date, outcome, pitch_used, notes, logged_at";

// Open bounds are passed as NULL so every aggregate shares one statement shape.
const RANGE_FILTER: &str = "($1::date IS NULL OR c.call_date >= $1) \
AND ($2::date IS NULL OR c.call_date <= $2)";

pub async fn insert_call_log<'e, E>(executor: E, entry: &NewCallLog<'_>) -> Result<CallLog>
where
	E: Executor<'e, Database = Postgres>,
{
	let call_log = sqlx::query_as::<_, CallLog>(&format!(
		"\
INSERT INTO call_logs (lead_id, user_name, call_date, outcome, pitch_used, notes)
VALUES ($1, $2, $3, $4, $5, $6)
RETURNING {CALL_LOG_COLUMNS}"
	))
	.bind(entry.lead_id)
	.bind(entry.user_name)
	.bind(entry.call_date)
	.bind(entry.outcome)
	.bind(entry.pitch_used)
	.bind(entry.notes)
	.fetch_one(executor)
	.await?;

	Ok(call_log)
}

/// Latest calls for one lead, newest call date first.
pub async fn recent_calls<'e, E>(executor: E, lead_id: i64, limit: i64) -> Result<Vec<CallLog>>
where
	E: Executor<'e, Database = Postgres>,
{
	let calls = sqlx::query_as::<_, CallLog>(&format!(
		"\
SELECT {CALL_LOG_COLUMNS}
FROM call_logs
WHERE lead_id = $1
ORDER BY call_date DESC, call_log_id DESC
LIMIT $2"
	))
	.bind(lead_id)
	.bind(limit)
	.fetch_all(executor)
	.await?;

	Ok(calls)
}

pub async fn count_calls<'e, E>(executor: E, start: Option<Date>, end: Option<Date>) -> Result<i64>
where
	E: Executor<'e, Database = Postgres>,
{
	let total: i64 =
		sqlx::query_scalar(&format!("SELECT count(*) FROM call_logs c WHERE {RANGE_FILTER}"))
			.bind(start)
			.bind(end)
			.fetch_one(executor)
			.await?;

	Ok(total)
}

pub async fn calls_per_day<'e, E>(
	executor: E,
	start: Option<Date>,
	end: Option<Date>,
) -> Result<Vec<DailyCalls>>
where
	E: Executor<'e, Database = Postgres>,
{
	let rows = sqlx::query_as::<_, DailyCalls>(&format!(
		"\
SELECT c.call_date, count(*) AS calls
FROM call_logs c
WHERE {RANGE_FILTER}
GROUP BY c.call_date
ORDER BY c.call_date"
	))
	.bind(start)
	.bind(end)
	.fetch_all(executor)
	.await?;

	Ok(rows)
}

pub async fn outcome_counts<'e, E>(
	executor: E,
	start: Option<Date>,
	end: Option<Date>,
) -> Result<Vec<LabelCount>>
where
	E: Executor<'e, Database = Postgres>,
{
	let rows = sqlx::query_as::<_, LabelCount>(&format!(
		"\
SELECT c.outcome AS label, count(*) AS count
FROM call_logs c
WHERE {RANGE_FILTER}
GROUP BY c.outcome
ORDER BY 2 DESC, 1 ASC"
	))
	.bind(start)
	.bind(end)
	.fetch_all(executor)
	.await?;

	Ok(rows)
}

/// Calls grouped by the source database of the called lead. Leads without one report as `''`.
pub async fn database_counts<'e, E>(
	executor: E,
	start: Option<Date>,
	end: Option<Date>,
) -> Result<Vec<LabelCount>>
where
	E: Executor<'e, Database = Postgres>,
{
	let rows = sqlx::query_as::<_, LabelCount>(&format!(
		"\
SELECT coalesce(l.database_name, '') AS label, count(*) AS count
FROM call_logs c
LEFT JOIN leads l ON l.lead_id = c.lead_id
WHERE {RANGE_FILTER}
GROUP BY 1
ORDER BY 2 DESC, 1 ASC"
	))
	.bind(start)
	.bind(end)
	.fetch_all(executor)
	.await?;

	Ok(rows)
}
