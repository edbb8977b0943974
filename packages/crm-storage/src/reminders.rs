use sqlx::{Executor, Postgres, QueryBuilder};
use time::Date;

use crate::{
	Result,
	models::{PendingReminder, Reminder},
};

const REMINDER_COLUMNS: &str =
	"reminder_id, lead_id, reminder_date, reminder_type, user_name, is_done, created_at";

#[derive(Debug)]
pub struct NewReminder<'a> {
	pub reminder_date: Date,
	pub reminder_type: &'a str,
}

/// Inserts every reminder for one lead and owner in a single statement.
pub async fn insert_reminders<'e, E>(
	executor: E,
	lead_id: i64,
	user_name: &str,
	reminders: &[NewReminder<'_>],
) -> Result<Vec<Reminder>>
where
	E: Executor<'e, Database = Postgres>,
{
	if reminders.is_empty() {
		return Ok(Vec::new());
	}

	let mut builder = QueryBuilder::<Postgres>::new(
		"INSERT INTO reminders (lead_id, reminder_date, reminder_type, user_name) ",
	);

	builder.push_values(reminders, |mut row, reminder| {
		row.push_bind(lead_id)
			.push_bind(reminder.reminder_date)
			.push_bind(reminder.reminder_type)
			.push_bind(user_name);
	});
	builder.push(" RETURNING ");
	builder.push(REMINDER_COLUMNS);

	let mut rows = builder.build_query_as::<Reminder>().fetch_all(executor).await?;

	rows.sort_by_key(|reminder| (reminder.reminder_date, reminder.reminder_id));

	Ok(rows)
}

pub async fn find_reminder<'e, E>(executor: E, reminder_id: i64) -> Result<Option<Reminder>>
where
	E: Executor<'e, Database = Postgres>,
{
	let reminder = sqlx::query_as::<_, Reminder>(&format!(
		"SELECT {REMINDER_COLUMNS} FROM reminders WHERE reminder_id = $1 FOR UPDATE"
	))
	.bind(reminder_id)
	.fetch_optional(executor)
	.await?;

	Ok(reminder)
}

pub async fn mark_done<'e, E>(executor: E, reminder_id: i64) -> Result<bool>
where
	E: Executor<'e, Database = Postgres>,
{
	let result = sqlx::query("UPDATE reminders SET is_done = TRUE WHERE reminder_id = $1")
		.bind(reminder_id)
		.execute(executor)
		.await?;

	Ok(result.rows_affected() > 0)
}

/// Undone reminders owned by `user_name`, soonest first. Date bounds are inclusive and optional.
pub async fn pending_for_user<'e, E>(
	executor: E,
	user_name: &str,
	start: Option<Date>,
	end: Option<Date>,
) -> Result<Vec<PendingReminder>>
where
	E: Executor<'e, Database = Postgres>,
{
	let rows = sqlx::query_as::<_, PendingReminder>(
		"\
SELECT
	r.reminder_id,
	r.lead_id,
	r.reminder_date,
	r.reminder_type,
	l.customer_name,
	l.phone
FROM reminders r
JOIN leads l ON l.lead_id = r.lead_id
WHERE r.user_name = $1
	AND r.is_done = FALSE
	AND ($2::date IS NULL OR r.reminder_date >= $2)
	AND ($3::date IS NULL OR r.reminder_date <= $3)
ORDER BY r.reminder_date, r.reminder_id",
	)
	.bind(user_name)
	.bind(start)
	.bind(end)
	.fetch_all(executor)
	.await?;

	Ok(rows)
}
