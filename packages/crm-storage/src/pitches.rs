use sqlx::{Executor, Postgres};

use crate::{Result, models::PitchTemplate};

const PITCH_COLUMNS: &str = "template_id, user_name, title, pitch_text, created_at";

/// Every template, newest first.
pub async fn list_all<'e, E>(executor: E) -> Result<Vec<PitchTemplate>>
where
	E: Executor<'e, Database = Postgres>,
{
	let rows = sqlx::query_as::<_, PitchTemplate>(&format!(
		"SELECT {PITCH_COLUMNS} FROM pitch_templates ORDER BY created_at DESC, template_id DESC"
	))
	.fetch_all(executor)
	.await?;

	Ok(rows)
}

pub async fn list_for_user<'e, E>(executor: E, user_name: &str) -> Result<Vec<PitchTemplate>>
where
	E: Executor<'e, Database = Postgres>,
{
	let rows = sqlx::query_as::<_, PitchTemplate>(&format!(
		"\
SELECT {PITCH_COLUMNS}
FROM pitch_templates
WHERE user_name = $1
ORDER BY created_at DESC, template_id DESC"
	))
	.bind(user_name)
	.fetch_all(executor)
	.await?;

	Ok(rows)
}

pub async fn find<'e, E>(executor: E, template_id: i64) -> Result<Option<PitchTemplate>>
where
	E: Executor<'e, Database = Postgres>,
{
	let row = sqlx::query_as::<_, PitchTemplate>(&format!(
		"SELECT {PITCH_COLUMNS} FROM pitch_templates WHERE template_id = $1"
	))
	.bind(template_id)
	.fetch_optional(executor)
	.await?;

	Ok(row)
}

pub async fn insert<'e, E>(
	executor: E,
	user_name: &str,
	title: &str,
	pitch_text: &str,
) -> Result<PitchTemplate>
where
	E: Executor<'e, Database = Postgres>,
{
	let row = sqlx::query_as::<_, PitchTemplate>(&format!(
		"\
INSERT INTO pitch_templates (user_name, title, pitch_text)
VALUES ($1, $2, $3)
RETURNING {PITCH_COLUMNS}"
	))
	.bind(user_name)
	.bind(title)
	.bind(pitch_text)
	.fetch_one(executor)
	.await?;

	Ok(row)
}

pub async fn update<'e, E>(
	executor: E,
	template_id: i64,
	title: &str,
	pitch_text: &str,
) -> Result<Option<PitchTemplate>>
where
	E: Executor<'e, Database = Postgres>,
{
	let row = sqlx::query_as::<_, PitchTemplate>(&format!(
		"\
UPDATE pitch_templates
SET title = $1, pitch_text = $2
WHERE template_id = $3
RETURNING {PITCH_COLUMNS}"
	))
	.bind(title)
	.bind(pitch_text)
	.bind(template_id)
	.fetch_optional(executor)
	.await?;

	Ok(row)
}

pub async fn delete<'e, E>(executor: E, template_id: i64) -> Result<bool>
where
	E: Executor<'e, Database = Postgres>,
{
	let result = sqlx::query("DELETE FROM pitch_templates WHERE template_id = $1")
		.bind(template_id)
		.execute(executor)
		.await?;

	Ok(result.rows_affected() > 0)
}
