use sqlx::{Executor, Postgres, QueryBuilder};

use crate::{
	Result,
	models::{Lead, LeadStatusUpdate, NewLead},
};

const LEAD_COLUMNS: &str = "\
lead_id, database_name, customer_name, phone, location, customer_type, current_status, \
assigned_user, last_call_date, no_response_attempts, catalogue_attempts, is_active, created_at";

/// Columns a lead listing may be ordered by.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LeadSortColumn {
	#[default]
	LeadId,
	DatabaseName,
	CustomerName,
	Phone,
	Location,
	CustomerType,
	CurrentStatus,
	AssignedUser,
	LastCallDate,
	NoResponseAttempts,
	CatalogueAttempts,
	IsActive,
}
impl LeadSortColumn {
	pub fn parse(name: &str) -> Option<Self> {
		let column = match name.trim() {
			"lead_id" | "id" => Self::LeadId,
			"database_name" => Self::DatabaseName,
			"customer_name" => Self::CustomerName,
			"phone" => Self::Phone,
			"location" => Self::Location,
			"customer_type" => Self::CustomerType,
			"current_status" => Self::CurrentStatus,
			"assigned_user" => Self::AssignedUser,
			"last_call_date" => Self::LastCallDate,
			"no_response_attempts" => Self::NoResponseAttempts,
			"catalogue_attempts" => Self::CatalogueAttempts,
			"is_active" => Self::IsActive,
			_ => return None,
		};

		Some(column)
	}

	pub fn as_sql(self) -> &'static str {
		match self {
			Self::LeadId => "lead_id",
			Self::DatabaseName => "database_name",
			Self::CustomerName => "customer_name",
			Self::Phone => "phone",
			Self::Location => "location",
			Self::CustomerType => "customer_type",
			Self::CurrentStatus => "current_status",
			Self::AssignedUser => "assigned_user",
			Self::LastCallDate => "last_call_date",
			Self::NoResponseAttempts => "no_response_attempts",
			Self::CatalogueAttempts => "catalogue_attempts",
			Self::IsActive => "is_active",
		}
	}
}

#[derive(Debug, Default)]
pub struct LeadFilter<'a> {
	pub database_name: Option<&'a str>,
	pub assigned_user: Option<&'a str>,
	/// Case-insensitive substring matched against customer name, phone, and location.
	pub search: Option<&'a str>,
}

#[derive(Debug)]
pub struct LeadPage {
	pub sort: LeadSortColumn,
	pub descending: bool,
	pub limit: i64,
	pub offset: i64,
}

pub async fn count_leads<'e, E>(executor: E, filter: &LeadFilter<'_>) -> Result<i64>
where
	E: Executor<'e, Database = Postgres>,
{
	let mut builder = QueryBuilder::<Postgres>::new("SELECT count(*) FROM leads");

	push_filter(&mut builder, filter);

	let total: i64 = builder.build_query_scalar().fetch_one(executor).await?;

	Ok(total)
}

pub async fn list_leads<'e, E>(
	executor: E,
	filter: &LeadFilter<'_>,
	page: &LeadPage,
) -> Result<Vec<Lead>>
where
	E: Executor<'e, Database = Postgres>,
{
	let mut builder = QueryBuilder::<Postgres>::new(format!("SELECT {LEAD_COLUMNS} FROM leads"));

	push_filter(&mut builder, filter);

	builder.push(" ORDER BY ");
	builder.push(page.sort.as_sql());
	builder.push(if page.descending { " DESC NULLS LAST" } else { " ASC NULLS LAST" });

	if page.sort != LeadSortColumn::LeadId {
		builder.push(", lead_id ASC");
	}

	builder.push(" LIMIT ");
	builder.push_bind(page.limit);
	builder.push(" OFFSET ");
	builder.push_bind(page.offset);

	let leads = builder.build_query_as::<Lead>().fetch_all(executor).await?;

	Ok(leads)
}

/// Every lead in id order, for export.
pub async fn all_leads<'e, E>(executor: E) -> Result<Vec<Lead>>
where
	E: Executor<'e, Database = Postgres>,
{
	let leads =
		sqlx::query_as::<_, Lead>(&format!("SELECT {LEAD_COLUMNS} FROM leads ORDER BY lead_id"))
			.fetch_all(executor)
			.await?;

	Ok(leads)
}

pub async fn find_lead<'e, E>(executor: E, lead_id: i64) -> Result<Option<Lead>>
where
	E: Executor<'e, Database = Postgres>,
{
	let lead =
		sqlx::query_as::<_, Lead>(&format!("SELECT {LEAD_COLUMNS} FROM leads WHERE lead_id = $1"))
			.bind(lead_id)
			.fetch_optional(executor)
			.await?;

	Ok(lead)
}

/// Reads a lead and holds its row lock until the surrounding transaction ends.
pub async fn lock_lead<'e, E>(executor: E, lead_id: i64) -> Result<Option<Lead>>
where
	E: Executor<'e, Database = Postgres>,
{
	let lead = sqlx::query_as::<_, Lead>(&format!(
		"SELECT {LEAD_COLUMNS} FROM leads WHERE lead_id = $1 FOR UPDATE"
	))
	.bind(lead_id)
	.fetch_optional(executor)
	.await?;

	Ok(lead)
}

pub async fn apply_status_update<'e, E>(executor: E, update: &LeadStatusUpdate<'_>) -> Result<Lead>
where
	E: Executor<'e, Database = Postgres>,
{
	let lead = sqlx::query_as::<_, Lead>(&format!(
		"\
UPDATE leads
SET
	current_status = $1,
	last_call_date = $2,
	no_response_attempts = $3,
	catalogue_attempts = $4,
	is_active = $5,
	assigned_user = $6
WHERE lead_id = $7
RETURNING {LEAD_COLUMNS}"
	))
	.bind(update.current_status)
	.bind(update.last_call_date)
	.bind(update.no_response_attempts)
	.bind(update.catalogue_attempts)
	.bind(update.is_active)
	.bind(update.assigned_user)
	.bind(update.lead_id)
	.fetch_one(executor)
	.await?;

	Ok(lead)
}

/// Inserts imported leads with status `New`. Returns the number of rows written.
pub async fn insert_leads<'e, E>(executor: E, leads: &[NewLead]) -> Result<u64>
where
	E: Executor<'e, Database = Postgres>,
{
	if leads.is_empty() {
		return Ok(0);
	}

	let mut builder = QueryBuilder::<Postgres>::new(
		"INSERT INTO leads (database_name, customer_name, phone, location, customer_type) ",
	);

	builder.push_values(leads, |mut row, lead| {
		row.push_bind(lead.database_name.as_deref())
			.push_bind(lead.customer_name.as_deref())
			.push_bind(lead.phone.as_deref())
			.push_bind(lead.location.as_deref())
			.push_bind(lead.customer_type.as_deref());
	});

	let result = builder.build().execute(executor).await?;

	Ok(result.rows_affected())
}

/// Hard-deletes leads. Call logs and reminders go with them through the foreign keys.
pub async fn delete_leads<'e, E>(executor: E, lead_ids: &[i64]) -> Result<u64>
where
	E: Executor<'e, Database = Postgres>,
{
	let result = sqlx::query("DELETE FROM leads WHERE lead_id = ANY($1)")
		.bind(lead_ids)
		.execute(executor)
		.await?;

	Ok(result.rows_affected())
}

pub async fn distinct_database_names<'e, E>(executor: E) -> Result<Vec<String>>
where
	E: Executor<'e, Database = Postgres>,
{
	let names = sqlx::query_scalar::<_, String>(
		"\
SELECT DISTINCT database_name
FROM leads
WHERE database_name IS NOT NULL AND database_name <> ''
ORDER BY database_name",
	)
	.fetch_all(executor)
	.await?;

	Ok(names)
}

pub async fn distinct_assigned_users<'e, E>(executor: E) -> Result<Vec<String>>
where
	E: Executor<'e, Database = Postgres>,
{
	let users = sqlx::query_scalar::<_, String>(
		"\
SELECT DISTINCT assigned_user
FROM leads
WHERE assigned_user IS NOT NULL AND assigned_user <> ''
ORDER BY assigned_user",
	)
	.fetch_all(executor)
	.await?;

	Ok(users)
}

/// Escapes `LIKE` wildcards so user input matches literally.
pub fn like_pattern(term: &str) -> String {
	let mut pattern = String::with_capacity(term.len() + 2);

	pattern.push('%');

	for ch in term.chars() {
		if matches!(ch, '%' | '_' | '\\') {
			pattern.push('\\');
		}

		pattern.push(ch);
	}

	pattern.push('%');

	pattern
}

fn push_filter<'a>(builder: &mut QueryBuilder<'a, Postgres>, filter: &LeadFilter<'_>) {
	let mut separator = " WHERE ";

	if let Some(database_name) = filter.database_name {
		builder.push(separator);
		builder.push("database_name = ");
		builder.push_bind(database_name.to_string());

		separator = " AND ";
	}
	if let Some(assigned_user) = filter.assigned_user {
		builder.push(separator);
		builder.push("assigned_user = ");
		builder.push_bind(assigned_user.to_string());

		separator = " AND ";
	}
	if let Some(search) = filter.search {
		let pattern = like_pattern(search);

		builder.push(separator);
		builder.push("(customer_name ILIKE ");
		builder.push_bind(pattern.clone());
		builder.push(" OR phone ILIKE ");
		builder.push_bind(pattern.clone());
		builder.push(" OR location ILIKE ");
		builder.push_bind(pattern);
		builder.push(")");
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn sort_column_accepts_only_known_columns() {
		assert_eq!(LeadSortColumn::parse("customer_name"), Some(LeadSortColumn::CustomerName));
		assert_eq!(LeadSortColumn::parse("id"), Some(LeadSortColumn::LeadId));
		assert_eq!(LeadSortColumn::parse("phone; DROP TABLE leads"), None);
		assert_eq!(LeadSortColumn::parse("password_hash"), None);
	}

	#[test]
	fn sort_column_names_round_trip() {
		for column in [
			LeadSortColumn::LeadId,
			LeadSortColumn::LastCallDate,
			LeadSortColumn::NoResponseAttempts,
			LeadSortColumn::IsActive,
		] {
			assert_eq!(LeadSortColumn::parse(column.as_sql()), Some(column));
		}
	}

	#[test]
	fn like_pattern_escapes_wildcards() {
		assert_eq!(like_pattern("asha"), "%asha%");
		assert_eq!(like_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
	}

	#[test]
	fn filters_are_bound_not_interpolated() {
		let mut builder = QueryBuilder::<Postgres>::new("SELECT count(*) FROM leads");
		let filter = LeadFilter {
			database_name: Some("Expo 2024"),
			assigned_user: None,
			search: Some("o'neil"),
		};

		push_filter(&mut builder, &filter);

		assert_eq!(
			builder.sql(),
			concat!(
				"SELECT count(*) FROM leads WHERE database_name = $1 AND ",
				"(customer_name ILIKE $2 OR phone ILIKE $3 OR location ILIKE $4)",
			)
		);
	}
}
