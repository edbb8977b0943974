//! CSV lead imports from an upload or a published sheet URL.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Actor, CrmService, Error, Result};
use crm_domain::import::{self, ColumnMapping, LeadColumn, LeadRecord};
use crm_storage::{leads, models::NewLead};

/// Rows per INSERT statement. Five binds per row stays well under the Postgres bind limit.
const INSERT_CHUNK_ROWS: usize = 1_000;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ImportCsvRequest {
	pub csv: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ImportUrlRequest {
	pub url: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedColumn {
	pub field: LeadColumn,
	pub header: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
	/// Zero-based index of the row used as the header.
	pub header_row: usize,
	pub rows_read: usize,
	pub imported: u64,
	pub skipped: usize,
	pub columns: Vec<DetectedColumn>,
}

/// Parsed sheet ready to insert.
#[derive(Debug)]
pub struct ImportPlan {
	pub header_row: usize,
	pub rows_read: usize,
	pub columns: Vec<DetectedColumn>,
	pub records: Vec<LeadRecord>,
}
impl ImportPlan {
	pub fn skipped(&self) -> usize {
		self.rows_read - self.records.len()
	}
}

impl CrmService {
	pub async fn import_csv(&self, actor: &Actor, req: ImportCsvRequest) -> Result<ImportReport> {
		actor.require_admin()?;

		let plan = plan_import(&req.csv, self.cfg.import.max_rows as usize)?;

		self.store_import(actor, plan, "upload").await
	}

	/// Downloads a CSV export (for example a published Google Sheet) and imports it.
	pub async fn import_from_url(
		&self,
		actor: &Actor,
		req: ImportUrlRequest,
	) -> Result<ImportReport> {
		actor.require_admin()?;

		let url = reqwest::Url::parse(req.url.trim())
			.map_err(|err| Error::invalid(format!("url is not valid: {err}.")))?;

		if !matches!(url.scheme(), "http" | "https") {
			return Err(Error::invalid("url must use http or https."));
		}

		let client = reqwest::Client::builder()
			.timeout(Duration::from_millis(self.cfg.import.fetch_timeout_ms))
			.build()
			.map_err(upstream_error)?;
		let body = client
			.get(url.clone())
			.send()
			.await
			.and_then(reqwest::Response::error_for_status)
			.map_err(upstream_error)?
			.text()
			.await
			.map_err(upstream_error)?;
		let plan = plan_import(&body, self.cfg.import.max_rows as usize)?;

		self.store_import(actor, plan, url.host_str().unwrap_or("url")).await
	}

	async fn store_import(
		&self,
		actor: &Actor,
		plan: ImportPlan,
		source: &str,
	) -> Result<ImportReport> {
		let new_leads: Vec<NewLead> = plan.records.iter().cloned().map(new_lead).collect();
		let mut imported = 0;
		let mut tx = self.db.pool.begin().await?;

		for chunk in new_leads.chunks(INSERT_CHUNK_ROWS) {
			imported += leads::insert_leads(&mut *tx, chunk).await?;
		}

		tx.commit().await?;

		let report = ImportReport {
			header_row: plan.header_row,
			rows_read: plan.rows_read,
			imported,
			skipped: plan.skipped(),
			columns: plan.columns,
		};

		tracing::info!(
			user = %actor.username,
			source,
			rows_read = report.rows_read,
			imported = report.imported,
			skipped = report.skipped,
			"Leads imported."
		);

		Ok(report)
	}
}

/// Parses CSV text into lead records.
///
/// The header is the first of the leading rows that names a customer or phone column; rows after
/// it that map to no lead field at all are skipped.
pub fn plan_import(text: &str, max_rows: usize) -> Result<ImportPlan> {
	let mut reader = csv::ReaderBuilder::new()
		.has_headers(false)
		.flexible(true)
		.from_reader(text.trim_start_matches('\u{feff}').as_bytes());
	let mut rows = Vec::new();

	for record in reader.records() {
		let record =
			record.map_err(|err| Error::invalid(format!("CSV could not be parsed: {err}.")))?;

		rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
	}

	if rows.is_empty() {
		return Err(Error::invalid("CSV has no rows."));
	}

	let header_row = import::find_header_row(&rows);
	let mapping = import::detect_columns(&rows[header_row]);

	if mapping.is_empty() {
		return Err(Error::invalid("No lead columns found in the header row."));
	}

	let data = &rows[header_row + 1..];

	if data.len() > max_rows {
		return Err(Error::invalid(format!(
			"CSV has {} data rows. The limit is {max_rows}.",
			data.len()
		)));
	}

	let records: Vec<LeadRecord> = data
		.iter()
		.map(|row| import::record_from_row(&mapping, row))
		.filter(|record| !record.is_blank())
		.collect();

	Ok(ImportPlan {
		header_row,
		rows_read: data.len(),
		columns: detected_columns(&mapping, &rows[header_row]),
		records,
	})
}

fn detected_columns(mapping: &ColumnMapping, headers: &[String]) -> Vec<DetectedColumn> {
	LeadColumn::ALL
		.into_iter()
		.filter_map(|field| {
			let index = mapping.get(field)?;

			Some(DetectedColumn { field, header: headers.get(index)?.trim().to_string() })
		})
		.collect()
}

fn new_lead(record: LeadRecord) -> NewLead {
	NewLead {
		database_name: record.database_name,
		customer_name: record.customer_name,
		phone: record.phone,
		location: record.location,
		customer_type: record.customer_type,
	}
}

fn upstream_error(err: reqwest::Error) -> Error {
	Error::Upstream { message: format!("Failed to fetch import URL: {err}.") }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn header_is_found_below_title_rows() {
		let csv = "\
Lead sheet March,,
,,
Customer name,Phone,City
Asha Traders,9876543210.0,Pune
,,
Ravi,+91 99887 76655,
";
		let plan = plan_import(csv, 100).expect("Plan must succeed.");

		assert_eq!(plan.header_row, 2);
		assert_eq!(plan.rows_read, 3);
		assert_eq!(plan.records.len(), 2);
		assert_eq!(plan.skipped(), 1);
		assert_eq!(plan.records[0].phone.as_deref(), Some("9876543210"));
		assert_eq!(plan.records[1].phone.as_deref(), Some("919988776655"));
		assert_eq!(plan.records[1].location, None);
		let fields: Vec<(LeadColumn, &str)> =
			plan.columns.iter().map(|column| (column.field, column.header.as_str())).collect();

		assert_eq!(
			fields,
			vec![
				(LeadColumn::CustomerName, "Customer name"),
				(LeadColumn::Phone, "Phone"),
				(LeadColumn::Location, "City"),
			]
		);
	}

	#[test]
	fn byte_order_mark_and_ragged_rows_are_tolerated() {
		let csv = "\u{feff}Database,Customer name,mobile\nExpo,Asha\nExpo,Ravi,12345,extra\n";
		let plan = plan_import(csv, 100).expect("Plan must succeed.");

		assert_eq!(plan.header_row, 0);
		assert_eq!(plan.records.len(), 2);
		assert_eq!(plan.records[0].database_name.as_deref(), Some("Expo"));
		assert_eq!(plan.records[0].phone, None);
		assert_eq!(plan.records[1].phone.as_deref(), Some("12345"));
	}

	#[test]
	fn sheets_without_lead_columns_are_rejected() {
		let err = plan_import("Qty,Price\n1,2\n", 100).expect_err("Expected rejection.");

		assert!(matches!(err, Error::InvalidRequest { .. }));
		assert!(matches!(plan_import("", 100), Err(Error::InvalidRequest { .. })));
	}

	#[test]
	fn row_limit_is_enforced() {
		let csv = "Customer name\nA\nB\nC\n";

		assert!(plan_import(csv, 3).is_ok());
		assert!(matches!(plan_import(csv, 2), Err(Error::InvalidRequest { .. })));
	}
}
