use serde::{Deserialize, Serialize};

use crate::{Actor, CrmService, Error, LeadView, Result, non_blank, time_serde};
use crm_storage::leads::{self, LeadFilter, LeadPage, LeadSortColumn};

const EXPORT_HEADERS: [&str; 13] = [
	"lead_id",
	"database_name",
	"customer_name",
	"phone",
	"location",
	"customer_type",
	"current_status",
	"assigned_user",
	"last_call_date",
	"no_response_attempts",
	"catalogue_attempts",
	"is_active",
	"created_at",
];

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ListLeadsRequest {
	#[serde(default)]
	pub database_name: Option<String>,
	#[serde(default)]
	pub assigned_user: Option<String>,
	#[serde(default)]
	pub search: Option<String>,
	#[serde(default)]
	pub sort_by: Option<String>,
	#[serde(default)]
	pub sort_desc: bool,
	/// Zero-based.
	#[serde(default)]
	pub page: u32,
	#[serde(default)]
	pub page_size: Option<u32>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ListLeadsResponse {
	pub items: Vec<LeadView>,
	pub total: i64,
	pub page: u32,
	pub page_size: u32,
	pub page_count: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LeadFilters {
	pub databases: Vec<String>,
	pub assigned_users: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeleteLeadsRequest {
	pub lead_ids: Vec<i64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeleteLeadsResponse {
	pub deleted: u64,
}

impl CrmService {
	pub async fn list_leads(&self, req: ListLeadsRequest) -> Result<ListLeadsResponse> {
		let sort = match non_blank(req.sort_by.as_deref()) {
			Some(name) => LeadSortColumn::parse(name)
				.ok_or_else(|| Error::invalid(format!("Cannot sort leads by {name:?}.")))?,
			None => LeadSortColumn::default(),
		};
		let limits = &self.cfg.leads;
		let page_size =
			clamp_page_size(req.page_size, limits.default_page_size, limits.max_page_size);
		let filter = LeadFilter {
			database_name: non_blank(req.database_name.as_deref()),
			assigned_user: non_blank(req.assigned_user.as_deref()),
			search: non_blank(req.search.as_deref()),
		};
		let page = LeadPage {
			sort,
			descending: req.sort_desc,
			limit: i64::from(page_size),
			offset: i64::from(req.page) * i64::from(page_size),
		};
		let total = leads::count_leads(&self.db.pool, &filter).await?;
		let items = leads::list_leads(&self.db.pool, &filter, &page).await?;

		Ok(ListLeadsResponse {
			items: items.into_iter().map(Into::into).collect(),
			total,
			page: req.page,
			page_size,
			page_count: page_count(total, page_size),
		})
	}

	pub async fn lead_filters(&self) -> Result<LeadFilters> {
		let databases = leads::distinct_database_names(&self.db.pool).await?;
		let assigned_users = leads::distinct_assigned_users(&self.db.pool).await?;

		Ok(LeadFilters { databases, assigned_users })
	}

	pub async fn delete_leads(
		&self,
		actor: &Actor,
		req: DeleteLeadsRequest,
	) -> Result<DeleteLeadsResponse> {
		actor.require_admin()?;

		let mut lead_ids = req.lead_ids;

		lead_ids.sort_unstable();
		lead_ids.dedup();

		if lead_ids.is_empty() {
			return Err(Error::invalid("No leads selected."));
		}

		let deleted = leads::delete_leads(&self.db.pool, &lead_ids).await?;

		tracing::warn!(
			user = %actor.username,
			requested = lead_ids.len(),
			deleted,
			"Leads deleted."
		);

		Ok(DeleteLeadsResponse { deleted })
	}

	/// All leads as CSV with a header row, in id order.
	pub async fn export_leads_csv(&self) -> Result<String> {
		let rows = leads::all_leads(&self.db.pool).await?;
		let mut writer = csv::Writer::from_writer(Vec::new());

		writer.write_record(EXPORT_HEADERS).map_err(export_error)?;

		for row in rows {
			let last_call_date = match row.last_call_date {
				Some(date) => time_serde::date::format(date).map_err(export_error)?,
				None => String::new(),
			};
			let created_at = row
				.created_at
				.format(&time::format_description::well_known::Rfc3339)
				.map_err(export_error)?;

			writer
				.write_record([
					row.lead_id.to_string(),
					row.database_name.unwrap_or_default(),
					row.customer_name.unwrap_or_default(),
					row.phone.unwrap_or_default(),
					row.location.unwrap_or_default(),
					row.customer_type.unwrap_or_default(),
					row.current_status,
					row.assigned_user.unwrap_or_default(),
					last_call_date,
					row.no_response_attempts.to_string(),
					row.catalogue_attempts.to_string(),
					row.is_active.to_string(),
					created_at,
				])
				.map_err(export_error)?;
		}

		let bytes = writer.into_inner().map_err(|err| export_error(err.into_error()))?;

		String::from_utf8(bytes).map_err(export_error)
	}
}

/// Requested page size, falling back to the default and clamped to `1..=max`.
pub fn clamp_page_size(requested: Option<u32>, default: u32, max: u32) -> u32 {
	requested.unwrap_or(default).clamp(1, max.max(1))
}

/// Number of pages for `total` rows. An empty result still has one page.
pub fn page_count(total: i64, page_size: u32) -> u32 {
	let size = i64::from(page_size.max(1));
	let pages = (total.max(0) + size - 1) / size;

	u32::try_from(pages.max(1)).unwrap_or(u32::MAX)
}

fn export_error(err: impl std::fmt::Display) -> Error {
	Error::Storage { message: format!("Failed to export leads: {err}.") }
}
