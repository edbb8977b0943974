use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
	CrmService, Error, Result,
	views::{DailyCallsView, LabelCountView},
};
use crm_storage::calls;

/// Inclusive call-date range. Either bound may be open.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ReportRequest {
	#[serde(default, with = "crate::time_serde::date::option")]
	pub start: Option<Date>,
	#[serde(default, with = "crate::time_serde::date::option")]
	pub end: Option<Date>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReportResponse {
	pub total_calls: i64,
	pub calls_per_day: Vec<DailyCallsView>,
	/// Most frequent outcome first.
	pub outcomes: Vec<LabelCountView>,
	pub databases: Vec<LabelCountView>,
}

impl CrmService {
	pub async fn report(&self, req: ReportRequest) -> Result<ReportResponse> {
		if let (Some(start), Some(end)) = (req.start, req.end)
			&& start > end
		{
			return Err(Error::invalid("start must not be after end."));
		}

		let pool = &self.db.pool;
		let total_calls = calls::count_calls(pool, req.start, req.end).await?;
		let calls_per_day = calls::calls_per_day(pool, req.start, req.end).await?;
		let outcomes = calls::outcome_counts(pool, req.start, req.end).await?;
		let databases = calls::database_counts(pool, req.start, req.end).await?;

		Ok(ReportResponse {
			total_calls,
			calls_per_day: calls_per_day.into_iter().map(Into::into).collect(),
			outcomes: outcomes.into_iter().map(Into::into).collect(),
			databases: databases.into_iter().map(Into::into).collect(),
		})
	}
}
