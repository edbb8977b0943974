pub mod admin;
pub mod auth;
pub mod imports;
pub mod leads;
pub mod pitches;
pub mod reminders;
pub mod reports;
pub mod retry;
pub mod time_serde;
pub mod users;
pub mod views;
pub mod workflow;

mod error;

pub use admin::{DeleteAllRequest, MasterResetRequest, WipeReport};
pub use auth::{LoginRequest, LoginResponse};
pub use error::{Error, Result};
pub use imports::{DetectedColumn, ImportCsvRequest, ImportReport, ImportUrlRequest};
pub use leads::{
	DeleteLeadsRequest, DeleteLeadsResponse, LeadFilters, ListLeadsRequest, ListLeadsResponse,
};
pub use pitches::PitchRequest;
pub use reminders::{MarkDoneRequest, MarkDoneResponse, PendingRemindersRequest};
pub use reports::{ReportRequest, ReportResponse};
pub use users::{AddUserRequest, SetActiveRequest};
pub use views::{CallLogView, LeadView, PendingReminderView, PitchView, ReminderView, UserView};
pub use workflow::{RecordOutcomeRequest, RecordOutcomeResponse};

use serde::{Deserialize, Serialize};

use crm_config::Config;
use crm_storage::{accounts, db::Db};

pub struct CrmService {
	pub cfg: Config,
	pub db: Db,
}
impl CrmService {
	pub fn new(cfg: Config, db: Db) -> Self {
		Self { cfg, db }
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
	User,
	Admin,
}
impl Role {
	/// Unknown stored roles get the least privilege.
	pub fn from_stored(role: &str) -> Self {
		if role == accounts::ROLE_ADMIN { Self::Admin } else { Self::User }
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::User => accounts::ROLE_USER,
			Self::Admin => accounts::ROLE_ADMIN,
		}
	}
}

/// The authenticated user a service call runs for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
	pub user_id: i64,
	pub username: String,
	pub role: Role,
}
impl Actor {
	pub fn is_admin(&self) -> bool {
		self.role == Role::Admin
	}

	pub fn require_admin(&self) -> Result<()> {
		if self.is_admin() {
			Ok(())
		} else {
			Err(Error::forbidden("Admin role required."))
		}
	}
}

/// Trims a free-text input and maps blank strings to `None`.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
	value.map(str::trim).filter(|value| !value.is_empty())
}
