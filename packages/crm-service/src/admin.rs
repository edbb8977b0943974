//! Destructive admin operations.

use serde::{Deserialize, Serialize};

use crate::{Actor, CrmService, Error, Result, auth, non_blank};
use crm_storage::{accounts, maintenance};

/// Phrase an admin must type to wipe lead data.
pub const DELETE_ALL_CONFIRMATION: &str = "DELETE ALL DATA";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeleteAllRequest {
	pub confirm: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MasterResetRequest {
	pub master_key: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WipeReport {
	pub reminders: u64,
	pub call_logs: u64,
	pub leads: u64,
	pub pitch_templates: u64,
	pub users: u64,
}
impl From<maintenance::WipeCounts> for WipeReport {
	fn from(counts: maintenance::WipeCounts) -> Self {
		Self {
			reminders: counts.reminders,
			call_logs: counts.call_logs,
			leads: counts.leads,
			pitch_templates: counts.pitch_templates,
			users: counts.users,
		}
	}
}

impl CrmService {
	/// Deletes every lead with its call log and reminders. Users and pitch templates stay.
	pub async fn delete_all_data(
		&self,
		actor: &Actor,
		req: DeleteAllRequest,
	) -> Result<WipeReport> {
		actor.require_admin()?;

		if req.confirm != DELETE_ALL_CONFIRMATION {
			return Err(Error::invalid(format!(
				"Type {DELETE_ALL_CONFIRMATION:?} exactly to confirm."
			)));
		}

		let mut tx = self.db.pool.begin().await?;
		let counts = maintenance::wipe_lead_data(&mut tx).await?;

		tx.commit().await?;

		tracing::warn!(
			user = %actor.username,
			leads = counts.leads,
			call_logs = counts.call_logs,
			reminders = counts.reminders,
			"All lead data deleted."
		);

		Ok(counts.into())
	}

	/// Wipes every table and re-seeds the bootstrap admin. Needs an admin and the master key.
	pub async fn master_reset(&self, actor: &Actor, req: MasterResetRequest) -> Result<WipeReport> {
		actor.require_admin()?;
		self.check_master_key(&req.master_key)?;

		let admin = &self.cfg.security.bootstrap_admin;
		let hash = auth::hash_password(&admin.password)?;
		let mut tx = self.db.pool.begin().await?;
		let counts = maintenance::wipe_everything(&mut tx).await?;

		accounts::insert_admin_if_absent(
			&mut *tx,
			&admin.username,
			&hash,
			non_blank(admin.email.as_deref()),
		)
		.await?;

		tx.commit().await?;

		tracing::warn!(
			user = %actor.username,
			users = counts.users,
			leads = counts.leads,
			"Master reset completed. Bootstrap admin restored."
		);

		Ok(counts.into())
	}
}

