use serde::{Deserialize, Serialize};

use crate::{Actor, CrmService, Error, PitchView, Result};
use crm_storage::pitches;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PitchRequest {
	pub title: String,
	pub pitch_text: String,
}
impl PitchRequest {
	fn validated(&self) -> Result<(&str, &str)> {
		let title = self.title.trim();
		let pitch_text = self.pitch_text.trim();

		if title.is_empty() || pitch_text.is_empty() {
			return Err(Error::invalid("title and pitch_text are required."));
		}

		Ok((title, pitch_text))
	}
}

impl CrmService {
	/// Every template, for picking a pitch while on a call.
	pub async fn list_pitches(&self) -> Result<Vec<PitchView>> {
		let rows = pitches::list_all(&self.db.pool).await?;

		Ok(rows.into_iter().map(Into::into).collect())
	}

	pub async fn my_pitches(&self, actor: &Actor) -> Result<Vec<PitchView>> {
		let rows = pitches::list_for_user(&self.db.pool, &actor.username).await?;

		Ok(rows.into_iter().map(Into::into).collect())
	}

	pub async fn create_pitch(&self, actor: &Actor, req: PitchRequest) -> Result<PitchView> {
		let (title, pitch_text) = req.validated()?;
		let row = pitches::insert(&self.db.pool, &actor.username, title, pitch_text).await?;

		tracing::info!(
			template_id = row.template_id,
			user = %actor.username,
			"Pitch template created."
		);

		Ok(row.into())
	}

	pub async fn update_pitch(
		&self,
		actor: &Actor,
		template_id: i64,
		req: PitchRequest,
	) -> Result<PitchView> {
		let (title, pitch_text) = req.validated()?;

		self.owned_pitch(actor, template_id).await?;

		let row = pitches::update(&self.db.pool, template_id, title, pitch_text)
			.await?
			.ok_or_else(|| pitch_not_found(template_id))?;

		Ok(row.into())
	}

	pub async fn delete_pitch(&self, actor: &Actor, template_id: i64) -> Result<()> {
		self.owned_pitch(actor, template_id).await?;

		if !pitches::delete(&self.db.pool, template_id).await? {
			return Err(pitch_not_found(template_id));
		}

		tracing::info!(template_id, user = %actor.username, "Pitch template deleted.");

		Ok(())
	}

	async fn owned_pitch(&self, actor: &Actor, template_id: i64) -> Result<()> {
		let row = pitches::find(&self.db.pool, template_id)
			.await?
			.ok_or_else(|| pitch_not_found(template_id))?;

		if row.user_name != actor.username && !actor.is_admin() {
			return Err(Error::forbidden("Pitch template belongs to another user."));
		}

		Ok(())
	}
}

fn pitch_not_found(template_id: i64) -> Error {
	Error::not_found(format!("Pitch template {template_id} not found."))
}
