use serde::{Deserialize, Serialize};

use crate::{Actor, CrmService, Error, Result, Role, UserView, auth, non_blank};
use crm_storage::accounts;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AddUserRequest {
	pub username: String,
	pub password: String,
	#[serde(default)]
	pub email: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SetActiveRequest {
	pub is_active: bool,
}

impl CrmService {
	pub async fn list_users(&self, actor: &Actor) -> Result<Vec<UserView>> {
		actor.require_admin()?;

		let users = accounts::list_users(&self.db.pool).await?;

		Ok(users.into_iter().map(Into::into).collect())
	}

	/// Creates a regular user account.
	pub async fn add_user(&self, actor: &Actor, req: AddUserRequest) -> Result<UserView> {
		actor.require_admin()?;

		let username = req.username.trim();

		if username.is_empty() {
			return Err(Error::invalid("username must be non-empty."));
		}

		let min_chars = self.cfg.security.min_password_chars as usize;

		if req.password.chars().count() < min_chars {
			return Err(Error::invalid(format!(
				"password must be at least {min_chars} characters."
			)));
		}

		let hash = auth::hash_password(&req.password)?;
		let user = accounts::insert_user(
			&self.db.pool,
			username,
			&hash,
			Role::User.as_str(),
			non_blank(req.email.as_deref()),
		)
		.await?;

		tracing::info!(user = %user.username, by = %actor.username, "User added.");

		Ok(user.into())
	}

	/// Activates or deactivates an account. Deactivation also ends its sessions.
	pub async fn set_user_active(
		&self,
		actor: &Actor,
		user_id: i64,
		req: SetActiveRequest,
	) -> Result<UserView> {
		actor.require_admin()?;

		if user_id == actor.user_id && !req.is_active {
			return Err(Error::invalid("You cannot deactivate your own account."));
		}

		let mut tx = self.db.pool.begin().await?;

		if !accounts::set_user_active(&mut *tx, user_id, req.is_active).await? {
			return Err(Error::not_found(format!("User {user_id} not found.")));
		}
		if !req.is_active {
			accounts::delete_user_sessions(&mut *tx, user_id).await?;
		}

		let user = accounts::find_user(&mut *tx, user_id)
			.await?
			.ok_or_else(|| Error::not_found(format!("User {user_id} not found.")))?;

		tx.commit().await?;

		tracing::info!(
			user = %user.username,
			is_active = req.is_active,
			by = %actor.username,
			"User status changed."
		);

		Ok(user.into())
	}
}
