//! Password login, session resolution, and admin credential recovery.

use argon2::{
	Argon2,
	password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::{Actor, CrmService, Error, Result, Role, UserView, non_blank};
use crm_storage::accounts;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoginRequest {
	pub username: String,
	pub password: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoginResponse {
	pub session_id: Uuid,
	#[serde(with = "crate::time_serde")]
	pub expires_at: OffsetDateTime,
	pub user: UserView,
}

impl CrmService {
	pub async fn login(&self, req: LoginRequest) -> Result<LoginResponse> {
		let username = req.username.trim();

		if username.is_empty() || req.password.is_empty() {
			return Err(Error::invalid("Enter username and password."));
		}

		let now = OffsetDateTime::now_utc();
		let purged = accounts::delete_expired_sessions(&self.db.pool, now).await?;

		if purged > 0 {
			tracing::debug!(purged, "Expired sessions removed.");
		}

		let user = accounts::find_user_by_username(&self.db.pool, username).await?;
		let Some(user) = user.filter(|user| verify_password(&req.password, &user.password_hash))
		else {
			tracing::info!(user = username, "Login rejected.");

			return Err(Error::Unauthorized { message: "Invalid credentials.".to_string() });
		};

		if !user.is_active {
			return Err(Error::forbidden("Account is inactive."));
		}

		let session_id = Uuid::new_v4();
		let expires_at = now + Duration::hours(self.cfg.security.session_ttl_hours);

		accounts::insert_session(&self.db.pool, session_id, user.user_id, now, expires_at).await?;

		tracing::info!(user = %user.username, role = %user.role, "Login succeeded.");

		Ok(LoginResponse { session_id, expires_at, user: user.into() })
	}

	/// Resolves a session token to its actor. Expired, unknown, and deactivated sessions fail
	/// alike.
	pub async fn authenticate(&self, session_id: Uuid) -> Result<Actor> {
		let now = OffsetDateTime::now_utc();
		let row = accounts::find_session_user(&self.db.pool, session_id, now)
			.await?
			.filter(|row| row.is_active)
			.ok_or_else(|| Error::Unauthorized {
				message: "Session expired or unknown.".to_string(),
			})?;

		Ok(Actor {
			user_id: row.user_id,
			username: row.username,
			role: Role::from_stored(&row.role),
		})
	}

	pub async fn logout(&self, session_id: Uuid) -> Result<()> {
		accounts::delete_session(&self.db.pool, session_id).await?;

		Ok(())
	}

	pub async fn current_user(&self, actor: &Actor) -> Result<UserView> {
		let user = accounts::find_user(&self.db.pool, actor.user_id)
			.await?
			.ok_or_else(|| Error::not_found("User no longer exists."))?;

		Ok(user.into())
	}

	/// Seeds the configured admin account on an empty user table. Returns whether it was created.
	pub async fn ensure_bootstrap_admin(&self) -> Result<bool> {
		let admin = &self.cfg.security.bootstrap_admin;
		let hash = hash_password(&admin.password)?;
		let created = accounts::insert_admin_if_absent(
			&self.db.pool,
			&admin.username,
			&hash,
			non_blank(admin.email.as_deref()),
		)
		.await?;

		if created {
			tracing::info!(user = %admin.username, "Bootstrap admin created.");
		}

		Ok(created)
	}

	/// Restores the bootstrap admin: configured password, admin role, active flag. Existing
	/// sessions of that account are revoked.
	pub async fn reset_admin_password(&self, master_key: &str) -> Result<UserView> {
		self.check_master_key(master_key)?;

		let admin = &self.cfg.security.bootstrap_admin;
		let hash = hash_password(&admin.password)?;
		let mut tx = self.db.pool.begin().await?;
		let email = non_blank(admin.email.as_deref());
		let user = accounts::upsert_admin(&mut *tx, &admin.username, &hash, email).await?;

		accounts::delete_user_sessions(&mut *tx, user.user_id).await?;

		tx.commit().await?;

		tracing::warn!(user = %user.username, "Admin password reset with master key.");

		Ok(user.into())
	}

	pub(crate) fn check_master_key(&self, master_key: &str) -> Result<()> {
		if constant_time_eq(master_key.as_bytes(), self.cfg.security.master_reset_key.as_bytes()) {
			Ok(())
		} else {
			tracing::warn!("Master key rejected.");

			Err(Error::forbidden("Invalid master key."))
		}
	}
}

pub fn hash_password(password: &str) -> Result<String> {
	let salt = SaltString::generate(&mut OsRng);
	let hash = Argon2::default()
		.hash_password(password.as_bytes(), &salt)
		.map_err(|err| Error::Storage { message: format!("Failed to hash password: {err}.") })?;

	Ok(hash.to_string())
}

/// Malformed stored hashes verify as false.
pub fn verify_password(password: &str, hash: &str) -> bool {
	match PasswordHash::new(hash) {
		Ok(parsed) => Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok(),
		Err(err) => {
			tracing::error!(error = %err, "Stored password hash is malformed.");

			false
		},
	}
}

fn constant_time_eq(left: &[u8], right: &[u8]) -> bool {
	left.len() == right.len()
		&& left.iter().zip(right).fold(0_u8, |acc, (a, b)| acc | (a ^ b)) == 0
}
