//! Session cookie handling and the authenticated-user extractors.

use axum::{extract::FromRequestParts, http::request::Parts};
use time::Duration;
use tower_cookies::{Cookie, Cookies, cookie::SameSite};
use uuid::Uuid;

use crate::{error::ApiError, state::AppState};
use crm_config::Security;
use crm_service::Actor;

pub const SESSION_COOKIE: &str = "crm_session";

/// Any signed-in, active user.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub Actor);
impl FromRequestParts<AppState> for CurrentUser {
	type Rejection = ApiError;

	async fn from_request_parts(
		parts: &mut Parts,
		state: &AppState,
	) -> Result<Self, Self::Rejection> {
		let cookies = request_cookies(parts, state).await?;
		let session_id =
			session_id(&cookies).ok_or_else(|| ApiError::unauthorized("Sign in required."))?;
		let actor = state.service.authenticate(session_id).await?;

		Ok(Self(actor))
	}
}

/// A signed-in user holding the admin role.
#[derive(Clone, Debug)]
pub struct AdminUser(pub Actor);
impl FromRequestParts<AppState> for AdminUser {
	type Rejection = ApiError;

	async fn from_request_parts(
		parts: &mut Parts,
		state: &AppState,
	) -> Result<Self, Self::Rejection> {
		let CurrentUser(actor) = CurrentUser::from_request_parts(parts, state).await?;

		actor.require_admin()?;

		Ok(Self(actor))
	}
}

/// Reads the session token. Values that are not UUIDs are treated as absent.
pub fn session_id(cookies: &Cookies) -> Option<Uuid> {
	cookies.get(SESSION_COOKIE).and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
}

pub fn session_cookie(security: &Security, session_id: Uuid) -> Cookie<'static> {
	Cookie::build((SESSION_COOKIE, session_id.to_string()))
		.path("/")
		.http_only(true)
		.same_site(SameSite::Lax)
		.secure(security.cookie_secure)
		.max_age(Duration::hours(security.session_ttl_hours))
		.build()
}

pub fn expired_session_cookie() -> Cookie<'static> {
	Cookie::build((SESSION_COOKIE, "")).path("/").build()
}

async fn request_cookies(parts: &mut Parts, state: &AppState) -> Result<Cookies, ApiError> {
	Cookies::from_request_parts(parts, state).await.map_err(|(status, message)| {
		tracing::error!(%status, reason = message, "Cookie layer missing from router.");

		ApiError::new(status, "INTERNAL_ERROR", message)
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn session_cookie_is_http_only_and_lax() {
		let mut security = crm_testkit::sample_config("postgres://unused").security;

		security.cookie_secure = true;

		let id = Uuid::new_v4();
		let cookie = session_cookie(&security, id);

		assert_eq!(cookie.name(), SESSION_COOKIE);
		assert_eq!(cookie.value(), id.to_string());
		assert_eq!(cookie.http_only(), Some(true));
		assert_eq!(cookie.secure(), Some(true));
		assert_eq!(cookie.same_site(), Some(SameSite::Lax));
		assert_eq!(cookie.path(), Some("/"));
		assert_eq!(cookie.max_age(), Some(Duration::hours(1)));
	}
}
