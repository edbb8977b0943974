mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	BootstrapAdmin, Config, Import, Leads, Postgres, Security, Service, Storage, Workflow,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::Read { path: path.to_path_buf(), source: err })?;
	let mut cfg: Config =
		toml::from_str(&raw).map_err(|err| Error::Parse { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);
	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::invalid("service.http_bind must be non-empty."));
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::invalid("storage.postgres.dsn must be non-empty."));
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::invalid("storage.postgres.pool_max_conns must be greater than zero."));
	}
	if cfg.storage.postgres.write_retry_attempts == 0 {
		return Err(Error::invalid(
			"storage.postgres.write_retry_attempts must be greater than zero.",
		));
	}
	if cfg.security.session_ttl_hours <= 0 {
		return Err(Error::invalid("security.session_ttl_hours must be greater than zero."));
	}
	if cfg.security.master_reset_key.trim().is_empty() {
		return Err(Error::invalid("security.master_reset_key must be non-empty."));
	}
	if cfg.security.min_password_chars == 0 {
		return Err(Error::invalid("security.min_password_chars must be greater than zero."));
	}

	let admin = &cfg.security.bootstrap_admin;

	if admin.username.trim().is_empty() {
		return Err(Error::invalid("security.bootstrap_admin.username must be non-empty."));
	}
	if (admin.password.chars().count() as u32) < cfg.security.min_password_chars {
		return Err(Error::invalid(format!(
			"security.bootstrap_admin.password must be at least {} characters.",
			cfg.security.min_password_chars
		)));
	}
	if cfg.workflow.call_history_limit == 0 {
		return Err(Error::invalid("workflow.call_history_limit must be greater than zero."));
	}
	if cfg.leads.default_page_size == 0 || cfg.leads.max_page_size == 0 {
		return Err(Error::invalid("leads page sizes must be greater than zero."));
	}
	if cfg.leads.default_page_size > cfg.leads.max_page_size {
		return Err(Error::invalid(
			"leads.default_page_size must not exceed leads.max_page_size.",
		));
	}
	if cfg.import.fetch_timeout_ms == 0 {
		return Err(Error::invalid("import.fetch_timeout_ms must be greater than zero."));
	}
	if cfg.import.max_rows == 0 {
		return Err(Error::invalid("import.max_rows must be greater than zero."));
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	let admin = &mut cfg.security.bootstrap_admin;

	admin.username = admin.username.trim().to_string();

	if admin.email.as_deref().map(|email| email.trim().is_empty()).unwrap_or(false) {
		admin.email = None;
	}
}
