use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub security: Security,
	#[serde(default)]
	pub workflow: Workflow,
	#[serde(default)]
	pub leads: Leads,
	#[serde(default)]
	pub import: Import,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
	/// Total tries for a transactional write, including the first one.
	#[serde(default = "default_write_retry_attempts")]
	pub write_retry_attempts: u32,
	#[serde(default = "default_write_retry_base_ms")]
	pub write_retry_base_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct Security {
	pub bind_localhost_only: bool,
	pub session_ttl_hours: i64,
	#[serde(default)]
	pub cookie_secure: bool,
	/// Unlocks the admin password reset and the master reset.
	pub master_reset_key: String,
	#[serde(default = "default_min_password_chars")]
	pub min_password_chars: u32,
	pub bootstrap_admin: BootstrapAdmin,
}

#[derive(Debug, Deserialize)]
pub struct BootstrapAdmin {
	pub username: String,
	pub password: String,
	pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Workflow {
	/// Reject outcome labels outside the known vocabulary instead of storing them verbatim.
	pub strict_outcomes: bool,
	pub call_history_limit: u32,
}
impl Default for Workflow {
	fn default() -> Self {
		Self { strict_outcomes: false, call_history_limit: 10 }
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Leads {
	pub default_page_size: u32,
	pub max_page_size: u32,
}
impl Default for Leads {
	fn default() -> Self {
		Self { default_page_size: 25, max_page_size: 200 }
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Import {
	pub fetch_timeout_ms: u64,
	pub max_rows: u32,
}
impl Default for Import {
	fn default() -> Self {
		Self { fetch_timeout_ms: 15_000, max_rows: 50_000 }
	}
}

fn default_write_retry_attempts() -> u32 {
	6
}

fn default_write_retry_base_ms() -> u64 {
	150
}

fn default_min_password_chars() -> u32 {
	8
}
