use std::sync::Arc;

use crm_service::CrmService;
use crm_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<CrmService>,
}
impl AppState {
	/// Connects, applies the schema, and seeds the bootstrap admin when no such user exists.
	pub async fn new(config: crm_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		let service = CrmService::new(config, db);

		service.ensure_bootstrap_admin().await?;

		Ok(Self::from_service(service))
	}

	pub fn from_service(service: CrmService) -> Self {
		Self { service: Arc::new(service) }
	}
}
