use time::macros::date;

use crm_storage::{
	accounts, calls,
	db::Db,
	leads::{self, LeadFilter, LeadPage, LeadSortColumn},
	maintenance,
	models::{NewCallLog, NewLead},
	reminders::{self, NewReminder},
};
use crm_testkit::TestDatabase;

async fn bootstrapped(test_name: &str) -> Option<(TestDatabase, Db)> {
	let Some(base_dsn) = crm_testkit::env_dsn() else {
		eprintln!("Skipping {test_name}; set CRM_PG_DSN to run this test.");

		return None;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = Db::connect(&test_db.postgres()).await.expect("Failed to connect to Postgres.");

	db.ensure_schema().await.expect("Failed to ensure schema.");

	Some((test_db, db))
}

fn new_lead(name: &str, phone: &str, database_name: &str) -> NewLead {
	NewLead {
		database_name: Some(database_name.to_string()),
		customer_name: Some(name.to_string()),
		phone: Some(phone.to_string()),
		..Default::default()
	}
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set CRM_PG_DSN to run."]
async fn schema_bootstrap_is_idempotent() {
	let Some((test_db, db)) = bootstrapped("schema_bootstrap_is_idempotent").await else {
		return;
	};

	db.ensure_schema().await.expect("Second schema pass must succeed.");

	let count: i64 = sqlx::query_scalar(
		"\
SELECT count(*)
FROM information_schema.tables
WHERE table_schema = 'public'
	AND table_name IN ('users', 'sessions', 'leads', 'call_logs', 'reminders', 'pitch_templates')",
	)
	.fetch_one(&db.pool)
	.await
	.expect("Failed to query schema tables.");

	assert_eq!(count, 6);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set CRM_PG_DSN to run."]
async fn usernames_are_unique() {
	let Some((test_db, db)) = bootstrapped("usernames_are_unique").await else {
		return;
	};

	accounts::insert_user(&db.pool, "meera", "hash", accounts::ROLE_USER, None)
		.await
		.expect("First insert must succeed.");

	let err = accounts::insert_user(&db.pool, "meera", "hash", accounts::ROLE_USER, None)
		.await
		.expect_err("Duplicate username must fail.");

	assert!(matches!(err, crm_storage::Error::Conflict(_)), "Unexpected error: {err:?}");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set CRM_PG_DSN to run."]
async fn lead_listing_filters_sorts_and_pages() {
	let Some((test_db, db)) = bootstrapped("lead_listing_filters_sorts_and_pages").await else {
		return;
	};
	let batch = vec![
		new_lead("Asha Traders", "9876500001", "Expo"),
		new_lead("Bharat Stores", "9876500002", "Expo"),
		new_lead("Chirag & Sons", "9876500003", "Walk-in"),
		new_lead("asha textiles", "9876500004", "Walk-in"),
	];
	let inserted = leads::insert_leads(&db.pool, &batch).await.expect("Failed to insert leads.");

	assert_eq!(inserted, 4);

	let filter = LeadFilter { search: Some("ASHA"), ..Default::default() };
	let total = leads::count_leads(&db.pool, &filter).await.expect("Failed to count leads.");
	let page = LeadPage {
		sort: LeadSortColumn::CustomerName,
		descending: true,
		limit: 1,
		offset: 0,
	};
	let rows = leads::list_leads(&db.pool, &filter, &page).await.expect("Failed to list leads.");

	assert_eq!(total, 2);
	assert_eq!(rows.len(), 1);
	assert_eq!(rows[0].customer_name.as_deref(), Some("asha textiles"));
	assert_eq!(rows[0].current_status, "New");

	let expo = LeadFilter { database_name: Some("Expo"), ..Default::default() };

	assert_eq!(leads::count_leads(&db.pool, &expo).await.expect("Failed to count leads."), 2);
	assert_eq!(
		leads::distinct_database_names(&db.pool).await.expect("Failed to list databases."),
		vec!["Expo".to_string(), "Walk-in".to_string()]
	);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set CRM_PG_DSN to run."]
async fn deleting_leads_cascades_and_wipe_restarts_ids() {
	let Some((test_db, db)) = bootstrapped("deleting_leads_cascades_and_wipe_restarts_ids").await
	else {
		return;
	};

	leads::insert_leads(&db.pool, &[new_lead("Asha", "1", "Expo"), new_lead("Ravi", "2", "Expo")])
		.await
		.expect("Failed to insert leads.");

	let all = leads::all_leads(&db.pool).await.expect("Failed to read leads.");
	let first = all[0].lead_id;

	calls::insert_call_log(
		&db.pool,
		&NewCallLog {
			lead_id: first,
			user_name: "meera",
			call_date: date!(2024 - 01 - 10),
			outcome: "No response",
			pitch_used: "",
			notes: "",
		},
	)
	.await
	.expect("Failed to insert call log.");
	reminders::insert_reminders(
		&db.pool,
		first,
		"meera",
		&[NewReminder { reminder_date: date!(2024 - 01 - 11), reminder_type: "No response" }],
	)
	.await
	.expect("Failed to insert reminder.");

	assert_eq!(leads::delete_leads(&db.pool, &[first]).await.expect("Failed to delete."), 1);
	assert_eq!(calls::count_calls(&db.pool, None, None).await.expect("Failed to count."), 0);

	let mut tx = db.pool.begin().await.expect("Failed to begin transaction.");
	let counts = maintenance::wipe_lead_data(&mut tx).await.expect("Failed to wipe lead data.");

	tx.commit().await.expect("Failed to commit.");

	assert_eq!(counts.leads, 1);
	assert_eq!(counts.reminders, 0);

	leads::insert_leads(&db.pool, &[new_lead("Fresh", "3", "Expo")])
		.await
		.expect("Failed to insert lead.");

	let fresh = leads::all_leads(&db.pool).await.expect("Failed to read leads.");

	assert_eq!(fresh[0].lead_id, 1);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
