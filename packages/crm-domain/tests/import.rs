use crm_domain::import::{self, LeadColumn, LeadRecord};

fn row(cells: &[&str]) -> Vec<String> {
	cells.iter().map(|cell| cell.to_string()).collect()
}

#[test]
fn exact_aliases_map_known_export_headers() {
	let headers = row(&["Database", "Customer name", "mobile", "NBD/CRR", "City"]);
	let mapping = import::detect_columns(&headers);

	assert_eq!(mapping.get(LeadColumn::DatabaseName), Some(0));
	assert_eq!(mapping.get(LeadColumn::CustomerName), Some(1));
	assert_eq!(mapping.get(LeadColumn::Phone), Some(2));
	assert_eq!(mapping.get(LeadColumn::CustomerType), Some(3));
	assert_eq!(mapping.get(LeadColumn::Location), Some(4));
}

#[test]
fn keyword_fallback_never_reuses_a_column() {
	let headers = row(&["Lead Source", "Client Name", "Contact Number", "Address", "Category"]);
	let mapping = import::detect_columns(&headers);

	assert_eq!(mapping.get(LeadColumn::DatabaseName), Some(0));
	assert_eq!(mapping.get(LeadColumn::CustomerName), Some(1));
	assert_eq!(mapping.get(LeadColumn::Phone), Some(2));
	assert_eq!(mapping.get(LeadColumn::Location), Some(3));
	assert_eq!(mapping.get(LeadColumn::CustomerType), Some(4));
}

#[test]
fn customer_name_skips_phone_columns() {
	let headers = row(&["Customer Mobile", "Name"]);
	let mapping = import::detect_columns(&headers);

	assert_eq!(mapping.get(LeadColumn::CustomerName), Some(1));
	assert_eq!(mapping.get(LeadColumn::Phone), Some(0));
}

#[test]
fn unrelated_headers_map_nothing() {
	let mapping = import::detect_columns(&row(&["Qty", "Price"]));

	assert!(mapping.is_empty());
}

#[test]
fn header_row_is_found_after_title_rows() {
	let rows = vec![
		row(&["March campaign", ""]),
		row(&["", ""]),
		row(&["Customer name", "Phone"]),
		row(&["Asha", "98765 43210"]),
	];

	assert_eq!(import::find_header_row(&rows), 2);
	assert_eq!(import::find_header_row(&rows[..2]), 0);
	assert_eq!(import::find_header_row(&[]), 0);
}

#[test]
fn rows_map_to_trimmed_records() {
	let mapping = import::detect_columns(&row(&["Customer name", "Phone", "Location"]));
	let record = import::record_from_row(&mapping, &row(&["  Asha Traders ", "9876543210.0", ""]));

	assert_eq!(
		record,
		LeadRecord {
			customer_name: Some("Asha Traders".to_string()),
			phone: Some("9876543210".to_string()),
			..Default::default()
		}
	);
	assert!(!record.is_blank());
}

#[test]
fn short_and_empty_rows_become_blank_records() {
	let mapping = import::detect_columns(&row(&["Customer name", "Phone", "Location"]));

	assert!(import::record_from_row(&mapping, &row(&[" ", "n/a"])).is_blank());
	assert!(import::record_from_row(&mapping, &[]).is_blank());
}
