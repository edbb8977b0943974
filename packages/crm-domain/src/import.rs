use serde::{Deserialize, Serialize};

use crate::phone;

/// Number of leading rows searched for a header line. Exports often carry a title row or two.
pub const HEADER_SCAN_ROWS: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadColumn {
	DatabaseName,
	CustomerName,
	Phone,
	Location,
	CustomerType,
}
impl LeadColumn {
	pub const ALL: [LeadColumn; 5] = [
		LeadColumn::DatabaseName,
		LeadColumn::CustomerName,
		LeadColumn::Phone,
		LeadColumn::Location,
		LeadColumn::CustomerType,
	];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::DatabaseName => "database_name",
			Self::CustomerName => "customer_name",
			Self::Phone => "phone",
			Self::Location => "location",
			Self::CustomerType => "customer_type",
		}
	}

	fn aliases(self) -> &'static [&'static str] {
		match self {
			Self::DatabaseName => &["database", "database_name"],
			Self::CustomerName => &["customer name", "customer_name"],
			Self::Phone => &["mobile", "phone"],
			Self::Location => &["location", "city"],
			Self::CustomerType => &["nbd/crr", "customer_type"],
		}
	}

	fn keywords(self) -> &'static [&'static str] {
		match self {
			Self::DatabaseName => &["database", "db", "source"],
			Self::CustomerName => &["customer", "name", "company", "client"],
			Self::Phone => &["phone", "mobile", "contact", "number"],
			Self::Location => &["location", "city", "place", "address"],
			Self::CustomerType => &["type", "nbd", "crr", "category"],
		}
	}

	fn accepts(self, header: &str) -> bool {
		match self {
			Self::CustomerName => !header.contains("phone") && !header.contains("mobile"),
			_ => true,
		}
	}

	fn slot(self) -> usize {
		match self {
			Self::DatabaseName => 0,
			Self::CustomerName => 1,
			Self::Phone => 2,
			Self::Location => 3,
			Self::CustomerType => 4,
		}
	}
}

/// Source column index for each lead field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColumnMapping {
	slots: [Option<usize>; 5],
}
impl ColumnMapping {
	pub fn get(&self, column: LeadColumn) -> Option<usize> {
		self.slots[column.slot()]
	}

	pub fn is_empty(&self) -> bool {
		self.slots.iter().all(Option::is_none)
	}

	fn claimed(&self, index: usize) -> bool {
		self.slots.contains(&Some(index))
	}
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadRecord {
	pub database_name: Option<String>,
	pub customer_name: Option<String>,
	pub phone: Option<String>,
	pub location: Option<String>,
	pub customer_type: Option<String>,
}
impl LeadRecord {
	pub fn is_blank(&self) -> bool {
		self.database_name.is_none()
			&& self.customer_name.is_none()
			&& self.phone.is_none()
			&& self.location.is_none()
			&& self.customer_type.is_none()
	}
}

pub fn looks_like_header(cells: &[String]) -> bool {
	cells.iter().map(|cell| cell.trim().to_lowercase()).any(|cell| {
		cell.contains("name")
			|| cell.contains("customer")
			|| cell.contains("phone")
			|| cell.contains("mobile")
	})
}

/// Index of the header row among the first [`HEADER_SCAN_ROWS`] rows, falling back to the first.
pub fn find_header_row(rows: &[Vec<String>]) -> usize {
	rows.iter().take(HEADER_SCAN_ROWS).position(|row| looks_like_header(row)).unwrap_or(0)
}

/// Maps spreadsheet headers onto lead fields.
///
/// Exact aliases win first. Remaining fields then take the first unclaimed header containing one
/// of their keywords, trying keywords in priority order, so one source column never feeds two
/// fields.
pub fn detect_columns(headers: &[String]) -> ColumnMapping {
	let normalized: Vec<String> =
		headers.iter().map(|header| header.trim().to_lowercase()).collect();
	let mut mapping = ColumnMapping::default();

	for column in LeadColumn::ALL {
		let found = normalized.iter().enumerate().find(|(index, header)| {
			!mapping.claimed(*index) && column.aliases().contains(&header.as_str())
		});

		if let Some((index, _)) = found {
			mapping.slots[column.slot()] = Some(index);
		}
	}

	for column in LeadColumn::ALL {
		if mapping.get(column).is_some() {
			continue;
		}

		'keywords: for keyword in column.keywords() {
			for (index, header) in normalized.iter().enumerate() {
				if !mapping.claimed(index) && header.contains(keyword) && column.accepts(header) {
					mapping.slots[column.slot()] = Some(index);

					break 'keywords;
				}
			}
		}
	}

	mapping
}

pub fn record_from_row(mapping: &ColumnMapping, row: &[String]) -> LeadRecord {
	let cell = |column: LeadColumn| {
		mapping
			.get(column)
			.and_then(|index| row.get(index))
			.map(|value| value.trim())
			.filter(|value| !value.is_empty())
	};

	LeadRecord {
		database_name: cell(LeadColumn::DatabaseName).map(str::to_string),
		customer_name: cell(LeadColumn::CustomerName).map(str::to_string),
		phone: cell(LeadColumn::Phone).and_then(phone::normalize_phone),
		location: cell(LeadColumn::Location).map(str::to_string),
		customer_type: cell(LeadColumn::CustomerType).map(str::to_string),
	}
}
