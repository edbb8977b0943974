use std::fmt;

use serde::{Deserialize, Serialize};

pub const NO_RESPONSE: &str = "No response";
pub const CATALOGUE: &str = "Catalogue";
pub const STORE_VISIT_MUMBAI: &str = "Store visit Mumbai";
pub const STORE_VISIT_DELHI: &str = "Store visit Delhi";
pub const PURCHASED: &str = "Purchased";
pub const NOT_INTERESTED: &str = "Not Interested";
pub const INVALID_NUMBER: &str = "Invalid number";
pub const FOLLOW_UP: &str = "Follow up";
pub const OTHERS: &str = "Others";

/// Labels offered to operators when saving a call, in display order.
pub const KNOWN_LABELS: [&str; 9] = [
	NO_RESPONSE,
	CATALOGUE,
	STORE_VISIT_MUMBAI,
	STORE_VISIT_DELHI,
	PURCHASED,
	NOT_INTERESTED,
	INVALID_NUMBER,
	FOLLOW_UP,
	OTHERS,
];

/// Result of a sales call.
///
/// Labels outside the known vocabulary are preserved verbatim as [`Outcome::Custom`]; the
/// lifecycle engine treats them like any other non-counting outcome.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Outcome {
	NoResponse,
	Catalogue,
	StoreVisitMumbai,
	StoreVisitDelhi,
	Purchased,
	NotInterested,
	InvalidNumber,
	FollowUp,
	Others,
	Custom(String),
}
impl Outcome {
	/// Matching is exact and case-sensitive.
	pub fn from_label(label: &str) -> Self {
		match label {
			NO_RESPONSE => Self::NoResponse,
			CATALOGUE => Self::Catalogue,
			STORE_VISIT_MUMBAI => Self::StoreVisitMumbai,
			STORE_VISIT_DELHI => Self::StoreVisitDelhi,
			PURCHASED => Self::Purchased,
			NOT_INTERESTED => Self::NotInterested,
			INVALID_NUMBER => Self::InvalidNumber,
			FOLLOW_UP => Self::FollowUp,
			OTHERS => Self::Others,
			other => Self::Custom(other.to_string()),
		}
	}

	pub fn label(&self) -> &str {
		match self {
			Self::NoResponse => NO_RESPONSE,
			Self::Catalogue => CATALOGUE,
			Self::StoreVisitMumbai => STORE_VISIT_MUMBAI,
			Self::StoreVisitDelhi => STORE_VISIT_DELHI,
			Self::Purchased => PURCHASED,
			Self::NotInterested => NOT_INTERESTED,
			Self::InvalidNumber => INVALID_NUMBER,
			Self::FollowUp => FOLLOW_UP,
			Self::Others => OTHERS,
			Self::Custom(label) => label.as_str(),
		}
	}

	pub fn is_known(&self) -> bool {
		!matches!(self, Self::Custom(_))
	}

	/// Outcomes after which the lead leaves the active pipeline.
	pub fn closes_lead(&self) -> bool {
		matches!(self, Self::Purchased | Self::NotInterested | Self::InvalidNumber)
	}
}

impl From<String> for Outcome {
	fn from(label: String) -> Self {
		match Self::from_label(&label) {
			Self::Custom(_) => Self::Custom(label),
			known => known,
		}
	}
}

impl From<Outcome> for String {
	fn from(outcome: Outcome) -> Self {
		match outcome {
			Outcome::Custom(label) => label,
			known => known.label().to_string(),
		}
	}
}

impl fmt::Display for Outcome {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.label())
	}
}
