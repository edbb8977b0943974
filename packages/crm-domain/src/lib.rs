pub mod import;
pub mod lifecycle;
pub mod outcome;
pub mod phone;

pub use lifecycle::{CallOutcome, LeadFields, LeadSnapshot, LeadUpdate, PlanError, PlannedReminder};
pub use outcome::Outcome;
