pub mod accounts;
pub mod calls;
pub mod db;
pub mod leads;
pub mod maintenance;
pub mod models;
pub mod pitches;
pub mod reminders;
pub mod schema;

mod error;

pub use error::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;
