use std::{io, path::PathBuf};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Unable to read CRM config at {path:?}: {source}")]
	Read { path: PathBuf, source: io::Error },
	#[error("Unable to parse CRM config at {path:?}: {source}")]
	Parse { path: PathBuf, source: toml::de::Error },
	#[error("{message}")]
	Validation { message: String },
}
impl Error {
	pub(crate) fn invalid(message: impl Into<String>) -> Self {
		Self::Validation { message: message.into() }
	}
}
