use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckerError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	#[error("Malformed snapshot: {0}")]
	Malformed(#[from] serde_json::Error),
	#[error("HTTP error: {0}")]
	Http(#[from] reqwest::Error),
	#[error("Snapshot endpoint returned status {0}")]
	Status(u16),
	#[error("Invalid URL: {0}")]
	InvalidUrl(String),
	#[error("Configuration error: {0}")]
	Config(String),
}

pub type Result<T> = std::result::Result<T, CheckerError>;
