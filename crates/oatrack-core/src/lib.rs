pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod pagination;
pub mod record;
pub mod store;
pub mod view;

// Re-export common error type
pub use error::OatrackError;
