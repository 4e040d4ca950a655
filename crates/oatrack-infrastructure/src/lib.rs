pub mod config_service;
pub mod document_collection;
pub mod export_writer;
pub mod local_store;
pub mod paths;
pub mod static_file_store;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::document_collection::DocumentCollection;
pub use crate::export_writer::write_export;
pub use crate::local_store::LocalStore;
pub use crate::paths::OatrackPaths;
pub use crate::static_file_store::StaticFileStore;
