//! Configuration schemas and loading.

pub mod app;
pub mod logging;
pub mod repository;

pub use app::AppConfig;
pub use logging::LoggingConfig;
pub use repository::RepositoryConfig;
