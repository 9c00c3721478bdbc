pub mod bootstrap;
pub mod config;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod server;
pub mod services;

pub use config::{
    AppConfig, BootstrapConfig, LoggingConfig, PostgresStorageConfig, SecurityConfig,
    ServerConfig, StorageBackend, StorageConfig,
};
pub use observability::{init_tracing, shutdown_tracing};
pub use server::{AppState, MedlabServer, ServerBuilder, build_app, create_storage};
pub use services::{MedicalTestsService, PatientsService, ServiceError};
