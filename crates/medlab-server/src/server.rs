use std::net::SocketAddr;

use axum::{
    Router,
    extract::FromRef,
    middleware,
    routing::get,
};
use medlab_auth::AuthState;
use medlab_storage::DynStorage;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::{
    bootstrap,
    config::{AppConfig, StorageBackend},
    handlers, middleware as app_middleware,
    services::{MedicalTestsService, PatientsService},
};

/// Shared application state.
///
/// Handlers pick the part they need through `FromRef`.
#[derive(Clone)]
pub struct AppState {
    pub storage: DynStorage,
    pub auth: AuthState,
    pub patients: PatientsService,
    pub medical_tests: MedicalTestsService,
}

impl AppState {
    pub fn new(storage: DynStorage, auth: AuthState) -> Self {
        Self {
            patients: PatientsService::new(storage.clone()),
            medical_tests: MedicalTestsService::new(storage.clone()),
            storage,
            auth,
        }
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

impl FromRef<AppState> for PatientsService {
    fn from_ref(state: &AppState) -> Self {
        state.patients.clone()
    }
}

impl FromRef<AppState> for MedicalTestsService {
    fn from_ref(state: &AppState) -> Self {
        state.medical_tests.clone()
    }
}

pub struct MedlabServer {
    addr: SocketAddr,
    app: Router,
}

pub fn build_app(cfg: &AppConfig, state: AppState) -> Router {
    let body_limit = cfg.server.body_limit_bytes;
    Router::new()
        // Health and info endpoints
        .route("/", get(handlers::root))
        .route("/healthz", get(handlers::healthz))
        .route("/readyz", get(handlers::readyz))
        // Patients
        .route(
            "/patients",
            get(handlers::patients::list_patients).post(handlers::patients::create_patient),
        )
        .route("/patients/{id}", get(handlers::patients::get_patient))
        .route(
            "/patients/{id}/medical-tests",
            get(handlers::patients::list_medical_tests_of_patient),
        )
        // Medical tests
        .route(
            "/medical-tests",
            get(handlers::medical_tests::list_medical_tests)
                .post(handlers::medical_tests::save_medical_test),
        )
        .route(
            "/medical-tests/{id}",
            get(handlers::medical_tests::get_medical_test),
        )
        // Middleware stack (order: security -> compression/cors/trace -> body limit)
        .layer(middleware::from_fn_with_state(
            state.auth.clone(),
            app_middleware::security_middleware,
        ))
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    use tracing::field::Empty;
                    tracing::info_span!(
                        "http.request",
                        http.method = %req.method(),
                        http.target = %req.uri(),
                        http.status_code = Empty,
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>, latency: std::time::Duration, span: &tracing::Span| {
                        span.record("http.status_code", tracing::field::display(res.status().as_u16()));
                        tracing::info!(
                            http.status = %res.status().as_u16(),
                            elapsed_ms = %latency.as_millis(),
                            "request handled"
                        );
                    },
                ),
        )
        .layer(axum::extract::DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

pub struct ServerBuilder {
    addr: SocketAddr,
    config: AppConfig,
    storage: Option<DynStorage>,
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerBuilder {
    pub fn new() -> Self {
        let cfg = AppConfig::default();
        Self {
            addr: cfg.addr(),
            config: cfg,
            storage: None,
        }
    }

    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    pub fn with_config(mut self, cfg: AppConfig) -> Self {
        self.addr = cfg.addr();
        self.config = cfg;
        self
    }

    /// Uses `storage` instead of the backend named in the configuration.
    pub fn with_storage(mut self, storage: DynStorage) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Connects storage, seeds it if configured, and assembles the router.
    pub async fn build(self) -> anyhow::Result<MedlabServer> {
        let storage = match self.storage {
            Some(storage) => storage,
            None => create_storage(&self.config).await?,
        };
        tracing::info!(backend = storage.backend_name(), "Storage ready");

        if self.config.bootstrap.seed_patients {
            bootstrap::seed_patients(storage.as_ref()).await?;
        }

        let security = &self.config.security;
        let auth = AuthState::clinic(security.password_encoder)?
            .with_enabled(security.enabled)
            .with_realm(security.realm.clone());
        if !security.enabled {
            tracing::warn!("Security disabled, all endpoints are open");
        }

        let app = build_app(&self.config, AppState::new(storage, auth));

        Ok(MedlabServer {
            addr: self.addr,
            app,
        })
    }
}

/// Creates the storage backend selected in the configuration.
pub async fn create_storage(cfg: &AppConfig) -> anyhow::Result<DynStorage> {
    match cfg.storage.backend {
        StorageBackend::Memory => Ok(medlab_db_memory::create_storage()),
        StorageBackend::Postgres => {
            let pg = cfg.storage.postgres.to_postgres_config();
            tracing::info!(url = %medlab_db_postgres::mask_password(&pg.url), "Connecting to PostgreSQL");
            let storage: DynStorage = medlab_db_postgres::create_storage(pg).await?;
            Ok(storage)
        }
    }
}

impl MedlabServer {
    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn into_router(self) -> Router {
        self.app
    }
}

async fn shutdown_signal() {
    // Wait for Ctrl+C
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
