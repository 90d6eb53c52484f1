pub mod routes;
pub mod models;
pub mod errors;
pub mod extract;

use std::sync::Arc;
use std::time::Duration;
use axum::routing::{any, get, post};
use axum::Router;
use reqwest::Client;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use crate::analytics::{AnalyticsVendor, Dispatcher, Ga4Vendor, MetaPixelVendor};
use crate::config::SiteConfig;
use crate::consent::{ConsentStore, KeyValueStorage};
use crate::db::Database;
use crate::errors::SiteError;
use crate::loader::{HttpScriptFetcher, ScriptCatalog, ScriptFetcher, ScriptLoader};
use crate::verification::{ContactVerifier, GoogleRecaptchaVerifier, RecaptchaVerifier};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<SiteConfig>,
    pub consent: ConsentStore,
    pub dispatcher: Dispatcher,
    pub loader: Arc<ScriptLoader>,
    pub catalog: Arc<ScriptCatalog>,
    pub contact: Arc<ContactVerifier>,
}

impl AppState {
    /// Wire the components together from explicit parts.
    pub fn new(
        config: SiteConfig,
        storage: Arc<dyn KeyValueStorage>,
        recaptcha: Arc<dyn RecaptchaVerifier>,
        fetcher: Arc<dyn ScriptFetcher>,
        vendors: Vec<Arc<dyn AnalyticsVendor>>,
    ) -> Self {
        let consent = ConsentStore::new(storage);
        let dispatcher = Dispatcher::new(consent.clone(), vendors);
        let timeout = match config.scripts.timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        let loader = Arc::new(ScriptLoader::new(fetcher, timeout));
        let catalog = Arc::new(ScriptCatalog::from_config(&config));
        let contact = Arc::new(ContactVerifier::new(recaptcha, &config.recaptcha));

        Self {
            config: Arc::new(config),
            consent,
            dispatcher,
            loader,
            catalog,
            contact,
        }
    }
}

/// The production vendor set. Vendors without IDs are kept but report
/// themselves unavailable.
pub fn default_vendors(client: &Client, config: &SiteConfig) -> Vec<Arc<dyn AnalyticsVendor>> {
    let ga4: Arc<dyn AnalyticsVendor> = Arc::new(Ga4Vendor::new(client.clone(), &config.analytics));
    let meta: Arc<dyn AnalyticsVendor> = Arc::new(MetaPixelVendor::new(client.clone(), &config.analytics));
    vec![ga4, meta]
}

pub async fn create_app_state(config: SiteConfig) -> Result<AppState, SiteError> {
    let db = Database::new(&config.server.db_path)?;

    let recaptcha = GoogleRecaptchaVerifier::new(
        &config.recaptcha.verify_url,
        Duration::from_secs(config.recaptcha.timeout_secs.max(1)),
    )?;
    let fetcher = HttpScriptFetcher::new(Duration::from_secs(5))?;
    let client = Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .map_err(|e| SiteError::Internal(format!("Failed to build HTTP client: {}", e)))?;
    let vendors = default_vendors(&client, &config);

    let state = AppState::new(config, Arc::new(db), Arc::new(recaptcha), Arc::new(fetcher), vendors);
    state.dispatcher.watch_consent(state.consent.subscribe());
    Ok(state)
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(routes::health::health_check))
        .route("/api/contact", any(routes::contact::submit_contact))
        .route("/api/consent", get(routes::consent::get_consent).post(routes::consent::save_consent))
        .route("/api/consent/settings", post(routes::consent::open_settings))
        .route("/api/events", post(routes::events::dispatch_event))
        .route("/api/scripts", get(routes::scripts::list_scripts))
        .route("/api/scripts/:key", get(routes::scripts::load_script))
        .route("/api/public-config", get(routes::site::public_config))
        .route("/api/structured-data", get(routes::site::structured_data))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
