use std::path::Path;
use std::sync::LazyLock;
use regex::Regex;
use crate::errors::SiteError;
use super::credentials::{mask_secret, resolve_credential};
use super::types::{non_empty, SiteConfig};
use tracing::{debug, warn};

/// Environment variables that override file values.
const ENV_OVERRIDES: &[&str] = &[
    "RECAPTCHA_SECRET_KEY",
    "RECAPTCHA_SITE_KEY",
    "GOOGLE_MAPS_API_KEY",
    "GA_MEASUREMENT_ID",
    "GA_API_SECRET",
    "META_PIXEL_ID",
    "META_ACCESS_TOKEN",
];

static GA_MEASUREMENT_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^G-[A-Z0-9]+$").expect("valid regex"));
static META_PIXEL_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("valid regex"));

pub async fn parse_config(path: &Path) -> Result<SiteConfig, SiteError> {
    if !path.exists() {
        return Err(SiteError::Config(format!("Config file not found: {}", path.display())));
    }

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > 1_048_576 {
        return Err(SiteError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    let mut config: SiteConfig = if content.trim().is_empty() {
        SiteConfig::default()
    } else {
        serde_yaml::from_str(&content)?
    };

    resolve_references(&mut config);
    validate(&config)?;
    Ok(config)
}

/// Load the config file when one is given (defaults otherwise), then layer the
/// process environment on top.
pub async fn load_config(path: Option<&Path>) -> Result<SiteConfig, SiteError> {
    let mut config = match path {
        Some(p) => parse_config(p).await?,
        None => SiteConfig::default(),
    };
    apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    validate(&config)?;
    report_disabled_features(&config);
    Ok(config)
}

/// Overlay values from `lookup` for every known environment variable. Empty
/// values are ignored so that an exported-but-blank variable does not wipe a
/// file setting.
pub fn apply_env_overrides<F>(config: &mut SiteConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    for name in ENV_OVERRIDES {
        let Some(value) = lookup(name).filter(|v| !v.trim().is_empty()) else {
            continue;
        };
        debug!(var = %name, "Applying environment override");
        let slot = match *name {
            "RECAPTCHA_SECRET_KEY" => &mut config.recaptcha.secret_key,
            "RECAPTCHA_SITE_KEY" => &mut config.recaptcha.site_key,
            "GOOGLE_MAPS_API_KEY" => &mut config.maps.api_key,
            "GA_MEASUREMENT_ID" => &mut config.analytics.ga_measurement_id,
            "GA_API_SECRET" => &mut config.analytics.ga_api_secret,
            "META_PIXEL_ID" => &mut config.analytics.meta_pixel_id,
            "META_ACCESS_TOKEN" => &mut config.analytics.meta_access_token,
            _ => continue,
        };
        *slot = Some(value);
    }
}

fn resolve_references(config: &mut SiteConfig) {
    let slots = [
        &mut config.recaptcha.secret_key,
        &mut config.recaptcha.site_key,
        &mut config.maps.api_key,
        &mut config.analytics.ga_measurement_id,
        &mut config.analytics.ga_api_secret,
        &mut config.analytics.meta_pixel_id,
        &mut config.analytics.meta_access_token,
    ];
    for slot in slots {
        if let Some(value) = slot.as_deref() {
            let resolved = resolve_credential(value);
            // An unresolved `$VAR` reference means the feature is off.
            *slot = if resolved.starts_with('$') { None } else { Some(resolved) };
        }
    }
}

/// Check value ranges and identifier formats.
pub fn validate(config: &SiteConfig) -> Result<(), SiteError> {
    let min_score = config.recaptcha.min_score;
    if !(0.0..=1.0).contains(&min_score) {
        return Err(SiteError::Config(format!(
            "recaptcha.min_score must be within [0, 1], got {}",
            min_score
        )));
    }

    if config.recaptcha.expected_action.trim().is_empty() {
        return Err(SiteError::Config("recaptcha.expected_action must not be empty".into()));
    }

    if let Some(id) = non_empty(&config.analytics.ga_measurement_id) {
        if !GA_MEASUREMENT_ID.is_match(id) {
            return Err(SiteError::Config(format!("Invalid GA measurement ID: {}", id)));
        }
    }

    if let Some(id) = non_empty(&config.analytics.meta_pixel_id) {
        if !META_PIXEL_ID.is_match(id) {
            return Err(SiteError::Config(format!("Invalid Meta pixel ID: {}", id)));
        }
    }

    Ok(())
}

fn report_disabled_features(config: &SiteConfig) {
    match config.recaptcha.secret() {
        Some(secret) => debug!(secret = %mask_secret(secret), "reCAPTCHA secret configured"),
        None => warn!("RECAPTCHA_SECRET_KEY not set, contact submissions will be rejected"),
    }
    if config.recaptcha.public_key().is_none() {
        warn!("reCAPTCHA site key not set, reCAPTCHA SDK disabled");
    }
    if config.maps.key().is_none() {
        warn!("Google Maps API key not set, map embed disabled");
    }
    if non_empty(&config.analytics.ga_measurement_id).is_none() {
        debug!("GA4 measurement ID not set, GA4 vendor disabled");
    }
    if non_empty(&config.analytics.meta_pixel_id).is_none() {
        debug!("Meta pixel ID not set, Meta vendor disabled");
    }
}
