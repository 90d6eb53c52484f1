use reqwest::Url;
use crate::config::{MapsConfig, SiteConfig};
use crate::errors::SiteError;

pub const GOOGLE_MAPS: &str = "google-maps";
pub const RECAPTCHA: &str = "recaptcha";

const MAPS_JS_URL: &str = "https://maps.googleapis.com/maps/api/js";
const RECAPTCHA_JS_URL: &str = "https://www.google.com/recaptcha/api.js";

/// Resolves the SDK keys the site knows about into concrete URLs.
#[derive(Debug, Clone)]
pub struct ScriptCatalog {
    maps: MapsConfig,
    recaptcha_site_key: Option<String>,
}

impl ScriptCatalog {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            maps: config.maps.clone(),
            recaptcha_site_key: config.recaptcha.public_key().map(str::to_string),
        }
    }

    /// URL for `key`. Fails without touching the network when the SDK's key
    /// is not configured.
    pub fn resolve(&self, key: &str) -> Result<String, SiteError> {
        match key {
            GOOGLE_MAPS => {
                let api_key = self.maps.key()
                    .ok_or_else(|| SiteError::Config("Google Maps API key is not configured".into()))?;
                let mut params = vec![("key", api_key.to_string()), ("loading", "async".to_string())];
                if !self.maps.libraries.is_empty() {
                    params.push(("libraries", self.maps.libraries.join(",")));
                }
                if !self.maps.language.is_empty() {
                    params.push(("language", self.maps.language.clone()));
                }
                build_url(MAPS_JS_URL, &params)
            }
            RECAPTCHA => {
                let site_key = self.recaptcha_site_key.as_deref()
                    .ok_or_else(|| SiteError::Config("reCAPTCHA site key is not configured".into()))?;
                build_url(RECAPTCHA_JS_URL, &[("render", site_key.to_string())])
            }
            other => Err(SiteError::InvalidRequest(format!("Unknown script: {}", other))),
        }
    }
}

fn build_url(base: &str, params: &[(&str, String)]) -> Result<String, SiteError> {
    Url::parse_with_params(base, params)
        .map(String::from)
        .map_err(|e| SiteError::Internal(format!("Invalid script URL: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_keys() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.maps.api_key = Some("maps-key".into());
        config.recaptcha.site_key = Some("site-key".into());
        config
    }

    #[test]
    fn test_maps_url() {
        let catalog = ScriptCatalog::from_config(&config_with_keys());
        let url = catalog.resolve(GOOGLE_MAPS).unwrap();
        assert!(url.starts_with(MAPS_JS_URL));
        assert!(url.contains("key=maps-key"));
        assert!(url.contains("libraries=places"));
        assert!(url.contains("language=pt-BR"));
    }

    #[test]
    fn test_recaptcha_url() {
        let catalog = ScriptCatalog::from_config(&config_with_keys());
        let url = catalog.resolve(RECAPTCHA).unwrap();
        assert_eq!(url, "https://www.google.com/recaptcha/api.js?render=site-key");
    }

    #[test]
    fn test_missing_maps_key_fails_fast() {
        let catalog = ScriptCatalog::from_config(&SiteConfig::default());
        assert!(matches!(catalog.resolve(GOOGLE_MAPS), Err(SiteError::Config(_))));
    }

    #[test]
    fn test_missing_site_key_fails_fast() {
        let catalog = ScriptCatalog::from_config(&SiteConfig::default());
        assert!(matches!(catalog.resolve(RECAPTCHA), Err(SiteError::Config(_))));
    }

    #[test]
    fn test_unknown_script() {
        let catalog = ScriptCatalog::from_config(&config_with_keys());
        assert!(matches!(catalog.resolve("tag-manager"), Err(SiteError::InvalidRequest(_))));
    }
}
