use serde::{Deserialize, Serialize};

pub const DEFAULT_VERIFY_URL: &str = "https://www.google.com/recaptcha/api/siteverify";
pub const DEFAULT_EXPECTED_ACTION: &str = "contact";
pub const DEFAULT_MIN_SCORE: f64 = 0.5;

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SiteConfig {
    pub server: ServerConfig,
    pub recaptcha: RecaptchaConfig,
    pub maps: MapsConfig,
    pub analytics: AnalyticsConfig,
    pub scripts: ScriptsConfig,
    pub whatsapp: WhatsAppConfig,
    pub clinic: ClinicInfo,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub db_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            db_path: "./data/clinic-edge.db".to_string(),
        }
    }
}

/// reCAPTCHA v3 settings. The secret stays server-side; only `site_key` is
/// ever handed to the browser.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RecaptchaConfig {
    pub secret_key: Option<String>,
    pub site_key: Option<String>,
    pub expected_action: String,
    pub min_score: f64,
    pub verify_url: String,
    pub timeout_secs: u64,
}

impl Default for RecaptchaConfig {
    fn default() -> Self {
        Self {
            secret_key: None,
            site_key: None,
            expected_action: DEFAULT_EXPECTED_ACTION.to_string(),
            min_score: DEFAULT_MIN_SCORE,
            verify_url: DEFAULT_VERIFY_URL.to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MapsConfig {
    pub api_key: Option<String>,
    pub libraries: Vec<String>,
    pub language: String,
}

impl Default for MapsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            libraries: vec!["places".to_string()],
            language: "pt-BR".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub ga_measurement_id: Option<String>,
    pub ga_api_secret: Option<String>,
    pub meta_pixel_id: Option<String>,
    pub meta_access_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScriptsConfig {
    pub timeout_secs: u64,
}

impl Default for ScriptsConfig {
    fn default() -> Self {
        Self { timeout_secs: 15 }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct WhatsAppConfig {
    pub phone: Option<String>,
    pub default_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClinicInfo {
    pub name: String,
    pub url: String,
    pub telephone: Option<String>,
    pub description_pt: String,
    pub description_en: String,
    pub address: PostalAddress,
    pub opening_hours: Vec<String>,
    pub specialties: Vec<String>,
}

impl Default for ClinicInfo {
    fn default() -> Self {
        Self {
            name: "Clínica".to_string(),
            url: "https://localhost".to_string(),
            telephone: None,
            description_pt: String::new(),
            description_en: String::new(),
            address: PostalAddress::default(),
            opening_hours: Vec::new(),
            specialties: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PostalAddress {
    pub street: String,
    pub locality: String,
    pub region: String,
    pub postal_code: String,
    pub country: String,
}

impl Default for PostalAddress {
    fn default() -> Self {
        Self {
            street: String::new(),
            locality: String::new(),
            region: String::new(),
            postal_code: String::new(),
            country: "BR".to_string(),
        }
    }
}

/// Treat empty strings the same as a missing value.
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl RecaptchaConfig {
    pub fn secret(&self) -> Option<&str> {
        non_empty(&self.secret_key)
    }

    pub fn public_key(&self) -> Option<&str> {
        non_empty(&self.site_key)
    }
}

impl MapsConfig {
    pub fn key(&self) -> Option<&str> {
        non_empty(&self.api_key)
    }
}
