use serde::Deserialize;
use serde_json::{json, Value};
use crate::config::ClinicInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "pt", alias = "pt-BR")]
    Portuguese,
    #[serde(rename = "en", alias = "en-US")]
    English,
}

impl Locale {
    pub fn language_tag(&self) -> &'static str {
        match self {
            Self::Portuguese => "pt-BR",
            Self::English => "en",
        }
    }
}

/// Schema.org `MedicalClinic` JSON-LD for the page head.
pub fn clinic_json_ld(clinic: &ClinicInfo, locale: Locale) -> Value {
    let description = match locale {
        Locale::Portuguese => &clinic.description_pt,
        Locale::English if clinic.description_en.is_empty() => &clinic.description_pt,
        Locale::English => &clinic.description_en,
    };

    let mut doc = json!({
        "@context": "https://schema.org",
        "@type": "MedicalClinic",
        "name": clinic.name,
        "url": clinic.url,
        "inLanguage": locale.language_tag(),
        "address": {
            "@type": "PostalAddress",
            "streetAddress": clinic.address.street,
            "addressLocality": clinic.address.locality,
            "addressRegion": clinic.address.region,
            "postalCode": clinic.address.postal_code,
            "addressCountry": clinic.address.country,
        },
    });

    if let Some(obj) = doc.as_object_mut() {
        if !description.is_empty() {
            obj.insert("description".into(), json!(description));
        }
        if let Some(phone) = &clinic.telephone {
            obj.insert("telephone".into(), json!(phone));
        }
        if !clinic.opening_hours.is_empty() {
            obj.insert("openingHours".into(), json!(clinic.opening_hours));
        }
        if !clinic.specialties.is_empty() {
            obj.insert("medicalSpecialty".into(), json!(clinic.specialties));
        }
    }
    doc
}
