use reqwest::Url;

const WA_ME: &str = "https://wa.me";

/// Click-to-chat link for `phone`, with an optional prefilled message.
/// Formatting characters are stripped; a number with no digits yields `None`.
pub fn whatsapp_link(phone: &str, message: Option<&str>) -> Option<String> {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }

    let mut url = Url::parse(&format!("{}/{}", WA_ME, digits)).ok()?;
    if let Some(text) = message.map(str::trim).filter(|m| !m.is_empty()) {
        url.query_pairs_mut().append_pair("text", text);
    }
    Some(url.into())
}
