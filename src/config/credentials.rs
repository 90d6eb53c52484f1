use tracing::debug;

/// Resolve a `$NAME` reference from the environment. Literals pass through;
/// an unset variable leaves the reference as-is so the caller can tell.
pub fn resolve_credential(value: &str) -> String {
    let Some(var_name) = value.strip_prefix('$') else {
        return value.to_string();
    };
    match std::env::var(var_name) {
        Ok(resolved) => {
            debug!(var = %var_name, "Resolved credential from environment");
            resolved
        }
        Err(_) => {
            debug!(var = %var_name, "Environment variable not set");
            value.to_string()
        }
    }
}

/// Mask a secret for log output, keeping only a short prefix.
pub fn mask_secret(secret: &str) -> String {
    if secret.len() < 8 {
        return "[REDACTED]".to_string();
    }
    let prefix: String = secret.chars().take(4).collect();
    format!("{}…[REDACTED]", prefix)
}

/// Replace every occurrence of the given secrets in `text`.
pub fn redact_secrets(text: &str, secrets: &[&str]) -> String {
    secrets
        .iter()
        .filter(|s| s.len() >= 4)
        .fold(text.to_string(), |acc, s| acc.replace(s, "[REDACTED]"))
}
