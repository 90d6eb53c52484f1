use super::types::SiteError;

#[derive(Debug, Clone)]
pub struct ErrorClassification {
    pub error_type: &'static str,
    pub retryable: bool,
}

impl SiteError {
    /// Classify this error to determine its type and whether a later attempt
    /// (a new user action, never a timer) may succeed.
    pub fn classify(&self) -> ErrorClassification {
        let (error_type, retryable) = match self {
            // Transient: a later attempt may succeed
            SiteError::ScriptLoad(_) => ("ScriptLoadError", true),
            SiteError::Network(_) => ("NetworkError", true),
            SiteError::Timeout(_) => ("TimeoutError", true),
            SiteError::Vendor(_) => ("VendorError", true),
            SiteError::Io(_) => ("IoError", true),
            SiteError::Database(_) => ("DatabaseError", true),
            SiteError::Storage(_) => ("StorageError", true),

            // Terminal for the current request
            SiteError::Config(_) => ("ConfigError", false),
            SiteError::Verification(_) => ("VerificationError", false),
            SiteError::InvalidRequest(_) => ("InvalidRequestError", false),
            SiteError::Json(_) => ("JsonError", false),
            SiteError::Yaml(_) => ("YamlError", false),
            SiteError::Internal(_) => ("InternalError", false),
        };
        ErrorClassification { error_type, retryable }
    }

    /// Process exit code used by the CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            SiteError::Config(_) | SiteError::Yaml(_) => 2,
            SiteError::Storage(_) | SiteError::Database(_) => 3,
            _ => 1,
        }
    }
}
