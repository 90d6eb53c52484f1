pub mod recaptcha;
pub mod contact;

pub use recaptcha::{GoogleRecaptchaVerifier, RecaptchaVerifier, SiteverifyResponse};
pub use contact::{Accepted, ContactSubmission, ContactVerifier, ErrorCode, VerificationError};
