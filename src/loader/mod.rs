pub mod script;
pub mod fetcher;
pub mod catalog;

pub use script::{LoadResult, ScriptLoader, ScriptStatus, SdkHandle};
pub use fetcher::{HttpScriptFetcher, ScriptFetcher};
pub use catalog::{ScriptCatalog, GOOGLE_MAPS, RECAPTCHA};
