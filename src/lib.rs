pub mod analytics;
pub mod api;
pub mod cli;
pub mod config;
pub mod consent;
pub mod db;
pub mod errors;
pub mod loader;
pub mod site;
pub mod verification;
