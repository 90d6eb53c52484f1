pub mod health;
pub mod contact;
pub mod consent;
pub mod events;
pub mod scripts;
pub mod site;
