pub mod whatsapp;
pub mod structured_data;

pub use whatsapp::whatsapp_link;
pub use structured_data::{clinic_json_ld, Locale};
