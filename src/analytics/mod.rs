pub mod events;
pub mod vendor;
pub mod ga4;
pub mod meta;
pub mod dispatcher;

pub use events::AnalyticsEvent;
pub use vendor::{AnalyticsVendor, VendorCategory};
pub use ga4::Ga4Vendor;
pub use meta::MetaPixelVendor;
pub use dispatcher::{DispatchReport, Dispatcher};
