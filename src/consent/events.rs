use super::record::ConsentRecord;

/// In-process notifications that decouple the consent UI from its consumers.
#[derive(Debug, Clone, PartialEq)]
pub enum SiteEvent {
    /// A decision was saved.
    ConsentUpdated(ConsentRecord),
    /// Something asked for the consent settings to be reopened.
    OpenSettings,
}
