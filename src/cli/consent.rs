use std::sync::Arc;
use crate::cli::commands::{ConsentAction, ConsentArgs};
use crate::consent::{ConsentDecision, ConsentState, ConsentStore};
use crate::db::Database;
use crate::errors::SiteError;

pub fn handle_consent(args: ConsentArgs) -> Result<(), SiteError> {
    let db = Database::new(&args.db)?;
    let store = ConsentStore::new(Arc::new(db));

    let decision = match args.action {
        ConsentAction::Show => {
            match store.read() {
                ConsentState::Undecided => println!("undecided"),
                ConsentState::Decided(record) => println!("{}", serde_json::to_string_pretty(&record)?),
            }
            return Ok(());
        }
        ConsentAction::AcceptAll => ConsentDecision::accept_all(),
        ConsentAction::RejectAll => ConsentDecision::reject_all(),
        ConsentAction::Save { analytics, marketing } => ConsentDecision::custom(analytics, marketing),
    };

    let record = store.save(decision);
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}
