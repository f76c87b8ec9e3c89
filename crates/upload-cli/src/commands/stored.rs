//! Stored command - show the identifier the next page will read

use anyhow::Result;
use upload_core::HandlerSettings;

use crate::output::OutputContext;
use crate::storage::FileStore;

/// Print the identifier held under the form's storage key
///
/// Returns whether an identifier was found. An unreadable store is an
/// error, not an empty one.
pub fn stored(store: &FileStore, settings: &HandlerSettings, ctx: &OutputContext) -> Result<bool> {
    match store.load(&settings.storage_key)? {
        Some(identifier) => {
            println!("{}", identifier);
            Ok(true)
        }
        None => {
            ctx.error(&format!(
                "Nothing stored under {} in {}",
                settings.storage_key,
                store.path().display()
            ));
            Ok(false)
        }
    }
}
