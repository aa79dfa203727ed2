pub mod system;
pub mod transaction;

use crate::cli::registry::CommandEntry;

pub(crate) fn all_definitions() -> Vec<CommandEntry> {
    let mut entries = transaction::definitions();
    entries.extend(system::definitions());
    entries
}
