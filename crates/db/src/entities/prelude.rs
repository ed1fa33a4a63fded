//! Entity prelude.

pub use super::accounts::Entity as Accounts;
pub use super::entry_sequence::Entity as EntrySequence;
pub use super::journal_entries::Entity as JournalEntries;
pub use super::journal_entry_lines::Entity as JournalEntryLines;
pub use super::tenant_members::Entity as TenantMembers;
pub use super::tenants::Entity as Tenants;
