//! Repository abstractions for data access.
//!
//! Repositories wrap the `SeaORM` details and apply the domain rules from
//! `tally-core` inside tenant-scoped transactions.

pub mod account;
pub mod journal;
pub mod ledger_query;
pub mod tenant;

pub use account::{AccountFilter, AccountRepository, CreateAccountInput};
pub use journal::{EntryFilter, EntryWithLines, JournalRepository, VoidOutcome};
pub use ledger_query::LedgerQueryRepository;
pub use tenant::TenantRepository;
