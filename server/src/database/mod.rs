pub mod accounts;
pub mod memory;
pub mod sqlite;

pub use accounts::{Account, AccountStore, NewAccount, StoreError};
pub use memory::MemoryAccountStore;
pub use sqlite::SqliteAccountStore;
