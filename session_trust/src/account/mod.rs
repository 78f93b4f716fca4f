mod errors;
mod memory;
mod types;

pub use errors::AccountError;
pub use memory::InMemoryAccountStore;
pub use types::{AccountState, AccountStore, Identity};
