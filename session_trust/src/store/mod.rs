mod cookie;
mod types;

pub use cookie::CookieJar;
pub use types::{SessionStore, StoreError};
