//! Signed token codec shared by every verification path.

mod codec;
mod errors;
mod types;

pub use codec::TokenCodec;
pub use errors::TokenError;
pub use types::{TokenKind, UnauthenticatedReason, VerificationResult};
