//! Login state: persisted credential, JWT expiry check and the current
//! user's profile.

mod jwt;
mod session;
mod token_store;

pub use jwt::{Claims, JwtError, decode_claims};
pub use session::{AuthError, AuthSession};
pub use token_store::{DISABLE_KEYRING_ENV, TokenStore, TokenStoreError};
