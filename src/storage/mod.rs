pub mod secure;

pub mod token;

pub use secure::{FileStorage, MemoryStorage, SecureStorage};
pub use token::TokenStore;
