//! Store Adapters
//!
//! Implementations of the `ConsentStore` port.

mod cookie_jar;
mod file;
mod memory;

pub use cookie_jar::{Cookie, CookieJarStore};
pub use file::FileConsentStore;
pub use memory::InMemoryConsentStore;
