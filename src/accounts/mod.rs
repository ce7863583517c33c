//! User accounts for the admin database.
//!
//! Passwords are never stored in clear: each user has a random salt and a
//! BLAKE3 digest (see [`crate::hashing`]).

pub mod error;
pub mod store;
pub mod types;


pub use error::AccountError;
pub use store::UserStore;
pub use types::{NewUser, Role, RoleCounts, Status, User, UserUpdate};
