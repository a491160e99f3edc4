//! Persistent user registry for the Chiffon bot.
//!
//! The registry owns the `users` and `membership_events` tables. Every
//! mutating operation runs inside its own database transaction that commits
//! on success and rolls back on any error, so concurrent handlers never
//! observe a half-applied write.

pub use error::RegistryError;
pub use membership_events::{EventKind, MembershipEvent};
pub use ops::{Registry, RegistryBuilder};
pub use role::{AdminAction, Role, is_authorized};
pub use users::User;

mod error;
mod membership_events;
mod ops;
mod role;
mod users;

type ResultRegistry<T> = Result<T, RegistryError>;
