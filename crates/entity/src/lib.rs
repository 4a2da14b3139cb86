//! sea-orm entities for the `users`, `stores` and `ratings` tables.

pub mod rating;
pub mod store;
pub mod user;

pub use user::Role;
