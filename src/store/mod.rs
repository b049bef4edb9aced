//! Postgres persistence

pub mod orders;
pub mod products;
pub mod users;
