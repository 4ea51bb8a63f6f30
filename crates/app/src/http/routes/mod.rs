pub mod auth;
pub mod changes;
pub mod health;
pub mod search;
pub mod tags;
