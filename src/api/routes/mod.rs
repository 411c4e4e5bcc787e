//! API route modules.

pub mod ask;
pub mod health;
pub mod meetings;
pub mod search;
