//! Route handlers organized by resource

pub mod api;
pub mod boards;
pub mod health;
pub mod threads;
