//! I/O helpers for courier sessions.

pub mod config;
pub mod credential;
pub mod gateway;
