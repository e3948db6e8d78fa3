//! CLI commands.

pub mod chat;
pub mod classify;
pub mod info;
pub mod synthesize;
