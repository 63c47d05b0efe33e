//! One-shot command handlers

pub mod config;
pub mod entry;
