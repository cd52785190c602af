//! KexChat terminal client
//!
//! A line-oriented frontend over `kexchat-client`: clap CLI, TOML
//! configuration, tracing setup, and the interactive chat loop.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
