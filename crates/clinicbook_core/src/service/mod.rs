//! Use-case services.
//!
//! # Responsibility
//! - Orchestrate parsing, command execution, and persistence into one entry point.
//! - Keep the CLI decoupled from storage details.

pub mod logic_service;
