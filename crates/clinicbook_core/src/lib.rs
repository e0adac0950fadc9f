//! Core domain logic for ClinicBook.
//! This crate is the single source of truth for patient and appointment invariants.

pub mod command;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod parser;
pub mod repo;
pub mod service;

pub use command::{Command, CommandError, CommandOutput, CommandResult, Index};
pub use config::{AppConfig, ConfigError, LogSettings};
pub use logging::{init_logging, LoggingError};
pub use model::appointment::{Appointment, AppointmentStatus, AppointmentTime};
pub use model::patient::Patient;
pub use model::{Identity, RecordKind, ValidationError};
pub use parser::{parse_command, ParseError, ParseResult};
pub use repo::book_repo::{BookRepository, InMemoryBookRepository, RepoError, RepoResult};
pub use service::logic_service::{LogicError, LogicResult, LogicService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
