//! Charity fund engine.
//!
//! The engine owns charity projects and donations and moves money between
//! them. Each time a project or a donation is created, the open entities on
//! the other side are swept oldest first (see [`allocation::distribute`]) and
//! everything that reaches its target is closed.

pub use allocation::{Sweep, distribute};
pub use commands::{DonationNew, ProjectNew, ProjectUpdate};
pub use donations::Donation;
pub use error::EngineError;
pub use fundable::{Fundable, Funding};
pub use ops::{Engine, EngineBuilder};
pub use projects::Project;
pub use report::{ReportRow, format_duration, rank_by_funding_speed};

pub mod allocation;
mod commands;
mod donations;
mod error;
mod fundable;
mod ops;
mod projects;
mod report;
mod repository;
mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
