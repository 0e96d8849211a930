//! Blocking client for the Toggl Track REST API.
//!
//! Build a [`TogglClient`] from a [`Config`] and pass a [`Context`] to every
//! call:
//!
//! ```no_run
//! use toggl_client::{Config, Context, TogglClient};
//!
//! let client = TogglClient::new(&Config::from_env()?)?;
//! for workspace in client.fetch_workspaces(&Context::background())? {
//!     println!("{} {}", workspace.id, workspace.name);
//! }
//! # Ok::<(), toggl_client::TogglError>(())
//! ```
//!
//! With `Config::debug` set, requests and decoded responses are logged as
//! `tracing` debug events. Nothing is printed unless the application installs
//! a subscriber.

pub mod config;
pub mod context;
pub mod dates;
pub mod error;
pub mod models;
pub mod toggl;

pub use config::Config;
pub use context::Context;
pub use error::TogglError;
pub use models::{
    ActiveUser, Activity, CurrencyTotal, Dashboard, DetailedReport, DetailedReportRequest,
    ReportEntry, Workspace,
};
pub use toggl::{DEFAULT_USER_AGENT, HttpMethod, TogglClient};
