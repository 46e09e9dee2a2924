//! Console session layer.
//!
//! Owns one management tree and its selection on behalf of a mounted
//! view: polls the bridge, merges query results, serves the status /
//! address / acceptor / cluster-connection view models, and maps UI
//! actions (create address, find-and-select) onto management calls.

pub mod config;
pub mod session;
pub mod views;

pub use config::*;
pub use session::*;
pub use views::*;
