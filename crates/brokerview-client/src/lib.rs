//! Management-bridge client.
//!
//! The broker exposes its runtime state over a JMX-to-JSON HTTP bridge.
//! This crate maps the three operations the console needs — `search`,
//! `read`, `exec` — onto the bridge's JSON envelope and normalizes the
//! replies. Transport sits behind the [`Endpoint`] trait: production uses
//! [`HttpEndpoint`], tests use the in-process [`MockBroker`].

pub mod client;
pub mod error;
pub mod jolokia;
pub mod mock;

pub use client::*;
pub use error::*;
pub use jolokia::*;
pub use mock::{ExecCall, MockBroker};
