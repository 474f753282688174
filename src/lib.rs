//! Interactive shell widget core.
//!
//! One widget instance drives a single long-lived backend process through an
//! asynchronous message protocol: user intents go out as [`protocol::ShellCommand`]
//! envelopes, lifecycle and output events come back as [`protocol::ShellEvent`]
//! envelopes, and the [`widget`] module keeps the display affordances consistent
//! with the true process state while batching high-frequency output to a fixed
//! frame cadence.

pub mod backend;
pub mod error;
pub mod model;
pub mod protocol;
pub mod widget;
