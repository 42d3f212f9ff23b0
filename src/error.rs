//! Error types for the gate.
//!
//! Construction-time failures surface as [`GateError`]. Replay failures
//! ([`ReplayError`]) never leave the gate: they are logged and recovered by
//! focusing the host surface.

use thiserror::Error;

use crate::types::InputKind;

/// Errors returned by fallible constructors and attach.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GateError {
    /// The designated host surface could not be found at attach time.
    #[error("host surface not found: {0}")]
    HostMissing(String),

    /// A question bank needs at least one question.
    #[error("question bank is empty")]
    EmptyBank,

    /// Question failed validation.
    #[error("invalid question: {0}")]
    InvalidQuestion(String),
}

/// Errors raised while synthesizing or dispatching a replayed event.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReplayError {
    /// The equivalent event could not be constructed.
    #[error("cannot synthesize event: {0}")]
    Synthesis(String),

    /// The host refused or failed to deliver the event.
    #[error("dispatch failed: {0}")]
    Dispatch(String),

    /// The host has no representation for this kind of event.
    #[error("host does not support {0:?} events")]
    Unsupported(InputKind),
}
