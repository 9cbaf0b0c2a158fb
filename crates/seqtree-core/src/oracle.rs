//! The evaluation oracle contract.
//!
//! An oracle turns a rendered command into `(faults, timeouts)`. Its own
//! failures (crashes, hangs, unexpected output) are expected to be folded
//! into those counts; an `OracleError` that still reaches the engine aborts
//! the run.

use std::error::Error as StdError;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome channel of one oracle evaluation.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OracleOutcome {
    pub faults: u32,
    pub timeouts: u32,
}

impl OracleOutcome {
    pub fn new(faults: u32, timeouts: u32) -> Self {
        OracleOutcome { faults, timeouts }
    }
}

/// Unrecoverable oracle failure surfaced to the engine.
#[derive(Debug)]
pub struct OracleError(Box<dyn StdError + Send + Sync>);

impl OracleError {
    pub fn new(source: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        OracleError(source.into())
    }
}

impl fmt::Display for OracleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl StdError for OracleError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.0.as_ref())
    }
}

/// External, expensive evaluator of rendered commands.
pub trait Oracle {
    /// Evaluate one rendered command on behalf of `episode`.
    fn evaluate(&mut self, episode: u64, command: &str) -> Result<OracleOutcome, OracleError>;
}

impl<O: Oracle + ?Sized> Oracle for &mut O {
    fn evaluate(&mut self, episode: u64, command: &str) -> Result<OracleOutcome, OracleError> {
        (**self).evaluate(episode, command)
    }
}

/// Oracle backed by a closure, see [`from_fn`].
pub struct FnOracle<F> {
    f: F,
}

impl<F> Oracle for FnOracle<F>
where
    F: FnMut(u64, &str) -> Result<OracleOutcome, OracleError>,
{
    fn evaluate(&mut self, episode: u64, command: &str) -> Result<OracleOutcome, OracleError> {
        (self.f)(episode, command)
    }
}

/// Wrap a closure as an oracle.
pub fn from_fn<F>(f: F) -> FnOracle<F>
where
    F: FnMut(u64, &str) -> Result<OracleOutcome, OracleError>,
{
    FnOracle { f }
}
