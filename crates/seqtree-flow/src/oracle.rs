//! Process-backed oracle: runs an external check once per test case.

use std::{
    fs,
    path::{Path, PathBuf},
    process::{Child, Command, ExitStatus, Stdio},
    thread,
    time::{Duration, Instant},
};

use serde::{Deserialize, Serialize};
use seqtree_core::{Oracle, OracleError, OracleOutcome};
use tracing::{debug, warn};

use crate::FlowError;

/// Environment variable carrying the episode number to the checker.
pub const EPISODE_ENV: &str = "SEQTREE_EPISODE";
/// Environment variable carrying the rendered command to the checker.
pub const COMMAND_ENV: &str = "SEQTREE_COMMAND";

const POLL_INTERVAL: Duration = Duration::from_millis(10);

fn default_timeout_secs() -> f64 {
    200.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// How to run the external checker.
pub struct OracleSpec {
    /// Program run once per case, with the case directory as working directory.
    /// A bare name is looked up on `PATH`. A relative path is taken relative to
    /// the case directory unless [`crate::RunSpec::load`] has resolved it.
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
    /// Test case directories.
    pub cases: Vec<PathBuf>,
    /// Per-case wall clock limit.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: f64,
    /// When set, the rendered command is written to this file inside each
    /// case directory before the program runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_file: Option<String>,
}

impl OracleSpec {
    pub fn validate(&self) -> Result<(), FlowError> {
        if self.program.trim().is_empty() {
            return Err(FlowError::EmptyProgram);
        }
        if self.cases.is_empty() {
            return Err(FlowError::NoCases);
        }
        self.timeout().map(|_| ())
    }

    /// Per-case limit as a `Duration`; must be positive and representable.
    fn timeout(&self) -> Result<Duration, FlowError> {
        let invalid = || FlowError::InvalidTimeout {
            value: self.timeout_secs,
        };
        if !self.timeout_secs.is_finite() || self.timeout_secs <= 0.0 {
            return Err(invalid());
        }
        Duration::try_from_secs_f64(self.timeout_secs).map_err(|_| invalid())
    }
}

enum CaseResult {
    Passed,
    Fault,
    Timeout,
}

/// Oracle that counts failing and hanging test cases of an external checker.
///
/// A case is a fault when the checker exits non-zero, cannot be spawned, or
/// its script file cannot be written. A case is a timeout when the checker
/// outlives `timeout_secs`; the child is killed in that case.
#[derive(Debug, Clone)]
pub struct CommandOracle {
    spec: OracleSpec,
    timeout: Duration,
}

impl CommandOracle {
    pub fn new(spec: OracleSpec) -> Result<Self, FlowError> {
        spec.validate()?;
        let timeout = spec.timeout()?;
        Ok(CommandOracle { spec, timeout })
    }

    pub fn spec(&self) -> &OracleSpec {
        &self.spec
    }

    fn run_case(&self, case: &Path, episode: u64, command: &str) -> CaseResult {
        if let Some(script_file) = &self.spec.script_file {
            if let Err(err) = fs::write(case.join(script_file), command) {
                warn!(case = %case.display(), error = %err, "failed to write script file");
                return CaseResult::Fault;
            }
        }

        let child = Command::new(&self.spec.program)
            .args(&self.spec.args)
            .current_dir(case)
            .env(EPISODE_ENV, episode.to_string())
            .env(COMMAND_ENV, command)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        let child = match child {
            Ok(child) => child,
            Err(err) => {
                warn!(
                    case = %case.display(),
                    program = %self.spec.program,
                    error = %err,
                    "failed to spawn checker"
                );
                return CaseResult::Fault;
            }
        };

        match self.wait_with_deadline(child) {
            Ok(Some(status)) if status.success() => CaseResult::Passed,
            Ok(Some(status)) => {
                debug!(case = %case.display(), %status, "checker reported a fault");
                CaseResult::Fault
            }
            Ok(None) => {
                warn!(
                    case = %case.display(),
                    timeout_secs = self.spec.timeout_secs,
                    "checker timed out"
                );
                CaseResult::Timeout
            }
            Err(err) => {
                warn!(case = %case.display(), error = %err, "failed to wait for checker");
                CaseResult::Fault
            }
        }
    }

    /// Poll `child` until it exits or the deadline passes.
    /// Returns `None` after killing a child that overran the deadline.
    /// A deadline past the platform's `Instant` range never expires.
    fn wait_with_deadline(&self, mut child: Child) -> std::io::Result<Option<ExitStatus>> {
        let deadline = Instant::now().checked_add(self.timeout);
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(Some(status));
            }
            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                // the child may exit between try_wait and kill
                let _ = child.kill();
                child.wait()?;
                return Ok(None);
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

impl Oracle for CommandOracle {
    fn evaluate(&mut self, episode: u64, command: &str) -> Result<OracleOutcome, OracleError> {
        let mut outcome = OracleOutcome::default();
        for case in &self.spec.cases {
            match self.run_case(case, episode, command) {
                CaseResult::Passed => {}
                CaseResult::Fault => outcome.faults += 1,
                CaseResult::Timeout => outcome.timeouts += 1,
            }
        }

        debug!(
            episode,
            cases = self.spec.cases.len(),
            faults = outcome.faults,
            timeouts = outcome.timeouts,
            "command oracle finished"
        );
        Ok(outcome)
    }
}
