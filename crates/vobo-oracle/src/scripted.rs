use std::collections::VecDeque;
use std::sync::Mutex;

use crate::{AdvisoryOracle, OracleError, OracleIssue, OracleRequest};

/// Deterministic oracle replaying queued answers; used by tests and offline runs.
#[derive(Default)]
pub struct ScriptedOracle {
    answers: Mutex<VecDeque<Result<Vec<OracleIssue>, String>>>,
    requests: Mutex<Vec<OracleRequest>>,
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(self, issues: Vec<OracleIssue>) -> Self {
        self.push(Ok(issues));
        self
    }

    pub fn fail(self, reason: impl Into<String>) -> Self {
        self.push(Err(reason.into()));
        self
    }

    /// Requests seen so far, in order.
    pub fn requests(&self) -> Vec<OracleRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    fn push(&self, answer: Result<Vec<OracleIssue>, String>) {
        if let Ok(mut q) = self.answers.lock() {
            q.push_back(answer);
        }
    }
}

impl AdvisoryOracle for ScriptedOracle {
    /// Pops the next queued answer; an empty queue answers with no issues.
    fn consult(&self, request: &OracleRequest) -> Result<Vec<OracleIssue>, OracleError> {
        if let Ok(mut r) = self.requests.lock() {
            r.push(request.clone());
        }
        let next = self
            .answers
            .lock()
            .map_err(|e| OracleError::Unavailable(e.to_string()))?
            .pop_front();
        match next {
            Some(Ok(issues)) => Ok(issues),
            Some(Err(reason)) => Err(OracleError::Unavailable(reason)),
            None => Ok(Vec::new()),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
