//! # Mock Rank Oracle
//!
//! Scripted [`RankOracle`] for tests of code that consumes ranks. Records
//! how often it was called and the shape of the last matrix it saw.

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::error::OracleError;
use crate::process::parse_rank;
use crate::sms::SmsMatrix;
use crate::traits::RankOracle;

#[derive(Debug, Clone)]
enum Script {
    Rank(usize),
    Unavailable,
    Output(String),
}

/// A rank oracle with a fixed answer.
#[derive(Debug)]
pub struct MockRankOracle {
    script: Script,
    calls: AtomicUsize,
    last_shape: Mutex<Option<(usize, usize)>>,
}

impl MockRankOracle {
    fn with_script(script: Script) -> Self {
        Self {
            script,
            calls: AtomicUsize::new(0),
            last_shape: Mutex::new(None),
        }
    }

    /// Always answer `rank`.
    pub fn returning(rank: usize) -> Self {
        Self::with_script(Script::Rank(rank))
    }

    /// Always fail as if the backend could not be started.
    pub fn unavailable() -> Self {
        Self::with_script(Script::Unavailable)
    }

    /// Answer as if the backend printed `output`.
    pub fn malformed(output: impl Into<String>) -> Self {
        Self::with_script(Script::Output(output.into()))
    }

    /// Number of `rank` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// `(rows, cols)` of the most recent matrix.
    pub fn last_shape(&self) -> Option<(usize, usize)> {
        self.last_shape.lock().ok().and_then(|guard| *guard)
    }
}

impl RankOracle for MockRankOracle {
    fn name(&self) -> &str {
        "mock"
    }

    fn rank(&self, matrix: &SmsMatrix) -> Result<usize, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut guard) = self.last_shape.lock() {
            *guard = Some((matrix.rows(), matrix.cols()));
        }
        match &self.script {
            Script::Rank(rank) => Ok(*rank),
            Script::Unavailable => Err(OracleError::Unavailable {
                program: "mock".into(),
                source: io::Error::new(io::ErrorKind::NotFound, "mock oracle unavailable"),
            }),
            Script::Output(text) => parse_rank(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_calls_and_shape() {
        let oracle = MockRankOracle::returning(4);
        assert_eq!(oracle.last_shape(), None);
        let m = SmsMatrix::new(3, 9, [(0, 0, 1)]).unwrap();
        assert_eq!(oracle.rank(&m).unwrap(), 4);
        assert_eq!(oracle.rank(&m).unwrap(), 4);
        assert_eq!(oracle.calls(), 2);
        assert_eq!(oracle.last_shape(), Some((3, 9)));
    }

    #[test]
    fn scripted_failures() {
        let m = SmsMatrix::new(1, 1, [(0, 0, 1)]).unwrap();
        assert!(matches!(
            MockRankOracle::unavailable().rank(&m),
            Err(OracleError::Unavailable { .. })
        ));
        assert!(matches!(
            MockRankOracle::malformed("segfault").rank(&m),
            Err(OracleError::Protocol(_))
        ));
        assert_eq!(MockRankOracle::malformed("banner\n7\n").rank(&m).unwrap(), 7);
    }
}
