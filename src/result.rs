//! Owned evaluation-result record
//!
//! `EvalResult` is the safe, owned form of the record an evaluator produces
//! once a run completes: run metrics plus the rendered output text and an
//! optional memory dump. Payloads are already null-terminated (`CString`,
//! typically straight from `TextBuffer::consume`) so handing the record to a
//! foreign host is a pointer move, not a re-encode.
//!
//! The C-layout twin and the release capability live in [`crate::ffi`].

use std::ffi::CString;
use std::fmt;

/// Result of one evaluation run, with owned payloads.
#[derive(Debug)]
pub struct EvalResult {
    /// Interactions performed by the run.
    pub iterations: u64,
    /// Wall-clock duration of the run in seconds.
    pub elapsed_secs: f64,
    /// Rendered output of the run, if any.
    pub output: Option<CString>,
    /// Memory dump captured alongside the output, if requested.
    pub mem_dump: Option<CString>,
}

impl EvalResult {
    /// Create a record with metrics only; attach payloads with the
    /// builder methods.
    pub fn new(iterations: u64, elapsed_secs: f64) -> Self {
        Self {
            iterations,
            elapsed_secs,
            output: None,
            mem_dump: None,
        }
    }

    /// Attach the primary output payload.
    pub fn with_output(mut self, output: CString) -> Self {
        self.output = Some(output);
        self
    }

    /// Attach the secondary memory-dump payload.
    pub fn with_mem_dump(mut self, mem_dump: CString) -> Self {
        self.mem_dump = Some(mem_dump);
        self
    }

    /// Interactions per second, or 0 for a zero-duration run.
    pub fn iterations_per_second(&self) -> f64 {
        if self.elapsed_secs > 0.0 {
            self.iterations as f64 / self.elapsed_secs
        } else {
            0.0
        }
    }
}

impl fmt::Display for EvalResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let output = self
            .output
            .as_deref()
            .map(|s| s.to_string_lossy())
            .unwrap_or_default();
        write!(
            f,
            "{{ iterations = {}, elapsed = {}s, ips = {}, output = {} }}",
            self.iterations,
            self.elapsed_secs,
            self.iterations_per_second(),
            output
        )?;
        if let Some(dump) = self.mem_dump.as_deref() {
            write!(f, "\n{}", dump.to_string_lossy())?;
        }
        Ok(())
    }
}
