//! Smoke testing of Java runtimes via a subprocess.

use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::OnceLock;
use std::thread;
use std::time::{Duration, Instant};

use regex::Regex;
use tracing::debug;

use super::{ProbeReport, RuntimeRef};
use crate::traits::JavaProbe;

/// Default time a probe may run before it is killed.
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 30;

/// Interval between exit checks while a probe is running.
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Argument passed to the runtime. Prints the version and exits.
const PROBE_ARG: &str = "-version";

/// Probes a runtime by running `<java> -version`.
#[derive(Debug, Clone)]
pub struct ProcessProbe {
    timeout: Duration,
}

impl Default for ProcessProbe {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_PROBE_TIMEOUT_SECS))
    }
}

/// What a finished probe produced.
#[derive(Debug)]
struct ProbeOutput {
    status: ExitStatus,
    stderr: String,
}

impl ProcessProbe {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run the probe. `None` on spawn failure or timeout.
    fn run(&self, runtime: &RuntimeRef) -> Option<ProbeOutput> {
        let mut child = match Command::new(runtime.program())
            .arg(PROBE_ARG)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                debug!(runtime = %runtime, error = %e, "Failed to spawn runtime");
                return None;
            }
        };

        // Drained concurrently so a chatty runtime cannot fill the pipe and stall.
        let reader = child.stderr.take().map(|mut pipe| {
            thread::spawn(move || {
                let mut buf = Vec::new();
                let _ = pipe.read_to_end(&mut buf);
                String::from_utf8_lossy(&buf).into_owned()
            })
        });

        let status = self.wait_with_deadline(&mut child, runtime);

        let stderr = match (status.is_some(), reader) {
            (true, Some(reader)) => reader.join().unwrap_or_default(),
            // A killed runtime may have left children holding the pipe open.
            _ => String::new(),
        };

        Some(ProbeOutput {
            status: status?,
            stderr,
        })
    }

    fn wait_with_deadline(&self, child: &mut Child, runtime: &RuntimeRef) -> Option<ExitStatus> {
        let deadline = Instant::now() + self.timeout;
        loop {
            match child.try_wait() {
                Ok(Some(status)) => return Some(status),
                Ok(None) if Instant::now() >= deadline => {
                    debug!(
                        runtime = %runtime,
                        timeout_secs = self.timeout.as_secs(),
                        "Runtime probe timed out, killing"
                    );
                    let _ = child.kill();
                    let _ = child.wait();
                    return None;
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    debug!(runtime = %runtime, error = %e, "Failed to wait for runtime");
                    return None;
                }
            }
        }
    }
}

impl JavaProbe for ProcessProbe {
    fn test(&self, runtime: &RuntimeRef) -> bool {
        self.smoke_test(runtime).passed
    }

    fn smoke_test(&self, runtime: &RuntimeRef) -> ProbeReport {
        let report = match self.run(runtime) {
            Some(output) if output.status.success() => ProbeReport {
                passed: true,
                version: parse_version(&output.stderr),
            },
            _ => ProbeReport::default(),
        };
        debug!(runtime = %runtime, ok = report.passed, version = ?report.version, "Runtime smoke test");
        report
    }
}

/// Extract the quoted version from `java -version` output.
///
/// `openjdk version "17.0.9" 2023-10-17` yields `17.0.9`.
pub fn parse_version(output: &str) -> Option<String> {
    static VERSION: OnceLock<Option<Regex>> = OnceLock::new();
    let re = VERSION
        .get_or_init(|| Regex::new(r#"version\s+"([^"]+)""#).ok())
        .as_ref()?;
    re.captures(output)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
