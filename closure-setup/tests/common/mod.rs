//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::path::Path;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::thread;

use flate2::write::GzEncoder;
use flate2::Compression;

use closure_setup::archive::{ArchiveEntry, UnpackSummary};
use closure_setup::runtime::{ConfigureOutcome, ProbeReport, RuntimeRef};
use closure_setup::setup::{Artifact, SetupObserver, SetupStage};
use closure_setup::traits::JavaProbe;

// ============================================================================
// Loopback HTTP server
// ============================================================================

/// Minimal HTTP/1.1 server serving canned bodies by path.
///
/// Unknown paths get a 404. The accept loop runs on a detached thread for the
/// lifetime of the test process.
pub struct TestServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

impl TestServer {
    pub fn start(routes: Vec<(&str, Vec<u8>)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let routes: HashMap<String, Vec<u8>> = routes
            .into_iter()
            .map(|(path, body)| (path.to_string(), body))
            .collect();
        let requests = Arc::new(Mutex::new(Vec::new()));

        let log = Arc::clone(&requests);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { continue };
                let _ = serve(stream, &routes, &log);
            }
        });

        Self { addr, requests }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Paths requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

fn serve(
    stream: TcpStream,
    routes: &HashMap<String, Vec<u8>>,
    log: &Mutex<Vec<String>>,
) -> io::Result<()> {
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;
    loop {
        let mut header = String::new();
        if reader.read_line(&mut header)? == 0 || header == "\r\n" {
            break;
        }
    }

    let path = request_line
        .split_whitespace()
        .nth(1)
        .unwrap_or("/")
        .to_string();
    log.lock().unwrap().push(path.clone());

    let mut stream = stream;
    match routes.get(&path) {
        Some(body) => {
            write!(
                stream,
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nContent-Type: application/gzip\r\nConnection: close\r\n\r\n",
                body.len()
            )?;
            stream.write_all(body)?;
        }
        None => {
            let body = b"not found";
            write!(
                stream,
                "HTTP/1.1 404 Not Found\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            )?;
            stream.write_all(body)?;
        }
    }
    stream.flush()
}

// ============================================================================
// Archive fixtures
// ============================================================================

/// Build a tar.gz in memory from directories and files.
pub fn tar_gz(dirs: &[&str], files: &[(&str, &[u8])]) -> Vec<u8> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);

    for dir in dirs {
        let mut header = tar::Header::new_gnu();
        header.set_entry_type(tar::EntryType::Directory);
        header.set_size(0);
        header.set_mode(0o755);
        header.set_cksum();
        builder.append_data(&mut header, dir, io::empty()).unwrap();
    }
    for (name, data) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, name, *data).unwrap();
    }

    builder.into_inner().unwrap().finish().unwrap()
}

/// Write a tar.gz fixture to disk.
pub fn write_tar_gz(path: &Path, dirs: &[&str], files: &[(&str, &[u8])]) {
    File::create(path)
        .unwrap()
        .write_all(&tar_gz(dirs, files))
        .unwrap();
}

/// A compiler distribution: the jar plus a couple of text files.
pub fn compiler_archive() -> Vec<u8> {
    tar_gz(
        &[],
        &[
            ("compiler.jar", b"PK\x03\x04 not really a jar"),
            ("COPYING", b"Apache License 2.0"),
            ("README.md", b"Closure Compiler"),
        ],
    )
}

/// A bundled JRE with one executable directory per platform.
pub fn jre_archive() -> Vec<u8> {
    tar_gz(
        &["bin_windows/", "bin_mac/", "bin_linux/", "lib/"],
        &[
            ("bin_windows/java.exe", b"MZ"),
            ("bin_mac/java", b"#!/bin/sh\nexit 0\n"),
            ("bin_linux/java", b"#!/bin/sh\nexit 0\n"),
            ("lib/rt.jar", b"runtime classes"),
        ],
    )
}

// ============================================================================
// Fakes
// ============================================================================

/// Probe with fixed answers for the system and bundled runtimes.
///
/// The bundled runtime only passes if its executable actually exists. Clones
/// share the call log.
#[derive(Clone, Default)]
pub struct ScriptedProbe {
    pub system_ok: bool,
    pub bundled_ok: bool,
    calls: Rc<RefCell<Vec<RuntimeRef>>>,
}

impl ScriptedProbe {
    pub fn new(system_ok: bool, bundled_ok: bool) -> Self {
        Self {
            system_ok,
            bundled_ok,
            calls: Rc::default(),
        }
    }

    pub fn calls(&self) -> Vec<RuntimeRef> {
        self.calls.borrow().clone()
    }
}

impl JavaProbe for ScriptedProbe {
    fn test(&self, runtime: &RuntimeRef) -> bool {
        self.smoke_test(runtime).passed
    }

    fn smoke_test(&self, runtime: &RuntimeRef) -> ProbeReport {
        self.calls.borrow_mut().push(runtime.clone());
        let passed = match runtime {
            RuntimeRef::System(_) => self.system_ok,
            RuntimeRef::Bundled(path) => self.bundled_ok && path.exists(),
        };
        ProbeReport {
            passed,
            version: passed.then(|| "1.7.0_06".to_string()),
        }
    }
}

/// Observer that records everything it is told.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    pub stages: Vec<SetupStage>,
    pub started: Vec<(Artifact, String)>,
    pub progress_bytes: HashMap<&'static str, u64>,
    pub finished: Vec<(Artifact, u64)>,
    pub entries: Vec<(Artifact, ArchiveEntry)>,
    pub unpacked: Vec<(Artifact, UnpackSummary)>,
    pub configured: Vec<ConfigureOutcome>,
    pub tested: Vec<(RuntimeRef, bool)>,
}

impl SetupObserver for RecordingObserver {
    fn stage(&mut self, stage: SetupStage) {
        self.stages.push(stage);
    }

    fn download_started(&mut self, artifact: Artifact, url: &str) {
        self.started.push((artifact, url.to_string()));
    }

    fn download_progress(&mut self, artifact: Artifact, chunk_bytes: u64, _total: Option<u64>) {
        *self.progress_bytes.entry(artifact.name()).or_default() += chunk_bytes;
    }

    fn download_finished(&mut self, artifact: Artifact, bytes: u64, _dest: &Path) {
        self.finished.push((artifact, bytes));
    }

    fn entry(&mut self, artifact: Artifact, entry: &ArchiveEntry) {
        self.entries.push((artifact, entry.clone()));
    }

    fn unpacked(&mut self, artifact: Artifact, summary: &UnpackSummary) {
        self.unpacked.push((artifact, *summary));
    }

    fn configured(&mut self, outcome: &ConfigureOutcome) {
        self.configured.push(outcome.clone());
    }

    fn runtime_tested(&mut self, runtime: &RuntimeRef, ok: bool) {
        self.tested.push((runtime.clone(), ok));
    }
}
