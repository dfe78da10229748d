//! Console output for setup runs.

use std::path::Path;

use closure_setup::archive::{ArchiveEntry, UnpackSummary};
use closure_setup::runtime::{ConfigureOutcome, RuntimeRef};
use closure_setup::setup::{Artifact, SetupObserver, SetupOutcome, SetupStage};
use closure_setup::transfer::{format_progress, whole_mb, ProgressThrottle, MB};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};

use crate::error::CliError;

/// Where to report problems.
const ISSUES_URL: &str = "https://github.com/dcodeIO/ClosureCompiler.js/issues";

/// Prints setup progress as it happens.
///
/// Downloads get an indicatif bar when stderr is a terminal, and throttled
/// `| x / y mb` lines otherwise.
pub struct ConsoleReporter {
    interactive: bool,
    bar: Option<ProgressBar>,
    throttle: ProgressThrottle,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self::with_interactive(Term::stderr().is_term())
    }

    pub fn with_interactive(interactive: bool) -> Self {
        Self {
            interactive,
            bar: None,
            throttle: ProgressThrottle::new(MB),
        }
    }

    /// Print the final success message.
    pub fn print_success(&self, outcome: &SetupOutcome) {
        let kind = if outcome.runtime.is_bundled() { "bundled" } else { "system" };
        match &outcome.java_version {
            Some(version) => println!("  Using {} Java {} ({})", kind, version, outcome.runtime),
            None => println!("  Using {} Java ({})", kind, outcome.runtime),
        }
        if let Some(jar) = &outcome.compiler_jar {
            println!("  Compiler: {}", jar.display());
        }
        println!(
            "\n  {} Closure Compiler has been configured successfully.",
            style("✔").green()
        );
    }

    fn download_bar(total: Option<u64>) -> ProgressBar {
        let bar = ProgressBar::with_draw_target(total, indicatif::ProgressDrawTarget::stderr());
        let style = ProgressStyle::default_bar()
            .template("  [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
            .map(|s| s.progress_chars("=> "))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        bar
    }

    fn abandon_bar(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.abandon();
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl SetupObserver for ConsoleReporter {
    fn stage(&mut self, stage: SetupStage) {
        match stage {
            SetupStage::LocatingRuntime => println!("  Looking for Java ..."),
            SetupStage::ConfiguringRuntime => println!("  Configuring bundled JRE ..."),
            SetupStage::TestingBundled => println!("  Testing bundled Java ..."),
            SetupStage::TestingSystemFallback => {
                println!("  Bundled Java failed, trying system Java instead ...")
            }
            SetupStage::Failure => self.abandon_bar(),
            _ => {}
        }
    }

    fn download_started(&mut self, _artifact: Artifact, url: &str) {
        println!("  Downloading {} ...", url);
        self.throttle = ProgressThrottle::new(MB);
        self.bar = self.interactive.then(|| Self::download_bar(None));
    }

    fn download_progress(&mut self, _artifact: Artifact, chunk_bytes: u64, total: Option<u64>) {
        match &self.bar {
            Some(bar) => {
                if let Some(total) = total {
                    bar.set_length(total);
                }
                bar.inc(chunk_bytes);
            }
            None => {
                if let Some(current) = self.throttle.record(chunk_bytes) {
                    println!("  {}", format_progress(current, total));
                }
            }
        }
    }

    fn download_finished(&mut self, _artifact: Artifact, bytes: u64, dest: &Path) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
        println!(
            "  {} Download complete: {} ({} mb)\n",
            style("✔").green(),
            dest.display(),
            whole_mb(bytes)
        );
    }

    fn entry(&mut self, _artifact: Artifact, entry: &ArchiveEntry) {
        println!("  | {}", entry.path.display());
    }

    fn unpacked(&mut self, artifact: Artifact, summary: &UnpackSummary) {
        println!(
            "  {} Unpacked {}: {} files, {} directories\n",
            style("✔").green(),
            artifact.name(),
            summary.files,
            summary.directories
        );
    }

    fn configured(&mut self, outcome: &ConfigureOutcome) {
        match outcome {
            ConfigureOutcome::AlreadyConfigured => {
                println!("  {} Bundled JRE is already configured.\n", style("✔").green())
            }
            ConfigureOutcome::Configured { from, to } => {
                println!("  | {} -> {}", from.display(), to.display());
                println!("  {} Bundled JRE configured.\n", style("✔").green());
            }
        }
    }

    fn runtime_tested(&mut self, runtime: &RuntimeRef, ok: bool) {
        let kind = if runtime.is_bundled() { "bundled" } else { "system" };
        if ok {
            println!("  {} Successfully called {} Java: {}\n", style("✔").green(), kind, runtime);
        } else {
            println!("  {} Could not call {} Java: {}", style("✖").red(), kind, runtime);
        }
    }
}

/// Print a command error with the issue-tracker hint.
pub fn print_error(err: &CliError) {
    println!("\n  {} {}", style("✖").red(), err);
    if matches!(err, CliError::Setup(_) | CliError::NoRuntime) {
        println!("    Closure Compiler could not be configured.");
        println!("    See: {} (create an issue maybe)", ISSUES_URL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_interactive_reporter_has_no_bar() {
        let mut reporter = ConsoleReporter::with_interactive(false);
        reporter.download_started(Artifact::Compiler, "https://example.com/c.tar.gz");
        reporter.download_progress(Artifact::Compiler, 10, Some(20));

        assert!(reporter.bar.is_none());
        assert_eq!(reporter.throttle.current(), 10);
    }

    #[test]
    fn test_throttle_resets_per_download() {
        let mut reporter = ConsoleReporter::with_interactive(false);
        reporter.download_started(Artifact::Compiler, "a");
        reporter.download_progress(Artifact::Compiler, 5, None);
        reporter.download_started(Artifact::Runtime, "b");

        assert_eq!(reporter.throttle.current(), 0);
    }

    #[test]
    fn test_failure_abandons_bar() {
        let mut reporter = ConsoleReporter::with_interactive(true);
        reporter.download_started(Artifact::Runtime, "b");
        assert!(reporter.bar.is_some());

        reporter.stage(SetupStage::Failure);

        assert!(reporter.bar.is_none());
    }
}
