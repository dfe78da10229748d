//! Runtime discovery.

use tracing::{debug, info};

use super::RuntimeRef;
use crate::layout::InstallLayout;
use crate::traits::JavaProbe;

/// Result of [`RuntimeLocator::locate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Located {
    /// The system runtime passed its smoke test.
    System {
        runtime: RuntimeRef,
        version: Option<String>,
    },
    /// A configured bundled runtime exists on disk. It has not been tested yet.
    Bundled(RuntimeRef),
    /// A fresh bundled install is required.
    NotFound,
}

/// Finds a runtime, preferring the system one.
pub struct RuntimeLocator<'a, P: JavaProbe> {
    probe: &'a P,
    layout: &'a InstallLayout,
    system: RuntimeRef,
}

impl<'a, P: JavaProbe> RuntimeLocator<'a, P> {
    pub fn new(probe: &'a P, layout: &'a InstallLayout, system: RuntimeRef) -> Self {
        Self {
            probe,
            layout,
            system,
        }
    }

    /// The system runtime this locator checks.
    pub fn system(&self) -> &RuntimeRef {
        &self.system
    }

    /// Locate a runtime.
    ///
    /// The system runtime is smoke-tested. If it fails, an existing
    /// `<root>/jre/bin` directory is enough to report a bundled runtime.
    pub fn locate(&self) -> Located {
        let report = self.probe.smoke_test(&self.system);
        if report.passed {
            info!(runtime = %self.system, version = ?report.version, "System Java is available");
            return Located::System {
                runtime: self.system.clone(),
                version: report.version,
            };
        }

        if self.layout.has_bundled_runtime() {
            let bundled = RuntimeRef::Bundled(self.layout.bundled_java());
            info!(runtime = %bundled, "Found configured bundled Java");
            return Located::Bundled(bundled);
        }

        debug!(root = %self.layout.root().display(), "No Java runtime found");
        Located::NotFound
    }
}
