//! Setup orchestration.
//!
//! [`Installer`] drives a run through the [`SetupStage`] state machine,
//! reporting to a [`SetupObserver`] as it goes. Temporary archives are
//! removed by [`TempArchives`] whatever the outcome.

mod cleanup;
mod installer;
mod stage;

pub use crate::layout::InstallLayout;
pub use cleanup::TempArchives;
pub use installer::{clean, Inspection, Installer, SetupFailure, SetupOutcome};
pub use stage::{Artifact, NoopObserver, SetupObserver, SetupStage};
