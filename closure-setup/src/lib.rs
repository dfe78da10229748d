//! closure-setup - Post-install configurator for the Closure Compiler
//!
//! Downloads and unpacks the compiler archive, then makes sure a working
//! Java runtime is available: the system one if it passes a smoke test,
//! otherwise a bundled JRE that is downloaded, unpacked and rearranged so
//! the executable always lives at `<root>/jre/bin/java`.
//!
//! # Example
//!
//! ```no_run
//! use closure_setup::config::SetupConfig;
//! use closure_setup::setup::{Installer, NoopObserver};
//!
//! let config = SetupConfig::new("/opt/closure");
//! let installer = Installer::from_config(config)?;
//! match installer.run(&mut NoopObserver) {
//!     Ok(outcome) => println!("using {}", outcome.runtime),
//!     Err(failure) => eprintln!("{failure}"),
//! }
//! # Ok::<(), closure_setup::error::SetupError>(())
//! ```

pub mod archive;
pub mod config;
pub mod error;
pub mod layout;
pub mod logging;
pub mod runtime;
pub mod setup;
pub mod traits;
pub mod transfer;

pub use error::{ErrorKind, SetupError, SetupResult};
