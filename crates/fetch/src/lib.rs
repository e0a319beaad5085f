//! Source fetching for srcfetch manifests.
//!
//! Every manifest line is handled on its own: a tarball is downloaded and
//! unpacked into `<name>-<version>/`, a git location is cloned there and
//! checked out at its commit. Targets that already exist are left alone, so
//! re-running over the same manifest only fetches what is missing.
//!
//! A failing line never stops the run; its outcome is recorded in the
//! [`FetchReport`] and processing moves on.

#![warn(missing_docs)]

mod error;
mod extract;
mod git;
mod pipeline;
mod transport;

pub use error::{Error, Result};
pub use extract::unpack_tarball;
pub use git::{GitCli, GitClient};
pub use pipeline::{FetchConfig, FetchOutcome, FetchReport, Fetcher, LineOutcome};
pub use transport::{HttpTransport, Transport};
