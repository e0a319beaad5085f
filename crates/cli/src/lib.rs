//! srcfetch - list, merge and fetch the upstream sources of a Spack spec.
//!
//! Three tools share this library and hand work to each other through
//! manifest files:
//!
//! - `get-sources <spec> <whitelist> <url-filter>` writes
//!   `packages_parsed.<spec>.txt` and `packages_to_download.<spec>.txt`
//! - `merge-sources <manifest-1> <manifest-2>` writes `merge_to_download.txt`,
//!   preferring the first manifest's entries
//! - `fetch-sources <manifest>` downloads or clones every listed source into
//!   `<name>-<version>/`

// The tools print manifest lines, summaries and errors directly
#![allow(clippy::print_stdout, clippy::print_stderr)]

/// Argument parsing, exit codes and error rendering.
pub mod cli;
/// Tool implementations.
pub mod commands;
/// Tracing and logging configuration.
pub mod tracing;
