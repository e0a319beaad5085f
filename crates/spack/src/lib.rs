//! Spack queries for srcfetch.
//!
//! Runs `spack spec` to discover the resolved dependency tree of a spec,
//! `spack info` to find where each package's source lives, and filters the
//! result into a download manifest:
//!
//! ```ignore
//! use srcfetch_spack::{QueryConfig, SpackCli, run_query};
//!
//! let config = QueryConfig::from_files("hdf5@1.14%gcc", "whitelist.txt", "urls.txt", ".")?;
//! let report = run_query(&SpackCli::default(), &config, |record| println!("{record}"))?;
//! ```

mod error;
mod parse;
mod query;
mod resolver;

pub use error::{Error, Result};
pub use parse::{Ambiguity, LookupError, ParsedSpec, find_source_location, parse_spec_output};
pub use query::{
    QueryConfig, QueryOutputs, QueryReport, RESERVED_PREFIX, Selection, manifest_suffix, run_query,
    select, url_allowed,
};
pub use resolver::{Resolver, SpackCli};
