//! `merge-sources` entry point.

use srcfetch::cli::{MergeSourcesArgs, parse_or_exit, run_tool};
use srcfetch::commands::merge;

fn main() {
    let args: MergeSourcesArgs = parse_or_exit();
    let code = run_tool(&args.log, |out| merge::run(&args, out));
    std::process::exit(code);
}
