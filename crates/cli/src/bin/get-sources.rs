//! `get-sources` entry point.

use srcfetch::cli::{GetSourcesArgs, parse_or_exit, run_tool};
use srcfetch::commands::get;

fn main() {
    let args: GetSourcesArgs = parse_or_exit();
    let code = run_tool(&args.log, |out| get::run(&args, out));
    std::process::exit(code);
}
