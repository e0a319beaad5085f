//! `fetch-sources` entry point.

use srcfetch::cli::{FetchSourcesArgs, parse_or_exit, run_tool};
use srcfetch::commands::fetch;

fn main() {
    let args: FetchSourcesArgs = parse_or_exit();
    let code = run_tool(&args.log, |out| fetch::run(&args, out));
    std::process::exit(code);
}
