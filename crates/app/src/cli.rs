use anyhow::Result;

use crate::dashboard;

pub(crate) const USAGE: &str = "Usage: company-atlas <command>\n\n\
Commands:\n  \
serve [DATASET] [--dataset <path>] [--bind <addr>] [--port <n>] \
[--center-lat <deg>] [--center-lon <deg>] [--zoom <level>] \
[--session-ttl <secs>] [--verbose] [--chrome-trace <path>]\n  \
help    Print this message";

/// Dispatch a subcommand; returns `false` when nothing matched.
pub fn handle_commands(args: &[String]) -> Result<bool> {
    match args.get(1).map(|s| s.as_str()) {
        Some("serve") => {
            dashboard::run_from_args(args)?;
            Ok(true)
        }
        Some("help") | Some("--help") | Some("-h") => {
            println!("{USAGE}");
            Ok(true)
        }
        _ => Ok(false),
    }
}
