use clap::Parser;
use log::warn;
use std::ffi::OsString;

/// Command-line arguments shared by every sample program.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(version, about = "Connect to a remote target", long_about = None)]
pub struct Options {
    /// Username for authentication
    #[arg(short, long, allow_hyphen_values = true)]
    pub username: Option<String>,

    /// Password for authentication
    #[arg(short, long, allow_hyphen_values = true)]
    pub password: Option<String>,

    /// Remote endpoint, e.g. `ssh:host[:port]`, `tcp:host:port`, `local:` or a bare host
    pub target: String,

    /// Positional arguments after the target are accepted and ignored.
    #[arg(hide = true)]
    pub extra: Vec<String>,
}

/// Parse the process arguments, exiting with a usage error if the target is missing.
pub fn parse_args() -> Options {
    warn_on_extra(Options::parse())
}

/// Like [`parse_args`], over an explicit argument list (the first item is the program name).
pub fn parse_args_from<I, T>(args: I) -> Options
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    warn_on_extra(Options::parse_from(args))
}

fn warn_on_extra(options: Options) -> Options {
    if !options.extra.is_empty() {
        warn!(
            "Ignoring {} extra argument(s) after target '{}': {:?}",
            options.extra.len(),
            options.target,
            options.extra
        );
    }
    options
}
