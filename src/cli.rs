use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "client-launcher",
    version,
    about = "Opens the right local client for a remote connection request",
    after_help = "\
COMMANDS:
  Connect:   launch, resolve
  Registry:  profiles
  System:    status, version

A connection request is JSON (protocol, host, port, username, name, value,
dbname, command, token) given with --descriptor, or the same JSON base64
encoded in a client-launcher:// URL given with --url."
)]
pub struct Cli {
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Application registry (defaults to the per-user config.json)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Launch the configured client for a connection
    Launch(SourceArgs),
    /// Show what launch would run, without running it
    Resolve(SourceArgs),
    /// List configured applications for this platform
    Profiles(ProfilesArgs),
    Status,
    Version,
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Launch(_) => "launch",
            Self::Resolve(_) => "resolve",
            Self::Profiles(_) => "profiles",
            Self::Status => "status",
            Self::Version => "version",
        }
    }
}

#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("source").required(true).args(["descriptor", "url"])))]
pub struct SourceArgs {
    /// Connection descriptor JSON, or `-` to read it from stdin
    #[arg(long, value_name = "JSON")]
    pub descriptor: Option<String>,
    /// client-launcher://<base64 json> URL
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,
}

#[derive(Parser, Debug)]
pub struct ProfilesArgs {
    #[arg(long)]
    pub protocol: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_takes_no_flags() {
        let cli = Cli::try_parse_from(["client-launcher", "version"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Version)));
        assert!(Cli::try_parse_from(["client-launcher", "version", "--json"]).is_err());
    }

    #[test]
    fn launch_needs_a_descriptor_or_url() {
        assert!(Cli::try_parse_from(["client-launcher", "launch"]).is_err());
        assert!(Cli::try_parse_from(["client-launcher", "launch", "--url", "x", "--descriptor", "{}"]).is_err());
    }
}
