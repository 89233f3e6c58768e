use clap::{Parser, Subcommand};

pub const NAME: &str = "amazon-pa-api-proxy";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Product Advertising API item lookup proxy.
///
/// All settings come from `APAP_*` environment variables.
#[derive(Debug, Parser)]
#[command(name = NAME, disable_version_flag = true)]
pub struct Cli {
    /// Print the version and exit
    #[arg(short = 'V', long = "version")]
    pub version: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the version and exit
    Version,
}

impl Cli {
    pub fn wants_version(&self) -> bool {
        self.version || matches!(self.command, Some(Command::Version))
    }
}

pub fn version_line() -> String {
    format!("{NAME} version {VERSION}")
}
