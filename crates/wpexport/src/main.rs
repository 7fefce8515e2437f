use crate::prelude::*;
use clap::Parser;

mod convert;
mod error;
mod inspect;
mod pipeline;
mod prelude;
mod summary;
mod xml;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Convert a WordPress export into Markdown documents, comment records, and CSV manifests"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Whether to display additional information.
    #[clap(long, env = "WPEXPORT_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Convert an export into documents, comment records, and CSV manifests
    Convert(crate::convert::ConvertOptions),

    /// Classify an export and report what a conversion would produce
    Inspect(crate::inspect::InspectOptions),
}

fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Convert(options) => crate::convert::run(options, app.global),
        SubCommands::Inspect(options) => crate::inspect::run(options, app.global),
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
