use std::io;

use clap::{crate_authors, crate_description, crate_version, CommandFactory, Parser};
use clap_complete::generate;
use eyre::Result;
use tracing::trace;

use stm_common::init_logging;
use stm_sources::Sources;
use stmctl::{list_things, track_line, Config, Opts, SubCommand};

/// Binary name, using a different binary name
pub const NAME: &str = env!("CARGO_BIN_NAME");
/// Binary version
pub const VERSION: &str = crate_version!();
/// Authors
pub const AUTHORS: &str = crate_authors!();

#[tokio::main]
async fn main() -> Result<()> {
    let opts = Opts::parse();

    // Initialise logging.
    //
    init_logging(NAME, opts.tree, opts.log_dir.clone())?;

    // Config is optional, sources have an embedded default.
    //
    let cfg = Config::load(opts.config.as_deref())?;
    let sources = Sources::load(opts.sources.as_deref())?;

    // Banner
    //
    banner()?;

    handle_subcmd(&cfg, &sources, &opts.subcmd).await
}

pub async fn handle_subcmd(cfg: &Config, sources: &Sources, subcmd: &SubCommand) -> Result<()> {
    match subcmd {
        // Handle `track`
        //
        SubCommand::Track(topts) => {
            trace!("track");

            track_line(cfg, sources, topts).await?;
        }

        // Standalone completion generation
        //
        // NOTE: you can generate UNIX shells completion on Windows and vice-versa.  Not worth
        //       trying to limit depending on the OS.
        //
        SubCommand::Completion(copts) => {
            let generator = copts.shell;
            generate(generator, &mut Opts::command(), NAME, &mut io::stdout());
        }

        // Standalone `list` command
        //
        SubCommand::List(lopts) => {
            let str = list_things(cfg, sources, lopts.cmd)?;
            eprintln!("{}", str);
        }

        // Standalone `version` command
        //
        SubCommand::Version => {
            eprintln!("Modules: ");
            eprintln!("\t{}", stm_common::version());
            eprintln!("\t{}", stm_formats::version());
            eprintln!("\t{}", stm_sources::version());
            eprintln!("\t{}", stm_engine::version());
        }
    }
    Ok(())
}

/// Return our version number
///
#[inline]
pub fn version() -> String {
    format!("{}/{}", NAME, VERSION)
}

/// Display banner
///
fn banner() -> Result<()> {
    Ok(eprintln!(
        r##"
{} by {}
{}
"##,
        version(),
        AUTHORS,
        crate_description!()
    ))
}
