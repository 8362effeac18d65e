use std::fs;
use std::io::Read;
use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use intpack::FormatTag;
use intpack_cli::commands;
use intpack_cli::config::Settings;
use num_bigint::BigInt;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogOutputFormat {
    Json,
    Pretty,
}

/// Command line arguments for the intpack tool.
#[derive(Debug, Parser)]
#[clap(name = "intpack", about = "Pack integers into the narrowest fixed-width arrays")]
struct Args {
    /// Optional path to the configuration file. If not provided, defaults
    /// apply and may be overridden via `INTPACK_` environment variables.
    #[clap(short = 'c', long, required = false)]
    config: Option<PathBuf>,

    #[clap(short = 'o', long = "output-format", default_value = "pretty")]
    output_format: Option<LogOutputFormat>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the supported formats in selection order.
    Formats,

    /// Select the narrowest format holding every value in [min, max].
    Select {
        /// Inclusive lower bound; any integer.
        #[clap(long, allow_hyphen_values = true)]
        min: BigInt,
        /// Inclusive upper bound; any integer.
        #[clap(long, allow_hyphen_values = true)]
        max: BigInt,
    },

    /// Pack whitespace-separated integers into a container.
    Pack {
        /// Text file with the values. Reads stdin when omitted.
        #[clap(short, long)]
        input: Option<PathBuf>,
        /// Binary output file. Writes hex to stdout when omitted.
        #[clap(long)]
        output: Option<PathBuf>,
        /// Force this format code instead of selecting one.
        #[clap(short, long)]
        format: Option<FormatTag>,
    },

    /// Print the values stored in a container, one per line.
    Unpack {
        /// Binary container file. Reads hex from stdin when omitted.
        #[clap(short, long)]
        input: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load the configuration file and/or environment variables.
    let settings = Settings::new(args.config.as_ref())?;

    let pretty = matches!(args.output_format, Some(LogOutputFormat::Pretty));
    intpack_cli::logging::setup_logging(&settings.logging.directives, pretty);
    tracing::debug!(?settings, "loaded configuration");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Command::Formats => commands::formats(&mut out)?,
        Command::Select { min, max } => {
            commands::select(min, max, &mut out)?;
        }
        Command::Pack { input, output, format } => {
            let text = match input {
                Some(path) => fs::read_to_string(path)?,
                None => {
                    let mut text = String::new();
                    std::io::stdin().read_to_string(&mut text)?;
                    text
                }
            };

            let values = commands::parse_values(&text)?;
            let array = commands::pack(&values, format.or(settings.pack.default_format))?;

            match output {
                Some(path) => {
                    let mut file = fs::File::create(&path)?;
                    commands::write_container(&array, false, &mut file)?;
                    tracing::info!(path = %path.display(), "wrote container");
                }
                None => commands::write_container(&array, true, &mut out)?,
            }
        }
        Command::Unpack { input } => {
            let array = match input {
                Some(path) => commands::unpack(&fs::read(path)?, false, settings.pack.alloc_bytes_limit)?,
                None => {
                    let mut bytes = Vec::new();
                    std::io::stdin().read_to_end(&mut bytes)?;
                    commands::unpack(&bytes, true, settings.pack.alloc_bytes_limit)?
                }
            };
            commands::write_values(&array, &mut out)?;
        }
    }

    out.flush()?;

    Ok(())
}
