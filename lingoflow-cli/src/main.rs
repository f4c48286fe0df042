use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use lingoflow::CodecRegistry;
use lingoflow_cli::{
    Config,
    check::{CheckOptions, run_check_command},
    convert::{ConvertOptions, resolve_codec, run_convert_command},
    formats::print_formats,
    view::print_view,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file (defaults to ./lingoflow.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output on stderr (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    commands: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert localization files between formats.
    Convert {
        /// The input file to process
        #[arg(short, long)]
        input: String,
        /// The output file to write the results to
        #[arg(short, long)]
        output: String,
        /// Input format (inferred from the extension when omitted)
        #[arg(long)]
        from: Option<String>,
        /// Output format (inferred from the extension when omitted)
        #[arg(long)]
        to: Option<String>,
    },

    /// View localization files.
    View {
        /// The input file to view
        #[arg(short, long)]
        input: String,
        /// Input format (inferred from the extension when omitted)
        #[arg(long)]
        from: Option<String>,
        /// Print entries as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check whether a workflow transition is allowed.
    Check {
        /// Current state: draft, review or approved
        #[arg(long)]
        state: String,
        /// Requested action: submit, approve or reject
        #[arg(long)]
        action: String,
        /// Role of the acting user: admin, translator or reviewer
        #[arg(long)]
        role: String,
        /// User who created the translation
        #[arg(long)]
        author: String,
        /// User asking for the transition
        #[arg(long)]
        actor: String,
        /// Print the decision as JSON
        #[arg(long)]
        json: bool,
    },

    /// List supported formats.
    Formats,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = if verbose == 0 {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
    } else {
        EnvFilter::new(default)
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Args) -> Result<bool, String> {
    let config = Config::load(args.config.as_deref())?;

    match args.commands {
        Commands::Convert {
            input,
            output,
            from,
            to,
        } => {
            let options = ConvertOptions {
                input_format: from,
                output_format: to,
            };
            let count = run_convert_command(&input, &output, &options, &config)?;
            println!("✅ Converted {} entries: {} -> {}", count, input, output);
        }
        Commands::View { input, from, json } => {
            let registry = CodecRegistry::with_defaults();
            let path = Path::new(&input);
            let codec = resolve_codec(&registry, from.as_deref(), path)?;
            let entries = codec
                .read_from_with(path, &config.parse_options())
                .map_err(|e| format!("Failed to read {}: {}", input, e))?;
            print_view(&entries, json)?;
        }
        Commands::Check {
            state,
            action,
            role,
            author,
            actor,
            json,
        } => {
            let options = CheckOptions {
                state,
                action,
                role,
                author,
                actor,
            };
            return run_check_command(&options, json);
        }
        Commands::Formats => print_formats(),
    }
    Ok(true)
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
