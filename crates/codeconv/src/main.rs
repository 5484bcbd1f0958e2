use clap::{Parser, Subcommand};
use codeconv::config::{CallsConfig, ConvertConfig, OutputConfig};
use codeconv::convert;
use codeconv_lower::{CallArgs, LineEnding};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "codeconv", version)]
#[command(about = "Convert parsed C-like syntax trees into Python source")]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lower a JSON parse tree to Python
    #[command(alias = "c")]
    Convert {
        /// Parse tree produced by the parser (.json)
        input: PathBuf,

        /// Output file (`-` for stdout). Defaults to INPUT with a .py extension
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Spaces per nesting level
        #[arg(long)]
        indent: Option<usize>,

        /// Line separator: crlf or lf
        #[arg(long)]
        line_ending: Option<LineEnding>,

        /// Call arguments to keep: literals or expressions
        #[arg(long)]
        call_args: Option<CallArgs>,

        /// Leave empty bodies empty instead of emitting `pass`
        #[arg(long)]
        no_pass: bool,
    },

    /// Print the typed syntax tree as JSON
    Dump {
        /// Parse tree produced by the parser (.json)
        input: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Convert {
            input,
            output,
            indent,
            line_ending,
            call_args,
            no_pass,
        } => {
            let root = std::env::current_dir()?;
            let flags = ConvertConfig {
                output: OutputConfig {
                    indent_width: indent,
                    line_ending,
                    pass_empty_bodies: no_pass.then_some(false),
                },
                calls: CallsConfig {
                    arguments: call_args,
                },
            };
            let options = ConvertConfig::load(&root).merge(flags).to_options();
            convert::convert_file(&input, output.as_deref(), options)?;
        }
        Commands::Dump { input } => {
            println!("{}", convert::dump_tree(&input)?);
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}
