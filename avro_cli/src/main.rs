use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod generate;

#[derive(Parser)]
#[command(name = "avrocc")]
#[command(about = "Generate schema-specific Rust types from Avro schema files")]
#[command(version)]
struct Cli {
    /// Directory the generated files are written to
    #[arg(short = 'O', long = "output-path", value_name = "DIR", default_value = ".")]
    output_path: PathBuf,

    /// Prefix for generated file names; the schema's type name is appended
    #[arg(
        short = 'f',
        long = "filename-prefix",
        value_name = "PREFIX",
        default_value = "avro-specific-"
    )]
    filename_prefix: String,

    /// Prefix for generated type names
    #[arg(
        short = 't',
        long = "type-prefix",
        value_name = "PREFIX",
        default_value = "avro_specific"
    )]
    type_prefix: String,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// Schema files (JSON, or YAML for .yaml/.yml)
    #[arg(value_name = "SCHEMA", required = true)]
    files: Vec<PathBuf>,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let options = generate::Options {
        output_path: cli.output_path,
        filename_prefix: cli.filename_prefix,
        type_prefix: cli.type_prefix,
        verbose: cli.verbose,
    };

    match generate::run(&cli.files, &options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}
