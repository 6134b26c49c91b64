//! csvshape CLI - reshape CSV files with a declarative column mapping
//!
//! # Commands
//!
//! ```bash
//! csvshape transform mapping.json input.csv output.csv   # Run the mapping
//! csvshape check mapping.json --source input.csv         # Check a mapping
//! csvshape example-schema                                # Print an example mapping
//! csvshape types                                         # Describe the data types
//! ```
//!
//! Settings may also come from the environment (or a `.env` file):
//! `CSVSHAPE_DELIMITER`, `CSVSHAPE_ENCODING`, `CSVSHAPE_LOG_FORMAT`.

use clap::{Args, Parser, Subcommand};
use csvshape::logging::{init_logging, LogConfig, LogFormat};
use csvshape::{
    data_types_description, example_schema, load_schema, Schema, SourceEncoding, SourceReader,
    TracingSink, TransformOptions, TransformPipeline,
};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

type CliResult<T> = Result<T, Box<dyn Error>>;

#[derive(Parser)]
#[command(name = "csvshape", version)]
#[command(about = "Reshape CSV files with a declarative column mapping", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log output format: pretty, compact or json
    #[arg(long, env = "CSVSHAPE_LOG_FORMAT", default_value = "pretty", global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by commands that read a source file
#[derive(Args)]
struct SourceArgs {
    /// Source field delimiter
    #[arg(short, long, env = "CSVSHAPE_DELIMITER", default_value = ",")]
    delimiter: char,

    /// Source encoding: utf-8, windows-1252, iso-8859-1 or auto
    #[arg(short, long, env = "CSVSHAPE_ENCODING", default_value = "utf-8")]
    encoding: SourceEncoding,
}

#[derive(Subcommand)]
enum Commands {
    /// Transform a source CSV into a destination CSV
    Transform {
        /// Mapping document (JSON)
        schema: PathBuf,

        /// Source CSV file
        source: PathBuf,

        /// Destination CSV file (created or truncated)
        destination: PathBuf,

        #[command(flatten)]
        source_args: SourceArgs,

        /// Destination delimiter (defaults to the source delimiter)
        #[arg(long)]
        output_delimiter: Option<char>,

        /// Only flush the destination when the run ends
        #[arg(long)]
        no_flush: bool,

        /// Exit with status 2 when any row was rejected
        #[arg(long)]
        fail_on_invalid: bool,
    },

    /// Load a mapping document and list its columns
    Check {
        /// Mapping document (JSON)
        schema: PathBuf,

        /// Also check that this source's header provides every source column
        #[arg(long)]
        source: Option<PathBuf>,

        #[command(flatten)]
        source_args: SourceArgs,
    },

    /// Show an example mapping document
    ExampleSchema,

    /// Show the available target data types
    Types,
}

fn main() -> ExitCode {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = LogConfig::from_verbosity(cli.verbose).with_format(cli.log_format);
    if let Err(e) = init_logging(&config) {
        eprintln!("Warning: logging unavailable: {}", e);
    }

    let result = match cli.command {
        Commands::Transform {
            schema,
            source,
            destination,
            source_args,
            output_delimiter,
            no_flush,
            fail_on_invalid,
        } => cmd_transform(
            &schema,
            &source,
            &destination,
            &source_args,
            output_delimiter,
            no_flush,
            fail_on_invalid,
        ),

        Commands::Check {
            schema,
            source,
            source_args,
        } => cmd_check(&schema, source.as_deref(), &source_args).map(|()| ExitCode::SUCCESS),

        Commands::ExampleSchema => cmd_example_schema().map(|()| ExitCode::SUCCESS),

        Commands::Types => {
            println!("{}", data_types_description());
            Ok(ExitCode::SUCCESS)
        }
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            report_error(e.as_ref());
            ExitCode::from(1)
        }
    }
}

/// Print an error followed by its cause chain
fn report_error(error: &dyn Error) {
    eprintln!("Error: {}", error);
    let mut cause = error.source();
    while let Some(inner) = cause {
        eprintln!("  caused by: {}", inner);
        cause = inner.source();
    }
}

fn delimiter_byte(delimiter: char) -> CliResult<u8> {
    if delimiter.is_ascii() {
        Ok(delimiter as u8)
    } else {
        Err(format!("Delimiter must be a single ASCII character, got '{}'", delimiter).into())
    }
}

fn format_delimiter(d: u8) -> String {
    match d {
        b'\t' => "\\t".to_string(),
        c => (c as char).to_string(),
    }
}

fn cmd_transform(
    schema_path: &Path,
    source: &Path,
    destination: &Path,
    source_args: &SourceArgs,
    output_delimiter: Option<char>,
    no_flush: bool,
    fail_on_invalid: bool,
) -> CliResult<ExitCode> {
    let options = TransformOptions {
        delimiter: delimiter_byte(source_args.delimiter)?,
        output_delimiter: output_delimiter.map(delimiter_byte).transpose()?,
        encoding: source_args.encoding,
        flush_each_row: !no_flush,
    };

    info!(
        schema = %schema_path.display(),
        delimiter = %format_delimiter(options.delimiter),
        encoding = %options.encoding,
        "Starting transform"
    );

    let pipeline = TransformPipeline::from_schema_file(schema_path, options)?;
    let summary = pipeline.run(source, destination, &mut TracingSink)?;

    eprintln!(
        "Rows read: {}, written: {}, rejected: {} ({} problems)",
        summary.rows_read, summary.rows_written, summary.rows_rejected, summary.problems
    );
    eprintln!("Output written to: {}", destination.display());

    if fail_on_invalid && summary.rows_rejected > 0 {
        return Ok(ExitCode::from(2));
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_check(schema_path: &Path, source: Option<&Path>, source_args: &SourceArgs) -> CliResult<()> {
    let schema = load_schema(schema_path)?;
    print_columns(&schema);

    if let Some(source) = source {
        let reader = SourceReader::open(
            source,
            delimiter_byte(source_args.delimiter)?,
            source_args.encoding,
        )?;
        schema.validate_headers(reader.headers())?;
        println!(
            "\nSource header of {} provides every source column ({} fields)",
            source.display(),
            reader.headers().len()
        );
    }

    Ok(())
}

fn print_columns(schema: &Schema) {
    println!("Schema: {} columns\n", schema.len());
    for column in schema.columns() {
        let spec = column.spec();
        let sources = if spec.uses_default() {
            format!(
                "default {:?}",
                spec.default_value.as_deref().unwrap_or_default()
            )
        } else {
            spec.source_columns.join(" + ")
        };
        print!("  {} ({}) <- {}", spec.target_column, spec.target_data_type, sources);
        if let Some(ref separator) = spec.separator {
            print!(" [separator {:?}]", separator);
        }
        if let Some(ref pattern) = spec.pattern {
            print!(" [pattern {}]", pattern);
        }
        println!();
    }
}

fn cmd_example_schema() -> CliResult<()> {
    let document = example_schema();
    println!("{}", document.to_json()?);
    Ok(())
}
