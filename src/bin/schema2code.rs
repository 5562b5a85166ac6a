//! schema2code CLI
//!
//! Generates target-language types from a JSON or YAML schema file.

use std::path::PathBuf;

use clap::Parser;
use schema2code::writer::{write_artifacts, WriteMode, WriteOptions};
use schema2code::{generate, GenerateOptions, Language, NamingConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schema2code")]
#[command(about = "Generate code types from JSON or YAML schema")]
struct Cli {
    /// Path to the JSON or YAML schema file
    schema_file: PathBuf,

    /// Target language for code generation
    #[arg(short, long, value_enum)]
    language: Language,

    /// Output file path; artifacts for referenced schemas land beside it
    #[arg(short, long)]
    output: PathBuf,

    /// Whether to create a new file or append to an existing one
    #[arg(long, value_enum, default_value = "create")]
    mode: WriteMode,

    /// Don't create output files that don't exist yet
    #[arg(long)]
    no_create: bool,

    /// Don't overwrite output files that already exist
    #[arg(long)]
    no_overwrite: bool,

    /// Go package name
    #[arg(long, default_value = "main")]
    package: String,

    /// C# namespace
    #[arg(long, default_value = "SchemaTypes")]
    namespace: String,

    /// Use dataclasses instead of pydantic for Python
    #[arg(long)]
    no_pydantic: bool,

    /// Keep a leading 'U' in schema filenames when deriving type names
    #[arg(long)]
    keep_u_prefix: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let options = GenerateOptions {
        language: cli.language,
        output: cli.output,
        package: cli.package,
        namespace: cli.namespace,
        use_pydantic: !cli.no_pydantic,
        naming: NamingConfig {
            strip_leading_u: !cli.keep_u_prefix,
        },
    };

    let artifacts = generate(&cli.schema_file, &options)?;
    let written = write_artifacts(
        &artifacts,
        &WriteOptions {
            mode: cli.mode,
            create_missing: !cli.no_create,
            overwrite: !cli.no_overwrite,
        },
    )?;

    println!(
        "Successfully generated {:?} types in {written} file(s)",
        options.language
    );
    Ok(())
}
