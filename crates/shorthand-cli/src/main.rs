//! `shorthand` CLI — build JSON, YAML or TOML from shorthand arguments, and
//! render JSON back to shorthand.
//!
//! ## Usage
//!
//! ```sh
//! # Build pretty JSON from the trailing arguments
//! shorthand build foo.bar: 1, .baz: true, tags: a, b
//!
//! # Compact JSON, YAML or TOML
//! shorthand build --compact name: demo, ports[]: 80
//! shorthand build --format yaml image{repo: nginx, tag:~ 1.25}
//! shorthand build --format toml server{host: localhost, port: 8080}
//!
//! # Resolve `@file` values relative to a directory, or refuse them
//! shorthand build --base-dir ./fixtures body: @payload.json
//! shorthand build --no-files note: @not-a-file
//!
//! # Render JSON (stdin or file) as shorthand
//! echo '{"foo":{"bar":1}}' | shorthand render
//! shorthand render -i request.json -o request.txt
//! ```
//!
//! Set `RUST_LOG=debug` to see parse, build and file-load events on stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use shorthand::{Object, Options};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "shorthand",
    version,
    about = "Shorthand syntax for structured data on the command line"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build structured data from shorthand arguments
    Build {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Json)]
        format: Format,
        /// Print JSON on a single line
        #[arg(long)]
        compact: bool,
        /// Name used for the input in syntax errors
        #[arg(long, default_value = "args")]
        source_name: String,
        /// Directory that relative `@file` paths resolve against
        #[arg(long)]
        base_dir: Option<PathBuf>,
        /// Refuse to load `@file` values
        #[arg(long)]
        no_files: bool,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Shorthand text; multiple arguments are joined with a single space
        #[arg(required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
        shorthand: Vec<String>,
    },
    /// Render a JSON object as shorthand
    Render {
        /// Input JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Yaml,
    /// Fails on values TOML cannot hold, such as `null`
    Toml,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            format,
            compact,
            source_name,
            base_dir,
            no_files,
            output,
            shorthand,
        } => {
            let options = build_options(base_dir, no_files);
            let input = shorthand.join(" ");
            tracing::debug!(
                %source_name,
                args = shorthand.len(),
                ?format,
                allow_files = options.allow_files,
                "building shorthand arguments"
            );
            let object = shorthand::parse_and_build_with(&source_name, &input, &options)
                .context("Failed to build shorthand input")?;
            let text = marshal(&object, format, compact)?;
            write_output(output.as_deref(), &text)?;
        }
        Commands::Render { input, output } => {
            let json = read_input(input.as_deref())?;
            tracing::debug!(bytes = json.len(), "rendering JSON input");
            let value: serde_json::Value =
                serde_json::from_str(&json).context("Failed to parse input JSON")?;
            let object = match value {
                serde_json::Value::Object(map) => Object::from(map),
                other => anyhow::bail!(
                    "Input must be a JSON object, found {}",
                    shorthand::Value::from(other).kind()
                ),
            };
            let mut text = shorthand::render(&object);
            text.push('\n');
            write_output(output.as_deref(), &text)?;
        }
    }

    Ok(())
}

fn build_options(base_dir: Option<PathBuf>, no_files: bool) -> Options {
    let mut options = Options::default();
    if let Some(dir) = base_dir {
        options = options.with_base_dir(dir);
    }
    if no_files {
        options = options.without_files();
    }
    options
}

/// Serialize a built object in the requested format, always ending with a newline.
fn marshal(object: &Object, format: Format, compact: bool) -> Result<String> {
    let mut text = match format {
        Format::Json if compact => serde_json::to_string(object)?,
        Format::Json => serde_json::to_string_pretty(object)?,
        Format::Yaml => serde_yaml::to_string(object).context("Failed to encode YAML")?,
        Format::Toml => toml::to_string(object).context("Failed to encode TOML")?,
    };
    if !text.ends_with('\n') {
        text.push('\n');
    }
    Ok(text)
}

/// JSON text from `path`, or from stdin when no path is given.
fn read_input(path: Option<&Path>) -> Result<String> {
    let Some(path) = path else {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Cannot read JSON from stdin")?;
        return Ok(buf);
    };
    std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read JSON input {}", path.display()))
}

/// Write the finished document to `path`, or to stdout.
fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, content)
            .with_context(|| format!("Cannot write output {}", path.display())),
        None => io::stdout()
            .lock()
            .write_all(content.as_bytes())
            .context("Cannot write to stdout"),
    }
}
