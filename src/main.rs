//! doxfill CLI - turn .docx documents into fillable templates

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use doxfill::template::{FsMetadataStore, TemplateLibrary};
use doxfill::{Config, Document, GenerateRequest, TemplateService};

#[derive(Parser)]
#[command(name = "doxfill")]
#[command(about = "Fill .docx templates from structured field values")]
#[command(version)]
struct Cli {
    /// Template store directory (overrides the configured one)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Log engine decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Store a .docx file as a template and print its fields
    Upload { file: PathBuf },
    /// Print the fields of a stored template
    Fields { template_id: String },
    /// List stored templates
    List,
    /// Fill a stored template and write the result
    Generate {
        template_id: String,
        /// Field values as a JSON object, or `-` to read it from stdin
        #[arg(long)]
        data: String,
        /// Where to write the document (defaults to the file name in the
        /// current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Suggested file name of the generated document
        #[arg(long)]
        filename: Option<String>,
    },
    /// Print the full analysis of a .docx file without storing it
    Analyze { file: PathBuf },
    /// Write a default config file
    InitConfig,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn read_payload(data: &str) -> Result<serde_json::Map<String, serde_json::Value>> {
    let text = if data == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read field values from stdin")?;
        buffer
    } else {
        data.to_string()
    };

    match serde_json::from_str::<serde_json::Value>(&text).context("Field values are not valid JSON")? {
        serde_json::Value::Object(map) => Ok(map),
        _ => bail!("Field values must be a JSON object"),
    }
}

fn file_name(path: &Path) -> Result<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("{} has no file name", path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = Config::load().context("Failed to load config")?;
    let (templates_dir, metadata_dir) = match &cli.store {
        Some(dir) => (
            dir.clone(),
            dir.join(doxfill::template::service::METADATA_DIR_NAME),
        ),
        None => (config.templates_dir.clone(), config.metadata_dir()),
    };
    let service = TemplateService::new(
        TemplateLibrary::new(templates_dir),
        FsMetadataStore::new(metadata_dir),
    );

    match cli.command {
        Command::Upload { file } => {
            let bytes =
                fs::read(&file).with_context(|| format!("Failed to read {}", file.display()))?;
            let uploaded = service.upload(&file_name(&file)?, &bytes)?;
            print_json(&uploaded)?;
        }
        Command::Fields { template_id } => {
            print_json(&service.fields(&template_id)?)?;
        }
        Command::List => {
            print_json(&serde_json::json!({ "templates": service.list()? }))?;
        }
        Command::Generate {
            template_id,
            data,
            output,
            filename,
        } => {
            let mut request = GenerateRequest::new(template_id, read_payload(&data)?);
            request.output_filename = filename.unwrap_or(config.output_filename);

            let generated = service.generate(&request)?;
            let path = output.unwrap_or_else(|| PathBuf::from(&generated.filename));
            fs::write(&path, &generated.bytes)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!(
                "Wrote {} ({}, {} bytes)",
                path.display(),
                generated.content_type,
                generated.bytes.len()
            );
        }
        Command::Analyze { file } => {
            let document = Document::open(&file)
                .with_context(|| format!("Failed to open {}", file.display()))?;
            print_json(&doxfill::template::analyze(&document))?;
        }
        Command::InitConfig => match Config::init_default()? {
            Some(path) => println!("Wrote default config to {}", path.display()),
            None => bail!("Could not determine a config directory"),
        },
    }

    Ok(())
}
