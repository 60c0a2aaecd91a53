//! Minimal CLI: JSON Schema ⇄ Arrow schema, plus flattening.
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use arrow_schema::Schema;
use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;
use serde_json::Value;
use tracing::info;

use schemamap::{columnar, emit, flatten, parse, path_de, FlattenOptions};

use crate::logging::{self, LogFormat};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// convert schema descriptions between JSON Schema and Apache Arrow
#[derive(Parser, Debug)]
#[command(version)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,

    /// log level when RUST_LOG is unset (e.g. `debug`, `schemamap=trace`)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// convert JSON Schema documents to Arrow schemas (JSON)
    Arrow(ArrowOut),
    /// flatten nested object properties of JSON Schema documents
    Flatten(FlattenOut),
    /// convert Arrow schemas (JSON) to JSON Schema documents
    JsonSchema(JsonSchemaOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// JSON Pointer to select a subnode in each document (e.g. /definitions/Person)
    #[arg(long)]
    json_pointer: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(Args, Debug, Clone)]
struct FlattenSettings {
    /// nesting levels to collapse (0 disables flattening)
    #[arg(long, default_value_t = schemamap::flatten::DEFAULT_MAX_DEPTH, allow_negative_numbers = true)]
    max_depth: i32,

    /// joins parent and child property names
    #[arg(long, default_value = schemamap::flatten::DEFAULT_SEPARATOR)]
    separator: String,
}

#[derive(clap::Parser, Debug)]
struct ArrowOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// flatten nested objects before converting
    #[arg(long)]
    flatten: bool,

    #[command(flatten)]
    flatten_settings: FlattenSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct FlattenOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    flatten_settings: FlattenSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct JsonSchemaOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl FlattenSettings {
    fn options(&self) -> FlattenOptions {
        FlattenOptions {
            max_depth: self.max_depth,
            separator: self.separator.clone(),
        }
    }
}

impl InputSettings {
    /// Read every input (in parallel) and map it through `apply`.
    /// Results keep input order.
    fn load_process<F>(&self, apply: F) -> Result<Vec<(String, Value)>>
    where
        F: Fn(Value) -> Result<Value> + Sync,
    {
        let source_paths = resolve_file_path_patterns(&self.input)?;
        source_paths
            .par_iter()
            .map(|source_path| {
                let source_path_str = source_path.to_string_lossy().to_string();
                let document = self
                    .load_document(source_path)
                    .with_context(|| format!("failed to load {source_path_str}"))?;
                let output = apply(document)
                    .with_context(|| format!("failed to convert {source_path_str}"))?;
                Ok((source_path_str, output))
            })
            .collect()
    }

    fn load_document(&self, source_path: &Path) -> Result<Value> {
        let source = std::fs::read_to_string(source_path)?;
        let json_value = serde_json::from_str::<Value>(&source)?;
        match self.json_pointer.as_deref() {
            None => Ok(json_value),
            Some(pointer) => json_value
                .pointer(pointer)
                .cloned()
                .ok_or_else(|| anyhow!("JSON pointer {pointer} selects nothing")),
        }
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<()> {
        logging::init(&self.log_level, self.log_format)?;
        match &self.cmd {
            Command::Arrow(target) => {
                let options = target.flatten.then(|| target.flatten_settings.options());
                let outputs = target.input_settings.load_process(|document| {
                    let mut ty = parse::parse(&document)?;
                    if let Some(options) = &options {
                        ty = flatten::flatten_with(&ty, options)?;
                    }
                    let schema = columnar::to_columnar(&ty)?;
                    Ok(serde_json::to_value(&schema)?)
                })?;
                write_outputs(outputs, target.out.as_deref())
            }
            Command::Flatten(target) => {
                let options = target.flatten_settings.options();
                let outputs = target.input_settings.load_process(|document| {
                    let ty = parse::parse(&document)?;
                    Ok(emit::to_json(&flatten::flatten_with(&ty, &options)?))
                })?;
                write_outputs(outputs, target.out.as_deref())
            }
            Command::JsonSchema(target) => {
                let outputs = target.input_settings.load_process(|document| {
                    let schema: Schema = path_de::from_value_with_path(document)?;
                    Ok(emit::to_json(&columnar::to_descriptive(&schema)?))
                })?;
                write_outputs(outputs, target.out.as_deref())
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

/// One input prints its result as-is; several print an object keyed by path.
fn write_outputs(outputs: Vec<(String, Value)>, out: Option<&Path>) -> Result<()> {
    let count = outputs.len();
    let value = if count == 1 {
        outputs.into_iter().next().map(|(_, v)| v).unwrap_or(Value::Null)
    } else {
        Value::Object(outputs.into_iter().collect())
    };
    let rendered = serde_json::to_string_pretty(&value)?;
    match out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(out, &rendered)
                .with_context(|| format!("failed to write {}", out.display()))?;
            info!(inputs = count, out = %out.display(), "wrote output");
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                return Err(anyhow!("glob pattern matched no files: {pattern}"));
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
