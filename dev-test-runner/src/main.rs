//! Runs every `fixtures/*.json` case through parse → (flatten) → Arrow and
//! back, printing one line per fixture.
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, anyhow, bail};
use colored::Colorize;
use serde::Deserialize;
use serde_json::Value;

use schemamap::arrow_schema::Schema;
use schemamap::{FlattenOptions, columnar, flatten, parse, path_de};

// ———— TYPES ————

#[derive(Debug, Deserialize)]
struct Fixture {
    #[serde(default)]
    description: Option<String>,
    schema: Value,
    #[serde(default)]
    flatten: Option<FlattenOptions>,
    #[serde(flatten)]
    expect: Expect,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Expect {
    /// Top-level Arrow fields, in order.
    Fields(Vec<ExpectedField>),
    /// Substring of the error message.
    Error(String),
}

#[derive(Debug, Deserialize)]
struct ExpectedField {
    name: String,
    nullable: bool,
}

// ———— RUNNER ————

fn run_fixture(fixture: &Fixture) -> Result<()> {
    let outcome = convert(fixture);
    match (&fixture.expect, outcome) {
        (Expect::Error(needle), Err(error)) => {
            let message = error.to_string();
            if !message.contains(needle.as_str()) {
                bail!("expected error containing {needle:?}, got {message:?}");
            }
            Ok(())
        }
        (Expect::Error(needle), Ok(_)) => bail!("expected error containing {needle:?}, got success"),
        (Expect::Fields(_), Err(error)) => Err(error),
        (Expect::Fields(expected), Ok(schema)) => {
            let actual: Vec<(&str, bool)> = schema
                .fields()
                .iter()
                .map(|f| (f.name().as_str(), f.is_nullable()))
                .collect();
            let wanted: Vec<(&str, bool)> = expected
                .iter()
                .map(|f| (f.name.as_str(), f.nullable))
                .collect();
            if actual != wanted {
                bail!("field mismatch\n  expected: {wanted:?}\n  actual:   {actual:?}");
            }
            // Arrow → JSON Schema → Arrow must be stable.
            let back = columnar::to_descriptive(&schema)?;
            let again = columnar::to_columnar(&back)?;
            if again != schema {
                bail!("arrow schema changed after a round trip through JSON Schema");
            }
            Ok(())
        }
    }
}

fn convert(fixture: &Fixture) -> Result<Schema> {
    let mut ty = parse::parse(&fixture.schema)?;
    if let Some(options) = &fixture.flatten {
        ty = flatten::flatten_with(&ty, options)?;
    }
    Ok(columnar::to_columnar(&ty)?)
}

fn load_fixture(path: &Path) -> Result<Fixture> {
    let source = std::fs::read_to_string(path)?;
    path_de::from_str_with_path(&source)
}

fn fixture_paths() -> Result<Vec<PathBuf>> {
    let patterns: Vec<String> = match std::env::args().skip(1).collect::<Vec<_>>() {
        args if !args.is_empty() => args,
        _ => vec![format!("{}/../fixtures/*.json", env!("CARGO_MANIFEST_DIR"))],
    };
    let mut paths = Vec::new();
    for pattern in &patterns {
        for entry in glob::glob(pattern)? {
            paths.push(entry?);
        }
    }
    if paths.is_empty() {
        return Err(anyhow!("no fixtures matched {patterns:?}"));
    }
    paths.sort();
    Ok(paths)
}

fn main() -> ExitCode {
    let paths = match fixture_paths() {
        Ok(paths) => paths,
        Err(error) => {
            eprintln!("{} {error:#}", "error:".red().bold());
            return ExitCode::FAILURE;
        }
    };

    let mut failed = 0usize;
    for path in &paths {
        let name = path.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();
        let result = load_fixture(path)
            .with_context(|| format!("failed to load {}", path.display()))
            .and_then(|fixture| {
                run_fixture(&fixture).with_context(|| {
                    fixture.description.clone().unwrap_or_else(|| "fixture failed".to_string())
                })
            });
        match result {
            Ok(()) => eprintln!("{} {name}", "✅ pass".green()),
            Err(error) => {
                failed += 1;
                eprintln!("{} {name}: {error:#}", "❌ fail".red().bold());
            }
        }
    }

    let summary = format!("{} passed, {failed} failed", paths.len() - failed);
    if failed == 0 {
        eprintln!("{}", summary.green().bold());
        ExitCode::SUCCESS
    } else {
        eprintln!("{}", summary.red().bold());
        ExitCode::FAILURE
    }
}
