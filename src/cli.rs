//! Minimal CLI: schema + inputs → (check | flatten)
use std::path::{Path as FsPath, PathBuf};
use clap::{Parser, Subcommand, Args};
use colored::Colorize;
use rayon::prelude::*;
use json_bind::{Config, Handlers, LogLevel, Path, Schema, SchemaFile};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// walk JSON documents against a declarative schema and report what bound where
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    /// threshold for the library's own diagnostics (RUST_LOG still filters the sink)
    #[arg(long, value_enum, default_value_t = LogLevel::Error, global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// check every input against the schema, one ok/FAIL line per input
    Check(CheckOut),
    /// print `path<TAB>value` for every scalar the schema binds
    Flatten(FlattenOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// schema document (JSON) describing the expected shape
    #[arg(long, short)]
    schema: PathBuf,

    /// JSON Pointer to select a subnode in each document (e.g. /data/items/0/payload)
    #[arg(long)]
    json_pointer: Option<String>,

    /// report schema errors as warnings and keep walking instead of stopping
    #[arg(long, default_value_t = false)]
    lenient: bool,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct CheckOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct FlattenOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output .tsv file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

/// Result of walking one input.
struct Outcome {
    source: PathBuf,
    result: anyhow::Result<Vec<String>>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn config(&self, log_level: LogLevel) -> Config {
        let config = Config::new().with_log_level(log_level);
        if !self.lenient {
            return config;
        }
        config.with_error_handler(|fault| {
            tracing::warn!(code = %fault.code, "{}", fault.message);
            Ok(())
        })
    }

    /// Walk every input in parallel; outcomes come back in input order.
    fn load_process(&self, log_level: LogLevel) -> anyhow::Result<Vec<Outcome>> {
        let schema_file = SchemaFile::load(&self.schema)?;
        let schema = schema_file.build(&binding_handlers())?;
        let config = self.config(log_level);
        let source_paths = resolve_file_path_patterns(&self.input)?;
        let outcomes = source_paths
            .into_par_iter()
            .map(|source| {
                let result = self.bind_one(&source, &schema, &config);
                Outcome { source, result }
            })
            .collect();
        Ok(outcomes)
    }

    fn bind_one(
        &self,
        source: &FsPath,
        schema: &Schema<'_, Vec<String>>,
        config: &Config,
    ) -> anyhow::Result<Vec<String>> {
        let document = json_bind::read_file(source, config)?;
        let selected = match self.json_pointer.as_deref() {
            None => &document,
            Some(pointer) => document.pointer(pointer).ok_or_else(|| {
                anyhow::anyhow!("JSON pointer {pointer} matches nothing in {}", source.display())
            })?,
        };
        let mut bindings = Vec::new();
        json_bind::walk(selected, schema, &mut bindings, config)?;
        Ok(bindings)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }
    /// `Ok(false)` when at least one input failed.
    pub fn run(&self) -> anyhow::Result<bool> {
        match &self.cmd {
            Command::Check(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(true)
                }

                let outcomes = target.input_settings.load_process(self.log_level)?;
                let mut all_ok = true;
                for outcome in &outcomes {
                    match &outcome.result {
                        Ok(bindings) => {
                            println!("{} {} ({} values)", "ok".green().bold(), outcome.source.display(), bindings.len());
                        }
                        Err(error) => {
                            all_ok = false;
                            println!("{} {}: {error:#}", "FAIL".red().bold(), outcome.source.display());
                        }
                    }
                }
                Ok(all_ok)
            }
            Command::Flatten(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(true)
                }

                let outcomes = target.input_settings.load_process(self.log_level)?;
                let mut all_ok = true;
                let mut out_src = String::new();
                for outcome in outcomes {
                    match outcome.result {
                        Ok(bindings) => {
                            for line in bindings {
                                out_src.push_str(&line);
                                out_src.push('\n');
                            }
                        }
                        Err(error) => {
                            all_ok = false;
                            eprintln!("{} {}: {error:#}", "FAIL".red().bold(), outcome.source.display());
                        }
                    }
                }

                if let Some(out) = target.out.as_ref() {
                    if let Some(parent) = out.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(out, &out_src)?;
                } else {
                    print!("{out_src}");
                }
                Ok(all_ok)
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn binding_handlers() -> Handlers<Vec<String>> {
    fn on_str(path: &Path<'_>, val: &str, out: &mut Vec<String>) {
        out.push(format!("{path}\t{val}"));
    }
    fn on_int(path: &Path<'_>, val: i64, out: &mut Vec<String>) {
        out.push(format!("{path}\t{val}"));
    }
    fn on_double(path: &Path<'_>, val: f64, out: &mut Vec<String>) {
        out.push(format!("{path}\t{val}"));
    }
    fn on_bool(path: &Path<'_>, val: bool, out: &mut Vec<String>) {
        out.push(format!("{path}\t{val}"));
    }
    fn on_null(path: &Path<'_>, out: &mut Vec<String>) {
        out.push(format!("{path}\tnull"));
    }
    Handlers {
        int: Some(on_int),
        string: Some(on_str),
        double: Some(on_double),
        boolean: Some(on_bool),
        null: Some(on_null),
    }
}

fn resolve_file_path_patterns<I>(patterns: I) -> anyhow::Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{' ))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let before = out.len();
            for entry in glob::glob(pattern)? {
                out.push(entry?);
            }
            if out.len() == before {
                // Pattern was explicitly a glob but matched nothing -> surface as an error
                anyhow::bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
