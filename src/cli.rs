//! Minimal CLI: declarations → (plan | explain)
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::Value;
use tracing::info;

use crate::error::{ClonegenError, ClonegenResult};
use crate::ir::{Capabilities, TypeDeclaration};
use crate::options::PlannerOptions;
use crate::report::PlanReport;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// build clone plans from type declarations and output them as JSON or as a readable explanation
#[derive(Parser, Debug)]
#[command(name = "clonegen")]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// build plans and print the JSON report
    Plan(PlanOut),
    /// build plans and print a per-member explanation
    Explain(ExplainOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (NDJSON)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// JSON Pointer to select a subnode in each document (e.g. /compilation/types)
    #[arg(long)]
    json_pointer: Option<String>,

    /// JQ pre-process filter for each document.
    #[arg(long)]
    jq_expr: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(Args, Debug, Clone)]
struct PlanSettings {
    /// which clone methods to plan
    #[arg(long, value_enum, default_value_t = CapabilityArg::Both)]
    capability: CapabilityArg,

    /// emit rank >= 2 array duplicates as statements instead of inline expressions
    #[arg(long, default_value_t = false)]
    multi_rank_arrays_as_statements: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum CapabilityArg {
    Deep,
    Shallow,
    Both,
}

#[derive(clap::Parser, Debug)]
struct PlanOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    plan_settings: PlanSettings,

    /// single-line JSON
    #[arg(long, default_value_t = false)]
    compact: bool,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct ExplainOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    plan_settings: PlanSettings,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load_declarations(&self) -> ClonegenResult<Vec<TypeDeclaration>> {
        let mut decls = Vec::new();
        for source_path in resolve_file_path_patterns(&self.input)? {
            let origin = source_path.to_string_lossy().to_string();
            info!(path = %origin, "reading declarations");
            let source = std::fs::read_to_string(&source_path).map_err(|source| ClonegenError::Io {
                path: source_path.clone(),
                source,
            })?;
            for document in self.split_documents(&source, &origin)? {
                for selected in self.select(document, &origin)? {
                    decls.extend(crate::decode::decode_declarations(selected, &origin)?);
                }
            }
        }
        Ok(decls)
    }

    fn split_documents(&self, source: &str, origin: &str) -> ClonegenResult<Vec<Value>> {
        let parse = |text: &str, origin: String| {
            serde_json::from_str::<Value>(text).map_err(|source| ClonegenError::Json { origin, source })
        };
        if !self.ndjson {
            return Ok(vec![parse(source, origin.to_string())?]);
        }
        source
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| parse(line, format!("{origin}:{}", index + 1)))
            .collect()
    }

    /// Apply the JSON pointer, then the jq filter.
    fn select(&self, document: Value, origin: &str) -> ClonegenResult<Vec<Value>> {
        let document = match self.json_pointer.as_deref() {
            None => document,
            Some(pointer) => document
                .pointer(pointer)
                .cloned()
                .ok_or_else(|| ClonegenError::PointerMiss {
                    pointer: pointer.to_string(),
                    origin: origin.to_string(),
                })?,
        };
        match self.jq_expr.as_deref() {
            None => Ok(vec![document]),
            Some(jq_expr) => crate::jq_exec::run_jaq(jq_expr, &document).map_err(|error| ClonegenError::Jq {
                origin: origin.to_string(),
                message: format!("{error:#}"),
            }),
        }
    }
}

impl PlanSettings {
    fn options(&self) -> PlannerOptions {
        let requested = match self.capability {
            CapabilityArg::Deep => Capabilities { deep: true, shallow: false },
            CapabilityArg::Shallow => Capabilities { deep: false, shallow: true },
            CapabilityArg::Both => Capabilities::BOTH,
        };
        PlannerOptions {
            requested,
            inline_multi_rank_arrays: !self.multi_rank_arrays_as_statements,
        }
    }

    fn build_report(&self, input: &InputSettings) -> anyhow::Result<PlanReport> {
        let decls = input.load_declarations()?;
        let options = self.options();
        let report = PlanReport::new(crate::plan::plan_all(&decls, &options));
        info!(types = decls.len(), plans = report.planned_count(), "planning done");
        Ok(report)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }
    pub fn run(&self) -> anyhow::Result<()> {
        match &self.cmd {
            Command::Plan(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(())
                }
                let report = target.plan_settings.build_report(&target.input_settings)?;
                let report_src = report.to_json(target.compact)?;
                match target.out.as_ref() {
                    Some(out) => write_output(out, &report_src)?,
                    None => println!("{report_src}"),
                }
            }
            Command::Explain(target) => {
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(())
                }
                let report = target.plan_settings.build_report(&target.input_settings)?;
                print!("{}", crate::report::explain(&report));
            }
        }
        Ok(())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn write_output(out: &Path, contents: &str) -> anyhow::Result<()> {
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    std::fs::write(out, contents).with_context(|| format!("writing {}", out.display()))
}

fn resolve_file_path_patterns<I>(patterns: I) -> ClonegenResult<Vec<PathBuf>>
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
        let pattern_error = |message: String| ClonegenError::InputPattern {
            pattern: pattern.to_string(),
            message,
        };

        if !has_glob_chars(pattern) {
            out.push(PathBuf::from(pattern));
            continue;
        }

        let mut matched_any = false;
        for entry in glob::glob(pattern).map_err(|e| pattern_error(e.to_string()))? {
            out.push(entry.map_err(|e| pattern_error(e.to_string()))?);
            matched_any = true;
        }
        if !matched_any {
            // Pattern was explicitly a glob but matched nothing -> surface as an error
            return Err(pattern_error("glob pattern matched no files".to_string()));
        }
    }

    Ok(out)
}
