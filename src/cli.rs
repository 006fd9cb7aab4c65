//! Minimal CLI: clause + documents → (compare | filter | full-match)
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use serde_json::{json, Value};

use json_clause::{with_full_match, FindingValue, Matcher, Verdict};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// match JSON documents against a declarative query clause (field names + regex leaves)
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    /// log matcher decisions (overrides the RUST_LOG default of `warn`)
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// print the verdict and every finding for each document
    Compare(CompareOut),
    /// print documents with at least one matching leaf (full or partial matches)
    Filter(FilterOut),
    /// print only documents where every leaf matched
    FullMatch(FullMatchOut),
}

#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
struct ClauseSettings {
    /// file holding the query clause
    #[arg(long)]
    clause: Option<PathBuf>,

    /// the query clause as inline JSON text
    #[arg(long)]
    clause_json: Option<String>,
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (NDJSON)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// JSON Pointer to select a subnode in each document (e.g. /data/items/0/payload)
    #[arg(long)]
    json_pointer: Option<String>,

    /// JQ pre-process filter for each document.
    #[arg(long)]
    jq_expr: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct CompareOut {
    #[command(flatten)]
    clause_settings: ClauseSettings,

    #[command(flatten)]
    input_settings: InputSettings,

    /// emit machine-readable JSON instead of text
    #[arg(long, default_value_t = false)]
    json: bool,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct FilterOut {
    #[command(flatten)]
    clause_settings: ClauseSettings,

    #[command(flatten)]
    input_settings: InputSettings,

    /// compare documents on all cores; output order is unchanged
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct FullMatchOut {
    #[command(flatten)]
    clause_settings: ClauseSettings,

    #[command(flatten)]
    input_settings: InputSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl ClauseSettings {
    fn load(&self) -> Result<Value> {
        match (&self.clause, &self.clause_json) {
            (Some(path), _) => {
                let source = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read clause file {}", path.display()))?;
                json_clause::path_de::from_str_with_path(&source, &path.to_string_lossy())
            }
            (None, Some(text)) => json_clause::path_de::from_str_with_path(text, "--clause-json"),
            (None, None) => bail!("one of --clause or --clause-json is required"),
        }
    }
    fn matcher(&self) -> Result<Matcher> {
        Matcher::new(&self.load()?).context("failed to compile query clause")
    }
}

impl InputSettings {
    fn load_documents(&self) -> Result<Vec<Value>> {
        let source_paths = resolve_file_path_patterns(&self.input)
            .map_err(|error| anyhow!("failed to resolve input file paths: {error}"))?;
        let mut documents = Vec::new();
        for source_path in source_paths {
            let source_path_str = source_path.to_string_lossy().to_string();
            let source = std::fs::read_to_string(&source_path)
                .with_context(|| format!("failed to read source file {source_path_str}"))?;
            let parsed = if self.ndjson {
                json_clause::path_de::ndjson_with_path::<Value>(&source, &source_path_str)?
            } else {
                vec![json_clause::path_de::from_str_with_path::<Value>(&source, &source_path_str)?]
            };
            for json_value in parsed {
                let json_value = match self.json_pointer.as_deref() {
                    None => json_value,
                    Some(pointer) => json_value.pointer(pointer).cloned().ok_or_else(|| {
                        anyhow!("JSON pointer {pointer} not found in {source_path_str}")
                    })?,
                };
                match self.jq_expr.as_ref() {
                    None => documents.push(json_value),
                    Some(jq_expr) => {
                        let outputs = json_clause::jq_exec::run_jaq(jq_expr, &json_value)
                            .with_context(|| {
                                format!("failed to apply jq expression to source file ({source_path_str})")
                            })?;
                        documents.extend(outputs);
                    }
                }
            }
        }
        log::info!("loaded {} document(s)", documents.len());
        Ok(documents)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }
    pub fn run(&self) -> Result<()> {
        let default_level = if self.verbose { "debug" } else { "warn" };
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
            .init();

        match &self.cmd {
            Command::Compare(target) => {
                let matcher = target.clause_settings.matcher()?;
                let documents = target.input_settings.load_documents()?;
                let rendered = if target.json {
                    let mut reports = Vec::with_capacity(documents.len());
                    for (ix, document) in documents.iter().enumerate() {
                        let results = matcher
                            .compare_verbose(document)
                            .with_context(|| format!("document #{ix}"))?;
                        reports.push(json!({
                            "index": ix,
                            "verdict": json_clause::overall_result(&results),
                            "results": results,
                        }));
                    }
                    serde_json::to_string_pretty(&reports)?
                } else {
                    let mut text = String::new();
                    for (ix, document) in documents.iter().enumerate() {
                        let results = matcher
                            .compare_verbose(document)
                            .with_context(|| format!("document #{ix}"))?;
                        let verdict = json_clause::overall_result(&results);
                        text.push_str(&format!("#{ix} {}\n", paint_verdict(verdict)));
                        for finding in results.iter() {
                            let line = match finding.value {
                                FindingValue::Matched(value) => {
                                    format!("  {} {} = {value}", "✓".green(), finding.path)
                                }
                                FindingValue::KeyMissing => format!(
                                    "  {} {} {}",
                                    "✗".red(),
                                    finding.path,
                                    FindingValue::KEY_MISSING
                                ),
                                FindingValue::ValueMismatch => format!(
                                    "  {} {} {}",
                                    "✗".red(),
                                    finding.path,
                                    FindingValue::VALUE_MISMATCH
                                ),
                            };
                            text.push_str(&line);
                            text.push('\n');
                        }
                    }
                    text
                };
                write_output(target.out.as_ref(), &rendered)
            }
            Command::Filter(target) => {
                let matcher = target.clause_settings.matcher()?;
                let documents = target.input_settings.load_documents()?;
                let kept = if target.parallel {
                    matcher.par_list_of_compares(&documents)?
                } else {
                    matcher.list_of_compares(&documents)?
                };
                write_output(target.out.as_ref(), &serde_json::to_string_pretty(&kept)?)
            }
            Command::FullMatch(target) => {
                let clause = target.clause_settings.load()?;
                let documents = target.input_settings.load_documents()?;
                let kept = with_full_match(&clause, |is_full_match| {
                    let mut kept = Vec::new();
                    for document in &documents {
                        if let Some(document) = is_full_match(document)? {
                            kept.push(document.clone());
                        }
                    }
                    Ok::<_, json_clause::MatchError>(kept)
                })
                .context("failed to compile query clause")??;
                write_output(target.out.as_ref(), &serde_json::to_string_pretty(&kept)?)
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn paint_verdict(verdict: Option<Verdict>) -> colored::ColoredString {
    match verdict {
        Some(Verdict::AllMatch) => Verdict::AllMatch.as_str().green().bold(),
        Some(Verdict::MixedMatchMismatch) => Verdict::MixedMatchMismatch.as_str().yellow().bold(),
        Some(Verdict::AllMismatch) => Verdict::AllMismatch.as_str().red().bold(),
        None => "no findings".dimmed(),
    }
}

fn write_output(out: Option<&PathBuf>, rendered: &str) -> Result<()> {
    match out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            std::fs::write(out, rendered)
                .with_context(|| format!("failed to write {}", out.display()))
        }
        None => {
            println!("{rendered}");
            Ok(())
        }
    }
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'['))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched = glob::glob(pattern)?.collect::<Result<Vec<_>, _>>()?;
            if matched.is_empty() {
                return Err(format!("glob pattern matched no files: {pattern}").into());
            }
            matched.sort();
            out.extend(matched);
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clause_sources_are_mutually_exclusive() {
        let parsed = CommandLineInterface::try_parse_from([
            "json-clause", "filter", "--clause", "c.json", "--clause-json", "{}", "-i", "d.json",
        ]);
        assert!(parsed.is_err());
        let parsed = CommandLineInterface::try_parse_from([
            "json-clause", "filter", "-i", "d.json",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn full_match_parses() {
        let cli = CommandLineInterface::try_parse_from([
            "json-clause", "full-match", "--clause-json", r#"{"a":"^x$"}"#, "-i", "a.json", "b.json",
        ])
        .unwrap();
        let Command::FullMatch(target) = cli.cmd else { panic!("wrong subcommand") };
        assert_eq!(target.input_settings.input, ["a.json", "b.json"]);
        assert!(target.clause_settings.matcher().is_ok());
    }

    #[test]
    fn literal_paths_pass_through() {
        let out = resolve_file_path_patterns(["some/file.json"]).unwrap();
        assert_eq!(out, [PathBuf::from("some/file.json")]);
    }
}
