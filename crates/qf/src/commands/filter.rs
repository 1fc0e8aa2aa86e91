//! Filter command implementation.
//!
//! Reads JSON records from a file or stdin and prints the ones matching a query.

use std::collections::BTreeSet;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use owo_colors::OwoColorize;
use qfilter::json::JsonTester;
use qfilter::Filter;
use serde_json::Value as Json;
use strsim::levenshtein;

use super::config::Config;
use super::{CommandContext, CommandError, Result};

/// Maximum Levenshtein distance for a property to be suggested.
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// Options for the filter command.
#[derive(Debug, Default)]
pub struct FilterOptions {
    /// Filter expression.
    pub query: String,
    /// Input file; stdin when absent.
    pub file: Option<PathBuf>,
    /// Print only the number of matches.
    pub count: bool,
    /// Stop after this many matches.
    pub limit: Option<usize>,
    /// Fields tested by keyless values.
    pub fields: Vec<String>,
}

/// Executes the filter command.
pub fn execute(ctx: &CommandContext, opts: &FilterOptions, config: &Config) -> Result<()> {
    let content = match &opts.file {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    let records = read_records(&content)?;

    let filter = config.parser().parse(&opts.query);
    tracing::debug!(query = %opts.query, filter = %filter, records = records.len(), "filtering");

    if !ctx.quiet {
        for warning in unknown_property_warnings(&filter, &records) {
            if ctx.use_colors {
                eprintln!("{}", warning.yellow());
            } else {
                eprintln!("{warning}");
            }
        }
    }

    let tester = config.tester(&opts.fields);
    let matches = select(&filter, &tester, &records, opts.limit);

    if opts.count {
        if ctx.json_output {
            let output = serde_json::json!({ "count": matches.len() });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("{}", matches.len());
        }
    } else if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&matches)?);
    } else {
        for record in &matches {
            println!("{}", serde_json::to_string(record)?);
        }
    }

    Ok(())
}

/// Parses records from a JSON array, a single JSON value, or JSON lines.
pub fn read_records(content: &str) -> Result<Vec<Json>> {
    let trimmed = content.trim_start();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    if trimmed.starts_with('[') {
        return match serde_json::from_str(trimmed)? {
            Json::Array(items) => Ok(items),
            other => Ok(vec![other]),
        };
    }

    if let Ok(single) = serde_json::from_str::<Json>(trimmed) {
        return Ok(vec![single]);
    }

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line)
                .map_err(|e| CommandError::Input(format!("line {}: {}", index + 1, e)))
        })
        .collect()
}

/// Returns the records passing `filter`, at most `limit` of them.
fn select<'a>(
    filter: &Filter,
    tester: &JsonTester,
    records: &'a [Json],
    limit: Option<usize>,
) -> Vec<&'a Json> {
    let matching = records.iter().filter(|record| filter.test(tester, *record));
    match limit {
        Some(limit) => matching.take(limit).collect(),
        None => matching.collect(),
    }
}

/// Warns about query properties that no record carries.
fn unknown_property_warnings(filter: &Filter, records: &[Json]) -> Vec<String> {
    let known: BTreeSet<String> = records
        .iter()
        .filter_map(Json::as_object)
        .flat_map(|object| object.keys().map(|key| key.to_lowercase()))
        .collect();
    if known.is_empty() {
        return Vec::new();
    }

    filter
        .properties()
        .iter()
        .filter(|property| !known.contains(property.as_str()))
        .map(|property| match find_similar(property, &known) {
            Some(suggestion) => format!(
                "Warning: no record has property '{}'. Did you mean '{}'?",
                property, suggestion
            ),
            None => format!("Warning: no record has property '{}'", property),
        })
        .collect()
}

/// Finds the closest known property within the suggestion distance.
fn find_similar<'a>(property: &str, known: &'a BTreeSet<String>) -> Option<&'a str> {
    known
        .iter()
        .map(|candidate| (candidate, levenshtein(property, candidate)))
        .filter(|(_, distance)| *distance <= MAX_SUGGESTION_DISTANCE)
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate.as_str())
}
