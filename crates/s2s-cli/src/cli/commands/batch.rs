//! `s2s batch <file>` – run every transfer listed in a JSON batch file.

use anyhow::{Context, Result};
use s2s_core::batch::{self, ItemOutcome};
use s2s_core::CurlTransport;
use serde_json::{json, Map, Value};
use std::path::Path;
use std::sync::Arc;

pub async fn run_batch_file(transport: CurlTransport, path: &Path, jobs: usize) -> Result<()> {
    let items = read_batch_file(path)?;
    let total = items.len();
    tracing::info!("batch {}: {} item(s), {} at a time", path.display(), total, jobs);

    let outcomes = batch::run_batch(Arc::new(transport), items, jobs).await;
    let (rendered, raised) = render_outcomes(&outcomes);
    println!("{}", serde_json::to_string_pretty(&rendered)?);

    if raised > 0 {
        anyhow::bail!("{} of {} transfer(s) raised an error", raised, total);
    }
    Ok(())
}

pub(crate) fn read_batch_file(path: &Path) -> Result<Vec<Map<String, Value>>> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("reading batch file {}", path.display()))?;
    parse_batch(&data).with_context(|| format!("parsing batch file {}", path.display()))
}

/// A batch is a JSON array of parameter objects.
pub(crate) fn parse_batch(data: &str) -> Result<Vec<Map<String, Value>>> {
    let items: Vec<Map<String, Value>> = serde_json::from_str(data)?;
    Ok(items)
}

/// One JSON value per item; raised errors become `{"error": ...}`. Also
/// returns how many items raised.
pub(crate) fn render_outcomes(outcomes: &[ItemOutcome]) -> (Value, usize) {
    let mut raised = 0;
    let rendered: Vec<Value> = outcomes
        .iter()
        .map(|o| match o {
            Ok(result) => result.to_json(),
            Err(e) => {
                raised += 1;
                json!({ "error": e.to_string() })
            }
        })
        .collect();
    (Value::Array(rendered), raised)
}
