use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use symgraph_graph::CollectorConfig;
use symgraph_model::{DecodeContext, SymbolGraph};
use walkdir::WalkDir;

const GRAPH_SUFFIX: &str = ".symbols.json";

/// Expand inputs into graph files: files are kept as given, directories
/// contribute every `*.symbols.json` below them in path order
pub(crate) fn discover_graph_files(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut found = Vec::new();
            for entry in WalkDir::new(input).follow_links(true) {
                let entry = entry
                    .with_context(|| format!("Failed to scan directory {}", input.display()))?;
                let is_graph = entry.file_type().is_file()
                    && entry
                        .file_name()
                        .to_str()
                        .is_some_and(|name| name.ends_with(GRAPH_SUFFIX));
                if is_graph {
                    found.push(entry.into_path());
                }
            }
            found.sort();
            if found.is_empty() {
                log::warn!("No symbol graphs in {}", input.display());
            }
            files.extend(found);
        } else if input.is_file() {
            files.push(input.clone());
        } else {
            bail!("Input not found: {}", input.display());
        }
    }
    Ok(files)
}

pub(crate) fn load_graph(path: &Path, ctx: &DecodeContext) -> Result<SymbolGraph> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    SymbolGraph::from_slice(&bytes, ctx)
        .with_context(|| format!("Failed to decode symbol graph {}", path.display()))
}

/// Read a collector configuration; `.toml` files are TOML, anything else JSON
pub(crate) fn load_config(path: &Path) -> Result<CollectorConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config = if path.extension().is_some_and(|ext| ext == "toml") {
        toml::from_str(&text).with_context(|| format!("Invalid TOML config {}", path.display()))?
    } else {
        serde_json::from_str(&text)
            .with_context(|| format!("Invalid JSON config {}", path.display()))?
    };
    Ok(config)
}
