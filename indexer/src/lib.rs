use anyhow::{Context, Result};
use retrieval::{DocumentId, Index};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Deserialize)]
struct InputDoc {
    #[serde(alias = "body", alias = "text")]
    content: String,
}

/// Files under `input` that the loader understands, in a stable order.
pub fn collect_files(input: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = Vec::new();
    if input.is_dir() {
        for entry in WalkDir::new(input).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() && is_supported(p) {
                files.push(p.to_path_buf());
            }
        }
    } else if input.is_file() {
        files.push(input.to_path_buf());
    }
    files
}

fn is_supported(p: &Path) -> bool {
    matches!(p.extension().and_then(|s| s.to_str()), Some("json" | "jsonl" | "txt"))
}

/// Add every document found at `input` (file or directory tree) to `index`.
pub fn load_path(index: &Index, input: &Path) -> Result<Vec<DocumentId>> {
    let mut ids = Vec::new();
    for file in collect_files(input) {
        let before = ids.len();
        let loaded = match file.extension().and_then(|s| s.to_str()) {
            Some("jsonl") => load_jsonl(index, &file, &mut ids),
            Some("txt") => load_lines(index, &file, &mut ids),
            _ => load_json(index, &file, &mut ids),
        };
        loaded.with_context(|| format!("loading {}", file.display()))?;
        tracing::info!(file = %file.display(), docs = ids.len() - before, "loaded file");
    }
    Ok(ids)
}

fn load_jsonl(index: &Index, file: &Path, ids: &mut Vec<DocumentId>) -> Result<()> {
    let reader = BufReader::new(File::open(file)?);
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let doc: InputDoc = serde_json::from_str(&line)?;
        ids.push(index.add_document(&doc.content));
    }
    Ok(())
}

fn load_json(index: &Index, file: &Path, ids: &mut Vec<DocumentId>) -> Result<()> {
    let reader = BufReader::new(File::open(file)?);
    let json: serde_json::Value = serde_json::from_reader(reader)?;
    match json {
        serde_json::Value::Array(arr) => {
            for v in arr {
                let content = match v {
                    serde_json::Value::String(s) => s,
                    other => serde_json::from_value::<InputDoc>(other)?.content,
                };
                ids.push(index.add_document(&content));
            }
        }
        serde_json::Value::Object(_) => {
            let doc: InputDoc = serde_json::from_value(json)?;
            ids.push(index.add_document(&doc.content));
        }
        other => anyhow::bail!("expected a JSON array or object, found {other}"),
    }
    Ok(())
}

fn load_lines(index: &Index, file: &Path, ids: &mut Vec<DocumentId>) -> Result<()> {
    let reader = BufReader::new(File::open(file)?);
    for line in reader.lines() {
        let line = line?;
        if !line.trim().is_empty() {
            ids.push(index.add_document(line.trim()));
        }
    }
    Ok(())
}
