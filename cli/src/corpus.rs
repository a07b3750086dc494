use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const CORPUS_EXTENSIONS: &[&str] = &["txt", "md"];

/// Renders one file as a marker block the segmenter splits on.
pub fn document_block(name: &str, content: &str) -> String {
    format!("--- Document: {name} ---\n{content}")
}

/// Every `.txt`/`.md` file under `dir`, sorted by path.
pub fn corpus_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .and_then(|s| s.to_str())
                .map(|ext| CORPUS_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    files
}

/// Joins the files of a directory into one corpus, one marker block per file.
pub fn assemble_dir(dir: &Path) -> Result<String> {
    if !dir.is_dir() {
        return Err(anyhow!("{} is not a directory", dir.display()));
    }
    let mut blocks = Vec::new();
    for path in corpus_files(dir) {
        let content = fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        blocks.push(document_block(&name, &content));
    }
    tracing::info!(dir = %dir.display(), num_files = blocks.len(), "assembled corpus");
    Ok(blocks.join("\n\n"))
}

/// Corpus text from exactly one of: a file, a directory, inline text.
pub fn load_corpus(file: Option<&Path>, dir: Option<&Path>, text: Option<&str>) -> Result<String> {
    match (file, dir, text) {
        (Some(f), None, None) => fs::read_to_string(f).with_context(|| format!("reading {}", f.display())),
        (None, Some(d), None) => assemble_dir(d),
        (None, None, Some(t)) => Ok(t.to_string()),
        _ => Err(anyhow!("give exactly one of --corpus, --dir or --text")),
    }
}
