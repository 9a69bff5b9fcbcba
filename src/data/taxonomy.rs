//! Keyword taxonomy loader.
//!
//! The taxonomy sheet is a CSV with one column per topic: the header row holds
//! topic names and the cells below hold keywords. Columns may be ragged; empty
//! cells are skipped.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::domain::{Taxonomy, Topic};
use crate::error::AppError;

/// Characters removed from topic names (they are not valid in sheet names).
const FORBIDDEN_CHARS: [char; 7] = ['/', '*', '?', ':', '[', ']', ' '];

/// Load the taxonomy from a CSV file.
pub fn load_taxonomy(path: &Path) -> Result<Taxonomy, AppError> {
    if path.is_dir() {
        return Err(AppError::input(format!(
            "Expected a file, got a directory: {}",
            path.display()
        )));
    }
    let file = File::open(path).map_err(|e| {
        AppError::input(format!(
            "The file path is not correct or the file does not exist: {} ({e})",
            path.display()
        ))
    })?;
    let taxonomy = read_taxonomy(file)?;
    log::info!(
        "Loaded taxonomy from {}: {} topic(s), {} keyword(s)",
        path.display(),
        taxonomy.topics.len(),
        taxonomy.keyword_count()
    );
    Ok(taxonomy)
}

/// Parse a taxonomy from any CSV reader.
pub fn read_taxonomy<R: Read>(reader: R) -> Result<Taxonomy, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read taxonomy headers: {e}")))?
        .clone();

    let mut columns: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for (idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| {
            AppError::input(format!("Failed to read taxonomy row {}: {e}", idx + 2))
        })?;
        for (col, cell) in record.iter().enumerate().take(headers.len()) {
            if !cell.is_empty() {
                columns[col].push(cell.to_string());
            }
        }
    }

    let mut taxonomy = Taxonomy::default();
    for (idx, (header, keywords)) in headers.iter().zip(columns).enumerate() {
        let mut name = sanitize_topic_name(header);
        if name.is_empty() {
            if keywords.is_empty() {
                continue;
            }
            name = format!("Unnamed{idx}");
        }

        match taxonomy.topics.iter_mut().find(|t| t.name == name) {
            Some(existing) => existing.keywords = keywords,
            None => taxonomy.topics.push(Topic { name, keywords }),
        }
    }

    Ok(taxonomy)
}

/// Strip sheet-name-hostile characters and spaces from a header.
pub fn sanitize_topic_name(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}')
        .chars()
        .filter(|c| !FORBIDDEN_CHARS.contains(c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_removes_forbidden_characters() {
        assert_eq!(sanitize_topic_name("Music / Film"), "MusicFilm");
        assert_eq!(sanitize_topic_name("a*b?c:d[e]f"), "abcdef");
        assert_eq!(sanitize_topic_name("\u{feff}Tin tức"), "Tintức");

        for raw in ["x/y", "[A] B", "what?*", ": :", "ok"] {
            let clean = sanitize_topic_name(raw);
            assert!(!clean.chars().any(|c| FORBIDDEN_CHARS.contains(&c)), "{clean}");
        }
    }

    #[test]
    fn ragged_columns_become_topics() {
        let csv = "Sport News,Music/Film\nbóng đá,Jack\nSEA Games,\n,Sơn Tùng\n";
        let taxonomy = read_taxonomy(csv.as_bytes()).unwrap();

        assert_eq!(taxonomy.topic_names(), vec!["SportNews", "MusicFilm"]);
        assert_eq!(taxonomy.topics[0].keywords, vec!["bóng đá", "SEA Games"]);
        assert_eq!(taxonomy.topics[1].keywords, vec!["Jack", "Sơn Tùng"]);
        assert_eq!(taxonomy.keyword_count(), 4);
    }

    #[test]
    fn sanitized_name_collision_keeps_last_column() {
        let csv = "A B,AB\nfirst,second\n";
        let taxonomy = read_taxonomy(csv.as_bytes()).unwrap();

        assert_eq!(taxonomy.topics.len(), 1);
        assert_eq!(taxonomy.topics[0].name, "AB");
        assert_eq!(taxonomy.topics[0].keywords, vec!["second"]);
    }

    #[test]
    fn missing_file_is_an_input_error() {
        let err = load_taxonomy(Path::new("definitely/not/here.csv")).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_INPUT);
        assert!(err.message().contains("does not exist"));
    }
}
