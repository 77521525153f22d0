//! Pairwise header comparison across a set of tabular files.
//!
//! Every unordered pair of input files is compared exactly once: shared
//! canonical columns become `presente em ambos arquivos` rows, and columns
//! unique to one side are reported with plausible candidates from the
//! other side's unique columns. A pair whose headers cannot be read is
//! dropped without failing the run; the reason surfaces only as a warning.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use itertools::Itertools;
use log::{debug, warn};

use crate::header::HeaderMapping;
use crate::matching::find_candidates;
use crate::profile;
use crate::reader::{self, SkipReason};

/// Where a column was found within a pair. The wire labels are part of
/// the report format and fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    PresentInBoth,
    OnlyInFirst,
    OnlyInSecond,
}

impl Comparison {
    pub fn label(&self) -> &'static str {
        match self {
            Comparison::PresentInBoth => "presente em ambos arquivos",
            Comparison::OnlyInFirst => "somente no arquivo_1",
            Comparison::OnlyInSecond => "somente no arquivo_2",
        }
    }
}

/// One report record. Field order matches the report column order;
/// `column` always carries the original spelling from the file that owns
/// it, never the canonical key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonRow {
    pub file_1: String,
    pub file_2: String,
    pub column: String,
    pub comparison: Comparison,
    pub candidates: Option<String>,
}

/// Seam between the differ and file reading, so the pair logic is
/// testable without touching the filesystem.
pub trait HeaderSource {
    fn read_header(&mut self, path: &Path) -> Result<Vec<String>, SkipReason>;
}

/// Production source: reads headers from disk and, unless disabled,
/// profiles each file once as a side effect of its first successful read.
pub struct FileHeaderSource {
    profile: bool,
}

impl FileHeaderSource {
    pub fn new(profile: bool) -> Self {
        Self { profile }
    }
}

impl HeaderSource for FileHeaderSource {
    fn read_header(&mut self, path: &Path) -> Result<Vec<String>, SkipReason> {
        let header = reader::read_header(path)?;
        if self.profile {
            if let Err(err) = profile::profile_file(path, &profile::ProfileOptions::default()) {
                warn!("Profiling '{}' failed: {err:#}", path.display());
            }
        }
        Ok(header)
    }
}

/// Compares every `i < j` pair of `paths` and returns the accumulated
/// rows, pair by pair, never interleaved.
///
/// Each file is read and normalized once and its mapping reused across
/// all pairs it appears in; the output is identical to re-reading per
/// pair, minus the redundant I/O.
pub fn diff_all(paths: &[PathBuf], source: &mut dyn HeaderSource) -> Vec<ComparisonRow> {
    let mappings: Vec<Option<HeaderMapping>> = paths
        .iter()
        .map(|path| load_mapping(source, path))
        .collect();

    let mut rows = Vec::new();
    for (i, j) in (0..paths.len()).tuple_combinations() {
        let (Some(mapping_a), Some(mapping_b)) = (&mappings[i], &mappings[j]) else {
            continue;
        };
        let file_1 = basename(&paths[i]);
        let file_2 = basename(&paths[j]);
        debug!("Comparing '{file_1}' against '{file_2}'");
        compare_pair(&file_1, &file_2, mapping_a, mapping_b, &mut rows);
    }
    rows
}

fn load_mapping(source: &mut dyn HeaderSource, path: &Path) -> Option<HeaderMapping> {
    match source.read_header(path) {
        Ok(header) if header.is_empty() => {
            warn!("Skipping '{}': {}", path.display(), SkipReason::EmptyHeader);
            None
        }
        Ok(header) => Some(HeaderMapping::build(&header)),
        Err(reason) => {
            warn!("Skipping '{}': {reason}", path.display());
            None
        }
    }
}

fn compare_pair(
    file_1: &str,
    file_2: &str,
    mapping_a: &HeaderMapping,
    mapping_b: &HeaderMapping,
    rows: &mut Vec<ComparisonRow>,
) {
    let set_a: BTreeSet<String> = mapping_a.canonical_sequence.iter().cloned().collect();
    let set_b: BTreeSet<String> = mapping_b.canonical_sequence.iter().cloned().collect();

    let only_a: BTreeSet<String> = set_a.difference(&set_b).cloned().collect();
    let only_b: BTreeSet<String> = set_b.difference(&set_a).cloned().collect();

    // BTreeSet iteration keeps each group sorted by canonical key.
    for key in set_a.intersection(&set_b) {
        rows.push(ComparisonRow {
            file_1: file_1.to_string(),
            file_2: file_2.to_string(),
            column: mapping_a.original(key).to_string(),
            comparison: Comparison::PresentInBoth,
            candidates: None,
        });
    }
    for key in &only_a {
        rows.push(ComparisonRow {
            file_1: file_1.to_string(),
            file_2: file_2.to_string(),
            column: mapping_a.original(key).to_string(),
            comparison: Comparison::OnlyInFirst,
            candidates: find_candidates(key, &only_b, mapping_b),
        });
    }
    for key in &only_b {
        rows.push(ComparisonRow {
            file_1: file_1.to_string(),
            file_2: file_2.to_string(),
            column: mapping_b.original(key).to_string(),
            comparison: Comparison::OnlyInSecond,
            candidates: find_candidates(key, &only_a, mapping_a),
        });
    }
}

fn basename(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Header source backed by a fixed map; `None` simulates an
    /// unreadable file.
    struct FixedHeaders(HashMap<PathBuf, Option<Vec<String>>>);

    impl FixedHeaders {
        fn new(entries: &[(&str, Option<&[&str]>)]) -> (Self, Vec<PathBuf>) {
            let mut map = HashMap::new();
            let mut paths = Vec::new();
            for (name, header) in entries {
                let path = PathBuf::from(name);
                map.insert(
                    path.clone(),
                    header.map(|h| h.iter().map(|s| s.to_string()).collect()),
                );
                paths.push(path);
            }
            (Self(map), paths)
        }
    }

    impl HeaderSource for FixedHeaders {
        fn read_header(&mut self, path: &Path) -> Result<Vec<String>, SkipReason> {
            match self.0.get(path) {
                Some(Some(header)) => Ok(header.clone()),
                _ => Err(SkipReason::EmptyHeader),
            }
        }
    }

    #[test]
    fn every_unordered_pair_is_compared_exactly_once() {
        let (mut source, paths) = FixedHeaders::new(&[
            ("a.csv", Some(&["x"])),
            ("b.csv", Some(&["x"])),
            ("c.csv", Some(&["x"])),
            ("d.csv", Some(&["x"])),
        ]);
        let rows = diff_all(&paths, &mut source);
        // Identical single-column headers: one present-in-both row per pair.
        assert_eq!(rows.len(), 4 * 3 / 2);
        let pairs: Vec<(String, String)> = rows
            .iter()
            .map(|r| (r.file_1.clone(), r.file_2.clone()))
            .collect();
        for (f1, f2) in &pairs {
            assert_ne!(f1, f2);
        }
        let mut deduped = pairs.clone();
        deduped.dedup();
        assert_eq!(deduped.len(), pairs.len());
    }

    #[test]
    fn shared_and_unique_columns_partition_cleanly() {
        let (mut source, paths) = FixedHeaders::new(&[
            ("a.csv", Some(&["ID", "Nome", "Cidade"])),
            ("b.csv", Some(&["id", "Estado"])),
        ]);
        let rows = diff_all(&paths, &mut source);

        let by_status = |status: Comparison| -> Vec<&str> {
            rows.iter()
                .filter(|r| r.comparison == status)
                .map(|r| r.column.as_str())
                .collect()
        };
        assert_eq!(by_status(Comparison::PresentInBoth), vec!["ID"]);
        assert_eq!(by_status(Comparison::OnlyInFirst), vec!["Cidade", "Nome"]);
        assert_eq!(by_status(Comparison::OnlyInSecond), vec!["Estado"]);
        // Union of the three groups covers both headers, no overlap.
        assert_eq!(rows.len(), 4);
    }

    #[test]
    fn end_to_end_scenario_with_candidates() {
        let (mut source, paths) = FixedHeaders::new(&[
            ("a.csv", Some(&["ID", "Nome", "Data Nascimento"])),
            ("b.csv", Some(&["id", "nome_completo", "DataNasc"])),
        ]);
        let rows = diff_all(&paths, &mut source);

        let find = |column: &str| rows.iter().find(|r| r.column == column).expect(column);

        assert_eq!(find("ID").comparison, Comparison::PresentInBoth);
        assert_eq!(find("ID").candidates, None);

        let nome = find("Nome");
        assert_eq!(nome.comparison, Comparison::OnlyInFirst);
        assert_eq!(nome.candidates.as_deref(), Some("nome_completo"));

        let nascimento = find("Data Nascimento");
        assert_eq!(nascimento.comparison, Comparison::OnlyInFirst);
        assert_eq!(nascimento.candidates.as_deref(), Some("DataNasc"));

        let completo = find("nome_completo");
        assert_eq!(completo.comparison, Comparison::OnlyInSecond);
        assert_eq!(completo.candidates.as_deref(), Some("Nome"));

        let nasc = find("DataNasc");
        assert_eq!(nasc.comparison, Comparison::OnlyInSecond);
        assert_eq!(nasc.candidates.as_deref(), Some("Data Nascimento"));
    }

    #[test]
    fn rows_within_a_pair_group_by_status_then_sort_by_key() {
        let (mut source, paths) = FixedHeaders::new(&[
            ("a.csv", Some(&["Zona", "Ano", "Regiao_Norte"])),
            ("b.csv", Some(&["ano", "zona", "Bairro"])),
        ]);
        let rows = diff_all(&paths, &mut source);
        let statuses: Vec<Comparison> = rows.iter().map(|r| r.comparison).collect();
        assert_eq!(
            statuses,
            vec![
                Comparison::PresentInBoth,
                Comparison::PresentInBoth,
                Comparison::OnlyInFirst,
                Comparison::OnlyInSecond,
            ]
        );
        // Shared keys sorted ascending: ano < zona.
        assert_eq!(rows[0].column, "Ano");
        assert_eq!(rows[1].column, "Zona");
    }

    #[test]
    fn unreadable_file_drops_only_its_pairs() {
        let (mut source, paths) = FixedHeaders::new(&[
            ("a.csv", Some(&["id", "nome"])),
            ("broken.csv", None),
            ("c.csv", Some(&["id", "valor"])),
        ]);
        let rows = diff_all(&paths, &mut source);
        assert!(!rows.is_empty());
        for row in &rows {
            assert_eq!(row.file_1, "a.csv");
            assert_eq!(row.file_2, "c.csv");
        }
    }

    #[test]
    fn candidate_associations_are_symmetric_under_swapped_roles() {
        let headers_a: &[&str] = &["Nome", "Data Nascimento"];
        let headers_b: &[&str] = &["nome_completo", "DataNasc"];

        let (mut forward_source, forward_paths) =
            FixedHeaders::new(&[("a.csv", Some(headers_a)), ("b.csv", Some(headers_b))]);
        let (mut reverse_source, reverse_paths) =
            FixedHeaders::new(&[("b.csv", Some(headers_b)), ("a.csv", Some(headers_a))]);

        let forward = diff_all(&forward_paths, &mut forward_source);
        let reverse = diff_all(&reverse_paths, &mut reverse_source);

        let associations = |rows: &[ComparisonRow], status: Comparison| -> Vec<(String, Option<String>)> {
            rows.iter()
                .filter(|r| r.comparison == status)
                .map(|r| (r.column.clone(), r.candidates.clone()))
                .collect()
        };
        assert_eq!(
            associations(&forward, Comparison::OnlyInFirst),
            associations(&reverse, Comparison::OnlyInSecond)
        );
        assert_eq!(
            associations(&forward, Comparison::OnlyInSecond),
            associations(&reverse, Comparison::OnlyInFirst)
        );
    }

    #[test]
    fn empty_header_skips_the_pair() {
        let (mut source, paths) = FixedHeaders::new(&[
            ("a.csv", Some(&[] as &[&str])),
            ("b.csv", Some(&["id"])),
        ]);
        assert!(diff_all(&paths, &mut source).is_empty());
    }

    #[test]
    fn single_file_produces_no_rows() {
        let (mut source, paths) = FixedHeaders::new(&[("a.csv", Some(&["id"]))]);
        assert!(diff_all(&paths, &mut source).is_empty());
    }
}
