/// Merge a parsed translator CSV into the table
///
/// Unknown languages and keys are added; every imported cell is written
/// verbatim, blanks included. Rows and languages missing from the import are
/// left alone.
use crate::formats::csv::CsvDocument;
use crate::formats::FormatError;
use crate::table::LocalizationTable;
use serde::Serialize;
use std::collections::HashMap;

/// Checks applied before an import mutates anything.
#[derive(Debug, Clone, Default)]
pub struct ImportPolicy {
    /// Reject imports whose header lacks this language.
    pub require_language: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    /// Rows created or updated.
    pub touched: usize,
    pub created: usize,
    pub updated: usize,
    /// Lines of data rows skipped for a blank key.
    pub skipped_lines: Vec<usize>,
    /// Header columns that could not be mapped to a table language.
    pub ignored_columns: Vec<String>,
    pub languages_added: Vec<String>,
}

pub fn import_csv(table: &mut LocalizationTable, document: &CsvDocument) -> ImportReport {
    let mut report = ImportReport::default();
    let languages = document.languages();

    for lang in languages {
        if table.index_of_language(lang).is_none() {
            report.languages_added.push(lang.clone());
        }
        table.ensure_language(lang);
    }

    let by_name: HashMap<String, usize> = table
        .languages()
        .iter()
        .enumerate()
        .map(|(column, lang)| (lang.to_lowercase(), column))
        .collect();

    // (csv column, table column); unmapped columns are dropped here.
    let mut mapping = Vec::with_capacity(languages.len());
    for (offset, lang) in languages.iter().enumerate() {
        match by_name.get(&lang.to_lowercase()) {
            Some(&column) => mapping.push((offset + 1, column)),
            None => {
                log::warn!("Ignoring CSV column '{}': no matching table language", lang);
                report.ignored_columns.push(lang.clone());
            }
        }
    }

    for record in &document.records {
        let key = record.key();
        if key.trim().is_empty() {
            log::debug!("Skipping CSV row at line {}: blank key", record.line);
            report.skipped_lines.push(record.line);
            continue;
        }

        let created = !table.contains_key(key);
        let position = table.row_index_or_insert(key);
        for &(csv_column, table_column) in &mapping {
            table.write_column(position, table_column, record.field(csv_column), true);
        }

        if created {
            report.created += 1;
        } else {
            report.updated += 1;
        }
        report.touched += 1;
    }

    log::info!(
        "CSV import complete: {} rows touched ({} new), {} skipped",
        report.touched,
        report.created,
        report.skipped_lines.len()
    );
    report
}

/// [`import_csv`] after the policy checks pass. On error the table is not
/// touched.
pub fn import_csv_with_policy(
    table: &mut LocalizationTable,
    document: &CsvDocument,
    policy: &ImportPolicy,
) -> Result<ImportReport, FormatError> {
    if let Some(required) = &policy.require_language {
        let present = document
            .languages()
            .iter()
            .any(|lang| lang.to_lowercase() == required.to_lowercase());
        if !present {
            return Err(FormatError::MissingLanguage(required.clone()));
        }
    }
    Ok(import_csv(table, document))
}

/// Parse `text` and merge it. A malformed document leaves the table as it was.
pub fn import_csv_text(
    table: &mut LocalizationTable,
    text: &str,
    policy: &ImportPolicy,
) -> Result<ImportReport, FormatError> {
    let document = CsvDocument::parse(text)?;
    import_csv_with_policy(table, &document, policy)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with_ro() -> LocalizationTable {
        let mut table = LocalizationTable::with_source_language("en");
        table.ensure_language("ro");
        table.upsert("k", "Hi", "en");
        table.set_cell("k", "ro", "Salut", true);
        table
    }

    #[test]
    fn blank_cell_clears_translation() {
        let mut table = table_with_ro();
        let csv = "key,en,ro\nk,Hi,\n";
        let report = import_csv_text(&mut table, csv, &ImportPolicy::default()).unwrap();
        assert_eq!(table.get("k", "ro"), Some(""));
        assert_eq!(report.touched, 1);
        assert_eq!(report.updated, 1);
    }

    #[test]
    fn adds_languages_and_keys_without_removing_others() {
        let mut table = table_with_ro();
        table.upsert("untouched", "Keep", "en");

        let report = import_csv_text(
            &mut table,
            "key,fr\nk,Salut FR\nnew.key,Nouveau\n",
            &ImportPolicy::default(),
        )
        .unwrap();

        assert_eq!(table.languages(), &["en", "ro", "fr"]);
        assert_eq!(table.get("k", "ro"), Some("Salut"));
        assert_eq!(table.get("k", "fr"), Some("Salut FR"));
        assert_eq!(table.get("new.key", "fr"), Some("Nouveau"));
        assert_eq!(table.get("new.key", "en"), Some(""));
        assert_eq!(table.get("untouched", "en"), Some("Keep"));
        assert_eq!(report.created, 1);
        assert_eq!(report.languages_added, vec!["fr".to_string()]);
    }

    #[test]
    fn matches_keys_case_insensitively() {
        let mut table = table_with_ro();
        import_csv_text(&mut table, "key,ro\nK,Bună\n", &ImportPolicy::default()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("k", "ro"), Some("Bună"));
    }

    #[test]
    fn skips_blank_keys_and_records_lines() {
        let mut table = table_with_ro();
        let csv = "key,en\n,orphan\n  ,spaces\nk,Hey\n";
        let report = import_csv_text(&mut table, csv, &ImportPolicy::default()).unwrap();
        assert_eq!(report.skipped_lines, vec![2, 3]);
        assert_eq!(report.touched, 1);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn short_rows_write_empty_cells() {
        let mut table = table_with_ro();
        import_csv_text(&mut table, "key,en,ro\nk,Hello\n", &ImportPolicy::default()).unwrap();
        assert_eq!(table.get("k", "en"), Some("Hello"));
        assert_eq!(table.get("k", "ro"), Some(""));
    }

    #[test]
    fn values_are_not_trimmed() {
        let mut table = table_with_ro();
        import_csv_text(&mut table, "key,ro\nk,  padded  \n", &ImportPolicy::default()).unwrap();
        assert_eq!(table.get("k", "ro"), Some("  padded  "));
    }

    #[test]
    fn malformed_header_leaves_table_unmodified() {
        let mut table = table_with_ro();
        let before = table.clone();
        let err = import_csv_text(&mut table, "name,en\nk,x\n", &ImportPolicy::default())
            .unwrap_err();
        assert!(matches!(err, FormatError::MalformedHeader { .. }));
        assert_eq!(table, before);
    }

    #[test]
    fn required_language_is_enforced_before_mutation() {
        let mut table = table_with_ro();
        let before = table.clone();
        let policy = ImportPolicy {
            require_language: Some("EN".into()),
        };
        let err = import_csv_text(&mut table, "key,ro,de\nk,x,y\n", &policy).unwrap_err();
        assert!(matches!(err, FormatError::MissingLanguage(ref lang) if lang == "EN"));
        assert_eq!(table, before);

        import_csv_text(&mut table, "key,en\nk,Hello\n", &policy).unwrap();
        assert_eq!(table.get("k", "en"), Some("Hello"));
    }

    #[test]
    fn duplicate_header_columns_last_one_wins() {
        let mut table = table_with_ro();
        let csv = "key,ro,RO\nk,first,second\n";
        import_csv_text(&mut table, csv, &ImportPolicy::default()).unwrap();
        assert_eq!(table.languages().len(), 2);
        assert_eq!(table.get("k", "ro"), Some("second"));
    }
}
