//! Concept feed loading
//!
//! A feed is comma-separated text with a header row `id,uri,label,description`.
//! Rows become concepts in file order. Fetching remote feeds is left to the
//! caller; this module reads from any reader or a local file.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use super::errors::{TaxonomyError, TaxonomyResult};
use super::types::Taxonomy;

#[derive(Debug, Deserialize)]
struct ConceptRow {
    id: String,
    uri: String,
    label: String,
    #[serde(default)]
    description: String,
}

impl Taxonomy {
    /// Reads a taxonomy's concepts from a CSV feed.
    pub fn from_csv_reader<R: Read>(
        key: impl Into<String>,
        uri: impl Into<String>,
        reader: R,
    ) -> TaxonomyResult<Self> {
        let mut taxonomy = Taxonomy::new(key, uri);
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(b',')
            .trim(csv::Trim::All)
            .from_reader(reader);

        for row in csv_reader.deserialize::<ConceptRow>() {
            let row = row.map_err(|e| TaxonomyError::Feed {
                taxonomy: taxonomy.key().to_string(),
                source: e,
            })?;
            taxonomy.push_concept(row.id, row.uri, row.label, row.description)?;
        }

        debug!(taxonomy = taxonomy.key(), concepts = taxonomy.len(), "concept feed parsed");
        Ok(taxonomy)
    }

    /// Reads a taxonomy's concepts from a local CSV file.
    pub fn from_csv_file(
        key: impl Into<String>,
        uri: impl Into<String>,
        path: &Path,
    ) -> TaxonomyResult<Self> {
        let key = key.into();
        let file = File::open(path).map_err(|e| TaxonomyError::Io {
            taxonomy: key.clone(),
            location: path.display().to_string(),
            source: e,
        })?;
        Self::from_csv_reader(key, uri, file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const FEED: &str = "\
id,uri,label,description
exchange,http://example.com/entity/exchange,Exchange,\"A trading platform, custodial\"
miner,http://example.com/entity/miner,Miner,
";

    #[test]
    fn test_rows_become_concepts_in_order() {
        let tax = Taxonomy::from_csv_reader("entity", "http://example.com/entity", FEED.as_bytes())
            .unwrap();
        assert_eq!(tax.len(), 2);
        assert_eq!(tax.concepts()[0].id, "exchange");
        assert_eq!(tax.concepts()[0].description, "A trading platform, custodial");
        assert_eq!(tax.concepts()[1].uri, "http://example.com/entity/miner");
        assert_eq!(tax.concepts()[1].description, "");
    }

    #[test]
    fn test_missing_column_is_feed_error() {
        let feed = "id,label\nexchange,Exchange\n";
        let err = Taxonomy::from_csv_reader("entity", "u", feed.as_bytes()).unwrap_err();
        assert!(matches!(err, TaxonomyError::Feed { .. }));
    }

    #[test]
    fn test_duplicate_row_rejected() {
        let feed = "id,uri,label,description\na,u/a,A,\na,u/a,A,\n";
        let err = Taxonomy::from_csv_reader("t", "u", feed.as_bytes()).unwrap_err();
        assert!(matches!(err, TaxonomyError::DuplicateConcept { .. }));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(FEED.as_bytes()).unwrap();
        let tax = Taxonomy::from_csv_file("entity", "http://example.com/entity", file.path())
            .unwrap();
        assert!(tax.contains("miner"));
    }

    #[test]
    fn test_missing_file() {
        let err = Taxonomy::from_csv_file("entity", "u", Path::new("/nonexistent.csv"))
            .unwrap_err();
        assert!(matches!(err, TaxonomyError::Io { .. }));
    }
}
