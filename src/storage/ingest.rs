//! Ingest of validated TagPacks and taxonomies into a sink

use tracing::{debug, info};

use super::errors::StorageResult;
use super::record::{
    concept_record, tag_label_record, tag_record, tagpack_record, taxonomy_record, Table,
};
use super::sink::RecordSink;
use crate::observability::Event;
use crate::taxonomy::Taxonomy;
use crate::validation::ValidatedTagPack;

/// Counters for one ingest run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub tagpacks: usize,
    pub tags: usize,
    pub taxonomies: usize,
    pub concepts: usize,
    pub records: usize,
}

/// Converts documents to records and hands them to a sink.
///
/// Only [`ValidatedTagPack`]s are accepted, so nothing that failed
/// validation can reach the sink.
pub struct Ingestor<S: RecordSink> {
    sink: S,
    stats: IngestStats,
}

impl<S: RecordSink> Ingestor<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            stats: IngestStats::default(),
        }
    }

    /// Writes the `tagpack_by_uri` record and the tag records.
    ///
    /// Every tag goes to `tag_by_address`; tags with a category also go to
    /// `tag_by_category`, tags with a text label to `tag_by_label`.
    ///
    /// Returns the number of records written.
    pub fn insert_tagpack(&mut self, pack: &ValidatedTagPack<'_>) -> StorageResult<usize> {
        let mut records = vec![tagpack_record(pack)];
        let mut tags = 0;
        for tag in pack.tags() {
            tags += 1;
            records.push(tag_record(Table::TagByAddress, &tag));
            if tag.has_field("category") {
                records.push(tag_record(Table::TagByCategory, &tag));
            }
            if let Some(record) = tag_label_record(&tag) {
                records.push(record);
            }
        }

        let written = self.sink.insert_all(records)?;
        self.stats.tagpacks += 1;
        self.stats.tags += tags;
        self.stats.records += written;

        info!(
            event = %Event::TagpackIngested,
            uri = %pack.tagpack().tagpack_uri(),
            tags,
            records = written,
            "TagPack ingested"
        );
        Ok(written)
    }

    /// Writes the `taxonomy_by_key` record and one record per concept.
    pub fn insert_taxonomy(&mut self, taxonomy: &Taxonomy) -> StorageResult<usize> {
        let mut records = Vec::with_capacity(taxonomy.len() + 1);
        records.push(taxonomy_record(taxonomy));
        records.extend(taxonomy.concepts().iter().map(concept_record));

        let written = self.sink.insert_all(records)?;
        self.stats.taxonomies += 1;
        self.stats.concepts += taxonomy.len();
        self.stats.records += written;

        info!(
            event = %Event::TaxonomyIngested,
            taxonomy = taxonomy.key(),
            concepts = taxonomy.len(),
            "Taxonomy ingested"
        );
        Ok(written)
    }

    pub fn stats(&self) -> IngestStats {
        self.stats
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Flushes the sink and returns it with the run's counters.
    pub fn finish(mut self) -> StorageResult<(S, IngestStats)> {
        self.sink.flush()?;
        debug!(
            event = %Event::IngestComplete,
            tagpacks = self.stats.tagpacks,
            taxonomies = self.stats.taxonomies,
            records = self.stats.records,
            "Sink flushed"
        );
        Ok((self.sink, self.stats))
    }
}
