//! CLI command implementations
//!
//! Every command loads the configuration first; a broken config, schema or
//! taxonomy source stops the run before any TagPack is read. Within a batch
//! each TagPack is loaded and validated on its own, so one bad file never
//! prevents the others from being checked.

use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::Config;
use crate::observability::Event;
use crate::schema::TagPackSchema;
use crate::storage::{Ingestor, JsonlSink, RecordSink};
use crate::tagpack::{TagPack, TagPackError};
use crate::taxonomy::TaxonomyRegistry;
use crate::validation::{CategoryVocabulary, ValidationError, Validator};

use super::args::{Cli, Command, TaxonomyAction};
use super::errors::{CliError, CliResult};
use super::io::{collect_tagpack_files, write_fail, write_ingested, write_pass};

/// Dispatch a parsed command line, writing results to stdout
pub fn run_command(cli: Cli) -> CliResult<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Validate {
            no_taxonomies,
            paths,
        } => validate(&cli.config, &paths, no_taxonomies, &mut out),
        Command::Ingest {
            dest,
            no_taxonomies,
            paths,
        } => ingest(&cli.config, &paths, &dest, no_taxonomies, &mut out),
        Command::Taxonomy { action } => match action {
            TaxonomyAction::List => list_taxonomies(&cli.config, &mut out),
            TaxonomyAction::Ingest { dest } => ingest_taxonomies(&cli.config, &dest, &mut out),
        },
        Command::Schema => show_schema(&cli.config, &mut out),
    }
}

/// Everything loaded from configuration that validation needs
pub struct Context {
    pub config: Config,
    pub schema: TagPackSchema,
    pub taxonomies: Option<TaxonomyRegistry>,
    pub categories: Option<CategoryVocabulary>,
}

impl Context {
    /// Loads config, schema, vocabulary and (unless skipped) taxonomies.
    pub fn load(config_path: &Path, with_taxonomies: bool) -> CliResult<Self> {
        let config = Config::load(config_path)?;
        let schema = config.load_schema()?;
        let categories = config.category_vocabulary()?;
        let taxonomies = if with_taxonomies {
            Some(config.load_taxonomies()?)
        } else {
            None
        };

        Ok(Self {
            config,
            schema,
            taxonomies,
            categories,
        })
    }

    pub fn validator(&self) -> Validator<'_> {
        Validator::new(&self.schema)
            .with_taxonomies(self.taxonomies.as_ref())
            .with_categories(self.categories.as_ref())
    }
}

/// Why a TagPack was not accepted
#[derive(Debug)]
pub enum Rejection {
    Document(TagPackError),
    Validation(ValidationError),
}

impl Rejection {
    pub fn code(&self) -> &'static str {
        match self {
            Rejection::Document(e) => e.code(),
            Rejection::Validation(e) => e.code().code(),
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Document(e) => write!(f, "{}", e),
            Rejection::Validation(e) => write!(f, "{}", e),
        }
    }
}

/// Outcome of a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub failed: usize,
}

impl BatchSummary {
    fn record(&mut self, passed: bool) {
        self.total += 1;
        if !passed {
            self.failed += 1;
        }
    }

    /// `BatchFailed` if any TagPack failed
    pub fn into_result(self) -> CliResult<()> {
        if self.failed > 0 {
            Err(CliError::batch_failed(self.failed, self.total))
        } else {
            Ok(())
        }
    }
}

/// Loads one TagPack file with the configured base URI.
pub fn load_file(ctx: &Context, path: &Path) -> Result<TagPack, Rejection> {
    TagPack::load(ctx.config.base_uri.as_str(), path).map_err(Rejection::Document)
}

/// Loads one TagPack file and runs the validator over it.
pub fn check_file(ctx: &Context, path: &Path) -> Result<TagPack, Rejection> {
    let pack = load_file(ctx, path)?;
    ctx.validator()
        .validate(&pack)
        .map_err(Rejection::Validation)?;
    Ok(pack)
}

fn log_validated(path: &Path, pack: &TagPack) {
    info!(
        event = %Event::TagpackValidated,
        file = %path.display(),
        tags = pack.tag_count(),
        "TagPack validated"
    );
}

fn log_rejected(path: &Path, rejection: &Rejection) {
    warn!(
        event = %Event::TagpackRejected,
        file = %path.display(),
        code = rejection.code(),
        "TagPack rejected"
    );
}

/// Validates every file, printing one line each.
pub fn validate_files<W: Write>(
    ctx: &Context,
    files: &[PathBuf],
    out: &mut W,
) -> CliResult<BatchSummary> {
    let mut summary = BatchSummary::default();
    for file in files {
        match check_file(ctx, file) {
            Ok(pack) => {
                log_validated(file, &pack);
                write_pass(out, file)?;
                summary.record(true);
            }
            Err(rejection) => {
                log_rejected(file, &rejection);
                write_fail(out, file, &rejection.to_string())?;
                summary.record(false);
            }
        }
    }
    Ok(summary)
}

/// Validates every file and ingests the passing ones.
///
/// A sink failure aborts the batch; validation failures do not.
pub fn ingest_files<S: RecordSink, W: Write>(
    ctx: &Context,
    files: &[PathBuf],
    ingestor: &mut Ingestor<S>,
    out: &mut W,
) -> CliResult<BatchSummary> {
    let validator = ctx.validator();
    let mut summary = BatchSummary::default();
    for file in files {
        let pack = match load_file(ctx, file) {
            Ok(pack) => pack,
            Err(rejection) => {
                log_rejected(file, &rejection);
                write_fail(out, file, &rejection.to_string())?;
                summary.record(false);
                continue;
            }
        };

        match validator.admit(&pack) {
            Ok(validated) => {
                log_validated(file, &pack);
                let records = ingestor.insert_tagpack(&validated)?;
                write_ingested(out, file, records)?;
                summary.record(true);
            }
            Err(e) => {
                let rejection = Rejection::Validation(e);
                log_rejected(file, &rejection);
                write_fail(out, file, &rejection.to_string())?;
                summary.record(false);
            }
        }
    }
    Ok(summary)
}

/// `tagpack validate`
pub fn validate<W: Write>(
    config_path: &Path,
    paths: &[PathBuf],
    no_taxonomies: bool,
    out: &mut W,
) -> CliResult<()> {
    let ctx = Context::load(config_path, !no_taxonomies)?;
    let files = collect_tagpack_files(paths)?;
    validate_files(&ctx, &files, out)?.into_result()
}

/// `tagpack ingest`
pub fn ingest<W: Write>(
    config_path: &Path,
    paths: &[PathBuf],
    dest: &Path,
    no_taxonomies: bool,
    out: &mut W,
) -> CliResult<()> {
    let ctx = Context::load(config_path, !no_taxonomies)?;
    let files = collect_tagpack_files(paths)?;

    let mut ingestor = Ingestor::new(JsonlSink::open(dest)?);
    let summary = ingest_files(&ctx, &files, &mut ingestor, out)?;
    let (_, stats) = ingestor.finish()?;

    info!(
        event = %Event::IngestComplete,
        dest = %dest.display(),
        tagpacks = stats.tagpacks,
        tags = stats.tags,
        records = stats.records,
        failed = summary.failed,
        "Ingest complete"
    );
    summary.into_result()
}

/// `tagpack taxonomy list`
pub fn list_taxonomies<W: Write>(config_path: &Path, out: &mut W) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let registry = config.load_taxonomies()?;
    for taxonomy in registry.iter() {
        writeln!(
            out,
            "{}\t{}\t{} concepts",
            taxonomy.key(),
            taxonomy.uri(),
            taxonomy.len()
        )?;
    }
    Ok(())
}

/// `tagpack taxonomy ingest`
pub fn ingest_taxonomies<W: Write>(config_path: &Path, dest: &Path, out: &mut W) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let registry = config.load_taxonomies()?;

    let mut ingestor = Ingestor::new(JsonlSink::open(dest)?);
    for taxonomy in registry.iter() {
        let records = ingestor.insert_taxonomy(taxonomy)?;
        writeln!(out, "INGESTED taxonomy {} ({} records)", taxonomy.key(), records)?;
    }
    let (_, stats) = ingestor.finish()?;

    info!(
        event = %Event::IngestComplete,
        dest = %dest.display(),
        taxonomies = stats.taxonomies,
        concepts = stats.concepts,
        "Taxonomy ingest complete"
    );
    Ok(())
}

/// `tagpack schema`
pub fn show_schema<W: Write>(config_path: &Path, out: &mut W) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let schema = config.load_schema()?;

    writeln!(out, "# {}", schema.definition())?;
    let namespaces = [
        ("header", schema.header_fields()),
        ("tag", schema.tag_fields()),
    ];
    for (namespace, fields) in namespaces {
        for (name, def) in fields {
            writeln!(
                out,
                "{}\t{}\t{}\t{}\t{}",
                namespace,
                name,
                def.field_type,
                if def.mandatory { "mandatory" } else { "optional" },
                def.taxonomy.as_deref().unwrap_or("-")
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemorySink, Table};
    use std::fs;
    use tempfile::TempDir;

    const GOOD: &str = "title: T\ncreator: C\nlastmod: 2020-01-01\ntags:\n  - address: a\n    label: A\n    category: exchange\n";
    const BAD_CATEGORY: &str = "title: T\ncreator: C\nlastmod: 2020-01-01\ntags:\n  - address: b\n    label: B\n    category: casino\n";
    const NOT_A_MAPPING: &str = "just a string\n";

    fn workspace() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("entity.csv"),
            "id,uri,label,description\nexchange,http://example.com/entity/exchange,Exchange,\n",
        )
        .unwrap();
        fs::write(dir.path().join("abuse.csv"), "id,uri,label,description\n").unwrap();
        fs::write(
            dir.path().join("config.yaml"),
            "base_uri: http://example.com/packs\n\
             taxonomies:\n\
             \x20 entity: {uri: http://example.com/entity, path: entity.csv}\n\
             \x20 abuse: {uri: http://example.com/abuse, path: abuse.csv}\n",
        )
        .unwrap();
        fs::write(dir.path().join("good.yaml"), GOOD).unwrap();
        fs::write(dir.path().join("bad.yaml"), BAD_CATEGORY).unwrap();
        fs::write(dir.path().join("scalar.yaml"), NOT_A_MAPPING).unwrap();
        dir
    }

    #[test]
    fn test_validate_reports_each_file() {
        let dir = workspace();
        let files = vec![
            dir.path().join("good.yaml"),
            dir.path().join("bad.yaml"),
            dir.path().join("scalar.yaml"),
        ];

        let mut out = Vec::new();
        let err = validate(&dir.path().join("config.yaml"), &files, false, &mut out).unwrap_err();
        assert_eq!(err.message(), "2 of 3 TagPacks failed");

        let output = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("PASS "));
        assert!(lines[1].starts_with("FAIL "));
        assert!(lines[1].contains("Undefined concept casino"));
        assert!(lines[2].contains("Cannot extract TagPack fields"));
    }

    #[test]
    fn test_no_taxonomies_skips_concept_check() {
        let dir = workspace();
        let mut out = Vec::new();
        validate(
            &dir.path().join("config.yaml"),
            &[dir.path().join("bad.yaml")],
            true,
            &mut out,
        )
        .unwrap();
        assert!(String::from_utf8(out).unwrap().starts_with("PASS "));
    }

    #[test]
    fn test_missing_config_is_fatal() {
        let dir = TempDir::new().unwrap();
        let mut out = Vec::new();
        let err = validate(
            &dir.path().join("missing.yaml"),
            &[dir.path().join("good.yaml")],
            false,
            &mut out,
        )
        .unwrap_err();
        assert_eq!(err.code_str(), "TAGPACK_CLI_CONFIG_ERROR");
        assert!(out.is_empty());
    }

    #[test]
    fn test_ingest_skips_failed_documents() {
        let dir = workspace();
        let ctx = Context::load(&dir.path().join("config.yaml"), true).unwrap();
        let files = vec![dir.path().join("bad.yaml"), dir.path().join("good.yaml")];

        let mut ingestor = Ingestor::new(MemorySink::new());
        let mut out = Vec::new();
        let summary = ingest_files(&ctx, &files, &mut ingestor, &mut out).unwrap();
        assert_eq!(summary, BatchSummary { total: 2, failed: 1 });

        let sink = ingestor.sink();
        assert_eq!(sink.table(Table::TagpackByUri).len(), 1);
        let addresses: Vec<String> = sink
            .table(Table::TagByAddress)
            .iter()
            .map(|r| r.key())
            .collect();
        assert_eq!(addresses, vec!["a"]);
    }

    #[test]
    fn test_ingest_writes_jsonl() {
        let dir = workspace();
        let dest = dir.path().join("out");
        let mut out = Vec::new();
        ingest(
            &dir.path().join("config.yaml"),
            &[dir.path().join("good.yaml")],
            &dest,
            false,
            &mut out,
        )
        .unwrap();

        assert!(dest.join("tagpack_by_uri.jsonl").exists());
        assert!(dest.join("tag_by_label.jsonl").exists());
        assert!(String::from_utf8(out).unwrap().starts_with("INGESTED "));
    }

    #[test]
    fn test_taxonomy_commands() {
        let dir = workspace();
        let config = dir.path().join("config.yaml");

        let mut out = Vec::new();
        list_taxonomies(&config, &mut out).unwrap();
        let listing = String::from_utf8(out).unwrap();
        assert!(listing.contains("entity\thttp://example.com/entity\t1 concepts"));
        assert!(listing.contains("abuse\thttp://example.com/abuse\t0 concepts"));

        let dest = dir.path().join("tax");
        let mut out = Vec::new();
        ingest_taxonomies(&config, &dest, &mut out).unwrap();
        let concepts = fs::read_to_string(dest.join("concept_by_taxonomy_id.jsonl")).unwrap();
        assert_eq!(concepts.lines().count(), 1);
    }

    #[test]
    fn test_show_schema() {
        let dir = workspace();
        let mut out = Vec::new();
        show_schema(&dir.path().join("config.yaml"), &mut out).unwrap();
        let table = String::from_utf8(out).unwrap();
        assert!(table.contains("header\ttitle\ttext\tmandatory\t-"));
        assert!(table.contains("tag\tcategory\ttext\toptional\tentity"));
    }
}
