//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use trias_core::progress::{ProgressLogger, ProgressStep, TagProgress};
use trias_core::writer::{ConceptWriter, DelimitedWriter, MappedWriter};
use trias_core::{DelimitedReader, Numbering, TriConcept, TriasError, TriasMiner, TripleTable};

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum input file size (100 MB).
///
/// This prevents memory exhaustion from malicious or accidental large files.
const MAX_INPUT_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), TriasError> {
    let metadata = std::fs::metadata(path)?;
    if metadata.len() > max_size {
        return Err(TriasError::Config(format!(
            "file size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Validate an input file path.
///
/// Canonicalizes the path to resolve symlinks and "..", ensures it exists
/// and that it is a regular file.
fn validate_file_path(path: &Path) -> Result<PathBuf, TriasError> {
    let canonical = path.canonicalize().map_err(|e| {
        TriasError::Config(format!("invalid file path '{}': {}", path.display(), e))
    })?;
    if !canonical.is_file() {
        return Err(TriasError::Config(format!(
            "path '{}' is not a regular file",
            path.display()
        )));
    }
    Ok(canonical)
}

/// Validate an output path: the parent directory must exist.
fn validate_output_path(path: &Path) -> Result<PathBuf, TriasError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let canonical_parent = parent.canonicalize().map_err(|e| {
        TriasError::Config(format!(
            "invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;
    let filename = path
        .file_name()
        .ok_or_else(|| TriasError::Config("output path has no filename".to_string()))?;
    Ok(canonical_parent.join(filename))
}

// =============================================================================
// MINE COMMAND
// =============================================================================

/// Raw `mine` options as parsed from the command line.
#[derive(Debug)]
pub struct MineOptions {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub min_support: Option<String>,
    pub cardinalities: Option<String>,
    pub holes: bool,
    pub delimiter: Option<char>,
    pub format: Option<String>,
    pub sizes: bool,
    pub progress_file: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

/// Defaults loadable from a TOML configuration file; every command-line
/// option wins over its configuration counterpart.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct MineConfig {
    min_support: Option<[u32; 3]>,
    cardinalities: Option<[u32; 3]>,
    holes: Option<bool>,
    delimiter: Option<char>,
    format: Option<String>,
    sizes: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

/// Effective `mine` settings after merging CLI options over the
/// configuration file.
#[derive(Debug)]
struct MineSettings {
    min_support: [u32; 3],
    cardinalities: Option<[u32; 3]>,
    holes: bool,
    delimiter: Option<char>,
    format: OutputFormat,
    sizes: bool,
}

impl MineSettings {
    fn resolve(options: &MineOptions) -> Result<Self, TriasError> {
        let config = match &options.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)?;
                toml::from_str(&text).map_err(|e| {
                    TriasError::Config(format!("{}: {e}", path.display()))
                })?
            }
            None => MineConfig::default(),
        };

        let min_support = match &options.min_support {
            Some(arg) => parse_triple_arg(arg)?,
            None => config.min_support.unwrap_or([1, 1, 1]),
        };
        let cardinalities = match &options.cardinalities {
            Some(arg) => Some(parse_triple_arg(arg)?),
            None => config.cardinalities,
        };
        let format_name = options
            .format
            .clone()
            .or(config.format)
            .unwrap_or_else(|| "text".to_string());
        let format = match format_name.as_str() {
            "text" => OutputFormat::Text,
            "json" => OutputFormat::Json,
            other => {
                return Err(TriasError::Config(format!(
                    "unknown output format: {other}"
                )));
            }
        };

        Ok(Self {
            min_support,
            cardinalities,
            holes: options.holes || config.holes.unwrap_or(false),
            delimiter: options.delimiter.or(config.delimiter),
            format,
            sizes: options.sizes || config.sizes.unwrap_or(false),
        })
    }
}

/// Parse a "u,t,r" argument into three values.
fn parse_triple_arg(arg: &str) -> Result<[u32; 3], TriasError> {
    let parts: Vec<&str> = arg.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(TriasError::Config(format!(
            "expected three comma-separated values, got {arg:?}"
        )));
    }
    let mut values = [0u32; 3];
    for (slot, part) in values.iter_mut().zip(&parts) {
        *slot = part.parse().map_err(|_| {
            TriasError::Config(format!("not a non-negative integer: {part:?}"))
        })?;
    }
    Ok(values)
}

/// Run the mining pipeline: read, index, enumerate, write.
pub fn cmd_mine(options: MineOptions) -> Result<(), TriasError> {
    let settings = MineSettings::resolve(&options)?;
    let input = validate_file_path(&options.input)?;
    validate_file_size(&input, MAX_INPUT_FILE_SIZE)?;

    let numbering = if settings.holes {
        Numbering::Holes
    } else {
        Numbering::Dense
    };
    let reader = DelimitedReader::new(settings.delimiter, numbering);
    let parsed = reader.read(BufReader::new(File::open(&input)?), settings.cardinalities)?;
    let relation = parsed.relation;
    tracing::info!(
        triples = relation.len(),
        cardinalities = ?relation.cardinalities(),
        min_support = ?settings.min_support,
        "relation loaded from {}",
        input.display()
    );

    let sink: Box<dyn Write> = match &options.output {
        Some(path) => Box::new(BufWriter::new(File::create(validate_output_path(path)?)?)),
        None => Box::new(std::io::stdout()),
    };
    let base: Box<dyn ConceptWriter> = match settings.format {
        OutputFormat::Text => Box::new(DelimitedWriter::new(sink, settings.sizes)),
        OutputFormat::Json => Box::new(JsonWriter::new(sink)),
    };
    let inner: Box<dyn ConceptWriter> = match parsed.inverse {
        Some(maps) => Box::new(MappedWriter::new(base, maps)),
        None => base,
    };
    let mut writer = CountingWriter::new(inner);

    let mut progress: Box<dyn ProgressLogger> = match &options.progress_file {
        Some(path) => Box::new(TagProgress::new(BufWriter::new(File::create(
            validate_output_path(path)?,
        )?))),
        None => Box::new(TracingProgress::default()),
    };

    let miner = TriasMiner::new(relation, settings.min_support)?;
    miner.run(&mut writer, &mut progress)?;
    tracing::info!(concepts = writer.count(), "mining complete");
    Ok(())
}

// =============================================================================
// STATS COMMAND
// =============================================================================

/// Summarize a triple file without mining.
pub fn cmd_stats(
    input: &Path,
    delimiter: Option<char>,
    holes: bool,
    json_mode: bool,
) -> Result<(), TriasError> {
    let path = validate_file_path(input)?;
    validate_file_size(&path, MAX_INPUT_FILE_SIZE)?;

    let numbering = if holes {
        Numbering::Holes
    } else {
        Numbering::Dense
    };
    let parsed = DelimitedReader::new(delimiter, numbering)
        .read(BufReader::new(File::open(&path)?), None)?;
    let relation = parsed.relation;

    let mut distinct: [BTreeSet<u32>; 3] = Default::default();
    for triple in relation.triples() {
        for (d, value) in triple.iter().enumerate() {
            distinct[d].insert(*value);
        }
    }
    let [card_u, card_t, card_r] = relation.cardinalities();
    let cube = u64::from(card_u) * u64::from(card_t) * u64::from(card_r);
    let density_per_thousand = if cube == 0 {
        0
    } else {
        relation.len() as u64 * 1000 / cube
    };

    if json_mode {
        let output = serde_json::json!({
            "input": path.to_string_lossy(),
            "triples": relation.len(),
            "cardinalities": relation.cardinalities(),
            "distinct_values": [distinct[0].len(), distinct[1].len(), distinct[2].len()],
            "density_per_thousand": density_per_thousand,
            "renumbered": holes,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Trias Input Summary");
    println!("===================");
    println!("Input:    {}", path.display());
    println!();
    println!("Triples:        {}", relation.len());
    println!(
        "Cardinalities:  U={} T={} R={}",
        card_u, card_t, card_r
    );
    println!(
        "Distinct:       U={} T={} R={}",
        distinct[0].len(),
        distinct[1].len(),
        distinct[2].len()
    );
    println!("Density:        {} per thousand", density_per_thousand);

    Ok(())
}

// =============================================================================
// OUTPUT & PROGRESS ADAPTERS
// =============================================================================

/// Writes one JSON object per concept, line-delimited.
pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> ConceptWriter for JsonWriter<W> {
    fn write(&mut self, concept: &TriConcept) -> Result<(), TriasError> {
        serde_json::to_writer(&mut self.writer, concept)
            .map_err(|e| TriasError::Io(std::io::Error::other(e)))?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn close(&mut self) -> Result<(), TriasError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Counts the concepts passing through, for the completion log line.
pub struct CountingWriter<W: ConceptWriter> {
    inner: W,
    count: u64,
}

impl<W: ConceptWriter> CountingWriter<W> {
    pub const fn new(inner: W) -> Self {
        Self { inner, count: 0 }
    }

    pub const fn count(&self) -> u64 {
        self.count
    }
}

impl<W: ConceptWriter> ConceptWriter for CountingWriter<W> {
    fn write(&mut self, concept: &TriConcept) -> Result<(), TriasError> {
        self.inner.write(concept)?;
        self.count += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<(), TriasError> {
        self.inner.close()
    }
}

/// Routes enumeration progress into `tracing`, with an aggregate summary at
/// the stop event.
#[derive(Debug, Default)]
pub struct TracingProgress {
    max: u32,
    outer: u64,
    inner: u64,
    validated: u64,
}

impl ProgressLogger for TracingProgress {
    fn set_max(&mut self, max: u32) {
        self.max = max;
    }

    fn step(&mut self, step: ProgressStep) {
        match step {
            ProgressStep::Start => {
                tracing::debug!(outer_domain = self.max, "enumeration started");
            }
            ProgressStep::Outer => self.outer += 1,
            ProgressStep::OuterSuccess => {
                tracing::debug!(outer_steps = self.outer, "extent accepted");
            }
            ProgressStep::Inner => self.inner += 1,
            ProgressStep::InnerSuccess => self.validated += 1,
            ProgressStep::Stop => {
                tracing::info!(
                    outer_steps = self.outer,
                    inner_steps = self.inner,
                    validated = self.validated,
                    "enumeration finished"
                );
            }
        }
    }

    fn extent_element(&mut self, value: u32) {
        tracing::trace!(value, "outer candidate");
    }
}

// =============================================================================
// TESTS
// =============================================================================
