//! Command-line arguments and settings merging

use std::path::PathBuf;

use clap::Parser;
use varmap_core::{ResolverConfig, SourceOrder};
use varmap_io::{load_abbreviations, ColumnSettings, IoResult, ReportFormat, Settings};

/// Map scraped variant labels to canonical specification names
#[derive(Parser, Debug)]
#[command(name = "varmap")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Table of source labels (e.g. Variants.csv)
    #[arg(required_unless_present = "batch")]
    pub source: Option<PathBuf>,

    /// Table of candidate labels (e.g. Specifications.csv)
    #[arg(required_unless_present = "batch")]
    pub candidates: Option<PathBuf>,

    /// Where to write the JSON report
    #[arg(required_unless_present = "batch")]
    pub output: Option<PathBuf>,

    /// Minimum score for a mapping, in [0, 1]
    pub threshold: Option<f64>,

    /// Label column in the source table (inferred when omitted)
    pub source_column: Option<String>,

    /// Label column in the candidate table (inferred when omitted)
    pub candidate_column: Option<String>,

    /// Resolve every <brand>/<model> directory under ROOT
    #[arg(long, value_name = "ROOT", conflicts_with_all = ["source", "candidates", "output"])]
    pub batch: Option<PathBuf>,

    /// Minimum score for a mapping; the only way to set it with --batch
    #[arg(long = "threshold", value_name = "SCORE", conflicts_with = "threshold")]
    pub threshold_flag: Option<f64>,

    /// TOML settings file ([resolver] and [columns] tables)
    #[arg(long, short = 'c', value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Candidate reuse: no-reuse or allow-reuse
    #[arg(long, value_name = "POLICY")]
    pub reuse_policy: Option<String>,

    /// Assignment under no-reuse: greedy or optimal
    #[arg(long, value_name = "STRATEGY")]
    pub strategy: Option<String>,

    /// Let longer, more specific source labels choose first
    #[arg(long)]
    pub longest_first: bool,

    /// Abbreviation table (TOML or JSON) replacing the built-in one
    #[arg(long, value_name = "FILE")]
    pub abbreviations: Option<PathBuf>,

    /// Write the flat {source: {specification, confidence}} layout
    #[arg(long)]
    pub legacy: bool,

    /// Only log warnings and errors
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

impl Args {
    pub fn report_format(&self) -> ReportFormat {
        if self.legacy {
            ReportFormat::Legacy
        } else {
            ReportFormat::Full
        }
    }

    /// Settings file first, then command-line overrides. The result is
    /// validated before any table is read.
    pub fn resolve_settings(&self) -> IoResult<(ResolverConfig, ColumnSettings)> {
        let Settings {
            resolver: mut config,
            mut columns,
        } = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };

        if let Some(threshold) = self.threshold.or(self.threshold_flag) {
            config.threshold = threshold;
        }
        if let Some(policy) = &self.reuse_policy {
            config.reuse_policy = policy.parse()?;
        }
        if let Some(strategy) = &self.strategy {
            config.strategy = strategy.parse()?;
        }
        if self.longest_first {
            config.source_order = SourceOrder::LongestFirst;
        }
        if let Some(path) = &self.abbreviations {
            config.abbreviations = load_abbreviations(path)?;
        }
        if self.source_column.is_some() {
            columns.source = self.source_column.clone();
        }
        if self.candidate_column.is_some() {
            columns.candidate = self.candidate_column.clone();
        }

        config.validate()?;
        Ok((config, columns))
    }
}
