//! varmap-cli - command-line front end for the varmap resolver
//!
//! The binary parses [`Args`], sets up logging and hands over to [`run`].
//! Everything after argument parsing lives here so it can be exercised
//! without spawning a process.

pub mod cli;
pub mod display;

use std::path::Path;

use tracing::{info, warn};
use varmap_core::{ModelJob, Resolver, ResolverConfig};
use varmap_io::{discover_models, load_labels, write_report, ColumnSettings, IoError, IoResult};

pub use cli::Args;
use display::{render_mapping, render_summary};

/// Process exit status for a failed run: 2 for invalid settings, 1 for
/// file errors.
pub fn exit_code(err: &IoError) -> u8 {
    if err.is_config() {
        2
    } else {
        1
    }
}

/// Resolve one pair of tables, or every model directory with `--batch`.
pub fn run(args: &Args) -> IoResult<()> {
    let (config, columns) = args.resolve_settings()?;
    match &args.batch {
        Some(root) => run_batch(args, root, config, &columns),
        None => run_single(args, config, &columns),
    }
}

fn run_single(args: &Args, config: ResolverConfig, columns: &ColumnSettings) -> IoResult<()> {
    let (Some(source), Some(candidates), Some(output)) =
        (&args.source, &args.candidates, &args.output)
    else {
        return Err(IoError::InvalidFormat(
            "source, candidate and output paths are required".to_string(),
        ));
    };

    let threshold = config.threshold;
    let resolver = Resolver::new(config)?;

    let sources = load_labels(source, columns.source.as_deref(), "label_column_source")?;
    info!(path = %source.display(), count = sources.len(), "loaded source labels");
    let candidate_labels =
        load_labels(candidates, columns.candidate.as_deref(), "label_column_candidate")?;
    info!(path = %candidates.display(), count = candidate_labels.len(), "loaded candidate labels");

    let report = resolver.resolve(&sources, &candidate_labels);

    print!("{}", render_mapping(&report, threshold));
    print!("{}", render_summary(&report.summary()));

    write_report(output, &report, args.report_format())
}

fn run_batch(
    args: &Args,
    root: &Path,
    config: ResolverConfig,
    columns: &ColumnSettings,
) -> IoResult<()> {
    let resolver = Resolver::new(config)?;
    let models = discover_models(root)?;
    info!(root = %root.display(), models = models.len(), "discovered model directories");

    let mut jobs: Vec<ModelJob> = Vec::with_capacity(models.len());
    let mut targets = Vec::with_capacity(models.len());
    let mut failures = 0usize;

    for model in &models {
        match model.load_job(columns.source.as_deref(), columns.candidate.as_deref()) {
            Ok(job) => {
                jobs.push(job);
                targets.push(model.mapping_path());
            }
            // A missing column is a settings problem shared by every model.
            Err(err) if err.is_config() => return Err(err),
            Err(err) => {
                warn!(model = %model.name(), error = %err, "skipping model");
                failures += 1;
            }
        }
    }

    let reports = resolver.resolve_batch(&jobs);
    for (model_report, target) in reports.iter().zip(&targets) {
        let summary = model_report.report.summary();
        println!(
            "{:40} {:>3}/{:<3} mapped ({:5.1}%)",
            model_report.name,
            summary.mapped,
            summary.total,
            summary.mapped_percent()
        );

        if let Err(err) = write_report(target, &model_report.report, args.report_format()) {
            warn!(model = %model_report.name, error = %err, "failed to write report");
            failures += 1;
        }
    }

    if failures > 0 {
        return Err(IoError::Write {
            path: root.display().to_string(),
            message: format!("{failures} model(s) failed"),
        });
    }
    Ok(())
}
