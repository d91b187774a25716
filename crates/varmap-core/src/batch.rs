//! Resolution across many models
//!
//! Runs for different models share nothing, so they can be resolved
//! independently. When the `parallel` feature is enabled,
//! [`Resolver::resolve_batch`] uses rayon to spread models across threads.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info_span;

use crate::report::ResolutionReport;
use crate::resolver::Resolver;

/// Source and candidate labels for one model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelJob {
    pub name: String,
    pub sources: Vec<String>,
    pub candidates: Vec<String>,
}

impl ModelJob {
    pub fn new(name: impl Into<String>, sources: Vec<String>, candidates: Vec<String>) -> Self {
        Self {
            name: name.into(),
            sources,
            candidates,
        }
    }
}

/// Report produced for one [`ModelJob`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelReport {
    pub name: String,
    pub report: ResolutionReport,
}

impl Resolver {
    fn resolve_job(&self, job: &ModelJob) -> ModelReport {
        let _span = info_span!("model", name = %job.name).entered();
        ModelReport {
            name: job.name.clone(),
            report: self.resolve(&job.sources, &job.candidates),
        }
    }

    /// Resolve each job in turn. Reports come back in job order.
    pub fn resolve_many(&self, jobs: &[ModelJob]) -> Vec<ModelReport> {
        jobs.iter().map(|job| self.resolve_job(job)).collect()
    }

    /// Resolve jobs in parallel. Reports come back in job order.
    #[cfg(feature = "parallel")]
    pub fn resolve_batch(&self, jobs: &[ModelJob]) -> Vec<ModelReport> {
        jobs.par_iter().map(|job| self.resolve_job(job)).collect()
    }

    /// Without the `parallel` feature this is [`Resolver::resolve_many`].
    #[cfg(not(feature = "parallel"))]
    pub fn resolve_batch(&self, jobs: &[ModelJob]) -> Vec<ModelReport> {
        self.resolve_many(jobs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolverConfig;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_batch_matches_sequential() {
        let resolver = Resolver::new(ResolverConfig::default()).unwrap();
        let jobs = vec![
            ModelJob::new(
                "creta",
                labels(&["E", "EX", "SX (O)"]),
                labels(&["E 1.5 MT", "EX 1.5 MT", "SX (O) 1.5 AT"]),
            ),
            ModelJob::new("empty", labels(&["Base"]), vec![]),
            ModelJob::new(
                "punch",
                labels(&["Pure", "Adventure DT"]),
                labels(&["Pure 1.2 MT", "Adventure 1.2 MT Dual Tone"]),
            ),
        ];

        let sequential = resolver.resolve_many(&jobs);
        let batch = resolver.resolve_batch(&jobs);
        assert_eq!(sequential, batch);
        assert_eq!(
            batch.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
            vec!["creta", "empty", "punch"]
        );
        assert_eq!(batch[1].report.unmapped.len(), 1);
    }
}
