//! varmap-core: fuzzy resolution of variant labels to specification names.
//!
//! Listing pages name a car variant tersely ("SX (O) DT"), while the
//! specification dataset uses full names ("SX (O) 1.5 Turbo DCT Dual Tone").
//! This crate aligns the two lists:
//!
//! - [`normalization`]: case folding, punctuation collapsing, abbreviation
//!   expansion through a swappable [`AbbreviationTable`]
//! - [`similarity`]: bounded, symmetric score combining character sequence
//!   similarity with token-set overlap
//! - [`resolver`]: best candidate per source under a threshold, with greedy
//!   or optimal one-to-one assignment
//! - [`report`]: mapped / unmapped / unused lists and summary statistics
//!
//! Low-confidence pairs are left unmapped for a human to review; an
//! unmapped label is a normal outcome, not an error.
//!
//! # Example
//!
//! ```
//! use varmap_core::{resolve, ReusePolicy};
//!
//! let report = resolve(
//!     &["N LINE N10 1.5 TURBO MT"],
//!     &["N Line N10 1.5 Turbo MT Dual Tone", "N Line N8 1.5 Turbo DCT"],
//!     0.5,
//!     ReusePolicy::NoReuse,
//! )
//! .unwrap();
//!
//! assert_eq!(
//!     report.mapped[0].candidate.as_deref(),
//!     Some("N Line N10 1.5 Turbo MT Dual Tone")
//! );
//! ```

pub mod abbreviation;
mod assignment;
pub mod batch;
pub mod config;
pub mod error;
pub mod filter;
pub mod normalization;
pub mod report;
pub mod resolver;
pub mod similarity;

pub use abbreviation::AbbreviationTable;
pub use batch::{ModelJob, ModelReport};
pub use config::{
    validate_threshold, AssignmentStrategy, ResolverConfig, ReusePolicy, ScoreWeights,
    SequenceMetric, SourceOrder,
};
pub use error::{ConfigError, Result};
pub use filter::{AllCandidates, CandidateFilter, SharedTokenFilter};
pub use normalization::{normalize, NormalizedLabel, Normalizer};
pub use report::{ConfidenceBand, MatchResult, ReportSummary, ResolutionReport, ScoredCandidate};
pub use resolver::{resolve, Resolver};
pub use similarity::{ScoreBreakdown, Scorer};
