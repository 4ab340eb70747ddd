#![forbid(unsafe_code)]

//! @acp:module "Evidence Map Library"
//! @acp:summary "Evidence scoring and aggregation engine for education research maps"
//! @acp:domain scoring
//! @acp:layer api
//! @acp:stability stable
//!
//! # evmap - Evidence Scoring & Aggregation Engine
//!
//! Transforms a corpus of education research findings into scored,
//! classified bubble-map levels: problem burden by outcome, intervention
//! evidence by objective, a rigor-filtered view over WWC-rated randomized
//! studies, per-intervention drill-downs, and temporal evolution series.
//!
//! ## Example
//!
//! ```rust,no_run
//! use evmap::{Config, EvidenceMapService};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::load_or_default();
//!     let service = EvidenceMapService::from_config(config)?;
//!
//!     let map = service.problem_burden_map()?;
//!     println!("{}", serde_json::to_string_pretty(&map)?);
//!
//!     Ok(())
//! }
//! ```

pub mod bubble;
pub mod commands;
pub mod config;
pub mod error;
pub mod evolution;
pub mod record;
pub mod score;
pub mod service;
pub mod store;
pub mod synthesis;
pub mod taxonomy;

// Re-exports
pub use bubble::{Bubble, LevelData};
pub use config::{Config, EvolutionConfig, ScoringConfig, SynthesisConfig};
pub use error::{EvmapError, Result};
pub use evolution::{evolution_series, generalizability, TimeSeriesPoint};
pub use record::{Direction, FindingRecord, RawRecord};
pub use score::{maturity_score, median, rigor_score, MaturityScore, Priority, RigorScore};
pub use service::{BubbleMap, EvidenceMapService, EvolutionSeries, MatrixCell};
pub use store::{Intervention, JsonStore, RecordFetcher, RecordFilter};
#[cfg(feature = "sqlite")]
pub use store::SqliteStore;
pub use synthesis::{
    AnthropicGenerator, CachedSynthesis, FileSynthesisCache, Synthesis, SynthesisCache,
    SynthesisGenerator,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
