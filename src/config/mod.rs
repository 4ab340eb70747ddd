//! @acp:module "Configuration"
//! @acp:summary "Engine configuration loading and defaults"
//! @acp:domain scoring
//! @acp:layer config

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default config file name, project-local.
pub const CONFIG_FILE: &str = ".evmap.config.json";

/// @acp:summary "Main engine configuration structure"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Record snapshot path (JSON export of the graph store)
    #[serde(default = "default_store_path")]
    pub store: PathBuf,

    /// Synthesis cache file path
    #[serde(default = "default_synthesis_cache_path")]
    pub synthesis_cache: PathBuf,

    /// Scoring thresholds and tunables
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Temporal evolution window
    #[serde(default)]
    pub evolution: EvolutionConfig,

    /// Synthesis generation settings
    #[serde(default)]
    pub synthesis: SynthesisConfig,

    /// R&D investment per implementation objective, in whole dollars.
    /// Surfaced in the intervention-map breakdown only.
    #[serde(default = "default_investments")]
    pub investments: HashMap<String, u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: default_store_path(),
            synthesis_cache: default_synthesis_cache_path(),
            scoring: ScoringConfig::default(),
            evolution: EvolutionConfig::default(),
            synthesis: SynthesisConfig::default(),
            investments: default_investments(),
        }
    }
}

impl Config {
    /// @acp:summary "Load config from a JSON file"
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// @acp:summary "Save config to a file"
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// @acp:summary "Load from default location or fall back to defaults"
    pub fn load_or_default() -> Self {
        Self::load(CONFIG_FILE).unwrap_or_default()
    }
}

/// @acp:summary "Composite-score thresholds and tunables"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Evidence-maturity threshold for the outcome and objective views
    #[serde(default = "default_maturity_threshold")]
    pub maturity_threshold: f64,

    /// Quality threshold for the rigor-filtered views
    #[serde(default = "default_rigor_threshold")]
    pub rigor_threshold: f64,

    /// Effect-consistency spread normalizer for the broadened-objective view
    #[serde(default = "default_effect_spread_k")]
    pub effect_spread_k: f64,

    /// Effect-consistency spread normalizer for the per-intervention view.
    /// Kept separate from `effect_spread_k`; the two views were tuned
    /// independently.
    #[serde(default = "default_intervention_effect_spread_k")]
    pub intervention_effect_spread_k: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            maturity_threshold: default_maturity_threshold(),
            rigor_threshold: default_rigor_threshold(),
            effect_spread_k: default_effect_spread_k(),
            intervention_effect_spread_k: default_intervention_effect_spread_k(),
        }
    }
}

/// @acp:summary "Temporal aggregation window"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionConfig {
    #[serde(default = "default_start_year")]
    pub start_year: i32,
    #[serde(default = "default_end_year")]
    pub end_year: i32,
    /// Bucket width in years; the final bucket may be shorter.
    #[serde(default = "default_bucket_years")]
    pub bucket_years: i32,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            start_year: default_start_year(),
            end_year: default_end_year(),
            bucket_years: default_bucket_years(),
        }
    }
}

/// @acp:summary "External LLM synthesis settings"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisConfig {
    /// Model identifier passed to the messages API
    #[serde(default = "default_model")]
    pub model: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Messages API endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Response token cap
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key_env: default_api_key_env(),
            endpoint: default_endpoint(),
            max_tokens: default_max_tokens(),
        }
    }
}

fn default_store_path() -> PathBuf {
    PathBuf::from(".evmap.snapshot.json")
}

fn default_synthesis_cache_path() -> PathBuf {
    PathBuf::from(".evmap.synthesis.json")
}

fn default_maturity_threshold() -> f64 {
    65.0
}

fn default_rigor_threshold() -> f64 {
    70.0
}

fn default_effect_spread_k() -> f64 {
    0.6
}

fn default_intervention_effect_spread_k() -> f64 {
    0.75
}

fn default_start_year() -> i32 {
    1984
}

fn default_end_year() -> i32 {
    2025
}

fn default_bucket_years() -> i32 {
    3
}

fn default_model() -> String {
    "claude-sonnet-4-5".to_string()
}

fn default_api_key_env() -> String {
    "ANTHROPIC_API_KEY".to_string()
}

fn default_endpoint() -> String {
    "https://api.anthropic.com/v1/messages".to_string()
}

fn default_max_tokens() -> u32 {
    3000
}

fn default_investments() -> HashMap<String, u64> {
    // USP investments in AI per implementation objective, last updated
    // 1/12/2026. Keys match the taxonomy strings, typos included.
    HashMap::from([
        ("Intelligent Tutoring and Instruction".to_string(), 315_045_557),
        ("AI-Enable Personalized Advising".to_string(), 74_753_110),
        ("Institutional Decision-making".to_string(), 584_493_624),
        ("AI-Enabled Learner Mobility".to_string(), 199_803_225),
    ])
}
