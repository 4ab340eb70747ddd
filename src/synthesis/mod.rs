//! @acp:module "Synthesis"
//! @acp:summary "AI synthesis generation and its per-cell cache"
//! @acp:domain scoring
//! @acp:layer integration
//!
//! The engine decides only when to consult the cache versus regenerate; the
//! text itself comes from an external LLM service. Generation failures are
//! folded into a user-visible explanatory payload rather than raised, so a
//! transient LLM outage degrades to "no synthesis available" instead of
//! failing the whole view.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::SynthesisConfig;
use crate::error::Result;
use crate::record::FindingRecord;

/// Freshly generated synthesis text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Synthesis {
    pub overview: String,
    pub gaps: String,
}

/// A cached synthesis with its generation timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedSynthesis {
    pub overview: String,
    pub gaps: String,
    pub generated_at: DateTime<Utc>,
}

/// Collaborator boundary: read/write of synthesis text keyed by
/// (objective, outcome). `put` is an idempotent upsert with no
/// transactional guard; concurrent writers race and the later write wins.
pub trait SynthesisCache: Send + Sync {
    fn get(&self, objective: &str, outcome: &str) -> Result<Option<CachedSynthesis>>;
    fn put(&self, objective: &str, outcome: &str, entry: &CachedSynthesis) -> Result<()>;
}

/// Collaborator boundary: external LLM synthesis. Infallible by contract;
/// implementations surface failures inside the returned text.
pub trait SynthesisGenerator: Send + Sync {
    fn generate(&self, objective: &str, outcome: &str, records: &[FindingRecord]) -> Synthesis;
}

/// File-backed synthesis cache: one JSON file holding an
/// objective → outcome → entry map. Writes are read-modify-write.
pub struct FileSynthesisCache {
    path: PathBuf,
}

type CacheMap = HashMap<String, HashMap<String, CachedSynthesis>>;

impl FileSynthesisCache {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn read_map(&self) -> Result<CacheMap> {
        if !self.path.exists() {
            return Ok(CacheMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl SynthesisCache for FileSynthesisCache {
    fn get(&self, objective: &str, outcome: &str) -> Result<Option<CachedSynthesis>> {
        let map = self.read_map()?;
        Ok(map
            .get(objective)
            .and_then(|outcomes| outcomes.get(outcome))
            .cloned())
    }

    fn put(&self, objective: &str, outcome: &str, entry: &CachedSynthesis) -> Result<()> {
        let mut map = self.read_map()?;
        map.entry(objective.to_string())
            .or_default()
            .insert(outcome.to_string(), entry.clone());
        let content = serde_json::to_string_pretty(&map)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

/// Generator backed by the Anthropic messages API over blocking HTTP.
pub struct AnthropicGenerator {
    config: SynthesisConfig,
}

impl AnthropicGenerator {
    pub fn new(config: SynthesisConfig) -> Self {
        Self { config }
    }

    fn call_api(&self, prompt: &str) -> std::result::Result<String, String> {
        let api_key = std::env::var(&self.config.api_key_env)
            .map_err(|_| format!("{} is not set", self.config.api_key_env))?;

        let body = serde_json::json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "messages": [{ "role": "user", "content": prompt }],
        });

        let response = ureq::post(&self.config.endpoint)
            .set("x-api-key", &api_key)
            .set("anthropic-version", "2023-06-01")
            .set("content-type", "application/json")
            .send_json(body)
            .map_err(|e| e.to_string())?;

        let value: serde_json::Value = response.into_json().map_err(|e| e.to_string())?;
        value["content"][0]["text"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| "response carried no text content".to_string())
    }
}

impl SynthesisGenerator for AnthropicGenerator {
    fn generate(&self, objective: &str, outcome: &str, records: &[FindingRecord]) -> Synthesis {
        if records.is_empty() {
            return Synthesis {
                overview: "No papers available for this cell.".to_string(),
                gaps: "Unable to identify gaps without research papers.".to_string(),
            };
        }

        let prompt = build_prompt(objective, outcome, records);
        match self.call_api(&prompt) {
            Ok(text) => parse_synthesis(&text),
            Err(reason) => {
                tracing::warn!(%objective, %outcome, %reason, "synthesis generation failed");
                Synthesis {
                    overview: format!("Error generating synthesis: {reason}"),
                    gaps: "Unable to identify gaps due to synthesis error.".to_string(),
                }
            }
        }
    }
}

/// Build the synthesis prompt from paper metadata. The structure matters:
/// the response parser splits on the two headings requested here.
pub fn build_prompt(objective: &str, outcome: &str, records: &[FindingRecord]) -> String {
    let mut papers_context = Vec::with_capacity(records.len());
    for (i, record) in records.iter().enumerate() {
        papers_context.push(format!(
            "Paper {n}: {title}\nYear: {year}\nStudy Design: {design}\nPopulation: {population}\n\
             Finding: {finding}\nDirection: {direction}",
            n = i + 1,
            title = if record.title.is_empty() { "Untitled" } else { &record.title },
            year = record
                .year
                .map(|y| y.to_string())
                .unwrap_or_else(|| "N/A".to_string()),
            design = record.study_design.as_deref().unwrap_or("N/A"),
            population = record.population.as_deref().unwrap_or("N/A"),
            finding = record
                .results_summary
                .as_deref()
                .unwrap_or("No summary available"),
            direction = record
                .direction
                .map(|d| d.as_str())
                .unwrap_or("N/A"),
        ));
    }

    format!(
        "You are analyzing research papers in the AI in Education field.\n\n\
         Implementation Objective: {objective}\n\
         Outcome Focus Area: {outcome}\n\n\
         Here are the {count} papers in this area:\n\n{context}\n\n\
         Please provide:\n\n\
         1. OVERVIEW (2-3 paragraphs):\n\
         - Synthesize the key findings across these papers into a cohesive narrative\n\
         - Use parenthetical citations (e.g., \"AI-driven feedback enhanced language skills (Paper 1)\")\n\
         - Base your synthesis on the Finding and Direction fields as the main content\n\
         - Use the other fields to contextualize and qualify the findings\n\
         - Highlight patterns and convergent/divergent findings across studies\n\
         - Write in an academic synthesis style, not as a list of paper summaries\n\n\
         2. EVIDENCE GAPS (3-5 bullet points maximum):\n\
         - Identify ONLY the most critical and obvious gaps\n\
         - Prioritize: missing populations, unexplored contexts, methodological limitations,\n\
           or contradictory findings that need resolution\n\n\
         Format your response as:\n\n\
         ## Overview\n[Your overview here with paper citations]\n\n\
         ## Evidence Gaps\n- [Most critical gap 1]\n- [Most critical gap 2]\netc. (3-5 maximum)",
        count = records.len(),
        context = papers_context.join("\n\n"),
    )
}

/// Split the model response into overview and gaps sections. An
/// unexpectedly-shaped response keeps the full text as the overview.
pub fn parse_synthesis(text: &str) -> Synthesis {
    if text.contains("## Overview") && text.contains("## Evidence Gaps") {
        let mut parts = text.splitn(2, "## Evidence Gaps");
        let overview = parts
            .next()
            .unwrap_or_default()
            .replace("## Overview", "")
            .trim()
            .to_string();
        let gaps = parts.next().unwrap_or_default().trim().to_string();
        Synthesis { overview, gaps }
    } else {
        Synthesis {
            overview: text.trim().to_string(),
            gaps: "Unable to parse evidence gaps from synthesis.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_well_formed_response() {
        let text = "## Overview\nFindings converge (Paper 1).\n\n## Evidence Gaps\n- No K-12 data";
        let synthesis = parse_synthesis(text);
        assert_eq!(synthesis.overview, "Findings converge (Paper 1).");
        assert_eq!(synthesis.gaps, "- No K-12 data");
    }

    #[test]
    fn parse_malformed_response_keeps_text() {
        let synthesis = parse_synthesis("just prose");
        assert_eq!(synthesis.overview, "just prose");
        assert!(synthesis.gaps.contains("Unable to parse"));
    }

    #[test]
    fn prompt_numbers_papers_and_fills_unreported() {
        let records = vec![
            FindingRecord {
                title: "First Study".into(),
                year: Some(2021),
                ..Default::default()
            },
            FindingRecord {
                title: "Second Study".into(),
                ..Default::default()
            },
        ];
        let prompt = build_prompt("Obj", "Out", &records);
        assert!(prompt.contains("Paper 1: First Study"));
        assert!(prompt.contains("Paper 2: Second Study"));
        assert!(prompt.contains("Year: N/A"));
        assert!(prompt.contains("the 2 papers"));
    }

    #[test]
    fn file_cache_round_trip_and_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileSynthesisCache::new(dir.path().join("synthesis.json"));

        assert!(cache.get("io", "out").unwrap().is_none());

        let first = CachedSynthesis {
            overview: "v1".into(),
            gaps: "g1".into(),
            generated_at: Utc::now(),
        };
        cache.put("io", "out", &first).unwrap();
        assert_eq!(cache.get("io", "out").unwrap().unwrap().overview, "v1");

        // Upsert replaces the prior value for the same key.
        let second = CachedSynthesis {
            overview: "v2".into(),
            gaps: "g2".into(),
            generated_at: Utc::now(),
        };
        cache.put("io", "out", &second).unwrap();
        assert_eq!(cache.get("io", "out").unwrap().unwrap().overview, "v2");

        // Other keys are untouched.
        cache.put("io", "other", &first).unwrap();
        assert_eq!(cache.get("io", "out").unwrap().unwrap().overview, "v2");
    }
}
