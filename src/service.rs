//! @acp:module "Evidence Map Service"
//! @acp:summary "Request-level orchestration of scoring, aggregation, and synthesis"
//! @acp:domain scoring
//! @acp:layer api
//!
//! One service instance owns its collaborators (record store, synthesis
//! cache, synthesis generator), injected at construction. Every view is
//! recomputed from the store per request; the engine holds no bubble cache.

use std::collections::{BTreeSet, HashMap};

use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};

use crate::bubble::{
    assemble_intervention_bubbles, assemble_objective_bubbles, assemble_outcome_bubbles,
    assemble_rigor_bubbles, Bubble, LevelData,
};
use crate::config::Config;
use crate::error::{EvmapError, Result};
use crate::evolution::{evolution_series, TimeSeriesPoint};
use crate::record::FindingRecord;
use crate::score::burden::problem_scale;
use crate::store::{JsonStore, RecordFetcher, RecordFilter};
use crate::synthesis::{
    AnthropicGenerator, CachedSynthesis, FileSynthesisCache, SynthesisCache, SynthesisGenerator,
};
use crate::taxonomy::{BROADENED_OBJECTIVES, IMPLEMENTATION_OBJECTIVES, OUTCOMES};

/// One assembled view: bubbles plus axis metadata for the renderer.
#[derive(Debug, Clone, Serialize)]
pub struct BubbleMap {
    pub bubbles: Vec<Bubble>,
    pub metadata: Value,
}

/// Evolution series for one broadened objective or one intervention.
#[derive(Debug, Clone, Serialize)]
pub struct EvolutionSeries {
    pub id: String,
    pub label: String,
    pub series: Vec<TimeSeriesPoint>,
}

/// One cell of the objective × outcome evidence matrix.
#[derive(Debug, Clone, Serialize)]
pub struct MatrixCell {
    pub implementation_objective: String,
    pub outcome: String,
    pub count: usize,
}

/// The scoring engine behind every view level.
pub struct EvidenceMapService {
    config: Config,
    store: Box<dyn RecordFetcher>,
    cache: Box<dyn SynthesisCache>,
    generator: Box<dyn SynthesisGenerator>,
}

impl EvidenceMapService {
    /// Construct with explicit collaborators.
    pub fn new(
        config: Config,
        store: Box<dyn RecordFetcher>,
        cache: Box<dyn SynthesisCache>,
        generator: Box<dyn SynthesisGenerator>,
    ) -> Self {
        Self {
            config,
            store,
            cache,
            generator,
        }
    }

    /// Construct the default stack from config: JSON snapshot store, file
    /// synthesis cache, Anthropic generator.
    pub fn from_config(config: Config) -> Result<Self> {
        let store = JsonStore::open(&config.store)?;
        let cache = FileSynthesisCache::new(&config.synthesis_cache);
        let generator = AnthropicGenerator::new(config.synthesis.clone());
        Ok(Self::new(
            config,
            Box::new(store),
            Box::new(cache),
            Box::new(generator),
        ))
    }

    // ===== Problem burden map (outcome-centric) =====

    /// One bubble per outcome: x = evidence maturity, y = problem burden
    /// scale, size = effort required.
    pub fn problem_burden_map(&self) -> Result<BubbleMap> {
        let datasets = self.outcome_datasets()?;
        let LevelData { bubbles, median_y } =
            assemble_outcome_bubbles(&datasets, &self.config.scoring);

        let metadata = json!({
            "x_axis": {
                "label": "Evidence Maturity",
                "description": "How well-understood this problem is (0-100 composite score)",
            },
            "y_axis": {
                "label": "Problem Burden Scale",
                "description": "Scope of impact (1 = localized, 4 = systemic)",
                "median": median_y,
            },
            "bubble_size": {
                "label": "Effort Required",
                "description": "Effort to meaningfully shift this problem",
            },
        });
        Ok(BubbleMap { bubbles, metadata })
    }

    // ===== Intervention evidence map (objective-centric) =====

    /// One bubble per implementation objective: x = evidence maturity,
    /// y = potential impact, size = R&D required. The outcome-centric
    /// dataset is computed once here and its burden scales injected into
    /// the impact calculation.
    pub fn intervention_map(&self) -> Result<BubbleMap> {
        let outcome_scales = self.outcome_scales()?;

        let mut datasets = Vec::with_capacity(IMPLEMENTATION_OBJECTIVES.len());
        for objective in IMPLEMENTATION_OBJECTIVES {
            let records = self
                .store
                .query(&RecordFilter::Objective(objective.to_string()))?;
            datasets.push((objective.to_string(), records));
        }

        let LevelData { bubbles, median_y } = assemble_objective_bubbles(
            &datasets,
            &outcome_scales,
            &self.config.investments,
            &self.config.scoring,
        );

        let metadata = json!({
            "x_axis": {
                "label": "Evidence Maturity",
                "description": "Quality and reliability of intervention evidence (0-100)",
            },
            "y_axis": {
                "label": "Potential Impact",
                "description": "Alignment to high-burden problems",
                "median": median_y,
            },
            "bubble_size": {
                "label": "R&D Investment Required",
                "description": "Investment needed to move pathway to field-ready use",
            },
            "investments": &self.config.investments,
        });
        Ok(BubbleMap { bubbles, metadata })
    }

    // ===== Rigor-filtered map (broadened objectives) =====

    /// One bubble per broadened objective over the rigor-filtered corpus:
    /// x = evidence quality, y = generalizability, size = student reach.
    pub fn rigor_map(&self) -> Result<BubbleMap> {
        let mut datasets = Vec::with_capacity(BROADENED_OBJECTIVES.len());
        for objective in BROADENED_OBJECTIVES {
            let records = self.store.query(&RecordFilter::Broadened {
                objective: objective.to_string(),
                rigor_only: true,
            })?;
            datasets.push((objective.to_string(), records));
        }

        let LevelData { bubbles, median_y } =
            assemble_rigor_bubbles(&datasets, &self.config.scoring);

        let metadata = json!({
            "x_axis": {
                "label": "Evidence Quality",
                "description": "Quality of rigorously evaluated evidence (0-100 composite score)",
            },
            "y_axis": {
                "label": "Generalizability",
                "description": "Diversity of contexts with rigorous evidence",
                "median": median_y,
            },
            "bubble_size": {
                "label": "Students Reached",
                "description": "Deduplicated students across distinct studies (thousands)",
            },
        });
        Ok(BubbleMap { bubbles, metadata })
    }

    /// One bubble per individual intervention within a broadened objective.
    pub fn intervention_drilldown(&self, objective: &str) -> Result<BubbleMap> {
        require_member("broadened objective", objective, BROADENED_OBJECTIVES)?;

        let catalog = self.store.interventions(objective)?;
        let mut datasets = Vec::with_capacity(catalog.len());
        for intervention in &catalog {
            let records = self.store.query(&RecordFilter::Intervention {
                objective: objective.to_string(),
                intervention_id: intervention.id.clone(),
            })?;
            datasets.push((intervention.id.clone(), intervention.name.clone(), records));
        }

        let LevelData { bubbles, median_y } =
            assemble_intervention_bubbles(&datasets, &self.config.scoring);

        let metadata = json!({
            "broadened_objective": objective,
            "x_axis": { "label": "Evidence Quality", "median": Value::Null },
            "y_axis": { "label": "Generalizability", "median": median_y },
            "bubble_size": { "label": "Students Reached" },
        });
        Ok(BubbleMap { bubbles, metadata })
    }

    // ===== Temporal evolution =====

    /// Cumulative-evidence series for one broadened objective.
    pub fn evolution(&self, objective: &str) -> Result<EvolutionSeries> {
        require_member("broadened objective", objective, BROADENED_OBJECTIVES)?;
        let records = self.store.query(&RecordFilter::Broadened {
            objective: objective.to_string(),
            rigor_only: true,
        })?;
        Ok(EvolutionSeries {
            id: objective.to_string(),
            label: objective.to_string(),
            series: evolution_series(&records, &self.config.evolution),
        })
    }

    /// The same aggregation repeated per intervention within the
    /// objective, restricted through the intervention's study mapping.
    pub fn evolution_by_intervention(&self, objective: &str) -> Result<Vec<EvolutionSeries>> {
        require_member("broadened objective", objective, BROADENED_OBJECTIVES)?;
        let catalog = self.store.interventions(objective)?;
        let mut all = Vec::with_capacity(catalog.len());
        for intervention in catalog {
            let records = self.store.query(&RecordFilter::Intervention {
                objective: objective.to_string(),
                intervention_id: intervention.id.clone(),
            })?;
            all.push(EvolutionSeries {
                id: intervention.id,
                label: intervention.name,
                series: evolution_series(&records, &self.config.evolution),
            });
        }
        Ok(all)
    }

    // ===== Evidence matrix =====

    /// Paper counts for every objective × outcome cell, zero-filled.
    pub fn matrix(&self) -> Result<Vec<MatrixCell>> {
        let mut cells = Vec::with_capacity(IMPLEMENTATION_OBJECTIVES.len() * OUTCOMES.len());
        for objective in IMPLEMENTATION_OBJECTIVES {
            let records = self
                .store
                .query(&RecordFilter::Objective(objective.to_string()))?;
            for outcome in OUTCOMES {
                let count = records
                    .iter()
                    .filter(|r| r.outcome.as_deref() == Some(*outcome))
                    .map(|r| r.title.as_str())
                    .collect::<BTreeSet<_>>()
                    .len();
                cells.push(MatrixCell {
                    implementation_objective: objective.to_string(),
                    outcome: outcome.to_string(),
                    count,
                });
            }
        }
        Ok(cells)
    }

    /// All records for one objective × outcome cell.
    pub fn cell_records(&self, objective: &str, outcome: &str) -> Result<Vec<FindingRecord>> {
        require_member("implementation objective", objective, IMPLEMENTATION_OBJECTIVES)?;
        require_member("outcome", outcome, OUTCOMES)?;
        let records = self
            .store
            .query(&RecordFilter::Objective(objective.to_string()))?;
        Ok(records
            .into_iter()
            .filter(|r| r.outcome.as_deref() == Some(outcome))
            .collect())
    }

    /// Cached-or-generated synthesis for one cell. With `force_regenerate`
    /// the cache is bypassed and the fresh result always overwrites any
    /// prior entry.
    pub fn cell_synthesis(
        &self,
        objective: &str,
        outcome: &str,
        force_regenerate: bool,
    ) -> Result<CachedSynthesis> {
        if !force_regenerate {
            if let Some(cached) = self.cache.get(objective, outcome)? {
                tracing::debug!(%objective, %outcome, "synthesis cache hit");
                return Ok(cached);
            }
        }

        let records = self.cell_records(objective, outcome)?;
        let synthesis = self.generator.generate(objective, outcome, &records);
        let entry = CachedSynthesis {
            overview: synthesis.overview,
            gaps: synthesis.gaps,
            generated_at: Utc::now(),
        };
        self.cache.put(objective, outcome, &entry)?;
        Ok(entry)
    }

    // ===== Shared =====

    fn outcome_datasets(&self) -> Result<Vec<(String, Vec<FindingRecord>)>> {
        let mut datasets = Vec::with_capacity(OUTCOMES.len());
        for outcome in OUTCOMES {
            let records = self
                .store
                .query(&RecordFilter::Outcome(outcome.to_string()))?;
            datasets.push((outcome.to_string(), records));
        }
        Ok(datasets)
    }

    /// Burden scale per outcome with at least one record, computed once
    /// per request and injected wherever potential impact is needed.
    fn outcome_scales(&self) -> Result<HashMap<String, f64>> {
        let mut scales = HashMap::new();
        for (outcome, records) in self.outcome_datasets()? {
            if !records.is_empty() {
                scales.insert(outcome, problem_scale(&records));
            }
        }
        Ok(scales)
    }
}

fn require_member(kind: &'static str, name: &str, members: &[&str]) -> Result<()> {
    if members.contains(&name) {
        Ok(())
    } else {
        Err(EvmapError::UnknownTaxonomy {
            kind,
            name: name.to_string(),
        })
    }
}
