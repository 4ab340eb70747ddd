//! @acp:module "Taxonomy"
//! @acp:summary "Fixed outcome, objective, and attribute enumerations used as query filters"
//! @acp:domain scoring
//! @acp:layer model
//!
//! These lists mirror the taxonomy nodes seeded into the property graph.
//! They are filters, never mutated by the engine.

/// The twelve outcome focus areas (problem-burden view entities).
pub const OUTCOMES: &[&str] = &[
    "Cognitive - Critical Thinking/Metacognitive skills",
    "Cognitive - Reading and writing literacy",
    "Cognitive - speaking, listening, and language fluency",
    "Cognitive - Mathematical numeracy",
    "Cognitive - Scientific Reasoning",
    "Behavioral - task and assignment efficiency",
    "Behavioral - study habits, concentration",
    "Behavioral - participation and social engagement",
    "Behavioral - productivity",
    "Affective - motivation",
    "Affective - engagement",
    "Affective - persistence",
];

/// The four implementation objectives (intervention-evidence view entities).
pub const IMPLEMENTATION_OBJECTIVES: &[&str] = &[
    "Intelligent Tutoring and Instruction",
    "AI-Enable Personalized Advising",
    "Institutional Decision-making",
    "AI-Enabled Learner Mobility",
];

/// Broadened objectives: coarser groupings covering technology-compatible
/// interventions beyond the AI-specific ones. Used only by the
/// rigor-filtered and temporal views.
pub const BROADENED_OBJECTIVES: &[&str] = &[
    "Tutoring and Instructional Technology",
    "Personalized Advising and Support",
    "Data-Informed Decision Systems",
    "Learner Mobility and Transitions",
];

/// User types as stored on paper nodes. The last entry is the full string
/// the extraction pipeline writes for policy-level work.
pub const USER_TYPES: &[&str] = &[
    "Student",
    "Educator",
    "Administrator",
    "Parent",
    "School",
    "Community",
    "Systematic: social/political level information",
];

/// Canonical study design names.
pub const STUDY_DESIGNS: &[&str] = &[
    "Randomized Control Trial",
    "Quasi-Experimental Design",
    "Meta-Analysis/Systematic Review",
    "Mixed-Methods Study",
    "Qualitative Study",
];

/// WWC rating string carried by the rigor-filtered corpus' strongest studies.
pub const WWC_HIGHEST_RATING: &str = "Meets WWC standards without reservations";

/// Ordinal burden weight for a user type: 1 = localized, 4 = systemic.
/// Returns `None` for unmapped values so they stay out of the average.
pub fn user_type_ordinal(user_type: &str) -> Option<u8> {
    match user_type {
        "Student" | "Educator" | "Administrator" | "Parent" => Some(1),
        "School" => Some(2),
        "Community" => Some(3),
        "Systemic" | "Systematic: social/political level information" => Some(4),
        _ => None,
    }
}

/// Design-strength points for a study design. Exact match on the canonical
/// names first, then a case-insensitive substring fallback in priority
/// order. Unrecognized designs score nothing and are excluded.
pub fn design_points(design: &str) -> Option<f64> {
    match design {
        "Randomized Control Trial" => return Some(25.0),
        "Meta-Analysis/Systematic Review" => return Some(20.0),
        "Quasi-Experimental Design" => return Some(15.0),
        "Correlational" => return Some(10.0),
        "Case Study" => return Some(5.0),
        _ => {}
    }
    let lower = design.to_lowercase();
    if lower.contains("randomized") || lower.contains("rct") {
        Some(25.0)
    } else if lower.contains("meta-analysis") || lower.contains("systematic review") {
        Some(20.0)
    } else if lower.contains("quasi") {
        Some(15.0)
    } else if lower.contains("correlational") {
        Some(10.0)
    } else if lower.contains("case") {
        Some(5.0)
    } else {
        None
    }
}

/// Points for a WWC study rating (rigor-filtered design-quality component).
/// Unrated studies get a middling default rather than being excluded.
pub fn wwc_rating_points(rating: Option<&str>) -> f64 {
    match rating {
        Some("Meets WWC standards without reservations") => 25.0,
        Some("Meets WWC standards with reservations") => 15.0,
        Some("Does not meet WWC standards") => 5.0,
        Some("Ineligible for WWC review") => 0.0,
        _ => 10.0,
    }
}
