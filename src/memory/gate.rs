use super::features::TaskFeatures;
use super::store::SolutionMemory;

const MEMORY_THRESHOLD: f64 = 0.8;
const ADAPT_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateMode {
    UseMemory,
    AdaptMemory,
    Hybrid,
    FreshSynthesis,
}

impl GateMode {
    pub fn as_str(self) -> &'static str {
        match self {
            GateMode::UseMemory => "USE_MEMORY",
            GateMode::AdaptMemory => "ADAPT_MEMORY",
            GateMode::Hybrid => "HYBRID",
            GateMode::FreshSynthesis => "FRESH_SYNTHESIS",
        }
    }
}

#[derive(Debug, Clone)]
pub struct GateDecision {
    pub mode: GateMode,
    pub confidence: f64,
    pub considered: Vec<(f64, SolutionMemory)>,
    pub suggested_primitives: Vec<String>,
    pub rationale: String,
}

const KNOWN_PRIMITIVE_NAMES: &[&str] = &[
    "identity",
    "crop_to_content",
    "rotate90",
    "reflect_h",
    "reflect_v",
    "transpose",
    "scale",
    "tile_h",
    "tile_v",
    "tile_repeat",
    "fill_background",
    "invert_mask",
    "recolor_map",
    "translate",
];

/// Given a task's features and its retrieved `(similarity, record)` candidates,
/// picks USE_MEMORY / ADAPT_MEMORY / HYBRID / FRESH_SYNTHESIS, in that priority order.
pub fn decide(_task_features: &TaskFeatures, retrieved: Vec<(f64, SolutionMemory)>) -> GateDecision {
    let mut retrieved = retrieved;
    retrieved.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.task_id.cmp(&b.1.task_id)));

    let top = retrieved.first();
    let mode = match top {
        Some((sim, record)) if *sim >= MEMORY_THRESHOLD && record.success => GateMode::UseMemory,
        Some((sim, _)) if *sim >= ADAPT_THRESHOLD => GateMode::AdaptMemory,
        _ if retrieved.iter().any(|(_, r)| r.success) => GateMode::Hybrid,
        _ => GateMode::FreshSynthesis,
    };

    let confidence = top.map(|(sim, _)| *sim).unwrap_or(0.0);

    let suggested_primitives: Vec<String> = retrieved
        .iter()
        .filter(|(_, r)| r.success)
        .take(3)
        .flat_map(|(_, r)| {
            KNOWN_PRIMITIVE_NAMES
                .iter()
                .filter(|name| r.program_source.contains(**name))
                .map(|name| name.to_string())
        })
        .collect::<std::collections::BTreeSet<_>>()
        .into_iter()
        .collect();

    let rationale = match mode {
        GateMode::UseMemory => format!("top similarity {confidence:.2} >= {MEMORY_THRESHOLD} on a successful solution"),
        GateMode::AdaptMemory => format!("top similarity {confidence:.2} >= {ADAPT_THRESHOLD}"),
        GateMode::Hybrid => "a retrieved solution succeeded despite low similarity".to_string(),
        GateMode::FreshSynthesis => "no usable retrieval; starting fresh".to_string(),
    };

    GateDecision {
        mode,
        confidence,
        considered: retrieved,
        suggested_primitives,
        rationale,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::features::TaskFeatures;

    fn record(success: bool, source: &str) -> SolutionMemory {
        SolutionMemory {
            task_id: "t".to_string(),
            program_source: source.to_string(),
            task_features: TaskFeatures::default(),
            success,
            robustness_score: 1.0,
            usage_count: 0,
            timestamp_ms: 0,
        }
    }

    #[test]
    fn high_similarity_success_uses_memory() {
        let decision = decide(&TaskFeatures::default(), vec![(0.9, record(true, "identity"))]);
        assert_eq!(decision.mode, GateMode::UseMemory);
    }

    #[test]
    fn no_candidates_is_fresh_synthesis() {
        let decision = decide(&TaskFeatures::default(), vec![]);
        assert_eq!(decision.mode, GateMode::FreshSynthesis);
    }

    #[test]
    fn low_similarity_success_is_hybrid() {
        let decision = decide(&TaskFeatures::default(), vec![(0.2, record(true, "identity"))]);
        assert_eq!(decision.mode, GateMode::Hybrid);
    }
}
