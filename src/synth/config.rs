use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    pub max_depth: usize,
    pub beam_width: usize,
    pub max_iterations: usize,
    pub timeout_seconds: f64,
    pub use_dimension_pruning: bool,
    pub use_palette_pruning: bool,
    pub use_object_count_pruning: bool,
    pub use_constraint_set: bool,
    pub min_pixel_accuracy: f64,
    pub enable_refinement: bool,
    pub near_miss_threshold: f64,
    pub top_k_near_miss: usize,
    pub max_refinement_iterations: usize,
    pub use_mal: bool,
    pub mal_top_k: usize,
    pub write_traces: bool,
    pub trace_dir: String,
    pub use_wme: bool,
    pub wme_robustness_weight: f64,
    pub wme_length_weight: f64,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            max_depth: 4,
            beam_width: 50,
            max_iterations: 1000,
            timeout_seconds: 30.0,
            use_dimension_pruning: true,
            use_palette_pruning: true,
            use_object_count_pruning: false,
            use_constraint_set: true,
            min_pixel_accuracy: 0.0,
            enable_refinement: true,
            near_miss_threshold: 30.0,
            top_k_near_miss: 5,
            max_refinement_iterations: 20,
            use_mal: false,
            mal_top_k: 5,
            write_traces: false,
            trace_dir: "traces".to_string(),
            use_wme: false,
            wme_robustness_weight: 0.1,
            wme_length_weight: 0.05,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_configuration_surface() {
        let config = SynthesisConfig::default();
        assert_eq!(config.max_depth, 4);
        assert_eq!(config.beam_width, 50);
        assert_eq!(config.max_iterations, 1000);
        assert!(config.use_dimension_pruning);
        assert!(config.use_palette_pruning);
        assert!(!config.use_object_count_pruning);
        assert!(config.use_constraint_set);
        assert!(config.enable_refinement);
        assert_eq!(config.near_miss_threshold, 30.0);
        assert_eq!(config.top_k_near_miss, 5);
    }
}
