use crate::dsl::ast::{compose, Ast, Node};
use crate::dsl::printer::pretty_print;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const DEFAULT_MIN_FREQUENCY: u64 = 2;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MacroEntry {
    pub pattern_source: String,
    pub frequency: u64,
    pub contexts: Vec<String>,
    pub success_rate: f64,
}

/// Frequency-counted library of sub-patterns extracted from successful programs:
/// the whole program, every `Compose` subsequence of length >= 2, and every
/// `Primitive` node with arguments. Keyed by pretty-printed source.
#[derive(Debug, Clone, Default)]
pub struct MacroLibrary {
    entries: HashMap<String, MacroEntry>,
    min_frequency: u64,
}

impl MacroLibrary {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            min_frequency: DEFAULT_MIN_FREQUENCY,
        }
    }

    /// Records every sub-pattern of `ast` under `context`, updating frequency and
    /// the running average success rate for patterns seen before.
    pub fn observe(&mut self, ast: &Ast, context: &str, success: bool) {
        for pattern in extract_patterns(ast) {
            let entry = self.entries.entry(pattern.clone()).or_insert_with(|| MacroEntry {
                pattern_source: pattern,
                frequency: 0,
                contexts: Vec::new(),
                success_rate: 0.0,
            });
            let n = entry.frequency as f64;
            entry.success_rate = (entry.success_rate * n + if success { 1.0 } else { 0.0 }) / (n + 1.0);
            entry.frequency += 1;
            if !entry.contexts.iter().any(|c| c == context) {
                entry.contexts.push(context.to_string());
            }
        }
    }

    /// Only macros seen at least `min_frequency` times are eligible for suggestion.
    pub fn suggestable(&self) -> Vec<&MacroEntry> {
        self.entries
            .values()
            .filter(|e| e.frequency >= self.min_frequency)
            .collect()
    }

    pub fn most_frequent(&self, top_k: usize) -> Vec<&MacroEntry> {
        let mut entries = self.suggestable();
        entries.sort_by(|a, b| {
            let score_a = a.frequency as f64 * a.success_rate;
            let score_b = b.frequency as f64 * b.success_rate;
            score_b
                .total_cmp(&score_a)
                .then_with(|| a.pattern_source.cmp(&b.pattern_source))
        });
        entries.truncate(top_k);
        entries
    }

    /// Substring matches of known macro patterns inside `program_source`.
    pub fn matches_in(&self, program_source: &str) -> Vec<&MacroEntry> {
        self.suggestable()
            .into_iter()
            .filter(|e| program_source.contains(&e.pattern_source))
            .collect()
    }

    /// Macros whose recorded contexts include `context` are boosted to the front.
    pub fn suggest_for_context(&self, context: &str, top_k: usize) -> Vec<&MacroEntry> {
        let mut entries = self.suggestable();
        entries.sort_by(|a, b| {
            let boost_a = a.contexts.iter().any(|c| c == context) as u8;
            let boost_b = b.contexts.iter().any(|c| c == context) as u8;
            let score_a = (boost_a as f64 + 1.0) * a.frequency as f64 * a.success_rate;
            let score_b = (boost_b as f64 + 1.0) * b.frequency as f64 * b.success_rate;
            score_b
                .total_cmp(&score_a)
                .then_with(|| a.pattern_source.cmp(&b.pattern_source))
        });
        entries.truncate(top_k);
        entries
    }

    pub fn export(&self) -> Vec<MacroEntry> {
        let mut entries: Vec<MacroEntry> = self.entries.values().cloned().collect();
        entries.sort_by(|a, b| a.pattern_source.cmp(&b.pattern_source));
        entries
    }

    pub fn import(&mut self, entries: Vec<MacroEntry>) {
        for entry in entries {
            self.entries.insert(entry.pattern_source.clone(), entry);
        }
    }
}

fn extract_patterns(ast: &Ast) -> Vec<String> {
    let mut patterns = vec![pretty_print(ast)];
    if let Node::Compose { operations } = ast.get(ast.root()) {
        for window_len in 2..=operations.len() {
            for start in 0..=(operations.len().saturating_sub(window_len)) {
                let window = &operations[start..start + window_len];
                if window.len() < 2 {
                    continue;
                }
                let fragment = compose(window.iter().map(|&id| ast.subtree(id)).collect());
                patterns.push(pretty_print(&fragment));
            }
        }
    }
    for id in ast.walk(ast.root()) {
        if let Node::Primitive { args, .. } = ast.get(id) {
            if !args.is_empty() {
                patterns.push(pretty_print(&ast.subtree(id)));
            }
        }
    }
    patterns.sort();
    patterns.dedup();
    patterns
}

/// Composes the top two suggested macros into a two-step `Compose` candidate, used
/// as an additional synthesis seed.
pub fn compose_suggested_pair(a: &Ast, b: &Ast) -> Ast {
    compose(vec![a.subtree(a.root()), b.subtree(b.root())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::ast::primitive;

    #[test]
    fn macro_becomes_suggestable_after_min_frequency() {
        let ast = compose(vec![primitive("identity", vec![]), primitive("reflect_h", vec![])]);
        let mut lib = MacroLibrary::new();
        lib.observe(&ast, "ctx", true);
        assert!(lib.suggestable().is_empty());
        lib.observe(&ast, "ctx", true);
        assert!(!lib.suggestable().is_empty());
    }

    #[test]
    fn matches_in_finds_substring_matches() {
        let ast = compose(vec![primitive("identity", vec![]), primitive("reflect_h", vec![])]);
        let mut lib = MacroLibrary::new();
        lib.observe(&ast, "ctx", true);
        lib.observe(&ast, "ctx", true);
        let matches = lib.matches_in("identity >> reflect_h >> rotate90");
        assert!(!matches.is_empty());
    }
}
