// src/engine/refine.rs
// Prompt composition for the refinement workflow

/// Fold a refinement instruction into the prompt it refines.
///
/// `"Create a abstract painting."` + `"with more blue tones"` becomes
/// `"Create a abstract painting. Refinement: with more blue tones"`. Both parts are
/// expected to be trimmed and non-empty already.
pub fn merge_prompt(original: &str, refinement: &str) -> String {
    let original = original.trim().trim_end_matches('.').trim_end();
    format!("{}. Refinement: {}", original, refinement.trim())
}
