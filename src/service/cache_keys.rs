//! Cache key generation for explanation responses

use sha2::{Digest, Sha256};

use crate::service::prediction::prompts::{EXPLANATION_SYSTEM_PROMPT, build_explanation_prompt};

/// Generate the cache key hash for an explanation
///
/// The key covers the full prompt (system + user) and the model id, so a
/// prompt change or model switch never serves stale text.
pub fn generate_explanation_cache_key(
    claim_summary: &str,
    model_parameters: &str,
    model_id: &str,
) -> String {
    let prompt = build_explanation_prompt(claim_summary, model_parameters);
    let prompt_version = hash_string(&format!("{}\n{}", EXPLANATION_SYSTEM_PROMPT, prompt));

    hash_string(&format!("{}|{}", prompt_version, model_id))
}

fn hash_string(s: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(s.as_bytes());
    format!("{:x}", hasher.finalize())
}
