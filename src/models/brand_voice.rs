use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::store::Store;

pub const BRAND_VOICE_OPTION: &str = "brain_brand_voice";
const EXCERPT_CHARS: usize = 200;

/// The most recent brand voice analysis. Learning a new one replaces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandVoice {
    pub analysis: String,
    pub sample_excerpt: String,
    pub learned_at: String,
    pub learned_by: i64,
}

impl BrandVoice {
    pub fn new(analysis: &str, sample: &str, learned_by: i64) -> Self {
        BrandVoice {
            analysis: analysis.trim().to_string(),
            sample_excerpt: sample.trim().chars().take(EXCERPT_CHARS).collect(),
            learned_at: Utc::now().to_rfc3339(),
            learned_by,
        }
    }

    pub fn load(store: &dyn Store) -> Option<BrandVoice> {
        let raw = store.option_get(BRAND_VOICE_OPTION)?;
        serde_json::from_str(&raw)
            .map_err(|e| log::error!("[brand-voice] stored analysis is not valid JSON: {}", e))
            .ok()
    }

    pub fn save(&self, store: &dyn Store) -> Result<(), String> {
        let json = serde_json::to_string(self).map_err(|e| e.to_string())?;
        if store.option_update(BRAND_VOICE_OPTION, &json) {
            Ok(())
        } else {
            Err("Failed to save brand voice".into())
        }
    }
}
