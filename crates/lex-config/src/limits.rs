//! Per-run retrieval limits.

use serde::{Deserialize, Serialize};

/// Default number of phrase-search citations handed to the model per call.
const fn default_phrase_limit() -> u32 {
    20
}

/// Default number of graph-traversal citations handed to the model per call.
const fn default_link_limit() -> u32 {
    20
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LimitsConfig {
    #[serde(default = "default_phrase_limit")]
    pub phrase_limit: u32,

    #[serde(default = "default_link_limit")]
    pub link_limit: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            phrase_limit: default_phrase_limit(),
            link_limit: default_link_limit(),
        }
    }
}
