//! Pipeline configuration.
//!
//! ```toml
//! target_event_type = "attack"
//! reduce_verbnet = true
//! adjacency_slack = 1
//! fn_vn_mapping = "data/vn-fn-roles.xml"
//! vn_pb_mapping = "data/type_map.xml"
//! frame_relations = "data/frRelation.xml"
//! number_rules = "data/numbers.tsv"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::{PipelineError, PipelineResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AplConfig {
    /// Event type whose conjoined mentions share agents and patients
    pub target_event_type: String,
    /// Cut VerbNet class ids to their base class before PropBank lookup
    pub reduce_verbnet: bool,
    /// Words allowed between a noun phrase and the event it precedes, minus one
    pub adjacency_slack: usize,
    pub fn_vn_mapping: Option<PathBuf>,
    pub vn_pb_mapping: Option<PathBuf>,
    pub frame_relations: Option<PathBuf>,
    pub number_rules: Option<PathBuf>,
}

impl Default for AplConfig {
    fn default() -> Self {
        Self {
            target_event_type: "event".to_string(),
            reduce_verbnet: false,
            adjacency_slack: 1,
            fn_vn_mapping: None,
            vn_pb_mapping: None,
            frame_relations: None,
            number_rules: None,
        }
    }
}

impl AplConfig {
    pub fn from_toml_str(text: &str, path: &Path) -> PipelineResult<Self> {
        toml::from_str(text).map_err(|source| {
            error!(path = %path.display(), %source, "invalid pipeline configuration");
            PipelineError::Config {
                path: path.to_path_buf(),
                source,
            }
        })
    }

    pub fn load(path: &Path) -> PipelineResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| {
            error!(path = %path.display(), %source, "cannot read pipeline configuration");
            PipelineError::ConfigIo {
                path: path.to_path_buf(),
                source,
            }
        })?;
        Self::from_toml_str(&text, path)
    }
}
