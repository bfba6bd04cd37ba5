//! VerbNet thematic role to PropBank argument mapping.
//!
//! Reads the SemLink type map:
//!
//! ```xml
//! <pbvn-typemap>
//!   <predicate lemma="kill">
//!     <argmap pb-roleset="kill.01" vn-class="42.1">
//!       <role pb-arg="0" vn-theta="Agent"/>
//!       <role pb-arg="1" vn-theta="Patient"/>
//!     </argmap>
//!   </predicate>
//! </pbvn-typemap>
//! ```

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use crate::{xml, MappingResult};

/// Class id without its subclass suffix: `13.5.1-1` becomes `13.5.1`.
pub fn base_class(class: &str) -> &str {
    class.split('-').next().unwrap_or(class)
}

/// `ARG`-prefixed PropBank argument name.
fn argument_name(pb_arg: &str) -> String {
    if pb_arg.to_ascii_uppercase().starts_with("ARG") {
        pb_arg.to_ascii_uppercase()
    } else {
        format!("ARG{}", pb_arg.to_ascii_uppercase())
    }
}

#[derive(Debug, Clone, Default)]
pub struct VnPbMapping {
    by_class_role: HashMap<(String, String), String>,
    /// First argument seen for a role across all classes
    by_role: HashMap<String, String>,
}

impl VnPbMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> MappingResult<Self> {
        let text = xml::read(path)?;
        Self::parse(&text, path)
    }

    pub fn parse(text: &str, path: &Path) -> MappingResult<Self> {
        let doc = xml::parse(text, path)?;
        let mut mapping = Self::new();
        for argmap in doc.descendants().filter(|n| n.has_tag_name("argmap")) {
            let class = xml::required(argmap, "vn-class", path)?;
            for role in argmap.children().filter(|n| n.has_tag_name("role")) {
                let arg = xml::required(role, "pb-arg", path)?;
                let theta = xml::required(role, "vn-theta", path)?;
                mapping.insert(class, theta, arg);
            }
        }
        debug!(path = %path.display(), entries = mapping.len(), "loaded VerbNet to PropBank roles");
        Ok(mapping)
    }

    /// Record `class/role -> pb_arg`. The first entry for a key wins.
    pub fn insert(&mut self, class: &str, role: &str, pb_arg: &str) {
        let name = argument_name(pb_arg);
        self.by_class_role
            .entry((class.to_string(), role.to_string()))
            .or_insert_with(|| name.clone());
        self.by_role.entry(role.to_string()).or_insert(name);
    }

    /// PropBank argument for a role of `class`, falling back to any class
    /// that maps the same role.
    pub fn propbank_role(&self, class: &str, role: &str) -> Option<&str> {
        self.by_class_role
            .get(&(class.to_string(), role.to_string()))
            .or_else(|| self.by_role.get(role))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_class_role.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_class_role.is_empty()
    }
}
