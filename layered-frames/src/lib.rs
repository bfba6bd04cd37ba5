#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]

//! Read-only lexical mapping tables for frame-based argument extraction.
//!
//! - [`FnVnMapping`] - FrameNet frame element to VerbNet role (SemLink)
//! - [`VnPbMapping`] - VerbNet role to PropBank argument (SemLink type map)
//! - [`FrameRelations`] - FrameNet frame-to-frame relations
//!
//! [`FrameResources`] bundles the three. It is loaded once and shared by
//! reference; loading fails as a whole if any table is unreadable.
//!
//! ```
//! use layered_frames::{FnVnMapping, FrameResources, VnPbMapping, FrameRelations};
//!
//! let mut fn_vn = FnVnMapping::new();
//! fn_vn.insert("Killing", "Killer", "42.1", "Agent");
//! let mut vn_pb = VnPbMapping::new();
//! vn_pb.insert("42.1", "Agent", "0");
//!
//! let resources = FrameResources::new(fn_vn, vn_pb, FrameRelations::new());
//! let role = resources.resolve("Killing", "Killer", false).unwrap();
//! assert_eq!(role.verbnet_role, "Agent");
//! assert_eq!(role.propbank_role.as_deref(), Some("ARG0"));
//! ```

mod error;
mod fn_vn;
mod frame_relations;
mod vn_pb;
mod xml;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use error::{MappingError, MappingResult};
pub use fn_vn::{FnVnMapping, VerbNetRole};
pub use frame_relations::{FrameElementRef, FrameRelation, FrameRelations};
pub use vn_pb::{base_class, VnPbMapping};

/// Roles found for one frame element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleResolution {
    pub verbnet_class: String,
    pub verbnet_role: String,
    pub propbank_role: Option<String>,
    /// Names of the super frame elements traversed, nearest first
    pub super_frame_elements: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct FrameResources {
    fn_vn: FnVnMapping,
    vn_pb: VnPbMapping,
    relations: FrameRelations,
}

impl FrameResources {
    pub fn new(fn_vn: FnVnMapping, vn_pb: VnPbMapping, relations: FrameRelations) -> Self {
        Self {
            fn_vn,
            vn_pb,
            relations,
        }
    }

    /// Resources with every table empty. Frame names are still assigned
    /// but no argument resolves.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load whichever tables have a path; absent ones stay empty.
    pub fn load(
        fn_vn: Option<&Path>,
        vn_pb: Option<&Path>,
        relations: Option<&Path>,
    ) -> MappingResult<Self> {
        Ok(Self {
            fn_vn: fn_vn.map(FnVnMapping::load).transpose()?.unwrap_or_default(),
            vn_pb: vn_pb.map(VnPbMapping::load).transpose()?.unwrap_or_default(),
            relations: relations
                .map(FrameRelations::load)
                .transpose()?
                .unwrap_or_default(),
        })
    }

    pub fn fn_vn(&self) -> &FnVnMapping {
        &self.fn_vn
    }

    pub fn vn_pb(&self) -> &VnPbMapping {
        &self.vn_pb
    }

    pub fn relations(&self) -> &FrameRelations {
        &self.relations
    }

    /// Map a frame element to VerbNet and PropBank roles.
    ///
    /// The direct mapping is tried first, then every super-frame chain in
    /// turn; within a chain the nearest mapped element wins. With
    /// `reduce_verbnet` the class is cut to its base before the PropBank
    /// lookup.
    pub fn resolve(&self, frame: &str, frame_element: &str, reduce_verbnet: bool) -> Option<RoleResolution> {
        if let Some(role) = self.fn_vn.roles(frame, frame_element).first() {
            return Some(self.resolution(role, Vec::new(), reduce_verbnet));
        }

        let start = FrameElementRef::new(frame, frame_element);
        for chain in self.relations.super_chains(&start) {
            for (depth, step) in chain.iter().enumerate() {
                if let Some(role) = self.fn_vn.roles(&step.frame, &step.element).first() {
                    let traversed = chain[..=depth].iter().map(|s| s.element.clone()).collect();
                    return Some(self.resolution(role, traversed, reduce_verbnet));
                }
            }
        }
        None
    }

    fn resolution(&self, role: &VerbNetRole, super_frame_elements: Vec<String>, reduce: bool) -> RoleResolution {
        let class = if reduce {
            base_class(&role.class)
        } else {
            role.class.as_str()
        };
        RoleResolution {
            verbnet_class: class.to_string(),
            verbnet_role: role.role.clone(),
            propbank_role: self.vn_pb.propbank_role(class, &role.role).map(str::to_string),
            super_frame_elements,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn resources() -> FrameResources {
        let mut fn_vn = FnVnMapping::new();
        fn_vn.insert("Intentionally_act", "Agent", "26.1-1", "Agent");
        fn_vn.insert("Hostile_encounter", "Side_1", "36.4", "Actor1");
        let mut vn_pb = VnPbMapping::new();
        vn_pb.insert("26.1", "Agent", "0");
        vn_pb.insert("26.1-1", "Agent", "1");
        let mut relations = FrameRelations::new();
        relations.insert(FrameRelation {
            relation_type: "Inheritance".into(),
            sub_frame: "Attack".into(),
            super_frame: "Intentionally_affect".into(),
            element_pairs: vec![("Assailant".into(), "Agent".into())],
        });
        relations.insert(FrameRelation {
            relation_type: "Inheritance".into(),
            sub_frame: "Intentionally_affect".into(),
            super_frame: "Intentionally_act".into(),
            element_pairs: vec![("Agent".into(), "Agent".into())],
        });
        FrameResources::new(fn_vn, vn_pb, relations)
    }

    #[test]
    fn resolves_through_super_frames() {
        let role = resources().resolve("Attack", "Assailant", false).unwrap();
        assert_eq!(role.verbnet_role, "Agent");
        assert_eq!(role.verbnet_class, "26.1-1");
        assert_eq!(role.propbank_role.as_deref(), Some("ARG1"));
        assert_eq!(role.super_frame_elements, vec!["Agent", "Agent"]);
    }

    #[test]
    fn reduction_changes_propbank_lookup() {
        let role = resources().resolve("Attack", "Assailant", true).unwrap();
        assert_eq!(role.verbnet_class, "26.1");
        assert_eq!(role.propbank_role.as_deref(), Some("ARG0"));
    }

    #[test]
    fn unmapped_element_resolves_to_nothing() {
        assert_eq!(resources().resolve("Attack", "Weapon", false), None);
        assert_eq!(FrameResources::empty().resolve("Attack", "Assailant", false), None);
    }

    #[test]
    fn load_from_files() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"<root><vncls class="42.1" fnframe="Killing"><roles><role fnrole="Victim" vnrole="Patient"/></roles></vncls></root>"#
        )
        .unwrap();
        let resources = FrameResources::load(Some(file.path()), None, None).unwrap();
        let role = resources.resolve("Killing", "Victim", false).unwrap();
        assert_eq!(role.verbnet_role, "Patient");
        assert_eq!(role.propbank_role, None);
    }

    #[test]
    fn missing_file_fails_the_whole_load() {
        let err = FrameResources::load(None, Some(Path::new("/nonexistent/typemap.xml")), None).unwrap_err();
        assert!(matches!(err, MappingError::Io { .. }));
    }
}
