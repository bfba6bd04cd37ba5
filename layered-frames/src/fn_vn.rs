//! FrameNet frame element to VerbNet thematic role mapping.
//!
//! Reads the SemLink role mapping:
//!
//! ```xml
//! <verbnet-framenet_RoleMappings>
//!   <vncls class="10.1" fnframe="Removing">
//!     <roles>
//!       <role fnrole="Agent" vnrole="Agent"/>
//!       <role fnrole="Theme" vnrole="Theme"/>
//!     </roles>
//!   </vncls>
//! </verbnet-framenet_RoleMappings>
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{xml, MappingResult};

/// A VerbNet role within a specific class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VerbNetRole {
    pub class: String,
    pub role: String,
}

/// `(frame, frame element) -> VerbNet roles`, in file order.
#[derive(Debug, Clone, Default)]
pub struct FnVnMapping {
    roles: HashMap<(String, String), Vec<VerbNetRole>>,
}

impl FnVnMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> MappingResult<Self> {
        let text = xml::read(path)?;
        Self::parse(&text, path)
    }

    /// Parse mapping XML; `path` is used for error reporting only.
    pub fn parse(text: &str, path: &Path) -> MappingResult<Self> {
        let doc = xml::parse(text, path)?;
        let mut mapping = Self::new();
        for class in doc.descendants().filter(|n| n.has_tag_name("vncls")) {
            let class_id = xml::required(class, "class", path)?;
            let frame = xml::required(class, "fnframe", path)?;
            for role in class.descendants().filter(|n| n.has_tag_name("role")) {
                let fe = xml::required(role, "fnrole", path)?;
                let vn = xml::required(role, "vnrole", path)?;
                mapping.insert(frame, fe, class_id, vn);
            }
        }
        debug!(path = %path.display(), entries = mapping.len(), "loaded FrameNet to VerbNet roles");
        Ok(mapping)
    }

    pub fn insert(&mut self, frame: &str, frame_element: &str, class: &str, role: &str) {
        let entry = VerbNetRole {
            class: class.to_string(),
            role: role.to_string(),
        };
        let roles = self
            .roles
            .entry((frame.to_string(), frame_element.to_string()))
            .or_default();
        if !roles.contains(&entry) {
            roles.push(entry);
        }
    }

    pub fn roles(&self, frame: &str, frame_element: &str) -> &[VerbNetRole] {
        self.roles
            .get(&(frame.to_string(), frame_element.to_string()))
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Number of mapped frame elements.
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MappingError;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE verbnet-framenet_RoleMappings SYSTEM "vn-fnRoles.dtd">
<verbnet-framenet_RoleMappings>
  <vncls class="10.1" fnframe="Removing">
    <roles>
      <role fnrole="Agent" vnrole="Agent"/>
      <role fnrole="Theme" vnrole="Theme"/>
    </roles>
  </vncls>
  <vncls class="42.1" fnframe="Killing">
    <roles>
      <role fnrole="Killer" vnrole="Agent"/>
      <role fnrole="Victim" vnrole="Patient"/>
    </roles>
  </vncls>
  <vncls class="42.2" fnframe="Killing">
    <roles>
      <role fnrole="Killer" vnrole="Agent"/>
    </roles>
  </vncls>
</verbnet-framenet_RoleMappings>"#;

    #[test]
    fn roles_are_keyed_by_frame_and_element() {
        let mapping = FnVnMapping::parse(SAMPLE, Path::new("sample.xml")).unwrap();
        assert_eq!(mapping.len(), 4);
        assert_eq!(
            mapping.roles("Killing", "Victim"),
            &[VerbNetRole {
                class: "42.1".into(),
                role: "Patient".into()
            }]
        );
        let killer: Vec<_> = mapping
            .roles("Killing", "Killer")
            .iter()
            .map(|r| r.class.as_str())
            .collect();
        assert_eq!(killer, vec!["42.1", "42.2"]);
        assert!(mapping.roles("Attack", "Assailant").is_empty());
    }

    #[test]
    fn missing_attribute_is_reported() {
        let text = r#"<root><vncls class="1"><roles/></vncls></root>"#;
        match FnVnMapping::parse(text, Path::new("bad.xml")) {
            Err(MappingError::MissingAttribute { element, attribute, .. }) => {
                assert_eq!(element, "vncls");
                assert_eq!(attribute, "fnframe");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn malformed_xml_is_reported() {
        assert!(matches!(
            FnVnMapping::parse("<root><vncls>", Path::new("bad.xml")),
            Err(MappingError::Xml { .. })
        ));
    }
}
