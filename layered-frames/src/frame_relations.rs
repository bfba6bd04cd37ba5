//! FrameNet frame-to-frame relations.
//!
//! Reads `frRelation.xml`. Elements live in the FrameNet namespace and are
//! matched by local name:
//!
//! ```xml
//! <frameRelations xmlns="http://framenet.icsi.berkeley.edu">
//!   <frameRelationType name="Inheritance" superFrameName="Parent" subFrameName="Child">
//!     <frameRelation subFrameName="Attack" superFrameName="Intentionally_affect">
//!       <FERelation subFEName="Assailant" superFEName="Agent"/>
//!     </frameRelation>
//!   </frameRelationType>
//! </frameRelations>
//! ```

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{xml, MappingResult};

/// A frame element of a named frame.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameElementRef {
    pub frame: String,
    pub element: String,
}

impl FrameElementRef {
    pub fn new(frame: &str, element: &str) -> Self {
        Self {
            frame: frame.to_string(),
            element: element.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRelation {
    /// `Inheritance`, `Using`, `Subframe`, ...
    pub relation_type: String,
    pub sub_frame: String,
    pub super_frame: String,
    /// `(sub FE, super FE)` pairs
    pub element_pairs: Vec<(String, String)>,
}

#[derive(Debug, Clone, Default)]
pub struct FrameRelations {
    relations: Vec<FrameRelation>,
    by_sub_frame: HashMap<String, Vec<usize>>,
}

impl FrameRelations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> MappingResult<Self> {
        let text = xml::read(path)?;
        Self::parse(&text, path)
    }

    pub fn parse(text: &str, path: &Path) -> MappingResult<Self> {
        let doc = xml::parse(text, path)?;
        let mut relations = Self::new();
        for relation_type in doc.descendants().filter(|n| n.has_tag_name("frameRelationType")) {
            let type_name = xml::required(relation_type, "name", path)?;
            for relation in relation_type
                .children()
                .filter(|n| n.has_tag_name("frameRelation"))
            {
                let sub_frame = xml::required(relation, "subFrameName", path)?;
                let super_frame = xml::required(relation, "superFrameName", path)?;
                let mut element_pairs = Vec::new();
                for fe in relation.children().filter(|n| n.has_tag_name("FERelation")) {
                    element_pairs.push((
                        xml::required(fe, "subFEName", path)?.to_string(),
                        xml::required(fe, "superFEName", path)?.to_string(),
                    ));
                }
                relations.insert(FrameRelation {
                    relation_type: type_name.to_string(),
                    sub_frame: sub_frame.to_string(),
                    super_frame: super_frame.to_string(),
                    element_pairs,
                });
            }
        }
        debug!(path = %path.display(), relations = relations.len(), "loaded frame relations");
        Ok(relations)
    }

    pub fn insert(&mut self, relation: FrameRelation) {
        self.by_sub_frame
            .entry(relation.sub_frame.clone())
            .or_default()
            .push(self.relations.len());
        self.relations.push(relation);
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }

    /// Frame elements one relation step above `start`, across every relation type.
    pub fn parents(&self, start: &FrameElementRef) -> Vec<FrameElementRef> {
        let mut found = Vec::new();
        for &idx in self.by_sub_frame.get(&start.frame).into_iter().flatten() {
            let relation = &self.relations[idx];
            for (sub, sup) in &relation.element_pairs {
                if sub == &start.element {
                    let parent = FrameElementRef::new(&relation.super_frame, sup);
                    if !found.contains(&parent) {
                        found.push(parent);
                    }
                }
            }
        }
        found
    }

    /// Every maximal chain of super frame elements above `start`.
    ///
    /// Each chain lists the elements from the nearest parent upwards and
    /// excludes `start`. Elements already on the current path are not
    /// revisited, so cyclic data terminates.
    pub fn super_chains(&self, start: &FrameElementRef) -> Vec<Vec<FrameElementRef>> {
        let mut chains = Vec::new();
        let mut path = Vec::new();
        let mut on_path = HashSet::new();
        on_path.insert(start.clone());
        self.walk(start, &mut path, &mut on_path, &mut chains);
        chains
    }

    fn walk(
        &self,
        node: &FrameElementRef,
        path: &mut Vec<FrameElementRef>,
        on_path: &mut HashSet<FrameElementRef>,
        chains: &mut Vec<Vec<FrameElementRef>>,
    ) {
        let parents: Vec<_> = self
            .parents(node)
            .into_iter()
            .filter(|p| !on_path.contains(p))
            .collect();
        if parents.is_empty() {
            if !path.is_empty() {
                chains.push(path.clone());
            }
            return;
        }
        for parent in parents {
            on_path.insert(parent.clone());
            path.push(parent.clone());
            self.walk(&parent, path, on_path, chains);
            path.pop();
            on_path.remove(&parent);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<frameRelations xmlns="http://framenet.icsi.berkeley.edu">
  <frameRelationType name="Inheritance" superFrameName="Parent" subFrameName="Child">
    <frameRelation subFrameName="Attack" superFrameName="Intentionally_affect">
      <FERelation subFEName="Assailant" superFEName="Agent"/>
      <FERelation subFEName="Victim" superFEName="Patient"/>
    </frameRelation>
    <frameRelation subFrameName="Intentionally_affect" superFrameName="Intentionally_act">
      <FERelation subFEName="Agent" superFEName="Agent"/>
    </frameRelation>
  </frameRelationType>
  <frameRelationType name="Using" superFrameName="Parent" subFrameName="Child">
    <frameRelation subFrameName="Attack" superFrameName="Hostile_encounter">
      <FERelation subFEName="Assailant" superFEName="Side_1"/>
    </frameRelation>
  </frameRelationType>
</frameRelations>"#;

    fn relations() -> FrameRelations {
        FrameRelations::parse(SAMPLE, Path::new("frRelation.xml")).unwrap()
    }

    #[test]
    fn namespaced_elements_are_read() {
        let relations = relations();
        assert_eq!(relations.len(), 3);
        assert_eq!(
            relations.parents(&FrameElementRef::new("Attack", "Assailant")),
            vec![
                FrameElementRef::new("Intentionally_affect", "Agent"),
                FrameElementRef::new("Hostile_encounter", "Side_1"),
            ]
        );
    }

    #[test]
    fn all_chains_across_relation_types() {
        let chains = relations().super_chains(&FrameElementRef::new("Attack", "Assailant"));
        assert_eq!(
            chains,
            vec![
                vec![
                    FrameElementRef::new("Intentionally_affect", "Agent"),
                    FrameElementRef::new("Intentionally_act", "Agent"),
                ],
                vec![FrameElementRef::new("Hostile_encounter", "Side_1")],
            ]
        );
    }

    #[test]
    fn cycles_terminate() {
        let mut relations = FrameRelations::new();
        for (sub, sup) in [("A", "B"), ("B", "A")] {
            relations.insert(FrameRelation {
                relation_type: "Inheritance".into(),
                sub_frame: sub.into(),
                super_frame: sup.into(),
                element_pairs: vec![("X".into(), "X".into())],
            });
        }
        let chains = relations.super_chains(&FrameElementRef::new("A", "X"));
        assert_eq!(chains, vec![vec![FrameElementRef::new("B", "X")]]);
    }

    #[test]
    fn element_without_parents_has_no_chains() {
        assert!(relations()
            .super_chains(&FrameElementRef::new("Attack", "Weapon"))
            .is_empty());
    }
}
