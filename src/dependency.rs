//! Backend-neutral dependency graphs.
//!
//! Two parser backends feed the pipeline: a Stanford-style basic dependency
//! parse and a Fanse-style parse that additionally carries PropBank-like
//! semantic relations (`ARG0`, `ARG1-INVERTED`, ...). Both are ingested into
//! the same [`DependencyGraph`] shape so every rule walks them uniformly.

use serde::{Deserialize, Serialize};

use crate::{AnnotationError, AnnotationResult, Span};

/// Which parser produced a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DependencyBackend {
    Stanford,
    Fanse,
}

/// Handle of a node inside one [`DependencyGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

/// A token as seen by a parser. Its span usually, but not always, matches a word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyNode {
    pub span: Span,
}

/// A labelled `head -> child` edge. `head == None` is the sentence root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub head: Option<NodeId>,
    pub child: NodeId,
    pub relation: String,
}

impl DependencyEdge {
    pub fn is_root(&self) -> bool {
        self.head.is_none() || self.relation.eq_ignore_ascii_case("root")
    }
}

/// A predicate-argument edge from a semantic role labeller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemanticRelation {
    pub predicate: NodeId,
    pub argument: NodeId,
    pub label: String,
}

/// Nodes, labelled edges and semantic relations of one backend.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    nodes: Vec<DependencyNode>,
    edges: Vec<DependencyEdge>,
    semantic: Vec<SemanticRelation>,
    /// child node -> indices into `edges`
    incoming: Vec<Vec<usize>>,
    /// head node -> indices into `edges`
    outgoing: Vec<Vec<usize>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, span: Span) -> NodeId {
        self.nodes.push(DependencyNode { span });
        self.incoming.push(Vec::new());
        self.outgoing.push(Vec::new());
        NodeId(self.nodes.len() - 1)
    }

    pub fn add_edge(
        &mut self,
        head: Option<NodeId>,
        child: NodeId,
        relation: impl Into<String>,
    ) -> AnnotationResult<()> {
        self.check(child)?;
        if let Some(head) = head {
            self.check(head)?;
        }
        let idx = self.edges.len();
        self.edges.push(DependencyEdge {
            head,
            child,
            relation: relation.into(),
        });
        self.incoming[child.0].push(idx);
        if let Some(head) = head {
            self.outgoing[head.0].push(idx);
        }
        Ok(())
    }

    pub fn add_semantic_relation(
        &mut self,
        predicate: NodeId,
        argument: NodeId,
        label: impl Into<String>,
    ) -> AnnotationResult<()> {
        self.check(predicate)?;
        self.check(argument)?;
        self.semantic.push(SemanticRelation {
            predicate,
            argument,
            label: label.into(),
        });
        Ok(())
    }

    fn check(&self, id: NodeId) -> AnnotationResult<()> {
        if id.0 < self.nodes.len() {
            Ok(())
        } else {
            Err(AnnotationError::UnknownNode(id))
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&DependencyNode> {
        self.nodes.get(id.0)
    }

    pub fn span(&self, id: NodeId) -> Option<Span> {
        self.node(id).map(|node| node.span)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &DependencyNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    pub fn edges(&self) -> &[DependencyEdge] {
        &self.edges
    }

    pub fn semantic_relations(&self) -> &[SemanticRelation] {
        &self.semantic
    }

    /// Edges in which `child` is the dependent.
    pub fn head_edges(&self, child: NodeId) -> impl Iterator<Item = &DependencyEdge> {
        self.incoming
            .get(child.0)
            .into_iter()
            .flatten()
            .map(move |&idx| &self.edges[idx])
    }

    /// Edges in which `head` is the governor.
    pub fn child_edges(&self, head: NodeId) -> impl Iterator<Item = &DependencyEdge> {
        self.outgoing
            .get(head.0)
            .into_iter()
            .flatten()
            .map(move |&idx| &self.edges[idx])
    }

    /// Governor of `child` through its first non-root edge.
    pub fn parent(&self, child: NodeId) -> Option<NodeId> {
        self.head_edges(child).find_map(|edge| edge.head)
    }

    /// Children of `head` whose relation label satisfies `accept`.
    pub fn children_where<'a, F>(&'a self, head: NodeId, accept: F) -> impl Iterator<Item = NodeId> + 'a
    where
        F: Fn(&str) -> bool + 'a,
    {
        self.child_edges(head)
            .filter(move |edge| accept(&edge.relation))
            .map(|edge| edge.child)
    }

    /// First child of `head` attached with exactly `relation`.
    pub fn child_with_relation(&self, head: NodeId, relation: &str) -> Option<NodeId> {
        self.child_edges(head)
            .find(|edge| edge.relation == relation)
            .map(|edge| edge.child)
    }

    /// Nodes whose span lies inside `span`, in text order.
    pub fn nodes_in(&self, span: Span) -> Vec<NodeId> {
        let mut found: Vec<NodeId> = self
            .nodes()
            .filter(|(_, node)| span.contains(&node.span) && !node.span.is_implicit())
            .map(|(id, _)| id)
            .collect();
        found.sort_by_key(|id| self.nodes[id.0].span.begin);
        found
    }

    /// Head node of the subtree covering `span`.
    ///
    /// A single node is its own head. Otherwise the first node, in text
    /// order, that is a root or whose governor lies outside the span wins.
    /// When every node is governed from inside the span (a cycle or a
    /// malformed parse) the first node is returned.
    pub fn head_node(&self, span: Span) -> Option<NodeId> {
        let inside = self.nodes_in(span);
        match inside.len() {
            0 => return None,
            1 => return Some(inside[0]),
            _ => {}
        }

        for &node in &inside {
            let mut heads = self.head_edges(node).peekable();
            if heads.peek().is_none() {
                return Some(node);
            }
            let external = heads.any(|edge| match edge.head {
                None => true,
                Some(_) if edge.is_root() => true,
                Some(head) => !inside.contains(&head),
            });
            if external {
                return Some(node);
            }
        }

        Some(inside[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// "the old man" with `det(man, the)`, `amod(man, old)` and man attached
    /// to an outside verb at node 3.
    fn noun_phrase_graph() -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        let the = graph.add_node(Span::new(0, 3));
        let old = graph.add_node(Span::new(4, 7));
        let man = graph.add_node(Span::new(8, 11));
        let left = graph.add_node(Span::new(12, 16));
        graph.add_edge(Some(man), the, "det").unwrap();
        graph.add_edge(Some(man), old, "amod").unwrap();
        graph.add_edge(Some(left), man, "nsubj").unwrap();
        graph.add_edge(None, left, "root").unwrap();
        graph
    }

    #[test]
    fn single_token_is_its_own_head() {
        let graph = noun_phrase_graph();
        assert_eq!(graph.head_node(Span::new(4, 7)), Some(NodeId(1)));
    }

    #[test]
    fn head_is_token_governed_from_outside() {
        let graph = noun_phrase_graph();
        assert_eq!(graph.head_node(Span::new(0, 11)), Some(NodeId(2)));
    }

    #[test]
    fn root_token_wins_when_span_covers_sentence() {
        let graph = noun_phrase_graph();
        assert_eq!(graph.head_node(Span::new(0, 16)), Some(NodeId(3)));
    }

    #[test]
    fn cyclic_span_defaults_to_first_token() {
        let mut graph = DependencyGraph::new();
        let a = graph.add_node(Span::new(0, 1));
        let b = graph.add_node(Span::new(2, 3));
        graph.add_edge(Some(b), a, "dep").unwrap();
        graph.add_edge(Some(a), b, "dep").unwrap();
        assert_eq!(graph.head_node(Span::new(0, 3)), Some(a));
    }

    #[test]
    fn empty_span_has_no_head() {
        let graph = noun_phrase_graph();
        assert_eq!(graph.head_node(Span::new(30, 40)), None);
    }

    #[test]
    fn unknown_nodes_are_rejected() {
        let mut graph = DependencyGraph::new();
        let a = graph.add_node(Span::new(0, 1));
        assert_eq!(
            graph.add_edge(Some(NodeId(7)), a, "dep"),
            Err(AnnotationError::UnknownNode(NodeId(7)))
        );
    }

    #[test]
    fn children_filtered_by_relation() {
        let graph = noun_phrase_graph();
        let mods: Vec<_> = graph.children_where(NodeId(2), |rel| rel.ends_with("mod")).collect();
        assert_eq!(mods, vec![NodeId(1)]);
        assert_eq!(graph.child_with_relation(NodeId(2), "det"), Some(NodeId(0)));
        assert_eq!(graph.parent(NodeId(2)), Some(NodeId(3)));
        assert_eq!(graph.parent(NodeId(3)), None);
    }
}
