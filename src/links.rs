//! Role links between event mentions and components.
//!
//! Links are bidirectional: an event holds each link in the list for its
//! role, and the component holds it in `component_links`. Every mutation
//! here keeps both sides consistent.

use tracing::debug;

use crate::{
    AnnotationError, AnnotationResult, ComponentId, ComponentLink, EntityBasedComponent,
    EventDocument, EventId, LinkId, LinkType, Span,
};

impl EventDocument {
    /// Build a link and register it on the component.
    ///
    /// The event's role list is not touched and no duplicate check is made;
    /// see [`attach_link`](Self::attach_link) and
    /// [`is_already_linked`](Self::is_already_linked).
    pub fn create_link(
        &mut self,
        event: EventId,
        component: ComponentId,
        link_type: LinkType,
        provenance: &str,
    ) -> AnnotationResult<LinkId> {
        self.event_checked(event)?;
        if self.component(component).is_none() {
            return Err(AnnotationError::UnknownComponent(component));
        }
        let id = self.insert_link(ComponentLink {
            event,
            component,
            link_type,
            provenance: provenance.to_string(),
        });
        self.component_checked_mut(component)?.component_links.push(id);
        Ok(id)
    }

    /// Create a link and append it to the event's role list.
    pub fn attach_link(
        &mut self,
        event: EventId,
        component: ComponentId,
        link_type: LinkType,
        provenance: &str,
    ) -> AnnotationResult<LinkId> {
        let id = self.create_link(event, component, link_type, provenance)?;
        self.event_checked_mut(event)?.links_mut(link_type).push(id);
        debug!(?event, ?component, role = link_type.label(), provenance, "attached link");
        Ok(id)
    }

    /// Overwrite an event's role list with fresh links to `components`.
    ///
    /// Links previously in the list are removed from both sides. Components
    /// left without links stay in the store.
    pub fn replace_links(
        &mut self,
        event: EventId,
        link_type: LinkType,
        components: &[ComponentId],
        provenance: &str,
    ) -> AnnotationResult<Vec<LinkId>> {
        let old = std::mem::take(self.event_checked_mut(event)?.links_mut(link_type));
        for link in old {
            if let Some(removed) = self.take_link(link) {
                if let Some(component) = self.component_mut(removed.component) {
                    component.component_links.retain(|&l| l != link);
                }
            }
        }
        components
            .iter()
            .map(|&component| self.attach_link(event, component, link_type, provenance))
            .collect()
    }

    /// True when any component behind `links` overlaps `candidate`.
    pub fn is_already_linked(&self, candidate: Span, links: &[LinkId]) -> bool {
        links
            .iter()
            .filter_map(|&l| self.link(l))
            .filter_map(|link| self.component(link.component))
            .any(|component| component.span.overlaps(&candidate))
    }

    /// Shorthand for [`is_already_linked`](Self::is_already_linked) over one
    /// role of `event`.
    pub fn role_overlaps(&self, event: EventId, link_type: LinkType, candidate: Span) -> bool {
        self.event(event)
            .map_or(false, |e| self.is_already_linked(candidate, e.links(link_type)))
    }

    /// Duplicate every `link_type` link of `from` onto `to`, re-tagged with
    /// `provenance`. Both events end up pointing at the same components.
    pub fn copy_links(
        &mut self,
        from: EventId,
        to: EventId,
        link_type: LinkType,
        provenance: &str,
    ) -> AnnotationResult<Vec<LinkId>> {
        self.event_checked(to)?;
        let components = self.linked_components(from, link_type);
        components
            .into_iter()
            .map(|component| self.attach_link(to, component, link_type, provenance))
            .collect()
    }

    pub fn copy_agents(&mut self, from: EventId, to: EventId, provenance: &str) -> AnnotationResult<Vec<LinkId>> {
        self.copy_links(from, to, LinkType::Agent, provenance)
    }

    pub fn copy_patients(&mut self, from: EventId, to: EventId, provenance: &str) -> AnnotationResult<Vec<LinkId>> {
        self.copy_links(from, to, LinkType::Patient, provenance)
    }

    pub fn copy_locations(&mut self, from: EventId, to: EventId, provenance: &str) -> AnnotationResult<Vec<LinkId>> {
        self.copy_links(from, to, LinkType::Location, provenance)
    }

    /// Detach a link from both its event and its component.
    ///
    /// Returns the component when this was its last link.
    pub fn remove_link(&mut self, link: LinkId) -> AnnotationResult<Option<ComponentId>> {
        let removed = self.take_link(link).ok_or(AnnotationError::UnknownLink(link))?;
        if let Some(event) = self.event_mut(removed.event) {
            event.links_mut(removed.link_type).retain(|&l| l != link);
        }
        let component = self.component_checked_mut(removed.component)?;
        component.component_links.retain(|&l| l != link);
        Ok(if component.component_links.is_empty() {
            Some(removed.component)
        } else {
            None
        })
    }

    /// Remove a component and every link pointing at it.
    pub fn delete_component(&mut self, component: ComponentId) -> AnnotationResult<EntityBasedComponent> {
        let links = self
            .component(component)
            .ok_or(AnnotationError::UnknownComponent(component))?
            .component_links
            .clone();
        for link in links {
            self.remove_link(link)?;
        }
        self.take_component(component)
            .ok_or(AnnotationError::UnknownComponent(component))
    }
}
