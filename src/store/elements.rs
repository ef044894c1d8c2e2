//! Element lifecycle: creation, frame-interval changes, removal and
//! relation endpoints.

use tracing::{debug, warn};

use super::{ElementArgs, SetMode, Vcd};
use crate::error::VcdError;
use crate::model::{Element, ElementType, FrameIntervals, RdfRef, RdfRole, Uid};

impl Vcd {
    /// Creates or updates an element and returns its UID.
    ///
    /// In [`SetMode::Union`] the element's frame intervals grow by
    /// `args.frame_intervals`; in [`SetMode::Replace`] they become exactly
    /// that, which may shrink the element or make it static. Per-frame
    /// presence, data pointers and the document extent are reconciled
    /// before returning.
    ///
    /// # Errors
    /// Tags given frame intervals, and references to undeclared coordinate
    /// systems, are rejected without touching the document.
    pub fn set_element(&mut self, element_type: ElementType, args: ElementArgs) -> Result<Uid, VcdError> {
        if element_type.is_static_only() && !args.frame_intervals.is_empty() {
            return Err(VcdError::StaticOnly(element_type));
        }
        self.require_coordinate_system(args.coordinate_system.as_deref())?;

        let uid = self.uids.resolve(element_type, args.uid);
        let previous = self
            .document
            .element(element_type, &uid)
            .map(|el| el.frames().clone());
        let existed = previous.is_some();
        let old = previous.unwrap_or_default();
        let frames = match args.mode {
            SetMode::Union => old.union(&args.frame_intervals),
            SetMode::Replace => args.frame_intervals,
        };

        let el = self
            .document
            .elements
            .of_mut(element_type)
            .entry(uid)
            .or_default();
        if let Some(name) = args.name {
            el.name = name;
        }
        if let Some(semantic_type) = args.semantic_type {
            el.semantic_type = semantic_type;
        }
        if let Some(ontology_uid) = args.ontology_uid {
            el.ontology_uid = Some(ontology_uid);
        }
        if let Some(coordinate_system) = args.coordinate_system {
            el.coordinate_system = Some(coordinate_system);
        }
        if let Some(resource_uid) = args.resource_uid {
            el.resource_uid = Some(resource_uid);
        }

        self.retime(element_type, uid, existed, &old, frames);
        Ok(uid)
    }

    /// Shorthand for a new element with an automatically assigned UID.
    pub fn add_element(
        &mut self,
        element_type: ElementType,
        name: &str,
        semantic_type: &str,
        frame_intervals: FrameIntervals,
    ) -> Result<Uid, VcdError> {
        self.set_element(
            element_type,
            ElementArgs::new(name, semantic_type).frames(frame_intervals),
        )
    }

    pub fn add_object(&mut self, name: &str, semantic_type: &str) -> Result<Uid, VcdError> {
        self.add_element(ElementType::Object, name, semantic_type, FrameIntervals::new())
    }

    pub fn add_tag(&mut self, name: &str, semantic_type: &str) -> Result<Uid, VcdError> {
        self.add_element(ElementType::Tag, name, semantic_type, FrameIntervals::new())
    }

    /// Moves an existing element from `old` to `frames`, keeping the frame
    /// index, its data pointers and the document extent consistent.
    pub(super) fn retime(
        &mut self,
        element_type: ElementType,
        uid: Uid,
        existed: bool,
        old: &FrameIntervals,
        frames: FrameIntervals,
    ) {
        let Some(el) = self.document.element_mut(element_type, &uid) else {
            return;
        };
        if el.frame_intervals.is_some() || !frames.is_empty() {
            el.frame_intervals = Some(frames.clone());
        }
        clip_pointers(el, &frames);

        if !frames.is_empty() {
            if existed {
                let stale = if old.is_empty() {
                    self.document.frame_intervals.difference(&frames)
                } else {
                    old.difference(&frames)
                };
                self.strip_frames(element_type, &uid, &stale);
            }
            for frame in frames.frames() {
                self.frame_entry(element_type, uid, frame);
            }
            self.settle();
        } else {
            if !old.is_empty() {
                self.strip_frames(element_type, &uid, old);
            }
            self.settle();
            if element_type.propagates_when_static() {
                let frames: Vec<u64> = self.document.frames.keys().copied().collect();
                for frame in frames {
                    self.frame_entry(element_type, uid, frame);
                }
            }
        }
    }

    /// Removes an element together with its frame entries and every RDF
    /// reference to it.
    pub fn rm_element(&mut self, element_type: ElementType, uid: &Uid) -> bool {
        let Some(el) = self.document.elements.of_mut(element_type).remove(uid) else {
            warn!(%element_type, %uid, "cannot remove a non-existing element");
            return false;
        };

        let frames = if el.is_static() {
            self.document.frame_intervals.clone()
        } else {
            el.frames().clone()
        };
        self.strip_frames(element_type, uid, &frames);

        let target = RdfRef {
            uid: *uid,
            element_type,
        };
        for relation in self.document.elements.relations.values_mut() {
            relation.rdf_subjects.retain(|r| *r != target);
            relation.rdf_objects.retain(|r| *r != target);
        }

        self.settle();
        debug!(%element_type, %uid, "element removed");
        true
    }

    /// Removes every element of `element_type` whose semantic type matches.
    /// Returns how many were removed.
    pub fn rm_element_by_type(&mut self, element_type: ElementType, semantic_type: &str) -> usize {
        let uids: Vec<Uid> = self
            .document
            .elements
            .of(element_type)
            .iter()
            .filter(|(_, el)| el.semantic_type == semantic_type)
            .map(|(uid, _)| *uid)
            .collect();
        if uids.is_empty() {
            warn!(%element_type, semantic_type, "no element of this semantic type to remove");
        }
        uids.iter().filter(|uid| self.rm_element(element_type, uid)).count()
    }

    /// Removes a dynamic element from `frame_intervals`. The element is
    /// deleted outright once none of its frames remain.
    pub fn rm_element_by_frame(
        &mut self,
        element_type: ElementType,
        uid: &Uid,
        frame_intervals: &FrameIntervals,
    ) -> bool {
        let Some(el) = self.document.element(element_type, uid) else {
            warn!(%element_type, %uid, "cannot remove frames of a non-existing element");
            return false;
        };
        if el.is_static() {
            warn!(%element_type, %uid, "static element has no frames to remove");
            return false;
        }

        let old = el.frames().clone();
        let remaining = old.difference(frame_intervals);
        if remaining.is_empty() {
            return self.rm_element(element_type, uid);
        }
        self.retime(element_type, *uid, true, &old, remaining);
        true
    }

    /// Attaches an endpoint to a relation. Both the relation and the
    /// endpoint element must exist. Adding an endpoint twice is a no-op.
    pub fn add_rdf(&mut self, relation_uid: &Uid, role: RdfRole, endpoint: RdfRef) -> bool {
        if !self.has(endpoint.element_type, &endpoint.uid) {
            warn!(
                element_type = %endpoint.element_type,
                uid = %endpoint.uid,
                "RDF endpoint does not exist"
            );
            return false;
        }
        let Some(relation) = self.document.element_mut(ElementType::Relation, relation_uid) else {
            warn!(uid = %relation_uid, "relation does not exist");
            return false;
        };
        let endpoints = relation.rdf_mut(role);
        if !endpoints.contains(&endpoint) {
            endpoints.push(endpoint);
        }
        true
    }

    /// Creates a frame-less relation between two existing elements.
    ///
    /// Returns `Ok(None)` without creating anything when either endpoint is
    /// missing.
    pub fn add_relation_subject_object(
        &mut self,
        name: &str,
        semantic_type: &str,
        subject: RdfRef,
        object: RdfRef,
    ) -> Result<Option<Uid>, VcdError> {
        for endpoint in [subject, object] {
            if !self.has(endpoint.element_type, &endpoint.uid) {
                warn!(
                    element_type = %endpoint.element_type,
                    uid = %endpoint.uid,
                    "RDF endpoint does not exist"
                );
                return Ok(None);
            }
        }
        let uid = self.set_element(ElementType::Relation, ElementArgs::new(name, semantic_type))?;
        self.add_rdf(&uid, RdfRole::Subject, subject);
        self.add_rdf(&uid, RdfRole::Object, object);
        Ok(Some(uid))
    }
}

/// Restricts every data pointer to `frames`. A pointer left without frames
/// survives only while a same-named datum exists at the element root.
fn clip_pointers(element: &mut Element, frames: &FrameIntervals) {
    let Element {
        data,
        data_pointers,
        ..
    } = element;
    data_pointers.retain(|name, pointer| {
        pointer.frame_intervals = pointer.frame_intervals.intersection(frames);
        !pointer.frame_intervals.is_empty() || data.contains_name(name)
    });
}
