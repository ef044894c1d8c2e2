//! Per-element-type UID allocation.

use tracing::info;

use crate::model::{Document, ElementType, Uid};

/// Namespace used when a UID has to be assigned automatically.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum UidMode {
    /// Per-type counters: 0, 1, 2, ...
    #[default]
    Integer,
    /// Fresh random UUIDs.
    Uuid,
}

/// Tracks the highest integer UID seen for each element type and the
/// current auto-assignment mode.
#[derive(Clone, Debug, Default)]
pub struct UidRegistry {
    last: [Option<u64>; 6],
    mode: UidMode,
}

impl UidRegistry {
    pub fn new(mode: UidMode) -> Self {
        Self {
            last: [None; 6],
            mode,
        }
    }

    /// Rebuilds the counters from an existing document. A document holding
    /// any UUID key switches the registry to UUID mode.
    pub fn from_document(document: &Document, mode: UidMode) -> Self {
        let mut registry = Self::new(mode);
        for (element_type, uid, _) in document.elements.iter() {
            registry.observe(element_type, *uid);
        }
        registry
    }

    #[inline]
    pub fn mode(&self) -> UidMode {
        self.mode
    }

    /// Switches the auto-assignment namespace.
    pub fn set_mode(&mut self, mode: UidMode) {
        if self.mode != mode {
            info!(from = ?self.mode, to = ?mode, "UID mode changed");
            self.mode = mode;
        }
    }

    /// Highest integer UID seen for `element_type`.
    pub fn last(&self, element_type: ElementType) -> Option<u64> {
        self.last[element_type.index()]
    }

    /// Records an existing UID without assigning anything.
    pub fn observe(&mut self, element_type: ElementType, uid: Uid) {
        match uid {
            Uid::Int(n) => {
                let slot = &mut self.last[element_type.index()];
                if slot.is_none_or(|last| n > last) {
                    *slot = Some(n);
                }
            }
            Uid::Uuid(_) => self.set_mode(UidMode::Uuid),
        }
    }

    /// Returns the UID to use for an element.
    ///
    /// With no request a new UID is minted in the current mode. A requested
    /// integer advances the type's high-water mark when larger than it. A
    /// requested UUID moves the registry into UUID mode.
    pub fn resolve(&mut self, element_type: ElementType, requested: Option<Uid>) -> Uid {
        match requested {
            Some(uid) => {
                self.observe(element_type, uid);
                uid
            }
            None => match self.mode {
                UidMode::Uuid => Uid::new_uuid(),
                UidMode::Integer => {
                    let slot = &mut self.last[element_type.index()];
                    let next = slot.map_or(0, |last| last + 1);
                    *slot = Some(next);
                    Uid::Int(next)
                }
            },
        }
    }
}
