//! Quantum objects shared by several graph elements.
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::core::error::{QResult, QuantumError};
use crate::core::quantum::types::QuantumObject;
use crate::debug_log;

/// Canonical key of a composite: the sorted member set.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompositeId(Vec<String>);

impl CompositeId {
    pub fn new(ids: &[&str]) -> QResult<Self> {
        if ids.is_empty() {
            return Err(QuantumError::invalid_operation("composite needs at least one element"));
        }
        let mut sorted: Vec<String> = ids.iter().map(|s| s.to_string()).collect();
        sorted.sort();
        if sorted.windows(2).any(|w| w[0] == w[1]) {
            return Err(QuantumError::invalid_operation("composite lists an element twice"));
        }
        Ok(Self(sorted))
    }

    pub fn members(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for CompositeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("_"))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CompositeEntry {
    pub object: QuantumObject,
    /// Member ids in the tensor-factor order of `object`.
    pub order: Vec<String>,
}

/// Composite objects plus the element → composite back-reference.
#[derive(Clone, Debug, Default)]
pub struct CompositeQuantumManager {
    composites: BTreeMap<CompositeId, CompositeEntry>,
    element_to_composite: HashMap<String, CompositeId>,
}

impl CompositeQuantumManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `object` to the element set. Re-binding the same set replaces the
    /// object; an element owned by a different composite is an error.
    pub fn set_composite(&mut self, ids: &[&str], object: QuantumObject) -> QResult<CompositeId> {
        let id = CompositeId::new(ids)?;
        for element in ids {
            if let Some(existing) = self.element_to_composite.get(*element) {
                if *existing != id {
                    return Err(QuantumError::CompositeOverlap {
                        element: element.to_string(),
                        existing: existing.to_string(),
                    });
                }
            }
        }
        for element in ids {
            self.element_to_composite.insert(element.to_string(), id.clone());
        }
        debug_log!("composite {} bound (dim {})", id, object.dimension());
        let order = ids.iter().map(|s| s.to_string()).collect();
        self.composites.insert(id.clone(), CompositeEntry { object, order });
        Ok(id)
    }

    /// Composite whose member set is exactly `ids`, in any order.
    pub fn get_composite(&self, ids: &[&str]) -> Option<&CompositeEntry> {
        let id = CompositeId::new(ids).ok()?;
        self.composites.get(&id)
    }

    pub fn get_by_id(&self, id: &CompositeId) -> Option<&CompositeEntry> {
        self.composites.get(id)
    }

    pub fn composite_for_element(&self, element: &str) -> Option<&CompositeId> {
        self.element_to_composite.get(element)
    }

    pub fn object_for_element(&self, element: &str) -> Option<&QuantumObject> {
        let id = self.element_to_composite.get(element)?;
        self.composites.get(id).map(|e| &e.object)
    }

    pub fn is_member(&self, element: &str) -> bool {
        self.element_to_composite.contains_key(element)
    }

    /// Dissolve a composite and drop its back-references.
    pub fn release(&mut self, id: &CompositeId) -> Option<CompositeEntry> {
        let entry = self.composites.remove(id)?;
        for member in id.members() {
            self.element_to_composite.remove(member);
        }
        debug_log!("composite {} released", id);
        Some(entry)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CompositeId, &CompositeEntry)> {
        self.composites.iter()
    }

    pub fn len(&self) -> usize {
        self.composites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.composites.is_empty()
    }
}
