use thiserror::Error;

use crate::{sequence_less_than, SequenceId};

/// Errors that can occur during SequenceList operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequenceError {
    /// Attempted to insert a duplicate ID into the sequence list
    #[error("Duplicate sequence ID {id} not allowed in SequenceList")]
    DuplicateId { id: SequenceId },
}

/// A list of items keyed by sequence id, kept in wrap-aware ascending order.
///
/// New ids almost always belong at the back, so lookups and inserts scan from
/// the back and stop as soon as they pass an older id.
pub struct SequenceList<T> {
    list: Vec<(SequenceId, T)>,
}

impl<T> SequenceList<T> {
    pub fn new() -> Self {
        Self { list: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn front(&self) -> Option<&(SequenceId, T)> {
        self.list.first()
    }

    fn position_scan_from_back(&self, id: SequenceId) -> Result<usize, usize> {
        for (index, (old_id, _)) in self.list.iter().enumerate().rev() {
            if *old_id == id {
                return Ok(index);
            }
            if sequence_less_than(*old_id, id) {
                return Err(index + 1);
            }
        }
        Err(0)
    }

    pub fn contains_scan_from_back(&self, id: SequenceId) -> bool {
        self.position_scan_from_back(id).is_ok()
    }

    pub fn get_mut_scan_from_back(&mut self, id: SequenceId) -> Option<&mut T> {
        let index = self.position_scan_from_back(id).ok()?;
        self.list.get_mut(index).map(|(_, item)| item)
    }

    /// Attempts to insert an item with the given ID, scanning from the back.
    /// Returns an error if the ID already exists.
    pub fn try_insert_scan_from_back(
        &mut self,
        id: SequenceId,
        item: T,
    ) -> Result<(), SequenceError> {
        match self.position_scan_from_back(id) {
            Ok(_) => Err(SequenceError::DuplicateId { id }),
            Err(index) => {
                self.list.insert(index, (id, item));
                Ok(())
            }
        }
    }

    pub fn remove_scan_from_back(&mut self, id: SequenceId) -> Option<T> {
        let index = self.position_scan_from_back(id).ok()?;
        Some(self.list.remove(index).1)
    }

    pub fn ids(&self) -> impl Iterator<Item = SequenceId> + '_ {
        self.list.iter().map(|(id, _)| *id)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (SequenceId, &mut T)> {
        self.list.iter_mut().map(|(id, item)| (*id, item))
    }

    pub fn retain<F: FnMut(SequenceId, &mut T) -> bool>(&mut self, mut keep: F) {
        self.list.retain_mut(|(id, item)| keep(*id, item));
    }

    pub fn clear(&mut self) {
        self.list.clear();
    }
}

impl<T> Default for SequenceList<T> {
    fn default() -> Self {
        Self::new()
    }
}
