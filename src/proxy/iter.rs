use super::Backing;
use crate::core::{Key, Result, Value};

/// Lazy iterator over a proxy's backing fields.
///
/// The key order is captured when iteration starts; values are fetched from
/// the live storage as the iterator advances, and keys removed in the
/// meantime are skipped. A field that cannot be read because the storage is
/// mutably borrowed yields `Err(BorrowConflict)`; the iterator then moves on
/// to the next key. `rewind` starts over from the current order.
#[derive(Debug, Clone)]
pub struct FieldIter {
    backing: Backing,
    keys: Vec<Key>,
    position: usize,
}

impl FieldIter {
    pub(crate) fn new(backing: Backing) -> Result<Self> {
        let keys = backing.keys()?;
        Ok(Self {
            backing,
            keys,
            position: 0,
        })
    }

    /// Restart from the backing's current first field
    pub fn rewind(&mut self) -> Result<()> {
        self.keys = self.backing.keys()?;
        self.position = 0;
        Ok(())
    }

    /// Keys not yet visited
    pub fn remaining(&self) -> usize {
        self.keys.len().saturating_sub(self.position)
    }
}

impl Iterator for FieldIter {
    type Item = Result<(Key, Value)>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.position < self.keys.len() {
            let key = &self.keys[self.position];
            self.position += 1;
            match self.backing.get(key) {
                Ok(Some(value)) => return Some(Ok((key.clone(), value))),
                Ok(None) => continue,
                Err(err) => return Some(Err(err)),
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining()))
    }
}
