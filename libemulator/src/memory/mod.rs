use std::num::NonZeroUsize;

use libdigiisa::{Word, RAM_SIZE};

use crate::ExecuteErr;


/// Byte addressable RAM. Single cell accesses wrap around, block accesses
/// don't.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memory(Vec<Word>);

impl Memory {
    /// Sizes are non-zero so that wrapping accesses always have a cell to land on.
    pub fn new(size: NonZeroUsize) -> Self {
        Self(vec![0; size.get()])
    }

    pub fn size(&self) -> usize {
        self.0.len()
    }

    pub fn load(&self, pos: usize) -> Word {
        self.0[pos % self.0.len()]
    }

    pub fn save(&mut self, pos: usize, data: Word) {
        let len = self.0.len();
        self.0[pos % len] = data;
    }

    /// Errors with the exclusive end of the block if it runs past the end.
    pub fn read(&self, start: usize, width: usize) -> Result<&[Word], ExecuteErr> {
        let end = start.saturating_add(width);

        self.0
            .get(start..end)
            .ok_or(ExecuteErr::RamOutOfBounds(end))
    }

    pub fn write(&mut self, start: usize, data: &[Word]) -> Result<(), ExecuteErr> {
        let end = start.saturating_add(data.len());

        self.0
            .get_mut(start..end)
            .ok_or(ExecuteErr::RamOutOfBounds(end))?
            .copy_from_slice(data);

        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Word> {
        self.0.iter()
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self(vec![0; RAM_SIZE])
    }
}
