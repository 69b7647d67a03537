use std::ops::Range;

/// The cursor of a [`Reader`] would leave its bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("index out of range")]
pub struct OutOfRange;

/// Cursor over a borrowed sequence with single-step rollback.
///
/// Used for the argument vector, for the characters of a short option
/// cluster and for the queue of positional declarations.
#[derive(Debug, Clone)]
pub struct Reader<'a, T> {
    items: &'a [T],
    start: usize,
    end: usize,
    cursor: usize,
}

impl<'a, T> Reader<'a, T> {
    pub fn new(items: &'a [T]) -> Self {
        Self { items, start: 0, end: items.len(), cursor: 0 }
    }

    /// Reads only `items[range]`. The range is clamped to the sequence.
    pub fn with_bounds(items: &'a [T], range: Range<usize>) -> Self {
        let end = range.end.min(items.len());
        let start = range.start.min(end);
        Self { items, start, end, cursor: start }
    }

    pub fn is_eof(&self) -> bool {
        self.cursor >= self.end
    }

    /// Returns the item under the cursor and advances.
    pub fn get(&mut self) -> Result<&'a T, OutOfRange> {
        if self.is_eof() {
            return Err(OutOfRange);
        }
        let item = &self.items[self.cursor];
        self.cursor += 1;
        Ok(item)
    }

    /// Moves the cursor one step back.
    pub fn put(&mut self) -> Result<(), OutOfRange> {
        if self.cursor <= self.start {
            return Err(OutOfRange);
        }
        self.cursor -= 1;
        Ok(())
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Items not read yet.
    pub fn rest(&self) -> &'a [T] {
        &self.items[self.cursor..self.end]
    }
}
