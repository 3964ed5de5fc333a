use thiserror::Error;

/// A position lookup or cursor movement fell outside the list.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Error)]
pub enum OutOfRange {
    /// A checked index was not strictly less than the length.
    #[error("index {index} is out of range for a list of length {len}")]
    Index {
        /// The requested index.
        index: usize,
        /// The length of the list at the time of the request.
        len: usize,
    },
    /// A cursor offset would move before the first element or past the end.
    #[error("offset {offset} moves a cursor outside a list of length {len}")]
    Offset {
        /// The requested offset, relative to the cursor.
        offset: isize,
        /// The length of the list at the time of the request.
        len: usize,
    },
}

/// The node store refused to allocate another node.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Error)]
#[error("node store is full ({capacity} nodes)")]
pub struct CapacityError {
    /// The number of nodes the store can hold.
    pub capacity: usize,
}

/// A fallible bulk insertion failed; the list was restored before returning.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Error)]
pub enum InsertError<E> {
    /// The source failed to produce an element.
    #[error("element construction failed: {0}")]
    Element(E),
    /// The node store ran out of room.
    #[error(transparent)]
    Capacity(#[from] CapacityError),
}

impl<E> InsertError<E> {
    /// Returns the source's error, if that is what failed.
    #[must_use]
    pub fn into_element(self) -> Option<E> {
        match self {
            Self::Element(error) => Some(error),
            Self::Capacity(_) => None,
        }
    }
}
