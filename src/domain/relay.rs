//! Cursor semantics of the speaker question queue.
//!
//! The queue is the live list of a speaker's active questions in creation
//! order. It is recomputed for every call and never cached, so answering a
//! question (which removes it from the list) cannot leave a stale cursor
//! pointing into an old snapshot.

/// Where the cursor landed after a peek or an advance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayPosition<T> {
    /// False when the requested index was past the end of the live list.
    pub advanced: bool,
    /// The question at the cursor, or the first active question after a
    /// failed advance, or none if the queue is empty.
    pub question: Option<T>,
    /// Cursor the caller should store: the index used, or 0 after a miss.
    pub cursor: usize,
}

/// Looks up the question at `cursor` (or `cursor + 1` when advancing) in the
/// live list of active questions.
pub fn peek_or_advance<T: Clone>(active: &[T], cursor: usize, advance: bool) -> RelayPosition<T> {
    let index = if advance { cursor.saturating_add(1) } else { cursor };
    match active.get(index) {
        Some(question) => RelayPosition {
            advanced: true,
            question: Some(question.clone()),
            cursor: index,
        },
        None => RelayPosition {
            advanced: false,
            question: active.first().cloned(),
            cursor: 0,
        },
    }
}
