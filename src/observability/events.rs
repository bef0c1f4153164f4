//! Observability events for locusdb
//!
//! Every observable event during store, index and query operation is
//! explicit and typed; free-form event names do not exist.

use std::fmt;

/// Observable events in locusdb
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Category definitions loaded
    CategoriesLoaded,

    // Store operations
    /// Document written to the store
    StorePut,
    /// Document removed from the store
    StoreRemove,

    // Index operations
    /// Document indexed
    IndexPut,
    /// Document unindexed
    IndexRemove,
    /// Full rebuild begins
    ReindexStart,
    /// Full rebuild complete
    ReindexComplete,
    /// Full rebuild aborted (FATAL)
    ReindexFailed,

    // Query operations
    /// Query resolved successfully
    QueryExecuted,
    /// Query rejected
    QueryRejected,

    // Change feed
    /// A subscriber fell behind and missed events
    ChangeFeedLagged,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::CategoriesLoaded => "CATEGORIES_LOADED",
            Event::StorePut => "STORE_PUT",
            Event::StoreRemove => "STORE_REMOVE",
            Event::IndexPut => "INDEX_PUT",
            Event::IndexRemove => "INDEX_REMOVE",
            Event::ReindexStart => "REINDEX_BEGIN",
            Event::ReindexComplete => "REINDEX_COMPLETE",
            Event::ReindexFailed => "REINDEX_FAILED",
            Event::QueryExecuted => "QUERY_COMPLETE",
            Event::QueryRejected => "QUERY_REJECTED",
            Event::ChangeFeedLagged => "CHANGE_FEED_LAGGED",
        }
    }

    /// Returns true if this event indicates a fatal condition
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::ReindexFailed)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        assert_eq!(Event::StorePut.as_str(), "STORE_PUT");
        assert_eq!(Event::ReindexComplete.as_str(), "REINDEX_COMPLETE");
    }

    #[test]
    fn test_fatal_events() {
        assert!(Event::ReindexFailed.is_fatal());
        assert!(!Event::QueryExecuted.is_fatal());
    }
}
