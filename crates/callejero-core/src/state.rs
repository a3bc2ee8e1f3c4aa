// ── Observable state cells ──
//
// Grouped so that each documented invariant is atomic under observation:
// a cascade reset publishes one Selection, a search transition publishes
// one SearchState.

use std::sync::Arc;

use callejero_api::Street;

/// Current selection across the three cascading axes.
///
/// `None` = unset. A set value always refers to the most recently loaded
/// list for that level; selecting a new parent clears the children before
/// their replacement list arrives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Autonomous community code.
    pub region: Option<String>,
    /// Province code.
    pub province: Option<String>,
    /// Municipality code.
    pub municipality: Option<String>,
}

/// State of the street search.
///
/// `streets` and `error` are mutually exclusive in their active sense:
/// a non-empty result clears the error, an empty success or a failure
/// clears the results and sets a message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    /// A request is in flight.
    pub loading: bool,
    /// Results of the last completed search.
    pub streets: Arc<Vec<Street>>,
    /// User-visible message for the last completed search, if any.
    pub error: Option<String>,
}

impl SearchState {
    /// State published when a request is issued: loading, with prior
    /// results and error cleared.
    pub fn in_flight() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }
}
