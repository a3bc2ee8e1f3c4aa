//! All possible UI actions. Actions are the sole mechanism for state mutation.

use std::sync::Arc;

use callejero_core::{Municipality, Province, Region, SearchState, Selection};

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Focus ──────────────────────────────────────────────────────
    FocusNext,
    FocusPrev,

    // ── User intents ───────────────────────────────────────────────
    /// Select an autonomous community (empty code clears the axis).
    ChooseRegion(String),
    /// Select a province (empty code clears the axis).
    ChooseProvince(String),
    /// Select a municipality (empty code clears the axis).
    ChooseMunicipality(String),
    /// Run the street search for the current inputs.
    SubmitSearch,

    // ── Data events (from the controller, via the bridge) ──────────
    RegionsUpdated(Arc<Vec<Region>>),
    ProvincesUpdated(Arc<Vec<Province>>),
    MunicipalitiesUpdated(Arc<Vec<Municipality>>),
    SelectionChanged(Selection),
    SearchUpdated(SearchState),
}
