// callejero-core: Reactive selection state between callejero-api and the UI.

pub mod controller;
pub mod state;

// ── Primary re-exports ──────────────────────────────────────────────
pub use controller::{Controller, NO_RESULTS_MESSAGE, SEARCH_FAILED_MESSAGE, can_search};
pub use state::{SearchState, Selection};

// Re-export the record types at the crate root for ergonomics.
pub use callejero_api::{Municipality, Province, Region, Street};
