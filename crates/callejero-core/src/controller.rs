// ── Selection controller ──
//
// Single owner of all page state: the three cascading option lists, the
// selection, the search inputs, and the search result. Consumers observe
// through watch channels and mutate only through the operations here.
//
// Cascade contract: selecting a parent axis resets every dependent axis
// and its list synchronously, before the replacement fetch resolves. A
// failed child fetch leaves the triggering selection set and the child
// list empty -- failures reset nothing further.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::warn;

use callejero_api::{CallejeroClient, Municipality, Province, Region, Street};

use crate::state::{SearchState, Selection};

/// Shown after a successful search with zero matches.
pub const NO_RESULTS_MESSAGE: &str = "No se encontraron resultados";

/// Shown after a failed search when the server sent no usable `detail`.
pub const SEARCH_FAILED_MESSAGE: &str = "Error al buscar vías";

/// Search gating predicate, recomputed from the current inputs (never
/// cached): a search may fire once the postal code has at least five
/// characters and the name fragment at least three.
pub fn can_search(postal_code: &str, street_query: &str) -> bool {
    postal_code.chars().count() >= 5 && street_query.chars().count() >= 3
}

// ── Controller ───────────────────────────────────────────────────

/// The page's state owner.
///
/// Cheaply cloneable via `Arc<Inner>`. The [`CallejeroClient`] is injected
/// at construction; the controller is the only place that maps lookup
/// failures to user-visible text.
#[derive(Clone)]
pub struct Controller {
    inner: Arc<Inner>,
}

struct Inner {
    client: CallejeroClient,
    regions: watch::Sender<Arc<Vec<Region>>>,
    provinces: watch::Sender<Arc<Vec<Province>>>,
    municipalities: watch::Sender<Arc<Vec<Municipality>>>,
    selection: watch::Sender<Selection>,
    postal_code: watch::Sender<String>,
    street_query: watch::Sender<String>,
    search: watch::Sender<SearchState>,
}

impl Controller {
    /// Create a controller around an injected client. Performs no I/O --
    /// the consumer invokes [`load_regions()`](Self::load_regions) once at
    /// startup.
    pub fn new(client: CallejeroClient) -> Self {
        let (regions, _) = watch::channel(Arc::new(Vec::new()));
        let (provinces, _) = watch::channel(Arc::new(Vec::new()));
        let (municipalities, _) = watch::channel(Arc::new(Vec::new()));
        let (selection, _) = watch::channel(Selection::default());
        let (postal_code, _) = watch::channel(String::new());
        let (street_query, _) = watch::channel(String::new());
        let (search, _) = watch::channel(SearchState::default());

        Self {
            inner: Arc::new(Inner {
                client,
                regions,
                provinces,
                municipalities,
                selection,
                postal_code,
                street_query,
                search,
            }),
        }
    }

    // ── Startup ──────────────────────────────────────────────────

    /// Fetch the region list. Called once, unconditionally, at startup.
    ///
    /// A failure is logged and the list stays empty; the user simply
    /// cannot proceed past region selection.
    pub async fn load_regions(&self) {
        match self.inner.client.list_regions().await {
            Ok(regions) => {
                self.inner.regions.send_replace(Arc::new(regions));
            }
            Err(e) => warn!(error = %e, "failed to load regions"),
        }
    }

    // ── Cascading selection ──────────────────────────────────────

    /// Select an autonomous community (empty code = unset).
    ///
    /// Resets the province and municipality axes and their lists before
    /// the provinces fetch resolves. No fetch is issued for an empty code.
    pub async fn select_region(&self, code: &str) {
        self.inner.selection.send_modify(|sel| {
            sel.region = non_empty(code);
            sel.province = None;
            sel.municipality = None;
        });
        self.inner.provinces.send_replace(Arc::new(Vec::new()));
        self.inner.municipalities.send_replace(Arc::new(Vec::new()));

        if code.is_empty() {
            return;
        }

        match self.inner.client.list_provinces(code).await {
            Ok(provinces) => {
                self.inner.provinces.send_replace(Arc::new(provinces));
            }
            // Non-fatal: the list stays empty, the selection stays set.
            Err(e) => warn!(error = %e, ccom = code, "failed to load provinces"),
        }
    }

    /// Select a province (empty code = unset).
    ///
    /// Resets the municipality axis and its list before the fetch resolves.
    pub async fn select_province(&self, code: &str) {
        self.inner.selection.send_modify(|sel| {
            sel.province = non_empty(code);
            sel.municipality = None;
        });
        self.inner.municipalities.send_replace(Arc::new(Vec::new()));

        if code.is_empty() {
            return;
        }

        match self.inner.client.list_municipalities(code).await {
            Ok(municipalities) => {
                self.inner.municipalities.send_replace(Arc::new(municipalities));
            }
            Err(e) => warn!(error = %e, cpro = code, "failed to load municipalities"),
        }
    }

    /// Select a municipality (empty code = unset). No downstream dependents.
    pub fn select_municipality(&self, code: &str) {
        self.inner
            .selection
            .send_modify(|sel| sel.municipality = non_empty(code));
    }

    // ── Street search ────────────────────────────────────────────

    /// Update the postal-code input.
    pub fn set_postal_code(&self, text: impl Into<String>) {
        self.inner.postal_code.send_replace(text.into());
    }

    /// Update the street-name input.
    pub fn set_street_query(&self, text: impl Into<String>) {
        self.inner.street_query.send_replace(text.into());
    }

    /// Whether the current inputs pass the search gate.
    pub fn can_search(&self) -> bool {
        can_search(
            &self.inner.postal_code.borrow(),
            &self.inner.street_query.borrow(),
        )
    }

    /// Run the street search for the current inputs.
    ///
    /// No-op while the gate fails: no request, no state change. Otherwise
    /// publishes the in-flight state, fetches, and publishes the outcome:
    /// results on a non-empty success, [`NO_RESULTS_MESSAGE`] on an empty
    /// one, and the server's `detail` (or [`SEARCH_FAILED_MESSAGE`]) on
    /// failure.
    pub async fn search_streets(&self) {
        if !self.can_search() {
            return;
        }

        let postal = self.inner.postal_code.borrow().clone();
        let query = self.inner.street_query.borrow().clone();

        self.inner.search.send_replace(SearchState::in_flight());

        let outcome = match self.inner.client.search_streets(&postal, &query).await {
            Ok(streets) if streets.is_empty() => SearchState {
                loading: false,
                streets: Arc::new(Vec::new()),
                error: Some(NO_RESULTS_MESSAGE.to_owned()),
            },
            Ok(streets) => SearchState {
                loading: false,
                streets: Arc::new(streets),
                error: None,
            },
            Err(e) => {
                warn!(error = %e, cpos = %postal, "street search failed");
                SearchState {
                    loading: false,
                    streets: Arc::new(Vec::new()),
                    error: Some(
                        e.detail()
                            .map_or_else(|| SEARCH_FAILED_MESSAGE.to_owned(), str::to_owned),
                    ),
                }
            }
        };

        self.inner.search.send_replace(outcome);
    }

    // ── Snapshot accessors ───────────────────────────────────────

    pub fn regions_snapshot(&self) -> Arc<Vec<Region>> {
        self.inner.regions.borrow().clone()
    }

    pub fn provinces_snapshot(&self) -> Arc<Vec<Province>> {
        self.inner.provinces.borrow().clone()
    }

    pub fn municipalities_snapshot(&self) -> Arc<Vec<Municipality>> {
        self.inner.municipalities.borrow().clone()
    }

    pub fn selection(&self) -> Selection {
        self.inner.selection.borrow().clone()
    }

    pub fn postal_code(&self) -> String {
        self.inner.postal_code.borrow().clone()
    }

    pub fn street_query(&self) -> String {
        self.inner.street_query.borrow().clone()
    }

    pub fn search(&self) -> SearchState {
        self.inner.search.borrow().clone()
    }

    // ── Subscriptions ────────────────────────────────────────────

    pub fn subscribe_regions(&self) -> watch::Receiver<Arc<Vec<Region>>> {
        self.inner.regions.subscribe()
    }

    pub fn subscribe_provinces(&self) -> watch::Receiver<Arc<Vec<Province>>> {
        self.inner.provinces.subscribe()
    }

    pub fn subscribe_municipalities(&self) -> watch::Receiver<Arc<Vec<Municipality>>> {
        self.inner.municipalities.subscribe()
    }

    pub fn subscribe_selection(&self) -> watch::Receiver<Selection> {
        self.inner.selection.subscribe()
    }

    pub fn subscribe_search(&self) -> watch::Receiver<SearchState> {
        self.inner.search.subscribe()
    }
}

fn non_empty(code: &str) -> Option<String> {
    if code.is_empty() {
        None
    } else {
        Some(code.to_owned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn gate_passes_at_minimum_lengths() {
        assert!(can_search("28001", "MAY"));
        assert!(can_search("28001", "MAYOR"));
    }

    #[test]
    fn gate_rejects_short_postal_code() {
        assert!(!can_search("2800", "MAYOR"));
        assert!(!can_search("", "MAYOR"));
    }

    #[test]
    fn gate_rejects_short_name_fragment() {
        assert!(!can_search("28001", "MA"));
        assert!(!can_search("28001", ""));
    }

    #[test]
    fn gate_rejects_both_short() {
        assert!(!can_search("280", "M"));
    }

    #[test]
    fn gate_counts_characters_not_bytes() {
        // "VÍA" is three characters (four bytes).
        assert!(can_search("28001", "VÍA"));
    }

    #[test]
    fn selection_defaults_to_unset() {
        let sel = Selection::default();
        assert!(sel.region.is_none());
        assert!(sel.province.is_none());
        assert!(sel.municipality.is_none());
    }
}
