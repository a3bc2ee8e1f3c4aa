//! Data bridge — connects [`Controller`] watch channels to TUI actions.
//!
//! Runs as a background task: performs the one startup regions fetch,
//! pushes initial snapshots, then forwards every state change as an
//! [`Action`] through the TUI's action channel.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use callejero_core::Controller;

use crate::action::Action;

/// Run the bridge until cancelled.
pub async fn run_data_bridge(
    controller: Controller,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let mut regions = controller.subscribe_regions();
    let mut provinces = controller.subscribe_provinces();
    let mut municipalities = controller.subscribe_municipalities();
    let mut selection = controller.subscribe_selection();
    let mut search = controller.subscribe_search();

    // Startup: the regions list is fetched once, unconditionally. A failure
    // is logged inside the controller and leaves the list empty.
    controller.load_regions().await;

    // Initial snapshots so the page renders without waiting for a change.
    let _ = action_tx.send(Action::RegionsUpdated(regions.borrow_and_update().clone()));
    let _ = action_tx.send(Action::SelectionChanged(
        selection.borrow_and_update().clone(),
    ));
    let _ = action_tx.send(Action::SearchUpdated(search.borrow_and_update().clone()));

    // Stream loop — forward every change until cancelled
    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            Ok(()) = regions.changed() => {
                let _ = action_tx.send(Action::RegionsUpdated(regions.borrow_and_update().clone()));
            }
            Ok(()) = provinces.changed() => {
                let _ = action_tx.send(Action::ProvincesUpdated(provinces.borrow_and_update().clone()));
            }
            Ok(()) = municipalities.changed() => {
                let _ = action_tx.send(Action::MunicipalitiesUpdated(municipalities.borrow_and_update().clone()));
            }
            Ok(()) = selection.changed() => {
                let _ = action_tx.send(Action::SelectionChanged(selection.borrow_and_update().clone()));
            }
            Ok(()) = search.changed() => {
                let _ = action_tx.send(Action::SearchUpdated(search.borrow_and_update().clone()));
            }
        }
    }

    debug!("data bridge shut down");
}
