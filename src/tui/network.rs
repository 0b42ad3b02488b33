// Loads the dataset in the background for the TUI.
use crate::client::SourceClient;
use crate::loader::{DatasetSources, load_dataset};
use crate::tui::action::AppEvent;
use tokio::sync::mpsc::Sender;

/// Fetches every source once and reports the outcome. There is no retry.
pub async fn run_loader_actor(sources: DatasetSources, event_tx: Sender<AppEvent>) {
    let _ = event_tx
        .send(AppEvent::Status("Loading conferences...".to_string()))
        .await;

    let client = match SourceClient::new() {
        Ok(c) => c,
        Err(e) => {
            log::error!("Could not build HTTP client: {:#}", e);
            let _ = event_tx.send(AppEvent::LoadFailed(e.to_string())).await;
            return;
        }
    };

    match load_dataset(&client, &sources).await {
        Ok(dataset) => {
            let _ = event_tx.send(AppEvent::DataLoaded(dataset)).await;
        }
        Err(e) => {
            log::error!("Failed to load dataset: {:#}", e);
            let _ = event_tx.send(AppEvent::LoadFailed(format!("{:#}", e))).await;
        }
    }
}
