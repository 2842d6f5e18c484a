use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::{
    client::{RequestFailure, TotalEndpoint},
    models::page::{CartPage, Change, Snapshot},
};

#[derive(Error, Debug)]
pub enum UpdaterError {
    #[error("No item with id '{id}' on the page")]
    UnknownItem { id: String },

    #[error("Unknown response ordering: {value} (expected latest-issued or last-resolved)")]
    InvalidOrdering { value: String },
}

/// How results of overlapping requests reach the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResponseOrdering {
    /// Every successful response is written, so the request that completes
    /// last wins even if it was issued first.
    LastResolved,
    /// A response older than the one already shown is dropped.
    #[default]
    LatestIssued,
}

impl fmt::Display for ResponseOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseOrdering::LastResolved => write!(f, "last-resolved"),
            ResponseOrdering::LatestIssued => write!(f, "latest-issued"),
        }
    }
}

impl FromStr for ResponseOrdering {
    type Err = UpdaterError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "last-resolved" | "last_resolved" => Ok(ResponseOrdering::LastResolved),
            "latest-issued" | "latest_issued" => Ok(ResponseOrdering::LatestIssued),
            _ => Err(UpdaterError::InvalidOrdering {
                value: value.to_string(),
            }),
        }
    }
}

/// What became of one change event's request.
#[derive(Debug)]
pub enum UpdateOutcome {
    /// The total was written to the display.
    Applied { seq: u64, text: String },
    /// A later request's total was already shown; this one was dropped.
    Superseded { seq: u64, applied_seq: u64 },
    /// The request failed and the display kept its previous text.
    Failed { seq: u64, error: RequestFailure },
}

impl UpdateOutcome {
    pub fn seq(&self) -> u64 {
        match self {
            UpdateOutcome::Applied { seq, .. }
            | UpdateOutcome::Superseded { seq, .. }
            | UpdateOutcome::Failed { seq, .. } => *seq,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, UpdateOutcome::Applied { .. })
    }
}

/// Keeps the total display in step with the checked items.
///
/// Every change event scans the page, issues one request and returns at
/// once; the response is applied from a spawned task. Nothing is cancelled
/// or queued, so several requests can be in flight at a time.
#[derive(Clone)]
pub struct CartTotalUpdater {
    page: Arc<CartPage>,
    endpoint: Arc<dyn TotalEndpoint>,
    ordering: ResponseOrdering,
}

impl CartTotalUpdater {
    pub fn new(
        page: Arc<CartPage>,
        endpoint: Arc<dyn TotalEndpoint>,
        ordering: ResponseOrdering,
    ) -> Self {
        info!(
            "Cart total updater bound to {} item(s), ordering: {}",
            page.item_count(),
            ordering
        );
        Self {
            page,
            endpoint,
            ordering,
        }
    }

    pub fn page(&self) -> &Arc<CartPage> {
        &self.page
    }

    /// Number of requests issued so far.
    pub fn issued_count(&self) -> u64 {
        self.page.issued_count()
    }

    /// Checks or unchecks an item. A change event fires, and a request goes
    /// out, only when the state actually changes.
    pub fn set_selected(
        &self,
        id: &str,
        selected: bool,
    ) -> Result<Option<JoinHandle<UpdateOutcome>>, UpdaterError> {
        match self.page.change(id, selected) {
            Change::UnknownItem => Err(UpdaterError::UnknownItem { id: id.to_string() }),
            Change::Unchanged => {
                debug!("Item '{}' already {}, no change event", id, state_name(selected));
                Ok(None)
            }
            Change::Changed(snapshot) => {
                debug!("Item '{}' {}", id, state_name(selected));
                Ok(Some(self.issue(snapshot)))
            }
        }
    }

    /// Change event handler for the page as it stands. Must be called from
    /// within a tokio runtime.
    pub fn handle_change(&self) -> JoinHandle<UpdateOutcome> {
        self.issue(self.page.snapshot())
    }

    fn issue(&self, snapshot: Snapshot) -> JoinHandle<UpdateOutcome> {
        let Snapshot { seq, selection } = snapshot;
        debug!(
            "Issuing total request #{} for {} selected item(s): {}",
            seq,
            selection.len(),
            selection.to_query()
        );

        let page = Arc::clone(&self.page);
        let endpoint = Arc::clone(&self.endpoint);
        let ordering = self.ordering;

        tokio::spawn(async move {
            match endpoint.fetch_total(&selection).await {
                Ok(response) => apply_total(&page, ordering, seq, response.display_text()),
                Err(error) => {
                    error!("Error fetching total (request #{}): {}", seq, error);
                    UpdateOutcome::Failed { seq, error }
                }
            }
        })
    }
}

fn apply_total(page: &CartPage, ordering: ResponseOrdering, seq: u64, text: String) -> UpdateOutcome {
    let display = page.display();
    match ordering {
        ResponseOrdering::LastResolved => {
            display.apply(seq, text.clone());
        }
        ResponseOrdering::LatestIssued => {
            if !display.apply_if_newer(seq, text.clone()) {
                let applied_seq = display.applied_seq();
                debug!(
                    "Dropping total from request #{}; request #{} is already shown",
                    seq, applied_seq
                );
                return UpdateOutcome::Superseded { seq, applied_seq };
            }
        }
    }

    info!("Total updated to '{}' (request #{})", text, seq);
    UpdateOutcome::Applied { seq, text }
}

fn state_name(selected: bool) -> &'static str {
    if selected {
        "checked"
    } else {
        "unchecked"
    }
}
