use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock};

use crate::models::{item::SelectableItem, selection::SelectionSet};

/// In-process stand-in for the cart page: the checkboxes in document order and
/// the single element that shows the total.
#[derive(Debug, Default)]
pub struct CartPage {
    items: RwLock<Vec<SelectableItem>>,
    issued: AtomicU64,
    display: TotalDisplay,
}

/// Selection scanned for one request, with the sequence number it was issued under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub seq: u64,
    pub selection: SelectionSet,
}

/// Result of setting an item's checked state.
#[derive(Debug, PartialEq, Eq)]
pub enum Change {
    UnknownItem,
    Unchanged,
    Changed(Snapshot),
}

impl CartPage {
    pub fn new(items: Vec<SelectableItem>) -> Self {
        Self {
            items: RwLock::new(items),
            issued: AtomicU64::new(0),
            display: TotalDisplay::default(),
        }
    }

    pub fn with_display_text(self, text: impl Into<String>) -> Self {
        self.display.write(text);
        self
    }

    /// Copy of every item, in document order.
    pub fn items(&self) -> Vec<SelectableItem> {
        self.items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn item_count(&self) -> usize {
        self.items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Number of snapshots handed out so far.
    pub fn issued_count(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }

    /// Sets the checked state of every item carrying `id`. Only a real change
    /// counts as a change event; it yields a snapshot of the new selection.
    ///
    /// The toggle, the scan and the sequence number are taken under one write
    /// lock, so a higher sequence number always carries a later selection.
    pub fn change(&self, id: &str, selected: bool) -> Change {
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
        let mut found = false;
        let mut changed = false;
        for item in items.iter_mut().filter(|item| item.id == id) {
            found = true;
            if item.selected != selected {
                item.selected = selected;
                changed = true;
            }
        }

        match (found, changed) {
            (false, _) => Change::UnknownItem,
            (true, false) => Change::Unchanged,
            (true, true) => Change::Changed(self.issue(&items)),
        }
    }

    /// Snapshot of the current selection without touching any item.
    pub fn snapshot(&self) -> Snapshot {
        let items = self.items.write().unwrap_or_else(PoisonError::into_inner);
        self.issue(&items)
    }

    fn issue(&self, items: &[SelectableItem]) -> Snapshot {
        Snapshot {
            seq: self.issued.fetch_add(1, Ordering::SeqCst) + 1,
            selection: SelectionSet::scan(items),
        }
    }

    pub fn display(&self) -> &TotalDisplay {
        &self.display
    }
}

#[derive(Debug, Default)]
struct DisplayState {
    text: String,
    applied_seq: u64,
}

/// Text content of the total element, plus the sequence number of the
/// request whose result it shows.
#[derive(Debug, Default)]
pub struct TotalDisplay {
    state: Mutex<DisplayState>,
}

impl TotalDisplay {
    pub fn text(&self) -> String {
        self.lock().text.clone()
    }

    pub fn applied_seq(&self) -> u64 {
        self.lock().applied_seq
    }

    /// Overwrites the text without looking at sequence numbers.
    pub fn write(&self, text: impl Into<String>) {
        self.lock().text = text.into();
    }

    /// Writes the result of request `seq`, recording it as the latest applied.
    pub fn apply(&self, seq: u64, text: impl Into<String>) {
        let mut state = self.lock();
        state.text = text.into();
        state.applied_seq = state.applied_seq.max(seq);
    }

    /// Writes the result of request `seq` unless a later request has already
    /// been applied. Returns whether the text was written.
    pub fn apply_if_newer(&self, seq: u64, text: impl Into<String>) -> bool {
        let mut state = self.lock();
        if seq < state.applied_seq {
            return false;
        }
        state.text = text.into();
        state.applied_seq = seq;
        true
    }

    fn lock(&self) -> MutexGuard<'_, DisplayState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
