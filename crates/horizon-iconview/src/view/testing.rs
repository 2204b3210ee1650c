//! Shared helpers for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use horizon_iconview_core::Size;

use crate::model::{CellOption, CellRenderer};

/// A renderer whose size depends on the item index and which counts queries.
pub struct CountingRenderer {
    size_for: Box<dyn Fn(usize) -> Size + Send + Sync>,
    calls: AtomicUsize,
    paints: AtomicUsize,
}

impl CountingRenderer {
    pub fn new(size_for: impl Fn(usize) -> Size + Send + Sync + 'static) -> Self {
        Self {
            size_for: Box::new(size_for),
            calls: AtomicUsize::new(0),
            paints: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn paints(&self) -> usize {
        self.paints.load(Ordering::SeqCst)
    }
}

impl CellRenderer for CountingRenderer {
    fn preferred_size(&self, option: &CellOption) -> Size {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.size_for)(option.index)
    }

    fn paint(&self, _option: &CellOption) {
        self.paints.fetch_add(1, Ordering::SeqCst);
    }
}
