//! Modal stack
//!
//! Blocking overlays register themselves here. The hero section pauses its
//! media while anything is open. Each overlay closes only its own entry, so
//! closing a nested picker leaves the modal beneath it open.

use smallvec::SmallVec;
use tracing::trace;

/// Overlays that block the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModalKind {
    /// Product detail sheet
    ProductDetail,

    /// Complimentary packaging picker
    PackagingPicker,

    /// Contact or wholesale form
    Inquiry,

    /// Checkout form
    Checkout,
}

/// Open overlays, front-most last.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModalStack {
    open: SmallVec<[ModalKind; 4]>,
}

impl ModalStack {
    /// Push an overlay to the front.
    pub fn open(&mut self, kind: ModalKind) {
        self.open.push(kind);

        trace!(?kind, depth = self.open.len(), "modal opened");
    }

    /// Remove the most recent entry of `kind`. Returns `false` if none was
    /// open.
    pub fn close(&mut self, kind: ModalKind) -> bool {
        let Some(index) = self.open.iter().rposition(|open| *open == kind) else {
            return false;
        };

        self.open.remove(index);

        trace!(?kind, depth = self.open.len(), "modal closed");

        true
    }

    /// Whether any overlay is open.
    pub fn is_open(&self) -> bool {
        !self.open.is_empty()
    }

    /// Whether an overlay of `kind` is open.
    pub fn contains(&self, kind: ModalKind) -> bool {
        self.open.contains(&kind)
    }

    /// Front-most overlay.
    pub fn top(&self) -> Option<ModalKind> {
        self.open.last().copied()
    }

    /// Number of open overlays.
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Close everything.
    pub fn clear(&mut self) {
        self.open.clear();
    }
}
