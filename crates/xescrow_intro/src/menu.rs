//! Mobile navigation menu
//!
//! A plain open/closed toggle, independent of the intro.

use serde::Serialize;
use xescrow_core::{SharedReactiveGraph, State, Subscription};

/// In-page sections reachable from the menu
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Section {
    Features,
    Jurado,
    HowItWorks,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Features, Section::Jurado, Section::HowItWorks];

    /// Anchor id of the section in the page
    pub fn anchor(self) -> &'static str {
        match self {
            Section::Features => "features",
            Section::Jurado => "jurado",
            Section::HowItWorks => "how-it-works",
        }
    }

    pub fn from_anchor(anchor: &str) -> Option<Self> {
        let anchor = anchor.trim_start_matches('#');
        Self::ALL.into_iter().find(|s| s.anchor() == anchor)
    }
}

pub struct Menu {
    open: State<bool>,
}

impl Menu {
    pub fn new(graph: &SharedReactiveGraph) -> Self {
        Self {
            open: State::create(graph, false),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.get()
    }

    pub fn toggle(&self) {
        self.open.update_rebuild(|open| !open);
    }

    pub fn open(&self) {
        if !self.is_open() {
            self.open.set_rebuild(true);
        }
    }

    pub fn close(&self) {
        if self.is_open() {
            self.open.set_rebuild(false);
        }
    }

    /// Navigate to `section`, closing the menu; returns the anchor to scroll to
    pub fn select(&self, section: Section) -> &'static str {
        self.close();
        tracing::debug!(anchor = section.anchor(), "menu navigation");
        section.anchor()
    }

    pub fn subscribe<F>(&self, mut callback: F) -> Subscription
    where
        F: FnMut(bool) + Send + 'static,
    {
        self.open.subscribe(move |open| callback(*open))
    }

    pub fn take_dirty(&self) -> bool {
        self.open.take_dirty()
    }
}
