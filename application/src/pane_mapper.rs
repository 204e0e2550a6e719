//! Pane name to pane index mapping.

use crate::ports::pane_manager::PaneInfo;
use std::collections::HashMap;

/// Maps pane titles to the pane manager's indices.
///
/// Rebuilt from scratch on every refresh. A miss means the pane is gone (or
/// not up yet); callers treat it as "can't jump there", never as a hard error.
#[derive(Debug, Clone, Default)]
pub struct PaneMapper {
    by_title: HashMap<String, u32>,
}

impl PaneMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the mapping with `panes`. Blank titles are skipped; if two panes
    /// share a title the first one wins.
    pub fn refresh(&mut self, panes: &[PaneInfo]) {
        self.by_title.clear();
        for pane in panes {
            let title = pane.title.trim();
            if title.is_empty() {
                continue;
            }
            self.by_title.entry(title.to_string()).or_insert(pane.index);
        }
    }

    pub fn lookup(&self, name: &str) -> Option<u32> {
        self.by_title.get(name).copied()
    }

    pub fn can_jump(&self, name: &str) -> bool {
        self.by_title.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.by_title.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_title.is_empty()
    }
}
