//! Left-panel tab switcher.
//!
//! Each tab targets a panel by id. Targets may be written with a leading `#`
//! (selector style); it is stripped once when the tab is registered, so
//! matching is always plain id against id.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelTab {
    pub label: String,
    /// Id of the panel this tab shows
    pub target: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Panel {
    pub id: String,
    pub active: bool,
}

/// Tabs and the panels they switch between
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelTabs {
    tabs: Vec<PanelTab>,
    panels: Vec<Panel>,
}

fn panel_id(target: &str) -> &str {
    target.strip_prefix('#').unwrap_or(target)
}

impl PanelTabs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_panel(&mut self, id: impl Into<String>) -> &mut Self {
        self.panels.push(Panel {
            id: id.into(),
            active: false,
        });
        self
    }

    /// Adds a tab targeting `target` (`"intel"` or `"#intel"`)
    pub fn add_tab(&mut self, label: impl Into<String>, target: &str) -> &mut Self {
        self.tabs.push(PanelTab {
            label: label.into(),
            target: panel_id(target).to_string(),
            active: false,
        });
        self
    }

    /// Activates tab `index` and exactly the panel it targets.
    ///
    /// A target matching no panel leaves every panel inactive. Out-of-range
    /// indices are ignored.
    pub fn activate(&mut self, index: usize) {
        let Some(target) = self.tabs.get(index).map(|t| t.target.clone()) else {
            log::warn!("no panel tab at index {}", index);
            return;
        };

        for (i, tab) in self.tabs.iter_mut().enumerate() {
            tab.active = i == index;
        }
        let mut found = false;
        for panel in &mut self.panels {
            panel.active = panel.id == target;
            found |= panel.active;
        }
        if !found {
            log::warn!("panel tab targets unknown panel '{}'", target);
        }
    }

    pub fn tabs(&self) -> &[PanelTab] {
        &self.tabs
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn active_tab(&self) -> Option<usize> {
        self.tabs.iter().position(|t| t.active)
    }

    /// Id of the visible panel, if any
    pub fn active_panel(&self) -> Option<&str> {
        self.panels.iter().find(|p| p.active).map(|p| p.id.as_str())
    }
}
