use serde::{Deserialize, Serialize};

/// User-facing strings and glyphs used by the Grid and its pagination control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridLabels {
    pub loading: String,
    pub edit: String,
    pub delete: String,
    /// Toggle glyph for a collapsed row.
    pub expand: String,
    /// Toggle glyph for the expanded row.
    pub collapse: String,
    pub previous: String,
    pub next: String,
    /// Page indicator template; `{page}` and `{total}` are substituted.
    pub page_indicator: String,
}

impl Default for GridLabels {
    fn default() -> Self {
        Self {
            loading: "Loading...".into(),
            edit: "Edit".into(),
            delete: "Delete".into(),
            expand: "▶".into(),
            collapse: "▼".into(),
            previous: "‹ Prev".into(),
            next: "Next ›".into(),
            page_indicator: "Page {page} of {total}".into(),
        }
    }
}

impl GridLabels {
    pub fn page_indicator(&self, page: u32, total_pages: u32) -> String {
        self.page_indicator
            .replace("{page}", &page.to_string())
            .replace("{total}", &total_pages.to_string())
    }

    pub fn toggle(&self, expanded: bool) -> &str {
        if expanded { &self.collapse } else { &self.expand }
    }
}
