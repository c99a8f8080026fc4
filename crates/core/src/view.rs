use serde::{Deserialize, Serialize};

use crate::query::Query;
use crate::selection::ProfileSelection;

/// Which of the two mutually exclusive views should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Single,
    Compare,
}

/// Strict AND on the literal string `"true"`. Any other combination —
/// including an inconsistent pair injected from outside — resolves to
/// the single view. There is no compare-one-side mode.
pub fn resolve_view_mode(compare_a: Option<&str>, compare_b: Option<&str>) -> ViewMode {
    if compare_a == Some("true") && compare_b == Some("true") {
        ViewMode::Compare
    } else {
        ViewMode::Single
    }
}

/// Fully parsed view model handed to the render layer. Recomputed fresh
/// on every sync; renderers never see raw bag values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum ExplorerView {
    Single {
        query: Query,
        selection: Option<ProfileSelection>,
    },
    Compare {
        query_a: Query,
        query_b: Query,
        selection_a: Option<ProfileSelection>,
        selection_b: Option<ProfileSelection>,
    },
}

impl ExplorerView {
    pub fn mode(&self) -> ViewMode {
        match self {
            ExplorerView::Single { .. } => ViewMode::Single,
            ExplorerView::Compare { .. } => ViewMode::Compare,
        }
    }
}
