use serde::{Deserialize, Serialize};

use crate::params::ParameterBag;
use crate::query::format_ms;

/// A drill-down refinement of a base query — e.g. a previously selected
/// call-tree node — carried across navigations via side-scoped
/// parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSelection {
    pub expression: String,
    pub from: f64,
    pub to: f64,
    pub merge: bool,
    pub labels: Vec<String>,
    pub profile_name: String,
    /// Timestamp of the selected profile, kept opaque.
    pub time: Option<String>,
}

impl ProfileSelection {
    /// Build a selection from side parameters. `expression` is the one
    /// mandatory field; without it there is nothing to select and the
    /// result is `None`, never an error.
    pub fn from_params(
        expression: &str,
        from: f64,
        to: f64,
        merge: bool,
        labels: Vec<String>,
        profile_name: &str,
        time: Option<String>,
    ) -> Option<Self> {
        if expression.is_empty() {
            return None;
        }
        Some(Self {
            expression: expression.to_string(),
            from,
            to,
            merge,
            labels,
            profile_name: profile_name.to_string(),
            time,
        })
    }

    /// The selection's native (unsuffixed) parameters. Intent builders
    /// rewrite these keys into one side's scope when carrying the
    /// selection through a navigation.
    pub fn history_params(&self) -> ParameterBag {
        let mut bag = ParameterBag::new();
        bag.insert("expression", self.expression.as_str());
        bag.insert("from", format_ms(self.from));
        bag.insert("to", format_ms(self.to));
        bag.insert("merge", if self.merge { "true" } else { "false" });
        if !self.labels.is_empty() {
            bag.insert("labels", self.labels.clone());
        }
        if !self.profile_name.is_empty() {
            bag.insert("profile_name", self.profile_name.as_str());
        }
        if let Some(time) = &self.time {
            bag.insert("time", time.as_str());
        }
        bag
    }
}
