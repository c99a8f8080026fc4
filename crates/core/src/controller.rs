//! The explorer controller: parse the incoming bag, decide which view
//! renders, and turn user intents into navigations.

use tracing::debug;

use crate::intents;
use crate::params::{ParameterBag, Side};
use crate::query::{Query, parse_side};
use crate::selection::ProfileSelection;
use crate::store::{CompareTransition, ExplorerStore};
use crate::time::DateRangeResolver;
use crate::view::{ExplorerView, ViewMode, resolve_view_mode};

/// The navigation layer: hands a complete parameter bag to whatever owns
/// history. Always called with path `/`; the bag becomes the query
/// string on the next read.
pub trait Navigator {
    fn navigate_to(&mut self, path: &str, params: ParameterBag);
}

/// Orchestrates one render cycle: raw bag in, view model out, intents
/// back to the navigator.
///
/// Holds no view state of its own — queries and selections are derived
/// fresh from the bag on every [`sync`](Self::sync). The only thing
/// remembered between syncs is the last observed compare-flag pair, so
/// the store transition fires once per flag change rather than once per
/// render.
pub struct ProfileExplorer<N, S, R> {
    navigator: N,
    store: S,
    resolver: R,
    seen_flags: Option<(Option<String>, Option<String>)>,
}

impl<N, S, R> ProfileExplorer<N, S, R>
where
    N: Navigator,
    S: ExplorerStore,
    R: DateRangeResolver,
{
    pub fn new(navigator: N, store: S, resolver: R) -> Self {
        Self {
            navigator,
            store,
            resolver,
            seen_flags: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut N {
        &mut self.navigator
    }

    /// Derive the view model for the current bag.
    ///
    /// Idempotent for a given bag: calling it again re-parses but does
    /// not re-dispatch — the compare transition goes to the store only
    /// when the `(compare_a, compare_b)` pair differs from the last
    /// observed one.
    pub fn sync(&mut self, bag: &ParameterBag) -> ExplorerView {
        let flags = (
            bag.get_str("compare_a").map(str::to_string),
            bag.get_str("compare_b").map(str::to_string),
        );
        let mode = resolve_view_mode(flags.0.as_deref(), flags.1.as_deref());
        if self.seen_flags.as_ref() != Some(&flags) {
            self.store.apply(CompareTransition {
                compare_mode: mode == ViewMode::Compare,
            });
            self.seen_flags = Some(flags);
        }

        match mode {
            ViewMode::Single => {
                let a = parse_side(bag, Side::A, &self.resolver);
                ExplorerView::Single {
                    query: a.query,
                    selection: a.selection,
                }
            }
            ViewMode::Compare => {
                let a = parse_side(bag, Side::A, &self.resolver);
                let b = parse_side(bag, Side::B, &self.resolver);
                ExplorerView::Compare {
                    query_a: a.query,
                    query_b: b.query,
                    selection_a: a.selection,
                    selection_b: b.selection,
                }
            }
        }
    }

    /// Run a new query on the single view.
    pub fn run_query(&mut self, bag: &ParameterBag, query: &Query) {
        self.navigate(intents::run_query(bag, query));
    }

    /// Run a new query for one side while comparing.
    pub fn run_compare_query(&mut self, bag: &ParameterBag, side: Side, query: &Query) {
        self.navigate(intents::run_compare_query(bag, side, query));
    }

    /// Overlay a drill-down selection onto one side.
    pub fn select_profile(&mut self, bag: &ParameterBag, side: Side, selection: &ProfileSelection) {
        self.navigate(intents::select_profile(bag, side, selection));
    }

    /// Enter compare mode, seeding side B from the current side A state.
    pub fn enter_compare(&mut self, bag: &ParameterBag) {
        let a = parse_side(bag, Side::A, &self.resolver);
        let next = intents::enter_compare(&a.query, a.selection.as_ref());
        self.toggle_compare();
        self.navigate(next);
    }

    /// Close one compared side and return to the single view.
    pub fn close_side(&mut self, bag: &ParameterBag, side: Side) {
        let next = intents::close_side(bag, side);
        self.toggle_compare();
        self.navigate(next);
    }

    fn toggle_compare(&mut self) {
        let target = !self.store.compare_mode();
        self.store.apply(CompareTransition {
            compare_mode: target,
        });
    }

    fn navigate(&mut self, next: ParameterBag) {
        debug!(params = %next.to_query_str(), "navigate");
        self.navigator.navigate_to("/", next);
    }
}
