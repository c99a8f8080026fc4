//! Navigation intent builders.
//!
//! One pure function per user intent. Each takes the current parameter
//! bag (plus intent-specific arguments) and returns the *complete* next
//! bag to navigate to. Expression values are percent-encoded on every
//! write-back since they may contain characters unsafe in a query
//! string; unrelated parameters are never touched.

use crate::params::{
    ParameterBag, SUFFIX_A, SUFFIX_B, Side, filter_suffix, suffix_params, swap_suffix,
};
use crate::query::{Query, expression_as_string, format_ms};
use crate::selection::ProfileSelection;

const PROFILE_VIEW_KEY: &str = "currentProfileView";
/// The icicle graph is the landing view after any query change.
const PROFILE_VIEW_ICICLE: &str = "icicle";

fn encode_expression(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Write both compare flags through one helper so they can never
/// diverge; an unequal pair is not a reachable output of this module.
fn set_compare_flags(bag: &mut ParameterBag, on: bool) {
    let flag = if on { "true" } else { "false" };
    bag.insert("compare_a", flag);
    bag.insert("compare_b", flag);
}

fn bool_str(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

/// Write a fresh query under one side's keys.
fn write_query(bag: &mut ParameterBag, side: Side, query: &Query) {
    bag.insert(side.key("expression"), encode_expression(&query.expression));
    bag.insert(side.key("from"), format_ms(query.from));
    bag.insert(side.key("to"), format_ms(query.to));
    bag.insert(side.key("merge"), bool_str(query.merge));
    bag.insert(side.key("time_selection"), query.time_selection.as_str());
}

/// Re-encode an expression key in place, if present.
fn reencode_expression(bag: &mut ParameterBag, key: &str) {
    if bag.contains_key(key) {
        let joined = expression_as_string(bag.get(key));
        bag.insert(key, encode_expression(&joined));
    }
}

/// Run a new query on the single view.
///
/// Every existing `_a` key is dropped first: an expression or time
/// change invalidates whatever drill-down selection was attached to the
/// previous query.
pub fn run_query(bag: &ParameterBag, query: &Query) -> ParameterBag {
    let mut next = filter_suffix(bag, SUFFIX_A);
    write_query(&mut next, Side::A, query);
    next.insert(PROFILE_VIEW_KEY, PROFILE_VIEW_ICICLE);
    next
}

/// Overlay a drill-down selection onto one side.
///
/// Additive by design: a selection refines the side's existing query
/// rather than replacing it, so nothing is dropped — the selection's
/// native params are suffixed into the side's scope on top of the
/// current bag.
pub fn select_profile(
    bag: &ParameterBag,
    side: Side,
    selection: &ProfileSelection,
) -> ParameterBag {
    let mut next = bag.clone();
    reencode_expression(&mut next, &Side::A.key("expression"));
    reencode_expression(&mut next, &Side::B.key("expression"));
    let mut overlay = suffix_params(&selection.history_params(), side.suffix());
    reencode_expression(&mut overlay, &side.key("expression"));
    next.merge(overlay);
    next
}

/// Enter compare mode from the single view: side B is seeded as a copy
/// of the current side A query so both sides start identical. If a
/// selection existed for A, its native params are overlaid onto `_a`
/// first (the query keys win on collision, the selection's extra keys
/// survive).
pub fn enter_compare(query: &Query, selection: Option<&ProfileSelection>) -> ParameterBag {
    let mut next = ParameterBag::new();
    if let Some(selection) = selection {
        next.merge(suffix_params(&selection.history_params(), SUFFIX_A));
        reencode_expression(&mut next, &Side::A.key("expression"));
    }
    for side in [Side::A, Side::B] {
        write_query(&mut next, side, query);
        if !query.profile_name.is_empty() {
            next.insert(side.key("profile_name"), query.profile_name.as_str());
        }
    }
    set_compare_flags(&mut next, true);
    next.insert(PROFILE_VIEW_KEY, PROFILE_VIEW_ICICLE);
    next
}

/// Run a new query for one side while comparing. Drops that side's keys
/// (selection reset, as in [`run_query`]) and leaves the other side —
/// including its expression — untouched.
pub fn run_compare_query(bag: &ParameterBag, side: Side, query: &Query) -> ParameterBag {
    let mut next = filter_suffix(bag, side.suffix());
    write_query(&mut next, side, query);
    set_compare_flags(&mut next, true);
    next
}

/// Close one compared side, returning to the single view.
///
/// Closing "A" keeps side B's state: every `_b` value is first copied
/// onto its `_a` key, then the whole `_b` namespace is dropped. Closing
/// "B" just drops the `_b` namespace.
pub fn close_side(bag: &ParameterBag, side: Side) -> ParameterBag {
    let mut merged = match side {
        Side::A => swap_suffix(bag, SUFFIX_B, SUFFIX_A),
        Side::B => bag.clone(),
    };
    set_compare_flags(&mut merged, false);
    filter_suffix(&merged, SUFFIX_B)
}
