//! Parsing the raw parameter bag into per-side structured state.

use serde::{Deserialize, Serialize};

use crate::params::{ParamValue, ParameterBag, Side};
use crate::selection::ProfileSelection;
use crate::time::DateRangeResolver;

/// One executable profiling query for one side.
///
/// `from`/`to` are milliseconds since the Unix epoch. Malformed numeric
/// input parses to NaN and is passed through; rejecting it is the query
/// executor's concern, not ours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub expression: String,
    pub from: f64,
    pub to: f64,
    pub merge: bool,
    pub profile_name: String,
    pub time_selection: String,
}

/// Everything derived from one side's parameters in a single parse pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideState {
    pub query: Query,
    pub selection: Option<ProfileSelection>,
    /// Raw `compare_<side>` flag, exactly as it appeared in the bag.
    pub compare: Option<String>,
}

/// `time_selection` normalized to its canonical key, plus the effective
/// bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct SanitizedRange {
    pub time_selection: String,
    pub from: f64,
    pub to: f64,
}

/// Default the date range from the symbolic selection when *both* bounds
/// are absent; otherwise the supplied values pass through verbatim (a
/// lone bound is an explicit partial override and is left alone). The
/// selection key is normalized to its canonical spelling either way.
pub fn sanitize_date_range(
    time_selection: Option<&str>,
    from: Option<&str>,
    to: Option<&str>,
    resolver: &dyn DateRangeResolver,
) -> SanitizedRange {
    let resolved = resolver.resolve(time_selection.unwrap_or_default());
    if from.is_none() && to.is_none() {
        SanitizedRange {
            time_selection: resolved.key,
            from: resolved.from_ms,
            to: resolved.to_ms,
        }
    } else {
        SanitizedRange {
            time_selection: resolved.key,
            from: parse_ms(from),
            to: parse_ms(to),
        }
    }
}

/// Parse one side of the bag into its query, optional drill-down
/// selection, and raw compare flag.
pub fn parse_side(bag: &ParameterBag, side: Side, resolver: &dyn DateRangeResolver) -> SideState {
    let expression = expression_as_string(bag.get(&side.key("expression")));
    let range = sanitize_date_range(
        bag.get_str(&side.key("time_selection")),
        bag.get_str(&side.key("from")),
        bag.get_str(&side.key("to")),
        resolver,
    );
    let merge = bag.get_str(&side.key("merge")) == Some("true");
    let profile_name = bag
        .get_str(&side.key("profile_name"))
        .unwrap_or_default()
        .to_string();
    let labels = match bag.get(&side.key("labels")) {
        None => Vec::new(),
        Some(ParamValue::Single(value)) => vec![value.clone()],
        Some(ParamValue::Many(values)) => values.clone(),
    };
    let time = bag.get_str(&side.key("time")).map(str::to_string);

    let selection = ProfileSelection::from_params(
        &expression,
        range.from,
        range.to,
        merge,
        labels,
        &profile_name,
        time,
    );
    let query = Query {
        expression,
        from: range.from,
        to: range.to,
        merge,
        profile_name,
        time_selection: range.time_selection,
    };
    SideState {
        query,
        selection,
        compare: bag.get_str(&side.key("compare")).map(str::to_string),
    }
}

/// An `expression` parameter as one string. Routers may deliver a
/// repeated key as a list; those are comma-joined, which downstream
/// consumers rely on — do not change to a multi-value semantic.
pub(crate) fn expression_as_string(value: Option<&ParamValue>) -> String {
    value.map(ParamValue::join).unwrap_or_default()
}

/// Base-10 integer parse with NaN propagation: an absent or non-numeric
/// value yields NaN, and a trailing non-digit suffix is ignored the way
/// lenient URL-state parsers do (`"100px"` → 100).
pub(crate) fn parse_ms(value: Option<&str>) -> f64 {
    let Some(raw) = value else {
        return f64::NAN;
    };
    let raw = raw.trim();
    let (digits, negative) = match raw.strip_prefix('-') {
        Some(rest) => (rest, true),
        None => (raw.strip_prefix('+').unwrap_or(raw), false),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return f64::NAN;
    }
    let parsed: f64 = digits[..end].parse().unwrap_or(f64::NAN);
    if negative { -parsed } else { parsed }
}

/// Render a millisecond value back into parameter form. Integral values
/// (the common case) print without a fractional part so bags round-trip
/// textually; NaN prints as `NaN`, mirroring how it arrived.
pub(crate) fn format_ms(ms: f64) -> String {
    if ms.is_nan() {
        "NaN".to_string()
    } else if ms.fract() == 0.0 && ms.is_finite() {
        format!("{ms:.0}")
    } else {
        ms.to_string()
    }
}
