//! `emberview` — inspect and rewrite profile-explorer URL state from the
//! terminal.
//!
//! The positional argument is the current URL (or a bare query string).
//! With no subcommand the derived view is printed; with one, the
//! matching navigation intent is applied and the next URL is written to
//! stdout, ready to paste back in.

#![allow(clippy::print_stdout)]

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use emberview_core::{
    DEFAULT_RANGE_KEY, DateRangeResolver, ExplorerView, MemoryStore, Navigator, ParameterBag,
    ProfileExplorer, ProfileSelection, Query, RelativeRangeResolver, Side, ViewMode,
};

#[derive(Parser)]
#[command(name = "emberview", version, about = "Profile-explorer URL state tool")]
struct Cli {
    /// Current explorer URL, or a bare query string.
    url: String,

    /// Emit machine-readable JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run a fresh query, resetting the targeted side.
    Query {
        #[arg(long)]
        expression: String,
        /// Symbolic range key, e.g. "last-hour" or "last-15-minutes".
        #[arg(long, default_value = DEFAULT_RANGE_KEY)]
        time_selection: String,
        /// Absolute lower bound in ms (overrides --time-selection with --to).
        #[arg(long, requires = "to")]
        from: Option<f64>,
        /// Absolute upper bound in ms.
        #[arg(long, requires = "from")]
        to: Option<f64>,
        #[arg(long)]
        merge: bool,
        #[arg(long, default_value = "")]
        profile_name: String,
        /// Side to rewrite when comparing; ignored on the single view.
        #[arg(long, value_enum, default_value = "a")]
        side: SideArg,
    },
    /// Overlay a drill-down selection onto one side.
    Select {
        #[arg(long, value_enum, default_value = "a")]
        side: SideArg,
        #[arg(long)]
        expression: String,
        #[arg(long)]
        from: f64,
        #[arg(long)]
        to: f64,
        #[arg(long)]
        merge: bool,
        /// Repeatable label filter, e.g. --label job=api.
        #[arg(long = "label")]
        labels: Vec<String>,
        #[arg(long, default_value = "")]
        profile_name: String,
        /// Timestamp of the selected profile.
        #[arg(long)]
        time: Option<String>,
    },
    /// Enter compare mode, seeding side B from side A.
    Compare,
    /// Close one compared side.
    Close {
        #[arg(long, value_enum)]
        side: SideArg,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SideArg {
    A,
    B,
}

impl From<SideArg> for Side {
    fn from(side: SideArg) -> Self {
        match side {
            SideArg::A => Side::A,
            SideArg::B => Side::B,
        }
    }
}

/// Prints each navigation as a URL on stdout.
struct PrintNavigator {
    json: bool,
}

impl Navigator for PrintNavigator {
    fn navigate_to(&mut self, path: &str, params: ParameterBag) {
        let query = params.to_query_str();
        if self.json {
            println!("{}", serde_json::json!({ "path": path, "query": query }));
        } else {
            println!("{path}?{query}");
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let bag = ParameterBag::from_query_str(query_part(&cli.url));
    let mut explorer = ProfileExplorer::new(
        PrintNavigator { json: cli.json },
        MemoryStore::default(),
        RelativeRangeResolver,
    );
    let view = explorer.sync(&bag);

    match cli.command {
        None => print_view(&view, cli.json)?,
        Some(Command::Query {
            expression,
            time_selection,
            from,
            to,
            merge,
            profile_name,
            side,
        }) => {
            let range = RelativeRangeResolver.resolve(&time_selection);
            let (from, to) = match (from, to) {
                (Some(from), Some(to)) => (from, to),
                _ => (range.from_ms, range.to_ms),
            };
            let query = Query {
                expression,
                from,
                to,
                merge,
                profile_name,
                time_selection: range.key,
            };
            match view.mode() {
                ViewMode::Single => explorer.run_query(&bag, &query),
                ViewMode::Compare => explorer.run_compare_query(&bag, side.into(), &query),
            }
        }
        Some(Command::Select {
            side,
            expression,
            from,
            to,
            merge,
            labels,
            profile_name,
            time,
        }) => {
            let selection =
                ProfileSelection::from_params(&expression, from, to, merge, labels, &profile_name, time)
                    .context("a selection needs a non-empty --expression")?;
            explorer.select_profile(&bag, side.into(), &selection);
        }
        Some(Command::Compare) => {
            anyhow::ensure!(
                view.mode() == ViewMode::Single,
                "already comparing; close a side first"
            );
            explorer.enter_compare(&bag);
        }
        Some(Command::Close { side }) => {
            anyhow::ensure!(
                view.mode() == ViewMode::Compare,
                "not comparing; nothing to close"
            );
            explorer.close_side(&bag, side.into());
        }
    }
    Ok(())
}

/// The query-string portion of the input: everything after `?` if there
/// is one, otherwise the whole argument.
fn query_part(url: &str) -> &str {
    match url.split_once('?') {
        Some((_, query)) => query,
        None => url,
    }
}

fn print_view(view: &ExplorerView, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(view)?);
        return Ok(());
    }
    match view {
        ExplorerView::Single { query, selection } => {
            println!("mode: single");
            print_query("a", query);
            print_selection("a", selection.as_ref());
        }
        ExplorerView::Compare {
            query_a,
            query_b,
            selection_a,
            selection_b,
        } => {
            println!("mode: compare");
            print_query("a", query_a);
            print_selection("a", selection_a.as_ref());
            print_query("b", query_b);
            print_selection("b", selection_b.as_ref());
        }
    }
    Ok(())
}

fn print_query(side: &str, query: &Query) {
    let expression = urlencoding::decode(&query.expression)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| query.expression.clone());
    println!("query {side}: {expression:?}");
    println!(
        "  range: {} .. {} ({})",
        query.from, query.to, query.time_selection
    );
    if query.merge {
        println!("  merge: true");
    }
    if !query.profile_name.is_empty() {
        println!("  profile: {}", query.profile_name);
    }
}

fn print_selection(side: &str, selection: Option<&ProfileSelection>) {
    match selection {
        None => println!("selection {side}: none"),
        Some(selection) => {
            println!(
                "selection {side}: {} .. {}{}",
                selection.from,
                selection.to,
                selection
                    .time
                    .as_deref()
                    .map(|t| format!(" @ {t}"))
                    .unwrap_or_default()
            );
            for label in &selection.labels {
                println!("  label: {label}");
            }
        }
    }
}
