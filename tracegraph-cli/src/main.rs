//! tracegraph: compile agent execution traces into renderable graphs
//!
//! Reads a trace JSON file (as served by the assistant's trace endpoint) and
//! prints the node/edge graph a UI would render, or answers the hover and
//! click queries against it.
//!
//! # Subcommands
//! - `compile <trace> [--pretty]`: graph JSON
//! - `ancestors <trace> <span> [--json]`: parent chain, nearest first
//! - `descendants <trace> <span> [--json]`: subtree, depth first
//! - `highlight <trace> <span> [--pretty]`: graph with the hover path lit
//! - `show <trace> [--expand <span>]...`: text cards for every node

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracegraph_core::{
    compile_trace_with_config, get_ancestor_ids, get_descendant_ids, highlight_hovered,
    toggle_node_expansion, NodeView, Trace, TraceGraphConfig,
};
use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_CONFIG: &str = "tracegraph.toml";

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Debug, Parser)]
#[command(
    name = "tracegraph",
    version,
    about = "Compile agent execution traces into renderable graphs"
)]
struct Cli {
    /// Config file (TOML); missing file means defaults
    #[arg(short, long, env = "TRACEGRAPH_CONFIG", default_value = DEFAULT_CONFIG)]
    config: String,

    /// Log level override (trace, debug, info, warn, error)
    #[arg(long, value_parser = parse_level)]
    log_level: Option<Level>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compile a trace into nodes and edges
    Compile {
        /// Trace JSON file
        trace: PathBuf,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// List the ancestors of a span, nearest first
    Ancestors {
        /// Trace JSON file
        trace: PathBuf,

        /// Span to start from
        span: String,

        /// Output a JSON array instead of one id per line
        #[arg(long)]
        json: bool,
    },

    /// List the descendants of a span, depth first
    Descendants {
        /// Trace JSON file
        trace: PathBuf,

        /// Span to start from
        span: String,

        /// Output a JSON array instead of one id per line
        #[arg(long)]
        json: bool,
    },

    /// Compile and highlight the path through a hovered span
    Highlight {
        /// Trace JSON file
        trace: PathBuf,

        /// Hovered span
        span: String,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Print a text card for every node
    Show {
        /// Trace JSON file
        trace: PathBuf,

        /// Spans to expand (repeatable)
        #[arg(long = "expand", value_name = "SPAN")]
        expand: Vec<String>,
    },
}

// ============================================================================
// Commands
// ============================================================================

fn load_trace(path: &Path) -> anyhow::Result<Trace> {
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    let trace = Trace::from_reader(BufReader::new(file))
        .with_context(|| format!("cannot parse trace {}", path.display()))?;
    tracing::info!(
        session_id = %trace.session_id,
        events = trace.events.len(),
        "Loaded trace from {}",
        path.display()
    );
    Ok(trace)
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", out);
    Ok(())
}

fn print_ids(ids: &[String], json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(&ids, false);
    }
    for id in ids {
        println!("{}", id);
    }
    Ok(())
}

fn do_compile(trace: &Path, pretty: bool, config: &TraceGraphConfig) -> anyhow::Result<()> {
    let trace = load_trace(trace)?;
    let graph = compile_trace_with_config(&trace, config)?;
    print_json(&graph, pretty)
}

fn do_highlight(
    trace: &Path,
    span: &str,
    pretty: bool,
    config: &TraceGraphConfig,
) -> anyhow::Result<()> {
    let trace = load_trace(trace)?;
    let graph = compile_trace_with_config(&trace, config)?;
    if graph.node(span).is_none() {
        tracing::warn!(span_id = span, "Span not found in trace; every node will be dimmed");
    }
    let highlighted = highlight_hovered(&graph, &trace.events, span, &config.highlight)?;
    print_json(&highlighted, pretty)
}

fn do_show(trace: &Path, expand: &[String], config: &TraceGraphConfig) -> anyhow::Result<()> {
    let trace = load_trace(trace)?;
    let mut graph = compile_trace_with_config(&trace, config)?;
    for span in expand {
        graph.nodes = toggle_node_expansion(&graph.nodes, span);
    }

    if graph.nodes.is_empty() {
        eprintln!("Trace {} has no events", trace.session_id);
        return Ok(());
    }

    let now = chrono::Utc::now();
    println!("Session {} ({} events)\n", trace.session_id, trace.events.len());
    for node in &graph.nodes {
        println!("{}", NodeView::from_node(node, now).render_text());
    }
    Ok(())
}

fn parse_level(level: &str) -> anyhow::Result<Level> {
    level.parse().map_err(|_| {
        anyhow::anyhow!(
            "invalid log level '{}' (expected trace, debug, info, warn or error)",
            level
        )
    })
}

fn init_logging(level: Level) {
    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

// ============================================================================
// Main
// ============================================================================

fn main() {
    let cli = Cli::parse();

    let config = match TraceGraphConfig::load(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("tracegraph: failed to load config from {}: {}", cli.config, e);
            std::process::exit(1);
        }
    };

    let level = match cli.log_level {
        Some(level) => level,
        None => parse_level(&config.service.log_level).unwrap_or_else(|e| {
            eprintln!("tracegraph: service.log_level: {}; using info", e);
            Level::INFO
        }),
    };
    init_logging(level);

    let result = match &cli.command {
        Commands::Compile { trace, pretty } => do_compile(trace, *pretty, &config),
        Commands::Ancestors { trace, span, json } => load_trace(trace)
            .and_then(|t| Ok(get_ancestor_ids(&t.events, span)?))
            .and_then(|ids| print_ids(&ids, *json)),
        Commands::Descendants { trace, span, json } => load_trace(trace)
            .and_then(|t| Ok(get_descendant_ids(&t.events, span)?))
            .and_then(|ids| print_ids(&ids, *json)),
        Commands::Highlight {
            trace,
            span,
            pretty,
        } => do_highlight(trace, span, *pretty, &config),
        Commands::Show { trace, expand } => do_show(trace, expand, &config),
    };

    if let Err(e) = result {
        eprintln!("tracegraph: {:#}", e);
        std::process::exit(1);
    }
}

// ============================================================================
// Tests
// ============================================================================
