//! Wombat CLI
//!
//! Load a document from a file, a URL or an inline string, run a selector
//! over it and print what matched.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;
use wombat::common::net::BlockingClient;
use wombat::dom::{NodeId, Tree};
use wombat::html::format_tree;
use wombat::{Dom, OptionsOverride};

/// Query HTML documents with CSS-like selectors
#[derive(Parser, Debug)]
#[command(name = "wombat")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print every link in a file
    wombat ./index.html -s 'a[href]'

    # Text of the first heading on a page
    wombat https://example.com -s h1 -o text --first

    # Inspect how broken markup was recovered
    wombat --html '<div><p>open' -o tree --issues

    # Options from a JSON file
    wombat page.html -s script --options options.json
"#)]
struct Cli {
    /// Path to HTML file or URL to load
    #[arg(value_name = "FILE|URL")]
    path: Option<String>,

    /// Parse HTML string directly instead of file/URL
    #[arg(long, value_name = "HTML", conflicts_with = "path")]
    html: Option<String>,

    /// Selector to run (default: the whole document)
    #[arg(short, long)]
    selector: Option<String>,

    /// How to print each match
    #[arg(short, long, value_enum, default_value_t = Output::Outer)]
    output: Output,

    /// Only print the first match
    #[arg(long)]
    first: bool,

    /// JSON file with option overrides
    #[arg(long, value_name = "FILE")]
    options: Option<PathBuf>,

    /// Skip the cleanup pass (keep comments, scripts and styles)
    #[arg(long)]
    no_cleanup: bool,

    /// Match tag names case-sensitively
    #[arg(long)]
    case_sensitive: bool,

    /// Print recovered parse issues to stderr
    #[arg(short = 'I', long)]
    issues: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Output {
    /// Markup including the element itself
    Outer,
    /// Markup of the children
    Inner,
    /// All text below the node
    Text,
    /// Indented node outline
    Tree,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let dom = load_dom(&cli)?;
    let tree = dom.tree()?;

    if cli.issues {
        print_issues(&dom)?;
    }

    let matches = select_matches(&dom, cli.selector.as_deref())?;
    if matches.is_empty() {
        eprintln!("{}", "no matches".yellow());
        return Ok(());
    }

    let shown = if cli.first { &matches[..1] } else { &matches[..] };
    for (index, &id) in shown.iter().enumerate() {
        if shown.len() > 1 {
            println!("{}", format!("[{index}] node {id}").dimmed());
        }
        println!("{}", render(tree, id, cli.output));
    }
    Ok(())
}

/// Resolve the option overrides from `--options` and the flags
fn overrides(cli: &Cli) -> Result<OptionsOverride> {
    let mut overrides = match &cli.options {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("failed to read options file {}", path.display()))?;
            serde_json::from_str(&json)
                .with_context(|| format!("invalid options file {}", path.display()))?
        }
        None => OptionsOverride::default(),
    };
    if cli.no_cleanup {
        overrides.cleanup_input = Some(false);
    }
    if cli.case_sensitive {
        overrides.case_sensitive_tag_matching = Some(true);
    }
    Ok(overrides)
}

/// Load document from CLI arguments
fn load_dom(cli: &Cli) -> Result<Dom> {
    let overrides = overrides(cli)?;
    tracing::debug!(?overrides, "loading document");
    let mut dom = Dom::new();

    if let Some(ref html) = cli.html {
        dom.load_str_with(html, &overrides)?;
    } else if let Some(ref path) = cli.path {
        if path.starts_with("http://") || path.starts_with("https://") {
            dom.load_url_with(path, &BlockingClient::new(), &overrides)
                .with_context(|| format!("failed to load {path}"))?;
        } else {
            dom.load_file_with(path, &overrides)
                .with_context(|| format!("failed to load {path}"))?;
        }
    } else {
        anyhow::bail!("expected a file path, a URL or --html");
    }
    Ok(dom)
}

/// Run the selector, or pick the document node when there is none
fn select_matches(dom: &Dom, selector: Option<&str>) -> Result<Vec<NodeId>> {
    let Some(selector) = selector else {
        return Ok(vec![dom.root()?]);
    };
    let started = Instant::now();
    let matches = dom.find(selector)?.to_vec();
    tracing::debug!(
        selector,
        matches = matches.len(),
        elapsed_us = started.elapsed().as_micros(),
        "ran selector"
    );
    Ok(matches)
}

fn render(tree: &Tree, id: NodeId, output: Output) -> String {
    match output {
        Output::Outer => tree.outer_html(id),
        Output::Inner => tree.inner_html(id),
        Output::Text => tree.inner_text(id),
        Output::Tree => format_tree(tree, id).trim_end().to_string(),
    }
}

fn print_issues(dom: &Dom) -> Result<()> {
    let issues = dom.issues()?;
    if issues.is_empty() {
        eprintln!("{}", "no parse issues".green());
        return Ok(());
    }
    eprintln!("{}", format!("{} parse issues", issues.len()).bold());
    for issue in issues {
        eprintln!("  {} {}", format!("@{}", issue.position).cyan(), issue.message);
    }
    Ok(())
}
