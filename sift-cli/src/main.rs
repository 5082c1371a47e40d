//! Sift CLI
//!
//! Runs a CSS selector against a JSON element tree and prints the matches.
//!
//! Run with: cargo run --bin sift -- 'div > p' --document page.json

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use owo_colors::OwoColorize;
use serde::Serialize;
use sift_dom::{DomTree, NodeId};
use sift_selector::Expression;
use sift_selector::tokenizer::Tokenizer;

/// Sift - CSS selector engine
#[derive(Parser, Debug)]
#[command(name = "sift")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Select from a document file
    sift 'ul > li:nth-child(odd)' --document page.json

    # Read the document from stdin
    cat page.json | sift '.note, #main p'

    # Print matches as JSON
    sift 'a[href^="https:"]' --document page.json --json

    # Show the token stream or the parsed selector without a document
    sift --tokens 'div:not(.a, .b)'
    sift --explain 'h1 + p ~ p'

    # Trace the parser and evaluator
    sift -vvv 'p:first-of-type' --document page.json
"#)]
struct Cli {
    /// Selector to evaluate
    selector: String,

    /// JSON document to search (reads stdin when omitted)
    #[arg(short, long, value_name = "PATH")]
    document: Option<PathBuf>,

    /// Print matches as a JSON array
    #[arg(long)]
    json: bool,

    /// Print the parsed selector as JSON and exit
    #[arg(long, conflicts_with = "tokens")]
    explain: bool,

    /// Print the token stream and exit
    #[arg(long)]
    tokens: bool,

    /// Raise the log level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

/// One matched element in `--json` output.
#[derive(Serialize)]
struct MatchRecord<'a> {
    node: usize,
    tag: &'a str,
    attributes: Vec<(&'a str, &'a str)>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.tokens {
        print_tokens(&cli.selector, !cli.no_color);
        return Ok(());
    }

    let expression: Expression = cli
        .selector
        .parse()
        .with_context(|| format!("invalid selector `{}`", cli.selector))?;
    log::info!("parsed selector: {expression}");

    if cli.explain {
        println!("{}", serde_json::to_string_pretty(&expression)?);
        return Ok(());
    }

    let tree = load_document(cli.document.as_deref())?;
    let matches = sift_selector::evaluate(&expression, &tree, NodeId::ROOT);
    log::info!("{} element(s) matched", matches.len());

    if cli.json {
        print_json(&tree, &matches)?;
    } else {
        print_matches(&tree, &matches, !cli.no_color);
    }

    Ok(())
}

/// `RUST_LOG` wins over the `-v` default.
fn init_logging(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

fn load_document(path: Option<&Path>) -> Result<DomTree> {
    let (source, text) = match path {
        Some(path) => (
            path.display().to_string(),
            fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?,
        ),
        None => (
            "<stdin>".to_string(),
            io::read_to_string(io::stdin()).context("failed to read stdin")?,
        ),
    };
    let tree = DomTree::from_json_str(&text)
        .with_context(|| format!("failed to load document from {source}"))?;
    log::debug!("loaded {} nodes from {source}", tree.len());
    Ok(tree)
}

fn print_tokens(selector: &str, color: bool) {
    for token in Tokenizer::new(selector) {
        let kind = token.kind.to_string();
        if color {
            println!("{:<16} {}", kind.cyan(), token.literal.yellow());
        } else {
            println!("{kind:<16} {}", token.literal);
        }
    }
}

fn print_matches(tree: &DomTree, matches: &[NodeId], color: bool) {
    for &id in matches {
        let Some(element) = tree.as_element(id) else {
            continue;
        };
        let mut label = String::new();
        if color {
            label.push_str(&element.tag_name.bold().to_string());
        } else {
            label.push_str(&element.tag_name);
        }
        if let Some(id_attr) = element.id() {
            let part = format!("#{id_attr}");
            label.push_str(&if color { part.green().to_string() } else { part });
        }
        for class in element.classes() {
            let part = format!(".{class}");
            label.push_str(&if color { part.blue().to_string() } else { part });
        }
        let node = format!("[node {}]", id.0);
        if color {
            println!("{label} {}", node.dimmed());
        } else {
            println!("{label} {node}");
        }
    }
}

fn print_json(tree: &DomTree, matches: &[NodeId]) -> Result<()> {
    let records: Vec<MatchRecord<'_>> = matches
        .iter()
        .filter_map(|&id| {
            tree.as_element(id).map(|element| MatchRecord {
                node: id.0,
                tag: &element.tag_name,
                attributes: element
                    .attributes()
                    .map(|attr| (attr.name.as_str(), attr.value.as_str()))
                    .collect(),
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}
