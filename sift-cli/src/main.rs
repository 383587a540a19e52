//! sift: query JSON document trees with CSS selectors
//!
//! Usage:
//!   sift 'div > p.lead' --file page.json      Print each matching node
//!   sift 'li:nth-child(odd)' --file - < page.json
//!   sift 'a[href]' --json '{"type": "element", ...}' --count

use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use owo_colors::OwoColorize;
use sift_common::warning::set_quiet;
use sift_dom::{DomTree, format_node, print_tree};

/// Select nodes from a JSON document tree with a CSS selector
#[derive(Parser, Debug)]
#[command(name = "sift")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Paragraphs directly inside the main div
    sift 'div#main > p' --file page.json

    # Read the document from stdin
    cat page.json | sift 'ul li:first-child' --file -

    # Count links to PDFs
    sift 'a[href$=".pdf"]' --file page.json --count

    # Inline document
    sift 'p' --json '{"type": "element", "tagName": "p"}'
"#)]
struct Cli {
    /// Selector to evaluate, e.g. `div.note > p:first-child`
    #[arg(value_name = "SELECTOR")]
    selector: String,

    /// JSON document to load (`-` reads stdin)
    #[arg(short, long, value_name = "FILE", conflicts_with = "json")]
    file: Option<PathBuf>,

    /// JSON document given inline instead of a file
    #[arg(long, value_name = "JSON")]
    json: Option<String>,

    /// Print the whole document tree before the matches
    #[arg(short, long)]
    tree: bool,

    /// Print only the number of matches
    #[arg(short, long)]
    count: bool,

    /// Disable coloured output
    #[arg(long)]
    no_color: bool,

    /// Suppress selector warnings on stderr
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    set_quiet(cli.quiet);

    let tree = load_tree(&cli)?;

    if cli.tree {
        println!("=== Document Tree ===");
        print_tree(&tree, tree.root(), 0);
        println!();
    }

    let matches = sift_select::select(&tree, &cli.selector)
        .with_context(|| format!("cannot evaluate selector '{}'", cli.selector))?;

    if cli.count {
        println!("{}", matches.len());
        return Ok(());
    }

    for id in matches {
        let line = format_node(&tree, id);
        if cli.no_color {
            println!("{line}");
        } else {
            println!("{}", line.green());
        }
    }
    Ok(())
}

/// Load the document named by the CLI arguments.
fn load_tree(cli: &Cli) -> Result<DomTree> {
    let json = if let Some(ref inline) = cli.json {
        inline.clone()
    } else if let Some(ref path) = cli.file {
        if path.as_os_str() == "-" {
            io::read_to_string(io::stdin()).context("cannot read document from stdin")?
        } else {
            fs::read_to_string(path)
                .with_context(|| format!("cannot read '{}'", path.display()))?
        }
    } else {
        bail!("no document given: pass --file <FILE> or --json <JSON>")
    };

    DomTree::from_json(&json).context("cannot load document")
}
