//! # Redline CLI
//!
//! Applies change files to plain text documents and searches a directory of
//! them.
//!
//! ## Change file format
//!
//! ```text
//! {"changes": [
//!   {"target": {"text": "contract", "occurrence": 2}, "replacement": "agreement"},
//!   {"range": {"start": 0, "end": 3}, "replacement": "This"}
//! ]}
//! ```
//!
//! Offsets are character offsets into the text as read from disk.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use redline_core::{
    apply_changes, Applied, ChangeRequest, ChangeSet, ChangeSpec, EditError, ResolvedEdit, Resolver,
    VersionTag,
};
use redline_db::{
    DbError, DocumentId, DocumentStore, SearchOptions, SearchResults, StoreConfig, StoreEvent,
};
use tracing::{debug, warn};

// ─── CLI ───────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "redline")]
#[command(about = "Apply structured redlines to text documents and search them")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the version tag of a text file
    Tag { file: PathBuf },
    /// Show the edits a change file would make, without writing anything
    Preview {
        file: PathBuf,
        #[arg(short, long)]
        changes: PathBuf,
    },
    /// Apply a change file to a text file
    Apply {
        file: PathBuf,
        #[arg(short, long)]
        changes: PathBuf,
        /// Only apply if the file still has this version tag
        #[arg(long)]
        etag: Option<String>,
        /// Write the result here instead of overwriting FILE
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Search every .txt file in a directory
    Search {
        dir: PathBuf,
        query: String,
        #[arg(short, long)]
        limit: Option<usize>,
        #[arg(long, default_value_t = 0)]
        offset: usize,
        /// JSON store configuration
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Walk through a redline, a stale tag conflict and a search
    Demo,
}

// ─── Pretty printing ──────────────────────────────────────────────────────

fn header(text: &str) {
    let bar = "═".repeat(60);
    println!("\n{}", bar.bright_cyan());
    println!("  {}", text.bold().bright_white());
    println!("{}", bar.bright_cyan());
}

fn section(text: &str) {
    println!("\n{} {}", "▸".bright_yellow(), text.bold());
}

fn step(text: &str) {
    println!("  {} {}", "•".bright_green(), text);
}

fn show_edits(edits: &[ResolvedEdit]) {
    if edits.is_empty() {
        println!("  {}", "(no edits)".dimmed());
    }
    for edit in edits {
        println!(
            "  {} {} {} {}",
            format!("[{}..{}]", edit.start, edit.end).bright_magenta(),
            format!("{:?}", edit.original).red().strikethrough(),
            "→".bright_cyan(),
            format!("{:?}", edit.replacement).bright_green()
        );
    }
}

fn show_results(results: &SearchResults, names: &dyn Fn(u64) -> String) {
    println!(
        "  {} of {} matching documents (offset {})",
        results.results.len().to_string().bold(),
        results.total.to_string().bold(),
        results.offset
    );
    for hit in &results.results {
        println!(
            "\n  {} {} {}",
            names(hit.document_id).bright_yellow(),
            hit.title.bold(),
            format!("score {}", hit.score).dimmed()
        );
        for snippet in &hit.context {
            println!("    {}", snippet);
        }
    }
}

// ─── File operations ──────────────────────────────────────────────────────

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn read_changes(path: &Path) -> Result<Vec<ChangeSpec>> {
    let body = read_text(path)?;
    let set: ChangeSet = serde_json::from_str(&body)
        .with_context(|| format!("parsing change file {}", path.display()))?;
    Ok(set.into_specs()?)
}

/// Apply a change file to `file` and write the result to `output`.
fn apply_file(file: &Path, changes: &Path, etag: Option<&str>, output: &Path) -> Result<Applied> {
    let content = read_text(file)?;
    let current = VersionTag::of(&content);
    let expected = etag.map(str::parse::<VersionTag>).transpose()?;

    let request = ChangeRequest {
        changes: read_changes(changes)?,
        expected,
    };
    let applied = apply_changes(&content, &current, &request)?;

    fs::write(output, &applied.content)
        .with_context(|| format!("writing {}", output.display()))?;
    debug!(file = %output.display(), tag = %applied.tag, "changes written");
    Ok(applied)
}

/// Load every non-empty `.txt` file in `dir`, in name order.
fn load_corpus(store: &DocumentStore, dir: &Path) -> Result<Vec<(DocumentId, PathBuf)>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("listing {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().map_or(false, |ext| ext == "txt"))
        .collect();
    paths.sort();

    let mut loaded = Vec::with_capacity(paths.len());
    for path in paths {
        let content = read_text(&path)?;
        let title = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        match store.create(title, content) {
            Ok(doc) => loaded.push((doc.id, path)),
            Err(err @ (DbError::InvalidContent(_) | DbError::InvalidTitle(_))) => {
                warn!(file = %path.display(), error = %err, "skipping file");
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(loaded)
}

// ─── Commands ─────────────────────────────────────────────────────────────

fn run_tag(file: &Path) -> Result<()> {
    let content = read_text(file)?;
    println!("{}", VersionTag::of(&content));
    Ok(())
}

fn run_preview(file: &Path, changes: &Path) -> Result<()> {
    let content = read_text(file)?;
    let edits = Resolver::default().resolve(&content, &read_changes(changes)?)?;

    section(&format!("{} edits against {}", edits.len(), file.display()));
    show_edits(&edits);
    Ok(())
}

fn run_apply(
    file: &Path,
    changes: &Path,
    etag: Option<&str>,
    output: Option<&Path>,
    json: bool,
) -> Result<()> {
    let applied = apply_file(file, changes, etag, output.unwrap_or(file))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&applied)?);
        return Ok(());
    }

    section(&format!("Applied {} edits", applied.edits.len()));
    show_edits(&applied.edits);
    step(&format!("previous tag {}", applied.previous_tag.to_string().dimmed()));
    step(&format!("new tag      {}", applied.tag.to_string().bright_green()));
    Ok(())
}

fn run_search(
    dir: &Path,
    query: &str,
    limit: Option<usize>,
    offset: usize,
    config: Option<&Path>,
    json: bool,
) -> Result<()> {
    let config = match config {
        Some(path) => StoreConfig::from_json(&read_text(path)?)?,
        None => StoreConfig::default(),
    };
    let store = DocumentStore::new(config);
    let loaded = load_corpus(&store, dir)?;

    let mut options = SearchOptions::new().offset(offset);
    if let Some(limit) = limit {
        options = options.limit(limit);
    }
    let results = store.search(query, &options)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    section(&format!("\"{}\" in {} documents", query, loaded.len()));
    let names = |id: u64| {
        loaded
            .iter()
            .find(|(doc, _)| doc.get() == id)
            .map(|(_, path)| path.display().to_string())
            .unwrap_or_else(|| id.to_string())
    };
    show_results(&results, &names);
    Ok(())
}

fn run_demo() -> Result<()> {
    header("DEMO - Redlines, Version Tags & Search");

    let store = DocumentStore::default();
    let mut events = store.subscribe();

    section("Phase 1: Create a contract");
    let doc = store.create("Master Agreement", "The contract contains the contract terms.")?;
    step(&format!("content: {:?}", &*doc.content));
    step(&format!("tag:     {}", doc.version));

    section("Phase 2: Redline the second \"contract\"");
    let request = ChangeRequest::new(vec![ChangeSpec::text("contract", 2, "agreement")])
        .with_expected(doc.version);
    let outcome = store.apply_changes(doc.id, &request)?;
    show_edits(&outcome.edits);
    step(&format!("content: {:?}", &*outcome.document.content));
    step(&format!("tag:     {}", outcome.document.version));

    section("Phase 3: Replay with the stale tag");
    match store.apply_changes(doc.id, &request) {
        Err(err) => step(&format!("{} {}", format!("{:?}", err.kind()).bright_red(), err)),
        Ok(_) => step(&"unexpected success".bright_red().to_string()),
    }

    section("Phase 4: Ask for an occurrence that does not exist");
    let missing = ChangeRequest::new(vec![ChangeSpec::text("contract", 3, "deal")]);
    if let Err(err) = store.apply_changes(doc.id, &missing) {
        step(&format!("{} {}", format!("{:?}", err.kind()).bright_red(), err));
    }

    section("Phase 5: Search");
    store.create("Side Letter", "This letter amends the agreement. The agreement stands.")?;
    let results = store.search("agreement", &SearchOptions::new())?;
    show_results(&results, &|id: u64| format!("#{}", id));

    section("Phase 6: Undo with inverse edits");
    let undo = ChangeRequest {
        changes: outcome
            .inverse()
            .into_iter()
            .map(|edit| ChangeSpec::range(edit.start, edit.end, edit.replacement))
            .collect(),
        expected: Some(outcome.document.version),
    };
    let restored = store.apply_changes(doc.id, &undo)?;
    step(&format!("content: {:?}", &*restored.document.content));
    step(&format!(
        "tag matches original: {}",
        if restored.document.version == doc.version {
            "yes".bright_green()
        } else {
            "no".bright_red()
        }
    ));

    section("Committed events");
    while let Ok(event) = events.try_recv() {
        let line = match event {
            StoreEvent::Created { id, version } => format!("created #{} {}", id, version.short()),
            StoreEvent::Changed { id, previous, version, edits, .. } => format!(
                "changed #{} {} → {} ({} edits)",
                id,
                previous.short(),
                version.short(),
                edits.len()
            ),
            StoreEvent::Renamed { id, title } => format!("renamed #{} {:?}", id, title),
            StoreEvent::Deleted { id } => format!("deleted #{}", id),
            StoreEvent::Reindexed { documents } => format!("reindexed {} documents", documents),
        };
        step(&line);
    }
    Ok(())
}

/// Print an error with its category when it has one.
fn report(err: &anyhow::Error) {
    let kind = err
        .downcast_ref::<DbError>()
        .map(DbError::kind)
        .or_else(|| err.downcast_ref::<EditError>().map(EditError::kind));

    match kind {
        Some(kind) => eprintln!(
            "{} {}: {:#}",
            "error".bright_red().bold(),
            format!("{:?}", kind).bold(),
            err
        ),
        None => eprintln!("{} {:#}", "error".bright_red().bold(), err),
    }
}

// ─── Entry point ───────────────────────────────────────────────────────────

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Tag { file } => run_tag(&file),
        Commands::Preview { file, changes } => run_preview(&file, &changes),
        Commands::Apply { file, changes, etag, output, json } => {
            run_apply(&file, &changes, etag.as_deref(), output.as_deref(), json)
        }
        Commands::Search { dir, query, limit, offset, config, json } => {
            run_search(&dir, &query, limit, offset, config.as_deref(), json)
        }
        Commands::Demo => run_demo(),
    };

    if let Err(err) = result {
        report(&err);
        std::process::exit(1);
    }
}
