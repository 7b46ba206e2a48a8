//! Command implementations for setconf-cli

pub mod add;
pub mod set;

use std::io::Write;
use std::path::Path;

use colored::Colorize;
use setconf_content::{Document, Edit, LineClassifier, Syntax};
use setconf_fs::{ConfigStore, io};
use tracing::debug;

use crate::cli::{Cli, Operation};
use crate::error::Result;

pub use add::run_add;
pub use set::{run_adjust, run_set, run_span, run_uncomment};

/// Carry out the operation described by the command line.
pub fn execute(cli: &Cli) -> Result<()> {
    let syntax = load_syntax(cli.syntax.as_deref())?;
    let classifier = LineClassifier::new(&syntax)?;
    let operation = cli.operation(&syntax, &classifier)?;

    let data = match operation {
        Operation::Add { .. } => add::read_or_create(&cli.file, cli.dry_run)?,
        _ => io::read_bytes(&cli.file)?,
    };
    let mut doc = Document::with_classifier(data, classifier);

    let edits = match operation {
        Operation::Set { key, value } => run_set(&mut doc, &key, &value),
        Operation::Span { key, value, end } => run_span(&mut doc, &key, &value, &end),
        Operation::Adjust { key, delta, sign } => run_adjust(&mut doc, &key, &delta, sign),
        Operation::Uncomment { key, value } => run_uncomment(&mut doc, &key, &value),
        Operation::Add { key, value, line } => run_add(&mut doc, &key, &value, &line),
    };

    if cli.dry_run {
        return print_edits(&mut std::io::stdout().lock(), &cli.file, &edits);
    }

    if doc.is_modified() {
        io::write_atomic(&cli.file, doc.source())?;
    } else {
        debug!(file = %cli.file.display(), "unchanged, not writing");
    }
    Ok(())
}

fn load_syntax(path: Option<&Path>) -> Result<Syntax> {
    let Some(path) = path else {
        return Ok(Syntax::default());
    };
    debug!(path = %path.display(), "loading syntax");
    Ok(ConfigStore::new().load(path)?)
}

fn print_edits(out: &mut impl Write, file: &Path, edits: &[Edit]) -> Result<()> {
    for edit in edits {
        writeln!(
            out,
            "{}:{}: {} -> {}",
            file.display().to_string().cyan(),
            edit.line,
            format!("{:?}", String::from_utf8_lossy(&edit.old_content)).red(),
            format!("{:?}", String::from_utf8_lossy(&edit.new_content)).green()
        )?;
    }
    out.flush()?;
    Ok(())
}
