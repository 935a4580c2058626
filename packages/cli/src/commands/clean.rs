use super::collect_inputs;
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use richedit_editor::{Document, EditSession};
use std::fs;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct CleanArgs {
    /// Input markup file or directory
    pub input: PathBuf,

    /// Rewrite files in place
    #[arg(short, long)]
    pub write: bool,
}

pub fn clean(args: CleanArgs, config: &Config) -> Result<()> {
    let files = collect_inputs(&args.input, config)?;

    if files.len() == 1 && args.input.is_file() && !args.write {
        let source = fs::read_to_string(&files[0])?;
        println!("{}", clean_markup(&source, config));
        return Ok(());
    }

    println!("🧽 {} Richedit Cleanup", "Starting".green().bold());
    println!("   Input: {}", args.input.display());
    println!();

    let mut cleaned = 0;
    for file in &files {
        let source = fs::read_to_string(file)?;
        let output = clean_markup(&source, config);
        if output == source {
            tracing::debug!("[Clean] {} unchanged", file.display());
            continue;
        }

        cleaned += 1;
        if args.write {
            fs::write(file, &output)?;
        }
        println!("   {} {}", "✓".green(), file.display());
    }

    println!();
    println!("✨ {} Cleanup complete!", "Done".green().bold());
    println!("   Files checked: {}", files.len());
    println!("   Files with formatting removed: {}", cleaned);

    Ok(())
}

/// Run the cleanup pipeline over a whole document
pub(crate) fn clean_markup(source: &str, config: &Config) -> String {
    let mut session = EditSession::with_config(Document::from_markup(source), config.editor.clone());
    session.select_all();
    session.clean_selection();
    session.markup()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_markup_strips_formatting() {
        let config = Config::default();
        let output = clean_markup(r#"<p class="lead"><b>Bold</b> <i>and</i> plain</p><p><br></p>"#, &config);
        assert_eq!(output, "<p>Bold and plain</p>");
    }

    #[test]
    fn test_clean_markup_empty_document() {
        assert_eq!(clean_markup("", &Config::default()), "");
    }
}
