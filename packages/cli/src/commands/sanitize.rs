use super::collect_inputs;
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use richedit_editor::Sanitizer;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct SanitizeArgs {
    /// Input markup file or directory
    pub input: PathBuf,

    /// Rewrite files in place
    #[arg(short, long)]
    pub write: bool,

    /// Fail if any file would change
    #[arg(long, conflicts_with = "write")]
    pub check: bool,
}

pub fn sanitize(args: SanitizeArgs, config: &Config) -> Result<()> {
    let files = collect_inputs(&args.input, config)?;
    let sanitizer = Sanitizer::new(&config.editor.document_origin);

    // A single file without --write or --check goes to stdout
    if files.len() == 1 && args.input.is_file() && !args.write && !args.check {
        let source = fs::read_to_string(&files[0])?;
        println!("{}", sanitizer.sanitize_markup(&source));
        return Ok(());
    }

    println!("🧹 {} Richedit Sanitizer", "Starting".green().bold());
    println!("   Input: {}", args.input.display());
    println!("   Found {} markup files", files.len());
    println!();

    let mut changed = 0;
    for file in &files {
        if sanitize_file(&sanitizer, file, args.write)? {
            changed += 1;
            let marker = if args.check { "✗".red() } else { "✓".green() };
            println!("   {} {}", marker, file.display());
        } else {
            tracing::debug!("[Sanitize] {} already clean", file.display());
        }
    }

    println!();
    if args.check && changed > 0 {
        return Err(anyhow::anyhow!("{} file(s) contain disallowed markup", changed));
    }

    println!("✨ {} Sanitizing complete!", "Done".green().bold());
    println!("   Files checked: {}", files.len());
    if args.write {
        println!("   Files rewritten: {}", changed);
    } else {
        println!("   Files with disallowed markup: {}", changed);
    }

    Ok(())
}

/// Returns whether sanitizing changed the file's markup
fn sanitize_file(sanitizer: &Sanitizer, path: &Path, write: bool) -> Result<bool> {
    let source = fs::read_to_string(path)?;
    let sanitized = sanitizer.sanitize_markup(&source);
    if sanitized == source {
        return Ok(false);
    }
    if write {
        fs::write(path, &sanitized)?;
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_file_rewrites_only_when_asked() {
        let path = std::env::temp_dir().join(format!("richedit-cli-sanitize-{}.html", std::process::id()));
        fs::write(&path, r#"<p onclick="x()">hi<script>bad()</script></p>"#).unwrap();
        let sanitizer = Sanitizer::new("http://localhost");

        assert!(sanitize_file(&sanitizer, &path, false).unwrap());
        assert!(fs::read_to_string(&path).unwrap().contains("onclick"));

        assert!(sanitize_file(&sanitizer, &path, true).unwrap());
        let rewritten = fs::read_to_string(&path).unwrap();
        assert!(!rewritten.contains("onclick"));
        assert!(!sanitize_file(&sanitizer, &path, false).unwrap());

        fs::remove_file(&path).unwrap();
    }
}
