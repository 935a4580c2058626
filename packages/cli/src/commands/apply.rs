use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use richedit_editor::{Command, Document, EditSession, RecordingSink};
use std::fs;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// JSON file holding an array of commands
    pub script: PathBuf,

    /// Markup file the commands edit
    pub input: PathBuf,

    /// Write the edited markup here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print each content-changed notification
    #[arg(long)]
    pub trace_changes: bool,
}

pub fn apply(args: ApplyArgs, config: &Config) -> Result<()> {
    let script = fs::read_to_string(&args.script)
        .with_context(|| format!("Failed to read script {}", args.script.display()))?;
    let commands: Vec<Command> = serde_json::from_str(&script)
        .with_context(|| format!("Invalid command script {}", args.script.display()))?;
    let source = fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;

    let sink = RecordingSink::new();
    let document = Document::from_markup(&source).with_sink(sink.clone());
    let mut session = EditSession::with_config(document, config.editor.clone());

    let failures = replay(&mut session, commands);
    for failure in &failures {
        eprintln!("{} {}", "✗".red(), failure);
    }

    if args.trace_changes {
        for (index, snapshot) in sink.snapshots().iter().enumerate() {
            let shown = snapshot.as_deref().unwrap_or("<empty>");
            eprintln!("{} change {}: {}", "•".dimmed(), index + 1, shown.dimmed());
        }
    }

    match &args.output {
        Some(path) => {
            fs::write(path, session.markup())?;
            println!("{} {} → {}", "✓".green(), args.input.display(), path.display());
        }
        None => println!("{}", session.markup()),
    }
    tracing::info!("[Apply] {} content change(s)", sink.count());

    if !failures.is_empty() {
        return Err(anyhow::anyhow!("{} command(s) failed", failures.len()));
    }
    Ok(())
}

/// Apply every command in order, collecting failures instead of stopping
fn replay(session: &mut EditSession, commands: Vec<Command>) -> Vec<String> {
    let mut failures = Vec::new();
    for (index, command) in commands.into_iter().enumerate() {
        if let Err(err) = session.apply(command) {
            failures.push(format!("command {}: {}", index + 1, err));
        }
    }
    failures
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replay_script() {
        let script = r#"[
            { "SelectText": { "start": 0, "end": 5 } },
            { "ToggleFormat": { "format": "bold" } },
            "SelectAll",
            { "TransformText": { "mode": "uppercase" } }
        ]"#;
        let commands: Vec<Command> = serde_json::from_str(script).unwrap();
        let mut session = EditSession::new(Document::from_markup("<p>Hello there</p>"));

        let failures = replay(&mut session, commands);
        assert!(failures.is_empty());
        assert_eq!(session.markup(), "<p><b>HELLO</b> THERE</p>");
    }

    #[test]
    fn test_replay_continues_past_failures() {
        let commands = vec![
            Command::SelectText { start: 0, end: 0 },
            Command::InsertVideo(richedit_editor::VideoPayload::new("not a video")),
            Command::InsertHtml {
                markup: "<b>x</b>".into(),
            },
        ];
        let mut session = EditSession::new(Document::from_markup("<p>a</p>"));

        let failures = replay(&mut session, commands);
        assert_eq!(failures.len(), 1);
        assert!(failures[0].starts_with("command 2:"));
        assert_eq!(session.markup(), "<p><b>x</b>a</p>");
    }
}
