mod cli;

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;
use std::time::Duration;

use cli::{Command, EditArgs};
use yukifiles_config::Config;
use yukifiles_editor::{DirectorySaveTarget, EditorAction, EditorEvent, EditorSession, FileKind};
use yukifiles_logger::{self as logger, LogEntry, LogLevel};
use yukifiles_progress::{ProgressUpdate, UploadProgress};

fn main() -> Result<()> {
    let config = Config::load().unwrap_or_default();
    init_logging(&config);

    let command = cli::parse(std::env::args().skip(1))?;
    let result = match command {
        Command::Help => {
            println!("{}", cli::USAGE);
            Ok(())
        }
        Command::Edit(args) => edit(&args, &config),
        Command::Upload { file } => upload(&file, &config),
    };

    if let Err(err) = &result {
        logger::error(format!("{:#}", err));
        for line in recent_warnings(&logger::entries()) {
            eprintln!("{}", line);
        }
    }
    result
}

/// Warnings logged before the failure, minus the final error itself.
fn recent_warnings(entries: &[LogEntry]) -> Vec<String> {
    let Some((_, earlier)) = entries.split_last() else {
        return Vec::new();
    };
    earlier
        .iter()
        .filter(|entry| entry.level >= LogLevel::Warn)
        .map(|entry| {
            format!(
                "[{}] {}: {}",
                entry.timestamp,
                entry.level.to_str(),
                entry.message
            )
        })
        .collect()
}

fn init_logging(config: &Config) {
    let level = config
        .logging
        .min_level
        .parse()
        .unwrap_or(LogLevel::Info);
    logger::init(
        config.log_file_path().ok(),
        config.logging.max_entries,
        level,
    );
}

/// Split a path into its directory (`.` when bare) and file name.
fn split_path(path: &Path) -> Result<(&Path, String)> {
    let name = path
        .file_name()
        .with_context(|| format!("Not a file path: {}", path.display()))?
        .to_string_lossy()
        .into_owned();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    Ok((dir, name))
}

fn edit(args: &EditArgs, config: &Config) -> Result<()> {
    let (dir, name) = split_path(&args.file)?;
    let kind = FileKind::detect(&name);
    if !kind.is_editable() {
        bail!("Cannot edit {} file: {}", kind, name);
    }

    let content = fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read file: {}", args.file.display()))?;
    let target = DirectorySaveTarget::new(dir);
    let mut session = EditorSession::open(&name, &content, config, Box::new(target));

    session.dispatch(EditorAction::SetOptions(
        args.search_options(&config.search),
    ))?;

    if let Some(line) = args.goto {
        if let EditorEvent::MovedTo { offset, position } =
            session.dispatch(EditorAction::GoToLine(line))?
        {
            println!("Line {}: offset {} ({})", line, offset, position);
        }
    }

    if let Some(query) = &args.find {
        if let EditorEvent::SearchUpdated { matches } =
            session.dispatch(EditorAction::SetQuery(query.clone()))?
        {
            println!("'{}': {} match(es)", query, matches);
        }
        run_search(&mut session, args)?;
    }

    let stats = session.stats();
    println!(
        "{} | {} lines, {} words, {} chars",
        session.cursor_position(),
        stats.lines,
        stats.words,
        stats.chars
    );

    if session.is_modified() {
        if args.write {
            session.dispatch(EditorAction::Save)?;
            println!("Saved {}", args.file.display());
        } else {
            print!("{}", session.buffer().text());
        }
    }
    Ok(())
}

fn run_search(session: &mut EditorSession, args: &EditArgs) -> Result<()> {
    let Some(replacement) = &args.replace else {
        let action = if args.prev {
            EditorAction::FindPrevious
        } else {
            EditorAction::FindNext
        };
        if let EditorEvent::MatchFound { offset, label } = session.dispatch(action)? {
            let selection = session.buffer().selection();
            println!(
                "Match {} at offset {}: {:?}",
                label,
                offset,
                session.buffer().selected_text()
            );
            logger::debug(format!("Selection {}..{}", selection.start, selection.end));
        }
        return Ok(());
    };

    session.dispatch(EditorAction::SetReplacement(replacement.clone()))?;
    if args.all {
        if let EditorEvent::Replaced { count } = session.dispatch(EditorAction::ReplaceAll)? {
            println!("Replaced {} occurrence(s)", count);
        }
    } else {
        if args.prev {
            session.dispatch(EditorAction::FindPrevious)?;
        }
        session.dispatch(EditorAction::ReplaceCurrent)?;
        println!("Replaced 1 occurrence, next match {}", session.match_label());
    }
    Ok(())
}

fn upload(file: &Path, config: &Config) -> Result<()> {
    let (_, name) = split_path(file)?;
    let size = fs::metadata(file)
        .with_context(|| format!("Failed to read file: {}", file.display()))?
        .len();

    let kind = FileKind::detect(&name);
    println!("Uploading {} ({} file, {} bytes)", name, kind, size);

    let upload = UploadProgress::start(
        config.upload.steps,
        Duration::from_millis(config.upload.step_interval_ms),
    );
    for update in upload.updates() {
        match update {
            ProgressUpdate::Progress {
                step,
                total,
                percent,
            } => println!("  {:>3}% ({}/{})", percent, step, total),
            ProgressUpdate::Completed => println!("Uploaded {}", name),
        }
    }
    Ok(())
}
