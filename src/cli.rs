//! Command line parsing.

use anyhow::{anyhow, bail, Context, Result};
use std::path::PathBuf;

use yukifiles_text_search::SearchOptions;

pub const USAGE: &str = "\
Usage:
  yukifiles edit <file> [--find Q] [--replace R] [--all] [--prev]
                        [--case-sensitive] [--whole-word] [--regex]
                        [--goto N] [--write]
  yukifiles upload <file>
  yukifiles help";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Edit(EditArgs),
    Upload { file: PathBuf },
    Help,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditArgs {
    pub file: PathBuf,
    pub find: Option<String>,
    pub replace: Option<String>,
    /// Replace every occurrence instead of the first one
    pub all: bool,
    /// Search backwards from the end
    pub prev: bool,
    pub case_sensitive: bool,
    pub whole_word: bool,
    pub regex: bool,
    pub goto: Option<usize>,
    /// Save the result back into the file's directory
    pub write: bool,
}

impl EditArgs {
    /// Config defaults with the flags given on the command line turned on.
    pub fn search_options(&self, defaults: &SearchOptions) -> SearchOptions {
        SearchOptions {
            case_sensitive: defaults.case_sensitive || self.case_sensitive,
            whole_word: defaults.whole_word || self.whole_word,
            regex: defaults.regex || self.regex,
        }
    }
}

/// Parse arguments (without the program name).
pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Command> {
    let mut args = args.into_iter();

    match args.next().as_deref() {
        None | Some("help" | "-h" | "--help") => Ok(Command::Help),
        Some("upload") => {
            let file = args.next().context("upload: missing <file>")?;
            if let Some(extra) = args.next() {
                bail!("upload: unexpected argument '{}'", extra);
            }
            Ok(Command::Upload {
                file: PathBuf::from(file),
            })
        }
        Some("edit") => parse_edit(args).map(Command::Edit),
        Some(other) => bail!("unknown command '{}'", other),
    }
}

fn parse_edit(mut args: impl Iterator<Item = String>) -> Result<EditArgs> {
    let mut parsed = EditArgs::default();
    let mut file = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--find" => parsed.find = Some(value(&mut args, "--find")?),
            "--replace" => parsed.replace = Some(value(&mut args, "--replace")?),
            "--all" => parsed.all = true,
            "--prev" => parsed.prev = true,
            "--case-sensitive" => parsed.case_sensitive = true,
            "--whole-word" => parsed.whole_word = true,
            "--regex" => parsed.regex = true,
            "--write" => parsed.write = true,
            "--goto" => {
                let line = value(&mut args, "--goto")?;
                parsed.goto = Some(
                    line.parse()
                        .map_err(|_| anyhow!("--goto expects a line number, got '{}'", line))?,
                );
            }
            flag if flag.starts_with("--") => bail!("edit: unknown option '{}'", flag),
            path if file.is_none() => file = Some(PathBuf::from(path)),
            extra => bail!("edit: unexpected argument '{}'", extra),
        }
    }

    parsed.file = file.context("edit: missing <file>")?;
    if parsed.replace.is_some() && parsed.find.is_none() {
        bail!("edit: --replace needs --find");
    }
    Ok(parsed)
}

fn value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
    args.next()
        .with_context(|| format!("{} expects a value", flag))
}
