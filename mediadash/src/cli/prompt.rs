use std::io;
use std::path::PathBuf;

use client::Confirm;
use dialoguer::Confirm as Question;
use kernel::{FileId, MediaFile};
use tokio::io::AsyncReadExt;
use url::Url;

/// Blocking yes/no prompt on the terminal.
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&self, id: &FileId, file: Option<&MediaFile>) -> bool {
        let name = file.map_or_else(|| format!("file {id}"), |f| format!("'{}'", f.original_name));
        Question::new()
            .with_prompt(format!("Delete {name}? This cannot be undone"))
            .default(false)
            .interact()
            .unwrap_or_else(|e| {
                tracing::warn!("cannot read confirmation: {e}");
                false
            })
    }
}

/// Reads everything dragged into the terminal until EOF.
pub async fn read_dropped() -> io::Result<Vec<PathBuf>> {
    let mut input = String::new();
    tokio::io::stdin().read_to_string(&mut input).await?;
    Ok(parse_dropped(&input))
}

/// Splits what a terminal pastes for dropped files: whitespace separated,
/// quoted or backslash escaped paths and `file://` URIs.
pub fn parse_dropped(input: &str) -> Vec<PathBuf> {
    split_words(input)
        .iter()
        .filter(|w| !w.is_empty())
        .map(|w| to_path(w))
        .collect()
}

fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut in_word = false;
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None => match c {
                '\'' | '"' => {
                    quote = Some(c);
                    in_word = true;
                }
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        current.push(escaped);
                    }
                    in_word = true;
                }
                c if c.is_whitespace() => {
                    if in_word {
                        words.push(std::mem::take(&mut current));
                        in_word = false;
                    }
                }
                c => {
                    current.push(c);
                    in_word = true;
                }
            },
        }
    }
    if in_word {
        words.push(current);
    }
    words
}

fn to_path(word: &str) -> PathBuf {
    if word.starts_with("file://") {
        if let Some(path) = Url::parse(word).ok().and_then(|u| u.to_file_path().ok()) {
            return path;
        }
    }
    PathBuf::from(shellexpand::tilde(word).into_owned())
}
