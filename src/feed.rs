use crate::approach::{Approach, Sublane};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// A parsed spawn request from the vehicle feed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpawnRequest {
    /// Short alphanumeric vehicle identity.
    pub id: String,
    /// The approach to enter on.
    pub approach: Approach,
    /// The requested sublane; resolved to a random spawnable sublane when
    /// the record omits it.
    pub sublane: Option<Sublane>,
}

/// Polls the vehicle feed file written by an external producer.
///
/// The file is reopened on every poll: the producer truncates and rewrites
/// it periodically and no exclusive access is assumed, so a failed read is
/// just an empty batch. Malformed or incomplete lines are skipped.
pub struct FeedReader {
    path: PathBuf,
}

impl FeedReader {
    /// Creates a reader over the given feed file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The path being polled.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the feed once and returns every well-formed record in it.
    pub fn poll(&self) -> Vec<SpawnRequest> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) => {
                debug!("feed {} unreadable this poll: {}", self.path.display(), err);
                return Vec::new();
            }
        };
        // The producer truncate-rewrites the file, so a poll may catch the
        // final record mid-write. Only newline-terminated lines are trusted;
        // a partial tail is left for the next poll.
        let complete = if content.ends_with('\n') {
            content.as_str()
        } else {
            &content[..content.rfind('\n').map_or(0, |pos| pos + 1)]
        };
        complete.lines().filter_map(parse_line).collect()
    }
}

/// Parses one `<id>:<approach-letter>[:<sublane-digit>]` record. Returns
/// `None` for anything malformed.
fn parse_line(line: &str) -> Option<SpawnRequest> {
    let mut parts = line.trim().split(':');

    let id = parts.next()?.trim();
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }

    let approach_field = parts.next()?.trim();
    let mut letters = approach_field.chars();
    let approach = Approach::from_letter(letters.next()?)?;
    if letters.next().is_some() {
        return None;
    }

    let sublane = match parts.next() {
        None => None,
        Some(field) => Some(Sublane::from_index(field.trim().parse().ok()?)?),
    };

    // Trailing fields mean a corrupt record.
    if parts.next().is_some() {
        return None;
    }

    Some(SpawnRequest {
        id: id.to_owned(),
        approach,
        sublane,
    })
}
