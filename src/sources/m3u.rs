//! Extended M3U parsing
//!
//! Only two directives carry meaning here:
//!
//! - `#EXTGRP:<group>` switches the current group for every following entry
//! - `#EXTINF:<duration and attributes>,<name>` emits one channel
//!
//! Everything else (stream URLs, `#EXTM3U` headers, blank lines, unknown
//! directives) is skipped. Parsing never fails.

use tracing::debug;

use crate::models::{Channel, ChannelList, DEFAULT_GROUP};

const EXTINF_PREFIX: &str = "#EXTINF:";
const EXTGRP_PREFIX: &str = "#EXTGRP:";

/// Characters that end a playlist line. `\r\n` counts as a single break.
const LINE_BREAKS: [char; 10] = [
    '\n', '\r', '\x0b', '\x0c', '\x1c', '\x1d', '\x1e', '\u{85}', '\u{2028}', '\u{2029}',
];

/// A classified playlist line
#[derive(Debug, PartialEq, Eq)]
enum Directive<'a> {
    Group(&'a str),
    Entry(&'a str),
    Ignored,
}

impl<'a> Directive<'a> {
    fn classify(line: &'a str) -> Self {
        if let Some(rest) = line.strip_prefix(EXTINF_PREFIX) {
            Directive::Entry(rest)
        } else if let Some(rest) = line.strip_prefix(EXTGRP_PREFIX) {
            Directive::Group(rest.trim())
        } else {
            Directive::Ignored
        }
    }
}

/// Parse playlist text into channels in document order.
///
/// The name of an entry is everything after the last comma of the `#EXTINF:`
/// line, taken verbatim. A line without a comma uses the whole text after the
/// prefix as the name.
pub fn parse_playlist(content: &str) -> ChannelList {
    let mut channels = Vec::new();
    let mut current_group = DEFAULT_GROUP;

    for line in playlist_lines(content) {
        match Directive::classify(line) {
            Directive::Group(group) => current_group = group,
            Directive::Entry(rest) => {
                channels.push(Channel::new(current_group, entry_name(rest)));
            }
            Directive::Ignored => {}
        }
    }

    debug!("Parsed {} channels from playlist", channels.len());
    channels
}

/// Split on every [`LINE_BREAKS`] character. A trailing break does not
/// produce an empty final line.
fn playlist_lines(content: &str) -> impl Iterator<Item = &str> {
    let mut rest = content;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let Some(end) = rest.find(LINE_BREAKS) else {
            return Some(std::mem::take(&mut rest));
        };
        let line = &rest[..end];
        let tail = &rest[end..];
        let break_len = if tail.starts_with("\r\n") {
            2
        } else {
            tail.chars().next().map_or(1, char::len_utf8)
        };
        rest = &tail[break_len..];
        Some(line)
    })
}

/// Substring after the last comma, or the whole input when there is none
fn entry_name(extinf_body: &str) -> &str {
    extinf_body.rsplit(',').next().unwrap_or(extinf_body)
}

/// Consecutive runs of channels sharing a group, in document order.
///
/// A group that reappears later in the playlist starts a new run, so the
/// result mirrors the listing order instead of merging groups.
pub fn group_channels(channels: &[Channel]) -> Vec<(&str, Vec<&Channel>)> {
    let mut runs: Vec<(&str, Vec<&Channel>)> = Vec::new();

    for channel in channels {
        match runs.last_mut() {
            Some((group, members)) if *group == channel.group => members.push(channel),
            _ => runs.push((&channel.group, vec![channel])),
        }
    }

    runs
}
