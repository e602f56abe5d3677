//! Directive extraction from assistant answers.
//!
//! Assistant output is free-form text; when it contains the
//! [`DIRECTIVE_MARKER`] token, the text after the marker is matched against
//! a restricted, explicitly enumerated command subset. `/ai`, `/privateai`
//! and plain chat are never re-entrant, so the assistant can neither trigger
//! recursive assistant calls nor impersonate a user's chat line. Anything
//! that does not match is silently ignored; it came from model output, not
//! from a protocol violation.

/// Marker token the assistant emits when it wants a command executed on
/// behalf of the requesting user.
pub const DIRECTIVE_MARKER: &str = "[PerformCommand]";

/// The restricted set of commands an assistant answer may trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// `/join <room>` on behalf of the requesting session.
    Join { room: String },
    /// `/history` replay to the requesting session.
    History,
    /// `/rooms` listing to the requesting session.
    Rooms,
    /// `/listusers` listing to the requesting session.
    ListUsers,
}

impl Directive {
    /// Scan an assistant answer for the directive marker and classify the
    /// text following it. Returns `None` when the marker is absent, the
    /// trailing command is not in the restricted subset, or a `/join`
    /// directive yields an empty room name after extraction.
    pub fn extract(answer: &str) -> Option<Directive> {
        let idx = answer.find(DIRECTIVE_MARKER)?;
        let after = answer[idx + DIRECTIVE_MARKER.len()..].trim();

        if let Some(raw) = after.strip_prefix("/join ") {
            let room = extract_room_name(raw);
            if room.is_empty() {
                return None;
            }
            Some(Directive::Join { room })
        } else if after.starts_with("/history") {
            Some(Directive::History)
        } else if after.starts_with("/rooms") {
            Some(Directive::Rooms)
        } else if after.starts_with("/listusers") {
            Some(Directive::ListUsers)
        } else {
            None
        }
    }
}

/// Extract a room name from free-form directive text.
///
/// Scans forward until the first whitespace or sentence-terminating
/// punctuation, then strips quote characters. Model output often wraps the
/// name in quotes or runs it into a sentence ("/join lobby.").
fn extract_room_name(raw: &str) -> String {
    let raw = raw.trim_start().trim_start_matches(['"', '\'']);
    let stop = raw
        .char_indices()
        .find(|(_, c)| {
            c.is_whitespace() || matches!(c, '.' | ',' | '!' | '?' | '\'' | '"')
        })
        .map(|(i, _)| i);

    let name = match stop {
        Some(i) => &raw[..i],
        None => raw,
    };
    name.chars().filter(|c| *c != '"' && *c != '\'').collect()
}
