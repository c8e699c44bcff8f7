//! Command classification for incoming protocol lines.
//!
//! One trimmed line maps to at most one command. Keywords are matched
//! case-sensitively in a fixed priority order; anything unrecognized is
//! silently ignored so line noise never produces an error response.

/// Maximum animation name length in bytes
pub const MAX_NAME_LEN: usize = 32;

/// Errors that can occur while parsing a command payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// Definition payload without a `|` separator, or with an unusable name
    MalformedPayload,
}

/// A classified protocol line
///
/// Borrowed from the input line; the caller keeps the line alive while
/// acting on the command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    /// `PLAY:<name>` - select a single animation
    Play(&'a str),
    /// `ANIM:<payload>` - define or replace an animation (raw payload)
    Define(&'a str),
    /// `CLEAR` - wipe all animations and reset playback
    Clear,
    /// `PLAY_ALL` - round-robin over all animations in store order
    PlayAll,
    /// `DEBUG` - request a diagnostic dump
    Debug,
}

impl<'a> Command<'a> {
    /// Classify one trimmed line, `None` for lines to ignore
    pub fn parse(line: &'a str) -> Option<Self> {
        if let Some(name) = line.strip_prefix("PLAY:") {
            return Some(Command::Play(name));
        }
        if let Some(payload) = line.strip_prefix("ANIM:") {
            return Some(Command::Define(payload));
        }
        match line {
            "CLEAR" => Some(Command::Clear),
            "PLAY_ALL" => Some(Command::PlayAll),
            "DEBUG" => Some(Command::Debug),
            _ => None,
        }
    }
}

/// A split animation-definition payload: `<name>|<frame tokens>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Definition<'a> {
    /// Animation name (non-empty, at most [`MAX_NAME_LEN`] bytes)
    pub name: &'a str,
    /// Space-separated frame tokens, possibly empty
    pub tokens: &'a str,
}

impl<'a> Definition<'a> {
    /// Split a `Define` payload into name and frame tokens
    ///
    /// The name is everything before the first `|`. A payload without a
    /// separator, an empty name, or a name over [`MAX_NAME_LEN`] bytes
    /// drops the whole line.
    pub fn parse(payload: &'a str) -> Result<Self, CommandError> {
        let (name, tokens) = payload
            .split_once('|')
            .ok_or(CommandError::MalformedPayload)?;
        if name.is_empty() || name.len() > MAX_NAME_LEN {
            return Err(CommandError::MalformedPayload);
        }
        Ok(Self { name, tokens })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keywords() {
        assert_eq!(Command::parse("CLEAR"), Some(Command::Clear));
        assert_eq!(Command::parse("PLAY_ALL"), Some(Command::PlayAll));
        assert_eq!(Command::parse("DEBUG"), Some(Command::Debug));
    }

    #[test]
    fn test_parse_play_keeps_name_verbatim() {
        assert_eq!(Command::parse("PLAY:blink"), Some(Command::Play("blink")));
        // Names are case-sensitive and may contain further colons.
        assert_eq!(Command::parse("PLAY:a:b"), Some(Command::Play("a:b")));
    }

    #[test]
    fn test_parse_define_carries_raw_payload() {
        assert_eq!(
            Command::parse("ANIM:blink|0101"),
            Some(Command::Define("blink|0101"))
        );
    }

    #[test]
    fn test_unknown_lines_ignored() {
        assert_eq!(Command::parse(""), None);
        assert_eq!(Command::parse("clear"), None);
        assert_eq!(Command::parse("PLAY"), None);
        assert_eq!(Command::parse("CLEARANCE"), None);
        assert_eq!(Command::parse("HELLO WORLD"), None);
    }

    #[test]
    fn test_definition_split() {
        let def = Definition::parse("blink|111:1.0 000:0.5").unwrap();
        assert_eq!(def.name, "blink");
        assert_eq!(def.tokens, "111:1.0 000:0.5");

        // Only the first separator splits; later pipes belong to the tokens.
        let def = Definition::parse("a|b|c").unwrap();
        assert_eq!(def.name, "a");
        assert_eq!(def.tokens, "b|c");
    }

    #[test]
    fn test_definition_without_separator_is_malformed() {
        assert_eq!(
            Definition::parse("no-separator-here"),
            Err(CommandError::MalformedPayload)
        );
    }

    #[test]
    fn test_definition_empty_or_oversized_name_is_malformed() {
        assert_eq!(
            Definition::parse("|tokens"),
            Err(CommandError::MalformedPayload)
        );

        let bytes = [b'x'; MAX_NAME_LEN + 1];
        let long = core::str::from_utf8(&bytes).unwrap();
        let mut payload = std::string::String::from(long);
        payload.push('|');
        assert_eq!(
            Definition::parse(&payload),
            Err(CommandError::MalformedPayload)
        );
    }

    #[test]
    fn test_definition_empty_tokens_allowed() {
        let def = Definition::parse("empty|").unwrap();
        assert_eq!(def.name, "empty");
        assert_eq!(def.tokens, "");
    }
}
