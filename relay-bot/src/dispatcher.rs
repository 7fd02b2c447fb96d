//! Addressing and command parsing.
//!
//! A line is for the bot when it starts with the bot's nickname (any case) followed by `:` or `,`,
//! whitespace, or the end of the line. What follows is either a directive (`!word args`) or a
//! free-text query.

use regex::Regex;
use std::fmt;

/// Matches lines addressed to one nickname.
#[derive(Debug, Clone)]
pub struct AddressMatcher {
    re: Regex,
}

impl AddressMatcher {
    pub fn new(nickname: &str) -> Result<Self, regex::Error> {
        let pattern = format!(
            r"(?is)^{}(?:[:,]\s*|\s+|$)(.*)$",
            regex::escape(nickname.trim())
        );
        Ok(Self {
            re: Regex::new(&pattern)?,
        })
    }

    /// Returns the trimmed remainder when `text` is addressed to the bot.
    pub fn parse_addressed(&self, text: &str) -> Option<String> {
        self.re
            .captures(text.trim())
            .map(|caps| caps.get(1).map_or("", |m| m.as_str()).trim().to_string())
    }
}

/// Shorthand for a one-off match.
pub fn parse_addressed(text: &str, nickname: &str) -> Option<String> {
    AddressMatcher::new(nickname).ok()?.parse_addressed(text)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveKind {
    Clear,
    System,
    Options,
    Profile,
    Save,
    Load,
}

impl DirectiveKind {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "!clear" => Some(Self::Clear),
            "!system" => Some(Self::System),
            "!options" => Some(Self::Options),
            "!profile" => Some(Self::Profile),
            "!save" => Some(Self::Save),
            "!load" => Some(Self::Load),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::System => "system",
            Self::Options => "options",
            Self::Profile => "profile",
            Self::Save => "save",
            Self::Load => "load",
        }
    }
}

impl fmt::Display for DirectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub kind: DirectiveKind,
    /// Remaining tokens joined by single spaces; empty when none were given.
    pub argument: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Empty,
    Directive(Directive),
    /// A `!word` outside the directive vocabulary.
    UnknownDirective(String),
    Query(String),
}

impl Command {
    /// True for anything that starts with `!`, known or not.
    pub fn is_bang(&self) -> bool {
        matches!(self, Self::Directive(_) | Self::UnknownDirective(_))
    }
}

pub fn parse_command(remainder: &str) -> Command {
    let mut tokens = remainder.split_whitespace();
    let Some(first) = tokens.next() else {
        return Command::Empty;
    };
    if !first.starts_with('!') {
        return Command::Query(remainder.trim().to_string());
    }
    match DirectiveKind::from_token(first) {
        Some(kind) => Command::Directive(Directive {
            kind,
            argument: tokens.collect::<Vec<_>>().join(" "),
        }),
        None => Command::UnknownDirective(first.to_string()),
    }
}
