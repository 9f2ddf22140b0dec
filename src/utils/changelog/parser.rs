// changelog parser

use super::config::ChangelogConfig;
use super::types::{ChangelogDocument, ChangelogEntry};
use super::version::{ReleaseVersion, VERSION_PATTERN};
use crate::error::{Error, Result};
use regex::Regex;
use std::fs;
use std::path::Path;

const NAME_PATTERN: &str = ".*?";
const DATE_PATTERN: &str = r"\d{4}-\d{2}-\d{2}";

#[derive(Debug, Clone, PartialEq, Eq)]
enum TitleToken {
    Literal(String),
    Name,
    Version,
    Date,
}

fn tokenize_title_format(format: &str) -> Result<Vec<TitleToken>> {
    let invalid = |reason: &str| Error::TitleFormat {
        format: format.to_string(),
        reason: reason.to_string(),
    };

    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut chars = format.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                literal.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                literal.push('}');
            }
            '{' => {
                let mut field = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(ch) => field.push(ch),
                        None => return Err(invalid("unterminated placeholder")),
                    }
                }

                let token = match field.as_str() {
                    "name" => TitleToken::Name,
                    "version" => TitleToken::Version,
                    "project_date" => TitleToken::Date,
                    other => {
                        return Err(invalid(&format!("unknown placeholder '{{{}}}'", other)));
                    }
                };

                if !literal.is_empty() {
                    tokens.push(TitleToken::Literal(std::mem::take(&mut literal)));
                }
                tokens.push(token);
            }
            '}' => return Err(invalid("single '}' outside of a placeholder")),
            other => literal.push(other),
        }
    }

    if !literal.is_empty() {
        tokens.push(TitleToken::Literal(literal));
    }

    if !tokens.contains(&TitleToken::Version) {
        return Err(invalid("the format has no {version} placeholder"));
    }

    Ok(tokens)
}

/// regex matching release section headers built from a title format
///
/// `{name}` matches anything on the line, the first `{version}` is captured,
/// and `{project_date}` matches an ISO date. headers must span a whole line.
#[derive(Debug, Clone)]
pub struct TitlePattern {
    regex: Regex,
}

impl TitlePattern {
    pub fn compile(format: &str) -> Result<Self> {
        let mut pattern = String::from(r"(?m)^");
        let mut captured = false;

        for token in tokenize_title_format(format)? {
            match token {
                TitleToken::Literal(text) => pattern.push_str(&regex::escape(&text)),
                TitleToken::Name => pattern.push_str(NAME_PATTERN),
                TitleToken::Version if !captured => {
                    captured = true;
                    pattern.push_str(&format!("(?P<version>{})", VERSION_PATTERN));
                }
                TitleToken::Version => pattern.push_str(&format!("(?:{})", VERSION_PATTERN)),
                TitleToken::Date => pattern.push_str(DATE_PATTERN),
            }
        }
        pattern.push_str(r"[ \t\r]*$");

        tracing::debug!(%format, %pattern, "compiled changelog title pattern");

        let regex = Regex::new(&pattern).map_err(|e| Error::TitleFormat {
            format: format.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { regex })
    }

    pub fn as_regex(&self) -> &Regex {
        &self.regex
    }
}

/// split changelog text into preamble and release sections
///
/// whatever sits between the start marker and the first header stays with the
/// preamble, so rendering the document gives back the input unchanged.
pub fn split_changelog(text: &str, config: &ChangelogConfig) -> Result<ChangelogDocument> {
    let title = TitlePattern::compile(&config.title_format)?;
    split_with_pattern(text, config.effective_start_string(), &title)
}

pub fn split_with_pattern(
    text: &str,
    start_string: &str,
    title: &TitlePattern,
) -> Result<ChangelogDocument> {
    let marker_pos = text
        .find(start_string)
        .ok_or_else(|| Error::ChangelogStructure {
            reason: format!("start marker {:?} not found", start_string.trim_end()),
        })?;
    let body_start = marker_pos + start_string.len();
    let rest = &text[body_start..];

    let headers: Vec<(usize, &str)> = title
        .as_regex()
        .captures_iter(rest)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let version = caps.name("version")?;
            Some((whole.start(), version.as_str()))
        })
        .collect();

    let leading_end = headers.first().map_or(rest.len(), |(start, _)| *start);
    let preamble = &text[..body_start + leading_end];
    let mut entries = Vec::with_capacity(headers.len());
    for (i, (start, version)) in headers.iter().enumerate() {
        let end = headers.get(i + 1).map_or(rest.len(), |(next, _)| *next);
        let version: ReleaseVersion = version.parse()?;
        entries.push(ChangelogEntry::new(version, &rest[*start..end]));
    }

    Ok(ChangelogDocument::new(preamble, entries))
}

/// parse a changelog file
pub fn parse_changelog<P: AsRef<Path>>(path: P, config: &ChangelogConfig) -> Result<ChangelogDocument> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| Error::FileReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    split_changelog(&content, config)
}
