//! Path pattern parsing and compilation.
//!
//! A route path may contain typed placeholders of the form
//! `{name:type}` or `{name:type1|type2}`, each occupying one
//! `/`-delimited segment. Handling them is split into two independent
//! passes so the syntax and the matcher stay testable on their own:
//!
//! 1. [`tokenize`] scans the path into a list of [`PatternToken`]s —
//!    literal runs and named placeholders with their type lists.
//! 2. [`CompiledPattern::compile`] turns the token list into an anchored
//!    regex with one named capture group per placeholder.
//!
//! Each placeholder type contributes a character class to its capture
//! group; listing several types unions their classes. The `null` type is
//! special: it contributes no characters but makes the whole segment
//! optional (leading separator included), so `/articles/{page:int|null}`
//! matches both `/articles` and `/articles/3`.
//!
//! Compilation happens once per route at registration time; the compiled
//! pattern is a pure function of the path string and matching never fails.

use regex::Regex;

use crate::error::PatternError;
use crate::params::PathParams;

/// The type of a placeholder, naming the characters it accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderType {
    /// ASCII letters.
    String,
    /// Decimal digits.
    Int,
    /// Dash, underscore and dot.
    Chars,
    /// Letters, digits, dash, underscore and dot.
    Misc,
    /// Contributes no characters; makes the segment optional.
    Null,
}

impl PlaceholderType {
    fn parse(word: &str) -> Option<Self> {
        match word {
            "string" => Some(Self::String),
            "int" => Some(Self::Int),
            "chars" => Some(Self::Chars),
            "misc" => Some(Self::Misc),
            "null" => Some(Self::Null),
            _ => None,
        }
    }

    /// The regex character class fragment this type contributes, `None`
    /// for [`Null`](Self::Null).
    fn char_class(&self) -> Option<&'static str> {
        match self {
            Self::String => Some("a-zA-Z"),
            Self::Int => Some("0-9"),
            Self::Chars => Some(r"\-_."),
            Self::Misc => Some(r"a-zA-Z0-9\-_."),
            Self::Null => None,
        }
    }
}

/// One piece of a parsed route path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternToken {
    /// Text matched verbatim, separators included.
    Literal(String),
    /// A named capture, consuming the `/` that precedes it.
    Placeholder { name: String, types: Vec<PlaceholderType> },
}

/// Scans a route path into tokens.
///
/// A placeholder is only recognized as `/{name:types}` with a lowercase
/// name and lowercase type words; brace text of any other shape stays
/// literal. An unknown type word is a [`PatternError::UnknownType`].
pub fn tokenize(path: &str) -> Result<Vec<PatternToken>, PatternError> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut rest = path;

    while !rest.is_empty() {
        if let Some((token, consumed)) = placeholder_at(rest)? {
            if !literal.is_empty() {
                tokens.push(PatternToken::Literal(std::mem::take(&mut literal)));
            }
            tokens.push(token);
            rest = &rest[consumed..];
            continue;
        }

        let ch = rest.chars().next().expect("rest is non-empty");
        literal.push(ch);
        rest = &rest[ch.len_utf8()..];
    }

    if !literal.is_empty() {
        tokens.push(PatternToken::Literal(literal));
    }

    Ok(tokens)
}

/// Tries to read `/{name:types}` at the start of `rest`. Returns the token
/// and the number of bytes consumed, or `None` if the text there is not
/// placeholder-shaped.
fn placeholder_at(rest: &str) -> Result<Option<(PatternToken, usize)>, PatternError> {
    let Some(body) = rest.strip_prefix("/{") else {
        return Ok(None);
    };
    let Some(end) = body.find('}') else {
        return Ok(None);
    };
    let inner = &body[..end];
    let Some((name, types_raw)) = inner.split_once(':') else {
        return Ok(None);
    };
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_lowercase()) {
        return Ok(None);
    }
    if types_raw.is_empty() || !types_raw.bytes().all(|b| b.is_ascii_lowercase() || b == b'|') {
        return Ok(None);
    }

    let mut types = Vec::new();
    for word in types_raw.split('|') {
        match PlaceholderType::parse(word) {
            Some(placeholder_type) => types.push(placeholder_type),
            None => return Err(PatternError::unknown_type(inner, word)),
        }
    }

    let token = PatternToken::Placeholder { name: name.to_string(), types };
    Ok(Some((token, "/{".len() + end + "}".len())))
}

/// Strips trailing separators from a path; a fully empty result becomes
/// `/`. Applied identically to registered route paths (at compile time)
/// and to incoming request paths (at dispatch time), so `/foo` and
/// `/foo/` are equivalent.
pub fn normalize_path(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}

/// A route path compiled to an anchored matcher.
///
/// Derived deterministically from the path string and cached on the route;
/// never persisted.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    regex: Regex,
}

impl CompiledPattern {
    /// Normalizes, tokenizes and compiles a route path.
    pub fn compile(path: &str) -> Result<Self, PatternError> {
        let tokens = tokenize(normalize_path(path))?;
        Self::from_tokens(&tokens)
    }

    /// Compiles an already-parsed token list.
    pub fn from_tokens(tokens: &[PatternToken]) -> Result<Self, PatternError> {
        let mut source = String::from("^");

        for token in tokens {
            match token {
                PatternToken::Literal(lit) => source.push_str(&regex::escape(lit)),
                PatternToken::Placeholder { name, types } => {
                    let optional = types.contains(&PlaceholderType::Null);
                    let class: String = types.iter().filter_map(PlaceholderType::char_class).collect();
                    if class.is_empty() {
                        return Err(PatternError::empty_classes(name.as_str()));
                    }
                    if optional {
                        source.push_str(&format!("/?(?P<{name}>[{class}]*)"));
                    } else {
                        source.push_str(&format!("/(?P<{name}>[{class}]+)"));
                    }
                }
            }
        }

        source.push('$');
        Ok(Self { regex: Regex::new(&source)? })
    }

    /// The compiled regex source, mainly for diagnostics.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Tests `path` for a full match and extracts named parameters.
    ///
    /// `path` must already be normalized with [`normalize_path`]. A capture
    /// that matched the empty string (an omitted optional segment) is left
    /// out of the result.
    pub fn matches(&self, path: &str) -> Option<PathParams> {
        let captures = self.regex.captures(path)?;
        let mut params = PathParams::empty();

        for name in self.regex.capture_names().flatten() {
            if let Some(value) = captures.name(name) {
                if !value.as_str().is_empty() {
                    params.insert(name, value.as_str());
                }
            }
        }

        Some(params)
    }
}
