use std::sync::OnceLock;

use ix_core::{CallSiteInfo, IxError};
use regex::Regex;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    Int(i64),
    Float(f64),
    Str(String),
    Ident(String),
    Punct(char),
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) site: CallSiteInfo,
}

fn token_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(
            r#"\A(?:(?P<ws>\s+)|(?P<comment>//[^\n]*)|(?P<float>\d+\.\d+)|(?P<int>\d+)|(?P<dq>"(?:[^"\\]|\\.)*")|(?P<sq>'(?:[^'\\]|\\.)*')|(?P<ident>[A-Za-z_$][A-Za-z0-9_$]*)|(?P<punct>[.;,(){}=:+]))"#,
        )
        .expect("token regex must compile")
    })
}

pub(crate) fn tokenize(script: &str, source: &str) -> Result<Vec<Token>, IxError> {
    let regex = token_regex();
    let mut tokens = Vec::new();
    let mut cursor = 0usize;
    let mut line = 1usize;
    let mut column = 1usize;

    while cursor < source.len() {
        let site = CallSiteInfo::new(script, line, column);
        let Some(captures) = regex.captures(&source[cursor..]) else {
            let found = source[cursor..].chars().next().unwrap_or_default();
            return Err(IxError::compilation(
                format!("unexpected character '{}'", found),
                site,
            ));
        };
        let text = captures
            .get(0)
            .expect("capture group 0 must exist for each regex capture")
            .as_str();

        let kind = if captures.name("ws").is_some() || captures.name("comment").is_some() {
            None
        } else if captures.name("float").is_some() {
            let value = text.parse::<f64>().map_err(|error| {
                IxError::compilation(format!("invalid float literal: {}", error), site.clone())
            })?;
            Some(TokenKind::Float(value))
        } else if captures.name("int").is_some() {
            let value = text.parse::<i64>().map_err(|error| {
                IxError::compilation(format!("invalid integer literal: {}", error), site.clone())
            })?;
            Some(TokenKind::Int(value))
        } else if captures.name("dq").is_some() || captures.name("sq").is_some() {
            Some(TokenKind::Str(unescape(&text[1..text.len() - 1])))
        } else if captures.name("ident").is_some() {
            Some(TokenKind::Ident(text.to_string()))
        } else {
            let punct = text.chars().next().unwrap_or_default();
            Some(TokenKind::Punct(punct))
        };

        if let Some(kind) = kind {
            tokens.push(Token { kind, site });
        }

        for ch in text.chars() {
            if ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        cursor += text.len();
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        site: CallSiteInfo::new(script, line, column),
    });
    Ok(tokens)
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
