//! Free-text parts requests, e.g. a list pasted from a maintenance work order

use std::sync::LazyLock;

use miette::Diagnostic;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

static BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[-•*]\s*").expect("valid bullet regex"));

static NUMBERED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\d+[.)]\s*").expect("valid numbered-list regex"));

/// `PART: N [word]`, `PART - N [word]` or `PART,N`
static ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([A-Z]+(?:-[A-Z]+)*-\d{3}-\d{2})\s*(?::|-|,)\s*(\d+)(?:\s*[A-Z]+)?$")
        .expect("valid request item regex")
});

#[derive(Debug, Error, Diagnostic)]
pub enum RequestError {
    #[error("no valid parts found in the request")]
    #[diagnostic(
        code(maintkit::request::empty),
        help("expected one 'PART-XXX-XX: N units' entry per line")
    )]
    NoParts,

    #[error("quantity {quantity} for {part_number} is out of range")]
    #[diagnostic(
        code(maintkit::request::quantity),
        help("request quantities must be at most 4294967295")
    )]
    QuantityOutOfRange { part_number: String, quantity: String },
}

/// One requested part and how many are needed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestLine {
    pub part_number: String,
    pub quantity: i64,
}

impl RequestLine {
    pub fn new(part_number: impl Into<String>, quantity: i64) -> Self {
        Self {
            part_number: part_number.into(),
            quantity,
        }
    }
}

/// Parse a parts request, ignoring lines that are not part entries
pub fn parse_request(text: &str) -> Result<Vec<RequestLine>, RequestError> {
    let mut lines = Vec::new();
    for line in text.lines() {
        if let Some(parsed) = parse_line(line)? {
            lines.push(parsed);
        }
    }

    if lines.is_empty() {
        return Err(RequestError::NoParts);
    }
    Ok(lines)
}

fn parse_line(line: &str) -> Result<Option<RequestLine>, RequestError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let line = BULLET.replace(line, "");
    let line = NUMBERED.replace(&line, "");
    let Some(caps) = ITEM.captures(line.trim()) else {
        return Ok(None);
    };

    let part_number = caps[1].to_uppercase();
    let quantity: u32 = caps[2]
        .parse()
        .map_err(|_| RequestError::QuantityOutOfRange {
            part_number: part_number.clone(),
            quantity: caps[2].to_string(),
        })?;
    Ok(Some(RequestLine::new(part_number, i64::from(quantity))))
}
