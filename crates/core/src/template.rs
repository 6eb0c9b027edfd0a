use crate::metadata::{ImageFile, ImageMetadata};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplatePart {
    Literal(String),
    Token(Token),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Original,
    Counter,
    Date,
    Time,
    DateTime,
    ModDate,
    ModDateTime,
    Size,
    Width,
    Height,
    Resolution,
    Format,
    Camera,
}

impl Token {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "original" => Some(Self::Original),
            "counter" => Some(Self::Counter),
            "date" => Some(Self::Date),
            "time" => Some(Self::Time),
            "datetime" => Some(Self::DateTime),
            "mod_date" => Some(Self::ModDate),
            "mod_datetime" => Some(Self::ModDateTime),
            "size" => Some(Self::Size),
            "width" => Some(Self::Width),
            "height" => Some(Self::Height),
            "resolution" => Some(Self::Resolution),
            "format" => Some(Self::Format),
            "camera" => Some(Self::Camera),
            _ => None,
        }
    }

    pub fn needs_metadata(self) -> bool {
        matches!(
            self,
            Self::Width | Self::Height | Self::Resolution | Self::Format | Self::Camera
        )
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("rename pattern is empty")]
    Empty,
}

pub struct TemplateContext<'a> {
    pub file: &'a ImageFile,
    pub metadata: &'a ImageMetadata,
    pub counter: usize,
}

pub fn validate_template(input: &str) -> Result<(), TemplateError> {
    parse_template(input).map(|_| ())
}

/// Splits a pattern into literals and recognized placeholders. Unknown
/// `{names}` and stray braces are kept as literal text.
pub fn parse_template(input: &str) -> Result<Vec<TemplatePart>, TemplateError> {
    if input.is_empty() {
        return Err(TemplateError::Empty);
    }

    let mut parts = Vec::new();
    let mut literal = String::new();
    let mut rest = input;

    while let Some(open) = rest.find('{') {
        literal.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let token = after
            .find(['{', '}'])
            .filter(|&close| after[close..].starts_with('}'))
            .and_then(|close| Token::from_name(&after[..close]).map(|t| (t, close)));

        match token {
            Some((token, close)) => {
                if !literal.is_empty() {
                    parts.push(TemplatePart::Literal(std::mem::take(&mut literal)));
                }
                parts.push(TemplatePart::Token(token));
                rest = &after[close + 1..];
            }
            None => {
                literal.push('{');
                rest = after;
            }
        }
    }

    literal.push_str(rest);
    if !literal.is_empty() {
        parts.push(TemplatePart::Literal(literal));
    }

    Ok(parts)
}

pub fn template_needs_metadata(parts: &[TemplatePart]) -> bool {
    parts
        .iter()
        .any(|part| matches!(part, TemplatePart::Token(token) if token.needs_metadata()))
}

pub fn render_template(parts: &[TemplatePart], ctx: &TemplateContext<'_>) -> String {
    let mut output = String::new();
    for part in parts {
        match part {
            TemplatePart::Literal(s) => output.push_str(s),
            TemplatePart::Token(token) => output.push_str(&resolve_token(*token, ctx)),
        }
    }
    output
}

fn resolve_token(token: Token, ctx: &TemplateContext<'_>) -> String {
    let file = ctx.file;
    let metadata = ctx.metadata;
    match token {
        Token::Original => file.stem(),
        Token::Counter => format!("{:03}", ctx.counter),
        Token::Date => file.created.format("%Y%m%d").to_string(),
        Token::Time => file.created.format("%H%M%S").to_string(),
        Token::DateTime => file.created.format("%Y%m%d_%H%M%S").to_string(),
        Token::ModDate => file.modified.format("%Y%m%d").to_string(),
        Token::ModDateTime => file.modified.format("%Y%m%d_%H%M%S").to_string(),
        Token::Size => file.size.to_string(),
        Token::Width => metadata.width.map(|w| w.to_string()).unwrap_or_default(),
        Token::Height => metadata.height.map(|h| h.to_string()).unwrap_or_default(),
        Token::Resolution => metadata.resolution().unwrap_or_default(),
        Token::Format => metadata.format.clone().unwrap_or_default(),
        Token::Camera => metadata.camera().unwrap_or_default(),
    }
}
