//! ARFF reader for nominal datasets.
//!
//! Supports `@relation`, `@attribute <name> {v1,v2,...}` and `@data`
//! sections, `%` comments, `?` for missing values, and single- or
//! double-quoted names and values. Directives are case-insensitive. Any
//! attribute type other than a nominal value list is rejected.

use std::path::Path;

use tracing::{info, instrument};

use concord_core::errors::DatasetError;
use concord_core::model::{Attribute, Dataset, Row, Schema};

/// Reads and parses the ARFF file at `path`.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_arff(path: &Path) -> Result<Dataset, DatasetError> {
    if !path.exists() {
        return Err(DatasetError::NotFound {
            path: path.display().to_string(),
        });
    }
    let text = std::fs::read_to_string(path).map_err(|e| DatasetError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let dataset = parse_arff(&text)?;
    info!(
        relation = dataset.schema().relation(),
        attributes = dataset.schema().num_attributes(),
        rows = dataset.num_rows(),
        "dataset loaded"
    );
    Ok(dataset)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Header,
    Data,
}

/// Parses ARFF text into a validated [`Dataset`].
pub fn parse_arff(text: &str) -> Result<Dataset, DatasetError> {
    let mut relation = String::new();
    let mut attributes: Vec<Attribute> = Vec::new();
    let mut rows: Vec<Row> = Vec::new();
    let mut section = Section::Header;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('%') {
            continue;
        }

        match section {
            Section::Header => {
                let (directive, rest) = split_directive(line);
                match directive.to_ascii_lowercase().as_str() {
                    "@relation" => {
                        relation = unquote(rest.trim()).to_string();
                    }
                    "@attribute" => {
                        attributes.push(parse_attribute(rest, line_no)?);
                    }
                    "@data" => {
                        if attributes.is_empty() {
                            return Err(malformed(line_no, "@data before any @attribute"));
                        }
                        section = Section::Data;
                    }
                    other => {
                        return Err(malformed(line_no, &format!("unexpected directive {other:?}")));
                    }
                }
            }
            Section::Data => {
                if line.starts_with('{') {
                    return Err(malformed(line_no, "sparse rows are not supported"));
                }
                rows.push(parse_row(line, &attributes, rows.len())?);
            }
        }
    }

    if section == Section::Header {
        return Err(malformed(text.lines().count(), "missing @data section"));
    }

    Dataset::new(Schema::new(relation, attributes), rows)
}

/// Splits `@keyword rest` at the first whitespace.
fn split_directive(line: &str) -> (&str, &str) {
    match line.find(char::is_whitespace) {
        Some(pos) => (&line[..pos], &line[pos..]),
        None => (line, ""),
    }
}

fn parse_attribute(rest: &str, line_no: usize) -> Result<Attribute, DatasetError> {
    let rest = rest.trim();
    let (name, kind) = take_name(rest).ok_or_else(|| malformed(line_no, "attribute without a name"))?;
    let kind = kind.trim();

    if !kind.starts_with('{') {
        return Err(DatasetError::UnsupportedAttribute {
            name,
            kind: if kind.is_empty() { "<none>".to_string() } else { kind.to_string() },
        });
    }
    let Some(close) = kind.rfind('}') else {
        return Err(malformed(line_no, &format!("unterminated value list for {name}")));
    };

    let values: Vec<String> = split_tokens(&kind[1..close])
        .into_iter()
        .filter(|v| !v.is_empty())
        .collect();
    if values.is_empty() {
        return Err(malformed(line_no, &format!("attribute {name} declares no values")));
    }
    Ok(Attribute::new(name, values))
}

/// Reads a possibly quoted attribute name; returns it with the remainder.
fn take_name(text: &str) -> Option<(String, &str)> {
    let first = text.chars().next()?;
    if first == '\'' || first == '"' {
        let end = text[1..].find(first)? + 1;
        return Some((text[1..end].to_string(), &text[end + 1..]));
    }
    let end = text
        .find(|c: char| c.is_whitespace() || c == '{')
        .unwrap_or(text.len());
    Some((text[..end].to_string(), &text[end..]))
}

fn parse_row(line: &str, attributes: &[Attribute], row: usize) -> Result<Row, DatasetError> {
    let tokens = split_tokens(line);
    if tokens.len() != attributes.len() {
        return Err(DatasetError::RowWidth {
            row,
            expected: attributes.len(),
            found: tokens.len(),
        });
    }

    tokens
        .iter()
        .zip(attributes)
        .map(|(token, attribute)| {
            if token == "?" {
                return Ok(None);
            }
            attribute
                .index_of(token)
                .map(Some)
                .ok_or_else(|| DatasetError::UnknownValue {
                    row,
                    attribute: attribute.name.clone(),
                    value: token.clone(),
                })
        })
        .collect()
}

/// Comma-separated tokens, trimmed, with quotes removed.
///
/// A comma inside a quoted token does not split it; a backslash escapes the
/// next character inside quotes.
fn split_tokens(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) if c == '\\' => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            Some(_) => current.push(c),
            None if c == '\'' || c == '"' => quote = Some(c),
            None if c == ',' => tokens.push(std::mem::take(&mut current).trim().to_string()),
            None => current.push(c),
        }
    }
    tokens.push(current.trim().to_string());
    tokens
}

fn unquote(text: &str) -> &str {
    let bytes = text.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if (first == b'\'' || first == b'"') && first == last {
            return &text[1..text.len() - 1];
        }
    }
    text
}

fn malformed(line: usize, message: &str) -> DatasetError {
    DatasetError::Malformed {
        line,
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WEATHER: &str = "\
% toy nominal data
@relation weather

@attribute outlook {sunny, overcast, rainy}
@attribute 'wind speed' {calm,windy}
@ATTRIBUTE play {yes,no}

@data
sunny,calm,no
overcast, windy ,yes
rainy,?,yes
% trailing comment
'sunny','windy',no
";

    #[test]
    fn parses_header_and_rows() {
        let dataset = parse_arff(WEATHER).unwrap();
        let schema = dataset.schema();
        assert_eq!(schema.relation(), "weather");
        assert_eq!(schema.num_attributes(), 3);
        assert_eq!(schema.attributes()[1].name, "wind speed");
        assert_eq!(schema.attributes()[0].values, vec!["sunny", "overcast", "rainy"]);
        assert_eq!(dataset.num_rows(), 4);
        assert_eq!(dataset.rows()[0], vec![Some(0), Some(0), Some(1)]);
        assert_eq!(dataset.rows()[1], vec![Some(1), Some(1), Some(0)]);
        assert_eq!(dataset.rows()[2], vec![Some(2), None, Some(0)]);
        assert_eq!(dataset.rows()[3], vec![Some(0), Some(1), Some(1)]);
    }

    #[test]
    fn numeric_attributes_are_rejected() {
        let text = "@relation r\n@attribute temp numeric\n@data\n1\n";
        assert!(matches!(
            parse_arff(text),
            Err(DatasetError::UnsupportedAttribute { ref name, ref kind }) if name == "temp" && kind == "numeric"
        ));
    }

    #[test]
    fn undeclared_values_are_rejected() {
        let text = "@relation r\n@attribute a {x,y}\n@data\nz\n";
        assert!(matches!(
            parse_arff(text),
            Err(DatasetError::UnknownValue { row: 0, ref value, .. }) if value == "z"
        ));
    }

    #[test]
    fn wrong_row_width_is_rejected() {
        let text = "@relation r\n@attribute a {x,y}\n@attribute b {x,y}\n@data\nx\n";
        assert!(matches!(
            parse_arff(text),
            Err(DatasetError::RowWidth { row: 0, expected: 2, found: 1 })
        ));
    }

    #[test]
    fn missing_data_section_is_malformed() {
        let text = "@relation r\n@attribute a {x,y}\n";
        assert!(matches!(parse_arff(text), Err(DatasetError::Malformed { .. })));
    }

    #[test]
    fn quoted_values_may_contain_commas() {
        assert_eq!(split_tokens("'a,b', c ,\"d\""), vec!["a,b", "c", "d"]);
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.arff");
        assert!(matches!(load_arff(&missing), Err(DatasetError::NotFound { .. })));
    }

    #[test]
    fn load_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weather.arff");
        std::fs::write(&path, WEATHER).unwrap();
        assert_eq!(load_arff(&path).unwrap().num_rows(), 4);
    }
}
