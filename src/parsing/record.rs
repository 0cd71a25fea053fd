//! Codec for 9-column GTF/GFF3 data lines.
//!
//! GTF and GFF3 differ only in the attribute column:
//!
//! - GTF: `gene_id "ENSG00000223972"; transcript_id "ENST00000456328"`
//! - GFF3: `ID=gene-SHOX;Dbxref=GeneID:6473,HGNC:HGNC:10853`
//!
//! The syntax is detected per line. Each `;`-separated subfield is matched
//! first against the GTF form, then the GFF3 form, and votes for whichever
//! matched. The line takes the syntax with most votes; GTF wins ties.
//!
//! Comma-separated values become separate list entries, and a key seen twice
//! on one line accumulates values rather than replacing them, so
//! `tag "basic"; tag "CCDS"` parses to `tag -> [basic, CCDS]`.

use thiserror::Error;

use crate::core::feature::{AttributeSyntax, Attributes, Feature};

/// Number of tab-delimited columns in a data line
pub const FIELD_COUNT: usize = 9;

/// Directive after which a GFF3 file carries sequences, not features
pub const FASTA_DIRECTIVE: &str = "##FASTA";

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("expected 9 tab-delimited fields, not {0}")]
    FieldCount(usize),

    #[error("invalid {field} coordinate: '{value}'")]
    InvalidCoordinate { field: &'static str, value: String },

    #[error("cannot parse attribute: '{0}'")]
    InvalidAttribute(String),

    #[error("malformed cross-reference: '{0}'")]
    InvalidCrossReference(String),

    #[error("line {line}: {source}")]
    AtLine {
        line: usize,
        #[source]
        source: Box<ParseError>,
    },
}

impl ParseError {
    /// Attach a 1-based line number to this error
    #[must_use]
    pub fn at_line(self, line: usize) -> Self {
        match self {
            // IO failures are not line-specific
            Self::Io(_) | Self::AtLine { .. } => self,
            other => Self::AtLine {
                line,
                source: Box::new(other),
            },
        }
    }
}

/// A parsed data line together with its detected attribute syntax
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub feature: Feature,
    /// `None` when the attribute column is `.`
    pub syntax: Option<AttributeSyntax>,
}

impl Record {
    /// Serialize back to a data line (no trailing newline)
    ///
    /// Attributes are rendered in the record's own syntax. A record that had
    /// no attributes when parsed but has gained some is rendered as GFF3.
    #[must_use]
    pub fn to_line(&self) -> String {
        let feature = &self.feature;
        let syntax = self.syntax.unwrap_or(AttributeSyntax::Gff3);
        let attributes = format_attributes(&feature.attributes, syntax);
        [
            feature.seqid.as_str(),
            feature.source.as_str(),
            feature.feature_type.as_str(),
            &feature.start.to_string(),
            &feature.end.to_string(),
            feature.score.as_str(),
            feature.strand.as_str(),
            feature.frame.as_str(),
            &attributes,
        ]
        .join("\t")
    }
}

/// Check whether a raw line is a comment or directive
#[must_use]
pub fn is_comment(line: &str) -> bool {
    line.starts_with('#')
}

/// Parse one data line (trailing `\r`/`\n` are ignored)
///
/// # Errors
///
/// Returns `ParseError::FieldCount` if the line does not have exactly nine
/// tab-delimited fields, `ParseError::InvalidCoordinate` if start or end is
/// not an integer, or `ParseError::InvalidAttribute` if an attribute
/// subfield matches neither GTF nor GFF3 syntax.
pub fn parse_line(line: &str) -> Result<Record, ParseError> {
    let line = line.trim_end_matches(|c: char| c == '\r' || c == '\n');
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() != FIELD_COUNT {
        return Err(ParseError::FieldCount(fields.len()));
    }

    let (attributes, syntax) = parse_attributes(fields[8])?;

    let feature = Feature {
        seqid: fields[0].to_string(),
        source: fields[1].to_string(),
        feature_type: fields[2].to_string(),
        start: parse_coordinate("start", fields[3])?,
        end: parse_coordinate("end", fields[4])?,
        score: fields[5].to_string(),
        strand: fields[6].to_string(),
        frame: fields[7].to_string(),
        attributes,
    };

    Ok(Record { feature, syntax })
}

fn parse_coordinate(field: &'static str, value: &str) -> Result<u64, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidCoordinate {
        field,
        value: value.to_string(),
    })
}

/// Parse the attribute column and detect its syntax
///
/// # Errors
///
/// Returns `ParseError::InvalidAttribute` for a subfield matching neither syntax.
pub fn parse_attributes(field: &str) -> Result<(Attributes, Option<AttributeSyntax>), ParseError> {
    let mut attributes = Attributes::new();
    if field == "." {
        return Ok((attributes, None));
    }

    let field = field.trim_end();
    let field = field.strip_suffix(';').unwrap_or(field);

    let mut gtf_votes = 0usize;
    let mut gff3_votes = 0usize;

    for subfield in field.split(';').map(str::trim) {
        let (key, value) = if let Some(pair) = match_gtf(subfield) {
            gtf_votes += 1;
            pair
        } else if let Some(pair) = match_gff3(subfield) {
            gff3_votes += 1;
            pair
        } else {
            return Err(ParseError::InvalidAttribute(subfield.to_string()));
        };

        let values = attributes.entry(key.to_string()).or_default();
        values.extend(value.split(',').map(str::to_string));
    }

    let syntax = if gtf_votes == 0 && gff3_votes == 0 {
        None
    } else if gtf_votes >= gff3_votes {
        Some(AttributeSyntax::Gtf)
    } else {
        Some(AttributeSyntax::Gff3)
    };

    Ok((attributes, syntax))
}

/// Match `key "value"`: a key without whitespace or `=`, one space, and a
/// value that is optionally double-quoted and contains no other quotes.
fn match_gtf(subfield: &str) -> Option<(&str, &str)> {
    let (key, rest) = subfield.split_once(' ')?;
    if key.is_empty() || key.contains('=') || key.contains(char::is_whitespace) {
        return None;
    }
    let value = rest.strip_prefix('"').unwrap_or(rest);
    let value = value.strip_suffix('"').unwrap_or(value);
    if value.contains('"') {
        return None;
    }
    Some((key, value))
}

/// Match `key=value`: everything before the first `=` is the key.
fn match_gff3(subfield: &str) -> Option<(&str, &str)> {
    let (key, value) = subfield.split_once('=')?;
    if key.is_empty() {
        return None;
    }
    Some((key, value))
}

/// Render attributes in the given syntax; an empty map renders as `.`
pub fn format_attributes(attributes: &Attributes, syntax: AttributeSyntax) -> String {
    if attributes.is_empty() {
        return ".".to_string();
    }
    attributes
        .iter()
        .map(|(key, values)| match syntax {
            AttributeSyntax::Gtf => format!("{key} \"{}\"", values.join(",")),
            AttributeSyntax::Gff3 => format!("{key}={}", values.join(",")),
        })
        .collect::<Vec<_>>()
        .join(";")
}
