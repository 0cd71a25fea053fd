//! Streaming rewrite passes over an annotation file.
//!
//! Both passes read the raw file line by line and write every line they do not
//! change exactly as read, including its line terminator:
//!
//! - [`tag`]: append `tag=PAR` to target-chromosome lines of PAR genes
//! - [`filter`]: drop every line already tagged `PAR`

use std::io::BufRead;

use crate::parsing::record::ParseError;

pub mod filter;
pub mod tag;

/// Read the next line into `buf`, terminator included
///
/// Returns `false` at end of input.
fn next_line<R: BufRead>(reader: &mut R, buf: &mut String) -> Result<bool, ParseError> {
    buf.clear();
    Ok(reader.read_line(buf)? > 0)
}

/// Split a raw line into content and its `\n` / `\r\n` terminator
fn split_terminator(line: &str) -> (&str, &str) {
    let content = line.trim_end_matches(|c: char| c == '\r' || c == '\n');
    (content, &line[content.len()..])
}
