use std::io::{BufRead, Write};

use serde::Serialize;

use crate::parsing::record::{is_comment, parse_line, ParseError, FASTA_DIRECTIVE};
use crate::rewrite::{next_line, split_terminator};

/// Line counts from one filtering pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterSummary {
    pub lines: usize,
    pub dropped: usize,
}

/// Copy `reader` to `writer`, dropping every data line tagged `PAR`
///
/// All other lines are written exactly as read.
///
/// # Errors
///
/// Returns a parse error (with line number) for the first malformed data
/// line, or `ParseError::Io` if reading or writing fails.
pub fn filter_par_features<R: BufRead, W: Write>(
    mut reader: R,
    mut writer: W,
) -> Result<FilterSummary, ParseError> {
    let mut summary = FilterSummary::default();
    let mut buf = String::new();
    let mut in_sequences = false;

    while next_line(&mut reader, &mut buf)? {
        summary.lines += 1;
        let (content, _) = split_terminator(&buf);

        if content.starts_with(FASTA_DIRECTIVE) {
            in_sequences = true;
        }
        if !in_sequences && !content.trim().is_empty() && !is_comment(content) {
            let record = parse_line(content).map_err(|e| e.at_line(summary.lines))?;
            if record.feature.is_par_tagged() {
                summary.dropped += 1;
                continue;
            }
        }
        writer.write_all(buf.as_bytes())?;
    }

    writer.flush()?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(input: &str) -> (String, FilterSummary) {
        let mut output = Vec::new();
        let summary = filter_par_features(input.as_bytes(), &mut output).unwrap();
        (String::from_utf8(output).unwrap(), summary)
    }

    #[test]
    fn test_drops_par_tagged_lines() {
        let input = "\
##gff-version 3
NC_000023.11\t.\tgene\t100\t200\t.\t+\t.\tID=gene-A;tag=PAR
NC_000024.10\t.\tgene\t100\t200\t.\t+\t.\tID=gene-A-2;tag=MANE Select,PAR
NC_000024.10\t.\tgene\t300\t400\t.\t+\t.\tID=gene-B;tag=PARTIAL
NC_000024.10\t.\texon\t100\t150\t.\t+\t.\tgene_id \"A\"; tag \"basic\"; tag \"PAR\";
NC_000024.10\t.\texon\t300\t350\t.\t+\t.\tgene_id \"B\"; tag \"basic\";
";
        let (output, summary) = filter(input);
        assert_eq!(
            output,
            "\
##gff-version 3
NC_000024.10\t.\tgene\t300\t400\t.\t+\t.\tID=gene-B;tag=PARTIAL
NC_000024.10\t.\texon\t300\t350\t.\t+\t.\tgene_id \"B\"; tag \"basic\";
"
        );
        assert_eq!(summary, FilterSummary { lines: 6, dropped: 3 });
    }

    #[test]
    fn test_untagged_file_unchanged() {
        let input = "#comment\r\n\nchr1\t.\tgene\t1\t10\t.\t.\t.\t.\nchr1\t.\tgene\t1\t10\t.\t.\t.\tID=x";
        let (output, summary) = filter(input);
        assert_eq!(output, input);
        assert_eq!(summary.dropped, 0);
        assert_eq!(summary.lines, 4);
    }

    #[test]
    fn test_malformed_line_reports_line_number() {
        let input = "chr1\t.\tgene\t1\t10\t.\t.\t.\t.\nchr1\t.\tgene\tone\t10\t.\t.\t.\t.\n";
        let err = filter_par_features(input.as_bytes(), Vec::new()).unwrap_err();
        assert!(matches!(err, ParseError::AtLine { line: 2, .. }));
    }
}
