//! Update-proposal line parsing
//!
//! Proposals arrive as plain text, one record per line:
//! `<packageName> <oldVersion> <newVersion>`, separated by arbitrary
//! whitespace. Malformed lines are reported individually, never silently
//! dropped, and never stop the remaining lines from parsing.

use crate::domain::UpdateProposal;
use crate::error::ParseError;

/// Parse proposal text into one result per line, preserving line order.
///
/// Empty input produces an empty vector. A line with anything other than
/// exactly three whitespace-separated tokens yields an error carrying the
/// tokens re-joined with single spaces.
pub fn parse_updates(text: &str) -> Vec<Result<UpdateProposal, ParseError>> {
    text.lines().map(parse_line).collect()
}

fn parse_line(line: &str) -> Result<UpdateProposal, ParseError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    match tokens.as_slice() {
        [name, old_version, new_version] => {
            Ok(UpdateProposal::new(*name, *old_version, *new_version))
        }
        _ => Err(ParseError::malformed_line(tokens.join(" "))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_input() {
        assert!(parse_updates("").is_empty());
    }

    #[test]
    fn test_parse_single_proposal() {
        let results = parse_updates("pkg 1.0 2.0");
        assert_eq!(results.len(), 1);
        assert_eq!(
            results[0],
            Ok(UpdateProposal::new("pkg", "1.0", "2.0"))
        );
    }

    #[test]
    fn test_parse_too_few_tokens() {
        let results = parse_updates("pkg 1.0");
        assert_eq!(results.len(), 1);
        let err = results[0].clone().unwrap_err();
        assert_eq!(format!("{}", err), "Unable to parse update: pkg 1.0");
    }

    #[test]
    fn test_parse_too_many_tokens() {
        let results = parse_updates("pkg 1.0 2.0 extra");
        let err = results[0].clone().unwrap_err();
        assert_eq!(
            format!("{}", err),
            "Unable to parse update: pkg 1.0 2.0 extra"
        );
    }

    #[test]
    fn test_parse_collapses_whitespace_in_error_text() {
        let results = parse_updates("pkg\t\t1.0");
        let err = results[0].clone().unwrap_err();
        assert_eq!(format!("{}", err), "Unable to parse update: pkg 1.0");
    }

    #[test]
    fn test_parse_arbitrary_whitespace_between_tokens() {
        let results = parse_updates("  pkg \t 1.0   2.0  ");
        assert_eq!(
            results[0],
            Ok(UpdateProposal::new("pkg", "1.0", "2.0"))
        );
    }

    #[test]
    fn test_parse_preserves_line_order_and_reports_bad_lines() {
        let text = "a 1.0 1.1\nbroken line\nb 2.0 2.1";
        let results = parse_updates(text);
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        assert!(results[2].is_ok());
        assert_eq!(results[2].as_ref().unwrap().name, "b");
    }

    #[test]
    fn test_parse_blank_line_is_reported() {
        let results = parse_updates("a 1.0 1.1\n\n");
        assert_eq!(results.len(), 2);
        let err = results[1].clone().unwrap_err();
        assert_eq!(format!("{}", err), "Unable to parse update: ");
    }

    #[test]
    fn test_parse_crlf_line_endings() {
        let results = parse_updates("a 1.0 1.1\r\nb 2.0 2.1\r\n");
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.is_ok()));
    }
}
