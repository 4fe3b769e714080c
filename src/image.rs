//! Program image format for LS-8 programs.
//!
//! An `.ls8` image is a simple text format:
//! - One memory byte per line, written as a binary literal (`10000010`)
//! - Everything from `#` to the end of the line is a comment
//! - Blank lines are ignored
//!
//! Bytes are loaded into consecutive addresses starting at 0.

use std::path::Path;
use thiserror::Error;

/// Parse image source text into the byte sequence it encodes.
pub fn parse_image(source: &str) -> Result<Vec<u8>, ImageError> {
    let mut program = Vec::new();

    for (line_num, line) in source.lines().enumerate() {
        // Strip comments
        let code = match line.find('#') {
            Some(idx) => &line[..idx],
            None => line,
        };
        let code = code.trim();

        // Skip empty lines
        if code.is_empty() {
            continue;
        }

        let byte = u8::from_str_radix(code, 2).map_err(|e| ImageError::ParseError {
            line: line_num + 1,
            message: format!("bad binary literal {:?}: {}", code, e),
        })?;

        program.push(byte);
    }

    Ok(program)
}

/// Load an `.ls8` image from disk.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<Vec<u8>, ImageError> {
    let source = std::fs::read_to_string(path.as_ref())
        .map_err(|e| ImageError::IoError(e.to_string()))?;
    parse_image(&source)
}

/// Errors that can occur while loading a program image.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("parse error on line {line}: {message}")]
    ParseError { line: usize, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_image() {
        let source = "10000010\n00000000\n00001000\n";
        assert_eq!(parse_image(source).unwrap(), vec![0b1000_0010, 0, 8]);
    }

    #[test]
    fn test_parse_skips_comments_and_blank_lines() {
        let source = "\
# print the number 8
10000010 # LDI R0,8
00000000
00001000

01000111 # PRN R0
00000000
00000001 # HLT
";
        assert_eq!(
            parse_image(source).unwrap(),
            vec![0x82, 0, 8, 0x47, 0, 0x01]
        );
    }

    #[test]
    fn test_parse_reports_line_number() {
        let source = "00000001\nnot a byte\n";
        match parse_image(source) {
            Err(ImageError::ParseError { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_oversized_literal() {
        // Nine bits cannot fit in a byte.
        assert!(parse_image("111111111\n").is_err());
    }

    #[test]
    fn test_parse_accepts_short_literal() {
        assert_eq!(parse_image("101\n").unwrap(), vec![5]);
    }

    #[test]
    fn test_parse_empty_source() {
        assert_eq!(parse_image("").unwrap(), Vec::<u8>::new());
        assert_eq!(parse_image("# only comments\n\n").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_load_missing_file() {
        match load_image("/no/such/file.ls8") {
            Err(ImageError::IoError(_)) => {}
            other => panic!("expected I/O error, got {:?}", other),
        }
    }
}
