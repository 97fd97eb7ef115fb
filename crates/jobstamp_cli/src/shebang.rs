//! Interpreter lookup from `#!` lines.

use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Longest first line inspected for a shebang.
const MAX_SHEBANG_LEN: u64 = 1024;

/// Returns the interpreter command named by the shebang line of `path`.
///
/// The line after `#!` is split on whitespace, so `#!/usr/bin/env python3`
/// yields `["/usr/bin/env", "python3"]`. Files without a shebang, including
/// native executables, yield an empty vector.
pub fn interpreter(path: &Path) -> std::io::Result<Vec<String>> {
    let file = std::fs::File::open(path)?;
    let mut reader = BufReader::new(file.take(MAX_SHEBANG_LEN));
    let mut line = Vec::new();
    reader.read_until(b'\n', &mut line)?;
    Ok(parse(&line))
}

/// Parses a raw first line.
fn parse(line: &[u8]) -> Vec<String> {
    let Some(rest) = line.strip_prefix(b"#!") else {
        return Vec::new();
    };
    String::from_utf8_lossy(rest)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_interpreter() {
        assert_eq!(parse(b"#!/bin/sh\n"), vec!["/bin/sh"]);
    }

    #[test]
    fn parse_env_with_argument() {
        assert_eq!(
            parse(b"#! /usr/bin/env python3 -u\r\n"),
            vec!["/usr/bin/env", "python3", "-u"]
        );
    }

    #[test]
    fn parse_without_shebang() {
        assert!(parse(b"echo hello\n").is_empty());
        assert!(parse(b"").is_empty());
    }

    #[test]
    fn parse_binary_header() {
        assert!(parse(&[0x7f, b'E', b'L', b'F', 2, 1, 1, 0]).is_empty());
    }

    #[test]
    fn interpreter_reads_first_line_only() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("script");
        std::fs::write(&script, "#!/bin/sh -e\necho '#!/not/this'\n").unwrap();
        assert_eq!(interpreter(&script).unwrap(), vec!["/bin/sh", "-e"]);
    }

    #[test]
    fn interpreter_of_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("empty");
        std::fs::write(&script, "").unwrap();
        assert!(interpreter(&script).unwrap().is_empty());
    }

    #[test]
    fn interpreter_of_missing_file_errors() {
        assert!(interpreter(Path::new("/nonexistent/script")).is_err());
    }
}
