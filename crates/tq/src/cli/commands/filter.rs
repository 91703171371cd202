//! Implementation of `tq filter`.
//!
//! Exit status follows grep: 0 when at least one line was selected, 1 when none
//! was, 2 on a query or I/O error.

use std::{
    fs::File,
    io::{self, BufRead, BufReader, Write},
    path::Path,
    process::ExitCode,
};

use textquery::Query;
use tracing::{debug, warn};

use super::EXIT_ERROR;
use crate::cli::{args::FilterCommand, context::CommandContext};

/// Decides which lines are selected.
struct Selector<'a> {
    /// Parsed query.
    query: &'a Query,
    /// Select non-matching lines instead.
    invert: bool,
    /// Count only, print nothing per line.
    count_only: bool,
}

impl Selector<'_> {
    /// True when `line` is selected.
    fn selects(&self, line: &str) -> bool {
        self.query.matches(line) != self.invert
    }

    /// Scans every line of `reader`, writing selected lines to `out` unless counting.
    ///
    /// Lines that are not valid UTF-8 are matched with invalid sequences replaced
    /// and written back byte for byte. Returns the number of selected lines.
    fn scan(&self, mut reader: impl BufRead, out: &mut impl Write) -> io::Result<usize> {
        let mut selected = 0;
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let line = trim_newline(&buf);
            if self.selects(&String::from_utf8_lossy(line)) {
                selected += 1;
                if !self.count_only {
                    out.write_all(line)?;
                    out.write_all(b"\n")?;
                }
            }
        }
        Ok(selected)
    }
}

/// Strips a trailing `\n` or `\r\n`.
fn trim_newline(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Opens a file for line reading.
fn open(path: &Path) -> io::Result<BufReader<File>> {
    File::open(path).map(BufReader::new)
}

/// Prints the lines of the given files (or standard input) selected by the query.
pub fn run(ctx: &CommandContext, cmd: &FilterCommand) -> ExitCode {
    let query = match ctx.parser.parse(&cmd.query) {
        Ok(query) => query,
        Err(e) => {
            eprintln!("{}", e.format_with_context());
            return ExitCode::from(EXIT_ERROR);
        }
    };
    if query.is_empty() {
        warn!("empty query matches nothing");
    }

    let selector = Selector {
        query: &query,
        invert: cmd.invert,
        count_only: cmd.count,
    };
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut selected = 0;
    let mut failed = false;

    if cmd.files.is_empty() {
        match selector.scan(io::stdin().lock(), &mut out) {
            Ok(n) => selected += n,
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => return ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("error: failed to read standard input: {e}");
                failed = true;
            }
        }
    }

    for path in &cmd.files {
        match open(path).and_then(|reader| selector.scan(reader, &mut out)) {
            Ok(n) => {
                debug!(path = %path.display(), selected = n, "scanned file");
                selected += n;
            }
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => return ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("error: failed to read {}: {e}", path.display());
                failed = true;
            }
        }
    }

    if cmd.count && let Err(e) = writeln!(out, "{selected}") {
        eprintln!("error: failed to write output: {e}");
        return ExitCode::from(EXIT_ERROR);
    }

    if failed {
        ExitCode::from(EXIT_ERROR)
    } else if selected > 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[cfg(test)]
mod tests {
    use textquery::parse;

    use super::*;

    fn scan(query: &str, invert: bool, input: &str) -> (usize, String) {
        let query = parse(query).unwrap();
        let selector = Selector {
            query: &query,
            invert,
            count_only: false,
        };
        let mut out = Vec::new();
        let n = selector.scan(input.as_bytes(), &mut out).unwrap();
        (n, String::from_utf8(out).unwrap())
    }

    #[test]
    fn selects_matching_lines() {
        let input = "a b c\na b d\nc g\nnothing\n";
        let (n, out) = scan("(a AND b AND NOT c) OR (c AND g)", false, input);
        assert_eq!(n, 2);
        assert_eq!(out, "a b d\nc g\n");
    }

    #[test]
    fn invert_selects_the_rest() {
        let (n, out) = scan("a", true, "a\nb\n\n");
        assert_eq!(n, 2);
        assert_eq!(out, "b\n\n");
    }

    #[test]
    fn count_only_writes_nothing() {
        let query = parse("a").unwrap();
        let selector = Selector {
            query: &query,
            invert: false,
            count_only: true,
        };
        let mut out = Vec::new();
        assert_eq!(selector.scan("a\na\nb".as_bytes(), &mut out).unwrap(), 2);
        assert!(out.is_empty());
    }

    #[test]
    fn invalid_utf8_lines_are_scanned() {
        let query = parse("a").unwrap();
        let selector = Selector {
            query: &query,
            invert: false,
            count_only: false,
        };
        let input: &[u8] = b"a b\n\xff\xfe a\nb\r\na c";
        let mut out = Vec::new();
        assert_eq!(selector.scan(input, &mut out).unwrap(), 3);
        assert_eq!(out, b"a b\n\xff\xfe a\na c\n");
    }

    #[test]
    fn empty_query_selects_nothing() {
        assert_eq!(scan("", false, "a\nb\n"), (0, String::new()));
    }
}
