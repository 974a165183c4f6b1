use colored::*;
use std::io::{self, Write};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Severity {
    Neutral,
    Success,
    Failure,
}

/// Line oriented report writer.
///
/// Whether lines are colored is decided by whoever builds the reporter;
/// nothing here probes the sink.
pub struct Reporter<W> {
    sink: W,
    color: bool,
}

impl<W> Reporter<W>
    where W: Write
{
    pub fn new(sink: W, color: bool) -> Self {
        Self {
            sink: sink,
            color: color,
        }
    }

    pub fn plain(sink: W) -> Self {
        Self::new(sink, false)
    }

    pub fn emit(&mut self, line: &str, severity: Severity) -> io::Result<()> {
        if !self.color {
            return writeln!(self.sink, "{}", line);
        }
        // colored otherwise drops escapes when stdout is not a terminal.
        colored::control::set_override(true);
        match severity {
            Severity::Neutral => writeln!(self.sink, "{}", line),
            Severity::Success => writeln!(self.sink, "{}", line.green()),
            Severity::Failure => writeln!(self.sink, "{}", line.red()),
        }
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.sink.flush()
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}

impl Reporter<io::Stdout> {
    pub fn stdout(color: bool) -> Self {
        Self::new(io::stdout(), color)
    }
}

#[test]
fn test_plain_lines() {
    let mut reporter = Reporter::plain(Vec::new());
    reporter.emit("TEST A -> SUCCESS", Severity::Success).unwrap();
    reporter.emit("\t CHECK failed on: x", Severity::Failure).unwrap();
    let out = String::from_utf8(reporter.into_inner()).unwrap();
    assert_eq!(out, "TEST A -> SUCCESS\n\t CHECK failed on: x\n");
}

#[test]
fn test_colored_line_keeps_text() {
    let mut reporter = Reporter::new(Vec::new(), true);
    reporter.emit("TEST A -> FAILURE", Severity::Failure).unwrap();
    reporter.emit("after", Severity::Neutral).unwrap();
    let out = String::from_utf8(reporter.into_inner()).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("TEST A -> FAILURE"));
    assert_eq!(lines[1], "after");
}

#[test]
fn test_color_is_forced_and_reset_per_line() {
    let mut reporter = Reporter::new(Vec::new(), true);
    reporter.emit("TEST A -> SUCCESS", Severity::Success).unwrap();
    reporter.emit("TEST B -> FAILURE", Severity::Failure).unwrap();
    reporter.emit("EXECUTED 2 UNIT TESTS.", Severity::Neutral).unwrap();
    let out = String::from_utf8(reporter.into_inner()).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("\u{1b}[32m"), "{:?}", lines[0]);
    assert!(lines[0].ends_with("\u{1b}[0m"), "{:?}", lines[0]);
    assert!(lines[1].starts_with("\u{1b}[31m"), "{:?}", lines[1]);
    assert!(lines[1].ends_with("\u{1b}[0m"), "{:?}", lines[1]);
    assert_eq!(lines[2], "EXECUTED 2 UNIT TESTS.");
}

#[test]
fn test_file_sink() {
    use std::io::{Read, Seek, SeekFrom};

    let mut file = tempfile::tempfile().unwrap();
    {
        let mut reporter = Reporter::plain(&mut file);
        reporter.emit("EXECUTING 0 UNIT TESTS...", Severity::Neutral).unwrap();
        reporter.flush().unwrap();
    }
    file.seek(SeekFrom::Start(0)).unwrap();
    let mut written = String::new();
    file.read_to_string(&mut written).unwrap();
    assert_eq!(written, "EXECUTING 0 UNIT TESTS...\n");
}
