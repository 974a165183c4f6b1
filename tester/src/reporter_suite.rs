use libregtest::{Reporter, Severity};

unit_test!("Reporter:PlainLines", {
    let mut reporter = Reporter::plain(Vec::new());
    reporter.emit("first", Severity::Neutral)?;
    reporter.emit("second", Severity::Failure)?;
    let out = String::from_utf8(reporter.into_inner())?;
    check!(out == "first\nsecond\n", out);
});

unit_test!("Reporter:ColorIsScopedToOneLine", {
    let mut reporter = Reporter::new(Vec::new(), true);
    reporter.emit("TEST X -> SUCCESS", Severity::Success)?;
    reporter.emit("plain", Severity::Neutral)?;
    let out = String::from_utf8(reporter.into_inner())?;
    let lines: Vec<&str> = out.lines().collect();
    require!(lines.len() == 2, out);
    check!(lines[0] == "\u{1b}[32mTEST X -> SUCCESS\u{1b}[0m", lines[0]);
    check!(lines[1] == "plain", lines[1]);
});
