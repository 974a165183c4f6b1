#[macro_use] extern crate libregtest;

use libregtest::{Registry, Reporter, RunSummary, TestError};
use std::sync::atomic::{AtomicUsize, Ordering};

static AFTER_REQUIRE: AtomicUsize = AtomicUsize::new(0);

unit_test!("Math:Bad", {
    require!(1 == 2, "should be equal");
    AFTER_REQUIRE.fetch_add(1, Ordering::SeqCst);
});

unit_test!("Math:Add", {
    check!(2 + 2 == 4);
});

unit_test!("Io:Missing", {
    std::fs::read_to_string("/definitely/not/here.txt")?;
});

unit_test!("Errors:Uncaught", {
    return Err(TestError::uncaught("boom"));
});

fn run_global() -> (String, RunSummary) {
    let mut reporter = Reporter::plain(Vec::new());
    let summary = Registry::global().run_all(&mut reporter, Some("tests")).unwrap();
    (String::from_utf8(reporter.into_inner()).unwrap(), summary)
}

#[test]
fn test_declared_tests_run_from_global_registry() {
    assert_eq!(Registry::global().names(), vec![
        "Errors:Uncaught".to_string(),
        "Io:Missing".to_string(),
        "Math:Add".to_string(),
        "Math:Bad".to_string(),
    ]);

    let (out, summary) = run_global();
    let lines: Vec<&str> = out.lines().collect();

    assert_eq!(lines[0], "EXECUTING 4 UNIT TESTS...");
    assert_eq!(lines[1], "TEST Errors:Uncaught -> FAILURE");
    assert_eq!(lines[2], "\t Exception triggered: boom");
    assert_eq!(lines[3], "TEST Io:Missing -> FAILURE");
    assert!(lines[4].starts_with("\t Exception triggered: "));
    assert_eq!(lines[5], "TEST Math:Add -> SUCCESS");
    assert_eq!(lines[6], "TEST Math:Bad -> FAILURE");
    assert_eq!(lines[7], "\t REQUIRE failed on: 1 == 2  -  should be equal");
    assert_eq!(lines[8], "EXECUTED 4 UNIT TESTS. 1 successful, 3 failed");
    assert_eq!(lines.len(), 9);
    assert_eq!(summary, RunSummary { total: 4, succeeded: 1, failed: 3 });
    assert_eq!(AFTER_REQUIRE.load(Ordering::SeqCst), 0);

    let (again, _) = run_global();
    assert_eq!(out, again);
}
