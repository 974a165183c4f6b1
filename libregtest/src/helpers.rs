/// Declares a test that registers itself with `Registry::global()`.
///
/// ```ignore
/// unit_test!("Math:Add", {
///     check!(2 + 2 == 4);
/// });
/// ```
#[macro_export]
macro_rules! unit_test {
    ($name:expr, $body:block) => {
        $crate::inventory::submit! {
            $crate::AutoRegister::new($name, || -> $crate::TestResult {
                $body
                Ok(())
            })
        }
    };
}

#[macro_export]
macro_rules! check {
    ($cond:expr) => {
        $crate::check($cond, stringify!($cond), None)
    };
    ($cond:expr, $detail:expr) => {
        $crate::check($cond, stringify!($cond), Some(::std::convert::AsRef::<str>::as_ref(&$detail)))
    };
}

/// Like `check!`, but returns from the enclosing test body on failure.
#[macro_export]
macro_rules! require {
    ($cond:expr) => {
        $crate::require($cond, stringify!($cond), None)?
    };
    ($cond:expr, $detail:expr) => {
        $crate::require($cond, stringify!($cond), Some(::std::convert::AsRef::<str>::as_ref(&$detail)))?
    };
}

#[cfg(test)]
use super::{Registry, Reporter, TestCase, TestResult};

#[cfg(test)]
fn run_one(name: &str, body: fn() -> TestResult) -> String {
    let registry = Registry::new();
    registry.register(TestCase::new(name, body));
    let mut reporter = Reporter::plain(Vec::new());
    registry.run_all(&mut reporter, None).unwrap();
    String::from_utf8(reporter.into_inner()).unwrap()
}

#[test]
fn test_check_macro_captures_expression() {
    let out = run_one("Macro:Check", || {
        let expected = 5;
        check!(2 + 2 == expected);
        check!(1 > 2, format!("got {}", 1));
        check!(true, "unused");
        Ok(())
    });
    assert!(out.contains("\t CHECK failed on: 2 + 2 == expected\n"));
    assert!(out.contains("\t CHECK failed on: 1 > 2  -  got 1\n"));
    assert!(!out.contains("unused"));
}

#[test]
fn test_require_macro_returns_early() {
    let out = run_one("Macro:Require", || {
        require!(1 == 2, "should be equal");
        check!(false);
        Ok(())
    });
    assert!(out.contains("TEST Macro:Require -> FAILURE\n\t REQUIRE failed on: 1 == 2  -  should be equal\n"));
    assert!(!out.contains("CHECK failed"));
}
