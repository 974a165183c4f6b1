use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use super::auto_register::AutoRegister;
use super::context::{self, ActiveContext, AssertionKind, ExecutionContext, SharedContext};
use super::reporter::{Reporter, Severity};
use super::test_case::{FailSignal, TestCase};

lazy_static! {
    static ref GLOBAL: Registry = Registry::from_inventory();
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RunSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Owns registered tests and the execution context of the test being run.
pub struct Registry {
    tests: Mutex<Vec<TestCase>>,
    current: SharedContext,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            tests: Mutex::new(Vec::new()),
            current: Arc::new(Mutex::new(ExecutionContext::new())),
        }
    }

    /// The process wide registry, holding every test declared with
    /// `unit_test!`. Created on first access.
    pub fn global() -> &'static Registry {
        &*GLOBAL
    }

    fn from_inventory() -> Self {
        let registry = Registry::new();
        for entry in inventory::iter::<AutoRegister> {
            registry.register(entry.to_test_case());
        }
        registry
    }

    fn tests(&self) -> MutexGuard<Vec<TestCase>> {
        self.tests.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn register(&self, test: TestCase) {
        debug!("register({})", test.name());
        self.tests().push(test);
    }

    pub fn len(&self) -> usize {
        self.tests().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests().is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tests().iter()
            .map(|test| test.name().to_string())
            .collect();
        names.sort();
        names
    }

    fn record(&self, message: String) {
        context::lock(&self.current).record(message);
    }

    pub fn check(&self, condition: bool, label: &str, detail: Option<&str>) {
        let _ = context::assert_into(AssertionKind::Check, condition, label, detail, |m| self.record(m));
    }

    pub fn require(&self, condition: bool, label: &str, detail: Option<&str>) -> Result<(), FailSignal> {
        context::assert_into(AssertionKind::Require, condition, label, detail, |m| self.record(m))
    }

    /// Runs every registered test in name order and reports each one.
    ///
    /// `_tests_path` is accepted for callers that pass a location but does
    /// not select anything; all tests always run.
    pub fn run_all<W>(&self, reporter: &mut Reporter<W>, _tests_path: Option<&str>) -> io::Result<RunSummary>
        where W: Write
    {
        let tests = {
            let mut tests = self.tests();
            tests.sort_by(|left, right| left.name().cmp(right.name()));
            tests.clone()
        };
        let mut summary = RunSummary {
            total: tests.len(),
            ..RunSummary::default()
        };

        reporter.emit(&format!("EXECUTING {} UNIT TESTS...", summary.total), Severity::Neutral)?;

        for test in &tests {
            debug!("run({})", test.name());
            *context::lock(&self.current) = ExecutionContext::new();

            let outcome = {
                let _active = ActiveContext::install(&self.current);
                test.run()
            };
            let execution = context::lock(&self.current).clone();

            if outcome.success && execution.is_clean() {
                reporter.emit(&format!("TEST {} -> SUCCESS", test.name()), Severity::Success)?;
                summary.succeeded += 1;
            } else {
                reporter.emit(&format!("TEST {} -> FAILURE", test.name()), Severity::Failure)?;
                for message in execution.messages() {
                    reporter.emit(&format!("\t {}", message), Severity::Failure)?;
                }
                if let Some(message) = outcome.uncaught.filter(|message| !message.is_empty()) {
                    reporter.emit(&format!("\t Exception triggered: {}", message), Severity::Failure)?;
                }
                summary.failed += 1;
            }
        }

        let severity = if summary.is_success() { Severity::Neutral } else { Severity::Failure };
        reporter.emit(
            &format!(
                "EXECUTED {} UNIT TESTS. {} successful, {} failed",
                summary.total,
                summary.succeeded,
                summary.failed
            ),
            severity,
        )?;
        reporter.flush()?;
        info!("{} tests run, {} successful, {} failed", summary.total, summary.succeeded, summary.failed);
        Ok(summary)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
use super::test_case::TestError;

#[cfg(test)]
fn run_to_string(registry: &Registry) -> (String, RunSummary) {
    let mut reporter = Reporter::plain(Vec::new());
    let summary = registry.run_all(&mut reporter, None).unwrap();
    (String::from_utf8(reporter.into_inner()).unwrap(), summary)
}

#[test]
fn test_math_scenario() {
    let registry = Registry::new();
    registry.register(TestCase::new("Math:Bad", || {
        context::require(1 == 2, "1==2", Some("should be equal"))?;
        Ok(())
    }));
    registry.register(TestCase::new("Math:Add", || {
        context::check(2 + 2 == 4, "2+2==4", None);
        Ok(())
    }));

    let (out, summary) = run_to_string(&registry);
    assert_eq!(out, "EXECUTING 2 UNIT TESTS...\n\
                     TEST Math:Add -> SUCCESS\n\
                     TEST Math:Bad -> FAILURE\n\
                     \t REQUIRE failed on: 1==2  -  should be equal\n\
                     EXECUTED 2 UNIT TESTS. 1 successful, 1 failed\n");
    assert_eq!(summary, RunSummary { total: 2, succeeded: 1, failed: 1 });
    assert!(!summary.is_success());
}

#[test]
fn test_sorted_regardless_of_registration_order() {
    let registry = Registry::new();
    registry.register(TestCase::new("B:Test", || Ok(())));
    registry.register(TestCase::new("A:Test", || Ok(())));

    let (out, _) = run_to_string(&registry);
    let a = out.find("TEST A:Test").unwrap();
    let b = out.find("TEST B:Test").unwrap();
    assert!(a < b);
    assert_eq!(registry.names(), vec!["A:Test".to_string(), "B:Test".to_string()]);
}

#[test]
fn test_soft_checks_all_run() {
    use std::sync::atomic::{AtomicUsize, Ordering};

    static REACHED: AtomicUsize = AtomicUsize::new(0);
    let registry = Registry::new();
    registry.register(TestCase::new("Soft:Many", || {
        context::check(false, "first", None);
        context::check(true, "fine", None);
        context::check(false, "second", Some("more"));
        REACHED.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }));

    let (out, summary) = run_to_string(&registry);
    assert_eq!(REACHED.load(Ordering::SeqCst), 1);
    assert_eq!(summary.failed, 1);
    assert!(out.contains("TEST Soft:Many -> FAILURE\n\
                          \t CHECK failed on: first\n\
                          \t CHECK failed on: second  -  more\n"));
}

#[test]
fn test_require_stops_body() {
    use std::sync::atomic::{AtomicUsize, Ordering};

    static REACHED: AtomicUsize = AtomicUsize::new(0);
    let registry = Registry::new();
    registry.register(TestCase::new("Hard:Stop", || {
        context::require(false, "precondition", None)?;
        REACHED.fetch_add(1, Ordering::SeqCst);
        context::check(false, "never", None);
        Ok(())
    }));

    let (out, _) = run_to_string(&registry);
    assert_eq!(REACHED.load(Ordering::SeqCst), 0);
    assert!(out.contains("\t REQUIRE failed on: precondition\n"));
    assert!(!out.contains("never"));
    assert!(!out.contains("Exception triggered"));
}

#[test]
fn test_uncaught_failure_reported() {
    let registry = Registry::new();
    registry.register(TestCase::new("Err:Boom", || Err(TestError::uncaught("boom"))));
    registry.register(TestCase::new("Err:Panic", || panic!("kaboom")));

    let (out, summary) = run_to_string(&registry);
    assert!(out.contains("TEST Err:Boom -> FAILURE\n\t Exception triggered: boom\n"));
    assert!(out.contains("TEST Err:Panic -> FAILURE\n\t Exception triggered: kaboom\n"));
    assert_eq!(summary.failed, 2);
}

#[test]
fn test_context_does_not_leak_between_tests() {
    let registry = Registry::new();
    registry.register(TestCase::new("Leak:A", || {
        context::check(false, "only in A", None);
        Ok(())
    }));
    registry.register(TestCase::new("Leak:B", || Ok(())));

    let (out, summary) = run_to_string(&registry);
    assert!(out.contains("TEST Leak:B -> SUCCESS"));
    assert_eq!(out.matches("only in A").count(), 1);
    assert_eq!(summary.succeeded, 1);
}

#[test]
fn test_second_run_is_identical() {
    let registry = Registry::new();
    registry.register(TestCase::new("Twice:Fails", || {
        context::check(false, "x", None);
        Ok(())
    }));
    registry.register(TestCase::new("Twice:Passes", || Ok(())));

    let first = run_to_string(&registry);
    let second = run_to_string(&registry);
    assert_eq!(first, second);
}

#[test]
fn test_duplicate_names_both_run() {
    let registry = Registry::new();
    registry.register(TestCase::new("Dup:Name", || Ok(())));
    registry.register(TestCase::new("Dup:Name", || Err(TestError::uncaught("second"))));

    assert_eq!(registry.len(), 2);
    let (out, summary) = run_to_string(&registry);
    assert_eq!(summary.total, 2);
    assert_eq!(out.matches("TEST Dup:Name -> ").count(), 2);
    assert_eq!(summary, RunSummary { total: 2, succeeded: 1, failed: 1 });
}

#[test]
fn test_registry_methods_write_own_context() {
    let registry = Registry::new();
    registry.check(false, "direct", Some("detail"));
    assert_eq!(registry.require(false, "direct", None), Err(FailSignal));
    assert_eq!(context::lock(&registry.current).messages(), &[
        "CHECK failed on: direct  -  detail".to_string(),
        "REQUIRE failed on: direct".to_string(),
    ]);
}

#[test]
fn test_empty_registry() {
    let registry = Registry::new();
    assert!(registry.is_empty());
    let (out, summary) = run_to_string(&registry);
    assert_eq!(out, "EXECUTING 0 UNIT TESTS...\nEXECUTED 0 UNIT TESTS. 0 successful, 0 failed\n");
    assert!(summary.is_success());
}

#[test]
fn test_empty_uncaught_message_is_not_reported() {
    let registry = Registry::new();
    registry.register(TestCase::new("Err:Silent", || Err(TestError::uncaught(""))));

    let (out, summary) = run_to_string(&registry);
    assert_eq!(out, "EXECUTING 1 UNIT TESTS...\n\
                     TEST Err:Silent -> FAILURE\n\
                     EXECUTED 1 UNIT TESTS. 0 successful, 1 failed\n");
    assert_eq!(summary.failed, 1);
}
