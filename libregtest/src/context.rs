use std::cell::RefCell;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use super::test_case::FailSignal;

/// Failure messages accumulated while one test runs.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ExecutionContext {
    error_messages: Vec<String>,
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, message: String) {
        self.error_messages.push(message);
    }

    pub fn is_clean(&self) -> bool {
        self.error_messages.is_empty()
    }

    pub fn messages(&self) -> &[String] {
        &self.error_messages
    }
}

pub type SharedContext = Arc<Mutex<ExecutionContext>>;

thread_local! {
    static ACTIVE: RefCell<Option<SharedContext>> = RefCell::new(None);
}

/// Makes `context` the target of the free `check`/`require` functions on
/// this thread until dropped.
pub struct ActiveContext {
    previous: Option<SharedContext>,
}

impl ActiveContext {
    pub fn install(context: &SharedContext) -> Self {
        let previous = ACTIVE.with(|active| active.replace(Some(context.clone())));
        Self { previous }
    }
}

impl Drop for ActiveContext {
    fn drop(&mut self) {
        let previous = self.previous.take();
        ACTIVE.with(|active| *active.borrow_mut() = previous);
    }
}

pub fn lock(context: &Mutex<ExecutionContext>) -> MutexGuard<ExecutionContext> {
    context.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AssertionKind {
    Check,
    Require,
}

impl AssertionKind {
    fn label(&self) -> &'static str {
        match *self {
            AssertionKind::Check => "CHECK",
            AssertionKind::Require => "REQUIRE",
        }
    }
}

pub fn failure_message(kind: AssertionKind, label: &str, detail: Option<&str>) -> String {
    match detail {
        Some(detail) => format!("{} failed on: {}  -  {}", kind.label(), label, detail),
        None => format!("{} failed on: {}", kind.label(), label),
    }
}

/// Evaluates one assertion, handing its failure message to `record`.
///
/// Only a failed `Require` yields the `FailSignal`.
pub fn assert_into<F>(
    kind: AssertionKind,
    condition: bool,
    label: &str,
    detail: Option<&str>,
    record: F,
) -> Result<(), FailSignal>
    where F: FnOnce(String)
{
    if condition {
        return Ok(());
    }
    record(failure_message(kind, label, detail));
    match kind {
        AssertionKind::Check => Ok(()),
        AssertionKind::Require => Err(FailSignal),
    }
}

fn record_active(message: String) {
    let recorded = ACTIVE.with(|active| match *active.borrow() {
        Some(ref context) => {
            lock(context).record(message.clone());
            true
        }
        None => false,
    });
    if !recorded {
        warn!("assertion failed outside of a test run: {}", message);
    }
}

/// Soft assertion against the test currently running on this thread.
pub fn check(condition: bool, label: &str, detail: Option<&str>) {
    // A check never signals.
    let _ = assert_into(AssertionKind::Check, condition, label, detail, record_active);
}

/// Hard assertion; on failure the caller is expected to propagate the
/// returned signal with `?`.
pub fn require(condition: bool, label: &str, detail: Option<&str>) -> Result<(), FailSignal> {
    assert_into(AssertionKind::Require, condition, label, detail, record_active)
}

#[cfg(test)]
fn with_active<F>(body: F) -> ExecutionContext
    where F: FnOnce()
{
    let context: SharedContext = Arc::new(Mutex::new(ExecutionContext::new()));
    {
        let _active = ActiveContext::install(&context);
        body();
    }
    let recorded = lock(&context).clone();
    recorded
}

#[test]
fn test_check_records_and_continues() {
    let mut reached = false;
    let context = with_active(|| {
        check(1 + 1 == 3, "1 + 1 == 3", None);
        check(true, "true", None);
        check(false, "false", Some("details"));
        reached = true;
    });
    assert!(reached);
    assert_eq!(context.messages(), &[
        "CHECK failed on: 1 + 1 == 3".to_string(),
        "CHECK failed on: false  -  details".to_string(),
    ]);
}

#[test]
fn test_require_returns_signal() {
    let context = with_active(|| {
        assert_eq!(require(true, "true", None), Ok(()));
        assert_eq!(require(1 == 2, "1==2", Some("should be equal")), Err(FailSignal));
    });
    assert_eq!(context.messages(), &["REQUIRE failed on: 1==2  -  should be equal".to_string()]);
}

#[test]
fn test_outside_of_run_is_dropped() {
    ACTIVE.with(|active| assert!(active.borrow().is_none()));
    check(false, "nobody listening", None);
    assert_eq!(require(false, "nobody listening", None), Err(FailSignal));

    let context = with_active(|| ());
    assert!(context.is_clean());
    ACTIVE.with(|active| assert!(active.borrow().is_none()));
}

#[test]
fn test_assert_into_target() {
    let mut recorded = Vec::new();
    assert_eq!(assert_into(AssertionKind::Check, false, "a", None, |m| recorded.push(m)), Ok(()));
    assert_eq!(assert_into(AssertionKind::Require, true, "b", None, |m| recorded.push(m)), Ok(()));
    assert_eq!(
        assert_into(AssertionKind::Require, false, "c", Some("d"), |m| recorded.push(m)),
        Err(FailSignal)
    );
    assert_eq!(recorded, vec![
        "CHECK failed on: a".to_string(),
        "REQUIRE failed on: c  -  d".to_string(),
    ]);
}

#[test]
fn test_guard_restores_previous_context() {
    let outer: SharedContext = Arc::new(Mutex::new(ExecutionContext::new()));
    let _outer_guard = ActiveContext::install(&outer);
    let inner = with_active(|| check(false, "inner", None));
    check(false, "outer", None);

    assert_eq!(inner.messages(), &["CHECK failed on: inner".to_string()]);
    assert_eq!(lock(&outer).messages(), &["CHECK failed on: outer".to_string()]);
}
