use std::any::Any;
use std::error::Error;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// Raised by a failed `require` to stop the rest of a test body.
///
/// The failure message is already in the execution context by the time
/// this is returned, so it carries nothing itself.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FailSignal;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TestError {
    Fail(FailSignal),
    Uncaught(String),
}

impl TestError {
    pub fn uncaught<S>(message: S) -> Self
        where S: Into<String>
    {
        TestError::Uncaught(message.into())
    }
}

impl fmt::Display for TestError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            TestError::Fail(_) => write!(f, "test aborted by a failed REQUIRE"),
            TestError::Uncaught(ref message) => write!(f, "{}", message),
        }
    }
}

impl From<FailSignal> for TestError {
    fn from(signal: FailSignal) -> Self {
        TestError::Fail(signal)
    }
}

// TestError must not implement Error or this overlaps the reflexive From.
impl<E> From<E> for TestError
    where E: Error
{
    fn from(err: E) -> Self {
        TestError::Uncaught(err.to_string())
    }
}

pub type TestResult = Result<(), TestError>;

type TestBody = dyn Fn() -> TestResult + Send + Sync;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TestOutcome {
    pub success: bool,
    pub uncaught: Option<String>,
}

impl TestOutcome {
    fn passed() -> Self {
        Self {
            success: true,
            uncaught: None,
        }
    }

    fn aborted() -> Self {
        Self {
            success: false,
            uncaught: None,
        }
    }

    fn errored(message: String) -> Self {
        Self {
            success: false,
            uncaught: Some(message),
        }
    }
}

#[derive(Clone)]
pub struct TestCase {
    name: String,
    body: Arc<TestBody>,
}

impl TestCase {
    pub fn new<S, F>(name: S, body: F) -> Self
        where S: Into<String>,
              F: Fn() -> TestResult + Send + Sync + 'static
    {
        Self {
            name: name.into(),
            body: Arc::new(body),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs the body, turning every way it can end into an outcome.
    ///
    /// A `FailSignal` yields a failed outcome with no message; an
    /// uncaught error or a panic yields its message.
    pub fn run(&self) -> TestOutcome {
        match catch_unwind(AssertUnwindSafe(|| (self.body)())) {
            Ok(Ok(())) => TestOutcome::passed(),
            Ok(Err(TestError::Fail(_))) => TestOutcome::aborted(),
            Ok(Err(TestError::Uncaught(message))) => TestOutcome::errored(message),
            Err(payload) => TestOutcome::errored(panic_message(payload)),
        }
    }
}

impl PartialEq for TestCase {
    fn eq(&self, other: &TestCase) -> bool {
        self.name == other.name
    }
}

impl Eq for TestCase {}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("TestCase").field("name", &self.name).finish()
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[test]
fn test_passing_body() {
    let test = TestCase::new("Case:Pass", || Ok(()));
    assert_eq!(test.run(), TestOutcome { success: true, uncaught: None });
}

#[test]
fn test_fail_signal_has_no_message() {
    let test = TestCase::new("Case:Fail", || Err(FailSignal.into()));
    assert_eq!(test.run(), TestOutcome { success: false, uncaught: None });
}

#[test]
fn test_uncaught_error_keeps_message() {
    let test = TestCase::new("Case:Boom", || Err(TestError::uncaught("boom")));
    assert_eq!(test.run().uncaught, Some("boom".to_string()));
}

#[test]
fn test_question_mark_on_std_error() {
    let test = TestCase::new("Case:Parse", || {
        let _: i32 = "nope".parse()?;
        Ok(())
    });
    let outcome = test.run();
    assert!(!outcome.success);
    assert_eq!(outcome.uncaught, Some("invalid digit found in string".to_string()));
}

#[test]
fn test_panic_is_caught() {
    let test = TestCase::new("Case:Panic", || panic!("boom"));
    assert_eq!(test.run().uncaught, Some("boom".to_string()));

    let formatted = TestCase::new("Case:PanicFmt", || panic!("bad {}", 42));
    assert_eq!(formatted.run().uncaught, Some("bad 42".to_string()));
}

#[test]
fn test_equality_is_by_name() {
    let a = TestCase::new("Same", || Ok(()));
    let b = TestCase::new("Same", || Err(TestError::uncaught("different body")));
    let c = TestCase::new("Other", || Ok(()));
    assert_eq!(a, b);
    assert!(a != c);
}
