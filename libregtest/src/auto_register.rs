use super::test_case::{TestCase, TestResult};

/// A test declared at item level, collected at link time and handed to
/// `Registry::global()` the first time it is accessed.
pub struct AutoRegister {
    name: &'static str,
    body: fn() -> TestResult,
}

impl AutoRegister {
    pub const fn new(name: &'static str, body: fn() -> TestResult) -> Self {
        Self {
            name: name,
            body: body,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn to_test_case(&self) -> TestCase {
        TestCase::new(self.name, self.body)
    }
}

inventory::collect!(AutoRegister);

#[cfg(test)]
fn failing_body() -> TestResult {
    Err(super::test_case::TestError::uncaught("declared"))
}

#[cfg(test)]
inventory::submit! {
    AutoRegister::new("AutoRegister:Declared", failing_body)
}

#[test]
fn test_submitted_entry_is_collected() {
    let entry = inventory::iter::<AutoRegister>
        .into_iter()
        .find(|entry| entry.name() == "AutoRegister:Declared")
        .unwrap();
    let outcome = entry.to_test_case().run();
    assert_eq!(outcome.uncaught, Some("declared".to_string()));
}
