use libregtest::{Registry, Reporter, RunSummary, TestCase, TestError};
use std::sync::atomic::{AtomicUsize, Ordering};

fn report(registry: &Registry) -> Result<(String, RunSummary), TestError> {
    let mut reporter = Reporter::plain(Vec::new());
    let summary = registry.run_all(&mut reporter, None)?;
    let out = String::from_utf8(reporter.into_inner())?;
    Ok((out, summary))
}

unit_test!("Registry:RunsInNameOrder", {
    let registry = Registry::new();
    registry.register(TestCase::new("B:Test", || Ok(())));
    registry.register(TestCase::new("A:Test", || Ok(())));

    let (out, summary) = report(&registry)?;
    let a = out.find("TEST A:Test");
    let b = out.find("TEST B:Test");
    require!(a.is_some() && b.is_some());
    check!(a < b, out);
    check!(summary == RunSummary { total: 2, succeeded: 2, failed: 0 });
});

static AFTER_SOFT: AtomicUsize = AtomicUsize::new(0);

unit_test!("Registry:SoftCheckContinues", {
    let registry = Registry::new();
    registry.register(TestCase::new("Inner:Soft", || {
        check!(1 + 1 == 3);
        AFTER_SOFT.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }));

    let before = AFTER_SOFT.load(Ordering::SeqCst);
    let (out, summary) = report(&registry)?;
    check!(AFTER_SOFT.load(Ordering::SeqCst) == before + 1);
    check!(out.contains("\t CHECK failed on: 1 + 1 == 3\n"), out);
    check!(summary.failed == 1);
});

static AFTER_HARD: AtomicUsize = AtomicUsize::new(0);

unit_test!("Registry:RequireStopsBody", {
    let registry = Registry::new();
    registry.register(TestCase::new("Inner:Hard", || {
        require!(1 == 2, "should be equal");
        AFTER_HARD.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }));

    let (out, _) = report(&registry)?;
    check!(AFTER_HARD.load(Ordering::SeqCst) == 0);
    check!(out.contains("\t REQUIRE failed on: 1 == 2  -  should be equal\n"), out);
    check!(!out.contains("Exception triggered"), out);
});

unit_test!("Registry:ContextResetsBetweenTests", {
    let registry = Registry::new();
    registry.register(TestCase::new("Inner:A", || {
        check!(false, "recorded in A");
        Ok(())
    }));
    registry.register(TestCase::new("Inner:B", || Ok(())));

    let (first, _) = report(&registry)?;
    let (second, _) = report(&registry)?;
    check!(first.contains("TEST Inner:B -> SUCCESS"), first);
    check!(first == second);
});

unit_test!("Registry:UncaughtErrors", {
    let registry = Registry::new();
    registry.register(TestCase::new("Inner:Boom", || Err(TestError::uncaught("boom"))));

    let (out, summary) = report(&registry)?;
    check!(out.contains("TEST Inner:Boom -> FAILURE\n\t Exception triggered: boom\n"), out);
    check!(!summary.is_success());
});
