use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use prove_core::{
    batch, prove, Batch, Location, Operand, RegistrationError, Shape, Statement, Suite, TestUnit,
    Value,
};

fn identity<T>(value: T) -> T {
    value
}

fn shape(left: &str, operator: &str, right: &str, l: impl Into<Value>, r: impl Into<Value>) -> Shape {
    Shape::binary(left, operator, right, Operand::value(l), Operand::value(r))
}

fn names(units: &[TestUnit]) -> Vec<&str> {
    units.iter().map(TestUnit::name).collect()
}

#[test]
fn batch_prefixes_each_assertion() -> Result<()> {
    let mut suite = Suite::new("batch");
    let batch = Batch::new("one", Location::caller()).prove(
        None,
        Shape::binary(
            "identity(5)",
            ">",
            "1",
            Operand::new(|| Ok(Value::from(identity(5)))),
            Operand::value(1),
        ),
        Location::caller(),
    );
    let registered = suite.batch(batch)?;
    assert_eq!(registered, ["one identity(5) > 1 (1)"]);
    let units = suite.finish();
    assert_eq!(units.len(), 1);
    units[0].run()?;
    Ok(())
}

#[test]
fn batch_name_matches_standalone_declaration() -> Result<()> {
    let mut batched = Suite::new("same");
    batched.batch(
        Batch::new("outer", Location::caller()).prove(
            Some("inner"),
            shape("x", "==", "x", 1, 1),
            Location::caller(),
        ),
    )?;

    let mut standalone = Suite::new("same");
    standalone.prove(Some("outer inner"), shape("x", "==", "x", 1, 1), Location::caller())?;

    assert_eq!(names(batched.units()), names(standalone.units()));
    Ok(())
}

#[test]
fn batch_and_standalone_share_the_counter() -> Result<()> {
    let mut suite = Suite::new("shared");
    suite.prove(Some("outer inner"), shape("x", "==", "x", 1, 1), Location::caller())?;
    let registered = suite.batch(
        Batch::new("outer", Location::caller()).prove(
            Some("inner"),
            shape("x", "==", "x", 1, 1),
            Location::caller(),
        ),
    )?;
    assert_eq!(registered, ["outer inner x == x (2)"]);
    Ok(())
}

#[test]
fn nested_batch_registers_nothing() -> Result<()> {
    let mut suite = Suite::new("nested");
    let location = Location::new("tests/batch.rs", 7, 1);
    let inner = Batch::new("inner", Location::caller()).prove(
        None,
        shape("1", "==", "1", 1, 1),
        Location::caller(),
    );
    let outer = Batch::new("outer", location.clone())
        .prove(None, shape("1", "==", "1", 1, 1), Location::caller())
        .statement(Statement::Batch(inner));

    let error = suite.batch(outer).unwrap_err();
    assert!(matches!(error, RegistrationError::NotAnAssertion { .. }));
    assert_eq!(
        error.to_string(),
        "tests/batch.rs:7:1: batch \"outer\": a batch may only contain assertion declarations"
    );
    assert!(suite.units().is_empty());

    // the rejected batch drew no sequence numbers
    suite.prove(Some("outer"), shape("1", "==", "1", 1, 1), Location::caller())?;
    assert_eq!(names(suite.units()), ["outer 1 == 1 (1)"]);
    Ok(())
}

#[test]
fn invalid_assertion_rejects_the_whole_batch() {
    let mut suite = Suite::new("invalid");
    let batch = Batch::new("group", Location::caller())
        .prove(None, shape("1", "==", "1", 1, 1), Location::caller())
        .prove(None, Shape::unsupported("1 + 1"), Location::caller());
    let result = suite.batch(batch);
    assert!(matches!(result, Err(RegistrationError::Unsupported { .. })));
    assert!(suite.units().is_empty());
}

#[test]
fn trailing_setup_is_rejected() {
    let mut suite = Suite::new("trailing");
    let batch = Batch::new("group", Location::caller())
        .prove(None, shape("1", "==", "1", 1, 1), Location::caller())
        .setup(|| Ok(()));
    let result = suite.batch(batch);
    assert!(matches!(result, Err(RegistrationError::TrailingSetup { .. })));
    assert!(suite.units().is_empty());
}

#[test]
fn setups_run_before_each_following_assertion() -> Result<()> {
    let log = Arc::new(Mutex::new(Vec::<&'static str>::new()));
    let first_log = Arc::clone(&log);
    let second_log = Arc::clone(&log);

    let batch = Batch::new("fixtures", Location::caller())
        .prove(Some("before"), shape("1", "==", "1", 1, 1), Location::caller())
        .setup(move || {
            first_log.lock().map_err(|_| anyhow!("poisoned"))?.push("first");
            Ok(())
        })
        .prove(Some("middle"), shape("1", "==", "1", 1, 1), Location::caller())
        .setup(move || {
            second_log.lock().map_err(|_| anyhow!("poisoned"))?.push("second");
            Ok(())
        })
        .prove(Some("after"), shape("1", "==", "1", 1, 1), Location::caller());

    let mut suite = Suite::new("setups");
    suite.batch(batch)?;
    let units = suite.finish();

    let ran = |unit: &TestUnit| -> Result<Vec<&'static str>> {
        log.lock().map_err(|_| anyhow!("poisoned"))?.clear();
        unit.run()?;
        Ok(log.lock().map_err(|_| anyhow!("poisoned"))?.clone())
    };
    assert!(ran(&units[0])?.is_empty());
    assert_eq!(ran(&units[1])?, ["first"]);
    assert_eq!(ran(&units[2])?, ["first", "second"]);
    Ok(())
}

#[test]
fn setup_errors_propagate_unchanged() -> Result<()> {
    let batch = Batch::new("broken", Location::caller())
        .setup(|| Err(anyhow!("fixture missing")))
        .prove(None, shape("1", "==", "1", 1, 1), Location::caller());
    let mut suite = Suite::new("setup-error");
    suite.batch(batch)?;
    let error = suite.finish()[0].run().unwrap_err();
    assert_eq!(error.to_string(), "fixture missing");
    Ok(())
}

static COUNTER: AtomicI64 = AtomicI64::new(0);

fn bump() -> i64 {
    COUNTER.fetch_add(1, Ordering::SeqCst) + 1
}

#[test]
fn batch_macro_expands_statements_in_order() -> Result<()> {
    let mut suite = Suite::new("macro");
    let registered = batch!(suite, "one", {
        prove 2 > 1;
        prove "equal", 3 == 3;
        setup { COUNTER.store(10, Ordering::SeqCst); };
        prove bump() == 11;
        prove "text", "abc" =~ "b"
    })?;
    assert_eq!(registered.len(), 4);
    assert_eq!(registered[0], "one 2 > 1 (1)");
    assert_eq!(registered[1], "one equal 3 == 3 (1)");
    assert_eq!(registered[3], "one text \"abc\" =~ \"b\" (1)");

    for unit in suite.finish() {
        unit.run()?;
    }
    Ok(())
}

#[test]
fn batch_macro_rejects_nested_batches() {
    let mut suite = Suite::new("macro-nested");
    let result = batch!(suite, "outer", {
        prove 1 == 1;
        batch "inner" {
            prove 2 == 2;
        };
    });
    assert!(matches!(result, Err(RegistrationError::NotAnAssertion { .. })));
    assert!(suite.units().is_empty());
}

#[test]
fn batch_macro_and_prove_macro_agree_on_names() -> Result<()> {
    let mut batched = Suite::new("agree");
    batch!(batched, "outer", {
        prove "inner", 4 >= 4;
    })?;
    let mut standalone = Suite::new("agree");
    prove!(standalone, "outer inner", 4 >= 4)?;
    assert_eq!(names(batched.units()), names(standalone.units()));
    Ok(())
}
