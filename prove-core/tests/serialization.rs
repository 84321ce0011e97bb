use anyhow::Result;
use prove_core::{Location, Operator, Pattern, ProveFailure, Value};
use serde_json::json;

#[test]
fn values_are_tagged_by_kind() -> Result<()> {
    assert_eq!(serde_json::to_value(Value::Nil)?, json!({ "kind": "nil" }));
    assert_eq!(serde_json::to_value(Value::Int(3))?, json!({ "kind": "int", "value": 3 }));
    assert_eq!(
        serde_json::to_value(Value::atom("pos"))?,
        json!({ "kind": "atom", "value": "pos" })
    );
    assert_eq!(
        serde_json::to_value(Value::from(Pattern::new("^a+$")?))?,
        json!({ "kind": "pattern", "value": "^a+$" })
    );
    assert_eq!(
        serde_json::to_value(Value::from((1, "b")))?,
        json!({
            "kind": "tuple",
            "value": [
                { "kind": "int", "value": 1 },
                { "kind": "string", "value": "b" },
            ],
        })
    );
    Ok(())
}

#[test]
fn failures_carry_operator_token_and_operands() -> Result<()> {
    let failure = ProveFailure {
        operator: Operator::StrictNe,
        left: Value::Float(1.5),
        right: Value::from(vec![true]),
    };
    assert_eq!(
        serde_json::to_value(&failure)?,
        json!({
            "operator": "!==",
            "left": { "kind": "float", "value": 1.5 },
            "right": { "kind": "list", "value": [{ "kind": "bool", "value": true }] },
        })
    );
    Ok(())
}

#[test]
fn locations_serialize_as_plain_fields() -> Result<()> {
    let location = Location::new("tests/math.rs", 12, 5);
    assert_eq!(
        serde_json::to_value(&location)?,
        json!({ "file": "tests/math.rs", "line": 12, "column": 5 })
    );
    Ok(())
}
