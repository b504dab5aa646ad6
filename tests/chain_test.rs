//! Integration tests for the validation chain.

use attest::{names, ChainError, Generator, Options, Outcome, PropertyBag, TypeTag, Value};
use chrono::Utc;
use serde_json::json;

fn generator(options: Options) -> Generator {
    Generator::configure(options.with_environment("test")).unwrap()
}

/// The data set most tests run against, spread over three bags.
fn fixture(generator: &Generator) -> attest::Chain {
    generator
        .init_json([
            json!({
                "number1": 5,
                "string1": "str1",
                "object1": {"val1": 1, "innerObj": {"val2": 2}},
                "array1": ["a", 3],
                "nullValue": null
            }),
            json!({"number2": 6, "string2": "str2", "array2": ["b", 9999]}),
            json!({"number3": 7, "string3": "str3", "array3": [{}, "c", 1, 5]}),
        ])
        .unwrap()
}

fn inner_code(outcome: &Outcome) -> i64 {
    outcome.first()["innerCode"].as_i64().unwrap()
}

#[test]
fn test_less_than_out_of_range_scenario() -> Result<(), ChainError> {
    let generator = generator(Options::new());
    let mut chain = generator.init([PropertyBag::new().with("n", 5)]);

    chain.add("n")?.less_than(3)?;

    let outcome = chain.finalize().unwrap();
    assert_eq!(inner_code(&outcome), 5);
    Ok(())
}

#[test]
fn test_has_type_incorrect_type_scenario() -> Result<(), ChainError> {
    let generator = generator(Options::new());
    let mut chain = generator.init([PropertyBag::new().with("s", "ab")]);

    chain.add("s")?.has_type(TypeTag::Number)?;

    let outcome = chain.finalize().unwrap();
    assert_eq!(inner_code(&outcome), 4);
    assert_eq!(
        outcome.first()["message"],
        json!("Property s with value ab has type String, not Number")
    );
    Ok(())
}

#[test]
fn test_object_is_not_ordered_scenario() -> Result<(), ChainError> {
    let generator = generator(Options::new());
    let mut chain = generator.init_json([json!({"o": {"a": 1}})])?;

    chain.add("o")?.less_than(3)?;

    let outcome = chain.finalize().unwrap();
    assert_eq!(inner_code(&outcome), 3);
    Ok(())
}

#[test]
fn test_return_all_errors_scenario() -> Result<(), ChainError> {
    let generator = generator(Options::new().with_return_all_errors(true));
    let mut chain = fixture(&generator);

    chain.add("string1")?.has_type(TypeTag::Number)?;
    chain.add("number1")?.less_than(3)?;

    match chain.finalize().unwrap() {
        Outcome::All(errors) => {
            assert_eq!(errors.len(), 2);
            assert_eq!(errors[0]["innerCode"], json!(4));
            assert_eq!(errors[1]["innerCode"], json!(5));
        }
        Outcome::First(_) => panic!("Expected all errors"),
    }
    Ok(())
}

#[test]
fn test_deep_equal_distinct_instance_scenario() -> Result<(), ChainError> {
    let generator = generator(Options::new());
    let mut chain = generator.init_json([json!({"x": {"a": 1}})])?;

    chain.add("x")?.equals(Value::from(json!({"a": 1})))?;

    assert!(chain.finalize().is_none());
    Ok(())
}

#[test]
fn test_add_without_checks_is_clean_unless_nan() -> Result<(), ChainError> {
    let generator = generator(Options::new());
    let mut chain = generator.init([PropertyBag::new()
        .with("number", 5)
        .with("nothing", Value::Null)
        .with("nan", f64::NAN)]);

    for name in ["number", "nothing", "missing"] {
        chain.add(name)?;
        assert!(chain.finalize().is_none(), "{}", name);
    }

    chain.add("nan")?;
    let outcome = chain.finalize().unwrap();
    assert_eq!(inner_code(&outcome), 3);
    assert_eq!(outcome.first()["message"], json!("Property nan is NaN"));
    Ok(())
}

#[test]
fn test_chain_reuse_matches_fresh_chain() -> Result<(), ChainError> {
    let generator = generator(Options::new().with_return_all_errors(true));

    let run = |chain: &mut attest::Chain| -> Result<Option<Outcome>, ChainError> {
        chain.add("number1")?.in_range(10, 100)?.has_type(TypeTag::String)?;
        chain.add("string1")?.exists()?.has_type(TypeTag::String)?;
        Ok(chain.finalize())
    };

    let mut reused = fixture(&generator);
    let first = run(&mut reused)?;
    let second = run(&mut reused)?;
    let fresh = run(&mut fixture(&generator))?;

    assert!(first.is_some());
    assert_eq!(first, second);
    assert_eq!(second, fresh);
    Ok(())
}

#[test]
fn test_first_error_is_the_most_specific() -> Result<(), ChainError> {
    let generator = generator(Options::new());
    let mut chain = fixture(&generator);

    chain.add("number1")?.equals(6)?;
    chain.add("missing")?.exists()?;

    let outcome = chain.finalize().unwrap();
    assert_eq!(outcome.first()["priority"], json!(1));
    assert_eq!(inner_code(&outcome), 1);
    Ok(())
}

#[test]
fn test_errors_sorted_within_property_not_across() -> Result<(), ChainError> {
    let generator = generator(Options::new().with_return_all_errors(true));
    let mut chain = fixture(&generator);

    chain.add("number1")?.custom("nope", |_| false)?.equals(6)?;
    chain.add("missing")?.exists()?;

    let outcome = chain.finalize().unwrap();
    let codes: Vec<_> = outcome.errors().iter().map(|e| e["innerCode"].clone()).collect();
    assert_eq!(codes, vec![json!(6), json!(7), json!(1)]);
    Ok(())
}

#[test]
fn test_same_property_same_error_collapses() -> Result<(), ChainError> {
    let generator = generator(Options::new().with_return_all_errors(true));
    let mut chain = fixture(&generator);

    chain.add("number1")?.less_than(4)?;
    chain.add("number1")?.less_than(3)?;
    chain.add("number2")?.less_than(3)?;

    let outcome = chain.finalize().unwrap();
    assert_eq!(outcome.len(), 2);
    assert_eq!(
        outcome.errors()[0]["message"],
        json!("Property of type Number number1 has value 5 instead of <= 4")
    );
    Ok(())
}

#[test]
fn test_type_checks_over_fixture() -> Result<(), ChainError> {
    let generator = generator(Options::new());
    let mut chain = fixture(&generator);

    chain.add("number1")?.has_type(TypeTag::Number)?;
    chain.add("string1")?.has_type(TypeTag::String)?;
    chain.add("object1")?.has_type(TypeTag::Object)?;
    chain.add("array1")?.has_type(TypeTag::Array)?;
    chain.add("nullValue")?.has_type(TypeTag::Null)?;
    chain.add("missing")?.has_type(TypeTag::Undefined)?;
    assert!(chain.finalize().is_none());

    chain.add("number1")?.has_type("String".parse()?)?;
    assert_eq!(inner_code(&chain.finalize().unwrap()), 4);
    Ok(())
}

#[test]
fn test_dates_and_functions() -> Result<(), ChainError> {
    let generator = generator(Options::new());
    let callback = attest::Function::new(|_| Value::Null);
    let mut chain = generator.init([PropertyBag::new()
        .with("when", Utc::now())
        .with("callback", callback.clone())]);

    chain.add("when")?.exists()?.has_type(TypeTag::Date)?;
    chain.add("callback")?.exists()?.has_type(TypeTag::Function)?.equals(callback)?;
    assert!(chain.finalize().is_none());

    chain.add("when")?.greater_than(1)?;
    assert_eq!(inner_code(&chain.finalize().unwrap()), 3);
    Ok(())
}

#[test]
fn test_later_bags_override_earlier_ones() -> Result<(), ChainError> {
    let generator = generator(Options::new());
    let mut chain = generator.init([
        PropertyBag::new().with("age", "unknown"),
        PropertyBag::new().with("age", 30),
    ]);

    chain.add("age")?.has_type(TypeTag::Number)?.in_range(18, 65)?;
    assert!(chain.finalize().is_none());
    Ok(())
}

#[test]
fn test_misuse_is_reported_immediately() {
    let generator = generator(Options::new());
    let mut chain = fixture(&generator);

    assert_eq!(chain.add("").unwrap_err(), ChainError::EmptyPropertyName);
    assert_eq!(
        chain.has_type(TypeTag::Number).unwrap_err(),
        ChainError::NoPropertySelected("has_type")
    );

    chain.add("number1").unwrap();
    assert_eq!(
        chain.record("NOT_A_REAL_ERROR", None).unwrap_err(),
        ChainError::NoSuchErrorType("NOT_A_REAL_ERROR".into())
    );

    let _ = chain.finalize();
    assert_eq!(
        chain.exists().unwrap_err(),
        ChainError::NoPropertySelected("exists")
    );
}

#[test]
fn test_conclude_returns_every_violation() -> Result<(), ChainError> {
    let generator = generator(Options::new());
    let mut chain = fixture(&generator);

    chain.add("string1")?.less_than(2)?.equals("str2")?;
    chain.add("number3")?.greater_than(10)?;

    let violations = chain.conclude().into_result().unwrap_err();
    assert_eq!(violations.len(), 3);
    assert_eq!(violations.for_property("string1").len(), 2);
    assert_eq!(violations.with_name(names::OUT_OF_RANGE).len(), 2);

    assert!(chain.conclude().is_success());
    Ok(())
}

#[test]
fn test_projected_fields_follow_requested_order() -> Result<(), ChainError> {
    let generator = generator(Options::new().with_error_fields(["status", "name", "innerCode"]));
    let mut chain = generator.init([PropertyBag::new().with("n", 5)]);

    chain.add("n")?.less_than(3)?;

    let outcome = chain.finalize().unwrap();
    let keys: Vec<_> = outcome.first().keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["status", "name", "innerCode"]);
    assert_eq!(
        serde_json::to_string(&outcome.into_json()).unwrap(),
        r#"{"status":401,"name":"OUT_OF_RANGE","innerCode":5}"#
    );
    Ok(())
}

#[test]
fn test_default_projection_order() -> Result<(), ChainError> {
    let generator = generator(Options::new());
    let mut chain = generator.init([PropertyBag::new().with("s", "ab")]);

    chain.add("s")?.equals("ba")?;

    let outcome = chain.finalize().unwrap();
    let keys: Vec<_> = outcome.first().keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["priority", "status", "innerCode", "message"]);
    Ok(())
}
