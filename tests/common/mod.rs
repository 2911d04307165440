//! Shared helpers for building documents and replaying updates

#![allow(dead_code)]

use partial_persistence::{PartialPersistence, PersistenceConfig, Value, Version};

/// Parse a document literal such as `[1, [2, 3]]`.
pub fn doc(text: &str) -> Value<i64> {
    text.parse().expect("valid document literal")
}

/// Wrap `text` with a given rebalance threshold.
pub fn wrap_with(text: &str, max_deltas: usize) -> PartialPersistence<i64> {
    let config = PersistenceConfig::with_max_deltas(max_deltas).expect("valid max_deltas");
    PartialPersistence::wrap_with_config(doc(text), config)
}

/// Reference model: overwrite `model[path][index]` with `value`.
pub fn model_set(model: &mut Value<i64>, path: &[usize], index: usize, value: Value<i64>) {
    let mut current = model;
    for &step in path {
        current = match current {
            Value::List(items) => &mut items[step],
            Value::Scalar(_) => panic!("model path descends into a scalar"),
        };
    }
    match current {
        Value::List(items) => items[index] = value,
        Value::Scalar(_) => panic!("model target is a scalar"),
    }
}

/// Assert that every version still reads back as recorded in `history`.
pub fn assert_history(persistence: &PartialPersistence<i64>, history: &[Value<i64>]) {
    assert_eq!(
        persistence.now() as usize + 1,
        history.len(),
        "history length should match version count"
    );
    for (version, expected) in history.iter().enumerate() {
        let actual = persistence
            .unwrap(version as Version)
            .expect("recorded version is readable");
        assert_eq!(&actual, expected, "version {} diverged", version);
    }
}

/// Build `[[[...[0]...]]]` with `depth` lists around the scalar.
pub fn nested(depth: usize) -> String {
    format!("{}0{}", "[".repeat(depth), "]".repeat(depth))
}
