//! Error reporting through the public surface

mod common;

use common::*;
use partial_persistence::{
    DescentFailure, ParseValueError, PartialPersistence, PersistenceConfig, PersistenceError,
    Value,
};
use test_case::test_case;

#[test_case(&[5], 0, 0, 5, DescentFailure::OutOfRange { len: 3 }; "first step past end")]
#[test_case(&[0, 0], 0, 1, 0, DescentFailure::NotAContainer; "step into scalar")]
#[test_case(&[1], 2, 1, 2, DescentFailure::OutOfRange { len: 2 }; "final index past end")]
#[test_case(&[0], 0, 1, 0, DescentFailure::NotAContainer; "target is scalar")]
#[test_case(&[2, 0, 0], 0, 2, 0, DescentFailure::OutOfRange { len: 0 }; "empty list")]
fn test_bad_paths_are_rejected(
    path: &[usize],
    index: usize,
    depth: usize,
    failing: usize,
    reason: DescentFailure,
) {
    let mut persistence = wrap_with("[1, [2, 3], [[]]]", 4);
    let err = persistence
        .set(path, index, Value::Scalar(0))
        .expect_err("path should not resolve");

    assert_eq!(
        err,
        PersistenceError::PathDescent {
            depth,
            index: failing,
            reason,
        }
    );
    assert_eq!(persistence.now(), 0);
    assert_eq!(persistence.unwrap_current(), doc("[1, [2, 3], [[]]]"));
}

#[test]
fn test_bad_path_after_history() {
    let mut persistence = wrap_with("[[1], 2]", 2);
    persistence.set(&[], 0, Value::Scalar(7)).unwrap();

    // [0] was a list at version 0 but is a scalar now.
    assert!(persistence.set(&[0], 0, Value::Scalar(1)).is_err());
    assert_eq!(persistence.snapshot(0).unwrap().get(&[0, 0]), Ok(Value::Scalar(1)));
    assert_eq!(
        persistence.snapshot(1).unwrap().get(&[0, 0]),
        Err(PersistenceError::PathDescent {
            depth: 1,
            index: 0,
            reason: DescentFailure::NotAContainer,
        })
    );
}

#[test]
fn test_versions_beyond_now() {
    let mut persistence = wrap_with("[0]", 4);
    persistence.set(&[], 0, Value::Scalar(1)).unwrap();

    assert!(persistence.unwrap(1).is_ok());
    let err = persistence.unwrap(2).unwrap_err();
    assert_eq!(err, PersistenceError::TimeRange { requested: 2, now: 1 });
    assert!(err.to_string().contains("0..=1"));
    assert!(persistence.snapshot(u64::MAX).is_err());
}

#[test]
fn test_zero_max_deltas_is_rejected() {
    let err = PersistenceConfig::with_max_deltas(0).unwrap_err();
    assert!(matches!(err, PersistenceError::InvalidConfiguration(_)));
    assert_eq!(
        err.to_string(),
        "invalid persistence configuration: max deltas must be > 0"
    );
}

#[test]
fn test_scalar_document_has_no_slots() {
    let mut persistence = PartialPersistence::wrap(Value::Scalar(3_i64));
    assert_eq!(
        persistence.set(&[], 0, Value::Scalar(4)),
        Err(PersistenceError::PathDescent {
            depth: 0,
            index: 0,
            reason: DescentFailure::NotAContainer,
        })
    );
}

#[test_case("[1, 2"; "unterminated")]
#[test_case("[1,, 2]"; "doubled comma")]
#[test_case("[x]"; "non numeric")]
#[test_case("[1] 2"; "trailing input")]
fn test_bad_literals(text: &str) {
    let parsed: Result<Value<i64>, ParseValueError> = text.parse();
    assert!(parsed.is_err(), "{:?} should not parse", text);
}
