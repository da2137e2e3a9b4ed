//! Binary type coercion, equality and ordering.
//!
//! Before two operands are compared they are brought to a common type:
//! strings meet numbers as numbers, and null/bool always turn into numbers
//! first and then get coerced again against the other side. Arrays and
//! objects never coerce.

use crate::number::to_number;
use crate::result::EvaluationResult;
use crate::value::Value;
use actexpr_types::TypeTag;
use std::cmp::Ordering;

/// Coerce two operands towards a common type.
///
/// Each returned result carries its (possibly new) type tag. Operands whose
/// types cannot be reconciled come back unchanged.
pub fn coerce_types(
    left: &EvaluationResult,
    right: &EvaluationResult,
) -> (EvaluationResult, EvaluationResult) {
    let lt = left.value().classify().tag();
    let rt = right.value().classify().tag();

    match (lt, rt) {
        _ if lt == rt => (left.clone(), right.clone()),
        (TypeTag::Number, TypeTag::String) => (left.clone(), numeric(right)),
        (TypeTag::String, TypeTag::Number) => (numeric(left), right.clone()),
        (TypeTag::Null | TypeTag::Bool, _) => coerce_types(&numeric(left), right),
        (_, TypeTag::Null | TypeTag::Bool) => coerce_types(left, &numeric(right)),
        _ => (left.clone(), right.clone()),
    }
}

fn numeric(result: &EvaluationResult) -> EvaluationResult {
    EvaluationResult::number(to_number(result.value()))
}

/// Expression `==`.
///
/// Numbers: NaN equals nothing. Strings: case-insensitive. Arrays and
/// objects: same allocation only, never structural.
pub fn equals(left: &EvaluationResult, right: &EvaluationResult) -> bool {
    let (l, r) = coerce_types(left, right);
    match (l.value(), r.value()) {
        (Value::Null, Value::Null) => true,
        (Value::Number(a), Value::Number(b)) => !a.is_nan() && !b.is_nan() && a == b,
        (Value::String(a), Value::String(b)) => eq_ignore_case(a, b),
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Array(_), Value::Array(_)) | (Value::Object(_), Value::Object(_)) => {
            l.value().same_identity(r.value())
        }
        _ => false,
    }
}

/// Expression `>`. Only number and string pairs are ordered.
pub fn greater_than(left: &EvaluationResult, right: &EvaluationResult) -> bool {
    compare(left, right) == Some(Ordering::Greater)
}

/// Expression `<`. Only number and string pairs are ordered.
pub fn less_than(left: &EvaluationResult, right: &EvaluationResult) -> bool {
    compare(left, right) == Some(Ordering::Less)
}

/// Expression `>=`: `==` or `>`.
pub fn greater_or_equal(left: &EvaluationResult, right: &EvaluationResult) -> bool {
    equals(left, right) || greater_than(left, right)
}

/// Expression `<=`: `==` or `<`.
pub fn less_or_equal(left: &EvaluationResult, right: &EvaluationResult) -> bool {
    equals(left, right) || less_than(left, right)
}

/// Ordering of the coerced operands; `None` when they are unordered
/// (NaN, mismatched or non-orderable types).
fn compare(left: &EvaluationResult, right: &EvaluationResult) -> Option<Ordering> {
    let (l, r) = coerce_types(left, right);
    match (l.value(), r.value()) {
        (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
        (Value::String(a), Value::String(b)) => Some(cmp_ignore_case(a, b)),
        _ => None,
    }
}

/// Case-insensitive string equality.
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    cmp_ignore_case(a, b) == Ordering::Equal
}

/// Case-insensitive ordinal comparison.
pub fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actexpr_types::ExprType;
    use proptest::prelude::*;

    fn num(n: f64) -> EvaluationResult {
        EvaluationResult::number(n)
    }

    fn s(v: &str) -> EvaluationResult {
        EvaluationResult::string(v)
    }

    fn b(v: bool) -> EvaluationResult {
        EvaluationResult::bool(v)
    }

    fn arr(items: Vec<Value>) -> EvaluationResult {
        EvaluationResult::new(Value::array(items))
    }

    /// Coerce and return the two resulting values with their type tags.
    fn coerced(l: EvaluationResult, r: EvaluationResult) -> (Value, TypeTag, Value, TypeTag) {
        let (l, r) = coerce_types(&l, &r);
        (
            l.value().clone(),
            l.ty().tag(),
            r.value().clone(),
            r.ty().tag(),
        )
    }

    #[test]
    fn test_coerce_number_bool() {
        assert_eq!(
            coerced(num(1.0), b(true)),
            (Value::Number(1.0), TypeTag::Number, Value::Number(1.0), TypeTag::Number)
        );
        assert_eq!(
            coerced(num(1.0), b(false)),
            (Value::Number(1.0), TypeTag::Number, Value::Number(0.0), TypeTag::Number)
        );
        assert_eq!(
            coerced(b(false), num(1.0)),
            (Value::Number(0.0), TypeTag::Number, Value::Number(1.0), TypeTag::Number)
        );
    }

    #[test]
    fn test_coerce_same_kind_unchanged() {
        assert_eq!(
            coerced(num(1.0), num(2.0)),
            (Value::Number(1.0), TypeTag::Number, Value::Number(2.0), TypeTag::Number)
        );
        assert_eq!(
            coerced(s("a"), s("b")),
            (Value::from("a"), TypeTag::String, Value::from("b"), TypeTag::String)
        );
        assert_eq!(
            coerced(b(false), b(true)),
            (Value::Bool(false), TypeTag::Bool, Value::Bool(true), TypeTag::Bool)
        );
    }

    #[test]
    fn test_coerce_string_number() {
        let (l, lt, r, rt) = coerced(s("a"), num(1.0));
        assert!(matches!(l, Value::Number(n) if n.is_nan()));
        assert_eq!((lt, r, rt), (TypeTag::Number, Value::Number(1.0), TypeTag::Number));

        let (l, lt, r, rt) = coerced(num(1.0), s("a"));
        assert_eq!((l, lt, rt), (Value::Number(1.0), TypeTag::Number, TypeTag::Number));
        assert!(matches!(r, Value::Number(n) if n.is_nan()));
    }

    #[test]
    fn test_coerce_bool_string_goes_through_number() {
        assert_eq!(
            coerced(b(true), s("1")),
            (Value::Number(1.0), TypeTag::Number, Value::Number(1.0), TypeTag::Number)
        );
        assert_eq!(
            coerced(EvaluationResult::null(), s("")),
            (Value::Number(0.0), TypeTag::Number, Value::Number(0.0), TypeTag::Number)
        );
    }

    #[test]
    fn test_coerce_structural_unchanged() {
        let a = arr(vec![]);
        let (l, lt, r, rt) = coerced(a.clone(), s("x"));
        assert_eq!((lt, rt), (TypeTag::Array, TypeTag::String));
        assert!(l.same_identity(a.value()));
        assert_eq!(r, Value::from("x"));

        // null against an array: null becomes 0, the array stays put
        let (_, lt, _, rt) = coerced(EvaluationResult::null(), a);
        assert_eq!((lt, rt), (TypeTag::Number, TypeTag::Array));
    }

    #[test]
    fn test_coerce_keeps_precise_type() {
        let typed = EvaluationResult::typed(
            Value::array(vec![Value::Number(1.0)]),
            ExprType::array(ExprType::Number),
        )
        .unwrap();
        let (l, _) = coerce_types(&typed, &s("x"));
        assert_eq!(l.ty(), &ExprType::array(ExprType::Number));
    }

    #[test]
    fn test_equals_strings_ignore_case() {
        assert!(equals(&s("TEST"), &s("test")));
        assert!(!equals(&s("test"), &s("test2")));
    }

    #[test]
    fn test_equals_number_string_both_ways() {
        assert!(equals(&num(2.0), &s("2")));
        assert!(equals(&s("2"), &num(2.0)));
        assert!(equals(&s(" 0x10 "), &num(16.0)));
        assert!(!equals(&s("abc"), &num(0.0)));
    }

    #[test]
    fn test_equals_bool_number() {
        assert!(equals(&b(true), &num(1.0)));
        assert!(equals(&b(false), &num(0.0)));
        assert!(!equals(&b(true), &num(2.0)));
        assert!(equals(&num(1.0), &b(true)));
    }

    #[test]
    fn test_equals_null() {
        assert!(equals(&EvaluationResult::null(), &EvaluationResult::null()));
        assert!(equals(&EvaluationResult::null(), &num(0.0)));
        assert!(equals(&EvaluationResult::null(), &b(false)));
        assert!(equals(&EvaluationResult::null(), &s("")));
        assert!(!equals(&EvaluationResult::null(), &s("null")));
    }

    #[test]
    fn test_equals_nan_never_equal() {
        assert!(!equals(&num(f64::NAN), &num(f64::NAN)));
        assert!(!equals(&s("abc"), &num(f64::NAN)));
    }

    #[test]
    fn test_equals_arrays_by_identity() {
        let a = arr(vec![Value::Number(1.0), Value::Number(2.0)]);
        let other = arr(vec![Value::Number(1.0), Value::Number(2.0)]);
        assert!(!equals(&a, &other));
        assert!(equals(&a, &a.clone()));
    }

    #[test]
    fn test_equals_objects_by_identity() {
        let o = EvaluationResult::new(Value::object(Default::default()));
        let other = EvaluationResult::new(Value::object(Default::default()));
        assert!(equals(&o, &o.clone()));
        assert!(!equals(&o, &other));
        assert!(!equals(&o, &arr(vec![])));
    }

    #[test]
    fn test_ordering_numbers() {
        assert!(greater_than(&num(14.0), &num(12.0)));
        assert!(!greater_than(&num(12.0), &num(14.0)));
        assert!(less_than(&num(12.0), &num(14.0)));
        assert!(greater_or_equal(&num(12.0), &num(12.0)));
        assert!(less_or_equal(&num(12.0), &num(12.0)));
        assert!(!less_or_equal(&num(13.0), &num(12.0)));
    }

    #[test]
    fn test_ordering_mixed() {
        assert!(greater_than(&s("10"), &num(9.0)));
        assert!(less_than(&b(false), &num(1.0)));
        assert!(greater_than(&b(true), &EvaluationResult::null()));
    }

    #[test]
    fn test_ordering_strings_ignore_case() {
        assert!(less_than(&s("apple"), &s("Banana")));
        assert!(greater_than(&s("b"), &s("A")));
        assert!(greater_or_equal(&s("ABC"), &s("abc")));
        assert!(!greater_than(&s("ABC"), &s("abc")));
    }

    #[test]
    fn test_ordering_nan_and_structural() {
        assert!(!greater_than(&num(f64::NAN), &num(1.0)));
        assert!(!less_than(&num(f64::NAN), &num(1.0)));
        assert!(!greater_or_equal(&s("x"), &num(1.0)));
        let a = arr(vec![]);
        assert!(!greater_than(&a, &a));
        assert!(!less_than(&a, &num(1.0)));
        // identity equality still satisfies >=
        assert!(greater_or_equal(&a, &a));
    }

    fn primitive() -> impl Strategy<Value = EvaluationResult> {
        prop_oneof![
            Just(EvaluationResult::null()),
            any::<bool>().prop_map(EvaluationResult::bool),
            (-1000i32..1000).prop_map(|i| EvaluationResult::number(f64::from(i))),
            "[a-cA-C0-9 ]{0,4}".prop_map(EvaluationResult::string),
        ]
    }

    proptest! {
        #[test]
        fn prop_equals_is_symmetric(l in primitive(), r in primitive()) {
            prop_assert_eq!(equals(&l, &r), equals(&r, &l));
        }

        #[test]
        fn prop_greater_mirrors_less(l in primitive(), r in primitive()) {
            prop_assert_eq!(greater_than(&l, &r), less_than(&r, &l));
        }
    }
}
