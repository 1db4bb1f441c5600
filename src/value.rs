//! Value: a dynamically shaped key.
//!
//! Statically typed keys can never disagree about shape, so their
//! comparisons are infallible. `Value` is the escape hatch for callers
//! whose key shapes are only known at runtime; it is also where the two
//! failure modes of [`StructuralOrd`] actually occur: comparing values of
//! different shapes ([`OrderError::ShapeMismatch`]) and comparing a shape
//! with no ordering rule ([`OrderError::Unorderable`], e.g. `Set`).

use crate::order::{cmp_sequence, Complex, OrderError, Shape, StructuralOrd};
use core::cmp::Ordering;

/// A runtime-shaped value usable as a map key.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
    Complex(Complex),
    /// Fixed-arity ordered tuple. Tuples of differing arity are
    /// comparable via the prefix rule.
    Tuple(Vec<Value>),
    /// Homogeneous sequence; same ordering rule as `Tuple`.
    Seq(Vec<Value>),
    /// Named fields in declared order. Two records are the same shape
    /// only if their field names match pairwise.
    Record(Vec<(String, Value)>),
    /// A possibly-null reference. `Ref(None)` sorts below every present
    /// value; present references compare by the referenced value.
    Ref(Option<Box<Value>>),
    /// Unordered collection. Has no defined order; comparing it fails.
    Set(Vec<Value>),
}

impl Value {
    /// The structural kind of this value.
    pub fn shape(&self) -> Shape {
        match self {
            Value::Bool(_) => Shape::Bool,
            Value::Int(_) => Shape::Int,
            Value::UInt(_) => Shape::UInt,
            Value::Float(_) => Shape::Float,
            Value::Str(_) => Shape::Str,
            Value::Complex(_) => Shape::Complex,
            Value::Tuple(_) => Shape::Tuple,
            Value::Seq(_) => Shape::Seq,
            Value::Record(_) => Shape::Record,
            Value::Ref(_) => Shape::Ref,
            Value::Set(_) => Shape::Set,
        }
    }

    // Strip reference layers transitively; a chain ending in null is the
    // minimum element.
    fn target(&self) -> Option<&Value> {
        let mut v = self;
        loop {
            match v {
                Value::Ref(None) => return None,
                Value::Ref(Some(inner)) => v = inner,
                present => return Some(present),
            }
        }
    }
}

impl StructuralOrd for Value {
    fn structural_cmp(&self, other: &Self) -> Result<Ordering, OrderError> {
        match (self.target(), other.target()) {
            (None, None) => Ok(Ordering::Equal),
            (None, Some(_)) => Ok(Ordering::Less),
            (Some(_), None) => Ok(Ordering::Greater),
            (Some(a), Some(b)) => cmp_present(a, b),
        }
    }
}

fn cmp_present(a: &Value, b: &Value) -> Result<Ordering, OrderError> {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.structural_cmp(y),
        (Value::Int(x), Value::Int(y)) => x.structural_cmp(y),
        (Value::UInt(x), Value::UInt(y)) => x.structural_cmp(y),
        (Value::Float(x), Value::Float(y)) => x.structural_cmp(y),
        (Value::Str(x), Value::Str(y)) => x.structural_cmp(y),
        (Value::Complex(x), Value::Complex(y)) => x.structural_cmp(y),
        (Value::Tuple(x), Value::Tuple(y)) => cmp_sequence(x, y),
        (Value::Seq(x), Value::Seq(y)) => cmp_sequence(x, y),
        (Value::Record(x), Value::Record(y)) => cmp_records(x, y),
        // Any Set operand fails before shape matching is even considered.
        (Value::Set(_), _) | (_, Value::Set(_)) => Err(OrderError::Unorderable(Shape::Set)),
        _ => Err(OrderError::ShapeMismatch {
            left: a.shape(),
            right: b.shape(),
        }),
    }
}

fn cmp_records(a: &[(String, Value)], b: &[(String, Value)]) -> Result<Ordering, OrderError> {
    let same_fields =
        a.len() == b.len() && a.iter().zip(b.iter()).all(|((fa, _), (fb, _))| fa == fb);
    if !same_fields {
        return Err(OrderError::ShapeMismatch {
            left: Shape::Record,
            right: Shape::Record,
        });
    }
    for ((_, x), (_, y)) in a.iter().zip(b.iter()) {
        match x.structural_cmp(y)? {
            Ordering::Equal => {}
            unequal => return Ok(unequal),
        }
    }
    Ok(Ordering::Equal)
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}
impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}
impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::UInt(v)
    }
}
impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}
impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}
impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}
impl From<Complex> for Value {
    fn from(v: Complex) -> Self {
        Value::Complex(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tuple(items: Vec<Value>) -> Value {
        Value::Tuple(items)
    }

    fn reference(v: Value) -> Value {
        Value::Ref(Some(Box::new(v)))
    }

    #[test]
    fn same_shape_values_order_naturally() {
        assert_eq!(
            Value::Int(1).structural_cmp(&Value::Int(2)).unwrap(),
            Ordering::Less
        );
        assert_eq!(
            Value::from("abc").structural_cmp(&Value::from("abd")).unwrap(),
            Ordering::Less
        );
    }

    #[test]
    fn differing_shapes_fail_fast() {
        let err = Value::Int(1).structural_cmp(&Value::from("1")).unwrap_err();
        assert_eq!(
            err,
            OrderError::ShapeMismatch {
                left: Shape::Int,
                right: Shape::Str,
            }
        );
        // Int and UInt are distinct shapes, as are Tuple and Seq.
        assert!(Value::Int(1).structural_cmp(&Value::UInt(1)).is_err());
        assert!(Value::Tuple(vec![]).structural_cmp(&Value::Seq(vec![])).is_err());
    }

    #[test]
    fn sets_are_unorderable_even_against_themselves() {
        let s = Value::Set(vec![Value::Int(1)]);
        assert_eq!(
            s.structural_cmp(&s).unwrap_err(),
            OrderError::Unorderable(Shape::Set)
        );
        assert_eq!(
            s.structural_cmp(&Value::Int(1)).unwrap_err(),
            OrderError::Unorderable(Shape::Set)
        );
    }

    #[test]
    fn tuple_prefix_rule() {
        let short = tuple(vec![Value::Int(1), Value::Int(2)]);
        let long = tuple(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        assert_eq!(short.structural_cmp(&long).unwrap(), Ordering::Less);
        assert_eq!(long.structural_cmp(&short).unwrap(), Ordering::Greater);
        assert_eq!(short.structural_cmp(&short).unwrap(), Ordering::Equal);
    }

    #[test]
    fn references_dereference_transitively() {
        let two_deep = reference(reference(Value::Int(5)));
        assert_eq!(
            two_deep.structural_cmp(&Value::Int(7)).unwrap(),
            Ordering::Less
        );
        assert_eq!(
            two_deep.structural_cmp(&reference(Value::Int(5))).unwrap(),
            Ordering::Equal
        );
    }

    #[test]
    fn null_reference_is_minimum() {
        let null = Value::Ref(None);
        assert_eq!(null.structural_cmp(&null).unwrap(), Ordering::Equal);
        assert_eq!(
            null.structural_cmp(&Value::Int(i64::MIN)).unwrap(),
            Ordering::Less
        );
        // Even against a chain that bottoms out in null.
        let deep_null = reference(Value::Ref(None));
        assert_eq!(null.structural_cmp(&deep_null).unwrap(), Ordering::Equal);
    }

    #[test]
    fn records_compare_field_by_field() {
        let a = Value::Record(vec![
            ("x".into(), Value::Int(1)),
            ("y".into(), Value::Int(2)),
        ]);
        let b = Value::Record(vec![
            ("x".into(), Value::Int(1)),
            ("y".into(), Value::Int(3)),
        ]);
        assert_eq!(a.structural_cmp(&b).unwrap(), Ordering::Less);
    }

    #[test]
    fn records_with_different_fields_are_different_shapes() {
        let a = Value::Record(vec![("x".into(), Value::Int(1))]);
        let b = Value::Record(vec![("z".into(), Value::Int(1))]);
        assert!(matches!(
            a.structural_cmp(&b),
            Err(OrderError::ShapeMismatch { .. })
        ));
        let wider = Value::Record(vec![
            ("x".into(), Value::Int(1)),
            ("y".into(), Value::Int(2)),
        ]);
        assert!(a.structural_cmp(&wider).is_err());
    }

    #[test]
    fn errors_propagate_out_of_nested_shapes() {
        let a = tuple(vec![Value::Int(1), Value::Int(2)]);
        let b = tuple(vec![Value::Int(1), Value::from("2")]);
        assert!(matches!(
            a.structural_cmp(&b),
            Err(OrderError::ShapeMismatch { .. })
        ));
    }
}
