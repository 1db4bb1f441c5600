//! StructuralOrd: a total order derived from the structure of a key.
//!
//! Every comparison returns `Result<Ordering, OrderError>`. For the
//! statically-shaped impls in this module the error arm is unreachable
//! (two values of the same Rust type always share a shape); it exists so
//! the dynamically-shaped [`crate::Value`] path can surface shape
//! mismatches as ordinary errors instead of panics, and so composite
//! impls can propagate them with `?`.

use core::cmp::Ordering;
use core::fmt;

/// The structural kind of a key, used in error reports.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Shape {
    Bool,
    Int,
    UInt,
    Float,
    Str,
    Complex,
    Tuple,
    Seq,
    Record,
    Ref,
    Set,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Shape::Bool => "bool",
            Shape::Int => "int",
            Shape::UInt => "uint",
            Shape::Float => "float",
            Shape::Str => "str",
            Shape::Complex => "complex",
            Shape::Tuple => "tuple",
            Shape::Seq => "seq",
            Shape::Record => "record",
            Shape::Ref => "ref",
            Shape::Set => "set",
        };
        f.write_str(name)
    }
}

/// Why two keys could not be ordered.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum OrderError {
    /// The two operands are not of the same structural shape.
    ShapeMismatch { left: Shape, right: Shape },
    /// The operand shape has no defined ordering rule.
    Unorderable(Shape),
}

impl fmt::Display for OrderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderError::ShapeMismatch { left, right } => {
                write!(f, "cannot order values of differing shapes: {left} vs {right}")
            }
            OrderError::Unorderable(shape) => {
                write!(f, "shape {shape} has no defined ordering")
            }
        }
    }
}

impl std::error::Error for OrderError {}

/// A total order computed from a value's structure, with no caller-supplied
/// comparator.
///
/// Laws (required of every impl, property-tested in this crate): for
/// same-shape `a`, `b`, `c`, exactly one of `a < b`, `a == b`, `a > b`
/// holds, and `a < b && b < c` implies `a < c`.
pub trait StructuralOrd {
    fn structural_cmp(&self, other: &Self) -> Result<Ordering, OrderError>;

    fn structural_eq(&self, other: &Self) -> Result<bool, OrderError> {
        Ok(self.structural_cmp(other)? == Ordering::Equal)
    }
}

// Primitives with a natural total order: bool (false < true), integers of
// every width, chars, and text by code unit.
macro_rules! natural_order_impl {
    ($($t:ty),* $(,)?) => {$(
        impl StructuralOrd for $t {
            #[inline]
            fn structural_cmp(&self, other: &Self) -> Result<Ordering, OrderError> {
                Ok(Ord::cmp(self, other))
            }
        }
    )*};
}

natural_order_impl!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, str, String
);

// Floats use the IEEE total order so the order laws hold even for NaN.
impl StructuralOrd for f32 {
    #[inline]
    fn structural_cmp(&self, other: &Self) -> Result<Ordering, OrderError> {
        Ok(self.total_cmp(other))
    }
}

impl StructuralOrd for f64 {
    #[inline]
    fn structural_cmp(&self, other: &Self) -> Result<Ordering, OrderError> {
        Ok(self.total_cmp(other))
    }
}

/// A complex number ordered by real part, then imaginary part on ties.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }
}

impl StructuralOrd for Complex {
    fn structural_cmp(&self, other: &Self) -> Result<Ordering, OrderError> {
        Ok(self
            .re
            .total_cmp(&other.re)
            .then(self.im.total_cmp(&other.im)))
    }
}

// Fixed-arity tuples compare lexicographically, element by element. Two
// static tuples always have the same arity (arity is part of the type);
// the cross-arity prefix rule lives in the sequence impls and in
// `Value::Tuple`.
macro_rules! tuple_impl {
    ($($name:ident : $idx:tt),+) => {
        impl<$($name: StructuralOrd),+> StructuralOrd for ($($name,)+) {
            fn structural_cmp(&self, other: &Self) -> Result<Ordering, OrderError> {
                $(
                    match self.$idx.structural_cmp(&other.$idx)? {
                        Ordering::Equal => {}
                        unequal => return Ok(unequal),
                    }
                )+
                Ok(Ordering::Equal)
            }
        }
    };
}

tuple_impl!(A:0);
tuple_impl!(A:0, B:1);
tuple_impl!(A:0, B:1, C:2);
tuple_impl!(A:0, B:1, C:2, D:3);
tuple_impl!(A:0, B:1, C:2, D:3, E:4);
tuple_impl!(A:0, B:1, C:2, D:3, E:4, F:5);
tuple_impl!(A:0, B:1, C:2, D:3, E:4, F:5, G:6);
tuple_impl!(A:0, B:1, C:2, D:3, E:4, F:5, G:6, H:7);
tuple_impl!(A:0, B:1, C:2, D:3, E:4, F:5, G:6, H:7, I:8);
tuple_impl!(A:0, B:1, C:2, D:3, E:4, F:5, G:6, H:7, I:8, J:9);
tuple_impl!(A:0, B:1, C:2, D:3, E:4, F:5, G:6, H:7, I:8, J:9, K:10);
tuple_impl!(A:0, B:1, C:2, D:3, E:4, F:5, G:6, H:7, I:8, J:9, K:10, L:11);

/// Lexicographic sequence comparison with the prefix rule: when one side
/// is a strict prefix of the other, the shorter sorts first.
pub(crate) fn cmp_sequence<T: StructuralOrd>(a: &[T], b: &[T]) -> Result<Ordering, OrderError> {
    for (x, y) in a.iter().zip(b.iter()) {
        match x.structural_cmp(y)? {
            Ordering::Equal => {}
            unequal => return Ok(unequal),
        }
    }
    Ok(a.len().cmp(&b.len()))
}

impl<T: StructuralOrd> StructuralOrd for [T] {
    fn structural_cmp(&self, other: &Self) -> Result<Ordering, OrderError> {
        cmp_sequence(self, other)
    }
}

impl<T: StructuralOrd, const N: usize> StructuralOrd for [T; N] {
    fn structural_cmp(&self, other: &Self) -> Result<Ordering, OrderError> {
        cmp_sequence(self, other)
    }
}

impl<T: StructuralOrd> StructuralOrd for Vec<T> {
    fn structural_cmp(&self, other: &Self) -> Result<Ordering, OrderError> {
        cmp_sequence(self, other)
    }
}

// References compare through the referenced value; chains of references
// dereference transitively by recursion.
impl<T: StructuralOrd + ?Sized> StructuralOrd for &T {
    fn structural_cmp(&self, other: &Self) -> Result<Ordering, OrderError> {
        (**self).structural_cmp(other)
    }
}

impl<T: StructuralOrd + ?Sized> StructuralOrd for Box<T> {
    fn structural_cmp(&self, other: &Self) -> Result<Ordering, OrderError> {
        (**self).structural_cmp(other)
    }
}

impl<T: StructuralOrd + ?Sized> StructuralOrd for std::rc::Rc<T> {
    fn structural_cmp(&self, other: &Self) -> Result<Ordering, OrderError> {
        (**self).structural_cmp(other)
    }
}

impl<T: StructuralOrd + ?Sized> StructuralOrd for std::sync::Arc<T> {
    fn structural_cmp(&self, other: &Self) -> Result<Ordering, OrderError> {
        (**self).structural_cmp(other)
    }
}

// A nullable reference: the absent side is the minimum.
impl<T: StructuralOrd> StructuralOrd for Option<T> {
    fn structural_cmp(&self, other: &Self) -> Result<Ordering, OrderError> {
        match (self, other) {
            (None, None) => Ok(Ordering::Equal),
            (None, Some(_)) => Ok(Ordering::Less),
            (Some(_), None) => Ok(Ordering::Greater),
            (Some(a), Some(b)) => a.structural_cmp(b),
        }
    }
}

/// Implements [`StructuralOrd`] for a record type, comparing the listed
/// fields in the listed order. Fields left off the list are invisible to
/// the comparator and never affect the result.
///
/// ```
/// use rw_rbmap::{structural_ord_fields, StructuralOrd};
///
/// struct Point {
///     x: i64,
///     y: i64,
///     scratch: u8, // not compared
/// }
/// structural_ord_fields!(Point { x, y });
///
/// let a = Point { x: 1, y: 2, scratch: 9 };
/// let b = Point { x: 1, y: 3, scratch: 0 };
/// assert_eq!(a.structural_cmp(&b).unwrap(), std::cmp::Ordering::Less);
/// ```
#[macro_export]
macro_rules! structural_ord_fields {
    ($ty:ty { $($field:ident),+ $(,)? }) => {
        impl $crate::StructuralOrd for $ty {
            fn structural_cmp(
                &self,
                other: &Self,
            ) -> ::core::result::Result<::core::cmp::Ordering, $crate::OrderError> {
                $(
                    match $crate::StructuralOrd::structural_cmp(&self.$field, &other.$field)? {
                        ::core::cmp::Ordering::Equal => {}
                        unequal => return Ok(unequal),
                    }
                )+
                Ok(::core::cmp::Ordering::Equal)
            }
        }
    };
}
