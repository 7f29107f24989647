use core::fmt::{Debug, Display};
use core::iter::Sum;
use core::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use num_traits::{CheckedAdd, One, ToPrimitive, Zero};

/// A trait representing a flow quantity or a per-unit cost, which is typically an integer.
///
/// Capacities, flows and costs of a network all share the same type so that path costs and
/// bottlenecks can be combined without conversions. Path costs are accumulated with
/// [`CheckedAdd`], conversions to `usize`/`f64` go through [`ToPrimitive`].
pub trait Amount:
    Copy
    + Sum<Self>
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Neg<Output = Self>
    + Ord
    + AddAssign
    + SubAssign
    + CheckedAdd
    + Zero
    + One
    + ToPrimitive
    + Debug
    + Display
    + Default
{
}

impl Amount for i32 {}

impl Amount for i64 {}
