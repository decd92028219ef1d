use num_traits::Zero;
use std::ops::{AddAssign, Div, MulAssign, SubAssign};

/// Element-wise addition of two slices.
#[inline]
pub(crate) fn add_slice<T: Copy + AddAssign>(lhs: &mut [T], rhs: &[T]) {
    lhs.iter_mut().zip(rhs).for_each(|(l, r)| *l += *r);
}

/// Element-wise subtraction of two slices.
#[inline]
pub(crate) fn sub_slice<T: Copy + SubAssign>(lhs: &mut [T], rhs: &[T]) {
    lhs.iter_mut().zip(rhs).for_each(|(l, r)| *l -= *r);
}

/// Element-wise multiplication of two slices.
#[inline]
pub(crate) fn mul_slice<T: Copy + MulAssign>(lhs: &mut [T], rhs: &[T]) {
    lhs.iter_mut().zip(rhs).for_each(|(l, r)| *l *= *r);
}

/// Element-wise division of two slices.
///
/// When the denominator is zero, the `default` value is assigned to the `lhs`.
#[inline]
pub(crate) fn div_slice<T: Copy + Div<Output = T> + Zero>(lhs: &mut [T], rhs: &[T], default: T) {
    lhs.iter_mut()
        .zip(rhs)
        .for_each(|(l, r)| *l = if r.is_zero() { default } else { *l / *r });
}

/// Multiply a scalar to a slice.
#[inline]
pub(crate) fn mul_slice_scalar<T: Copy + MulAssign>(slice: &mut [T], scalar: T) {
    slice.iter_mut().for_each(|l| *l *= scalar);
}

/// Clamps every element of a slice from below.
#[inline]
pub(crate) fn floor_slice(slice: &mut [f32], floor: f32) {
    slice.iter_mut().for_each(|l| {
        if *l < floor {
            *l = floor;
        }
    });
}
