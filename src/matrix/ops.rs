use super::Matrix2;
use crate::prelude::*;
use std::ops::{Add, Mul, Sub};

pub trait Dot<I> {
    type Output;
    fn dot(self, rhs: I) -> Result<Self::Output>;
}

pub trait Transpose {
    fn transpose(&self) -> Self;
}

impl<T: Default + Copy> Transpose for Matrix2<T> {
    fn transpose(&self) -> Self {
        let mut transposed = Matrix2::new(self.cols(), self.rows());

        for row in 0..self.rows() {
            for col in 0..self.cols() {
                transposed[(col, row)] = self[(row, col)];
            }
        }
        transposed
    }
}

/// Matrix-vector product. `self` must be non-empty with as many columns as `rhs` has elements.
impl<'a, T: Element> Dot<&[T]> for &'a Matrix2<T> {
    type Output = Vec<T>;
    fn dot(self, rhs: &[T]) -> Result<Self::Output> {
        if self.rows() == 0 {
            return Err(Error::dim("matrix rows", 0, 1));
        }
        if self.cols() != rhs.len() {
            return Err(Error::dim("vector length", rhs.len(), self.cols()));
        }

        Ok(self
            .iter_rows()
            .map(|row| {
                row.iter()
                    .zip(rhs)
                    .fold(T::zero(), |sum, (&w, &x)| sum + w * x)
            })
            .collect())
    }
}

/// Adds two Matrix2s element-wise.
impl<'a, T> Add for &'a Matrix2<T>
where
    T: Add<Output = T> + Copy,
{
    type Output = Result<Matrix2<T>>;
    fn add(self, rhs: Self) -> Self::Output {
        if self.dim != rhs.dim {
            let (got, expected) = if self.rows() != rhs.rows() {
                (rhs.rows(), self.rows())
            } else {
                (rhs.cols(), self.cols())
            };
            return Err(Error::dim("matrix shape", got, expected));
        }

        Ok(Matrix2 {
            data: self.data.iter().zip(&rhs.data).map(|(&a, &b)| a + b).collect(),
            dim: self.dim,
        })
    }
}

/// Multiplies every element by a scalar.
impl<'a, T> Mul<T> for &'a Matrix2<T>
where
    T: Mul<Output = T> + Copy,
{
    type Output = Matrix2<T>;
    fn mul(self, scalar: T) -> Self::Output {
        Matrix2 {
            data: self.data.iter().map(|&x| x * scalar).collect(),
            dim: self.dim,
        }
    }
}

/// Outer product `a * b^T`, shape `a.len() x b.len()`.
pub fn outer<T: Element>(a: &[T], b: &[T]) -> Matrix2<T> {
    let mut data = Vec::with_capacity(a.len() * b.len());
    for &x in a {
        data.extend(b.iter().map(|&y| x * y));
    }
    Matrix2 {
        data,
        dim: (a.len(), b.len()),
    }
}

/// Element-wise `a - b`.
pub fn sub_vec<T>(a: &[T], b: &[T]) -> Result<Vec<T>>
where
    T: Sub<Output = T> + Copy,
{
    if a.len() != b.len() {
        return Err(Error::dim("vector length", b.len(), a.len()));
    }
    Ok(a.iter().zip(b).map(|(&x, &y)| x - y).collect())
}

/// Maps `f` over every element of `v` in place.
pub fn apply<T: Copy, F: Fn(T) -> T>(v: &mut [T], f: F) {
    for x in v.iter_mut() {
        *x = f(*x);
    }
}
