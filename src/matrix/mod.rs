use crate::prelude::*;
use rand::{
    distributions::{Distribution, Uniform},
    Rng,
};
use std::ops::{Index, IndexMut, RangeInclusive};

pub mod ops;

/// Dense matrix stored row-major in one contiguous buffer.
#[derive(Debug, PartialEq, Clone)]
pub struct Matrix2<T> {
    data: Vec<T>,
    dim: (usize, usize),
}

impl<T: Default + Clone> Matrix2<T> {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![T::default(); rows * cols],
            dim: (rows, cols),
        }
    }
}

impl<T: Element> Matrix2<T> {
    /// Unit matrix: `1` on the diagonal, `0` elsewhere.
    /// For non-square shapes only `(i, i)` with `i < min(rows, cols)` is set.
    pub fn identity(rows: usize, cols: usize) -> Self {
        let mut res = Self {
            data: vec![T::zero(); rows * cols],
            dim: (rows, cols),
        };
        for i in 0..rows.min(cols) {
            res[(i, i)] = T::one();
        }
        res
    }

    /// Fills a `rows x cols` matrix with independent uniform draws from `range`.
    ///
    /// Keep the range narrow (around `[-0.5, 0.5]`) when the layer uses sigmoid or
    /// tanh, otherwise the weighted sums land in the flat tails and learning stalls.
    pub fn random<R: Rng + ?Sized>(
        rows: usize,
        cols: usize,
        range: RangeInclusive<T>,
        rng: &mut R,
    ) -> Self {
        let die = Uniform::from(range);
        Self {
            data: (0..rows * cols).map(|_| die.sample(rng)).collect(),
            dim: (rows, cols),
        }
    }
}

impl<T> Matrix2<T> {
    pub fn from_array<const R: usize, const C: usize>(arr: [[T; C]; R]) -> Self {
        let mut data = Vec::with_capacity(R * C);

        for row in arr {
            for x in row {
                data.push(x);
            }
        }

        Self { data, dim: (R, C) }
    }

    /// Builds a matrix from nested rows. Every row must have the length of the first.
    pub fn from_vec(vec: Vec<Vec<T>>) -> Result<Self> {
        let rows = vec.len();
        let cols = vec.first().map(|row| row.len()).unwrap_or(0);

        let mut data = Vec::with_capacity(rows * cols);
        for row in vec {
            if cols != row.len() {
                return Err(Error::dim("matrix row length", row.len(), cols));
            }
            data.extend(row);
        }

        Ok(Self {
            data,
            dim: (rows, cols),
        })
    }

    /// Builds a matrix from a flat row-major buffer.
    pub fn from_flat(rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::dim("matrix element count", data.len(), rows * cols));
        }
        Ok(Self {
            data,
            dim: (rows, cols),
        })
    }

    pub fn dim(&self) -> (usize, usize) {
        self.dim
    }

    pub fn rows(&self) -> usize {
        self.dim.0
    }

    pub fn cols(&self) -> usize {
        self.dim.1
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn row(&self, row: usize) -> &[T] {
        let cols = self.cols();
        &self.data[row * cols..(row + 1) * cols]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[T]> {
        // chunks_exact panics on 0
        self.data.chunks_exact(self.cols().max(1)).take(self.rows())
    }

    pub fn to_vec(self) -> Vec<Vec<T>>
    where
        T: Clone,
    {
        self.iter_rows().map(|row| row.to_vec()).collect()
    }
}

impl<T: Copy> Matrix2<T> {
    /// Applies a function to every element of the matrix
    pub fn apply<F: Fn(T) -> T>(&mut self, f: F) {
        for x in &mut self.data {
            *x = f(*x);
        }
    }
}

impl<T> Index<(usize, usize)> for Matrix2<T> {
    type Output = T;
    fn index(&self, (i, j): (usize, usize)) -> &Self::Output {
        &self.data[i * self.cols() + j]
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix2<T> {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut Self::Output {
        let idx = i * self.cols() + j;
        &mut self.data[idx]
    }
}
