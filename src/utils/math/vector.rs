use std::cmp::Ordering;

use num::{Float, Num};
use serde::{Deserialize, Serialize};

/// SparseVec is a sparse vector that treats zero elements as absent.
/// It holds `inds` and `vals` side by side:
/// `inds` holds the column index of each stored element,
/// `vals` holds its value.
///
/// Elements are guaranteed to be sorted by ascending index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparseVec<N>
where
    N: Num + Copy,
{
    inds: Vec<u32>,
    vals: Vec<N>,
    len: usize,
}

impl<N> SparseVec<N>
where
    N: Num + Copy,
{
    /// Create an empty vector of logical length `len`
    #[inline]
    pub fn new(len: usize) -> Self {
        SparseVec {
            inds: Vec::new(),
            vals: Vec::new(),
            len,
        }
    }

    /// Build from unsorted (index, value) pairs.
    /// Zero values are dropped, duplicated indices are summed.
    ///
    /// # Arguments
    /// * `len` - logical length (number of columns)
    /// * `pairs` - (index, value) pairs, any order
    pub fn from_pairs(len: usize, mut pairs: Vec<(u32, N)>) -> Self {
        pairs.sort_unstable_by_key(|(idx, _)| *idx);
        let mut inds: Vec<u32> = Vec::with_capacity(pairs.len());
        let mut vals: Vec<N> = Vec::with_capacity(pairs.len());
        for (idx, val) in pairs {
            debug_assert!((idx as usize) < len, "index {idx} out of range {len}");
            match inds.last() {
                Some(&last) if last == idx => {
                    if let Some(v) = vals.last_mut() {
                        *v = *v + val;
                    }
                }
                _ => {
                    inds.push(idx);
                    vals.push(val);
                }
            }
        }
        let mut out = SparseVec { inds, vals, len };
        out.drop_zeros();
        out
    }

    fn drop_zeros(&mut self) {
        let mut w = 0;
        for r in 0..self.inds.len() {
            if !self.vals[r].is_zero() {
                self.inds[w] = self.inds[r];
                self.vals[w] = self.vals[r];
                w += 1;
            }
        }
        self.inds.truncate(w);
        self.vals.truncate(w);
    }

    /// logical length
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// number of non-zero elements
    #[inline]
    pub fn nnz(&self) -> usize {
        self.inds.len()
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.inds.is_empty()
    }

    /// Get the value at `index`, zero when absent
    #[inline]
    pub fn get(&self, index: usize) -> N {
        match self.inds.binary_search(&(index as u32)) {
            Ok(pos) => self.vals[pos],
            Err(_) => N::zero(),
        }
    }

    /// Iterate stored (index, value) pairs in ascending index order
    #[inline]
    pub fn raw_iter(&self) -> impl Iterator<Item = (usize, N)> + '_ {
        self.inds
            .iter()
            .zip(self.vals.iter())
            .map(|(&i, &v)| (i as usize, v))
    }

    /// Dense copy of this vector
    pub fn to_dense(&self) -> Vec<N> {
        let mut dense = vec![N::zero(); self.len];
        for (i, v) in self.raw_iter() {
            dense[i] = v;
        }
        dense
    }
}

impl<N> SparseVec<N>
where
    N: Num + Copy + Into<f64>,
{
    /// Dot product computed by merging the two sorted index lists
    ///
    /// # Arguments
    /// * `other` - other vector
    ///
    /// # Returns
    /// * `f64` - Σ(a_i * b_i)
    #[inline]
    pub fn dot(&self, other: &Self) -> f64 {
        debug_assert_eq!(self.len, other.len, "vectors must share a dimension");
        let mut result = 0_f64;
        let (mut i, mut j) = (0, 0);
        while i < self.inds.len() && j < other.inds.len() {
            match self.inds[i].cmp(&other.inds[j]) {
                Ordering::Equal => {
                    result += self.vals[i].into() * other.vals[j].into();
                    i += 1;
                    j += 1;
                }
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
            }
        }
        result
    }

    #[inline]
    pub fn norm_sq(&self) -> f64 {
        self.vals.iter().map(|&v| {
            let v: f64 = v.into();
            v * v
        }).sum()
    }

    #[inline]
    pub fn norm(&self) -> f64 {
        self.norm_sq().sqrt()
    }
}

impl<N> SparseVec<N>
where
    N: Float + Into<f64>,
{
    /// Scale to unit L2 norm in place.
    /// A zero vector stays zero.
    pub fn normalize_l2(&mut self) -> &mut Self {
        let norm = self.norm();
        if norm > 0.0 {
            if let Some(inv) = N::from(1.0 / norm) {
                self.vals.iter_mut().for_each(|v| *v = *v * inv);
            }
        }
        self
    }
}
