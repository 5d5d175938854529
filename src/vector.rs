//! Vector type for encoded dates.
//!
//! Encodings are dense binary vectors with elements in {0, 1}.
//! Internally stored as u8, one element per bit.

use std::fmt;
use std::ops::{Index, IndexMut};

/// A fixed-length binary vector.
///
/// This is the output of every encode call and the input of every decode
/// call.
#[derive(Clone, Debug, Default)]
pub struct Vector {
    /// The actual vector data
    data: Vec<u8>,
}

impl Vector {
    /// Create a new zero vector of given dimensionality.
    pub fn zeros(dimensions: usize) -> Self {
        Self {
            data: vec![0; dimensions],
        }
    }

    /// Create a vector from raw data.
    ///
    /// Any non-zero element is stored as 1.
    pub fn from_data(data: Vec<u8>) -> Self {
        let data = data.into_iter().map(|v| u8::from(v != 0)).collect();
        Self { data }
    }

    /// Create a vector with the given active bit positions set.
    pub fn from_active(dimensions: usize, active: &[usize]) -> Self {
        let mut vec = Self::zeros(dimensions);
        for &i in active {
            vec.data[i] = 1;
        }
        vec
    }

    /// Get the dimensionality.
    pub fn dimensions(&self) -> usize {
        self.data.len()
    }

    /// Get the raw data as a slice.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Get mutable access to the raw data.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume the vector, returning its bits.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Count active bits.
    pub fn nnz(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }

    /// Positions of active bits, ascending.
    pub fn active_indices(&self) -> Vec<usize> {
        self.data
            .iter()
            .enumerate()
            .filter(|(_, &v)| v != 0)
            .map(|(i, _)| i)
            .collect()
    }

    /// Append another vector's bits.
    pub fn extend(&mut self, other: &Vector) {
        self.data.extend_from_slice(&other.data);
    }
}

impl From<Vec<u8>> for Vector {
    fn from(data: Vec<u8>) -> Self {
        Self::from_data(data)
    }
}

impl Index<usize> for Vector {
    type Output = u8;

    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

impl IndexMut<usize> for Vector {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.data[index]
    }
}

impl PartialEq for Vector {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl Eq for Vector {}

impl PartialEq<[u8]> for Vector {
    fn eq(&self, other: &[u8]) -> bool {
        self.data.as_slice() == other
    }
}

impl<const N: usize> PartialEq<[u8; N]> for Vector {
    fn eq(&self, other: &[u8; N]) -> bool {
        self.data.as_slice() == other.as_slice()
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.data {
            write!(f, "{}", bit)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros() {
        let v = Vector::zeros(100);
        assert_eq!(v.dimensions(), 100);
        assert!(v.data().iter().all(|&x| x == 0));
    }

    #[test]
    fn test_from_data_normalizes() {
        let v = Vector::from_data(vec![0, 3, 1, 0, 255]);
        assert_eq!(v, [0, 1, 1, 0, 1]);
        assert_eq!(v.nnz(), 3);
    }

    #[test]
    fn test_active_indices() {
        let v = Vector::from_active(8, &[1, 4, 7]);
        assert_eq!(v.active_indices(), vec![1, 4, 7]);
        assert_eq!(v.to_string(), "01001001");
    }

    #[test]
    fn test_extend() {
        let mut a = Vector::from_data(vec![1, 0]);
        a.extend(&Vector::from_data(vec![0, 1, 1]));
        assert_eq!(a, [1, 0, 0, 1, 1]);
    }
}
