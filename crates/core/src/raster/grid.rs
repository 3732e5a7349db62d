//! Main Raster type

use std::borrow::Cow;

use crate::error::{Error, Result};
use crate::raster::RasterElement;
use ndarray::{s, Array2};

/// A 2D block of band samples.
///
/// Stored in row-major order (row, col), so the flattened pixel order is the
/// order the compositor expects.
///
/// # Example
///
/// ```ignore
/// use bitflag_core::Raster;
///
/// let mut raster: Raster<u16> = Raster::new(2, 3);
/// raster.set(1, 2, 0b110)?;
/// assert_eq!(raster.get(1, 2)?, 6);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Raster<T: RasterElement> {
    data: Array2<T>,
}

impl<T: RasterElement> Raster<T> {
    /// Create a new raster filled with zeros
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            data: Array2::zeros((rows, cols)),
        }
    }

    /// Create a new raster filled with a specific value
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self {
            data: Array2::from_elem((rows, cols), value),
        }
    }

    /// Create a raster from existing row-major data
    pub fn from_vec(data: Vec<T>, rows: usize, cols: usize) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::InvalidDimensions {
                width: cols,
                height: rows,
            });
        }

        let array = Array2::from_shape_vec((rows, cols), data)
            .map_err(|e| Error::Other(e.to_string()))?;

        Ok(Self { data: array })
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// Dimensions as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the raster is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get value at (row, col)
    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        self.data
            .get((row, col))
            .copied()
            .ok_or(Error::InvalidDimensions {
                width: col + 1,
                height: row + 1,
            })
    }

    /// Set value at (row, col)
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        match self.data.get_mut((row, col)) {
            Some(cell) => {
                *cell = value;
                Ok(())
            }
            None => Err(Error::InvalidDimensions {
                width: col + 1,
                height: row + 1,
            }),
        }
    }

    /// Get a reference to the underlying array
    pub fn data(&self) -> &Array2<T> {
        &self.data
    }

    /// Samples in row-major order, borrowed when the layout allows it
    pub fn pixels(&self) -> Cow<'_, [T]> {
        match self.data.as_slice() {
            Some(slice) => Cow::Borrowed(slice),
            None => Cow::Owned(self.data.iter().copied().collect()),
        }
    }

    /// Copy out the sub-block starting at (row, col)
    pub fn window(&self, row: usize, col: usize, rows: usize, cols: usize) -> Result<Self> {
        if row + rows > self.rows() || col + cols > self.cols() {
            return Err(Error::InvalidDimensions {
                width: col + cols,
                height: row + rows,
            });
        }
        Ok(Self {
            data: self
                .data
                .slice(s![row..row + rows, col..col + cols])
                .to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raster_creation() {
        let raster: Raster<u16> = Raster::new(10, 20);
        assert_eq!(raster.rows(), 10);
        assert_eq!(raster.cols(), 20);
        assert_eq!(raster.shape(), (10, 20));
    }

    #[test]
    fn test_raster_access() {
        let mut raster: Raster<u8> = Raster::new(4, 4);
        raster.set(2, 3, 42).unwrap();
        assert_eq!(raster.get(2, 3).unwrap(), 42);
        assert!(raster.get(4, 0).is_err());
        assert!(raster.set(0, 4, 1).is_err());
    }

    #[test]
    fn test_from_vec_checks_length() {
        assert!(Raster::<u8>::from_vec(vec![1, 2, 3], 2, 2).is_err());
        let r = Raster::<u8>::from_vec(vec![1, 2, 3, 4], 2, 2).unwrap();
        assert_eq!(r.pixels().as_ref(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_window() {
        let r = Raster::<u16>::from_vec((0..12).collect(), 3, 4).unwrap();
        let w = r.window(1, 1, 2, 2).unwrap();
        assert_eq!(w.pixels().as_ref(), &[5, 6, 9, 10]);
        assert!(r.window(2, 0, 2, 1).is_err());
    }
}
