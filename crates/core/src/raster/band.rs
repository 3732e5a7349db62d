//! Band blocks and the raster reader interface the renderer consumes.

use crate::error::{Error, Result};
use crate::raster::Raster;

/// Storage type of a band's samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleType {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    F32,
    F64,
}

impl SampleType {
    /// Bits per sample
    pub fn bits(self) -> u32 {
        match self {
            Self::U8 | Self::I8 => 8,
            Self::U16 | Self::I16 => 16,
            Self::U32 | Self::I32 | Self::F32 => 32,
            Self::U64 | Self::I64 | Self::F64 => 64,
        }
    }

    /// Whether samples of this type can be decoded as bit flags
    /// (integers up to 32 bits).
    pub fn carries_flags(self) -> bool {
        !matches!(self, Self::U64 | Self::I64 | Self::F32 | Self::F64)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::U8 => "UInt8",
            Self::I8 => "Int8",
            Self::U16 => "UInt16",
            Self::I16 => "Int16",
            Self::U32 => "UInt32",
            Self::I32 => "Int32",
            Self::U64 => "UInt64",
            Self::I64 => "Int64",
            Self::F32 => "Float32",
            Self::F64 => "Float64",
        }
    }
}

/// A block of one band's samples, typed at runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum BandBlock {
    U8(Raster<u8>),
    I8(Raster<i8>),
    U16(Raster<u16>),
    I16(Raster<i16>),
    U32(Raster<u32>),
    I32(Raster<i32>),
    U64(Raster<u64>),
    I64(Raster<i64>),
    F32(Raster<f32>),
    F64(Raster<f64>),
}

macro_rules! each_block {
    ($self:expr, $r:ident => $body:expr) => {
        match $self {
            BandBlock::U8($r) => $body,
            BandBlock::I8($r) => $body,
            BandBlock::U16($r) => $body,
            BandBlock::I16($r) => $body,
            BandBlock::U32($r) => $body,
            BandBlock::I32($r) => $body,
            BandBlock::U64($r) => $body,
            BandBlock::I64($r) => $body,
            BandBlock::F32($r) => $body,
            BandBlock::F64($r) => $body,
        }
    };
}

impl BandBlock {
    pub fn sample_type(&self) -> SampleType {
        match self {
            Self::U8(_) => SampleType::U8,
            Self::I8(_) => SampleType::I8,
            Self::U16(_) => SampleType::U16,
            Self::I16(_) => SampleType::I16,
            Self::U32(_) => SampleType::U32,
            Self::I32(_) => SampleType::I32,
            Self::U64(_) => SampleType::U64,
            Self::I64(_) => SampleType::I64,
            Self::F32(_) => SampleType::F32,
            Self::F64(_) => SampleType::F64,
        }
    }

    pub fn rows(&self) -> usize {
        each_block!(self, r => r.rows())
    }

    pub fn cols(&self) -> usize {
        each_block!(self, r => r.cols())
    }

    /// Copy out a sub-block
    pub fn window(&self, window: &PixelWindow) -> Result<Self> {
        let PixelWindow {
            row_off,
            col_off,
            rows,
            cols,
        } = *window;
        Ok(match self {
            Self::U8(r) => Self::U8(r.window(row_off, col_off, rows, cols)?),
            Self::I8(r) => Self::I8(r.window(row_off, col_off, rows, cols)?),
            Self::U16(r) => Self::U16(r.window(row_off, col_off, rows, cols)?),
            Self::I16(r) => Self::I16(r.window(row_off, col_off, rows, cols)?),
            Self::U32(r) => Self::U32(r.window(row_off, col_off, rows, cols)?),
            Self::I32(r) => Self::I32(r.window(row_off, col_off, rows, cols)?),
            Self::U64(r) => Self::U64(r.window(row_off, col_off, rows, cols)?),
            Self::I64(r) => Self::I64(r.window(row_off, col_off, rows, cols)?),
            Self::F32(r) => Self::F32(r.window(row_off, col_off, rows, cols)?),
            Self::F64(r) => Self::F64(r.window(row_off, col_off, rows, cols)?),
        })
    }
}

/// A rectangular pixel region of a band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelWindow {
    pub row_off: usize,
    pub col_off: usize,
    pub rows: usize,
    pub cols: usize,
}

impl PixelWindow {
    /// The whole band of size `rows x cols`
    pub fn full(rows: usize, cols: usize) -> Self {
        Self {
            row_off: 0,
            col_off: 0,
            rows,
            cols,
        }
    }
}

/// Source of band samples for rendering.
///
/// Bands are numbered from 1.
pub trait BandReader {
    /// Number of bands
    fn band_count(&self) -> usize;

    /// Band dimensions as (rows, cols)
    fn shape(&self) -> (usize, usize);

    /// Storage type of a band
    fn sample_type(&self, band: usize) -> Result<SampleType>;

    /// Number of bits a parameter may address in this band
    fn bit_depth(&self, band: usize) -> Result<u32> {
        Ok(self.sample_type(band)?.bits())
    }

    /// Read a block of samples
    fn read_block(&self, band: usize, window: &PixelWindow) -> Result<BandBlock>;
}

/// Validate a 1-based band number against `band_count`.
pub fn check_band(band: usize, band_count: usize) -> Result<usize> {
    if band == 0 || band > band_count {
        return Err(Error::InvalidParameter {
            name: "band",
            value: band.to_string(),
            reason: format!("must be in [1, {band_count}]"),
        });
    }
    Ok(band - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_types() {
        assert!(SampleType::U8.carries_flags());
        assert!(SampleType::I32.carries_flags());
        assert!(!SampleType::F32.carries_flags());
        assert!(!SampleType::U64.carries_flags());
        assert_eq!(SampleType::I16.bits(), 16);
    }

    #[test]
    fn block_window() {
        let r = Raster::<u16>::from_vec((0..16).collect(), 4, 4).unwrap();
        let block = BandBlock::U16(r);
        let w = block
            .window(&PixelWindow {
                row_off: 2,
                col_off: 1,
                rows: 2,
                cols: 3,
            })
            .unwrap();
        assert_eq!(w.sample_type(), SampleType::U16);
        assert_eq!((w.rows(), w.cols()), (2, 3));
    }

    #[test]
    fn band_numbers_are_one_based() {
        assert!(check_band(0, 2).is_err());
        assert_eq!(check_band(2, 2).unwrap(), 1);
        assert!(check_band(3, 2).is_err());
    }
}
