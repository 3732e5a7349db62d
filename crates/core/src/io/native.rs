//! Native TIFF band reading and RGBA image writing
//!
//! Uses the `tiff` crate. Multi-sample images are split into one band per
//! sample; the whole image is decoded once when the reader is opened.

use crate::error::{Error, Result};
use crate::raster::{check_band, BandBlock, BandReader, PixelWindow, Raster, RasterElement, SampleType};
use std::fs::File;
use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::colortype::RGBA8;
use tiff::encoder::TiffEncoder;
use tracing::debug;

/// A [`BandReader`] over a decoded TIFF image.
#[derive(Debug, Clone)]
pub struct TiffBandReader {
    bands: Vec<BandBlock>,
    rows: usize,
    cols: usize,
}

impl TiffBandReader {
    /// Open and decode a TIFF file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let reader = Self::decode(file)?;
        debug!(
            "opened {} ({} band(s), {}x{})",
            path.as_ref().display(),
            reader.bands.len(),
            reader.cols,
            reader.rows
        );
        Ok(reader)
    }

    /// Decode a TIFF held in memory
    pub fn from_buffer(data: &[u8]) -> Result<Self> {
        Self::decode(Cursor::new(data))
    }

    /// Build a reader from bands already in memory.
    ///
    /// All bands must share one shape.
    pub fn from_bands(bands: Vec<BandBlock>) -> Result<Self> {
        let (rows, cols) = bands
            .first()
            .map(|b| (b.rows(), b.cols()))
            .unwrap_or((0, 0));
        if bands.iter().any(|b| b.rows() != rows || b.cols() != cols) {
            return Err(Error::Other("bands differ in shape".into()));
        }
        Ok(Self { bands, rows, cols })
    }

    fn decode<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut decoder =
            Decoder::new(reader).map_err(|e| Error::Other(format!("TIFF decode error: {}", e)))?;

        let (width, height) = decoder
            .dimensions()
            .map_err(|e| Error::Other(format!("Cannot read dimensions: {}", e)))?;
        let rows = height as usize;
        let cols = width as usize;

        let result = decoder
            .read_image()
            .map_err(|e| Error::Other(format!("Cannot read image data: {}", e)))?;

        let bands = match result {
            DecodingResult::U8(buf) => split_bands(buf, rows, cols, BandBlock::U8)?,
            DecodingResult::I8(buf) => split_bands(buf, rows, cols, BandBlock::I8)?,
            DecodingResult::U16(buf) => split_bands(buf, rows, cols, BandBlock::U16)?,
            DecodingResult::I16(buf) => split_bands(buf, rows, cols, BandBlock::I16)?,
            DecodingResult::U32(buf) => split_bands(buf, rows, cols, BandBlock::U32)?,
            DecodingResult::I32(buf) => split_bands(buf, rows, cols, BandBlock::I32)?,
            DecodingResult::U64(buf) => split_bands(buf, rows, cols, BandBlock::U64)?,
            DecodingResult::I64(buf) => split_bands(buf, rows, cols, BandBlock::I64)?,
            DecodingResult::F32(buf) => split_bands(buf, rows, cols, BandBlock::F32)?,
            DecodingResult::F64(buf) => split_bands(buf, rows, cols, BandBlock::F64)?,
            #[allow(unreachable_patterns)]
            _ => {
                return Err(Error::UnsupportedDataType(
                    "Unsupported TIFF pixel format".to_string(),
                ))
            }
        };

        Ok(Self { bands, rows, cols })
    }

    fn band(&self, band: usize) -> Result<&BandBlock> {
        Ok(&self.bands[check_band(band, self.bands.len())?])
    }
}

/// Split pixel-interleaved samples into one raster per sample.
fn split_bands<T: RasterElement>(
    buf: Vec<T>,
    rows: usize,
    cols: usize,
    wrap: fn(Raster<T>) -> BandBlock,
) -> Result<Vec<BandBlock>> {
    let pixels = rows * cols;
    if pixels == 0 || buf.len() % pixels != 0 {
        return Err(Error::InvalidDimensions {
            width: cols,
            height: rows,
        });
    }
    let samples = buf.len() / pixels;
    if samples == 1 {
        return Ok(vec![wrap(Raster::from_vec(buf, rows, cols)?)]);
    }
    (0..samples)
        .map(|s| {
            let band: Vec<T> = buf.iter().skip(s).step_by(samples).copied().collect();
            Raster::from_vec(band, rows, cols).map(wrap)
        })
        .collect()
}

impl BandReader for TiffBandReader {
    fn band_count(&self) -> usize {
        self.bands.len()
    }

    fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    fn sample_type(&self, band: usize) -> Result<SampleType> {
        Ok(self.band(band)?.sample_type())
    }

    fn read_block(&self, band: usize, window: &PixelWindow) -> Result<BandBlock> {
        let block = self.band(band)?;
        if *window == PixelWindow::full(self.rows, self.cols) {
            return Ok(block.clone());
        }
        block.window(window)
    }
}

/// Write an RGBA pixel buffer (4 bytes per pixel, row-major) to a TIFF file
pub fn write_rgba_tiff<P: AsRef<Path>>(path: P, width: usize, height: usize, rgba: &[u8]) -> Result<()> {
    let file = File::create(path.as_ref())?;
    encode_rgba(file, width, height, rgba)
}

/// Encode an RGBA pixel buffer as an in-memory TIFF
pub fn write_rgba_tiff_to_buffer(width: usize, height: usize, rgba: &[u8]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    encode_rgba(Cursor::new(&mut buf), width, height, rgba)?;
    Ok(buf)
}

fn encode_rgba<W: Write + Seek>(writer: W, width: usize, height: usize, rgba: &[u8]) -> Result<()> {
    if rgba.len() != width * height * 4 {
        return Err(Error::InvalidDimensions { width, height });
    }
    let mut encoder =
        TiffEncoder::new(writer).map_err(|e| Error::Other(format!("TIFF encoder error: {}", e)))?;
    encoder
        .write_image::<RGBA8>(width as u32, height as u32, rgba)
        .map_err(|e| Error::Other(format!("Cannot write image data: {}", e)))?;
    Ok(())
}
