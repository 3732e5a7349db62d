//! Raster data structures and the band reader interface

mod band;
mod element;
mod grid;

pub use band::{check_band, BandBlock, BandReader, PixelWindow, SampleType};
pub use element::RasterElement;
pub use grid::Raster;
