//! # Bitflag Core
//!
//! Core types and I/O for rendering bit-flag quality bands.
//!
//! This crate provides:
//! - `FlagScheme`, `FlagParameter`, `FlagState`: the bit range data model
//! - `Rgba` colors and hue stepping for default state colors
//! - `Raster<T>` blocks and the `BandReader` interface, with a native TIFF reader
//! - XML, JSON and clipboard serialization of schemes
//! - Built-in presets and a scheme catalog

pub mod color;
pub mod config;
pub mod error;
pub mod io;
pub mod model;
pub mod presets;
pub mod raster;

pub use color::{contrast_color, next_color, HueStep, Rgba};
pub use config::{Settings, ZeroStatePolicy};
pub use error::{Error, Result};
pub use model::{FlagParameter, FlagScheme, FlagState, LegendItem};
pub use raster::{BandBlock, BandReader, PixelWindow, Raster, RasterElement, SampleType};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::color::{HueStep, Rgba};
    pub use crate::config::{Settings, ZeroStatePolicy};
    pub use crate::error::{Error, Result};
    pub use crate::io::SchemeCatalog;
    pub use crate::model::{FlagParameter, FlagScheme, FlagState, LegendItem};
    pub use crate::raster::{BandBlock, BandReader, PixelWindow, Raster, RasterElement};
}
