//! # Bitflag Render
//!
//! Turns integer quality bands into RGBA images using a [`FlagScheme`].
//!
//! The main entry point is [`decode`], a pure function of the pixel buffer,
//! the scheme and the canvas size. It may run concurrently on separate
//! buffers as long as nobody mutates the scheme meanwhile.
//!
//! ## Usage
//!
//! ```ignore
//! use bitflag_core::presets;
//! use bitflag_render::decode;
//!
//! let scheme = presets::landsat8_qa();
//! let rgba = decode(&qa_band, &scheme, width, height);
//! ```

mod decode;
mod legend;
pub(crate) mod maybe_rayon;

pub use bitflag_core::{FlagScheme, LegendItem};
pub use decode::{decode, decode_block, decode_raster, parameters_beyond_depth, render_band};
pub use legend::Legend;
