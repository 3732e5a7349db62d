//! Raster element trait for flag band sample values

use num_traits::Zero;
use std::fmt::Debug;

use super::band::SampleType;

/// Trait for types that can be stored in a raster cell.
///
/// Flag bands are decoded from the raw bit pattern of each sample, so every
/// element reports how (and whether) it maps onto a 32-bit pattern.
pub trait RasterElement:
    Copy + Clone + Debug + PartialEq + Zero + Send + Sync + 'static
{
    /// Storage type tag
    const SAMPLE_TYPE: SampleType;

    /// The sample's bits zero-extended from its storage width, or `None`
    /// if the type cannot carry bit flags.
    ///
    /// Signed samples are reinterpreted, not converted: `-1i8` yields `0xFF`.
    fn bit_pattern(self) -> Option<u32>;
}

macro_rules! impl_raster_element_flag {
    ($t:ty, $unsigned:ty, $tag:ident) => {
        impl RasterElement for $t {
            const SAMPLE_TYPE: SampleType = SampleType::$tag;

            #[inline]
            fn bit_pattern(self) -> Option<u32> {
                Some(self as $unsigned as u32)
            }
        }
    };
}

macro_rules! impl_raster_element_plain {
    ($t:ty, $tag:ident) => {
        impl RasterElement for $t {
            const SAMPLE_TYPE: SampleType = SampleType::$tag;

            #[inline]
            fn bit_pattern(self) -> Option<u32> {
                None
            }
        }
    };
}

impl_raster_element_flag!(u8, u8, U8);
impl_raster_element_flag!(i8, u8, I8);
impl_raster_element_flag!(u16, u16, U16);
impl_raster_element_flag!(i16, u16, I16);
impl_raster_element_flag!(u32, u32, U32);
impl_raster_element_flag!(i32, u32, I32);
impl_raster_element_plain!(u64, U64);
impl_raster_element_plain!(i64, I64);
impl_raster_element_plain!(f32, F32);
impl_raster_element_plain!(f64, F64);
