//! Bit-flag band to RGBA compositing.

use bitflag_core::raster::{BandBlock, BandReader, PixelWindow, Raster, RasterElement};
use bitflag_core::{FlagParameter, FlagScheme, Result};
use tracing::{debug, warn};

use crate::maybe_rayon::*;

type Pixel = [u8; 4];

/// Decode a band of flag samples into an RGBA pixel buffer.
///
/// Returns a `Vec<u8>` of length `width * height * 4` in row-major order.
/// Every pixel starts as the scheme's no-data color. Parameters are then
/// painted in [`FlagScheme::paint_order`]; for each visible state, pixels
/// whose parameter value equals the state value receive the state color (or
/// the combined flags color). Later parameters overwrite earlier ones.
///
/// Samples are read as their unsigned storage bit pattern. Bits beyond 32
/// read as zero. Sample types that cannot carry flags yield the no-data
/// image.
///
/// # Panics
///
/// If `pixels.len() != width * height`.
pub fn decode<T: RasterElement>(
    pixels: &[T],
    scheme: &FlagScheme,
    width: usize,
    height: usize,
) -> Vec<u8> {
    assert_eq!(
        pixels.len(),
        width * height,
        "pixel buffer holds {} samples, expected {}x{}",
        pixels.len(),
        width,
        height
    );

    let nodata = scheme.no_data_color().to_array();
    let mut out: Vec<Pixel> = vec![nodata; pixels.len()];

    if scheme.is_empty() {
        return out.concat();
    }
    if !T::SAMPLE_TYPE.carries_flags() {
        warn!(
            "sample type {} cannot carry bit flags, rendering no-data",
            T::SAMPLE_TYPE.name()
        );
        return out.concat();
    }

    let patterns: Vec<u32> = pixels
        .iter()
        .map(|v| v.bit_pattern().unwrap_or(0))
        .collect();
    let mut values = vec![0u32; patterns.len()];

    let order = scheme.paint_order();
    for parameter in &order {
        let colors = state_colors(parameter, scheme);
        if colors.iter().all(Option::is_none) {
            continue;
        }
        extract_values(&patterns, parameter, &mut values);
        paint(&values, &colors, &mut out);
        values.fill(0);
    }

    debug!(
        "decoded {}x{} pixels with {} parameter(s)",
        width,
        height,
        order.len()
    );
    out.concat()
}

/// Color per parameter value, `None` where no visible state matches.
///
/// A visible state later in the parameter overrides an earlier one with the
/// same value.
fn state_colors(parameter: &FlagParameter, scheme: &FlagScheme) -> Vec<Option<Pixel>> {
    let mut colors = vec![None; parameter.len()];
    for state in parameter.visible_states() {
        if let Some(slot) = colors.get_mut(state.value() as usize) {
            let color = if scheme.combine_flags() {
                scheme.combined_flags_color()
            } else {
                state.color()
            };
            *slot = Some(color.to_array());
        }
    }
    colors
}

/// Accumulate the parameter's bit range into `values`, one bit per pass.
fn extract_values(patterns: &[u32], parameter: &FlagParameter, values: &mut [u32]) {
    for b in 0..parameter.bit_count() {
        let bit = parameter.first_bit() + b;
        if bit >= u32::BITS {
            break;
        }
        let mask = 1u32 << bit;
        let set = 1u32 << b;
        (&mut *values)
            .into_par_iter()
            .zip(patterns.into_par_iter())
            .for_each(|(v, &p)| {
                if p & mask != 0 {
                    *v |= set;
                }
            });
    }
}

fn paint(values: &[u32], colors: &[Option<Pixel>], out: &mut [Pixel]) {
    out.into_par_iter()
        .zip(values.into_par_iter())
        .for_each(|(px, &v)| {
            if let Some(Some(color)) = colors.get(v as usize) {
                *px = *color;
            }
        });
}

/// Decode a whole raster block
pub fn decode_raster<T: RasterElement>(raster: &Raster<T>, scheme: &FlagScheme) -> Vec<u8> {
    let pixels = raster.pixels();
    decode(&pixels[..], scheme, raster.cols(), raster.rows())
}

/// Decode a block whose sample type is only known at runtime
pub fn decode_block(block: &BandBlock, scheme: &FlagScheme) -> Vec<u8> {
    match block {
        BandBlock::U8(r) => decode_raster(r, scheme),
        BandBlock::I8(r) => decode_raster(r, scheme),
        BandBlock::U16(r) => decode_raster(r, scheme),
        BandBlock::I16(r) => decode_raster(r, scheme),
        BandBlock::U32(r) => decode_raster(r, scheme),
        BandBlock::I32(r) => decode_raster(r, scheme),
        BandBlock::U64(r) => decode_raster(r, scheme),
        BandBlock::I64(r) => decode_raster(r, scheme),
        BandBlock::F32(r) => decode_raster(r, scheme),
        BandBlock::F64(r) => decode_raster(r, scheme),
    }
}

/// Parameters that claim bits the band does not have
pub fn parameters_beyond_depth(scheme: &FlagScheme, bit_depth: u32) -> Vec<&FlagParameter> {
    scheme.iter().filter(|p| p.last_bit() >= bit_depth).collect()
}

/// Read a window of a band and decode it.
///
/// Parameters reaching past the band's bit depth are reported and decoded
/// with their missing bits as zero.
pub fn render_band<R: BandReader + ?Sized>(
    reader: &R,
    band: usize,
    window: &PixelWindow,
    scheme: &FlagScheme,
) -> Result<Vec<u8>> {
    let depth = reader.bit_depth(band)?;
    for parameter in parameters_beyond_depth(scheme, depth) {
        warn!(
            "parameter '{}' (bits {}) exceeds the {}-bit depth of band {}",
            parameter.name(),
            parameter.bit_position_text(),
            depth,
            band
        );
    }
    let block = reader.read_block(band, window)?;
    Ok(decode_block(&block, scheme))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitflag_core::Rgba;

    fn one_param_scheme(first_bit: u32, bit_count: u32) -> FlagScheme {
        let mut scheme = FlagScheme::new("t");
        scheme.add_parameter(FlagParameter::new("p", first_bit, bit_count).unwrap());
        scheme
    }

    #[test]
    fn extract_reads_bit_range() {
        let scheme = one_param_scheme(1, 2);
        let mut values = vec![0; 4];
        extract_values(&[0b110, 0b001, 0b010, 0b100], &scheme[0], &mut values);
        assert_eq!(values, vec![3, 0, 1, 2]);
    }

    #[test]
    fn bits_past_32_read_zero() {
        let scheme = one_param_scheme(31, 2);
        let mut values = vec![0; 1];
        extract_values(&[u32::MAX], &scheme[0], &mut values);
        assert_eq!(values, vec![1]);
    }

    #[test]
    fn visible_states_fill_color_table() {
        let mut scheme = one_param_scheme(0, 1);
        let p = scheme.parameter_mut(0).unwrap();
        p[1].set_values(None, Some(Rgba::rgb(1, 1, 1)), Some(true));
        let colors = state_colors(&scheme[0], &scheme);
        assert_eq!(colors, vec![None, Some([1, 1, 1, 255])]);
    }

    #[test]
    #[should_panic]
    fn length_mismatch_panics() {
        decode(&[1u8, 2, 3], &FlagScheme::default(), 2, 2);
    }

    #[test]
    fn depth_check() {
        let scheme = one_param_scheme(7, 2);
        assert_eq!(parameters_beyond_depth(&scheme, 8).len(), 1);
        assert!(parameters_beyond_depth(&scheme, 16).is_empty());
    }
}
