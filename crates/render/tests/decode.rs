//! Compositing behavior on small hand-built bands

use bitflag_core::io::TiffBandReader;
use bitflag_core::raster::{BandBlock, PixelWindow, Raster};
use bitflag_core::{FlagParameter, FlagScheme, Rgba};
use bitflag_render::{decode, decode_block, render_band};

const RED: Rgba = Rgba::rgb(255, 0, 0);
const GREEN: Rgba = Rgba::rgb(0, 255, 0);
const NODATA: Rgba = Rgba::new(1, 2, 3, 4);

fn scheme_with(parameters: Vec<FlagParameter>) -> FlagScheme {
    let mut scheme = FlagScheme::new("test");
    scheme.set_no_data_color(NODATA);
    scheme.set_parameters(parameters);
    scheme
}

fn param(first_bit: u32, bit_count: u32, z: i32, visible: &[(usize, Rgba)]) -> FlagParameter {
    let mut p = FlagParameter::new(format!("p{first_bit}"), first_bit, bit_count).unwrap();
    p.set_z_value(z);
    for &(row, color) in visible {
        p[row].set_values(None, Some(color), Some(true));
    }
    p
}

fn pixel(rgba: &[u8], i: usize) -> Rgba {
    Rgba::new(rgba[i * 4], rgba[i * 4 + 1], rgba[i * 4 + 2], rgba[i * 4 + 3])
}

#[test]
fn visible_state_paints_matching_pixel() {
    let scheme = scheme_with(vec![param(1, 2, 1, &[(3, RED)])]);
    let out = decode(&[0b110u16], &scheme, 1, 1);
    assert_eq!(out.len(), 4);
    assert_eq!(pixel(&out, 0), RED);
}

#[test]
fn hidden_state_leaves_nodata() {
    let scheme = scheme_with(vec![param(1, 2, 1, &[])]);
    let out = decode(&[0b110u16], &scheme, 1, 1);
    assert_eq!(pixel(&out, 0), NODATA);
}

#[test]
fn non_matching_pixels_keep_nodata() {
    let scheme = scheme_with(vec![param(1, 2, 1, &[(3, RED)])]);
    let out = decode(&[0b110u8, 0b010, 0b111, 0], &scheme, 2, 2);
    assert_eq!(pixel(&out, 0), RED);
    assert_eq!(pixel(&out, 1), NODATA);
    assert_eq!(pixel(&out, 2), RED);
    assert_eq!(pixel(&out, 3), NODATA);
}

#[test]
fn higher_z_wins_on_shared_bit() {
    for (za, zb, expected) in [(1, 2, GREEN), (2, 1, RED)] {
        let a = param(0, 2, za, &[(3, RED)]);
        let b = param(1, 1, zb, &[(1, GREEN)]);
        let out = decode(&[0b011u32], &scheme_with(vec![a, b]), 1, 1);
        assert_eq!(pixel(&out, 0), expected, "z(a)={za} z(b)={zb}");
    }
}

#[test]
fn equal_z_lower_first_bit_wins() {
    let a = param(0, 2, 1, &[(3, RED)]);
    let b = param(1, 1, 1, &[(1, GREEN)]);
    let out = decode(&[0b011u32], &scheme_with(vec![a.clone(), b.clone()]), 1, 1);
    assert_eq!(pixel(&out, 0), RED);
    let out = decode(&[0b011u32], &scheme_with(vec![b, a]), 1, 1);
    assert_eq!(pixel(&out, 0), RED);
}

#[test]
fn empty_scheme_is_all_nodata() {
    let scheme = scheme_with(Vec::new());
    for (w, h) in [(1, 1), (3, 2), (5, 7)] {
        let pixels: Vec<u16> = (0..(w * h) as u16).collect();
        let out = decode(&pixels, &scheme, w, h);
        assert_eq!(out.len(), w * h * 4);
        assert!(out.chunks(4).all(|px| px == NODATA.to_array()));
    }
}

#[test]
fn combined_flags_share_one_color() {
    let combined = Rgba::rgb(9, 99, 199);
    let mut scheme = scheme_with(vec![
        param(0, 1, 1, &[(1, RED)]),
        param(1, 1, 1, &[(1, GREEN)]),
    ]);
    scheme.set_combine_flags(true);
    scheme.set_combined_flags_color(combined);

    let out = decode(&[0b01u8, 0b10, 0b00], &scheme, 3, 1);
    assert_eq!(pixel(&out, 0), combined);
    assert_eq!(pixel(&out, 1), combined);
    assert_eq!(pixel(&out, 2), NODATA);
}

#[test]
fn signed_samples_use_bit_pattern() {
    let scheme = scheme_with(vec![param(7, 1, 1, &[(1, RED)])]);
    let out = decode(&[-1i8, 1], &scheme, 2, 1);
    assert_eq!(pixel(&out, 0), RED);
    assert_eq!(pixel(&out, 1), NODATA);

    let scheme = scheme_with(vec![param(15, 1, 1, &[(1, GREEN)])]);
    let out = decode(&[i16::MIN], &scheme, 1, 1);
    assert_eq!(pixel(&out, 0), GREEN);
}

#[test]
fn range_past_sample_width_reads_zero() {
    let scheme = scheme_with(vec![param(8, 2, 1, &[(0, RED)])]);
    let out = decode(&[u8::MAX], &scheme, 1, 1);
    assert_eq!(pixel(&out, 0), RED);
}

#[test]
fn float_blocks_render_nodata() {
    let scheme = scheme_with(vec![param(0, 1, 1, &[(0, RED), (1, RED)])]);
    let block = BandBlock::F32(Raster::filled(2, 2, 1.0));
    let out = decode_block(&block, &scheme);
    assert!(out.chunks(4).all(|px| px == NODATA.to_array()));

    let block = BandBlock::U16(Raster::filled(2, 2, 1));
    let out = decode_block(&block, &scheme);
    assert!(out.chunks(4).all(|px| px == RED.to_array()));
}

#[test]
fn render_band_reads_window() {
    let raster = Raster::<u16>::from_vec(vec![0, 1, 2, 3, 4, 5], 2, 3).unwrap();
    let reader = TiffBandReader::from_bands(vec![BandBlock::U16(raster)]).unwrap();
    let scheme = scheme_with(vec![param(0, 1, 1, &[(1, GREEN)])]);

    let window = PixelWindow {
        row_off: 1,
        col_off: 0,
        rows: 1,
        cols: 3,
    };
    let out = render_band(&reader, 1, &window, &scheme).unwrap();
    assert_eq!(out.len(), 12);
    assert_eq!(pixel(&out, 0), GREEN);
    assert_eq!(pixel(&out, 1), NODATA);
    assert_eq!(pixel(&out, 2), GREEN);

    assert!(render_band(&reader, 2, &window, &scheme).is_err());
}
