//! Built-in schemes for common quality assessment bands.

use crate::color::Rgba;
use crate::model::{FlagParameter, FlagScheme};

fn flag(name: &str, first_bit: u32, bit_count: u32) -> FlagParameter {
    // Preset bit counts are all within 1..=2.
    FlagParameter::new(name, first_bit, bit_count).expect("preset bit count is valid")
}

fn name_states(parameter: &mut FlagParameter, names: &[&str]) {
    for (row, name) in names.iter().enumerate() {
        if let Some(state) = parameter.state_mut(row) {
            state.set_name(*name);
        }
    }
}

fn confidence(name: &str, first_bit: u32) -> FlagParameter {
    let mut p = flag(name, first_bit, 2);
    name_states(&mut p, &["Not Determined", "Low", "Medium", "High"]);
    p
}

/// Landsat 8 Collection 1 Level-1 QA band
pub fn landsat8_qa() -> FlagScheme {
    let mut scheme = FlagScheme::new("Landsat 8 Collection 1 QA band bits");

    let mut saturation = flag("Radiometric Saturation", 2, 2);
    name_states(
        &mut saturation,
        &[
            "No bands contain saturation",
            "1-2 bands contain saturation",
            "3-4 bands contain saturation",
            "5 or more bands contain saturation",
        ],
    );

    let mut cloud = flag("Cloud", 4, 1);
    cloud[1].set_color(Rgba::rgb(128, 128, 128));

    scheme.set_parameters(vec![
        flag("Designated Fill", 0, 1),
        flag("Terrain Occlusion", 1, 1),
        saturation,
        cloud,
        confidence("Cloud Confidence", 5),
        confidence("Cloud Shadow Confidence", 7),
        confidence("Snow/Ice Confidence", 9),
        confidence("Cirrus Confidence", 11),
    ]);
    scheme
}

/// Landsat 4-5 TM QA band: the Landsat 8 layout without cirrus
pub fn landsat_tm_qa() -> FlagScheme {
    let mut scheme = landsat8_qa();
    scheme.set_name("Landsat 4-5 Collection 1 QA band bits");
    scheme.truncate_parameters(7);
    scheme
}

/// Landsat 1-5 MSS QA band: the first five Landsat 8 parameters
pub fn landsat_mss_qa() -> FlagScheme {
    let mut scheme = landsat8_qa();
    scheme.set_name("Landsat 1-5 MSS Collection 1 QA band bits");
    scheme.truncate_parameters(5);
    scheme
}

/// FORCE Quality Assurance Information, colored like FORCE overview images
pub fn force_qai() -> FlagScheme {
    let mut scheme = FlagScheme::new("FORCE Quality Assurance Information");

    let mut valid = flag("Valid data", 0, 1);
    name_states(&mut valid, &["valid", "no data"]);

    let mut cloud = flag("Cloud state", 1, 2);
    cloud[0].set_name("clear");
    cloud[1].set_values(Some("less confident cloud"), Some(Rgba::rgb(255, 0, 255)), Some(true));
    cloud[2].set_values(Some("confident, opaque cloud"), Some(Rgba::rgb(255, 0, 255)), Some(true));
    cloud[3].set_values(Some("cirrus"), Some(Rgba::rgb(255, 0, 0)), Some(true));

    let mut shadow = flag("Cloud shadow", 3, 1);
    shadow[1].set_values(None, Some(Rgba::rgb(0, 255, 255)), Some(true));

    let mut snow = flag("Snow", 4, 1);
    snow[1].set_values(None, Some(Rgba::rgb(255, 255, 0)), Some(true));

    let mut water = flag("Water", 5, 1);
    water[1].set_values(None, Some(Rgba::rgb(0, 0, 255)), Some(false));

    let mut aerosol = flag("Aerosol", 6, 2);
    name_states(&mut aerosol, &["estimated", "interpolated", "high", "fill"]);

    let mut subzero = flag("Subzero", 8, 1);
    subzero[1].set_values(None, Some(Rgba::rgb(34, 177, 76)), Some(true));

    let mut saturation = flag("Saturation", 9, 1);
    saturation[1].set_values(None, Some(Rgba::rgb(255, 127, 39)), Some(true));

    let mut illumination = flag("Illumination", 11, 2);
    name_states(&mut illumination, &["good", "low", "poor", "shadow"]);

    let mut vapor = flag("Water vapor", 14, 1);
    name_states(&mut vapor, &["measured", "fill"]);

    scheme.set_parameters(vec![
        valid,
        cloud,
        shadow,
        snow,
        water,
        aerosol,
        subzero,
        saturation,
        flag("High sun zenith", 10, 1),
        illumination,
        flag("Slope", 13, 1),
        vapor,
    ]);
    scheme
}

/// All built-in schemes, in catalog order
pub fn builtin_schemes() -> Vec<FlagScheme> {
    vec![landsat8_qa(), landsat_tm_qa(), landsat_mss_qa(), force_qai()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landsat_variants_share_layout() {
        let l8 = landsat8_qa();
        let tm = landsat_tm_qa();
        let mss = landsat_mss_qa();
        assert_eq!(l8.len(), 8);
        assert_eq!(tm.len(), 7);
        assert_eq!(mss.len(), 5);
        assert_eq!(tm.parameters(), &l8.parameters()[..7]);
        assert_eq!(l8[2][3].name(), "5 or more bands contain saturation");
        assert_eq!(l8[3][1].color(), Rgba::rgb(128, 128, 128));
    }

    #[test]
    fn force_qai_layout() {
        let scheme = force_qai();
        assert_eq!(scheme.len(), 12);
        let last = scheme.iter().map(|p| p.last_bit()).max().unwrap();
        assert_eq!(last, 14);
        assert!(scheme[1][3].is_visible());
        assert!(!scheme[4][1].is_visible());
        assert_eq!(scheme.visible_states().len(), 7);
    }

    #[test]
    fn builtin_names_are_unique() {
        let schemes = builtin_schemes();
        let mut names: Vec<_> = schemes.iter().map(|s| s.name().to_string()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), schemes.len());
    }
}
