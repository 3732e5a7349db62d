//! A named, contiguous bit range and its states.

use std::ops::{Index, IndexMut};

use super::bit_range::bit_range_text;
use super::state::FlagState;
use crate::color::{next_color, HueStep, Rgba};
use crate::error::{Error, Result};

/// Largest bit count a parameter may declare.
pub const MAX_BIT_COUNT: u32 = 128;

/// Largest bit count whose `2^n` state table is actually materialized.
pub const MAX_STORED_BIT_COUNT: u32 = 16;

/// Highest bit a parameter may start at.
pub const MAX_FIRST_BIT: u32 = 255;

/// Default z-value of a new parameter.
pub const DEFAULT_Z_VALUE: i32 = 1;

/// A contiguous bit range `[first_bit, first_bit + bit_count)` of a pixel
/// value, interpreted as one multi-valued flag.
///
/// Always owns exactly `2^bit_count` states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagParameter {
    name: String,
    description: Option<String>,
    first_bit: u32,
    bit_count: u32,
    z_value: i32,
    states: Vec<FlagState>,
}

fn check_bit_count(bit_count: u32) -> Result<()> {
    if !(1..=MAX_BIT_COUNT).contains(&bit_count) {
        return Err(Error::InvalidParameter {
            name: "bit_count",
            value: bit_count.to_string(),
            reason: format!("must be in [1, {MAX_BIT_COUNT}]"),
        });
    }
    if bit_count > MAX_STORED_BIT_COUNT {
        return Err(Error::InvalidParameter {
            name: "bit_count",
            value: bit_count.to_string(),
            reason: format!("2^{bit_count} states exceed the supported maximum of 2^{MAX_STORED_BIT_COUNT}"),
        });
    }
    Ok(())
}

fn check_first_bit(first_bit: u32) -> Result<()> {
    if first_bit > MAX_FIRST_BIT {
        return Err(Error::InvalidParameter {
            name: "first_bit",
            value: first_bit.to_string(),
            reason: format!("must be at most {MAX_FIRST_BIT}"),
        });
    }
    Ok(())
}

impl FlagParameter {
    /// Create a parameter with generated default states.
    ///
    /// State 0 is `"No"`, white and hidden. For single-bit parameters state 1
    /// is `"Yes"`, black and hidden. All other states get colors stepped from
    /// a seed derived from `first_bit`, so the result is reproducible.
    pub fn new(name: impl Into<String>, first_bit: u32, bit_count: u32) -> Result<Self> {
        check_first_bit(first_bit)?;
        check_bit_count(bit_count)?;

        let seed = (0..=first_bit).fold(Rgba::BLACK, |c, _| next_color(c, HueStep::Categorical));
        let mut color = seed;
        let mut states = Vec::with_capacity(1 << bit_count);
        for value in 0..(1u32 << bit_count) {
            color = next_color(color, HueStep::Sequential);
            states.push(FlagState::with_color(first_bit, value, color));
        }

        states[0].set_values(Some("No"), Some(Rgba::WHITE), Some(false));
        if bit_count == 1 {
            states[1].set_values(Some("Yes"), Some(Rgba::BLACK), Some(false));
        }

        Ok(Self {
            name: name.into(),
            description: None,
            first_bit,
            bit_count,
            z_value: DEFAULT_Z_VALUE,
            states,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    pub fn first_bit(&self) -> u32 {
        self.first_bit
    }

    /// Last bit covered by this parameter.
    pub fn last_bit(&self) -> u32 {
        self.first_bit.saturating_add(self.bit_count - 1)
    }

    pub fn bit_count(&self) -> u32 {
        self.bit_count
    }

    pub fn z_value(&self) -> i32 {
        self.z_value
    }

    pub fn set_z_value(&mut self, z: i32) {
        self.z_value = z;
    }

    /// `"3"` or `"3-5"`.
    pub fn bit_position_text(&self) -> String {
        bit_range_text(self.first_bit, self.bit_count)
    }

    /// Move the range. States keep value, name and color.
    pub fn set_first_bit(&mut self, first_bit: u32) -> Result<()> {
        check_first_bit(first_bit)?;
        self.first_bit = first_bit;
        for state in &mut self.states {
            state.set_bit_shift(first_bit);
        }
        Ok(())
    }

    /// Resize the range to `bit_count` bits.
    ///
    /// Growing appends default states numbered from the current length;
    /// shrinking drops trailing states and leaves the others untouched.
    pub fn set_bit_count(&mut self, bit_count: u32) -> Result<()> {
        check_bit_count(bit_count)?;
        let n1 = self.states.len();
        let n2 = 1usize << bit_count;
        if n2 > n1 {
            self.states
                .extend((n1..n2).map(|v| FlagState::new(self.first_bit, v as u32)));
        } else {
            self.states.truncate(n2);
        }
        self.bit_count = bit_count;
        Ok(())
    }

    pub fn states(&self) -> &[FlagState] {
        &self.states
    }

    pub fn state(&self, row: usize) -> Option<&FlagState> {
        self.states.get(row)
    }

    pub fn state_mut(&mut self, row: usize) -> Option<&mut FlagState> {
        self.states.get_mut(row)
    }

    /// Replace the state at `row`, rebasing it onto this parameter's bit
    /// shift. Returns `false` if `row` is out of range.
    pub fn replace_state(&mut self, row: usize, mut state: FlagState) -> bool {
        match self.states.get_mut(row) {
            Some(slot) => {
                state.set_bit_shift(self.first_bit);
                *slot = state;
                true
            }
            None => false,
        }
    }

    pub fn visible_states(&self) -> impl Iterator<Item = &FlagState> {
        self.states.iter().filter(|s| s.is_visible())
    }

    pub fn contains(&self, state: &FlagState) -> bool {
        self.states.contains(state)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FlagState> {
        self.states.iter()
    }
}

impl Index<usize> for FlagParameter {
    type Output = FlagState;

    fn index(&self, row: usize) -> &FlagState {
        &self.states[row]
    }
}

impl IndexMut<usize> for FlagParameter {
    fn index_mut(&mut self, row: usize) -> &mut FlagState {
        &mut self.states[row]
    }
}

impl<'a> IntoIterator for &'a FlagParameter {
    type Item = &'a FlagState;
    type IntoIter = std::slice::Iter<'a, FlagState>;

    fn into_iter(self) -> Self::IntoIter {
        self.states.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_bit_defaults() {
        let p = FlagParameter::new("Cloud", 4, 1).unwrap();
        assert_eq!(p.len(), 2);
        assert_eq!(p[0].name(), "No");
        assert_eq!(p[0].color(), Rgba::WHITE);
        assert_eq!(p[1].name(), "Yes");
        assert_eq!(p[1].color(), Rgba::BLACK);
        assert!(p.visible_states().next().is_none());
        assert_eq!(p.z_value(), DEFAULT_Z_VALUE);
        assert_eq!(p.last_bit(), 4);
    }

    #[test]
    fn multi_bit_defaults() {
        let p = FlagParameter::new("Confidence", 5, 2).unwrap();
        assert_eq!(p.len(), 4);
        assert_eq!(p[0].name(), "No");
        assert_eq!(p[3].name(), "state 4");
        assert_eq!(p.last_bit(), 6);
        assert_eq!(p.bit_position_text(), "5-6");
        for (i, s) in p.iter().enumerate() {
            assert_eq!(s.value() as usize, i);
            assert_eq!(s.bit_shift(), 5);
        }
    }

    #[test]
    fn default_colors_are_reproducible() {
        let a = FlagParameter::new("a", 3, 3).unwrap();
        let b = FlagParameter::new("a", 3, 3).unwrap();
        assert_eq!(a, b);
        let c = FlagParameter::new("a", 4, 3).unwrap();
        assert_ne!(a[1].color(), c[1].color());
    }

    #[test]
    fn construction_rejects_bad_bit_counts() {
        assert!(FlagParameter::new("x", 0, 0).is_err());
        assert!(FlagParameter::new("x", 0, 129).is_err());
        assert!(FlagParameter::new("x", 0, MAX_STORED_BIT_COUNT + 1).is_err());
    }

    #[test]
    fn first_bit_is_bounded() {
        let top = FlagParameter::new("top", MAX_FIRST_BIT, MAX_STORED_BIT_COUNT).unwrap();
        assert_eq!(top.last_bit(), MAX_FIRST_BIT + MAX_STORED_BIT_COUNT - 1);
        assert_eq!(top.bit_position_text(), "255-270");
        assert_eq!(top, FlagParameter::new("top", MAX_FIRST_BIT, MAX_STORED_BIT_COUNT).unwrap());

        assert!(FlagParameter::new("x", MAX_FIRST_BIT + 1, 1).is_err());
        assert!(FlagParameter::new("x", u32::MAX, 1).is_err());

        let mut p = FlagParameter::new("p", 2, 2).unwrap();
        assert!(p.set_first_bit(u32::MAX).is_err());
        assert_eq!(p.first_bit(), 2);
        assert!(p.iter().all(|s| s.bit_shift() == 2));
    }

    #[test]
    fn state_count_follows_bit_count() {
        let mut p = FlagParameter::new("p", 0, 1).unwrap();
        for n in [3u32, 1, 8, 2, 5, 4, 7, 6] {
            p.set_bit_count(n).unwrap();
            assert_eq!(p.len(), 1 << n);
            assert_eq!(p.bit_count(), n);
        }
    }

    #[test]
    fn grow_appends_numbered_states_and_shrink_keeps_survivors() {
        let mut p = FlagParameter::new("p", 2, 1).unwrap();
        p[1].set_name("kept");
        p.set_bit_count(2).unwrap();
        assert_eq!(p[1].name(), "kept");
        assert_eq!(p[2].value(), 2);
        assert_eq!(p[3].value(), 3);
        assert_eq!(p[3].bit_shift(), 2);

        p.set_bit_count(1).unwrap();
        assert_eq!(p.len(), 2);
        assert_eq!(p[1].name(), "kept");
        assert_eq!(p[1].value(), 1);
    }

    #[test]
    fn invalid_resize_leaves_parameter_untouched() {
        let mut p = FlagParameter::new("p", 0, 2).unwrap();
        assert!(p.set_bit_count(0).is_err());
        assert_eq!(p.len(), 4);
        assert_eq!(p.bit_count(), 2);
    }

    #[test]
    fn first_bit_propagates_to_states() {
        let mut p = FlagParameter::new("p", 0, 2).unwrap();
        p.set_first_bit(9).unwrap();
        assert_eq!(p.first_bit(), 9);
        assert!(p.iter().all(|s| s.bit_shift() == 9));
        assert_eq!(p[0].name(), "No");
    }

    #[test]
    fn replace_state_rebases_shift() {
        let mut p = FlagParameter::new("p", 3, 1).unwrap();
        let mut s = FlagState::new(0, 1);
        s.set_name("flagged");
        assert!(p.replace_state(1, s));
        assert_eq!(p[1].bit_shift(), 3);
        assert!(!p.replace_state(2, FlagState::new(0, 2)));
    }
}
