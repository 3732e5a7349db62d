//! A single value of a bit range.

use std::cmp::Ordering;

use crate::color::{next_color, HueStep, Rgba};

/// One concrete value a [`FlagParameter`](super::FlagParameter) can take.
///
/// Two states are equal when their bit shift, value, name and color match;
/// visibility and description do not take part in equality.
#[derive(Debug, Clone)]
pub struct FlagState {
    bit_shift: u32,
    value: u32,
    name: String,
    description: Option<String>,
    color: Rgba,
    visible: bool,
}

impl FlagState {
    /// Create a hidden state with the default name and color for `value`.
    pub fn new(bit_shift: u32, value: u32) -> Self {
        Self::with_color(bit_shift, value, default_state_color(value))
    }

    /// Create a hidden state with the default name and the given color.
    pub fn with_color(bit_shift: u32, value: u32, color: Rgba) -> Self {
        Self {
            bit_shift,
            value,
            name: format!("state {}", value as u64 + 1),
            description: None,
            color,
            visible: false,
        }
    }

    /// Bit shift of the owning parameter.
    pub fn bit_shift(&self) -> u32 {
        self.bit_shift
    }

    pub(crate) fn set_bit_shift(&mut self, shift: u32) {
        self.bit_shift = shift;
    }

    /// Integer encoded by the owning parameter's bits.
    pub fn value(&self) -> u32 {
        self.value
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

    pub fn color(&self) -> Rgba {
        self.color
    }

    pub fn set_color(&mut self, color: Rgba) {
        self.color = color;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Set any subset of name, color and visibility.
    pub fn set_values(&mut self, name: Option<&str>, color: Option<Rgba>, visible: Option<bool>) {
        if let Some(name) = name {
            self.set_name(name);
        }
        if let Some(color) = color {
            self.color = color;
        }
        if let Some(visible) = visible {
            self.visible = visible;
        }
    }

    /// The value as a zero-padded binary string of `nbits` digits.
    pub fn bit_combination(&self, nbits: u32) -> String {
        format!("{:0width$b}", self.value, width = nbits as usize)
    }

    /// Order by owner bit shift, then by value.
    pub fn position_cmp(&self, other: &Self) -> Ordering {
        (self.bit_shift, self.value).cmp(&(other.bit_shift, other.value))
    }
}

impl PartialEq for FlagState {
    fn eq(&self, other: &Self) -> bool {
        self.bit_shift == other.bit_shift
            && self.value == other.value
            && self.name == other.name
            && self.color == other.color
    }
}

impl Eq for FlagState {}

/// Blue, stepped categorically once per value.
fn default_state_color(value: u32) -> Rgba {
    (0..value).fold(Rgba::BLUE, |c, _| next_color(c, HueStep::Categorical))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = FlagState::new(2, 0);
        assert_eq!(s.name(), "state 1");
        assert_eq!(s.color(), Rgba::BLUE);
        assert!(!s.is_visible());
        assert_eq!(s.bit_shift(), 2);
    }

    #[test]
    fn equality_ignores_visibility() {
        let a = FlagState::new(0, 1);
        let mut b = a.clone();
        b.set_visible(true);
        assert_eq!(a, b);
        b.set_name("other");
        assert_ne!(a, b);
    }

    #[test]
    fn bit_combination_is_padded() {
        let s = FlagState::new(0, 3);
        assert_eq!(s.bit_combination(4), "0011");
        assert_eq!(s.bit_combination(1), "11");
    }

    #[test]
    fn ordering_by_shift_then_value() {
        let a = FlagState::new(0, 3);
        let b = FlagState::new(1, 0);
        let c = FlagState::new(1, 2);
        assert_eq!(a.position_cmp(&b), Ordering::Less);
        assert_eq!(c.position_cmp(&b), Ordering::Greater);
    }

    #[test]
    fn set_values_partial() {
        let mut s = FlagState::new(0, 1);
        s.set_values(None, Some(Rgba::YELLOW), Some(true));
        assert_eq!(s.name(), "state 2");
        assert_eq!(s.color(), Rgba::YELLOW);
        assert!(s.is_visible());
    }
}
