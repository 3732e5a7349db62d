//! A complete set of bit range interpretations for one band.

use std::cmp::Reverse;
use std::ops::Index;

use super::parameter::FlagParameter;
use super::state::FlagState;
use crate::color::Rgba;

/// Name used by [`FlagScheme::default`].
pub const DEFAULT_SCHEME_NAME: &str = "unspecified name";

/// Label and color for one legend row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendItem {
    pub label: String,
    pub color: Rgba,
}

impl LegendItem {
    pub fn new(label: impl Into<String>, color: Rgba) -> Self {
        Self {
            label: label.into(),
            color,
        }
    }
}

/// Color used for legend rows that only act as headings.
const LEGEND_HEADING_COLOR: Rgba = Rgba::new(0, 255, 0, 0);

/// An ordered list of parameters plus the rendering-wide defaults.
///
/// Parameters may overlap; [`FlagScheme::paint_order`] decides which one
/// wins. Cloning is a deep copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagScheme {
    name: String,
    no_data_color: Rgba,
    combine_flags: bool,
    combined_flags_color: Rgba,
    parameters: Vec<FlagParameter>,
}

impl Default for FlagScheme {
    fn default() -> Self {
        Self::new(DEFAULT_SCHEME_NAME)
    }
}

impl FlagScheme {
    /// Create an empty scheme.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            no_data_color: Rgba::TRANSPARENT,
            combine_flags: false,
            combined_flags_color: Rgba::YELLOW,
            parameters: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn no_data_color(&self) -> Rgba {
        self.no_data_color
    }

    pub fn set_no_data_color(&mut self, color: Rgba) {
        self.no_data_color = color;
    }

    pub fn combine_flags(&self) -> bool {
        self.combine_flags
    }

    pub fn set_combine_flags(&mut self, combine: bool) {
        self.combine_flags = combine;
    }

    pub fn combined_flags_color(&self) -> Rgba {
        self.combined_flags_color
    }

    pub fn set_combined_flags_color(&mut self, color: Rgba) {
        self.combined_flags_color = color;
    }

    /// Append a parameter.
    pub fn add_parameter(&mut self, parameter: FlagParameter) {
        self.parameters.push(parameter);
    }

    /// Remove and return the parameter at `index`.
    pub fn remove_parameter(&mut self, index: usize) -> Option<FlagParameter> {
        (index < self.parameters.len()).then(|| self.parameters.remove(index))
    }

    /// Replace all parameters.
    pub fn set_parameters(&mut self, parameters: Vec<FlagParameter>) {
        self.parameters = parameters;
    }

    /// Keep only the first `len` parameters.
    pub fn truncate_parameters(&mut self, len: usize) {
        self.parameters.truncate(len);
    }

    pub fn parameters(&self) -> &[FlagParameter] {
        &self.parameters
    }

    pub fn parameter(&self, index: usize) -> Option<&FlagParameter> {
        self.parameters.get(index)
    }

    pub fn parameter_mut(&mut self, index: usize) -> Option<&mut FlagParameter> {
        self.parameters.get_mut(index)
    }

    pub fn contains(&self, parameter: &FlagParameter) -> bool {
        self.parameters.contains(parameter)
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FlagParameter> {
        self.parameters.iter()
    }

    /// All visible states across all parameters, in parameter order.
    pub fn visible_states(&self) -> Vec<&FlagState> {
        self.parameters
            .iter()
            .flat_map(|p| p.visible_states())
            .collect()
    }

    /// Parameters in the order they are painted.
    ///
    /// Sorted by z-value ascending, then `first_bit` descending; full ties
    /// keep reverse stored order. The last painted parameter wins where bit
    /// ranges overlap, so higher z wins and, at equal z, the lower
    /// `first_bit` wins.
    pub fn paint_order(&self) -> Vec<&FlagParameter> {
        let mut order: Vec<&FlagParameter> = self.parameters.iter().rev().collect();
        order.sort_by_key(|p| (p.z_value(), Reverse(p.first_bit())));
        order
    }

    /// Legend rows: the scheme name, then for every parameter with visible
    /// states a `[name]` heading followed by those states.
    pub fn legend_items(&self) -> Vec<LegendItem> {
        let mut items = vec![LegendItem::new(self.name.clone(), LEGEND_HEADING_COLOR)];
        for parameter in &self.parameters {
            let mut visible = parameter.visible_states().peekable();
            if visible.peek().is_none() {
                continue;
            }
            items.push(LegendItem::new(
                format!("[{}]", parameter.name()),
                LEGEND_HEADING_COLOR,
            ));
            for state in visible {
                let color = if self.combine_flags {
                    self.combined_flags_color
                } else {
                    state.color()
                };
                items.push(LegendItem::new(state.name(), color));
            }
        }
        items
    }
}

impl Index<usize> for FlagScheme {
    type Output = FlagParameter;

    fn index(&self, index: usize) -> &FlagParameter {
        &self.parameters[index]
    }
}

impl<'a> IntoIterator for &'a FlagScheme {
    type Item = &'a FlagParameter;
    type IntoIter = std::slice::Iter<'a, FlagParameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.parameters.iter()
    }
}
