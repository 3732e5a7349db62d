//! Legend entries for a scheme, without decoding any pixels.

use std::fmt;

use bitflag_core::{FlagScheme, LegendItem};

/// Ordered legend rows of a scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Legend {
    items: Vec<LegendItem>,
}

impl Legend {
    pub fn new(scheme: &FlagScheme) -> Self {
        Self {
            items: scheme.legend_items(),
        }
    }

    pub fn items(&self) -> &[LegendItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// One row per item: ARGB color, then label.
impl fmt::Display for Legend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for item in &self.items {
            writeln!(f, "{}  {}", item.color.hex_argb(), item.label)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitflag_core::FlagParameter;

    #[test]
    fn lists_visible_states_under_parameter_heading() {
        let mut scheme = FlagScheme::new("legend");
        let mut p = FlagParameter::new("Cloud", 4, 1).unwrap();
        p[1].set_visible(true);
        scheme.add_parameter(p);
        scheme.add_parameter(FlagParameter::new("Hidden", 5, 1).unwrap());

        let legend = Legend::new(&scheme);
        let labels: Vec<_> = legend.items().iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, vec!["legend", "[Cloud]", "Yes"]);

        let text = legend.to_string();
        assert_eq!(text.lines().count(), 3);
        assert!(text.lines().last().unwrap().ends_with("Yes"));
    }
}
