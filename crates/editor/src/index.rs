//! Node addressing, columns and per-cell attributes of the tree.

/// Position of a node in the two-level tree.
///
/// Parameters sit directly below the root; states below their parameter.
/// The parent of a state is derived from its index, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeIndex {
    Parameter(usize),
    State { parameter: usize, state: usize },
}

impl NodeIndex {
    pub fn state(parameter: usize, state: usize) -> Self {
        Self::State { parameter, state }
    }

    /// Row below the parent
    pub fn row(self) -> usize {
        match self {
            Self::Parameter(row) => row,
            Self::State { state, .. } => state,
        }
    }

    /// The owning parameter, `None` for parameters (whose parent is the root)
    pub fn parent(self) -> Option<NodeIndex> {
        match self {
            Self::Parameter(_) => None,
            Self::State { parameter, .. } => Some(Self::Parameter(parameter)),
        }
    }

    /// Row of the parameter this node belongs to
    pub fn parameter_row(self) -> usize {
        match self {
            Self::Parameter(row) => row,
            Self::State { parameter, .. } => parameter,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    /// "0" or "1-2"; carries the visibility check box
    BitPosition,
    Name,
    /// A state's value as zero-padded binary
    BitCombination,
    /// A state's value
    Number,
    /// State color, or a parameter's z-value
    Color,
}

impl Column {
    pub const ALL: [Column; 5] = [
        Column::BitPosition,
        Column::Name,
        Column::BitCombination,
        Column::Number,
        Column::Color,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::BitPosition => "Bit No.",
            Self::Name => "Name",
            Self::BitCombination => "Bits",
            Self::Number => "Num",
            Self::Color => "Color",
        }
    }

    pub fn tooltip(self) -> &'static str {
        match self {
            Self::BitPosition => "The Flag Parameters bit position(s), e.g. \"0\" or \"1-2\"",
            Self::Name => "Flag Parameter / Flag State name",
            Self::BitCombination => "Bit combination of the Flag State",
            Self::Number => "Number of bit combination within a Flag states's possible bit combinations",
            Self::Color => "Color of Flag State or Z-Value for colors of a Flag Parameter",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    Unchecked,
    PartiallyChecked,
    Checked,
}

impl From<bool> for CheckState {
    fn from(checked: bool) -> Self {
        if checked {
            Self::Checked
        } else {
            Self::Unchecked
        }
    }
}

/// What a view may do with a cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ItemFlags {
    pub enabled: bool,
    pub selectable: bool,
    pub editable: bool,
    pub checkable: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_parent_is_derived() {
        let idx = NodeIndex::state(2, 5);
        assert_eq!(idx.row(), 5);
        assert_eq!(idx.parent(), Some(NodeIndex::Parameter(2)));
        assert_eq!(NodeIndex::Parameter(3).parent(), None);
        assert_eq!(idx.parameter_row(), 2);
    }

    #[test]
    fn columns_round_trip_through_index() {
        for column in Column::ALL {
            assert_eq!(Column::from_index(column.index()), Some(column));
        }
        assert_eq!(Column::from_index(5), None);
        assert_eq!(Column::Number.title(), "Num");
    }
}
