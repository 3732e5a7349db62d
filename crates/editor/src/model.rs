//! Editable tree over the parameters and states of one scheme.

use std::cmp::Ordering;
use std::fmt;

use bitflag_core::config::{Settings, ZeroStatePolicy, DEFAULT_MAX_BITS_PER_PARAMETER};
use bitflag_core::io::{parameters_from_mime, parameters_to_mime, MimeData, PARAMETERS_MIME_TYPE};
use bitflag_core::model::{parse_bit_range, MAX_STORED_BIT_COUNT};
use bitflag_core::{contrast_color, FlagParameter, FlagScheme, Result, Rgba};
use tracing::debug;

use crate::events::{ChangeKind, ModelEvent, ModelObserver};
use crate::index::{CheckState, Column, ItemFlags, NodeIndex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorOptions {
    /// Longest bit range a typed bit position may select
    pub max_bits_per_parameter: u32,
    pub zero_state_policy: ZeroStatePolicy,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            max_bits_per_parameter: DEFAULT_MAX_BITS_PER_PARAMETER,
            zero_state_policy: ZeroStatePolicy::Exclude,
        }
    }
}

impl From<&Settings> for EditorOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            max_bits_per_parameter: settings.max_bits_per_parameter,
            zero_state_policy: settings.zero_state_policy,
        }
    }
}

/// Parameters by first bit, then by their bit position text.
pub fn compare_parameters(a: &FlagParameter, b: &FlagParameter) -> Ordering {
    a.first_bit()
        .cmp(&b.first_bit())
        .then_with(|| a.bit_position_text().cmp(&b.bit_position_text()))
}

/// A scheme's parameters as root rows with their states as child rows.
///
/// The scheme-level fields (name, colors, combine flag) ride along so that
/// [`FlagTreeModel::to_scheme`] gives back a complete scheme.
pub struct FlagTreeModel {
    parameters: Vec<FlagParameter>,
    template: FlagScheme,
    options: EditorOptions,
    observers: Vec<Box<dyn ModelObserver>>,
    open_change: Option<ChangeKind>,
}

impl Default for FlagTreeModel {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FlagTreeModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlagTreeModel")
            .field("parameters", &self.parameters)
            .field("options", &self.options)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl FlagTreeModel {
    pub fn new() -> Self {
        Self::with_options(EditorOptions::default())
    }

    pub fn with_options(options: EditorOptions) -> Self {
        Self {
            parameters: Vec::new(),
            template: FlagScheme::default(),
            options,
            observers: Vec::new(),
            open_change: None,
        }
    }

    pub fn options(&self) -> EditorOptions {
        self.options
    }

    pub fn set_options(&mut self, options: EditorOptions) {
        self.options = options;
    }

    /// Attach an observer; it sees every later event
    pub fn subscribe(&mut self, observer: impl ModelObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn emit(&mut self, event: ModelEvent) {
        for observer in &mut self.observers {
            observer.notify(&event);
        }
    }

    /// Open a structural change. Must be closed by
    /// [`Self::end_structural_change`] before any other change begins.
    fn begin_structural_change(
        &mut self,
        kind: ChangeKind,
        parent: Option<NodeIndex>,
        first: usize,
        last: usize,
    ) {
        debug_assert!(self.open_change.is_none(), "structural changes do not nest");
        debug!("begin {:?} {:?} rows {}..={}", kind, parent, first, last);
        self.open_change = Some(kind);
        self.emit(ModelEvent::BeginChange {
            kind,
            parent,
            first,
            last,
        });
    }

    fn end_structural_change(&mut self) {
        if let Some(kind) = self.open_change.take() {
            self.emit(ModelEvent::EndChange { kind });
        }
    }

    fn data_changed(&mut self, index: NodeIndex, column: Column) {
        self.emit(ModelEvent::DataChanged { index, column });
    }

    // ─── Structure ────────────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    pub fn parameters(&self) -> &[FlagParameter] {
        &self.parameters
    }

    pub fn parameter(&self, row: usize) -> Option<&FlagParameter> {
        self.parameters.get(row)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FlagParameter> {
        self.parameters.iter()
    }

    pub fn contains(&self, parameter: &FlagParameter) -> bool {
        self.parameters.contains(parameter)
    }

    /// Rows below `parent`; `None` is the root
    pub fn row_count(&self, parent: Option<NodeIndex>) -> usize {
        match parent {
            None => self.parameters.len(),
            Some(NodeIndex::Parameter(row)) => self.parameters.get(row).map_or(0, |p| p.len()),
            Some(NodeIndex::State { .. }) => 0,
        }
    }

    pub fn column_count(&self) -> usize {
        Column::ALL.len()
    }

    /// Index of `row` below `parent`, if it exists
    pub fn index(&self, row: usize, parent: Option<NodeIndex>) -> Option<NodeIndex> {
        let index = match parent {
            None => NodeIndex::Parameter(row),
            Some(NodeIndex::Parameter(parameter)) => NodeIndex::state(parameter, row),
            Some(NodeIndex::State { .. }) => return None,
        };
        self.is_valid(index).then_some(index)
    }

    pub fn is_valid(&self, index: NodeIndex) -> bool {
        match index {
            NodeIndex::Parameter(row) => row < self.parameters.len(),
            NodeIndex::State { parameter, state } => self
                .parameters
                .get(parameter)
                .is_some_and(|p| state < p.len()),
        }
    }

    /// First bit after the highest bit any parameter uses
    pub fn next_free_bit(&self) -> u32 {
        self.parameters
            .iter()
            .map(|p| p.last_bit() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Insert a parameter at its sorted position.
    ///
    /// Returns `false` if an equal parameter is already present.
    pub fn add_parameter(&mut self, parameter: FlagParameter) -> bool {
        if self.contains(&parameter) {
            return false;
        }
        let row = self
            .parameters
            .partition_point(|p| compare_parameters(p, &parameter) != Ordering::Greater);
        self.begin_structural_change(ChangeKind::InsertRows, None, row, row);
        self.parameters.insert(row, parameter);
        self.end_structural_change();
        true
    }

    /// Remove the first parameter equal to `parameter`
    pub fn remove_parameter(&mut self, parameter: &FlagParameter) -> bool {
        match self.parameters.iter().position(|p| p == parameter) {
            Some(row) => self.remove_rows(row, 1),
            None => false,
        }
    }

    /// Remove `count` parameter rows starting at `row`
    pub fn remove_rows(&mut self, row: usize, count: usize) -> bool {
        if count == 0 || row + count > self.parameters.len() {
            return false;
        }
        self.begin_structural_change(ChangeKind::RemoveRows, None, row, row + count - 1);
        self.parameters.drain(row..row + count);
        self.end_structural_change();
        true
    }

    pub fn clear(&mut self) {
        if self.parameters.is_empty() {
            return;
        }
        let last = self.parameters.len() - 1;
        self.begin_structural_change(ChangeKind::RemoveRows, None, 0, last);
        self.parameters.clear();
        self.end_structural_change();
    }

    /// Reorder the parameters by [`compare_parameters`] (stable)
    pub fn sort(&mut self) {
        if self.parameters.len() < 2 {
            return;
        }
        let last = self.parameters.len() - 1;
        self.begin_structural_change(ChangeKind::Layout, None, 0, last);
        self.parameters.sort_by(compare_parameters);
        self.end_structural_change();
    }

    /// Replace the whole content with a scheme
    pub fn set_scheme(&mut self, scheme: &FlagScheme) {
        let last = self.parameters.len().saturating_sub(1);
        self.begin_structural_change(ChangeKind::Reset, None, 0, last);
        self.template = scheme.clone();
        self.template.set_parameters(Vec::new());
        self.parameters = scheme.parameters().to_vec();
        self.end_structural_change();
    }

    /// The edited tree as a scheme
    pub fn to_scheme(&self) -> FlagScheme {
        let mut scheme = self.template.clone();
        scheme.set_parameters(self.parameters.clone());
        scheme
    }

    // ─── Cells ────────────────────────────────────────────────────────

    /// Display text of a cell
    pub fn data(&self, index: NodeIndex, column: Column) -> Option<String> {
        match index {
            NodeIndex::Parameter(row) => {
                let p = self.parameters.get(row)?;
                match column {
                    Column::BitPosition => Some(p.bit_position_text()),
                    Column::Name => Some(p.name().to_string()),
                    Column::Color => Some(format!("Z={}", p.z_value())),
                    Column::BitCombination | Column::Number => None,
                }
            }
            NodeIndex::State { parameter, state } => {
                let p = self.parameters.get(parameter)?;
                let s = p.state(state)?;
                match column {
                    Column::BitPosition => None,
                    Column::Name => Some(s.name().to_string()),
                    Column::BitCombination => Some(s.bit_combination(p.bit_count())),
                    Column::Number => Some(s.value().to_string()),
                    Column::Color => Some(s.color().name()),
                }
            }
        }
    }

    pub fn tooltip(&self, index: NodeIndex, column: Column) -> Option<String> {
        match (index, column) {
            (NodeIndex::Parameter(row), Column::Name) => {
                self.parameters.get(row).map(|p| p.name().to_string())
            }
            _ => None,
        }
    }

    /// Fill color of a state's color cell
    pub fn background_color(&self, index: NodeIndex, column: Column) -> Option<Rgba> {
        match (index, column) {
            (NodeIndex::State { parameter, state }, Column::Color) => {
                Some(self.parameters.get(parameter)?.state(state)?.color())
            }
            _ => None,
        }
    }

    /// Text color readable on [`Self::background_color`]
    pub fn text_color(&self, index: NodeIndex, column: Column) -> Option<Rgba> {
        self.background_color(index, column).map(contrast_color)
    }

    pub fn flags(&self, index: NodeIndex, column: Column) -> ItemFlags {
        if !self.is_valid(index) {
            return ItemFlags::default();
        }
        let is_parameter = matches!(index, NodeIndex::Parameter(_));
        ItemFlags {
            enabled: true,
            selectable: true,
            checkable: column == Column::BitPosition,
            editable: column == Column::Name
                || (is_parameter && matches!(column, Column::BitPosition | Column::Color)),
        }
    }

    fn first_counted_state(&self) -> usize {
        match self.options.zero_state_policy {
            ZeroStatePolicy::Exclude => 1,
            ZeroStatePolicy::Include => 0,
        }
    }

    /// Visibility of a state, or the aggregate visibility of a parameter
    pub fn check_state(&self, index: NodeIndex) -> Option<CheckState> {
        match index {
            NodeIndex::Parameter(row) => {
                let p = self.parameters.get(row)?;
                let counted = p.states().get(self.first_counted_state()..).unwrap_or_default();
                let checked = counted.iter().filter(|s| s.is_visible()).count();
                Some(if checked == 0 {
                    CheckState::Unchecked
                } else if checked < counted.len() {
                    CheckState::PartiallyChecked
                } else {
                    CheckState::Checked
                })
            }
            NodeIndex::State { parameter, state } => {
                let s = self.parameters.get(parameter)?.state(state)?;
                Some(s.is_visible().into())
            }
        }
    }

    /// Set a state's visibility, or cascade a parameter's check state to
    /// its counted states.
    ///
    /// Returns whether anything changed.
    pub fn set_check_state(&mut self, index: NodeIndex, check: CheckState) -> bool {
        match index {
            NodeIndex::State { parameter, state } => {
                let visible = check == CheckState::Checked;
                let Some(s) = self
                    .parameters
                    .get_mut(parameter)
                    .and_then(|p| p.state_mut(state))
                else {
                    return false;
                };
                if s.is_visible() == visible {
                    return false;
                }
                s.set_visible(visible);
                self.data_changed(NodeIndex::Parameter(parameter), Column::BitPosition);
                self.data_changed(index, Column::BitPosition);
                true
            }
            NodeIndex::Parameter(row) => {
                if check == CheckState::PartiallyChecked || row >= self.parameters.len() {
                    return false;
                }
                let first = self.first_counted_state();
                let mut changed = false;
                for state in first..self.parameters[row].len() {
                    changed |= self.set_check_state(NodeIndex::state(row, state), check);
                }
                if changed {
                    self.data_changed(index, Column::BitPosition);
                }
                changed
            }
        }
    }

    /// Apply a typed edit to a cell.
    ///
    /// Unparseable input leaves the model untouched and returns `false`.
    pub fn set_data(&mut self, index: NodeIndex, column: Column, value: &str) -> bool {
        let changed = match index {
            NodeIndex::Parameter(row) if row < self.parameters.len() => match column {
                Column::Name => {
                    self.parameters[row].set_name(value);
                    true
                }
                Column::Color => match value.trim().parse::<i32>() {
                    Ok(z) => {
                        self.parameters[row].set_z_value(z);
                        true
                    }
                    Err(_) => false,
                },
                Column::BitPosition => self.set_bit_position(row, value),
                Column::BitCombination | Column::Number => false,
            },
            NodeIndex::State { parameter, state } => {
                let Some(s) = self
                    .parameters
                    .get_mut(parameter)
                    .and_then(|p| p.state_mut(state))
                else {
                    return false;
                };
                match column {
                    Column::Name => {
                        s.set_name(value);
                        true
                    }
                    Column::Color => match value.parse::<Rgba>() {
                        Ok(color) => {
                            s.set_color(color);
                            true
                        }
                        Err(_) => false,
                    },
                    _ => false,
                }
            }
            NodeIndex::Parameter(_) => false,
        };
        if changed {
            self.data_changed(index, column);
        }
        changed
    }

    /// Set a state's color directly
    pub fn set_color(&mut self, index: NodeIndex, color: Rgba) -> bool {
        let NodeIndex::State { parameter, state } = index else {
            return false;
        };
        let Some(s) = self
            .parameters
            .get_mut(parameter)
            .and_then(|p| p.state_mut(state))
        else {
            return false;
        };
        s.set_color(color);
        self.data_changed(index, Column::Color);
        true
    }

    /// Re-parse a parameter's bit position, bracketing any change in its
    /// number of state rows.
    fn set_bit_position(&mut self, row: usize, text: &str) -> bool {
        let Some((first_bit, bit_count)) =
            parse_bit_range(text, self.options.max_bits_per_parameter)
        else {
            return false;
        };
        if bit_count > MAX_STORED_BIT_COUNT {
            return false;
        }

        if self.parameters[row].set_first_bit(first_bit).is_err() {
            return false;
        }

        let n1 = self.parameters[row].len();
        let n2 = 1usize << bit_count;
        let parent = Some(NodeIndex::Parameter(row));
        match n2.cmp(&n1) {
            Ordering::Less => self.begin_structural_change(ChangeKind::RemoveRows, parent, n2, n1 - 1),
            Ordering::Greater => self.begin_structural_change(ChangeKind::InsertRows, parent, n1, n2 - 1),
            Ordering::Equal => {}
        }
        let resized = self.parameters[row].set_bit_count(bit_count);
        self.end_structural_change();
        resized.is_ok()
    }

    // ─── Transfer ─────────────────────────────────────────────────────

    /// Payload for the parameters among `indexes`, in row order.
    ///
    /// State indexes are ignored.
    pub fn mime_data(&self, indexes: &[NodeIndex]) -> Result<MimeData> {
        let mut rows: Vec<usize> = indexes
            .iter()
            .filter_map(|idx| match idx {
                NodeIndex::Parameter(row) if *row < self.parameters.len() => Some(*row),
                _ => None,
            })
            .collect();
        rows.sort_unstable();
        rows.dedup();
        let selected: Vec<FlagParameter> =
            rows.into_iter().map(|row| self.parameters[row].clone()).collect();
        parameters_to_mime(&selected)
    }

    /// Whether a payload can be dropped below `parent`.
    ///
    /// Parameters only go below the root.
    pub fn can_drop_mime_data(&self, data: &MimeData, parent: Option<NodeIndex>) -> bool {
        parent.is_none() && data.has_format(PARAMETERS_MIME_TYPE)
    }

    /// Insert the parameters of a payload at `row` (appended if `None`).
    ///
    /// Dropped parameters keep the payload order and are not re-sorted.
    pub fn drop_mime_data(
        &mut self,
        data: &MimeData,
        row: Option<usize>,
        parent: Option<NodeIndex>,
    ) -> bool {
        if !self.can_drop_mime_data(data, parent) {
            return false;
        }
        let dropped = match parameters_from_mime(data) {
            Ok(parameters) if !parameters.is_empty() => parameters,
            _ => return false,
        };
        let at = row.unwrap_or(self.parameters.len()).min(self.parameters.len());
        let n = dropped.len();
        self.begin_structural_change(ChangeKind::InsertRows, None, at, at + n - 1);
        self.parameters.splice(at..at, dropped);
        self.end_structural_change();
        true
    }
}

/// Outline of the tree: `first_bit:name` per parameter, then
/// `  bits:value` per state.
impl fmt::Display for FlagTreeModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, p) in self.parameters.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}:{}", p.first_bit(), p.name())?;
            for s in p {
                write!(f, "\n  {}:{}", s.bit_combination(p.bit_count()), s.value())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(name: &str, first_bit: u32, bit_count: u32) -> FlagParameter {
        FlagParameter::new(name, first_bit, bit_count).unwrap()
    }

    #[test]
    fn comparator_orders_by_first_bit_then_text() {
        assert_eq!(compare_parameters(&p("a", 1, 1), &p("b", 2, 1)), Ordering::Less);
        assert_eq!(compare_parameters(&p("a", 2, 2), &p("b", 2, 1)), Ordering::Greater);
        assert_eq!(compare_parameters(&p("a", 3, 1), &p("b", 3, 1)), Ordering::Equal);
    }

    #[test]
    fn sorted_insert_goes_after_equal_keys() {
        let mut model = FlagTreeModel::new();
        assert!(model.add_parameter(p("c", 4, 1)));
        assert!(model.add_parameter(p("a", 0, 2)));
        assert!(model.add_parameter(p("b", 4, 1)));
        let names: Vec<_> = model.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["a", "c", "b"]);
    }

    #[test]
    fn display_outline() {
        let mut model = FlagTreeModel::new();
        model.add_parameter(p("Fill", 0, 1));
        assert_eq!(model.to_string(), "0:Fill\n  0:0\n  1:1");
    }

    #[test]
    fn index_validation() {
        let mut model = FlagTreeModel::new();
        model.add_parameter(p("a", 0, 1));
        assert_eq!(model.index(0, None), Some(NodeIndex::Parameter(0)));
        assert_eq!(model.index(1, None), None);
        let param = Some(NodeIndex::Parameter(0));
        assert_eq!(model.index(1, param), Some(NodeIndex::state(0, 1)));
        assert_eq!(model.index(2, param), None);
        assert_eq!(model.index(0, Some(NodeIndex::state(0, 0))), None);
        assert_eq!(model.row_count(Some(NodeIndex::state(0, 0))), 0);
    }
}
