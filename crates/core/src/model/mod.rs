//! Bit flag scheme data model

mod bit_range;
mod parameter;
mod scheme;
mod state;

pub use bit_range::{bit_range_text, parse_bit_range};
pub use parameter::{
    FlagParameter, DEFAULT_Z_VALUE, MAX_BIT_COUNT, MAX_FIRST_BIT, MAX_STORED_BIT_COUNT,
};
pub use scheme::{FlagScheme, LegendItem, DEFAULT_SCHEME_NAME};
pub use state::FlagState;
