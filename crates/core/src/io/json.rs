//! JSON interchange form of a scheme.
//!
//! ```json
//! {"BitFlagScheme": {"name": "..", "noDataColor": "#00000000", "combineFlags": false,
//!   "combinedFlagsColor": "#ffffff00",
//!   "BitFlagParameters": [{"name": "..", "description": null, "offset": 0, "length": 2,
//!     "z": 1, "classes": [{"name": "..", "description": null, "value": 0,
//!                          "visible": false, "color": "#ffffffff"}]}]}}
//! ```

use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::error::Result;
use crate::model::{FlagParameter, FlagScheme, FlagState, DEFAULT_Z_VALUE};

#[derive(Debug, Serialize, Deserialize)]
struct SchemeDocument {
    #[serde(rename = "BitFlagScheme")]
    scheme: SchemeRecord,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SchemeRecord {
    name: String,
    #[serde(default)]
    no_data_color: Rgba,
    #[serde(default)]
    combine_flags: bool,
    #[serde(default = "default_combined_color")]
    combined_flags_color: Rgba,
    #[serde(rename = "BitFlagParameters", default)]
    parameters: Vec<ParameterRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ParameterRecord {
    name: String,
    #[serde(default)]
    description: Option<String>,
    offset: u32,
    length: u32,
    #[serde(default = "default_z")]
    z: i32,
    #[serde(default)]
    classes: Vec<ClassRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ClassRecord {
    name: String,
    #[serde(default)]
    description: Option<String>,
    value: u32,
    #[serde(default)]
    visible: bool,
    #[serde(default = "default_class_color")]
    color: Rgba,
}

fn default_combined_color() -> Rgba {
    Rgba::YELLOW
}

fn default_z() -> i32 {
    DEFAULT_Z_VALUE
}

fn default_class_color() -> Rgba {
    Rgba::WHITE
}

impl From<&FlagState> for ClassRecord {
    fn from(state: &FlagState) -> Self {
        Self {
            name: state.name().to_string(),
            description: state.description().map(str::to_string),
            value: state.value(),
            visible: state.is_visible(),
            color: state.color(),
        }
    }
}

impl From<&FlagParameter> for ParameterRecord {
    fn from(parameter: &FlagParameter) -> Self {
        Self {
            name: parameter.name().to_string(),
            description: parameter.description().map(str::to_string),
            offset: parameter.first_bit(),
            length: parameter.bit_count(),
            z: parameter.z_value(),
            classes: parameter.iter().map(ClassRecord::from).collect(),
        }
    }
}

impl ParameterRecord {
    fn into_parameter(self) -> Result<FlagParameter> {
        let mut parameter = FlagParameter::new(self.name, self.offset, self.length)?;
        parameter.set_description(self.description);
        parameter.set_z_value(self.z);
        let rows = parameter.len();
        for (row, class) in self.classes.into_iter().take(rows).enumerate() {
            let mut state = FlagState::with_color(self.offset, class.value, class.color);
            state.set_name(class.name);
            state.set_description(class.description);
            state.set_visible(class.visible);
            parameter.replace_state(row, state);
        }
        Ok(parameter)
    }
}

/// Serialize a scheme to pretty-printed JSON
pub fn scheme_to_json(scheme: &FlagScheme) -> Result<String> {
    let document = SchemeDocument {
        scheme: SchemeRecord {
            name: scheme.name().to_string(),
            no_data_color: scheme.no_data_color(),
            combine_flags: scheme.combine_flags(),
            combined_flags_color: scheme.combined_flags_color(),
            parameters: scheme.iter().map(ParameterRecord::from).collect(),
        },
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Parse a scheme from its JSON form
pub fn scheme_from_json(text: &str) -> Result<FlagScheme> {
    let document: SchemeDocument = serde_json::from_str(text)?;
    let record = document.scheme;

    let mut scheme = FlagScheme::new(record.name);
    scheme.set_no_data_color(record.no_data_color);
    scheme.set_combine_flags(record.combine_flags);
    scheme.set_combined_flags_color(record.combined_flags_color);
    for parameter in record.parameters {
        scheme.add_parameter(parameter.into_parameter()?);
    }
    Ok(scheme)
}
