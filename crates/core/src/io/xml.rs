//! Tag-attribute tree (XML) form of schemes and parameters.
//!
//! ```text
//! <BitFlagSchemes>
//!   <BitFlagScheme name=".." noDataColor="#aarrggbb" combineFlags="false" combinedFlagsColor="#aarrggbb">
//!     <BitFlagParameter name=".." firstBit="1" bitCount="2" z="1">
//!       <BitFlagState name=".." visible="true" color="#aarrggbb" number="0"/>
//!     </BitFlagParameter>
//!   </BitFlagScheme>
//! </BitFlagSchemes>
//! ```
//!
//! Reading is lenient about where the nodes sit: every `BitFlagScheme`
//! element of a document is read, and a scheme's parameters are all
//! `BitFlagParameter` elements below it.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};
use tracing::{debug, warn};

use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::model::{FlagParameter, FlagScheme, FlagState, DEFAULT_Z_VALUE};

pub const SCHEMES_TAG: &str = "BitFlagSchemes";
pub const SCHEME_TAG: &str = "BitFlagScheme";
pub const PARAMETERS_TAG: &str = "BitFlagParameters";
pub const PARAMETER_TAG: &str = "BitFlagParameter";
pub const STATE_TAG: &str = "BitFlagState";

fn xml_err(e: impl std::fmt::Display) -> Error {
    Error::Xml(e.to_string())
}

/// A parsed element with its attributes and child elements.
#[derive(Debug, Default)]
pub(crate) struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
}

impl Element {
    fn from_start(start: &BytesStart<'_>) -> Result<Self> {
        let name = std::str::from_utf8(start.name().as_ref())
            .map_err(xml_err)?
            .to_string();
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(xml_err)?;
            let key = std::str::from_utf8(attr.key.as_ref())
                .map_err(xml_err)?
                .to_string();
            let value = attr.unescape_value().map_err(xml_err)?.into_owned();
            attributes.push((key, value));
        }
        Ok(Self {
            name,
            attributes,
            children: Vec::new(),
        })
    }

    fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn required<T: FromStr>(&self, key: &'static str) -> Result<T> {
        let raw = self
            .attribute(key)
            .ok_or_else(|| Error::Xml(format!("<{}> lacks attribute '{}'", self.name, key)))?;
        raw.trim().parse().map_err(|_| Error::InvalidParameter {
            name: key,
            value: raw.to_string(),
            reason: format!("not a valid value in <{}>", self.name),
        })
    }

    fn color_or(&self, key: &str, default: Rgba) -> Result<Rgba> {
        match self.attribute(key) {
            None | Some("") => Ok(default),
            Some(raw) => raw.parse(),
        }
    }

    /// This element and all elements below it named `name`, document order.
    fn descendants<'a>(&'a self, name: &str, out: &mut Vec<&'a Element>) {
        if self.name == name {
            out.push(self);
        }
        for child in &self.children {
            child.descendants(name, out);
        }
    }

    fn find_all(&self, name: &str) -> Vec<&Element> {
        let mut out = Vec::new();
        for child in &self.children {
            child.descendants(name, &mut out);
        }
        out
    }
}

/// Parse a document into its root element.
pub(crate) fn parse_document(text: &str) -> Result<Element> {
    let mut reader = Reader::from_str(text);
    reader.trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = reader.read_event().map_err(xml_err)?;
        let finished = match event {
            Event::Start(start) => {
                stack.push(Element::from_start(&start)?);
                None
            }
            Event::Empty(start) => Some(Element::from_start(&start)?),
            Event::End(_) => Some(
                stack
                    .pop()
                    .ok_or_else(|| Error::Xml("unbalanced end tag".into()))?,
            ),
            Event::Eof => break,
            _ => None,
        };

        if let Some(element) = finished {
            match stack.last_mut() {
                Some(parent) => parent.children.push(element),
                None if root.is_none() => root = Some(element),
                None => return Err(Error::Xml("more than one root element".into())),
            }
        }
    }

    if !stack.is_empty() {
        return Err(Error::Xml("unexpected end of document".into()));
    }
    root.ok_or_else(|| Error::Xml("document has no root element".into()))
}

fn is_truthy(value: Option<&str>) -> bool {
    matches!(value.map(|v| v.trim().to_ascii_lowercase()).as_deref(), Some("true" | "1"))
}

fn state_from_element(element: &Element) -> Result<FlagState> {
    let number: u32 = element.required("number")?;
    let color = element.color_or("color", Rgba::WHITE)?;
    let mut state = FlagState::with_color(0, number, color);
    if let Some(name) = element.attribute("name") {
        state.set_name(name);
    }
    state.set_visible(is_truthy(element.attribute("visible")));
    state.set_description(element.attribute("description").map(str::to_string));
    Ok(state)
}

fn parameter_from_element(element: &Element) -> Result<FlagParameter> {
    let name = element.attribute("name").unwrap_or_default();
    let first_bit: u32 = element.required("firstBit")?;
    let bit_count: u32 = element.required("bitCount")?;
    let z = match element.attribute("z") {
        Some(_) => element.required("z")?,
        None => DEFAULT_Z_VALUE,
    };

    let mut parameter = FlagParameter::new(name, first_bit, bit_count)?;
    parameter.set_z_value(z);
    parameter.set_description(element.attribute("description").map(str::to_string));

    let states = element.find_all(STATE_TAG);
    for (row, node) in states.into_iter().take(parameter.len()).enumerate() {
        parameter.replace_state(row, state_from_element(node)?);
    }
    Ok(parameter)
}

fn scheme_from_element(element: &Element) -> Result<FlagScheme> {
    let mut scheme = FlagScheme::new(element.attribute("name").unwrap_or_default());
    scheme.set_no_data_color(element.color_or("noDataColor", Rgba::TRANSPARENT)?);
    scheme.set_combine_flags(is_truthy(element.attribute("combineFlags")));
    scheme.set_combined_flags_color(element.color_or("combinedFlagsColor", Rgba::YELLOW)?);
    for node in element.find_all(PARAMETER_TAG) {
        scheme.add_parameter(parameter_from_element(node)?);
    }
    Ok(scheme)
}

/// Every scheme in a document.
pub fn schemes_from_xml(text: &str) -> Result<Vec<FlagScheme>> {
    let root = parse_document(text)?;
    let mut nodes = Vec::new();
    root.descendants(SCHEME_TAG, &mut nodes);
    nodes.into_iter().map(scheme_from_element).collect()
}

/// The first scheme in a document.
pub fn scheme_from_xml_str(text: &str) -> Result<FlagScheme> {
    schemes_from_xml(text)?
        .into_iter()
        .next()
        .ok_or_else(|| Error::Xml(format!("no <{SCHEME_TAG}> element found")))
}

/// Every parameter in a document, regardless of the root element.
pub fn parameters_from_xml(text: &str) -> Result<Vec<FlagParameter>> {
    let root = parse_document(text)?;
    let mut nodes = Vec::new();
    root.descendants(PARAMETER_TAG, &mut nodes);
    nodes.into_iter().map(parameter_from_element).collect()
}

/// Read all schemes of a scheme file.
///
/// A missing or malformed file yields no schemes; the problem is logged.
pub fn schemes_from_file(path: impl AsRef<Path>) -> Vec<FlagScheme> {
    let path = path.as_ref();
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            warn!("cannot read scheme file {}: {}", path.display(), e);
            return Vec::new();
        }
    };
    match schemes_from_xml(&text) {
        Ok(schemes) => {
            debug!("{} scheme(s) in {}", schemes.len(), path.display());
            schemes
        }
        Err(e) => {
            warn!("skipping malformed scheme file {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

// ─── Writing ───────────────────────────────────────────────────────────

type XmlWriter = Writer<Vec<u8>>;

fn new_writer() -> Result<XmlWriter> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_err)?;
    Ok(writer)
}

fn finish(writer: XmlWriter) -> Result<String> {
    String::from_utf8(writer.into_inner()).map_err(xml_err)
}

fn open(writer: &mut XmlWriter, element: BytesStart<'_>) -> Result<()> {
    writer.write_event(Event::Start(element)).map_err(xml_err)
}

fn close(writer: &mut XmlWriter, name: &str) -> Result<()> {
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(xml_err)
}

fn write_state(writer: &mut XmlWriter, state: &FlagState) -> Result<()> {
    let mut element = BytesStart::new(STATE_TAG);
    element.push_attribute(("name", state.name()));
    element.push_attribute(("visible", if state.is_visible() { "true" } else { "false" }));
    element.push_attribute(("color", state.color().hex_argb().as_str()));
    element.push_attribute(("number", state.value().to_string().as_str()));
    if let Some(description) = state.description() {
        element.push_attribute(("description", description));
    }
    writer.write_event(Event::Empty(element)).map_err(xml_err)
}

fn write_parameter(writer: &mut XmlWriter, parameter: &FlagParameter) -> Result<()> {
    let mut element = BytesStart::new(PARAMETER_TAG);
    element.push_attribute(("name", parameter.name()));
    element.push_attribute(("firstBit", parameter.first_bit().to_string().as_str()));
    element.push_attribute(("bitCount", parameter.bit_count().to_string().as_str()));
    element.push_attribute(("z", parameter.z_value().to_string().as_str()));
    if let Some(description) = parameter.description() {
        element.push_attribute(("description", description));
    }
    open(writer, element)?;
    for state in parameter {
        write_state(writer, state)?;
    }
    close(writer, PARAMETER_TAG)
}

fn write_scheme(writer: &mut XmlWriter, scheme: &FlagScheme) -> Result<()> {
    let mut element = BytesStart::new(SCHEME_TAG);
    element.push_attribute(("name", scheme.name()));
    element.push_attribute(("noDataColor", scheme.no_data_color().hex_argb().as_str()));
    element.push_attribute(("combineFlags", if scheme.combine_flags() { "true" } else { "false" }));
    element.push_attribute((
        "combinedFlagsColor",
        scheme.combined_flags_color().hex_argb().as_str(),
    ));
    open(writer, element)?;
    for parameter in scheme {
        write_parameter(writer, parameter)?;
    }
    close(writer, SCHEME_TAG)
}

/// Serialize schemes under a `root_tag` element.
pub fn schemes_to_xml_with_root(schemes: &[FlagScheme], root_tag: &str) -> Result<String> {
    let mut writer = new_writer()?;
    open(&mut writer, BytesStart::new(root_tag))?;
    for scheme in schemes {
        write_scheme(&mut writer, scheme)?;
    }
    close(&mut writer, root_tag)?;
    finish(writer)
}

/// Serialize schemes as a `<BitFlagSchemes>` document.
pub fn schemes_to_xml(schemes: &[FlagScheme]) -> Result<String> {
    schemes_to_xml_with_root(schemes, SCHEMES_TAG)
}

/// Serialize parameters as a `<BitFlagParameters>` document.
pub fn parameters_to_xml(parameters: &[FlagParameter]) -> Result<String> {
    let mut writer = new_writer()?;
    open(&mut writer, BytesStart::new(PARAMETERS_TAG))?;
    for parameter in parameters {
        write_parameter(&mut writer, parameter)?;
    }
    close(&mut writer, PARAMETERS_TAG)?;
    finish(writer)
}

/// Write schemes to a scheme file.
pub fn write_xml_file(path: impl AsRef<Path>, schemes: &[FlagScheme]) -> Result<()> {
    let xml = schemes_to_xml(schemes)?;
    fs::write(path.as_ref(), xml)?;
    debug!("wrote {} scheme(s) to {}", schemes.len(), path.as_ref().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_nested_document() {
        let root = parse_document(
            r#"<?xml version="1.0"?><a x="1"><b/><c y="&amp;"><b/></c></a>"#,
        )
        .unwrap();
        assert_eq!(root.name, "a");
        assert_eq!(root.attribute("x"), Some("1"));
        assert_eq!(root.find_all("b").len(), 2);
        assert_eq!(root.children[1].attribute("y"), Some("&"));
    }

    #[test]
    fn parse_rejects_broken_documents() {
        assert!(parse_document("<a><b></a>").is_err());
        assert!(parse_document("<a>").is_err());
        assert!(parse_document("").is_err());
    }

    #[test]
    fn truthy_values() {
        assert!(is_truthy(Some("true")));
        assert!(is_truthy(Some("1")));
        assert!(is_truthy(Some("True")));
        assert!(!is_truthy(Some("0")));
        assert!(!is_truthy(Some("false")));
        assert!(!is_truthy(None));
    }

    #[test]
    fn state_number_and_visibility() {
        let xml = r##"<BitFlagParameters>
            <BitFlagParameter name="Cloud" firstBit="4" bitCount="1">
              <BitFlagState name="clear" visible="0" color="#ffffffff" number="0"/>
              <BitFlagState name="cloud" visible="1" color="#ff808080" number="1"/>
            </BitFlagParameter>
        </BitFlagParameters>"##;
        let params = parameters_from_xml(xml).unwrap();
        assert_eq!(params.len(), 1);
        let p = &params[0];
        assert_eq!(p.z_value(), DEFAULT_Z_VALUE);
        assert_eq!(p[1].name(), "cloud");
        assert!(p[1].is_visible());
        assert!(!p[0].is_visible());
        assert_eq!(p[1].bit_shift(), 4);
        assert_eq!(p[1].color(), Rgba::rgb(128, 128, 128));
    }

    #[test]
    fn extra_state_nodes_are_ignored() {
        let xml = r##"<BitFlagParameter name="p" firstBit="0" bitCount="1">
              <BitFlagState name="a" visible="true" color="#ff000000" number="0"/>
              <BitFlagState name="b" visible="true" color="#ff000000" number="1"/>
              <BitFlagState name="c" visible="true" color="#ff000000" number="2"/>
            </BitFlagParameter>"##;
        let params = parameters_from_xml(xml).unwrap();
        assert_eq!(params[0].len(), 2);
        assert_eq!(params[0][1].name(), "b");
    }

    #[test]
    fn missing_required_attribute_fails() {
        let xml = r#"<BitFlagParameter name="p" bitCount="1"/>"#;
        assert!(parameters_from_xml(xml).is_err());
    }

    #[test]
    fn written_document_uses_argb_colors() {
        let scheme = FlagScheme::new("doc");
        let xml = schemes_to_xml(&[scheme]).unwrap();
        assert!(xml.contains("<BitFlagSchemes>"));
        assert!(xml.contains(r##"noDataColor="#00000000""##));
        assert!(xml.contains(r##"combinedFlagsColor="#ffffff00""##));
    }
}
