//! Clipboard and drag-and-drop payloads.
//!
//! A payload maps format names to bytes. Parameter selections travel as a
//! `<BitFlagParameters>` document under [`PARAMETERS_MIME_TYPE`]; whole
//! schemes as a `<root>` document under [`SCHEME_MIME_TYPE`].

use crate::error::{Error, Result};
use crate::io::xml;
use crate::model::{FlagParameter, FlagScheme};

pub const PARAMETERS_MIME_TYPE: &str = "xml/bitflagscheme";
pub const SCHEME_MIME_TYPE: &str = "applications/bitflagrenderer/bitflagscheme";

const SCHEME_ROOT_TAG: &str = "root";

/// Format-keyed transfer data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MimeData {
    entries: Vec<(String, Vec<u8>)>,
}

impl MimeData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `data` under `format`, replacing earlier data of that format
    pub fn set_data(&mut self, format: impl Into<String>, data: Vec<u8>) {
        let format = format.into();
        match self.entries.iter_mut().find(|(f, _)| *f == format) {
            Some(entry) => entry.1 = data,
            None => self.entries.push((format, data)),
        }
    }

    pub fn data(&self, format: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|(f, _)| f == format)
            .map(|(_, d)| d.as_slice())
    }

    pub fn has_format(&self, format: &str) -> bool {
        self.data(format).is_some()
    }

    pub fn formats(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(f, _)| f.as_str())
    }

    fn text(&self, format: &str) -> Result<&str> {
        let bytes = self
            .data(format)
            .ok_or_else(|| Error::UnknownMimeFormat(format.to_string()))?;
        std::str::from_utf8(bytes).map_err(|e| Error::Xml(e.to_string()))
    }
}

/// Payload for a parameter selection
pub fn parameters_to_mime(parameters: &[FlagParameter]) -> Result<MimeData> {
    let mut mime = MimeData::new();
    mime.set_data(PARAMETERS_MIME_TYPE, xml::parameters_to_xml(parameters)?.into_bytes());
    Ok(mime)
}

/// Parameters carried by a payload, in document order
pub fn parameters_from_mime(mime: &MimeData) -> Result<Vec<FlagParameter>> {
    xml::parameters_from_xml(mime.text(PARAMETERS_MIME_TYPE)?)
}

/// Payload for a whole scheme
pub fn scheme_to_mime(scheme: &FlagScheme) -> Result<MimeData> {
    let text = xml::schemes_to_xml_with_root(std::slice::from_ref(scheme), SCHEME_ROOT_TAG)?;
    let mut mime = MimeData::new();
    mime.set_data(SCHEME_MIME_TYPE, text.into_bytes());
    Ok(mime)
}

/// The scheme carried by a payload
pub fn scheme_from_mime(mime: &MimeData) -> Result<FlagScheme> {
    xml::scheme_from_xml_str(mime.text(SCHEME_MIME_TYPE)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_data_replaces_format() {
        let mut mime = MimeData::new();
        mime.set_data("a", vec![1]);
        mime.set_data("b", vec![2]);
        mime.set_data("a", vec![3]);
        assert_eq!(mime.data("a"), Some(&[3u8][..]));
        assert_eq!(mime.formats().collect::<Vec<_>>(), vec!["a", "b"]);
        assert!(!mime.has_format("c"));
    }

    #[test]
    fn unknown_format_is_reported() {
        let mime = MimeData::new();
        assert!(matches!(
            parameters_from_mime(&mime),
            Err(Error::UnknownMimeFormat(_))
        ));
        assert!(matches!(
            scheme_from_mime(&mime),
            Err(Error::UnknownMimeFormat(_))
        ));
    }

    #[test]
    fn scheme_payload_uses_generic_root() {
        let scheme = FlagScheme::new("clip");
        let mime = scheme_to_mime(&scheme).unwrap();
        let text = std::str::from_utf8(mime.data(SCHEME_MIME_TYPE).unwrap()).unwrap();
        assert!(text.contains("<root>"));
        assert_eq!(scheme_from_mime(&mime).unwrap(), scheme);
    }

    #[test]
    fn parameter_payload_keeps_order() {
        let params = vec![
            FlagParameter::new("b", 4, 1).unwrap(),
            FlagParameter::new("a", 0, 2).unwrap(),
        ];
        let mime = parameters_to_mime(&params).unwrap();
        assert!(mime.has_format(PARAMETERS_MIME_TYPE));
        assert_eq!(parameters_from_mime(&mime).unwrap(), params);
    }
}
