//! Reading and writing scheme documents and raster bands

mod catalog;
pub mod json;
pub mod mime;
mod native;
pub mod xml;

pub use catalog::SchemeCatalog;
pub use json::{scheme_from_json, scheme_to_json};
pub use mime::{
    parameters_from_mime, parameters_to_mime, scheme_from_mime, scheme_to_mime, MimeData,
    PARAMETERS_MIME_TYPE, SCHEME_MIME_TYPE,
};
pub use native::{write_rgba_tiff, write_rgba_tiff_to_buffer, TiffBandReader};
pub use xml::{
    parameters_from_xml, parameters_to_xml, scheme_from_xml_str, schemes_from_file,
    schemes_from_xml, schemes_to_xml, write_xml_file,
};
