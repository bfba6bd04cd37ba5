//! Shared plumbing for the XML table loaders.

use std::path::Path;

use roxmltree::{Document, Node, ParsingOptions};
use tracing::error;

use crate::{MappingError, MappingResult};

pub(crate) fn read(path: &Path) -> MappingResult<String> {
    std::fs::read_to_string(path).map_err(|source| {
        error!(path = %path.display(), %source, "cannot read mapping table");
        MappingError::Io {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Parse `text`, tolerating the DOCTYPE declarations the distributed tables carry.
pub(crate) fn parse<'a>(text: &'a str, path: &Path) -> MappingResult<Document<'a>> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    Document::parse_with_options(text, options).map_err(|source| {
        error!(path = %path.display(), %source, "cannot parse mapping table");
        MappingError::Xml {
            path: path.to_path_buf(),
            source,
        }
    })
}

pub(crate) fn required<'a>(node: Node<'a, '_>, attribute: &str, path: &Path) -> MappingResult<&'a str> {
    node.attribute(attribute).ok_or_else(|| {
        let element = node.tag_name().name().to_string();
        error!(path = %path.display(), element, attribute, "mapping table entry is incomplete");
        MappingError::MissingAttribute {
            path: path.to_path_buf(),
            element,
            attribute: attribute.to_string(),
        }
    })
}
