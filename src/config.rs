use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use encoding_rs::Encoding;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{YmlError, YmlResult};
use crate::xml::Indent;

/// Shop description elements accepted by default.
pub const DEFAULT_SHOP_INFO_ELEMENTS: &[&str] = &[
    "name", "company", "url", "platform", "version", "agency", "email",
];

/// Offer sub-elements accepted by default.
pub const DEFAULT_OFFER_ELEMENTS: &[&str] = &[
    "url",
    "price",
    "currencyId",
    "categoryId",
    "market_category",
    "picture",
    "store",
    "pickup",
    "delivery",
    "local_delivery_cost",
    "typePrefix",
    "vendor",
    "vendorCode",
    "name",
    "model",
    "description",
    "sales_notes",
    "manufacturer_warranty",
    "seller_warranty",
    "country_of_origin",
    "downloadable",
    "age",
    "barcode",
    "cpa",
    "rec",
    "expiry",
    "weight",
    "dimensions",
    "param",
];

/// Generator configuration.
///
/// Every field has a default, so a configuration document only needs the
/// values it changes.
///
/// # Examples
///
/// ```
/// use yml_generator::config::YmlConfig;
///
/// let config = YmlConfig::from_json_str(r#"{ "encoding": "utf-8", "indent": null }"#).unwrap();
///
/// assert_eq!(config.encoding, "utf-8");
/// assert_eq!(config.indent, None);
/// assert_eq!(config.shop_info_elements.len(), 7);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct YmlConfig {
    /// Encoding label, declared in the XML prologue and used for the output bytes.
    pub encoding: String,
    /// Indent string per nesting level; `None` or empty disables indentation.
    pub indent: Option<String>,
    pub shop_info_elements: Vec<String>,
    pub offer_elements: Vec<String>,
    /// Destination file; `None` writes to the configured stream.
    pub output_file: Option<PathBuf>,
}

impl Default for YmlConfig {
    fn default() -> Self {
        Self {
            encoding: "windows-1251".to_string(),
            indent: Some("\t".to_string()),
            shop_info_elements: to_strings(DEFAULT_SHOP_INFO_ELEMENTS),
            offer_elements: to_strings(DEFAULT_OFFER_ELEMENTS),
            output_file: None,
        }
    }
}

impl YmlConfig {
    pub fn from_json_str(json: &str) -> YmlResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| YmlError::Configuration(format!("Invalid JSON configuration: {}", e)))
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> YmlResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            YmlError::Configuration(format!(
                "Failed to open configuration {}: {}",
                path.display(),
                e
            ))
        })?;
        let config = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            YmlError::Configuration(format!(
                "Invalid JSON configuration {}: {}",
                path.display(),
                e
            ))
        })?;
        debug!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Checks the configuration and resolves it into generator settings.
    pub(crate) fn validate(&self) -> YmlResult<Settings> {
        let encoding = resolve_encoding(&self.encoding)?;
        let indent = resolve_indent(self.indent.as_deref())?;
        check_names("shop_info_elements", &self.shop_info_elements)?;
        check_names("offer_elements", &self.offer_elements)?;

        Ok(Settings {
            encoding,
            indent,
            shop_info_elements: self.shop_info_elements.clone(),
            offer_elements: self.offer_elements.clone(),
        })
    }
}

/// Validated, immutable configuration of one generator.
#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub encoding: &'static Encoding,
    pub indent: Option<Indent>,
    pub shop_info_elements: Vec<String>,
    pub offer_elements: Vec<String>,
}

fn to_strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

fn resolve_encoding(label: &str) -> YmlResult<&'static Encoding> {
    let encoding = Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| YmlError::Configuration(format!("Unknown encoding: {}", label)))?;
    // UTF-16 and the replacement encoding cannot be produced by an encoder.
    if encoding.output_encoding() != encoding {
        return Err(YmlError::Configuration(format!(
            "Encoding {} is not supported for output",
            encoding.name()
        )));
    }
    Ok(encoding)
}

fn resolve_indent(indent: Option<&str>) -> YmlResult<Option<Indent>> {
    let Some(indent) = indent.filter(|indent| !indent.is_empty()) else {
        return Ok(None);
    };
    let bytes = indent.as_bytes();
    let byte = bytes[0];
    if !matches!(byte, b' ' | b'\t') || bytes.iter().any(|b| *b != byte) {
        return Err(YmlError::Configuration(format!(
            "Indent must repeat a single space or tab, got {:?}",
            indent
        )));
    }
    Ok(Some(Indent {
        byte,
        size: bytes.len(),
    }))
}

fn check_names(list: &str, names: &[String]) -> YmlResult<()> {
    for (i, name) in names.iter().enumerate() {
        if !is_xml_name(name) {
            return Err(YmlError::Configuration(format!(
                "Invalid element name {:?} in {}",
                name, list
            )));
        }
        if names[..i].contains(name) {
            return Err(YmlError::Configuration(format!(
                "Duplicate element name {:?} in {}",
                name, list
            )));
        }
    }
    Ok(())
}

// XML Name production: a letter, `_` or `:` first, then name characters.
fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || matches!(first, '_' | ':'))
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | ':' | '-' | '.' | '\u{B7}'))
}
