//! Handles given to a [`CatalogProvider`](super::provider::CatalogProvider)
//! while one of the list elements (`<currencies>`, `<categories>`, `<offers>`)
//! is open. Each `add_*` call writes its element immediately.

use std::io::Write;

use log::debug;
use quick_xml::events::BytesStart;

use crate::error::YmlResult;
use crate::xml::XmlSink;

use super::model::{Category, Currency, Offer};

/// Open `<currencies>` element.
pub struct CurrencySection<'a, W: Write> {
    xml: &'a mut XmlSink<W>,
    written: usize,
}

impl<'a, W: Write> CurrencySection<'a, W> {
    pub(crate) fn new(xml: &'a mut XmlSink<W>) -> Self {
        Self { xml, written: 0 }
    }

    /// Writes `<currency id=".." rate=".."/>`.
    pub fn add_currency(&mut self, currency: &Currency) -> YmlResult<()> {
        let mut element = BytesStart::new("currency");
        element.push_attribute(("id", currency.id.as_str()));
        element.push_attribute(("rate", currency.rate.as_str()));
        self.xml.empty(element)?;
        self.written += 1;
        Ok(())
    }

    /// Number of currencies written so far.
    pub fn written(&self) -> usize {
        self.written
    }
}

/// Open `<categories>` element.
pub struct CategorySection<'a, W: Write> {
    xml: &'a mut XmlSink<W>,
    written: usize,
}

impl<'a, W: Write> CategorySection<'a, W> {
    pub(crate) fn new(xml: &'a mut XmlSink<W>) -> Self {
        Self { xml, written: 0 }
    }

    /// Writes `<category id=".." parentId="..">name</category>`; `parentId` is
    /// left out for root categories.
    pub fn add_category(&mut self, category: &Category) -> YmlResult<()> {
        let id = category.id.to_string();
        let parent_id = category.effective_parent().map(|id| id.to_string());

        let mut element = BytesStart::new("category");
        element.push_attribute(("id", id.as_str()));
        if let Some(parent_id) = parent_id.as_deref() {
            element.push_attribute(("parentId", parent_id));
        }
        self.xml.text_element(element, &category.name)?;
        self.written += 1;
        Ok(())
    }

    pub fn written(&self) -> usize {
        self.written
    }
}

/// Open `<offers>` element.
pub struct OfferSection<'a, W: Write> {
    xml: &'a mut XmlSink<W>,
    allowed: &'a [String],
    written: usize,
}

impl<'a, W: Write> OfferSection<'a, W> {
    pub(crate) fn new(xml: &'a mut XmlSink<W>, allowed: &'a [String]) -> Self {
        Self {
            xml,
            allowed,
            written: 0,
        }
    }

    /// Writes one `<offer>` element.
    ///
    /// Attributes come in the order `id`, `type`, `available`, `bid`, `cbid`.
    /// The body holds the data fields whose names are in the offer allow-list,
    /// in their given order (one element per value), followed by the `<param>`
    /// elements.
    pub fn add_offer(&mut self, offer: &Offer) -> YmlResult<()> {
        let mut element = BytesStart::new("offer");
        element.push_attribute(("id", offer.id.as_str()));
        if let Some(offer_type) = offer.effective_type() {
            element.push_attribute(("type", offer_type));
        }
        element.push_attribute(("available", if offer.available { "true" } else { "false" }));
        if let Some(bid) = offer.effective_bid() {
            element.push_attribute(("bid", bid));
        }
        if let Some(cbid) = offer.effective_cbid() {
            element.push_attribute(("cbid", cbid));
        }
        self.xml.start(element)?;

        for (name, value) in &offer.data {
            if !self.allowed.iter().any(|allowed| allowed == name) {
                debug!("Offer {}: dropping unknown element {}", offer.id, name);
                continue;
            }
            for text in value.values() {
                self.xml.text_element(BytesStart::new(name.as_str()), text)?;
            }
        }

        for param in &offer.params {
            let mut element = BytesStart::new("param");
            element.push_attribute(("name", param.name.as_str()));
            if let Some(unit) = param.effective_unit() {
                element.push_attribute(("unit", unit));
            }
            self.xml.text_element(element, &param.value)?;
        }

        self.xml.end("offer")?;
        self.written += 1;
        Ok(())
    }

    pub fn written(&self) -> usize {
        self.written
    }
}
