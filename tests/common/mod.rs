#![allow(dead_code)]

mod mocks;

pub use mocks::MockFile;

use std::io::Write;

use chrono::{NaiveDate, NaiveDateTime};
use yml_generator::{
    YmlError, YmlResult,
    catalog::MemoryCatalog,
    core::{
        model::{Category, Currency, Offer, Param, ShopInfo},
        provider::CatalogProvider,
        section::{CategorySection, CurrencySection, OfferSection},
    },
};

pub fn fixed_date() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 15)
        .unwrap()
        .and_hms_opt(10, 30, 0)
        .unwrap()
}

/// Small bookshop with Cyrillic names, a two-level category tree and one
/// offer per kind of field.
pub fn book_shop() -> MemoryCatalog {
    MemoryCatalog::new(
        ShopInfo::new()
            .entry("name", "Книжный")
            .entry("company", "ООО Книжный")
            .entry("url", "http://books.example"),
    )
    .with_currencies(vec![Currency::new("RUR"), Currency::new("USD").with_rate("CBRF")])
    .with_categories(vec![
        Category::new("Книги", 1),
        Category::new("Детективы", 2).with_parent(1),
    ])
    .with_offers(vec![
        Offer::new(12)
            .field("url", "http://books.example/12")
            .field("price", 500)
            .field("currencyId", "RUR")
            .field("categoryId", 2)
            .field("picture", vec!["http://books.example/12a.jpg", "http://books.example/12b.jpg"])
            .field("vendor", "Эксмо")
            .field("model", "Убийство в Восточном экспрессе")
            .param(Param::new("Страниц", 320))
            .param(Param::new("Вес", 0.4).with_unit("кг")),
        Offer::new(13)
            .field("price", 250)
            .field("warehouse_shelf", "B-7")
            .available(false)
            .bid(21)
            .cbid(35),
    ])
}

/// Hook of a [`CatalogProvider`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hook {
    ShopInfo,
    Currencies,
    Categories,
    Offers,
}

/// Delegates to a [`MemoryCatalog`], records the hooks called and fails in
/// `fail_at` after it has written its records.
pub struct RecordingCatalog {
    pub inner: MemoryCatalog,
    pub calls: Vec<Hook>,
    pub fail_at: Option<Hook>,
}

impl RecordingCatalog {
    pub fn new(inner: MemoryCatalog) -> Self {
        Self {
            inner,
            calls: Vec::new(),
            fail_at: None,
        }
    }

    pub fn failing_at(inner: MemoryCatalog, hook: Hook) -> Self {
        Self {
            fail_at: Some(hook),
            ..Self::new(inner)
        }
    }

    fn record(&mut self, hook: Hook) -> YmlResult<()> {
        self.calls.push(hook);
        if self.fail_at == Some(hook) {
            return Err(YmlError::Provider(format!("{:?} source unavailable", hook)));
        }
        Ok(())
    }
}

impl CatalogProvider for RecordingCatalog {
    fn shop_info(&mut self) -> YmlResult<ShopInfo> {
        let info = self.inner.shop_info()?;
        self.record(Hook::ShopInfo)?;
        Ok(info)
    }

    fn currencies<W: Write>(&mut self, section: &mut CurrencySection<'_, W>) -> YmlResult<()> {
        self.inner.currencies(section)?;
        self.record(Hook::Currencies)
    }

    fn categories<W: Write>(&mut self, section: &mut CategorySection<'_, W>) -> YmlResult<()> {
        self.inner.categories(section)?;
        self.record(Hook::Categories)
    }

    fn offers<W: Write>(&mut self, section: &mut OfferSection<'_, W>) -> YmlResult<()> {
        self.inner.offers(section)?;
        self.record(Hook::Offers)
    }
}
