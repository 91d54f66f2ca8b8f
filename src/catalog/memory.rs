use std::io::Write;

use crate::core::{
    model::{Category, Currency, Offer, ShopInfo},
    provider::CatalogProvider,
    section::{CategorySection, CurrencySection, OfferSection},
};
use crate::error::YmlResult;

/// A [`CatalogProvider`] over records held in memory.
///
/// Useful when the catalog has already been loaded, or for small shops whose
/// catalog is built by hand. Records are written in vector order.
///
/// # Examples
///
/// ```
/// use yml_generator::catalog::MemoryCatalog;
/// use yml_generator::core::model::{Category, Currency, Offer, ShopInfo};
///
/// let catalog = MemoryCatalog::new(ShopInfo::new().entry("name", "Shop"))
///     .with_currencies(vec![Currency::new("RUR")])
///     .with_categories(vec![Category::new("Books", 1)])
///     .with_offers(vec![Offer::new(7).field("price", 500)]);
///
/// assert_eq!(catalog.offer_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    shop_info: ShopInfo,
    currencies: Vec<Currency>,
    categories: Vec<Category>,
    offers: Vec<Offer>,
}

impl MemoryCatalog {
    pub fn new(shop_info: ShopInfo) -> Self {
        Self {
            shop_info,
            ..Default::default()
        }
    }

    pub fn with_currencies(mut self, currencies: Vec<Currency>) -> Self {
        self.currencies = currencies;
        self
    }

    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_offers(mut self, offers: Vec<Offer>) -> Self {
        self.offers = offers;
        self
    }

    pub fn push_offer(&mut self, offer: Offer) {
        self.offers.push(offer);
    }

    pub fn offer_count(&self) -> usize {
        self.offers.len()
    }
}

impl CatalogProvider for MemoryCatalog {
    fn shop_info(&mut self) -> YmlResult<ShopInfo> {
        Ok(self.shop_info.clone())
    }

    fn currencies<W: Write>(&mut self, section: &mut CurrencySection<'_, W>) -> YmlResult<()> {
        self.currencies
            .iter()
            .try_for_each(|currency| section.add_currency(currency))
    }

    fn categories<W: Write>(&mut self, section: &mut CategorySection<'_, W>) -> YmlResult<()> {
        self.categories
            .iter()
            .try_for_each(|category| section.add_category(category))
    }

    fn offers<W: Write>(&mut self, section: &mut OfferSection<'_, W>) -> YmlResult<()> {
        self.offers
            .iter()
            .try_for_each(|offer| section.add_offer(offer))
    }
}
