use std::io::Write;

use crate::error::YmlResult;

use super::{
    model::ShopInfo,
    section::{CategorySection, CurrencySection, OfferSection},
};

/// Supplies the shop-specific data of a YML catalog.
///
/// The generator calls each hook exactly once per run, in declaration order.
/// The list hooks receive a handle to the element that is currently open and
/// must add their records through it; the handle only lives for the duration
/// of the call, so records can never land outside their wrapper element.
///
/// Hooks fetch their own data. Any error they return aborts the run.
///
/// # Examples
///
/// ```
/// use std::io::Write;
/// use yml_generator::core::model::{Category, Currency, Offer, ShopInfo};
/// use yml_generator::core::provider::CatalogProvider;
/// use yml_generator::core::section::{CategorySection, CurrencySection, OfferSection};
/// use yml_generator::YmlResult;
///
/// struct BookShop {
///     titles: Vec<(u32, String)>,
/// }
///
/// impl CatalogProvider for BookShop {
///     fn shop_info(&mut self) -> YmlResult<ShopInfo> {
///         Ok(ShopInfo::new().entry("name", "Books").entry("url", "http://books.example"))
///     }
///
///     fn currencies<W: Write>(&mut self, section: &mut CurrencySection<'_, W>) -> YmlResult<()> {
///         section.add_currency(&Currency::new("RUR"))
///     }
///
///     fn categories<W: Write>(&mut self, section: &mut CategorySection<'_, W>) -> YmlResult<()> {
///         section.add_category(&Category::new("Books", 1))
///     }
///
///     fn offers<W: Write>(&mut self, section: &mut OfferSection<'_, W>) -> YmlResult<()> {
///         for (id, title) in &self.titles {
///             section.add_offer(&Offer::new(id).field("name", title.as_str()).field("categoryId", 1))?;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait CatalogProvider {
    /// Shop description elements, filtered by the shop-info allow-list.
    fn shop_info(&mut self) -> YmlResult<ShopInfo>;

    fn currencies<W: Write>(&mut self, section: &mut CurrencySection<'_, W>) -> YmlResult<()>;

    /// Categories in any order; tree structure is expressed through parent ids.
    fn categories<W: Write>(&mut self, section: &mut CategorySection<'_, W>) -> YmlResult<()>;

    fn offers<W: Write>(&mut self, section: &mut OfferSection<'_, W>) -> YmlResult<()>;
}
