#![cfg_attr(docsrs, feature(doc_cfg))]
//#![warn(missing_docs)]

/*!
 # YML generator for Rust

 A streaming generator for **YML** (Yandex.Market Language) catalog feeds: the XML
 document a web shop publishes to describe its shop, currencies, categories and offers.

 ## Core Concepts

- **CatalogProvider:** the shop-specific part. It implements four hooks (`shop_info`,
  `currencies`, `categories`, `offers`) and fetches its data from wherever it lives.
- **Sections:** while `<currencies>`, `<categories>` or `<offers>` is open, the provider
  receives a section handle and adds one record per call (`add_currency`, `add_category`,
  `add_offer`). Records are written immediately, nothing is buffered in a tree.
- **YmlGenerator:** owns the configuration and the destination, writes the document
  skeleton and calls the hooks in a fixed order.

 ## Output

- Declared encoding defaults to `windows-1251`; output bytes are transcoded accordingly.
- Indentation defaults to one tab per level and can be disabled.
- Shop info elements and offer sub-elements are filtered through allow-lists.
- File destinations are replaced atomically: the document goes to a temporary file in
  the same directory, which is renamed over the destination once complete.

 ## Getting Started

```rust
# use std::io::Cursor;
use yml_generator::{
    catalog::MemoryCatalog,
    core::generator::YmlGeneratorBuilder,
    core::model::{Category, Currency, Offer, Param, ShopInfo},
    YmlError,
};

fn main() -> Result<(), YmlError> {
    let catalog = MemoryCatalog::new(
        ShopInfo::new()
            .entry("name", "Shop")
            .entry("company", "X")
            .entry("url", "http://x"),
    )
    .with_currencies(vec![Currency::new("RUR")])
    .with_categories(vec![Category::new("Books", 1)])
    .with_offers(vec![Offer::new(7)
        .field("price", 500)
        .field("vendor", "Acme")
        .param(Param::new("Pages", 320))]);

    let mut generator = YmlGeneratorBuilder::new()
        .from_writer(catalog, Cursor::new(Vec::new()))?;
    let report = generator.run()?;

    assert_eq!(report.offers, 1);
    Ok(())
}
```

 Use `YmlGeneratorBuilder::from_path` to publish to a file, or implement
 [`core::provider::CatalogProvider`] to stream records straight from a database.

 ## License
 Licensed under either of

 -   Apache License, Version 2.0
     ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
 -   MIT license
     ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)

 at your option.
 */

/// Core module for catalog generation
pub mod core;

/// Error types for catalog generation
pub mod error;

#[doc(inline)]
pub use error::*;

/// Generator configuration
pub mod config;

/// Ready-made catalog providers
pub mod catalog;

/// XML writing and output encoding
pub mod xml;
