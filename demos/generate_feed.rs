use std::env::temp_dir;

use anyhow::Result;
use log::info;
use yml_generator::{
    catalog::MemoryCatalog,
    core::{
        generator::YmlGeneratorBuilder,
        model::{Category, Currency, Offer, Param, ShopInfo},
    },
};

fn main() -> Result<()> {
    env_logger::init();

    let catalog = MemoryCatalog::new(
        ShopInfo::new()
            .entry("name", "Книжный")
            .entry("company", "ООО Книжный")
            .entry("url", "http://books.example")
            .entry("platform", "yml-generator-rs")
            .entry("email", "shop@books.example"),
    )
    .with_currencies(vec![
        Currency::new("RUR"),
        Currency::new("USD").with_rate("CBRF"),
    ])
    .with_categories(vec![
        Category::new("Книги", 1),
        Category::new("Детективы", 2).with_parent(1),
        Category::new("Фантастика", 3).with_parent(1),
    ])
    .with_offers(vec![
        Offer::new(12)
            .field("url", "http://books.example/12")
            .field("price", 500)
            .field("currencyId", "RUR")
            .field("categoryId", 2)
            .field("picture", vec!["http://books.example/12.jpg"])
            .field("vendor", "Эксмо")
            .field("model", "Убийство в Восточном экспрессе")
            .param(Param::new("Страниц", 320)),
        Offer::new(31)
            .field("url", "http://books.example/31")
            .field("price", 730)
            .field("currencyId", "RUR")
            .field("categoryId", 3)
            .field("vendor", "АСТ")
            .field("model", "Солярис")
            .available(false)
            .bid(20)
            .cbid(40),
    ]);

    let path = temp_dir().join("yandex_market.xml");
    let mut generator = YmlGeneratorBuilder::new().from_path(catalog, &path)?;
    let report = generator.run()?;

    info!(
        "Feed written to {} ({} offers, dated {})",
        path.display(),
        report.offers,
        report.date
    );
    Ok(())
}
