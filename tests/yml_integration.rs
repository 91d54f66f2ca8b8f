pub mod common;

use std::{
    fs,
    io::{Cursor, Write},
    path::Path,
};

use common::{Hook, RecordingCatalog, book_shop, fixed_date};
use encoding_rs::WINDOWS_1251;
use quick_xml::{Reader, events::Event};
use yml_generator::{
    YmlResult,
    catalog::MemoryCatalog,
    config::YmlConfig,
    core::{
        generator::YmlGeneratorBuilder,
        model::{Category, Currency, Offer, ShopInfo},
        provider::CatalogProvider,
        section::{CategorySection, CurrencySection, OfferSection},
    },
};

fn render_utf8(catalog: MemoryCatalog) -> String {
    let mut generator = YmlGeneratorBuilder::new()
        .encoding("utf-8")
        .no_indent()
        .generated_at(fixed_date())
        .from_writer(catalog, Cursor::new(Vec::new()))
        .unwrap();
    generator.run().unwrap();
    String::from_utf8(generator.get_ref().unwrap().get_ref().clone()).unwrap()
}

/// Names of all start and empty elements, in document order.
fn element_names(xml: &str) -> Vec<String> {
    let mut reader = Reader::from_str(xml);
    let mut names = Vec::new();
    loop {
        match reader.read_event().unwrap() {
            Event::Start(e) | Event::Empty(e) => {
                names.push(String::from_utf8(e.name().as_ref().to_vec()).unwrap())
            }
            Event::Eof => break,
            _ => {}
        }
    }
    names
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn generate_minimal_shop_to_stream() {
    let catalog = MemoryCatalog::new(
        ShopInfo::new()
            .entry("url", "http://x")
            .entry("name", "Shop")
            .entry("company", "X"),
    )
    .with_currencies(vec![Currency::new("RUR").with_rate(1)])
    .with_categories(vec![Category::new("Books", 1)])
    .with_offers(vec![
        Offer::new(7)
            .field("price", 500)
            .field("vendor", "Acme")
            .available(true),
    ]);

    let mut generator = YmlGeneratorBuilder::new()
        .no_indent()
        .generated_at(fixed_date())
        .from_writer(catalog, Cursor::new(Vec::new()))
        .unwrap();
    let report = generator.run().unwrap();

    let content = String::from_utf8(generator.get_ref().unwrap().get_ref().clone()).unwrap();
    assert_eq!(
        content,
        "<?xml version=\"1.0\" encoding=\"windows-1251\"?>\
         <yml_catalog date=\"2024-01-15 10:30\"><shop>\
         <name>Shop</name><company>X</company><url>http://x</url>\
         <currencies><currency id=\"RUR\" rate=\"1\"/></currencies>\
         <categories><category id=\"1\">Books</category></categories>\
         <offers><offer id=\"7\" type=\"vendor.model\" available=\"true\">\
         <price>500</price><vendor>Acme</vendor></offer></offers>\
         </shop></yml_catalog>"
    );
    assert_eq!(report.currencies, 1);
    assert_eq!(report.categories, 1);
    assert_eq!(report.offers, 1);
}

#[test]
fn document_follows_yml_element_order() {
    let content = render_utf8(book_shop());

    assert_eq!(
        element_names(&content),
        vec![
            "yml_catalog",
            "shop",
            "name",
            "company",
            "url",
            "currencies",
            "currency",
            "currency",
            "categories",
            "category",
            "category",
            "offers",
            "offer",
            "url",
            "price",
            "currencyId",
            "categoryId",
            "picture",
            "picture",
            "vendor",
            "model",
            "param",
            "param",
            "offer",
            "price",
        ]
    );
}

#[test]
fn offer_attributes_and_params() {
    let content = render_utf8(book_shop());

    assert!(content.contains("<category id=\"2\" parentId=\"1\">Детективы</category>"));
    assert!(content.contains("<currency id=\"USD\" rate=\"CBRF\"/>"));
    assert!(content.contains("<param name=\"Страниц\">320</param>"));
    assert!(content.contains("<param name=\"Вес\" unit=\"кг\">0.4</param>"));
    assert!(content.contains(
        "<offer id=\"13\" type=\"vendor.model\" available=\"false\" bid=\"21\" cbid=\"35\">"
    ));
    assert!(!content.contains("warehouse_shelf"));
}

#[test]
fn generate_windows_1251_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("yandex.xml");

    let mut generator = YmlGeneratorBuilder::new()
        .generated_at(fixed_date())
        .from_path(book_shop(), &path)
        .unwrap();
    let report = generator.run().unwrap();
    assert_eq!(report.offers, 2);
    assert_eq!(generator.output_file(), Some(path.as_path()));

    let bytes = fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"<?xml version=\"1.0\" encoding=\"windows-1251\"?>"));

    let (content, _, had_errors) = WINDOWS_1251.decode(&bytes);
    assert!(!had_errors);
    assert!(content.contains("<name>Книжный</name>"));
    assert!(content.contains("<vendor>Эксмо</vendor>"));

    // Only the destination is left in the directory.
    assert_eq!(file_names(dir.path()), vec!["yandex.xml"]);
}

#[test]
fn default_indentation_is_one_tab_per_level() {
    let mut generator = YmlGeneratorBuilder::new()
        .encoding("utf-8")
        .generated_at(fixed_date())
        .from_writer(book_shop(), Vec::new())
        .unwrap();
    generator.run().unwrap();

    let content = String::from_utf8(generator.get_ref().unwrap().clone()).unwrap();
    assert!(content.contains("\n\t<shop>"));
    assert!(content.contains("\n\t\t<name>Книжный</name>"));
    assert!(content.contains("\n\t\t<currencies>"));
    assert!(content.contains("\n\t\t\t<currency id=\"RUR\" rate=\"1\"/>"));
    assert!(content.contains("\n\t\t\t\t<price>500</price>"));
    assert!(!content.contains("  "));
}

#[test]
fn two_runs_produce_identical_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("feed.xml");

    let mut generator = YmlGeneratorBuilder::new()
        .generated_at(fixed_date())
        .from_path(book_shop(), &path)
        .unwrap();

    generator.run().unwrap();
    let first = fs::read(&path).unwrap();
    generator.run().unwrap();
    let second = fs::read(&path).unwrap();

    assert_eq!(first, second);
    assert_eq!(file_names(dir.path()), vec!["feed.xml"]);
}

#[test]
fn new_run_replaces_previous_feed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("feed.xml");
    fs::write(&path, "previous feed").unwrap();

    let mut generator = YmlGeneratorBuilder::new()
        .encoding("utf-8")
        .from_path(book_shop(), &path)
        .unwrap();
    let report = generator.run().unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(!content.contains("previous feed"));
    assert!(content.contains(&format!("<yml_catalog date=\"{}\">", report.date)));
}

#[cfg(unix)]
#[test]
fn feed_permissions_follow_destination() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let mode = |path: &Path| fs::metadata(path).unwrap().permissions().mode() & 0o777;

    let fresh = dir.path().join("fresh.xml");
    let sibling = dir.path().join("sibling.xml");
    fs::write(&sibling, "").unwrap();
    YmlGeneratorBuilder::new()
        .from_path(book_shop(), &fresh)
        .unwrap()
        .run()
        .unwrap();
    // Same mode as any file created under the current umask.
    assert_eq!(mode(&fresh), mode(&sibling));

    let existing = dir.path().join("existing.xml");
    fs::write(&existing, "previous feed").unwrap();
    fs::set_permissions(&existing, fs::Permissions::from_mode(0o640)).unwrap();
    YmlGeneratorBuilder::new()
        .from_path(book_shop(), &existing)
        .unwrap()
        .run()
        .unwrap();
    assert_eq!(mode(&existing), 0o640);
}

#[test]
fn hooks_are_called_once_in_order() {
    let catalog = RecordingCatalog::new(book_shop());
    let mut generator = YmlGeneratorBuilder::new()
        .from_writer(catalog, Vec::new())
        .unwrap();

    generator.run().unwrap();

    assert_eq!(
        generator.provider().calls,
        vec![Hook::ShopInfo, Hook::Currencies, Hook::Categories, Hook::Offers]
    );
}

#[test]
fn generator_from_json_configuration() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("market.xml");
    let config = YmlConfig::from_json_str(&format!(
        r#"{{
            "encoding": "utf-8",
            "indent": "  ",
            "shop_info_elements": ["name"],
            "output_file": {}
        }}"#,
        serde_json::to_string(&path).unwrap()
    ))
    .unwrap();

    let mut generator = YmlGeneratorBuilder::new()
        .config(config)
        .generated_at(fixed_date())
        .build(book_shop())
        .unwrap();
    generator.run().unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("\n  <shop>\n    <name>Книжный</name>\n    <currencies>"));
    assert!(!content.contains("<company>"));
}

/// Streams rows straight from a query result, the way a shop backed by a
/// database implements the hooks.
struct ShopDatabase {
    rows: Vec<(u32, &'static str, u32, f64)>,
    tree: Vec<(u64, &'static str, Option<u64>)>,
}

impl CatalogProvider for ShopDatabase {
    fn shop_info(&mut self) -> YmlResult<ShopInfo> {
        Ok([("name", "DB Shop"), ("platform", "custom"), ("version", "2.1")]
            .into_iter()
            .collect())
    }

    fn currencies<W: Write>(&mut self, section: &mut CurrencySection<'_, W>) -> YmlResult<()> {
        section.add_currency(&Currency::new("RUR"))
    }

    fn categories<W: Write>(&mut self, section: &mut CategorySection<'_, W>) -> YmlResult<()> {
        for (id, name, parent) in &self.tree {
            let mut category = Category::new(*name, *id);
            category.parent_id = *parent;
            section.add_category(&category)?;
        }
        Ok(())
    }

    fn offers<W: Write>(&mut self, section: &mut OfferSection<'_, W>) -> YmlResult<()> {
        for (id, name, category, price) in &self.rows {
            let offer = Offer::new(id)
                .offer_type(None)
                .field("name", *name)
                .field("categoryId", *category)
                .field("price", *price);
            section.add_offer(&offer)?;
        }
        Ok(())
    }
}

#[test]
fn custom_provider_streams_database_rows() {
    let database = ShopDatabase {
        rows: vec![(1, "Lamp & Shade", 11, 19.9), (2, "Desk", 10, 120.0)],
        tree: vec![(10, "Furniture", None), (11, "Lighting", Some(10))],
    };

    let mut generator = YmlGeneratorBuilder::new()
        .encoding("utf-8")
        .no_indent()
        .generated_at(fixed_date())
        .from_writer(database, Vec::new())
        .unwrap();
    let report = generator.run().unwrap();

    let content = String::from_utf8(generator.get_ref().unwrap().clone()).unwrap();
    assert!(content.contains("<shop><name>DB Shop</name><platform>custom</platform><version>2.1</version><currencies>"));
    assert!(content.contains(
        "<categories><category id=\"10\">Furniture</category><category id=\"11\" parentId=\"10\">Lighting</category></categories>"
    ));
    assert!(content.contains(
        "<offer id=\"1\" available=\"true\"><name>Lamp &amp; Shade</name><categoryId>11</categoryId><price>19.9</price></offer>"
    ));
    assert!(content.contains("<price>120</price>"));
    assert_eq!(report.categories, 2);
}

#[test]
fn unmappable_characters_survive_as_references() {
    let catalog = MemoryCatalog::new(ShopInfo::new().entry("name", "Shop ★"));

    let mut generator = YmlGeneratorBuilder::new()
        .no_indent()
        .generated_at(fixed_date())
        .from_writer(catalog, Vec::new())
        .unwrap();
    generator.run().unwrap();

    let bytes = generator.get_ref().unwrap();
    let content = String::from_utf8(bytes.clone()).unwrap();
    assert!(content.contains("<name>Shop &#9733;</name>"));

    let mut reader = Reader::from_reader(bytes.as_slice());
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf).unwrap() {
            Event::Eof => break,
            _ => buf.clear(),
        }
    }
}
