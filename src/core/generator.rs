use std::fs::{self, File};
use std::io::{self, Stdout, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::{Local, NaiveDateTime};
use log::{debug, info, warn};
use quick_xml::events::BytesStart;

use crate::config::{Settings, YmlConfig};
use crate::error::{YmlError, YmlResult};
use crate::xml::XmlSink;

use super::{
    provider::CatalogProvider,
    section::{CategorySection, CurrencySection, OfferSection},
};

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Summary of one generation run.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub currencies: usize,
    pub categories: usize,
    pub offers: usize,
    /// Value written to the `date` attribute of `<yml_catalog>`.
    pub date: String,
    pub start: Instant,
    pub duration: Duration,
}

enum Destination<W> {
    File(PathBuf),
    Stream(W),
}

/// Writes a YML catalog with data from a [`CatalogProvider`].
///
/// Each [`run`](YmlGenerator::run) regenerates the whole document:
///
/// ```text
/// <yml_catalog date="YYYY-MM-DD HH:MM">
///   <shop>
///     shop info elements
///     <currencies>...</currencies>
///     <categories>...</categories>
///     <offers>...</offers>
///   </shop>
/// </yml_catalog>
/// ```
///
/// With a file destination the document is written to a temporary file in the
/// same directory and renamed over the destination once complete, so readers of
/// the destination only ever see a whole document. With a stream destination
/// bytes go straight to the writer.
///
/// Generators are not synchronized: two runs must not target the same file at
/// the same time.
pub struct YmlGenerator<P, W = File> {
    provider: P,
    settings: Settings,
    generated_at: Option<NaiveDateTime>,
    destination: Destination<W>,
}

impl<P: CatalogProvider, W: Write> YmlGenerator<P, W> {
    /// Generates the document.
    ///
    /// # Errors
    ///
    /// Provider errors and I/O errors abort the run. For a file destination the
    /// previous content of the destination is left untouched.
    pub fn run(&mut self) -> YmlResult<GenerationReport> {
        let start = Instant::now();
        let date = self
            .generated_at
            .unwrap_or_else(|| Local::now().naive_local())
            .format(DATE_FORMAT)
            .to_string();

        let Self {
            provider,
            settings,
            destination,
            ..
        } = self;

        let counts = match destination {
            Destination::File(path) => {
                info!("Start of YML generation to {}", path.display());
                write_file(path, |file| write_document(provider, settings, &date, file)).inspect_err(
                    |e| warn!("YML generation failed, {} left untouched: {}", path.display(), e),
                )?
            }
            Destination::Stream(writer) => {
                info!("Start of YML generation to stream");
                write_document(provider, settings, &date, writer)?
            }
        };

        let report = GenerationReport {
            currencies: counts.currencies,
            categories: counts.categories,
            offers: counts.offers,
            date,
            start,
            duration: start.elapsed(),
        };
        info!(
            "End of YML generation: {} currencies, {} categories, {} offers in {:?}",
            report.currencies, report.categories, report.offers, report.duration
        );
        Ok(report)
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    pub fn into_provider(self) -> P {
        self.provider
    }

    /// Destination file, if the generator writes to one.
    pub fn output_file(&self) -> Option<&Path> {
        match &self.destination {
            Destination::File(path) => Some(path.as_path()),
            Destination::Stream(_) => None,
        }
    }

    /// Stream destination, if the generator writes to one.
    pub fn get_ref(&self) -> Option<&W> {
        match &self.destination {
            Destination::File(_) => None,
            Destination::Stream(writer) => Some(writer),
        }
    }
}

struct Counts {
    currencies: usize,
    categories: usize,
    offers: usize,
}

fn write_document<P: CatalogProvider, S: Write>(
    provider: &mut P,
    settings: &Settings,
    date: &str,
    sink: S,
) -> YmlResult<Counts> {
    let mut xml = XmlSink::new(sink, settings.encoding, settings.indent);
    xml.declaration(settings.encoding.name())?;

    let mut catalog = BytesStart::new("yml_catalog");
    catalog.push_attribute(("date", date));
    xml.start(catalog)?;
    xml.start(BytesStart::new("shop"))?;

    let info = provider.shop_info()?;
    for name in &settings.shop_info_elements {
        if let Some(text) = info.get(name) {
            xml.text_element(BytesStart::new(name.as_str()), text)?;
        }
    }
    for name in info.names() {
        if !settings.shop_info_elements.iter().any(|allowed| allowed == name) {
            debug!("Dropping unknown shop info element {}", name);
        }
    }

    xml.start(BytesStart::new("currencies"))?;
    let currencies = {
        let mut section = CurrencySection::new(&mut xml);
        provider.currencies(&mut section)?;
        section.written()
    };
    xml.end("currencies")?;
    debug!("{} currencies written", currencies);

    xml.start(BytesStart::new("categories"))?;
    let categories = {
        let mut section = CategorySection::new(&mut xml);
        provider.categories(&mut section)?;
        section.written()
    };
    xml.end("categories")?;
    debug!("{} categories written", categories);

    xml.start(BytesStart::new("offers"))?;
    let offers = {
        let mut section = OfferSection::new(&mut xml, &settings.offer_elements);
        provider.offers(&mut section)?;
        section.written()
    };
    xml.end("offers")?;
    debug!("{} offers written", offers);

    xml.end("shop")?;
    xml.end("yml_catalog")?;
    xml.finish()?;

    Ok(Counts {
        currencies,
        categories,
        offers,
    })
}

/// Runs `write` against a temporary file next to `path`, then renames it over `path`.
///
/// The temporary file is deleted when anything fails before the rename.
fn write_file<T>(path: &Path, write: impl FnOnce(&File) -> YmlResult<T>) -> YmlResult<T> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let prefix = format!(
        ".{}.",
        path.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    );

    let mut builder = tempfile::Builder::new();
    builder.prefix(&prefix).suffix(".tmp");
    // tempfile defaults to 0600; a fresh feed gets the usual umask-filtered mode.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let temp = builder.tempfile_in(dir)?;
    debug!("Writing YML to temporary file {}", temp.path().display());

    let result = write(temp.as_file())?;
    temp.as_file().sync_all()?;

    // Keep the access rights of the file being replaced.
    match fs::metadata(path) {
        Ok(metadata) => temp.as_file().set_permissions(metadata.permissions())?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }

    temp.persist(path).map_err(|e| YmlError::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    Ok(result)
}

/// Builder for [`YmlGenerator`].
///
/// Starts from [`YmlConfig::default`]; individual setters override the
/// configuration. Settings are validated by the terminal methods.
///
/// # Examples
///
/// ```
/// use std::io::Cursor;
/// use yml_generator::catalog::MemoryCatalog;
/// use yml_generator::core::generator::YmlGeneratorBuilder;
/// use yml_generator::core::model::{Currency, ShopInfo};
///
/// let catalog = MemoryCatalog::new(ShopInfo::new().entry("name", "Shop"))
///     .with_currencies(vec![Currency::new("RUR")]);
///
/// let mut generator = YmlGeneratorBuilder::new()
///     .encoding("utf-8")
///     .no_indent()
///     .from_writer(catalog, Cursor::new(Vec::new()))
///     .unwrap();
///
/// let report = generator.run().unwrap();
/// assert_eq!(report.currencies, 1);
///
/// let content = String::from_utf8(generator.get_ref().unwrap().get_ref().clone()).unwrap();
/// assert!(content.contains("<currencies><currency id=\"RUR\" rate=\"1\"/></currencies>"));
/// ```
#[derive(Default)]
pub struct YmlGeneratorBuilder {
    config: YmlConfig,
    generated_at: Option<NaiveDateTime>,
}

impl YmlGeneratorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: YmlConfig) -> Self {
        self.config = config;
        self
    }

    pub fn encoding(mut self, encoding: &str) -> Self {
        self.config.encoding = encoding.to_string();
        self
    }

    /// Indent string per nesting level, e.g. `"\t"` or `"  "`.
    pub fn indent(mut self, indent: &str) -> Self {
        self.config.indent = Some(indent.to_string());
        self
    }

    pub fn no_indent(mut self) -> Self {
        self.config.indent = None;
        self
    }

    pub fn shop_info_elements<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.shop_info_elements = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn offer_elements<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.offer_elements = names.into_iter().map(Into::into).collect();
        self
    }

    /// Fixes the `date` attribute instead of using the local time of each run.
    pub fn generated_at(mut self, date: NaiveDateTime) -> Self {
        self.generated_at = Some(date);
        self
    }

    /// Creates a generator that atomically replaces the file at `path`.
    pub fn from_path<P: CatalogProvider, Q: AsRef<Path>>(
        self,
        provider: P,
        path: Q,
    ) -> YmlResult<YmlGenerator<P>> {
        self.assemble(provider, Destination::File(path.as_ref().to_path_buf()))
    }

    /// Creates a generator that writes to `writer`, without atomicity.
    pub fn from_writer<P: CatalogProvider, W: Write>(
        self,
        provider: P,
        writer: W,
    ) -> YmlResult<YmlGenerator<P, W>> {
        self.assemble(provider, Destination::Stream(writer))
    }

    /// Creates a generator for the configured `output_file`, or for stdout
    /// when no file is configured.
    pub fn build<P: CatalogProvider>(self, provider: P) -> YmlResult<YmlGenerator<P, Stdout>> {
        let destination = match &self.config.output_file {
            Some(path) => Destination::File(path.clone()),
            None => Destination::Stream(io::stdout()),
        };
        self.assemble(provider, destination)
    }

    fn assemble<P: CatalogProvider, W: Write>(
        self,
        provider: P,
        destination: Destination<W>,
    ) -> YmlResult<YmlGenerator<P, W>> {
        let settings = self.config.validate()?;
        Ok(YmlGenerator {
            provider,
            settings,
            generated_at: self.generated_at,
            destination,
        })
    }
}
