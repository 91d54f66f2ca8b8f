use std::collections::BTreeMap;
use std::fmt::Display;

/// Default value of the `type` attribute of an offer.
pub const DEFAULT_OFFER_TYPE: &str = "vendor.model";

/// Shop description written at the top of the `<shop>` element.
///
/// Keys are element names (`name`, `company`, `url`, ...). Only the names listed
/// in the generator's shop-info allow-list reach the output, in the allow-list order.
///
/// # Examples
///
/// ```
/// use yml_generator::core::model::ShopInfo;
///
/// let info = ShopInfo::new()
///     .entry("name", "Shop")
///     .entry("company", "Shop LLC")
///     .entry("url", "http://shop.example");
///
/// assert_eq!(info.get("company"), Some("Shop LLC"));
/// assert_eq!(info.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShopInfo {
    entries: BTreeMap<String, String>,
}

impl ShopInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an element.
    pub fn entry(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(name, text);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.entries.insert(name.into(), text.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl<K, V> FromIterator<(K, V)> for ShopInfo
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut info = ShopInfo::new();
        for (name, text) in iter {
            info.insert(name, text);
        }
        info
    }
}

/// A `<currency id=".." rate=".."/>` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Currency {
    pub id: String,
    pub rate: String,
}

impl Currency {
    /// Creates a currency with a rate of `1`.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            rate: "1".to_string(),
        }
    }

    pub fn with_rate(mut self, rate: impl Display) -> Self {
        self.rate = rate.to_string();
        self
    }
}

/// A `<category id=".." parentId="..">name</category>` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub id: u64,
    /// Written only when present and non-zero.
    pub parent_id: Option<u64>,
}

impl Category {
    pub fn new(name: impl Into<String>, id: u64) -> Self {
        Self {
            name: name.into(),
            id,
            parent_id: None,
        }
    }

    pub fn with_parent(mut self, parent_id: u64) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub(crate) fn effective_parent(&self) -> Option<u64> {
        self.parent_id.filter(|id| *id != 0)
    }
}

/// Value of an offer sub-element: a scalar becomes one element, a list
/// becomes repeated sibling elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Single(String),
    Multiple(Vec<String>),
}

impl FieldValue {
    pub fn values(&self) -> &[String] {
        match self {
            FieldValue::Single(value) => std::slice::from_ref(value),
            FieldValue::Multiple(values) => values,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Single(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Single(value)
    }
}

impl From<&String> for FieldValue {
    fn from(value: &String) -> Self {
        FieldValue::Single(value.clone())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Single(if value { "true" } else { "false" }.to_string())
    }
}

macro_rules! scalar_field_value {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(value: $ty) -> Self {
                    FieldValue::Single(value.to_string())
                }
            }
        )*
    };
}

scalar_field_value!(i8, i16, i32, i64, u8, u16, u32, u64, usize, f32, f64);

impl<T: Display> From<Vec<T>> for FieldValue {
    fn from(values: Vec<T>) -> Self {
        FieldValue::Multiple(values.iter().map(ToString::to_string).collect())
    }
}

impl<T: Display> From<&[T]> for FieldValue {
    fn from(values: &[T]) -> Self {
        FieldValue::Multiple(values.iter().map(ToString::to_string).collect())
    }
}

impl<T: Display, const N: usize> From<[T; N]> for FieldValue {
    fn from(values: [T; N]) -> Self {
        FieldValue::Multiple(values.iter().map(ToString::to_string).collect())
    }
}

/// A `<param name=".." unit="..">value</param>` entry of an offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub unit: Option<String>,
    pub value: String,
}

impl Param {
    pub fn new(name: impl Into<String>, value: impl Display) -> Self {
        Self {
            name: name.into(),
            unit: None,
            value: value.to_string(),
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub(crate) fn effective_unit(&self) -> Option<&str> {
        self.unit.as_deref().filter(|unit| !unit.is_empty())
    }
}

/// An `<offer>` entry.
///
/// # Examples
///
/// ```
/// use yml_generator::core::model::{Offer, Param};
///
/// let offer = Offer::new(7)
///     .field("price", 500)
///     .field("picture", ["a.jpg", "b.jpg"])
///     .param(Param::new("Color", "red"))
///     .available(false)
///     .bid(12);
///
/// assert_eq!(offer.id, "7");
/// assert_eq!(offer.data.len(), 2);
/// assert_eq!(offer.offer_type.as_deref(), Some("vendor.model"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Offer {
    pub id: String,
    /// Sub-elements in the order they are written.
    pub data: Vec<(String, FieldValue)>,
    pub params: Vec<Param>,
    pub available: bool,
    pub offer_type: Option<String>,
    pub bid: Option<String>,
    /// Ignored unless `bid` is set.
    pub cbid: Option<String>,
}

impl Offer {
    /// Creates an available `vendor.model` offer without sub-elements.
    pub fn new(id: impl Display) -> Self {
        Self {
            id: id.to_string(),
            data: Vec::new(),
            params: Vec::new(),
            available: true,
            offer_type: Some(DEFAULT_OFFER_TYPE.to_string()),
            bid: None,
            cbid: None,
        }
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.data.push((name.into(), value.into()));
        self
    }

    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    pub fn params(mut self, params: impl IntoIterator<Item = Param>) -> Self {
        self.params.extend(params);
        self
    }

    pub fn available(mut self, available: bool) -> Self {
        self.available = available;
        self
    }

    /// Sets the `type` attribute; `None` or an empty string omits it.
    pub fn offer_type(mut self, offer_type: Option<&str>) -> Self {
        self.offer_type = offer_type.map(str::to_string);
        self
    }

    pub fn bid(mut self, bid: impl Display) -> Self {
        self.bid = Some(bid.to_string());
        self
    }

    pub fn cbid(mut self, cbid: impl Display) -> Self {
        self.cbid = Some(cbid.to_string());
        self
    }

    pub(crate) fn effective_type(&self) -> Option<&str> {
        self.offer_type.as_deref().filter(|t| !t.is_empty())
    }

    pub(crate) fn effective_bid(&self) -> Option<&str> {
        self.bid.as_deref().filter(|bid| is_set(bid))
    }

    pub(crate) fn effective_cbid(&self) -> Option<&str> {
        self.effective_bid()?;
        self.cbid.as_deref().filter(|cbid| is_set(cbid))
    }
}

// Empty strings and zero do not count as a bid.
fn is_set(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && value.parse::<f64>().map_or(true, |n| n != 0.0)
}
