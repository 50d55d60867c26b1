//! # Column Model
//!
//! A table is described by a list of [`ColumnDef`]s declared once per entity type. Each column
//! names a key into the row (one level of dot nesting, e.g. `meta.updatedAt`), a label, what the
//! user may do with it, and a [`ColumnKind`] saying how its value is displayed.
//!
//! ## Raw values vs. display text
//!
//! Rows expose raw [`CellValue`]s through [`TableRow::cell`]. Sorting, searching and filtering
//! all work on the raw value. Only the renderer asks the [`FormatterRegistry`] for display text,
//! so a price of `9.5` sorts as a number even though it is shown as `"$9.50"`.

use chrono::{DateTime, NaiveDate};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

// =============================================================================
// RAW VALUES
// =============================================================================

/// A typed cell value as read from a row.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<CellValue>),
    Record(BTreeMap<String, CellValue>),
}

impl CellValue {
    fn rank(&self) -> u8 {
        match self {
            CellValue::Null => 0,
            CellValue::Bool(_) => 1,
            CellValue::Number(_) => 2,
            CellValue::Text(_) => 3,
            CellValue::List(_) => 4,
            CellValue::Record(_) => 5,
        }
    }

    /// Total order used for sorting.
    ///
    /// Null sorts first, numbers compare numerically, text compares case-insensitively with a
    /// byte-wise tie-break. Values of different variants compare by variant.
    pub fn sort_cmp(&self, other: &CellValue) -> Ordering {
        match (self, other) {
            (CellValue::Bool(a), CellValue::Bool(b)) => a.cmp(b),
            (CellValue::Number(a), CellValue::Number(b)) => a.total_cmp(b),
            (CellValue::Text(a), CellValue::Text(b)) => a
                .to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b)),
            (CellValue::List(a), CellValue::List(b)) => {
                for (x, y) in a.iter().zip(b) {
                    let ord = x.sort_cmp(y);
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                a.len().cmp(&b.len())
            }
            (CellValue::Record(a), CellValue::Record(b)) => {
                for ((ka, va), (kb, vb)) in a.iter().zip(b) {
                    let ord = ka.cmp(kb).then_with(|| va.sort_cmp(vb));
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                a.len().cmp(&b.len())
            }
            _ => self.rank().cmp(&other.rank()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Plain text rendering used for search and for `Plain` columns.
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Text(s) => s.clone(),
            CellValue::List(items) => items
                .iter()
                .map(CellValue::to_text)
                .collect::<Vec<_>>()
                .join(", "),
            CellValue::Record(fields) => fields
                .values()
                .map(CellValue::to_text)
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

/// A row the table can display.
pub trait TableRow {
    /// Stable row identity, used for selection.
    type Key: Eq + Hash + Clone + std::fmt::Debug;

    fn row_key(&self) -> Self::Key;

    /// Resolves `key` (`field` or `field.nested`) to a raw value; unknown keys are `Null`.
    fn cell(&self, key: &str) -> CellValue;
}

// =============================================================================
// COLUMN DECLARATION
// =============================================================================

/// Badge colouring rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BadgeRule {
    /// Numeric thresholds. With `strict`, `good` and `warn` are exclusive lower bounds.
    Thresholds { good: f64, warn: f64, strict: bool },
    /// Success when the text equals the value, danger otherwise.
    Equals(&'static str),
}

impl BadgeRule {
    /// Stock: more than 50 is plenty, more than 20 is getting low.
    pub const STOCK: BadgeRule = BadgeRule::Thresholds {
        good: 50.0,
        warn: 20.0,
        strict: true,
    };
    pub const RATING: BadgeRule = BadgeRule::Thresholds {
        good: 4.0,
        warn: 3.0,
        strict: false,
    };
    pub const AVAILABILITY: BadgeRule = BadgeRule::Equals("In Stock");

    pub fn tone(&self, value: &CellValue) -> Tone {
        match (self, value) {
            (BadgeRule::Thresholds { good, warn, strict }, CellValue::Number(n)) => {
                let above = |bound: f64| if *strict { *n > bound } else { *n >= bound };
                if above(*good) {
                    Tone::Success
                } else if above(*warn) {
                    Tone::Warning
                } else {
                    Tone::Danger
                }
            }
            (BadgeRule::Equals(expected), CellValue::Text(s)) if s == expected => Tone::Success,
            (BadgeRule::Equals(_), _) => Tone::Danger,
            _ => Tone::Neutral,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnKind {
    Plain,
    /// `$12.50`
    Currency,
    /// `12.50%`
    Percentage,
    Decimal(usize),
    Badge(BadgeRule),
    /// ISO-8601 timestamp shown as `M/D/YYYY`.
    Date,
    /// Formatter registered under this name in the [`FormatterRegistry`].
    Custom(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub key: &'static str,
    pub label: &'static str,
    pub sortable: bool,
    pub hideable: bool,
    pub visible_by_default: bool,
    pub searchable: bool,
    pub kind: ColumnKind,
}

impl ColumnDef {
    /// A plain, hideable, visible, unsortable column.
    pub fn new(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            sortable: false,
            hideable: true,
            visible_by_default: true,
            searchable: false,
            kind: ColumnKind::Plain,
        }
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Always shown; the column menu does not offer it.
    pub fn fixed(mut self) -> Self {
        self.hideable = false;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible_by_default = false;
        self
    }

    pub fn searchable(mut self) -> Self {
        self.searchable = true;
        self
    }

    pub fn kind(mut self, kind: ColumnKind) -> Self {
        self.kind = kind;
        self
    }
}

/// The product table's columns, in display order.
pub fn product_columns() -> Vec<ColumnDef> {
    use ColumnKind::*;
    vec![
        ColumnDef::new("id", "ID").fixed(),
        ColumnDef::new("thumbnail", "Image").hidden(),
        ColumnDef::new("title", "Product Title").fixed().sortable().searchable(),
        ColumnDef::new("description", "Description").searchable(),
        ColumnDef::new("price", "Price").sortable().kind(Currency),
        ColumnDef::new("discountPercentage", "Discount").kind(Percentage),
        ColumnDef::new("rating", "Rating").sortable().kind(Custom("rating")),
        ColumnDef::new("stock", "Stock").sortable().kind(Badge(BadgeRule::STOCK)),
        ColumnDef::new("tags", "Tags").searchable().kind(Custom("tags")),
        ColumnDef::new("category", "Category").sortable().searchable(),
        ColumnDef::new("brand", "Brand").sortable().searchable(),
        ColumnDef::new("weight", "Weight (g)"),
        ColumnDef::new("dimensions", "Dimensions").kind(Custom("dimensions")),
        ColumnDef::new("sku", "SKU").searchable(),
        ColumnDef::new("warrantyInformation", "Warranty").hidden(),
        ColumnDef::new("shippingInformation", "Shipping").hidden(),
        ColumnDef::new("availabilityStatus", "Availability").kind(Badge(BadgeRule::AVAILABILITY)),
        ColumnDef::new("returnPolicy", "Return Policy").hidden(),
        ColumnDef::new("minimumOrderQuantity", "Min. Order").hidden(),
        ColumnDef::new("meta.updatedAt", "Last Updated").kind(Date),
    ]
}

// =============================================================================
// FORMATTING
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Neutral,
    Success,
    Warning,
    Danger,
}

/// Display text for one cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Cell {
    pub text: String,
    pub tone: Tone,
}

impl Cell {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: Tone::Neutral,
        }
    }
}

pub type Formatter = fn(&CellValue) -> Cell;

/// Maps [`ColumnKind`]s to display text. Custom formatters are looked up by name.
#[derive(Clone)]
pub struct FormatterRegistry {
    custom: HashMap<&'static str, Formatter>,
}

impl std::fmt::Debug for FormatterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.custom.keys().collect();
        names.sort();
        f.debug_struct("FormatterRegistry")
            .field("custom", &names)
            .finish()
    }
}

impl Default for FormatterRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register("dimensions", format_dimensions);
        registry.register("tags", format_tags);
        registry.register("rating", format_rating);
        registry
    }
}

impl FormatterRegistry {
    /// A registry without any custom formatters.
    pub fn empty() -> Self {
        Self {
            custom: HashMap::new(),
        }
    }

    pub fn register(&mut self, name: &'static str, formatter: Formatter) {
        self.custom.insert(name, formatter);
    }

    pub fn format(&self, kind: &ColumnKind, value: &CellValue) -> Cell {
        match kind {
            ColumnKind::Plain => Cell::plain(value.to_text()),
            ColumnKind::Currency => number_or_dash(value, |n| format!("${n:.2}")),
            ColumnKind::Percentage => number_or_dash(value, |n| format!("{n:.2}%")),
            ColumnKind::Decimal(places) => {
                number_or_dash(value, |n| format!("{n:.prec$}", prec = *places))
            }
            ColumnKind::Badge(rule) => Cell {
                text: value.to_text(),
                tone: rule.tone(value),
            },
            ColumnKind::Date => Cell::plain(format_date(value)),
            ColumnKind::Custom(name) => match self.custom.get(name) {
                Some(formatter) => formatter(value),
                None => {
                    tracing::warn!(formatter = name, "Unknown formatter");
                    Cell::plain(value.to_text())
                }
            },
        }
    }
}

fn number_or_dash(value: &CellValue, f: impl Fn(f64) -> String) -> Cell {
    Cell::plain(value.as_number().map(f).unwrap_or_else(|| "-".to_string()))
}

fn format_date(value: &CellValue) -> String {
    let CellValue::Text(raw) = value else {
        return value.to_text();
    };
    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return stamp.format("%-m/%-d/%Y").to_string();
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => date.format("%-m/%-d/%Y").to_string(),
        Err(_) => raw.clone(),
    }
}

fn format_dimensions(value: &CellValue) -> Cell {
    let CellValue::Record(fields) = value else {
        return Cell::plain("-");
    };
    let get = |name: &str| fields.get(name).and_then(CellValue::as_number);
    match (get("width"), get("height"), get("depth")) {
        (Some(w), Some(h), Some(d)) => Cell::plain(format!("{w}×{h}×{d} cm")),
        _ => Cell::plain("-"),
    }
}

fn format_tags(value: &CellValue) -> Cell {
    Cell::plain(value.to_text())
}

fn format_rating(value: &CellValue) -> Cell {
    match value.as_number() {
        Some(n) => Cell {
            text: format!("{n:.1} ★"),
            tone: BadgeRule::RATING.tone(value),
        },
        None => Cell::plain("-"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn ordering_rules() {
        assert_eq!(CellValue::Null.sort_cmp(&CellValue::Number(-5.0)), Ordering::Less);
        assert_eq!(
            CellValue::Number(9.0).sort_cmp(&CellValue::Number(10.0)),
            Ordering::Less
        );
        assert_eq!(text("apple").sort_cmp(&text("Banana")), Ordering::Less);
        assert_eq!(text("Apple").sort_cmp(&text("apple")), Ordering::Less);
    }

    #[test]
    fn builtin_formats() {
        let registry = FormatterRegistry::default();
        let n = CellValue::Number(12.5);
        assert_eq!(registry.format(&ColumnKind::Currency, &n).text, "$12.50");
        assert_eq!(registry.format(&ColumnKind::Percentage, &n).text, "12.50%");
        assert_eq!(registry.format(&ColumnKind::Decimal(1), &n).text, "12.5");
        assert_eq!(registry.format(&ColumnKind::Currency, &CellValue::Null).text, "-");
        assert_eq!(
            registry
                .format(&ColumnKind::Date, &text("2024-05-23T08:56:21.618Z"))
                .text,
            "5/23/2024"
        );
        assert_eq!(registry.format(&ColumnKind::Date, &text("soon")).text, "soon");
    }

    #[test]
    fn badge_thresholds() {
        let stock = ColumnKind::Badge(BadgeRule::STOCK);
        let registry = FormatterRegistry::default();
        let tone = |n: f64| registry.format(&stock, &CellValue::Number(n)).tone;
        assert_eq!(tone(51.0), Tone::Success);
        assert_eq!(tone(50.0), Tone::Warning);
        assert_eq!(tone(21.0), Tone::Warning);
        assert_eq!(tone(20.0), Tone::Danger);

        assert_eq!(BadgeRule::RATING.tone(&CellValue::Number(4.0)), Tone::Success);
        assert_eq!(BadgeRule::RATING.tone(&CellValue::Number(3.0)), Tone::Warning);
        assert_eq!(BadgeRule::RATING.tone(&CellValue::Number(2.9)), Tone::Danger);
        assert_eq!(BadgeRule::AVAILABILITY.tone(&text("In Stock")), Tone::Success);
        assert_eq!(BadgeRule::AVAILABILITY.tone(&text("Low Stock")), Tone::Danger);
    }

    #[test]
    fn custom_formatters() {
        let registry = FormatterRegistry::default();
        let mut dims = BTreeMap::new();
        dims.insert("width".to_string(), CellValue::Number(23.17));
        dims.insert("height".to_string(), CellValue::Number(14.43));
        dims.insert("depth".to_string(), CellValue::Number(28.01));
        assert_eq!(
            registry
                .format(&ColumnKind::Custom("dimensions"), &CellValue::Record(dims))
                .text,
            "23.17×14.43×28.01 cm"
        );
        assert_eq!(
            registry
                .format(&ColumnKind::Custom("dimensions"), &CellValue::Null)
                .text,
            "-"
        );
        let tags = CellValue::List(vec![text("beauty"), text("mascara")]);
        assert_eq!(
            registry.format(&ColumnKind::Custom("tags"), &tags).text,
            "beauty, mascara"
        );
        let rating = registry.format(&ColumnKind::Custom("rating"), &CellValue::Number(4.5));
        assert_eq!(rating.text, "4.5 ★");
        assert_eq!(rating.tone, Tone::Success);
    }

    #[test]
    fn product_column_flags() {
        let columns = product_columns();
        assert_eq!(columns.len(), 20);
        let fixed: Vec<_> = columns.iter().filter(|c| !c.hideable).map(|c| c.key).collect();
        assert_eq!(fixed, ["id", "title"]);
        let sortable: Vec<_> = columns.iter().filter(|c| c.sortable).map(|c| c.label).collect();
        assert_eq!(
            sortable,
            ["Product Title", "Price", "Rating", "Stock", "Category", "Brand"]
        );
        let hidden: Vec<_> = columns
            .iter()
            .filter(|c| !c.visible_by_default)
            .map(|c| c.label)
            .collect();
        assert_eq!(
            hidden,
            ["Image", "Warranty", "Shipping", "Return Policy", "Min. Order"]
        );
    }
}
