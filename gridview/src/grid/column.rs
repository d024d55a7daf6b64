//! Column descriptors and accessor resolution.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use crate::error::GridError;

/// Trait for rows that can be displayed in a Grid.
///
/// `key` identifies the row within the rendered page; it is used for element
/// ids and for matching the expanded row, so keys must be unique per page.
/// `field` backs [`Accessor::Field`]; unknown names should return
/// [`CellValue::Empty`].
///
/// # Example
///
/// ```
/// use gridview::{CellValue, GridRow};
///
/// #[derive(Clone)]
/// struct Supplier {
///     id: u32,
///     name: String,
/// }
///
/// impl GridRow for Supplier {
///     type Key = u32;
///
///     fn key(&self) -> u32 {
///         self.id
///     }
///
///     fn field(&self, name: &str) -> CellValue {
///         match name {
///             "id" => self.id.into(),
///             "name" => self.name.as_str().into(),
///             _ => CellValue::Empty,
///         }
///     }
/// }
/// ```
pub trait GridRow: Clone + Send + Sync + 'static {
    /// The key type used to identify this row.
    type Key: Clone + Eq + Hash + ToString + fmt::Debug + Send + Sync + 'static;

    /// Return a unique key for this row.
    fn key(&self) -> Self::Key;

    /// Look up a field by name.
    fn field(&self, name: &str) -> CellValue {
        let _ = name;
        CellValue::Empty
    }
}

/// A displayable cell value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Int(n) => write!(f, "{n}"),
            CellValue::Float(n) => write!(f, "{n}"),
            CellValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

macro_rules! int_cell_value {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for CellValue {
                fn from(value: $ty) -> Self {
                    CellValue::Int(i64::from(value))
                }
            }
        )*
    };
}

int_cell_value!(i8, i16, i32, i64, u8, u16, u32);

impl<V: Into<CellValue>> From<Option<V>> for CellValue {
    fn from(value: Option<V>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

/// How a column extracts its value from a row.
pub enum Accessor<T> {
    /// A named field, resolved through [`GridRow::field`].
    Field(&'static str),
    /// A derivation from the whole row. Must not have side effects.
    Derived(Arc<dyn Fn(&T) -> CellValue + Send + Sync>),
}

impl<T> Clone for Accessor<T> {
    fn clone(&self) -> Self {
        match self {
            Accessor::Field(name) => Accessor::Field(*name),
            Accessor::Derived(f) => Accessor::Derived(Arc::clone(f)),
        }
    }
}

impl<T> fmt::Debug for Accessor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accessor::Field(name) => write!(f, "Field({name:?})"),
            Accessor::Derived(_) => write!(f, "Derived(..)"),
        }
    }
}

/// Column width specification.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColumnWidth {
    /// Fit the widest of header and cell values on the page.
    #[default]
    Auto,
    /// Fixed width in characters; longer values are clipped.
    Fixed(u16),
}

/// A grid column definition.
pub struct Column<T> {
    /// Header label, also the column's key within its set.
    pub header: String,
    pub accessor: Accessor<T>,
    /// Detail-only column: left out of the row, shown in the expanded panel.
    pub hidden: bool,
    /// Presentation hint copied onto every cell as element data `class`.
    pub class_name: Option<String>,
    pub width: ColumnWidth,
}

impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        Self {
            header: self.header.clone(),
            accessor: self.accessor.clone(),
            hidden: self.hidden,
            class_name: self.class_name.clone(),
            width: self.width,
        }
    }
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("header", &self.header)
            .field("accessor", &self.accessor)
            .field("hidden", &self.hidden)
            .field("class_name", &self.class_name)
            .field("width", &self.width)
            .finish()
    }
}

impl<T: GridRow> Column<T> {
    /// Column reading a named field of the row.
    pub fn field(header: impl Into<String>, name: &'static str) -> Self {
        Self::with_accessor(header, Accessor::Field(name))
    }

    /// Column computing its value from the row.
    pub fn derived<F>(header: impl Into<String>, f: F) -> Self
    where
        F: Fn(&T) -> CellValue + Send + Sync + 'static,
    {
        Self::with_accessor(header, Accessor::Derived(Arc::new(f)))
    }

    pub fn with_accessor(header: impl Into<String>, accessor: Accessor<T>) -> Self {
        Self {
            header: header.into(),
            accessor,
            hidden: false,
            class_name: None,
            width: ColumnWidth::default(),
        }
    }

    /// Mark this column detail-only.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn class_name(mut self, class: impl Into<String>) -> Self {
        self.class_name = Some(class.into());
        self
    }

    /// Set a fixed width for this column.
    pub fn fixed(mut self, width: u16) -> Self {
        self.width = ColumnWidth::Fixed(width);
        self
    }

    /// Resolve this column's value for a row.
    ///
    /// Panics raised by a derived accessor are not caught.
    pub fn resolve(&self, row: &T) -> CellValue {
        match &self.accessor {
            Accessor::Field(name) => row.field(name),
            Accessor::Derived(f) => f(row),
        }
    }
}

/// Split columns into (visible, detail-only), keeping relative order.
pub fn partition<T>(columns: &[Column<T>]) -> (Vec<&Column<T>>, Vec<&Column<T>>) {
    columns.iter().partition(|c| !c.hidden)
}

/// A column set whose headers are known to be unique.
pub struct Columns<T> {
    columns: Vec<Column<T>>,
}

impl<T> Clone for Columns<T> {
    fn clone(&self) -> Self {
        Self {
            columns: self.columns.clone(),
        }
    }
}

impl<T> fmt::Debug for Columns<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.columns).finish()
    }
}

impl<T> Columns<T> {
    pub fn new(columns: Vec<Column<T>>) -> Result<Self, GridError> {
        for (i, col) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.header == col.header) {
                return Err(GridError::DuplicateHeader(col.header.clone()));
            }
        }
        Ok(Self { columns })
    }

    pub fn as_slice(&self) -> &[Column<T>] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<T> From<Columns<T>> for Vec<Column<T>> {
    fn from(set: Columns<T>) -> Self {
        set.columns
    }
}

impl<T> TryFrom<Vec<Column<T>>> for Columns<T> {
    type Error = GridError;

    fn try_from(columns: Vec<Column<T>>) -> Result<Self, Self::Error> {
        Self::new(columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct Item {
        sku: u32,
        label: String,
    }

    impl GridRow for Item {
        type Key = u32;

        fn key(&self) -> u32 {
            self.sku
        }

        fn field(&self, name: &str) -> CellValue {
            match name {
                "sku" => self.sku.into(),
                "label" => self.label.as_str().into(),
                _ => CellValue::Empty,
            }
        }
    }

    fn item() -> Item {
        Item {
            sku: 7,
            label: "bolt".into(),
        }
    }

    #[test]
    fn field_accessor_reads_named_field() {
        let col = Column::<Item>::field("SKU", "sku");
        assert_eq!(col.resolve(&item()), CellValue::Int(7));
    }

    #[test]
    fn unknown_field_resolves_empty() {
        let col = Column::<Item>::field("Weight", "weight");
        assert_eq!(col.resolve(&item()), CellValue::Empty);
        assert_eq!(col.resolve(&item()).to_string(), "");
    }

    #[test]
    fn derived_accessor_sees_whole_row() {
        let col = Column::<Item>::derived("Tag", |i| format!("{}#{}", i.label, i.sku).into());
        assert_eq!(col.resolve(&item()).to_string(), "bolt#7");
    }

    #[test]
    fn partition_keeps_relative_order() {
        let cols = vec![
            Column::<Item>::field("A", "sku"),
            Column::<Item>::field("B", "label").hidden(),
            Column::<Item>::field("C", "sku"),
            Column::<Item>::field("D", "label").hidden(),
        ];
        let (visible, detail) = partition(&cols);
        let names = |v: &[&Column<Item>]| v.iter().map(|c| c.header.clone()).collect::<Vec<_>>();
        assert_eq!(names(&visible[..]), ["A", "C"]);
        assert_eq!(names(&detail[..]), ["B", "D"]);
    }

    #[test]
    fn duplicate_headers_are_rejected() {
        let cols = vec![
            Column::<Item>::field("Name", "label"),
            Column::<Item>::field("Name", "sku").hidden(),
        ];
        let err = Columns::new(cols).unwrap_err();
        assert_eq!(err, GridError::DuplicateHeader("Name".into()));
    }

    #[test]
    fn optional_values_convert() {
        assert_eq!(CellValue::from(None::<i32>), CellValue::Empty);
        assert_eq!(CellValue::from(Some("x")), CellValue::Text("x".into()));
    }
}
