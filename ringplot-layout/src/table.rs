//! Column access over the caller's in-memory `RecordBatch`.

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use arrow::record_batch::RecordBatch;
use itertools::Itertools;
use ordered_float::OrderedFloat;

use crate::error::RingplotError;

/// Sort key for one row of an ordering column.
///
/// Variant order makes nulls sort last.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum SortKey {
    Number(OrderedFloat<f64>),
    Text(String),
    Null,
}

/// Borrowed view of a record batch with name-based column lookups.
#[derive(Debug, Clone, Copy)]
pub struct Table<'a> {
    batch: &'a RecordBatch,
}

impl<'a> Table<'a> {
    pub fn new(batch: &'a RecordBatch) -> Self {
        Self { batch }
    }

    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn column(&self, name: &str) -> Result<&'a ArrayRef, RingplotError> {
        self.batch.column_by_name(name).ok_or_else(|| {
            let available = self
                .batch
                .schema()
                .fields()
                .iter()
                .map(|f| f.name().clone())
                .join(", ");
            RingplotError::ColumnNotFound(name.to_string(), available)
        })
    }

    /// Fail with the first missing column, before any data is touched
    pub fn require<'n>(
        &self,
        names: impl IntoIterator<Item = &'n str>,
    ) -> Result<(), RingplotError> {
        for name in names {
            self.column(name)?;
        }
        Ok(())
    }

    /// Fail unless the column exists and holds numbers
    pub fn require_numeric(&self, name: &str) -> Result<(), RingplotError> {
        let data_type = self.column(name)?.data_type();
        if data_type.is_numeric() {
            Ok(())
        } else {
            Err(RingplotError::NonNumericColumn {
                column: name.to_string(),
                data_type: data_type.clone(),
            })
        }
    }

    /// Column values as strings, `None` for nulls
    pub fn labels(&self, name: &str) -> Result<Vec<Option<String>>, RingplotError> {
        let column = self.column(name)?;
        let strings = cast(column, &DataType::Utf8)?;
        Ok(strings
            .as_string::<i32>()
            .iter()
            .map(|v| v.map(str::to_string))
            .collect())
    }

    /// Numeric column values as `f64`; nulls and non-finite values are `None`
    pub fn values(&self, name: &str) -> Result<Vec<Option<f64>>, RingplotError> {
        self.require_numeric(name)?;
        let numbers = cast(self.column(name)?, &DataType::Float64)?;
        Ok(numbers
            .as_primitive::<Float64Type>()
            .iter()
            .map(|v| v.filter(|v| v.is_finite()))
            .collect())
    }

    /// Row indices in data order, or stably sorted by `order_by` when given.
    ///
    /// Numeric columns sort numerically, anything else sorts by its string
    /// form. Nulls go last.
    pub fn row_order(&self, order_by: Option<&str>) -> Result<Vec<usize>, RingplotError> {
        let mut rows: Vec<usize> = (0..self.num_rows()).collect();
        let Some(order_by) = order_by else {
            return Ok(rows);
        };

        let column = self.column(order_by)?;
        let keys: Vec<SortKey> = if column.data_type().is_numeric() {
            self.values(order_by)?
                .into_iter()
                .map(|v| v.map_or(SortKey::Null, |v| SortKey::Number(OrderedFloat(v))))
                .collect()
        } else {
            self.labels(order_by)?
                .into_iter()
                .map(|v| v.map_or(SortKey::Null, SortKey::Text))
                .collect()
        };
        rows.sort_by(|a, b| keys[*a].cmp(&keys[*b]));
        Ok(rows)
    }
}
