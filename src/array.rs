use crate::error::ErrorKind;
use crate::table::Table;
use crate::value::ValueType;

/// The element shape of an array, fixed by its first element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArrayKind {
    /// Scalar values, all of one [`ValueType`].
    Value,
    /// Nested arrays.
    Array,
    /// Tables, either inline or accumulated from `[[name]]` headers.
    Table,
}

impl ArrayKind {
    pub(crate) fn name(self) -> &'static str {
        match self {
            ArrayKind::Value => "values",
            ArrayKind::Array => "arrays",
            ArrayKind::Table => "tables",
        }
    }
}

#[derive(PartialEq)]
enum Items<'a> {
    Empty,
    Values { vtype: ValueType, raws: Vec<&'a str> },
    Arrays(Vec<Array<'a>>),
    Tables(Vec<Table<'a>>),
}

/// A homogeneous array.
///
/// The first element fixes the [`kind`](Self::kind), and for value-kind
/// arrays also the [`value_type`](Self::value_type); an empty array has
/// neither. Scalar elements keep their raw text — decode them with the
/// [`value`](crate::value) routines.
#[derive(PartialEq)]
pub struct Array<'a> {
    items: Items<'a>,
}

impl<'a> Array<'a> {
    pub(crate) fn new() -> Self {
        Array { items: Items::Empty }
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        match &self.items {
            Items::Empty => 0,
            Items::Values { raws, .. } => raws.len(),
            Items::Arrays(items) => items.len(),
            Items::Tables(items) => items.len(),
        }
    }

    /// Returns `true` if the array contains no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the element shape, or `None` for an empty array.
    pub fn kind(&self) -> Option<ArrayKind> {
        match &self.items {
            Items::Empty => None,
            Items::Values { .. } => Some(ArrayKind::Value),
            Items::Arrays(_) => Some(ArrayKind::Array),
            Items::Tables(_) => Some(ArrayKind::Table),
        }
    }

    /// Returns the scalar element type for a value-kind array.
    pub fn value_type(&self) -> Option<ValueType> {
        match &self.items {
            Items::Values { vtype, .. } => Some(*vtype),
            _ => None,
        }
    }

    /// Returns the raw text of the scalar element at `index`.
    ///
    /// `None` if the array is not value-kind or the index is out of bounds.
    pub fn raw(&self, index: usize) -> Option<&'a str> {
        match &self.items {
            Items::Values { raws, .. } => raws.get(index).copied(),
            _ => None,
        }
    }

    /// Returns the nested array at `index`.
    ///
    /// `None` if the array is not array-kind or the index is out of bounds.
    pub fn array(&self, index: usize) -> Option<&Array<'a>> {
        match &self.items {
            Items::Arrays(items) => items.get(index),
            _ => None,
        }
    }

    /// Returns the table element at `index`.
    ///
    /// `None` if the array is not table-kind or the index is out of bounds.
    pub fn table(&self, index: usize) -> Option<&Table<'a>> {
        match &self.items {
            Items::Tables(items) => items.get(index),
            _ => None,
        }
    }

    /// Raw texts of all scalar elements; empty unless the array is
    /// value-kind.
    pub fn values(&self) -> &[&'a str] {
        match &self.items {
            Items::Values { raws, .. } => raws,
            _ => &[],
        }
    }

    /// All nested arrays; empty unless the array is array-kind.
    pub fn arrays(&self) -> &[Array<'a>] {
        match &self.items {
            Items::Arrays(items) => items,
            _ => &[],
        }
    }

    /// All table elements; empty unless the array is table-kind.
    pub fn tables(&self) -> &[Table<'a>] {
        match &self.items {
            Items::Tables(items) => items,
            _ => &[],
        }
    }

    // -- construction (parser only) -----------------------------------------

    /// Appends a scalar with an already-inferred type, fixing the array's
    /// kind and value type on first use.
    pub(crate) fn push_value(&mut self, raw: &'a str, vtype: ValueType) -> Result<(), ErrorKind> {
        match &mut self.items {
            Items::Empty => {
                self.items = Items::Values {
                    vtype,
                    raws: vec![raw],
                };
                Ok(())
            }
            Items::Values {
                vtype: fixed,
                raws,
            } => {
                if *fixed != vtype {
                    return Err(ErrorKind::ArrayTypeMismatch {
                        expected: fixed.name(),
                        found: vtype.name(),
                    });
                }
                raws.push(raw);
                Ok(())
            }
            _ => Err(self.kind_mismatch(ArrayKind::Value)),
        }
    }

    /// Appends a nested array, fixing the kind on first use.
    pub(crate) fn push_array(&mut self, child: Array<'a>) -> Result<(), ErrorKind> {
        match &mut self.items {
            Items::Empty => {
                self.items = Items::Arrays(vec![child]);
                Ok(())
            }
            Items::Arrays(items) => {
                items.push(child);
                Ok(())
            }
            _ => Err(self.kind_mismatch(ArrayKind::Array)),
        }
    }

    /// Appends a table element, fixing the kind on first use.
    pub(crate) fn push_table(&mut self, table: Table<'a>) -> Result<(), ErrorKind> {
        match &mut self.items {
            Items::Empty => {
                self.items = Items::Tables(vec![table]);
                Ok(())
            }
            Items::Tables(items) => {
                items.push(table);
                Ok(())
            }
            _ => Err(self.kind_mismatch(ArrayKind::Table)),
        }
    }

    /// Returns the last table element, for `[[name]]` accumulation and
    /// header-path descent.
    pub(crate) fn last_table_mut(&mut self) -> Option<&mut Table<'a>> {
        match &mut self.items {
            Items::Tables(items) => items.last_mut(),
            _ => None,
        }
    }

    fn kind_mismatch(&self, found: ArrayKind) -> ErrorKind {
        // kind() is Some here: the mismatch arms are unreachable when empty.
        let expected = self.kind().unwrap_or(found);
        ErrorKind::ArrayKindMismatch {
            expected: expected.name(),
            found: found.name(),
        }
    }
}

impl std::fmt::Debug for Array<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.items {
            Items::Empty => f.debug_list().finish(),
            Items::Values { raws, .. } => f.debug_list().entries(raws).finish(),
            Items::Arrays(items) => f.debug_list().entries(items).finish(),
            Items::Tables(items) => f.debug_list().entries(items).finish(),
        }
    }
}

#[cfg(test)]
#[path = "./array_tests.rs"]
mod tests;
