use crate::array::Array;
use crate::error::{ConvError, ErrorKind};
use crate::str::Str;
use crate::time::Datetime;
use crate::value;

/// Tables with at least this many entries use the hash index for lookups.
const INDEXED_TABLE_THRESHOLD: usize = 8;

/// A key/value pair holding the raw, unparsed text of its value.
///
/// The text is decoded on demand by the typed accessors, so a value that is
/// never read is never decoded.
#[derive(PartialEq)]
pub struct KeyValue<'a> {
    pub(crate) key: Str<'a>,
    pub(crate) raw: &'a str,
}

impl<'a> KeyValue<'a> {
    /// The normalized key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The raw value text as it appeared in the document.
    pub fn raw(&self) -> &'a str {
        self.raw
    }

    /// Decodes the value as a boolean.
    pub fn as_bool(&self) -> Result<bool, ConvError> {
        value::decode_bool(self.raw)
    }

    /// Decodes the value as an integer.
    pub fn as_integer(&self) -> Result<i64, ConvError> {
        value::decode_integer(self.raw)
    }

    /// Decodes the value as a float.
    pub fn as_float(&self) -> Result<f64, ConvError> {
        value::decode_float(self.raw)
    }

    /// Decodes the value as a string, normalizing escapes.
    pub fn as_string(&self) -> Result<Str<'a>, ConvError> {
        value::decode_string(self.raw)
    }

    /// Decodes the value as a timestamp.
    pub fn as_datetime(&self) -> Result<Datetime, ConvError> {
        value::decode_datetime(self.raw)
    }
}

impl std::fmt::Debug for KeyValue<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.raw)
    }
}

/// A named entry of a table: pair, array, or sub-table.
#[derive(Clone, Copy)]
pub enum Entry<'t, 'a> {
    /// A key/value pair.
    Pair(&'t KeyValue<'a>),
    /// An array, from a `[...]` value or `[[name]]` headers.
    Array(&'t Array<'a>),
    /// A sub-table.
    Table(&'t Table<'a>),
}

impl<'t, 'a> Entry<'t, 'a> {
    /// Returns the pair, if this entry is one.
    pub fn as_pair(self) -> Option<&'t KeyValue<'a>> {
        match self {
            Entry::Pair(kv) => Some(kv),
            _ => None,
        }
    }

    /// Returns the array, if this entry is one.
    pub fn as_array(self) -> Option<&'t Array<'a>> {
        match self {
            Entry::Array(array) => Some(array),
            _ => None,
        }
    }

    /// Returns the table, if this entry is one.
    pub fn as_table(self) -> Option<&'t Table<'a>> {
        match self {
            Entry::Table(table) => Some(table),
            _ => None,
        }
    }
}

impl std::fmt::Debug for Entry<'_, '_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Entry::Pair(kv) => kv.fmt(f),
            Entry::Array(array) => array.fmt(f),
            Entry::Table(table) => table.fmt(f),
        }
    }
}

/// Where a name resolves within a table: the owning collection and the
/// index into it. Indices are stable — the parser only appends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Slot {
    Pair(usize),
    Array(usize),
    Table(usize),
}

/// A table: a named (or root) scope of key/value pairs, arrays, and
/// sub-tables.
///
/// A key is unique across all three collections; within each collection
/// entries keep declaration order. Lookup is a linear scan for small tables
/// and a hash index once a table grows past a threshold.
#[derive(PartialEq)]
pub struct Table<'a> {
    pairs: Vec<KeyValue<'a>>,
    arrays: Vec<(Str<'a>, Array<'a>)>,
    tables: Vec<(Str<'a>, Table<'a>)>,
    index: Option<foldhash::HashMap<Box<str>, Slot>>,
    implicit: bool,
}

impl<'a> Table<'a> {
    /// An explicitly defined table.
    pub(crate) fn new() -> Self {
        Table {
            pairs: Vec::new(),
            arrays: Vec::new(),
            tables: Vec::new(),
            index: None,
            implicit: false,
        }
    }

    /// A table auto-created while walking a header path.
    pub(crate) fn new_implicit() -> Self {
        Table {
            implicit: true,
            ..Table::new()
        }
    }

    /// Promote: a later `[header]` explicitly declared this table.
    pub(crate) fn set_explicit(&mut self) {
        self.implicit = false;
    }

    /// Returns `true` if the table was only ever created implicitly by
    /// walking a header path, and has not been declared by a header of its
    /// own.
    pub fn is_implicit(&self) -> bool {
        self.implicit
    }

    /// Returns the total number of entries across pairs, arrays, and
    /// sub-tables.
    pub fn len(&self) -> usize {
        self.pairs.len() + self.arrays.len() + self.tables.len()
    }

    /// Returns `true` if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Looks a name up across all three collections.
    pub fn get(&self, name: &str) -> Option<Entry<'_, 'a>> {
        Some(match self.find_slot(name)? {
            Slot::Pair(i) => Entry::Pair(&self.pairs[i]),
            Slot::Array(i) => Entry::Array(&self.arrays[i].1),
            Slot::Table(i) => Entry::Table(&self.tables[i].1),
        })
    }

    /// Returns the pair under `name`, if there is one.
    pub fn get_pair(&self, name: &str) -> Option<&KeyValue<'a>> {
        self.get(name)?.as_pair()
    }

    /// Returns the array under `name`, if there is one.
    pub fn get_array(&self, name: &str) -> Option<&Array<'a>> {
        self.get(name)?.as_array()
    }

    /// Returns the sub-table under `name`, if there is one.
    pub fn get_table(&self, name: &str) -> Option<&Table<'a>> {
        self.get(name)?.as_table()
    }

    /// Returns `true` if the table contains the key.
    pub fn contains_key(&self, name: &str) -> bool {
        self.find_slot(name).is_some()
    }

    /// All key/value pairs, in declaration order.
    pub fn pairs(&self) -> &[KeyValue<'a>] {
        &self.pairs
    }

    /// All named arrays, in declaration order.
    pub fn arrays(&self) -> &[(Str<'a>, Array<'a>)] {
        &self.arrays
    }

    /// All sub-tables, in declaration order.
    pub fn tables(&self) -> &[(Str<'a>, Table<'a>)] {
        &self.tables
    }

    /// Enumerates entry names: pairs, then arrays, then sub-tables, each in
    /// declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.pairs
            .iter()
            .map(|kv| kv.key.as_str())
            .chain(self.arrays.iter().map(|(key, _)| key.as_str()))
            .chain(self.tables.iter().map(|(key, _)| key.as_str()))
    }

    /// Enumerates `(name, entry)` in the same order as [`keys`](Self::keys).
    pub fn entries(&self) -> impl Iterator<Item = (&str, Entry<'_, 'a>)> {
        self.pairs
            .iter()
            .map(|kv| (kv.key.as_str(), Entry::Pair(kv)))
            .chain(
                self.arrays
                    .iter()
                    .map(|(key, array)| (key.as_str(), Entry::Array(array))),
            )
            .chain(
                self.tables
                    .iter()
                    .map(|(key, table)| (key.as_str(), Entry::Table(table))),
            )
    }

    // -- construction (parser only) -----------------------------------------

    pub(crate) fn find_slot(&self, name: &str) -> Option<Slot> {
        if let Some(index) = &self.index {
            return index.get(name).copied();
        }
        if let Some(i) = self.pairs.iter().position(|kv| kv.key == *name) {
            return Some(Slot::Pair(i));
        }
        if let Some(i) = self.arrays.iter().position(|(key, _)| *key == *name) {
            return Some(Slot::Array(i));
        }
        if let Some(i) = self.tables.iter().position(|(key, _)| *key == *name) {
            return Some(Slot::Table(i));
        }
        None
    }

    /// Inserts a pair, or reports the duplicate name.
    pub(crate) fn try_insert_pair(&mut self, key: Str<'a>, raw: &'a str) -> Result<(), ErrorKind> {
        self.check_unique(&key)?;
        self.note_insert(&key, Slot::Pair(self.pairs.len()));
        self.pairs.push(KeyValue { key, raw });
        self.maybe_build_index();
        Ok(())
    }

    /// Inserts an array, or reports the duplicate name. Returns the index
    /// into [`arrays`](Self::arrays).
    pub(crate) fn try_insert_array(
        &mut self,
        key: Str<'a>,
        array: Array<'a>,
    ) -> Result<usize, ErrorKind> {
        self.check_unique(&key)?;
        let i = self.arrays.len();
        self.note_insert(&key, Slot::Array(i));
        self.arrays.push((key, array));
        self.maybe_build_index();
        Ok(i)
    }

    /// Inserts a sub-table, or reports the duplicate name. Returns the index
    /// into [`tables`](Self::tables).
    pub(crate) fn try_insert_table(
        &mut self,
        key: Str<'a>,
        table: Table<'a>,
    ) -> Result<usize, ErrorKind> {
        self.check_unique(&key)?;
        let i = self.tables.len();
        self.note_insert(&key, Slot::Table(i));
        self.tables.push((key, table));
        self.maybe_build_index();
        Ok(i)
    }

    pub(crate) fn array_mut(&mut self, i: usize) -> &mut Array<'a> {
        &mut self.arrays[i].1
    }

    pub(crate) fn table_mut(&mut self, i: usize) -> &mut Table<'a> {
        &mut self.tables[i].1
    }

    fn check_unique(&self, key: &str) -> Result<(), ErrorKind> {
        if self.find_slot(key).is_some() {
            return Err(ErrorKind::DuplicateKey {
                key: key.to_string(),
            });
        }
        Ok(())
    }

    fn note_insert(&mut self, key: &str, slot: Slot) {
        if let Some(index) = &mut self.index {
            index.insert(key.into(), slot);
        }
    }

    fn maybe_build_index(&mut self) {
        if self.index.is_some() || self.len() < INDEXED_TABLE_THRESHOLD {
            return;
        }
        let mut index = foldhash::HashMap::default();
        for (i, kv) in self.pairs.iter().enumerate() {
            index.insert(kv.key.as_str().into(), Slot::Pair(i));
        }
        for (i, (key, _)) in self.arrays.iter().enumerate() {
            index.insert(key.as_str().into(), Slot::Array(i));
        }
        for (i, (key, _)) in self.tables.iter().enumerate() {
            index.insert(key.as_str().into(), Slot::Table(i));
        }
        self.index = Some(index);
    }
}

impl std::fmt::Debug for Table<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for (name, entry) in self.entries() {
            map.entry(&name, &entry);
        }
        map.finish()
    }
}

#[cfg(test)]
#[path = "./table_tests.rs"]
mod tests;
