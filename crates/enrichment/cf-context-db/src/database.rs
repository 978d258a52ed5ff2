//! ContextDatabase - shared, load-once selector index.

use ahash::RandomState;
use cf_error::{ImportError, ScannerError};
use cf_types::ContextualRecord;
use hashbrown::HashMap;
use std::borrow::Cow;
use std::ops::Range;
use std::sync::{Arc, OnceLock};

/// How selectors are compared, fixed when the table is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchMode {
    /// Case-sensitive exact match.
    #[default]
    Exact,
    /// Selectors are folded to lowercase for indexing and lookup.
    IgnoreCase,
}

impl MatchMode {
    pub fn from_ignore_case(ignore_case: bool) -> Self {
        if ignore_case {
            Self::IgnoreCase
        } else {
            Self::Exact
        }
    }

    pub fn ignore_case(self) -> bool {
        self == Self::IgnoreCase
    }
}

/// Frozen table built by a successful import.
///
/// Records live in one arena, grouped by selector in first-insertion order;
/// within a group they keep file order. The index maps each (possibly
/// case-folded) selector to its range in the arena.
#[derive(Debug)]
struct ContextTable {
    records: Vec<ContextualRecord>,
    index: HashMap<String, Range<usize>, RandomState>,
    ordered_selectors: Vec<String>,
    mode: MatchMode,
}

impl ContextTable {
    fn build<I>(records: I, mode: MatchMode) -> Result<Self, ScannerError>
    where
        I: IntoIterator<Item = Result<ContextualRecord, ScannerError>>,
    {
        let mut groups: Vec<Vec<ContextualRecord>> = Vec::new();
        let mut slots: HashMap<String, usize, RandomState> = HashMap::default();
        let mut ordered_selectors = Vec::new();
        let mut total = 0;

        for record in records {
            let record = record?;
            let key = fold_selector(record.selector(), mode);

            let slot = match slots.get(&*key) {
                Some(&slot) => slot,
                None => {
                    let slot = groups.len();
                    slots.insert(key.into_owned(), slot);
                    ordered_selectors.push(record.selector().to_string());
                    groups.push(Vec::new());
                    slot
                }
            };

            groups[slot].push(record);
            total += 1;
        }

        let mut arena = Vec::with_capacity(total);
        let mut ranges = Vec::with_capacity(groups.len());
        for group in groups {
            let start = arena.len();
            arena.extend(group);
            ranges.push(start..arena.len());
        }

        let index = slots
            .into_iter()
            .map(|(key, slot)| (key, ranges[slot].clone()))
            .collect();

        Ok(Self {
            records: arena,
            index,
            ordered_selectors,
            mode,
        })
    }

    fn lookup(&self, selector: &str) -> &[ContextualRecord] {
        let key = fold_selector(selector, self.mode);
        self.index
            .get(&*key)
            .map(|range| &self.records[range.clone()])
            .unwrap_or(&[])
    }
}

fn fold_selector(selector: &str, mode: MatchMode) -> Cow<'_, str> {
    match mode {
        MatchMode::Exact => Cow::Borrowed(selector),
        MatchMode::IgnoreCase => Cow::Owned(selector.to_lowercase()),
    }
}

/// Reference-counted selector → records index.
///
/// Cloning a `ContextDatabase` shares the same table; the table is freed
/// when the last clone is dropped. A database is created empty and
/// populated at most once by [`import`](Self::import), which also fixes
/// its [`MatchMode`]. Once loaded it is immutable, so lookups from any
/// number of threads need no locking.
#[derive(Clone, Default)]
pub struct ContextDatabase {
    shared: Arc<OnceLock<ContextTable>>,
}

impl std::fmt::Debug for ContextDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextDatabase")
            .field("loaded", &self.is_loaded())
            .field("mode", &self.match_mode())
            .field("selectors", &self.selector_count())
            .field("records", &self.len())
            .field("ref_count", &self.ref_count())
            .finish()
    }
}

impl ContextDatabase {
    /// Creates a new empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Imports a record sequence, consuming it to the end.
    ///
    /// The import is atomic: if any record fails to scan, nothing is kept
    /// and the database stays unloaded. Importing into a loaded database is
    /// rejected with [`ImportError::AlreadyLoaded`].
    ///
    /// Returns the number of imported records.
    pub fn import<I>(&self, records: I, mode: MatchMode) -> Result<usize, ImportError>
    where
        I: IntoIterator<Item = Result<ContextualRecord, ScannerError>>,
    {
        if self.is_loaded() {
            return Err(ImportError::AlreadyLoaded);
        }

        let table = ContextTable::build(records, mode)?;
        let count = table.records.len();

        self.shared
            .set(table)
            .map_err(|_| ImportError::AlreadyLoaded)?;

        Ok(count)
    }

    /// Returns true once an import has succeeded.
    pub fn is_loaded(&self) -> bool {
        self.shared.get().is_some()
    }

    /// Returns the match mode of the loaded table, `Exact` while unloaded.
    pub fn match_mode(&self) -> MatchMode {
        self.shared
            .get()
            .map(|table| table.mode)
            .unwrap_or_default()
    }

    /// Returns true if selectors are matched case-insensitively.
    pub fn ignore_case(&self) -> bool {
        self.match_mode().ignore_case()
    }

    /// Returns true if at least one record is filed under `selector`.
    pub fn contains(&self, selector: &str) -> bool {
        !self.records(selector).is_empty()
    }

    /// Returns the records filed under `selector`, in insertion order.
    pub fn records(&self, selector: &str) -> &[ContextualRecord] {
        match self.shared.get() {
            Some(table) => table.lookup(selector),
            None => &[],
        }
    }

    /// Calls `visitor` for every record under `selector`, in insertion order.
    pub fn for_each_record<F>(&self, selector: &str, visitor: F)
    where
        F: FnMut(&ContextualRecord),
    {
        self.records(selector).iter().for_each(visitor);
    }

    /// Returns all distinct selectors in first-insertion order.
    pub fn ordered_selectors(&self) -> &[String] {
        self.shared
            .get()
            .map(|table| table.ordered_selectors.as_slice())
            .unwrap_or(&[])
    }

    /// Returns the total number of records.
    pub fn len(&self) -> usize {
        self.shared
            .get()
            .map(|table| table.records.len())
            .unwrap_or(0)
    }

    /// Returns true if the database holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of distinct selectors.
    pub fn selector_count(&self) -> usize {
        self.ordered_selectors().len()
    }

    /// Returns the number of handles sharing this database.
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.shared)
    }

    /// Returns true if both handles share the same underlying database.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }
}
