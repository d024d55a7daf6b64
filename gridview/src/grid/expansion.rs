//! Expansion state: which row, if any, has its detail panel open.

use std::mem;

/// Single-slot expansion state.
///
/// At most one row is expanded. Expanding another row replaces the slot,
/// which collapses the previous one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expansion<K> {
    Collapsed,
    Expanded(K),
}

impl<K> Default for Expansion<K> {
    fn default() -> Self {
        Expansion::Collapsed
    }
}

impl<K: PartialEq> Expansion<K> {
    /// Toggle the row with the given key: close it if it is the open one,
    /// otherwise open it.
    pub fn toggle(&mut self, key: K) {
        *self = match mem::replace(self, Expansion::Collapsed) {
            Expansion::Expanded(open) if open == key => Expansion::Collapsed,
            _ => Expansion::Expanded(key),
        };
    }

    pub fn is_expanded(&self, key: &K) -> bool {
        matches!(self, Expansion::Expanded(open) if open == key)
    }

    /// The key of the expanded row.
    pub fn expanded(&self) -> Option<&K> {
        match self {
            Expansion::Expanded(key) => Some(key),
            Expansion::Collapsed => None,
        }
    }

    pub fn collapse(&mut self) {
        *self = Expansion::Collapsed;
    }
}

/// Identity of a row slice: its address and length.
///
/// A caller that passes the same `Vec` again keeps its expansion; a freshly
/// fetched page is a different allocation and starts collapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RowsIdentity {
    addr: usize,
    len: usize,
}

impl RowsIdentity {
    fn of<T>(rows: &[T]) -> Self {
        Self {
            addr: rows.as_ptr() as usize,
            len: rows.len(),
        }
    }
}

/// Local UI state of one Grid instance.
///
/// Owned by the view that renders the grid and bound with `Grid::state`.
/// Dropping it discards the expansion.
#[derive(Debug, Clone)]
pub struct GridState<K> {
    expansion: Expansion<K>,
    rows: Option<RowsIdentity>,
}

impl<K> Default for GridState<K> {
    fn default() -> Self {
        Self {
            expansion: Expansion::Collapsed,
            rows: None,
        }
    }
}

impl<K: PartialEq> GridState<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expansion(&self) -> &Expansion<K> {
        &self.expansion
    }

    pub fn expanded(&self) -> Option<&K> {
        self.expansion.expanded()
    }

    pub fn is_expanded(&self, key: &K) -> bool {
        self.expansion.is_expanded(key)
    }

    pub fn toggle(&mut self, key: K) {
        self.expansion.toggle(key);
    }

    pub fn collapse(&mut self) {
        self.expansion.collapse();
    }

    /// Whether `rows` differs from the slice seen on the previous render.
    pub(crate) fn rows_changed<T>(&self, rows: &[T]) -> bool {
        self.rows != Some(RowsIdentity::of(rows))
    }

    /// Record `rows` as the current collection, collapsing if it changed.
    /// Returns true when the expansion was discarded.
    pub(crate) fn sync_rows<T>(&mut self, rows: &[T]) -> bool {
        let identity = RowsIdentity::of(rows);
        if self.rows == Some(identity) {
            return false;
        }
        let had_expansion = self.rows.is_some() && self.expansion != Expansion::Collapsed;
        self.rows = Some(identity);
        self.expansion.collapse();
        had_expansion
    }
}
