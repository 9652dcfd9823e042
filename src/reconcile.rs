//! Generic natural-key reconciliation.
//!
//! One routine, [`reconcile`], drives the insert/update/duplicate decision for
//! every entity type; the per-entity pieces (natural-key lookup, full
//! mutable-field equality, insert, mutable-field rewrite) live behind the
//! [`Reconcile`] trait, implemented in [`crate::records`].
//!
//! Equality covers every mutable attribute, not just the natural key, so a
//! byte-identical re-delivery is classified as a duplicate and a genuine
//! correction as an update that changes only the corrected fields. Natural-key
//! fields and creation provenance are never rewritten.

use diesel::{QueryResult, SqliteConnection};

/// Outcome of reconciling one candidate row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// No row matched the natural key; the candidate was inserted.
    Inserted,
    /// A row matched and differed in at least one mutable field; it was rewritten.
    Updated,
    /// A row matched and every mutable field was equal; nothing was written.
    Duplicate,
}

/// Per-file row counters, written back to the `load_log` entry.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RowTally {
    /// Rows inserted.
    pub fresh: i32,
    /// Rows updated in place.
    pub updated: i32,
    /// Rows identical to the stored row.
    pub duplicate: i32,
    /// Rows that failed to parse.
    pub failed: i32,
    /// Placeholder instruments created while loading prices.
    pub stub: i32,
    /// Total rows seen.
    pub total: i32,
}

/// Natural-key upsert protocol, implemented once per entity type.
pub trait Reconcile {
    /// Stored row type returned by lookups and writes.
    type Row;

    /// Look up the existing row by the entity's natural key.
    fn find_existing(&self, conn: &mut SqliteConnection) -> QueryResult<Option<Self::Row>>;

    /// Field-by-field equality over every mutable attribute.
    fn matches(&self, existing: &Self::Row) -> bool;

    /// Insert the candidate, recording `run_id` as creation provenance.
    fn insert(&self, conn: &mut SqliteConnection, run_id: i32) -> QueryResult<Self::Row>;

    /// Rewrite the existing row's mutable fields from the candidate; the
    /// natural key and creation provenance stay untouched.
    fn apply_update(
        &self,
        conn: &mut SqliteConnection,
        existing: &Self::Row,
        run_id: i32,
    ) -> QueryResult<Self::Row>;
}

/// Reconcile one candidate: insert, update, or no-op, bumping exactly one
/// counter on `tally`.
pub fn reconcile<T: Reconcile>(
    conn: &mut SqliteConnection,
    run_id: i32,
    candidate: &T,
    tally: &mut RowTally,
) -> QueryResult<(Outcome, T::Row)> {
    match candidate.find_existing(conn)? {
        None => {
            let row = candidate.insert(conn, run_id)?;
            tally.fresh += 1;
            Ok((Outcome::Inserted, row))
        }
        Some(existing) if candidate.matches(&existing) => {
            tally.duplicate += 1;
            Ok((Outcome::Duplicate, existing))
        }
        Some(existing) => {
            let row = candidate.apply_update(conn, &existing, run_id)?;
            tally.updated += 1;
            Ok((Outcome::Updated, row))
        }
    }
}
