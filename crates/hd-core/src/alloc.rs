//! Per-kind id allocators.
//!
//! An [`IdAllocators`] holds one monotonically increasing counter per
//! [`EntityKind`].  It is plain owned state: every map instance carries its
//! own set, so two independently loaded maps never share a counter.  Merging
//! two maps therefore requires renumbering one side before the union.
//!
//! Each counter stores the **next** id to hand out, so after any sequence of
//! `allocate`/`observe` calls the counter is strictly greater than every id
//! of that kind it has seen.  Counters are `i64` so that observing
//! `i32::MAX` cannot overflow; `allocate` fails once a kind's id space is
//! used up.

use crate::error::{HdError, HdResult};
use crate::ids::{EntityKind, TypedId};

/// First id handed out by a fresh allocator.
pub const FIRST_ID: i32 = 1;

/// One id counter per entity kind.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IdAllocators {
    next: [i64; EntityKind::COUNT],
}

impl IdAllocators {
    /// All counters at [`FIRST_ID`].
    pub fn new() -> Self {
        Self { next: [FIRST_ID as i64; EntityKind::COUNT] }
    }

    /// Mint a fresh id of type `I` and advance that kind's counter.
    ///
    /// # Errors
    ///
    /// [`HdError::IdsExhausted`] once `i32::MAX` has been handed out or
    /// observed for this kind.
    #[inline]
    pub fn allocate<I: TypedId>(&mut self) -> HdResult<I> {
        let slot = &mut self.next[I::KIND.slot()];
        let id = i32::try_from(*slot).map_err(|_| HdError::IdsExhausted { kind: I::KIND })?;
        *slot += 1;
        Ok(I::from_raw(id))
    }

    /// The unset sentinel for `I`.
    #[inline]
    pub fn unset<I: TypedId>() -> I {
        I::from_raw(0)
    }

    /// The id the next call to `allocate` for `kind` would return.  Past
    /// `i32::MAX` once the kind is exhausted.
    #[inline]
    pub fn next(&self, kind: EntityKind) -> i64 {
        self.next[kind.slot()]
    }

    /// Record an id that was assigned elsewhere (e.g. read from a map file)
    /// so it is never handed out again.  Unset ids are ignored.
    pub fn observe<I: TypedId>(&mut self, id: I) {
        if id.is_set() {
            self.observe_raw(I::KIND, id.raw());
        }
    }

    /// Untyped form of [`observe`](Self::observe).
    pub fn observe_raw(&mut self, kind: EntityKind, raw: i32) {
        let slot = &mut self.next[kind.slot()];
        let past = i64::from(raw) + 1;
        if past > *slot {
            *slot = past;
        }
    }

    /// `true` if `raw` could still be returned by a future `allocate` for
    /// `kind`, i.e. the counter is behind an id already in use.
    #[inline]
    pub fn is_behind(&self, kind: EntityKind, raw: i32) -> bool {
        i64::from(raw) >= self.next[kind.slot()]
    }

    /// Reset every counter to [`FIRST_ID`].
    pub fn reset(&mut self) {
        self.next = [FIRST_ID as i64; EntityKind::COUNT];
    }
}

impl Default for IdAllocators {
    fn default() -> Self {
        Self::new()
    }
}
