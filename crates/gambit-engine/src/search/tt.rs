//! Direct-mapped transposition table.
//!
//! One entry per slot, addressed by `fingerprint & (capacity - 1)`. Stores
//! always overwrite whatever occupies the slot. The full fingerprint is kept
//! in the entry and compared on probe, so a slot taken over by another
//! position reads as a miss; true 64-bit fingerprint collisions are not
//! detected.

use gambit_core::Move;

use crate::search::negamax::MATE_THRESHOLD;

/// Slot count used by [`TranspositionTable::default`].
pub const DEFAULT_CAPACITY: usize = 1 << 20;

/// Kind of score stored in an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// The score is the exact minimax value.
    Exact,
    /// The true value is at least the score (failed high).
    LowerBound,
    /// The true value is at most the score (failed low).
    UpperBound,
}

/// One remembered search result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtEntry {
    pub fingerprint: u64,
    pub best_move: Move,
    pub depth: u8,
    /// Score relative to the probing node once returned by [`TranspositionTable::probe`].
    pub score: i32,
    pub bound: Bound,
}

impl TtEntry {
    /// The stored score if it settles a node searched to `depth` with window `(alpha, beta)`.
    pub fn cutoff(&self, depth: u8, alpha: i32, beta: i32) -> Option<i32> {
        if self.depth < depth {
            return None;
        }
        let usable = match self.bound {
            Bound::Exact => true,
            Bound::LowerBound => self.score >= beta,
            Bound::UpperBound => self.score <= alpha,
        };
        usable.then_some(self.score)
    }
}

/// Convert a search score to TT-storable form.
///
/// Mate scores count plies from the root. They are stored as distance from
/// the node instead so a transposition reached at another ply reads them
/// correctly.
pub fn score_to_tt(score: i32, ply: usize) -> i32 {
    let ply = ply as i32;
    if score > MATE_THRESHOLD {
        score + ply
    } else if score < -MATE_THRESHOLD {
        score - ply
    } else {
        score
    }
}

/// Reverse of [`score_to_tt`].
pub fn score_from_tt(score: i32, ply: usize) -> i32 {
    let ply = ply as i32;
    if score > MATE_THRESHOLD {
        score - ply
    } else if score < -MATE_THRESHOLD {
        score + ply
    } else {
        score
    }
}

/// Fixed-capacity memo of searched positions.
///
/// Owned by one searcher and reused across its searches.
pub struct TranspositionTable {
    slots: Box<[Option<TtEntry>]>,
    mask: u64,
}

impl TranspositionTable {
    /// Create a table with `capacity` slots, rounded down to a power of two.
    pub fn new(capacity: usize) -> Self {
        let capacity = match capacity {
            0 | 1 => 1,
            n if n.is_power_of_two() => n,
            n => n.next_power_of_two() >> 1,
        };
        Self {
            slots: vec![None; capacity].into_boxed_slice(),
            mask: (capacity - 1) as u64,
        }
    }

    /// Create the largest table that fits in `mb` megabytes.
    pub fn with_megabytes(mb: usize) -> Self {
        let bytes = mb.max(1) * 1024 * 1024;
        Self::new(bytes / std::mem::size_of::<Option<TtEntry>>())
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Empty every slot, keeping the allocation.
    pub fn clear(&mut self) {
        self.slots.fill(None);
    }

    #[inline]
    fn index(&self, fingerprint: u64) -> usize {
        (fingerprint & self.mask) as usize
    }

    /// Look up `fingerprint`, with mate scores made relative to `ply`.
    pub fn probe(&self, fingerprint: u64, ply: usize) -> Option<TtEntry> {
        let entry = self.slots[self.index(fingerprint)]?;
        if entry.fingerprint != fingerprint {
            return None;
        }
        Some(TtEntry {
            score: score_from_tt(entry.score, ply),
            ..entry
        })
    }

    /// Record a result, replacing the slot's previous occupant.
    pub fn store(
        &mut self,
        fingerprint: u64,
        best_move: Move,
        depth: u8,
        score: i32,
        bound: Bound,
        ply: usize,
    ) {
        let index = self.index(fingerprint);
        self.slots[index] = Some(TtEntry {
            fingerprint,
            best_move,
            depth,
            score: score_to_tt(score, ply),
            bound,
        });
    }

    /// Occupancy of the first thousand slots, in per-mille.
    pub fn hashfull(&self) -> u32 {
        let sample = self.slots.len().min(1000);
        let used = self.slots[..sample].iter().filter(|slot| slot.is_some()).count();
        (used * 1000 / sample) as u32
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl std::fmt::Debug for TranspositionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranspositionTable")
            .field("capacity", &self.slots.len())
            .field("hashfull", &self.hashfull())
            .finish()
    }
}
