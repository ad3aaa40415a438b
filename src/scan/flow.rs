//! Flow records accumulated during the single-pass scan
//!
//! Append-only per-category lists and counters, populated in the same pass
//! as the symbol tables and read-only once the scan completes.

/// A state-mutating write (`var-set` / `map-set`).
#[derive(Debug, Clone, Copy)]
pub struct WriteRecord {
    pub line: u32,
    /// The written value mentions the calling principal.
    pub caller_derived: bool,
}

/// A cross-contract value transfer (stx/ft/nft transfer via contract-call?).
#[derive(Debug, Clone, Copy)]
pub struct TransferRecord {
    pub line: u32,
}

/// A branch-shaped construct (`if`/`match`/`fold`/`map`/`filter`).
#[derive(Debug, Clone, Copy)]
pub struct BranchRecord {
    pub line: u32,
    /// Loop-construct nesting depth at the branch site.
    pub depth: usize,
}

/// Per-category flow counters for one contract.
#[derive(Debug, Clone, Default)]
pub struct FlowProfile {
    pub writes: Vec<WriteRecord>,
    pub transfers: Vec<TransferRecord>,
    pub branches: Vec<BranchRecord>,
    pub loops: usize,
    pub conds: usize,
    pub asserts: usize,
    /// Principal/identity references (including type positions).
    pub principals: usize,
    /// Additions/multiplications outside an unsigned-literal context.
    pub overflows: usize,
    /// External calls whose target is a locally declared read-only function.
    pub read_only_calls: usize,
    /// Heuristically dynamic external-call targets.
    pub dynamic: usize,
    pub event_emits: usize,
    pub contract_creates: usize,
    /// Block-height / historical-state accesses.
    pub block_access: usize,
    /// `as-contract` privilege elevations.
    pub as_contract_uses: usize,
    /// Fold applications (subset of loop constructs).
    pub fold_ops: usize,
}

impl FlowProfile {
    pub fn max_branch_depth(&self) -> usize {
        self.branches.iter().map(|b| b.depth).max().unwrap_or(0)
    }
}
