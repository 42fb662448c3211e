/// One paragraph mutation, expressed against indices that are valid at the
/// moment the operation runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOp {
    Delete { index: usize },
    /// Insert block `block` directly after paragraph `anchor`
    InsertAfter { anchor: usize, block: usize },
}

/// Ordered edit list for rewriting the paragraph range `[start, end)` with
/// `block_count` blocks, once block 0 has been written into `start`.
///
/// Deletes run from the highest index down so no pending index moves; the
/// inserts then chain forward from `start`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditPlan {
    ops: Vec<EditOp>,
}

impl EditPlan {
    pub fn for_region(start: usize, end: usize, block_count: usize) -> Self {
        let deletes = (start + 1..end).rev().map(|index| EditOp::Delete { index });
        let inserts = (1..block_count).map(|block| EditOp::InsertAfter {
            anchor: start + block - 1,
            block,
        });
        Self {
            ops: deletes.chain(inserts).collect(),
        }
    }

    pub fn ops(&self) -> &[EditOp] {
        &self.ops
    }
}
