//! Join planning.
//!
//! Join edges arrive unordered and undirected. The planner grows the set of
//! joined tables outward from the anchor: on each pass the first pending
//! edge (in input order) with exactly one side already joined emits a JOIN
//! for its other side. Passes repeat until nothing changes.
//!
//! ```text
//! tables: [a, b, c]
//! joins:  [b-c, a-b]
//!
//! pass 1: b-c  neither side joined, wait
//!         a-b  a joined          -> JOIN b
//! pass 2: b-c  b joined          -> JOIN c
//! ```
//!
//! A self-edge (`table1 == table2`) emits a JOIN for its table once that
//! table is joined. Other edges with both sides already joined are
//! redundant. Edges that never touch the joined set are disconnected. Both
//! are skipped.

use crate::model::Join;

/// One emitted JOIN: the edge and the table it brings in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JoinStep<'a> {
    pub join: &'a Join,
    pub table: &'a str,
}

/// Why an edge was left out of the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// `table1`, `table2` or `condition` is empty.
    Incomplete,
    /// Both sides were already joined by other edges.
    Redundant,
    /// Neither side ever reached the anchor.
    Disconnected,
}

/// An edge left out of the plan, by position in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkippedJoin {
    pub index: usize,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JoinPlan<'a> {
    pub steps: Vec<JoinStep<'a>>,
    /// Sorted by `index`.
    pub skipped: Vec<SkippedJoin>,
}

/// Plan the JOIN sequence for `joins`, starting from `anchor`.
pub fn plan_joins<'a>(anchor: &'a str, joins: &'a [Join]) -> JoinPlan<'a> {
    let mut plan = JoinPlan::default();
    let mut joined: Vec<&str> = vec![anchor];
    let mut pending: Vec<usize> = Vec::with_capacity(joins.len());

    for (index, join) in joins.iter().enumerate() {
        if join.is_complete() {
            pending.push(index);
        } else {
            plan.skipped.push(SkippedJoin {
                index,
                reason: SkipReason::Incomplete,
            });
        }
    }

    'passes: loop {
        let mut pos = 0;
        while pos < pending.len() {
            let index = pending[pos];
            let join = &joins[index];
            let has1 = joined.contains(&join.table1.as_str());
            let has2 = joined.contains(&join.table2.as_str());

            match (has1, has2) {
                (true, true) if join.table1 == join.table2 => {
                    pending.remove(pos);
                    plan.steps.push(JoinStep {
                        join,
                        table: &join.table2,
                    });
                    continue 'passes;
                }
                (true, true) => {
                    pending.remove(pos);
                    plan.skipped.push(SkippedJoin {
                        index,
                        reason: SkipReason::Redundant,
                    });
                }
                (true, false) | (false, true) => {
                    pending.remove(pos);
                    let table = if has1 { &join.table2 } else { &join.table1 };
                    joined.push(table);
                    plan.steps.push(JoinStep { join, table });
                    continue 'passes;
                }
                (false, false) => pos += 1,
            }
        }
        break;
    }

    plan.skipped.extend(pending.into_iter().map(|index| SkippedJoin {
        index,
        reason: SkipReason::Disconnected,
    }));
    plan.skipped.sort_by_key(|s| s.index);
    plan
}
