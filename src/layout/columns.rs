use crate::model::*;

// ── Column packing ────────────────────────────────────────────────

/// Horizontal slot chosen for one span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub column: usize,
    pub total_columns: usize,
    /// Every column was taken; the span was stacked on column 0.
    pub overflowed: bool,
}

/// A run of transitively overlapping spans.
struct Slot {
    bounds: Span,
    members: Vec<usize>,
}

/// Assign columns to spans sorted by `start`.
///
/// Each span joins the slot whose bounds it overlaps (only the most recent slot
/// can, given the sort order) or opens a new one, then takes the lowest column
/// not held by an overlapping member. Every member of a slot shares one
/// `total_columns`, the highest column used in the slot plus one, so blocks
/// that overlap in time never overlap horizontally unless they overflowed.
pub fn pack_columns(sorted: &[Span], max_columns: usize) -> Vec<Placement> {
    let max_columns = max_columns.max(1);
    let mut placements: Vec<Placement> = Vec::with_capacity(sorted.len());
    let mut slots: Vec<Slot> = Vec::new();

    for (i, span) in sorted.iter().enumerate() {
        debug_assert!(i == 0 || sorted[i - 1].start <= span.start, "spans must be sorted");

        let slot_idx = match slots.last() {
            Some(last) if last.bounds.overlaps(span) => slots.len() - 1,
            _ => {
                slots.push(Slot {
                    bounds: *span,
                    members: Vec::new(),
                });
                slots.len() - 1
            }
        };
        let slot = &mut slots[slot_idx];
        slot.bounds = slot.bounds.cover(span);

        // A slot with n members can hold at most n columns, so n + 1 always has a free one.
        let mut occupied = vec![false; max_columns.min(slot.members.len() + 1)];
        for &m in &slot.members {
            if sorted[m].overlaps(span) {
                if let Some(taken) = occupied.get_mut(placements[m].column) {
                    *taken = true;
                }
            }
        }
        let (column, overflowed) = match occupied.iter().position(|taken| !taken) {
            Some(c) => (c, false),
            None => (0, true),
        };

        slot.members.push(i);
        placements.push(Placement {
            column,
            total_columns: 1,
            overflowed,
        });
    }

    for slot in &slots {
        let total = slot
            .members
            .iter()
            .map(|&m| placements[m].column + 1)
            .max()
            .unwrap_or(1);
        for &m in &slot.members {
            placements[m].total_columns = total;
        }
    }

    placements
}
