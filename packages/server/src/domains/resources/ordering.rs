//! Display-order planning within a partition.
//!
//! Everything here is pure: a planner receives the partition's current
//! `(id, order)` slots and returns the assignments to write. Repositories run
//! the planner and the writes inside one critical section, so a move, swap,
//! arrange, or compact is applied atomically or not at all.
//!
//! Rank is `order` ascending with the record id as tie-breaker, which keeps
//! adjacency deterministic even while two records transiently share an order.

use serde::{Deserialize, Serialize};

use super::{ResourceError, ResourceResult};
use crate::common::ResourceId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderSlot {
    pub id: ResourceId,
    pub order: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderAssignment {
    pub id: ResourceId,
    pub order: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl std::str::FromStr for Direction {
    type Err = ResourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            _ => Err(ResourceError::Validation(format!("Invalid direction: {}", s))),
        }
    }
}

/// A single atomic reordering of one partition.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ReorderCommand {
    /// Swap a record with its neighbour; no-op at either end.
    MoveAdjacent {
        id: ResourceId,
        direction: Direction,
    },
    /// Exchange the order values of two records.
    Swap {
        first: ResourceId,
        second: ResourceId,
    },
    /// Assign `1..N` following the given id sequence.
    Arrange { ids: Vec<ResourceId> },
    /// Collapse gaps and ties back to `1..N`.
    Compact,
}

impl ReorderCommand {
    pub fn name(&self) -> &'static str {
        match self {
            ReorderCommand::MoveAdjacent { .. } => "move_adjacent",
            ReorderCommand::Swap { .. } => "swap",
            ReorderCommand::Arrange { .. } => "arrange",
            ReorderCommand::Compact => "compact",
        }
    }
}

/// Slots sorted by rank.
pub fn ranked(slots: &[OrderSlot]) -> Vec<OrderSlot> {
    let mut ranked = slots.to_vec();
    ranked.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
    ranked
}

/// Order value for a record appended to the partition: `max + 1`, or `1`
/// when the partition is empty.
pub fn next_order(slots: &[OrderSlot]) -> ResourceResult<i32> {
    order_after(slots.iter().map(|slot| slot.order).max())
}

/// `max + 1` for a partition whose highest order is `max`.
///
/// Fails once the partition has reached `i32::MAX`; compacting frees the range.
pub fn order_after(max: Option<i32>) -> ResourceResult<i32> {
    match max {
        None => Ok(1),
        Some(max) => max.checked_add(1).ok_or_else(|| {
            ResourceError::validation(
                "partition order range exhausted; compact the partition first",
            )
        }),
    }
}

pub fn plan(command: &ReorderCommand, slots: &[OrderSlot]) -> ResourceResult<Vec<OrderAssignment>> {
    match command {
        ReorderCommand::MoveAdjacent { id, direction } => plan_move(slots, *id, *direction),
        ReorderCommand::Swap { first, second } => plan_swap(slots, *first, *second),
        ReorderCommand::Arrange { ids } => plan_arrange(slots, ids),
        ReorderCommand::Compact => Ok(plan_compact(slots)),
    }
}

pub fn plan_move(
    slots: &[OrderSlot],
    id: ResourceId,
    direction: Direction,
) -> ResourceResult<Vec<OrderAssignment>> {
    let ranked = ranked(slots);
    let position = rank_of(&ranked, id)?;

    let neighbour = match direction {
        Direction::Up => position.checked_sub(1),
        Direction::Down => Some(position + 1).filter(|next| *next < ranked.len()),
    };

    Ok(match neighbour {
        Some(neighbour) => swap_ranks(&ranked, position, neighbour),
        None => Vec::new(),
    })
}

pub fn plan_swap(
    slots: &[OrderSlot],
    first: ResourceId,
    second: ResourceId,
) -> ResourceResult<Vec<OrderAssignment>> {
    let ranked = ranked(slots);
    let a = rank_of(&ranked, first)?;
    let b = rank_of(&ranked, second)?;

    if a == b {
        return Ok(Vec::new());
    }
    Ok(swap_ranks(&ranked, a, b))
}

pub fn plan_arrange(
    slots: &[OrderSlot],
    ids: &[ResourceId],
) -> ResourceResult<Vec<OrderAssignment>> {
    let mut requested = ids.to_vec();
    requested.sort();
    requested.dedup();

    let mut present: Vec<ResourceId> = slots.iter().map(|slot| slot.id).collect();
    present.sort();

    if requested.len() != ids.len() || requested != present {
        return Err(ResourceError::validation(
            "arrange must list every record in the partition exactly once",
        ));
    }

    Ok(assign_sequence(slots, ids.iter().copied()))
}

/// Reassign `1..N` in rank order. Only records whose value changes are
/// returned, so compacting a dense partition plans nothing.
pub fn plan_compact(slots: &[OrderSlot]) -> Vec<OrderAssignment> {
    let ranked = ranked(slots);
    assign_sequence(slots, ranked.iter().map(|slot| slot.id))
}

/// Apply planned assignments to slots in place.
pub fn apply(slots: &mut [OrderSlot], assignments: &[OrderAssignment]) {
    for assignment in assignments {
        if let Some(slot) = slots.iter_mut().find(|slot| slot.id == assignment.id) {
            slot.order = assignment.order;
        }
    }
}

fn rank_of(ranked: &[OrderSlot], id: ResourceId) -> ResourceResult<usize> {
    ranked
        .iter()
        .position(|slot| slot.id == id)
        .ok_or(ResourceError::NotFound(id))
}

/// Exchange the records at two ranks.
///
/// With distinct orders the two values are simply swapped. When they tie the
/// swap would change nothing, so the partition is renumbered densely with the
/// two ranks exchanged instead.
fn swap_ranks(ranked: &[OrderSlot], a: usize, b: usize) -> Vec<OrderAssignment> {
    let (left, right) = (ranked[a], ranked[b]);

    if left.order != right.order {
        return vec![
            OrderAssignment {
                id: left.id,
                order: right.order,
            },
            OrderAssignment {
                id: right.id,
                order: left.order,
            },
        ];
    }

    let mut sequence: Vec<ResourceId> = ranked.iter().map(|slot| slot.id).collect();
    sequence.swap(a, b);
    assign_sequence(ranked, sequence)
}

fn assign_sequence(
    slots: &[OrderSlot],
    sequence: impl IntoIterator<Item = ResourceId>,
) -> Vec<OrderAssignment> {
    sequence
        .into_iter()
        .zip(1..)
        .filter(|(id, order)| {
            slots
                .iter()
                .find(|slot| slot.id == *id)
                .map_or(true, |slot| slot.order != *order)
        })
        .map(|(id, order)| OrderAssignment { id, order })
        .collect()
}
