// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Effective roster resolution.
//!
//! Merges the week-level base assignment set with per-night overrides into
//! the roster that is actually in effect for one calendar night, or returns
//! the base view with no overrides applied.
//!
//! ## Invariants
//!
//! - Resolution is pure and deterministic: same inputs, same roster.
//! - Slot order within a position is the caller-supplied assignment order
//!   (creation order), preserved through replaces.
//! - Overrides apply in the caller-supplied order; on conflicting targets the
//!   first override wins, because the base slot it consumed no longer matches.
//! - Data inconsistency (an override referencing a base member that no longer
//!   exists) is a silent no-op, never an error. Historical overrides may
//!   outlive the base data they were created against and must not crash a
//!   read.
//! - Capacity is never enforced here. `add` appends regardless of occupancy;
//!   callers compare `active_count` against `max_slots` for warnings.

use crate::types::{Assignment, AssignmentStatus, Member, NightOverride, OverrideAction, PositionCode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::Date;

/// Where an effective slot came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source_kind", rename_all = "kebab-case")]
pub enum SlotSource {
    /// A week-level base assignment.
    Base {
        /// The underlying assignment ID, if persisted.
        assignment_id: Option<i64>,
        /// The underlying assignment status.
        status: AssignmentStatus,
    },
    /// An `add` override for this night.
    OverrideAdd {
        /// The underlying override ID, if persisted.
        override_id: Option<i64>,
    },
    /// A `replace` override standing in for a base slot this night.
    OverrideReplace {
        /// The underlying override ID, if persisted.
        override_id: Option<i64>,
    },
}

/// One resolved roster slot: a member effectively on duty at a position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveSlot {
    /// The position this slot belongs to.
    pub position: PositionCode,
    /// The member filling the slot.
    pub member: Member,
    /// Where the slot came from.
    pub source: SlotSource,
}

impl EffectiveSlot {
    /// Returns whether this slot was produced by an override.
    #[must_use]
    pub const fn is_override(&self) -> bool {
        matches!(
            self.source,
            SlotSource::OverrideAdd { .. } | SlotSource::OverrideReplace { .. }
        )
    }

    /// Returns whether this slot counts toward the active roster.
    ///
    /// Override-sourced slots are always active; base slots follow their
    /// assignment status.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        match &self.source {
            SlotSource::Base { status, .. } => status.is_active(),
            SlotSource::OverrideAdd { .. } | SlotSource::OverrideReplace { .. } => true,
        }
    }

    /// Returns the wire name for the slot's source.
    #[must_use]
    pub const fn source_kind(&self) -> &'static str {
        match &self.source {
            SlotSource::Base { .. } => "base",
            SlotSource::OverrideAdd { .. } => "override-add",
            SlotSource::OverrideReplace { .. } => "override-replace",
        }
    }
}

/// The resolved roster for one night (or the base week view), with the
/// summary counts the calendar and summary views need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRoster {
    /// Effective slots grouped by position, in assignment order within each
    /// position.
    pub slots_by_position: BTreeMap<PositionCode, Vec<EffectiveSlot>>,
    /// Count of active slots across all positions.
    pub active_count: usize,
    /// Whether any override targeted this night, regardless of effect.
    pub has_overrides: bool,
}

impl ResolvedRoster {
    /// Returns the slots for a position, empty if the position has none.
    #[must_use]
    pub fn slots(&self, position: &PositionCode) -> &[EffectiveSlot] {
        self.slots_by_position
            .get(position)
            .map_or(&[], Vec::as_slice)
    }

    /// Returns the count of active slots for one position.
    #[must_use]
    pub fn active_count_for(&self, position: &PositionCode) -> usize {
        self.slots(position)
            .iter()
            .filter(|slot| slot.is_active())
            .count()
    }
}

/// Resolves the base (week) view of the roster. Overrides never apply here.
#[must_use]
pub fn resolve_base(assignments: &[Assignment]) -> ResolvedRoster {
    let slots_by_position = seed_base_slots(assignments);
    let active_count = count_active(&slots_by_position);
    ResolvedRoster {
        slots_by_position,
        active_count,
        has_overrides: false,
    }
}

/// Resolves the effective roster for one calendar night.
///
/// Only overrides whose `night_date` equals `night` are applied; overrides
/// for other nights of the same schedule are ignored. Overrides apply in the
/// order supplied, so callers must supply them in creation order.
#[must_use]
pub fn resolve_night(
    assignments: &[Assignment],
    overrides: &[NightOverride],
    night: Date,
) -> ResolvedRoster {
    let mut slots_by_position = seed_base_slots(assignments);
    let mut has_overrides = false;

    for night_override in overrides.iter().filter(|o| o.night_date == night) {
        has_overrides = true;
        apply_override(&mut slots_by_position, night_override);
    }

    let active_count = count_active(&slots_by_position);
    ResolvedRoster {
        slots_by_position,
        active_count,
        has_overrides,
    }
}

/// Seeds the per-position slot lists from the base assignments, preserving
/// the supplied order within each position.
fn seed_base_slots(assignments: &[Assignment]) -> BTreeMap<PositionCode, Vec<EffectiveSlot>> {
    let mut slots_by_position: BTreeMap<PositionCode, Vec<EffectiveSlot>> = BTreeMap::new();
    for assignment in assignments {
        slots_by_position
            .entry(assignment.position.clone())
            .or_default()
            .push(EffectiveSlot {
                position: assignment.position.clone(),
                member: assignment.member.clone(),
                source: SlotSource::Base {
                    assignment_id: assignment.assignment_id,
                    status: assignment.status,
                },
            });
    }
    slots_by_position
}

/// Applies one override to the slot map.
fn apply_override(
    slots_by_position: &mut BTreeMap<PositionCode, Vec<EffectiveSlot>>,
    night_override: &NightOverride,
) {
    match &night_override.action {
        OverrideAction::Remove { base_member_id } => {
            // Drop every base-sourced slot for the member. No match means the
            // base roster changed since the override was created; keep going.
            if let Some(slots) = slots_by_position.get_mut(&night_override.position) {
                slots.retain(|slot| {
                    slot.is_override() || slot.member.member_id != *base_member_id
                });
            }
        }
        OverrideAction::Replace {
            base_member_id,
            member,
        } => {
            // Swap the first matching base-sourced slot in place so the slot
            // keeps its roster position. No match inserts nothing.
            if let Some(slots) = slots_by_position.get_mut(&night_override.position) {
                if let Some(slot) = slots
                    .iter_mut()
                    .find(|slot| !slot.is_override() && slot.member.member_id == *base_member_id)
                {
                    *slot = EffectiveSlot {
                        position: night_override.position.clone(),
                        member: member.clone(),
                        source: SlotSource::OverrideReplace {
                            override_id: night_override.override_id,
                        },
                    };
                }
            }
        }
        OverrideAction::Add { member } => {
            slots_by_position
                .entry(night_override.position.clone())
                .or_default()
                .push(EffectiveSlot {
                    position: night_override.position.clone(),
                    member: member.clone(),
                    source: SlotSource::OverrideAdd {
                        override_id: night_override.override_id,
                    },
                });
        }
    }
}

/// Counts active slots across all positions.
fn count_active(slots_by_position: &BTreeMap<PositionCode, Vec<EffectiveSlot>>) -> usize {
    slots_by_position
        .values()
        .flatten()
        .filter(|slot| slot.is_active())
        .count()
}
