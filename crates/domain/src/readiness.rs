// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Publish readiness derivation.
//!
//! A schedule may only be published while every required position has at
//! least one active base assignment. Over-capacity positions are reported
//! for UI warnings but never block publishing.

use crate::resolver::ResolvedRoster;
use crate::types::DutyPosition;
use serde::{Deserialize, Serialize};

/// The publish readiness of a schedule, derived from the resolved base
/// roster and the position catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishReadiness {
    /// Required positions with zero active assignments.
    pub missing_required: Vec<String>,
    /// Positions whose active count exceeds their capacity.
    pub over_capacity: Vec<String>,
}

impl PublishReadiness {
    /// Returns whether the schedule may be published.
    #[must_use]
    pub fn can_publish(&self) -> bool {
        self.missing_required.is_empty()
    }
}

/// Evaluates publish readiness for a schedule.
///
/// # Arguments
///
/// * `positions` - The duty role's position catalog
/// * `base_roster` - The resolved base roster (no overrides)
#[must_use]
pub fn evaluate_publish_readiness(
    positions: &[DutyPosition],
    base_roster: &ResolvedRoster,
) -> PublishReadiness {
    let mut missing_required: Vec<String> = Vec::new();
    let mut over_capacity: Vec<String> = Vec::new();

    for position in positions {
        let active = base_roster.active_count_for(position.code());
        if position.required() && active == 0 {
            missing_required.push(position.code().value().to_string());
        }
        if active > position.max_slots() as usize {
            over_capacity.push(position.code().value().to_string());
        }
    }

    PublishReadiness {
        missing_required,
        over_capacity,
    }
}
