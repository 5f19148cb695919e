// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;
mod operational;
mod readiness;
mod resolver;
mod types;
mod validation;
mod week;

#[cfg(test)]
mod tests;

pub use error::DomainError;
pub use operational::{
    DEFAULT_TIMEZONE, OPERATIONAL_DAY_START_HOUR, OperationalConfig, is_duty_watch_night,
    operational_date, operational_week, parse_iso_date,
};
pub use readiness::{PublishReadiness, evaluate_publish_readiness};
pub use resolver::{EffectiveSlot, ResolvedRoster, SlotSource, resolve_base, resolve_night};
pub use types::{
    Assignment, AssignmentStatus, DutyPosition, DutyRole, Member, NightOverride, OverrideAction,
    PositionCode, ScheduleStatus,
};
pub use validation::{
    validate_member_not_assigned, validate_new_override, validate_position_capacity,
};
pub use week::{DUTY_NIGHT_WEEKDAYS, ScheduleWeek};
