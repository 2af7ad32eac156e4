// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shared-location decisions for capture events.
//!
//! A capture has two location slots, `capture` and `release`, that may point
//! at the same location row. Editing one slot while they alias must not
//! silently move the other, so the edited slot forks onto a new row.
//!
//! This module is pure: it decides, the persistence layer applies. The
//! current slot ids passed in must be read inside the same transaction
//! that applies the plan.

use uuid::Uuid;

/// What to do with one location slot of an event being updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationSlotAction {
    /// The slot is not being edited.
    Untouched,
    /// The slot is empty; insert a new row from the patch.
    Insert,
    /// The slot shares its row with the other slot; copy that row, apply
    /// the patch to the copy, and point the slot at the copy.
    Fork { from: Uuid },
    /// The slot owns its row; update it in place.
    UpdateInPlace(Uuid),
}

/// Per-slot actions for a capture update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureLocationPlan {
    pub capture: LocationSlotAction,
    pub release: LocationSlotAction,
}

/// Decides how a capture update touches its two location rows.
///
/// Both slots are evaluated against the pre-update aliasing state, so when
/// both are edited while aliased each one forks independently and the
/// original shared row is left as it was.
#[must_use]
pub fn plan_capture_location_update(
    current_capture: Option<Uuid>,
    current_release: Option<Uuid>,
    capture_edited: bool,
    release_edited: bool,
) -> CaptureLocationPlan {
    let aliased: bool = matches!(
        (current_capture, current_release),
        (Some(c), Some(r)) if c == r
    );

    CaptureLocationPlan {
        capture: plan_slot(current_capture, capture_edited, aliased),
        release: plan_slot(current_release, release_edited, aliased),
    }
}

/// Decides how a single-slot event (mortality) touches its location row.
#[must_use]
pub fn plan_single_location_update(current: Option<Uuid>, edited: bool) -> LocationSlotAction {
    plan_slot(current, edited, false)
}

fn plan_slot(current: Option<Uuid>, edited: bool, aliased: bool) -> LocationSlotAction {
    match (edited, current) {
        (false, _) => LocationSlotAction::Untouched,
        (true, None) => LocationSlotAction::Insert,
        (true, Some(id)) if aliased => LocationSlotAction::Fork { from: id },
        (true, Some(id)) => LocationSlotAction::UpdateInPlace(id),
    }
}

/// How the two slots of a newly created capture are filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureLocationMirror {
    /// Neither location supplied; both slots stay null.
    Empty,
    /// Only the capture location supplied; release mirrors it.
    ReleaseMirrorsCapture,
    /// Only the release location supplied; capture mirrors it.
    CaptureMirrorsRelease,
    /// Both supplied; each slot gets its own row.
    Separate,
}

/// Decides the create-time default for a capture's location slots.
///
/// Every create path (single-entity and bulk) must go through this so the
/// mirroring default is applied identically.
#[must_use]
pub const fn plan_capture_location_create(
    capture_supplied: bool,
    release_supplied: bool,
) -> CaptureLocationMirror {
    match (capture_supplied, release_supplied) {
        (false, false) => CaptureLocationMirror::Empty,
        (true, false) => CaptureLocationMirror::ReleaseMirrorsCapture,
        (false, true) => CaptureLocationMirror::CaptureMirrorsRelease,
        (true, true) => CaptureLocationMirror::Separate,
    }
}
