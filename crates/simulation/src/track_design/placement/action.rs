//! The game action that builds a whole design as a new ride.

use bevy::prelude::*;
use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::context::{ParkContext, ParkState};
use crate::coords::{CoordsXYZ, CoordsXYZD};
use crate::game_actions::{
    check_not_paused, ActionFlags, ActionMessage, ActionPayload, ActionResult, ActionStatus,
    GameAction,
};
use crate::ride::{demolish_ride, RideId, LIFECYCLE_NOT_CUSTOM_DESIGN};
use crate::track_design::TrackDesign;

use super::{place_virtual, scenery_unavailable, TrackPlaceOperation};

const TITLE: ActionMessage = ActionMessage::CantCreateRide;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct TrackDesignAction {
    pub design: TrackDesign,
    pub origin: CoordsXYZD,
    pub flags: ActionFlags,
}

impl TrackDesignAction {
    pub fn new(design: TrackDesign, origin: CoordsXYZD) -> Self {
        Self {
            design,
            origin,
            flags: ActionFlags::NONE,
        }
    }

    pub fn with_flags(mut self, flags: ActionFlags) -> Self {
        self.flags = flags;
        self
    }
}

/// Copy of everything a placement can touch, for callers that only hold a
/// shared borrow of the park.
fn scratch_park(ctx: &ParkContext) -> ParkState {
    ParkState {
        map: ctx.map.clone(),
        rides: ctx.rides.clone(),
        objects: ctx.objects.clone(),
        settings: ctx.settings.clone(),
        cheats: ctx.cheats.clone(),
        animations: ctx.animations.clone(),
        selection: ctx.selection.clone(),
    }
}

impl TrackDesignAction {
    fn query_flags(&self) -> ActionFlags {
        ActionFlags(self.flags.0 & !ActionFlags::APPLY.0)
    }
}

impl GameAction for TrackDesignAction {
    fn flags(&self) -> ActionFlags {
        self.flags
    }

    fn query(&self, ctx: &ParkContext) -> ActionResult {
        let mut scratch = scratch_park(ctx);
        let mut scratch_ctx = scratch.ctx();
        scratch_ctx.placement = ctx.placement;
        place_track_design(&mut scratch_ctx, &self.design, self.origin, self.query_flags())
    }

    /// Validates on the live park: the temporary ride is demolished again and
    /// the placement context is restored when the scope drops.
    fn query_live(&self, ctx: &mut ParkContext) -> ActionResult {
        let placement = ctx.placement;
        let mut scope = ctx.scoped(placement);
        place_track_design(&mut scope, &self.design, self.origin, self.query_flags())
    }

    fn execute(&self, ctx: &mut ParkContext) -> ActionResult {
        place_track_design(ctx, &self.design, self.origin, self.flags | ActionFlags::APPLY)
    }
}

/// Create a ride and build `td` for it at `origin`.
///
/// Without `APPLY` the design is only validated and the ride is removed
/// again. With it the design is built (as a ghost when `GHOST` is set) and
/// the ride takes over the design's operating settings and colours. The
/// result carries the new ride in its payload.
pub fn place_track_design(
    ctx: &mut ParkContext,
    td: &TrackDesign,
    origin: CoordsXYZD,
    flags: ActionFlags,
) -> ActionResult {
    if let Err(result) = check_not_paused(flags, ctx, TITLE) {
        return result;
    }
    if td.ride_type().descriptor().is_none() {
        warn!("Invalid ride type {:?} for track design {}", td.ride_type(), td.name);
        return ActionResult::error(
            ActionStatus::InvalidParameters,
            TITLE,
            ActionMessage::InvalidRideType,
        );
    }

    let ride = ctx.rides.create(td.ride_type());
    let vehicle = ctx.objects.find(&td.track_and_vehicle.vehicle_object);
    if vehicle.is_none() {
        debug!(
            "Vehicle {} for {} is not loaded",
            td.track_and_vehicle.vehicle_object.name, td.name
        );
    }
    if let Some(built) = ctx.rides.get_mut(ride) {
        built.vehicle_object = vehicle;
    }

    let apply = flags.contains(ActionFlags::APPLY);
    let result = if apply {
        let operation = if flags.is_ghost() {
            TrackPlaceOperation::PlaceGhost
        } else {
            TrackPlaceOperation::Place
        };
        let place_scenery = !scenery_unavailable(td, ctx.objects);
        place_virtual(ctx, td, operation, place_scenery, ride, origin).1
    } else {
        let (state, result) = place_virtual(ctx, td, TrackPlaceOperation::PlaceQuery, true, ride, origin);
        if state.scenery_unavailable {
            place_virtual(ctx, td, TrackPlaceOperation::PlaceQuery, false, ride, origin).1
        } else {
            result
        }
    };

    if !result.is_ok() || !apply {
        demolish_ride(ctx, ride);
        return result;
    }

    apply_design_settings(ctx, td, ride);
    ActionResult::ok()
        .with_cost(result.cost)
        .at(CoordsXYZ::new(origin.x + 16, origin.y + 16, origin.z))
        .with_payload(ActionPayload::Ride { ride })
}

fn apply_design_settings(ctx: &mut ParkContext, td: &TrackDesign, ride: RideId) {
    let entrance_style = ctx
        .objects
        .find_by_identifier(&td.appearance.station_object_identifier);
    let Some(built) = ctx.rides.get_mut(ride) else {
        return;
    };
    let operation = &td.operation;
    built.mode = operation.ride_mode;
    built.num_trains = td.track_and_vehicle.num_trains;
    built.cars_per_train = td.track_and_vehicle.cars_per_train;
    built.depart_flags = operation.depart_flags;
    built.min_waiting_time = operation.min_waiting_time;
    built.max_waiting_time = operation.max_waiting_time;
    built.operation_setting = operation.operation_setting;
    built.lift_hill_speed = operation.lift_hill_speed & 0x1F;
    built.num_circuits = operation.num_circuits.max(1);
    built.set_lifecycle_flag(LIFECYCLE_NOT_CUSTOM_DESIGN, true);

    built.entrance_style = entrance_style;
    built.track_colours = td.appearance.track_colours;
    built.vehicle_colour_settings = td.appearance.vehicle_colour_settings;
    for (dst, src) in built.vehicle_colours.iter_mut().zip(&td.appearance.vehicle_colours) {
        *dst = *src;
    }
    if !td.name.is_empty() {
        built.name = td.name.clone();
    }
    debug!("Built track design {} as {}", td.name, ride);
}
