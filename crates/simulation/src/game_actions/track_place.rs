//! Placing a single track piece.
//!
//! Validation runs in two stages: checks on the request itself, then a walk
//! over every block of the piece checking height, clearance, terrain, water
//! and support limits. Execute repeats both stages before touching the map
//! so a stale query can never commit an invalid piece.

use bevy::prelude::*;
use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::config::{
    COORDS_Z_PER_TINY_Z, COORDS_Z_STEP, LAND_HEIGHT_STEP, MAX_BRAKE_SPEED, MAX_TRACK_HEIGHT,
    MIN_TRACK_HEIGHT,
};
use crate::context::ParkContext;
use crate::coords::{direction_valid, floor2, rol4, CoordsXY, CoordsXYZ, CoordsXYZD};
use crate::footpath;
use crate::park::MapAnimationKind;
use crate::ride::ride_type::{
    RTD_HAS_LANDSCAPE_DOORS, RTD_HAS_SEAT_ROTATION, RTD_SUPPORTS_STEEP_LIFT_HILL,
    RTD_TRACK_MUST_BE_ON_WATER, RTD_TRACK_NO_WALLS,
};
use crate::ride::{
    stations, RideId, RideMode, RideType, RideTypeDescriptor, LIFECYCLE_CABLE_LIFT,
    LIFECYCLE_INDESTRUCTIBLE_TRACK, LIFECYCLE_ON_RIDE_PHOTO,
};
use crate::tile_map::{
    can_construct_with_clear_at, clear_removable_scenery, ClearanceRange, TileElement,
    TileElementKind, TrackElement, GROUND_ABOVE, GROUND_UNDERGROUND, GROUND_UNDERWATER,
    SLOPE_E_CORNER_DN, SLOPE_N_CORNER_DN, SLOPE_S_CORNER_DN, SLOPE_W_CORNER_DN,
};
use crate::track_data::{
    TrackBlock, TrackElemType, TrackElementDescriptor, BLOCK_FLAG_IS_VERTICAL,
    ELEM_FLAG_CAN_BE_PARTLY_UNDERGROUND, ELEM_FLAG_IS_STEEP_UP, ELEM_FLAG_ONLY_ABOVE_GROUND,
    ELEM_FLAG_STARTS_AT_HALF_HEIGHT, SEQUENCE_FLAG_CONNECTS_TO_PATH, SEQUENCE_FLAG_ORIGIN,
};

use super::scenery::{remove_intersecting_walls, remove_walls_on_neighbours};
use super::{
    check_capacity, check_not_paused, ActionFlags, ActionMessage, ActionPayload, ActionResult,
    ActionStatus, GameAction,
};

pub const TRACK_PLACE_LIFT_HILL: u8 = 1 << 0;
pub const TRACK_PLACE_INVERTED: u8 = 1 << 1;

const TITLE: ActionMessage = ActionMessage::CantBuildThisHere;

/// Support height charged for a block sitting below the terrain.
const UNDERGROUND_SUPPORT_HEIGHT: i32 = 10 * COORDS_Z_STEP;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct TrackPlaceAction {
    pub ride: RideId,
    pub track_type: TrackElemType,
    pub ride_type: RideType,
    /// Piece origin; `z` is the base height of block 0 before block offsets.
    pub origin: CoordsXYZD,
    pub brake_speed: u8,
    pub colour: u8,
    pub seat_rotation: u8,
    /// `TRACK_PLACE_*` bits.
    pub place_flags: u8,
    pub from_track_design: bool,
    pub flags: ActionFlags,
}

/// One block of the piece after validation.
struct PlannedBlock {
    block: &'static TrackBlock,
    loc: CoordsXY,
    base_z: i32,
    clearance_z: i32,
    quarter: u8,
}

struct Plan {
    blocks: Vec<PlannedBlock>,
    ground_flags: u8,
    clearance_cost: i64,
    support_cost: i64,
}

impl TrackPlaceAction {
    pub fn new(ride: RideId, track_type: TrackElemType, ride_type: RideType, origin: CoordsXYZD) -> Self {
        Self {
            ride,
            track_type,
            ride_type,
            origin,
            brake_speed: 0,
            colour: 0,
            seat_rotation: 0,
            place_flags: 0,
            from_track_design: false,
            flags: ActionFlags::NONE,
        }
    }

    pub fn with_flags(mut self, flags: ActionFlags) -> Self {
        self.flags = flags;
        self
    }

    fn has_place_flag(&self, flag: u8) -> bool {
        self.place_flags & flag != 0
    }

    fn validate_request(
        &self,
        ctx: &ParkContext,
    ) -> Result<(&'static RideTypeDescriptor, &'static TrackElementDescriptor), ActionResult> {
        let invalid = |detail| ActionResult::error(ActionStatus::InvalidParameters, TITLE, detail);
        let disallowed = |detail| ActionResult::error(ActionStatus::Disallowed, TITLE, detail);

        let Some(ride) = ctx.rides.get(self.ride) else {
            warn!("Invalid ride for track placement, {}", self.ride);
            return Err(invalid(ActionMessage::RideNotFound));
        };
        let Some(rtd) = ride.descriptor() else {
            warn!("Ride {} has no known ride type", self.ride);
            return Err(invalid(ActionMessage::InvalidRideType));
        };
        let Some(ted) = self.track_type.descriptor() else {
            warn!("Unknown track piece {:?}", self.track_type);
            return Err(invalid(ActionMessage::ElementNotFound));
        };
        if !direction_valid(self.origin.direction) {
            return Err(invalid(ActionMessage::InvalidDirection));
        }
        if self.ride_type != ride.ride_type && !ctx.cheats.allow_arbitrary_ride_type_changes {
            return Err(invalid(ActionMessage::InvalidRideType));
        }
        if self.ride_type.descriptor().is_none() {
            return Err(invalid(ActionMessage::InvalidRideType));
        }
        if self.brake_speed > MAX_BRAKE_SPEED {
            return Err(invalid(ActionMessage::InvalidBrakeSpeed));
        }
        if ride.has_lifecycle_flag(LIFECYCLE_INDESTRUCTIBLE_TRACK)
            && self.track_type == TrackElemType::END_STATION
        {
            return Err(disallowed(ActionMessage::NotAllowedToModifyStation));
        }
        check_not_paused(self.flags, ctx, TITLE)?;

        if self.track_type == TrackElemType::ON_RIDE_PHOTO
            && ride.has_lifecycle_flag(LIFECYCLE_ON_RIDE_PHOTO)
        {
            return Err(disallowed(ActionMessage::OnlyOneOnRidePhotoPerRide));
        }
        if self.track_type == TrackElemType::CABLE_LIFT_HILL
            && ride.has_lifecycle_flag(LIFECYCLE_CABLE_LIFT)
        {
            return Err(disallowed(ActionMessage::OnlyOneCableLiftHillPerRide));
        }
        if self.has_place_flag(TRACK_PLACE_LIFT_HILL)
            && !ctx.cheats.enable_chain_lift_on_all_track
            && ted.has_flag(ELEM_FLAG_IS_STEEP_UP)
            && !rtd.has_flag(RTD_SUPPORTS_STEEP_LIFT_HILL)
        {
            return Err(disallowed(ActionMessage::TooSteepForLiftHill));
        }

        for block in ted.blocks {
            let loc = self.block_location(block);
            if !ctx.map.is_location_valid(loc) {
                return Err(invalid(ActionMessage::OffEdgeOfMap));
            }
            let z = self.origin.z + block.z;
            if !ctx.cheats.sandbox_mode && !ctx.map.is_location_owned(loc.with_z(z)) {
                return Err(disallowed(ActionMessage::LandNotOwnedByPark));
            }
        }
        check_capacity(ctx, ted.blocks.len(), TITLE)?;

        if !ctx.cheats.allow_track_place_invalid_heights {
            let offset = self.origin.z & 0x0F;
            let expected = if ted.has_flag(ELEM_FLAG_STARTS_AT_HALF_HEIGHT) {
                8
            } else {
                0
            };
            if offset != expected {
                return Err(invalid(ActionMessage::InvalidHeight));
            }
        }
        Ok((rtd, ted))
    }

    fn block_location(&self, block: &TrackBlock) -> CoordsXY {
        self.origin.xy() + block.offset().rotate(self.origin.direction)
    }

    /// Walk every block of the piece. Station slot availability is only
    /// checked when `check_station` is set; execute wires the station itself.
    fn plan_blocks(
        &self,
        ctx: &ParkContext,
        rtd: &RideTypeDescriptor,
        ted: &TrackElementDescriptor,
        check_station: bool,
    ) -> Result<Plan, ActionResult> {
        let disallowed = |detail| ActionResult::error(ActionStatus::Disallowed, TITLE, detail);
        let mut plan = Plan {
            blocks: Vec::with_capacity(ted.blocks.len()),
            ground_flags: 0,
            clearance_cost: 0,
            support_cost: 0,
        };

        for block in ted.blocks {
            let loc = self.block_location(block);
            let z = self.origin.z + block.z;
            if z < MIN_TRACK_HEIGHT {
                return Err(ActionResult::error(
                    ActionStatus::InvalidParameters,
                    TITLE,
                    ActionMessage::TooLow,
                ));
            }
            let base_z = floor2(z, COORDS_Z_STEP);
            let mut clearance = block.clearance;
            if block.flags & BLOCK_FLAG_IS_VERTICAL != 0 && clearance > 24 {
                clearance += 24;
            } else {
                clearance += rtd.clearance_height;
            }
            let clearance_z = floor2(clearance, COORDS_Z_STEP) + base_z;
            if clearance_z > MAX_TRACK_HEIGHT {
                return Err(ActionResult::error(
                    ActionStatus::InvalidParameters,
                    TITLE,
                    ActionMessage::TooHigh,
                ));
            }

            let quarter = block.rotated_quarter_tile(self.origin.direction);
            let range = ClearanceRange::new(loc, base_z, clearance_z);
            let outcome = can_construct_with_clear_at(
                ctx.map,
                ctx.objects,
                range,
                quarter,
                ctx.cheats.disable_clearance_checks,
            )
            .map_err(|obstruction| ActionResult::no_clearance(TITLE, obstruction))?;
            plan.clearance_cost += outcome.cost;

            let ground = outcome.ground_flags & (GROUND_ABOVE | GROUND_UNDERGROUND);
            if plan.ground_flags != 0
                && plan.ground_flags & ground == 0
                && !ted.has_flag(ELEM_FLAG_CAN_BE_PARTLY_UNDERGROUND)
            {
                return Err(disallowed(ActionMessage::CantBuildPartlyAboveAndPartlyBelowGround));
            }
            plan.ground_flags = ground;
            if ted.has_flag(ELEM_FLAG_ONLY_ABOVE_GROUND) && ground & GROUND_UNDERGROUND != 0 {
                return Err(disallowed(ActionMessage::CanOnlyBuildThisAboveGround));
            }
            if outcome.ground_flags & GROUND_UNDERWATER != 0 && !ctx.cheats.disable_clearance_checks {
                return Err(disallowed(ActionMessage::CantBuildThisUnderwater));
            }

            if rtd.has_flag(RTD_TRACK_MUST_BE_ON_WATER) && !ctx.placement.drawing_preview {
                let Some((surface_element, surface)) = ctx.map.surface_at(loc) else {
                    return Err(ActionResult::error(
                        ActionStatus::Unknown,
                        TITLE,
                        ActionMessage::SurfaceNotFound,
                    ));
                };
                let water = surface.water_height;
                if water == 0 || water != base_z {
                    return Err(disallowed(ActionMessage::CanOnlyBuildThisOnWater));
                }
                if water - LAND_HEIGHT_STEP == surface_element.base_z
                    && matches!(
                        surface.slope & 0x0F,
                        SLOPE_W_CORNER_DN | SLOPE_S_CORNER_DN | SLOPE_E_CORNER_DN | SLOPE_N_CORNER_DN
                    )
                {
                    return Err(disallowed(ActionMessage::CanOnlyBuildThisOnWater));
                }
            }

            if check_station
                && block.index == 0
                && self.track_type.is_station()
                && ted.sequence & SEQUENCE_FLAG_ORIGIN != 0
            {
                let slot = ctx.rides.get(self.ride).and_then(|ride| {
                    stations::station_slot_for(ctx.map, ride, loc.with_z(base_z), self.origin.direction)
                });
                if slot.is_none() {
                    return Err(ActionResult::error(
                        ActionStatus::Unknown,
                        TITLE,
                        ActionMessage::TooManyStations,
                    ));
                }
            }

            let Some((surface_element, _)) = ctx.map.surface_at(loc) else {
                return Err(ActionResult::error(
                    ActionStatus::Unknown,
                    TITLE,
                    ActionMessage::SurfaceNotFound,
                ));
            };
            if !ctx.cheats.disable_support_limits {
                let ride_height = clearance_z - surface_element.base_z;
                if ride_height >= 0 {
                    if ride_height / COORDS_Z_PER_TINY_Z > rtd.max_height
                        && !ctx.placement.drawing_preview
                    {
                        return Err(disallowed(ActionMessage::TooHighForSupports));
                    }
                }
            }
            let mut support_height = base_z - surface_element.base_z;
            if support_height < 0 {
                support_height = UNDERGROUND_SUPPORT_HEIGHT;
            }
            plan.support_cost += i64::from(support_height / LAND_HEIGHT_STEP) * rtd.support_price;

            plan.blocks.push(PlannedBlock {
                block,
                loc,
                base_z,
                clearance_z,
                quarter,
            });
        }
        Ok(plan)
    }

    fn price(&self, rtd: &RideTypeDescriptor, ted: &TrackElementDescriptor) -> i64 {
        (rtd.track_price * ted.price_modifier) >> 16
    }

    fn success(&self, plan: &Plan, rtd: &RideTypeDescriptor, ted: &TrackElementDescriptor) -> ActionResult {
        let cost = plan.clearance_cost + plan.support_cost + self.price(rtd, ted);
        ActionResult::ok()
            .with_cost(cost)
            .at(CoordsXYZ::new(self.origin.x + 16, self.origin.y + 16, self.origin.z))
            .with_payload(ActionPayload::Ground {
                ground_flags: plan.ground_flags,
            })
    }

    /// Lifecycle changes that placing this piece makes to its ride.
    fn update_ride(&self, ctx: &mut ParkContext, block: &TrackBlock, loc: CoordsXYZ) {
        let Some(ride) = ctx.rides.get_mut(self.ride) else {
            return;
        };
        match self.track_type {
            TrackElemType::ON_RIDE_PHOTO => ride.set_lifecycle_flag(LIFECYCLE_ON_RIDE_PHOTO, true),
            TrackElemType::CABLE_LIFT_HILL if block.index == 0 => {
                ride.set_lifecycle_flag(LIFECYCLE_CABLE_LIFT, true);
                ride.cable_lift_loc = Some(loc);
            }
            TrackElemType::BLOCK_BRAKES => {
                ride.num_block_brakes += 1;
                ride.mode = match ride.mode {
                    RideMode::PoweredLaunch => RideMode::PoweredLaunchBlockSectioned,
                    _ => RideMode::ContinuousCircuitBlockSectioned,
                };
            }
            _ => {}
        }
        if block.index == 0 {
            let lifted_crest = self.track_type == TrackElemType::UP_25_TO_FLAT
                && self.has_place_flag(TRACK_PLACE_LIFT_HILL);
            if lifted_crest || self.track_type == TrackElemType::CABLE_LIFT_HILL {
                ride.num_block_brakes += 1;
            }
        }
    }
}

impl GameAction for TrackPlaceAction {
    fn flags(&self) -> ActionFlags {
        self.flags
    }

    fn query(&self, ctx: &ParkContext) -> ActionResult {
        let (rtd, ted) = match self.validate_request(ctx) {
            Ok(found) => found,
            Err(result) => return result,
        };
        match self.plan_blocks(ctx, rtd, ted, true) {
            Ok(plan) => self.success(&plan, rtd, ted),
            Err(result) => result,
        }
    }

    fn execute(&self, ctx: &mut ParkContext) -> ActionResult {
        let (rtd, ted) = match self.validate_request(ctx) {
            Ok(found) => found,
            Err(result) => return result,
        };
        let plan = match self.plan_blocks(ctx, rtd, ted, false) {
            Ok(plan) => plan,
            Err(result) => return result,
        };
        let ghost = self.flags.is_ghost();
        let direction = self.origin.direction;

        for planned in &plan.blocks {
            let block = planned.block;
            let range = ClearanceRange::new(planned.loc, planned.base_z, planned.clearance_z);
            let loc = planned.loc.with_z(planned.base_z);

            if !ghost {
                clear_removable_scenery(ctx.map, ctx.objects, range, planned.quarter);
                if !ctx.cheats.disable_clearance_checks {
                    let walls = if rtd.has_flag(RTD_TRACK_NO_WALLS) {
                        0x0F
                    } else {
                        let sequence = if block.index == 0 { ted.sequence } else { 0 };
                        rol4(sequence ^ 0x0F, direction)
                    };
                    remove_intersecting_walls(ctx.map, range, walls);
                }
            }

            self.update_ride(ctx, block, loc);
            if let Some(ride) = ctx.rides.get_mut(self.ride) {
                if ride.overall_view.is_none() {
                    ride.overall_view = Some(planned.loc);
                }
            }

            let station_index = if block.index == 0
                && self.track_type.is_station()
                && ted.sequence & SEQUENCE_FLAG_ORIGIN != 0
            {
                let map = &*ctx.map;
                match ctx.rides.get_mut(self.ride) {
                    Some(ride) => stations::add_station_piece(map, ride, loc, direction),
                    None => None,
                }
            } else {
                None
            };
            if block.index == 0 && self.track_type.is_station() && station_index.is_none() {
                return ActionResult::error(ActionStatus::Unknown, TITLE, ActionMessage::TooManyStations);
            }

            let mut track = TrackElement::new(self.track_type, direction, self.ride, self.ride_type);
            track.sequence = block.index;
            track.has_chain = self.has_place_flag(TRACK_PLACE_LIFT_HILL);
            track.inverted = self.has_place_flag(TRACK_PLACE_INVERTED);
            track.colour_scheme = self.colour;
            track.station_index = station_index.unwrap_or(0);
            if self.track_type.has_speed_setting() {
                track.brake_booster_speed = self.brake_speed;
            } else if rtd.has_flag(RTD_HAS_LANDSCAPE_DOORS) {
                track.doors_closed = true;
            } else if rtd.has_flag(RTD_HAS_SEAT_ROTATION) {
                track.seat_rotation = self.seat_rotation;
            }
            let mut element = TileElement::new(
                planned.base_z,
                planned.clearance_z,
                planned.quarter,
                TileElementKind::Track(track),
            );
            element.ghost = ghost;
            if ctx.map.insert(planned.loc, element).is_none() {
                return ActionResult::error(
                    ActionStatus::NoFreeElements,
                    TITLE,
                    ActionMessage::TileElementLimitReached,
                );
            }

            let animation = match self.track_type {
                TrackElemType::WATERFALL => Some(MapAnimationKind::TrackWaterfall),
                TrackElemType::RAPIDS => Some(MapAnimationKind::TrackRapids),
                TrackElemType::WHIRLPOOL => Some(MapAnimationKind::TrackWhirlpool),
                TrackElemType::SPINNING_TUNNEL => Some(MapAnimationKind::TrackSpinningTunnel),
                _ => None,
            };
            if let Some(kind) = animation {
                ctx.animations.create(kind, loc);
            }

            if ted.sequence & SEQUENCE_FLAG_CONNECTS_TO_PATH != 0 && !ghost {
                remove_walls_on_neighbours(ctx.map, range);
            }

            if rtd.has_flag(RTD_TRACK_MUST_BE_ON_WATER) {
                if let Some(TileElementKind::Surface(surface)) =
                    ctx.map.surface_at_mut(planned.loc).map(|e| &mut e.kind)
                {
                    surface.has_track_that_needs_water = true;
                }
            }

            if ted.sequence & SEQUENCE_FLAG_CONNECTS_TO_PATH != 0 && !ghost {
                footpath::connect_track_neighbours(ctx.map, loc);
            }
        }

        debug!(
            "Placed {:?} for {} at ({}, {}, {}) facing {}",
            self.track_type, self.ride, self.origin.x, self.origin.y, self.origin.z, direction
        );
        self.success(&plan, rtd, ted)
    }
}
