//! Removing a track piece, addressed by any one of its blocks.

use bevy::prelude::*;
use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::config::{COORDS_Z_STEP, LAND_HEIGHT_STEP};
use crate::context::ParkContext;
use crate::coords::{CoordsXYZ, CoordsXYZD};
use crate::ride::ride_type::RTD_TRACK_MUST_BE_ON_WATER;
use crate::ride::{
    stations, RideId, LIFECYCLE_CABLE_LIFT, LIFECYCLE_EVER_BEEN_OPENED,
    LIFECYCLE_INDESTRUCTIBLE_TRACK, LIFECYCLE_ON_RIDE_PHOTO,
};
use crate::tile_map::{TileElement, TileElementKind};
use crate::track_data::TrackElemType;

use super::{check_not_paused, ActionFlags, ActionMessage, ActionResult, ActionStatus, GameAction};

const TITLE: ActionMessage = ActionMessage::CantRemoveThis;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct TrackRemoveAction {
    pub track_type: TrackElemType,
    /// Block index of the element at `origin`.
    pub sequence: u8,
    pub origin: CoordsXYZD,
    pub flags: ActionFlags,
}

/// A located piece: its owning ride and the position of every block.
struct Located {
    ride: RideId,
    track_type: TrackElemType,
    station_index: u8,
    has_chain: bool,
    blocks: Vec<(u8, CoordsXYZ)>,
}

/// Station pieces are interchangeable when addressing a piece to remove.
fn same_piece_kind(a: TrackElemType, b: TrackElemType) -> bool {
    a == b || (a.is_station() && b.is_station())
}

impl TrackRemoveAction {
    pub fn new(track_type: TrackElemType, sequence: u8, origin: CoordsXYZD) -> Self {
        Self {
            track_type,
            sequence,
            origin,
            flags: ActionFlags::NONE,
        }
    }

    pub fn with_flags(mut self, flags: ActionFlags) -> Self {
        self.flags = flags;
        self
    }

    fn matches(&self, element: &TileElement, sequence: u8, z: i32, direction: u8) -> bool {
        let Some(track) = element.as_track() else {
            return false;
        };
        if self.flags.is_ghost() && !element.ghost {
            return false;
        }
        element.base_z == z
            && track.sequence == sequence
            && track.direction == direction
            && same_piece_kind(track.track_type, self.track_type)
    }

    fn locate(&self, ctx: &ParkContext) -> Result<Located, ActionResult> {
        let not_found = || {
            ActionResult::error(
                ActionStatus::InvalidParameters,
                TITLE,
                ActionMessage::ElementNotFound,
            )
        };
        let direction = self.origin.direction & 3;
        let Some(element) = ctx
            .map
            .elements_at(self.origin.xy())
            .iter()
            .find(|e| self.matches(e, self.sequence, self.origin.z, direction))
        else {
            warn!(
                "No track piece {:?} at ({}, {}, {})",
                self.track_type, self.origin.x, self.origin.y, self.origin.z
            );
            return Err(not_found());
        };
        let Some(track) = element.as_track() else {
            return Err(not_found());
        };
        let Some(ted) = track.track_type.descriptor() else {
            return Err(not_found());
        };
        let Some(addressed) = ted.block(self.sequence) else {
            return Err(not_found());
        };

        let start = self.origin.xy() - addressed.offset().rotate(direction);
        let start_z = self.origin.z - addressed.z;
        let mut blocks = Vec::with_capacity(ted.blocks.len());
        for block in ted.blocks {
            let loc = start + block.offset().rotate(direction);
            let z = start_z + block.z;
            let present = ctx.map.elements_at(loc).iter().any(|e| {
                e.as_track().is_some_and(|t| t.ride == track.ride)
                    && self.matches(e, block.index, z, direction)
            });
            if !present {
                warn!("Track piece is missing block {} at {:?}", block.index, loc);
                return Err(ActionResult::error(
                    ActionStatus::Unknown,
                    TITLE,
                    ActionMessage::ElementNotFound,
                ));
            }
            blocks.push((block.index, loc.with_z(z)));
        }
        Ok(Located {
            ride: track.ride,
            track_type: track.track_type,
            station_index: track.station_index,
            has_chain: track.has_chain,
            blocks,
        })
    }

    fn validate(&self, ctx: &ParkContext) -> Result<(Located, i64), ActionResult> {
        check_not_paused(self.flags, ctx, TITLE)?;
        let located = self.locate(ctx)?;
        let Some(ride) = ctx.rides.get(located.ride) else {
            return Err(ActionResult::error(
                ActionStatus::InvalidParameters,
                TITLE,
                ActionMessage::RideNotFound,
            ));
        };
        if ride.has_lifecycle_flag(LIFECYCLE_INDESTRUCTIBLE_TRACK) && located.track_type.is_station() {
            return Err(ActionResult::error(
                ActionStatus::Disallowed,
                TITLE,
                ActionMessage::NotAllowedToModifyStation,
            ));
        }
        let Some(rtd) = ride.descriptor() else {
            return Err(ActionResult::error(
                ActionStatus::InvalidParameters,
                TITLE,
                ActionMessage::InvalidRideType,
            ));
        };
        let ted = located.track_type.descriptor();
        let mut support_cost = 0;
        for (_, loc) in &located.blocks {
            let surface_z = ctx
                .map
                .surface_at(loc.xy())
                .map_or(loc.z, |(e, _)| e.base_z);
            let mut height = loc.z - surface_z;
            if height < 0 {
                height = 10 * COORDS_Z_STEP;
            }
            support_cost += i64::from(height / LAND_HEIGHT_STEP) * rtd.support_price;
        }
        let track_price = ted.map_or(0, |d| (rtd.track_price * d.price_modifier) >> 16);
        let mut refund = track_price + support_cost;
        if ride.has_lifecycle_flag(LIFECYCLE_EVER_BEEN_OPENED) {
            refund = refund * 3 / 4;
        }
        Ok((located, -refund))
    }
}

impl GameAction for TrackRemoveAction {
    fn flags(&self) -> ActionFlags {
        self.flags
    }

    fn query(&self, ctx: &ParkContext) -> ActionResult {
        match self.validate(ctx) {
            Ok((_, cost)) => ActionResult::ok().with_cost(cost).at(self.origin.xyz()),
            Err(result) => result,
        }
    }

    fn execute(&self, ctx: &mut ParkContext) -> ActionResult {
        let (located, cost) = match self.validate(ctx) {
            Ok(found) => found,
            Err(result) => return result,
        };
        let direction = self.origin.direction & 3;
        let needs_water = ctx
            .rides
            .get(located.ride)
            .is_some_and(|r| r.ride_type.has_flag(RTD_TRACK_MUST_BE_ON_WATER));

        for &(index, loc) in &located.blocks {
            ctx.map.remove_where(loc.xy(), |e| {
                e.base_z == loc.z
                    && e.as_track().is_some_and(|t| {
                        t.ride == located.ride && t.sequence == index && t.direction == direction
                    })
            });
            ctx.animations.remove_at(loc);
            if needs_water {
                if let Some(TileElementKind::Surface(surface)) =
                    ctx.map.surface_at_mut(loc.xy()).map(|e| &mut e.kind)
                {
                    surface.has_track_that_needs_water = false;
                }
            }
        }

        let first = located.blocks.first().map(|&(_, loc)| loc);
        let map = &*ctx.map;
        if let Some(ride) = ctx.rides.get_mut(located.ride) {
            match located.track_type {
                TrackElemType::ON_RIDE_PHOTO => ride.set_lifecycle_flag(LIFECYCLE_ON_RIDE_PHOTO, false),
                TrackElemType::CABLE_LIFT_HILL => {
                    ride.set_lifecycle_flag(LIFECYCLE_CABLE_LIFT, false);
                    ride.cable_lift_loc = None;
                }
                TrackElemType::BLOCK_BRAKES => {
                    ride.num_block_brakes = ride.num_block_brakes.saturating_sub(1);
                }
                TrackElemType::MAZE => {
                    ride.maze_tiles = ride.maze_tiles.saturating_sub(1);
                    if ride.maze_tiles == 0 {
                        ride.stations[0] = Default::default();
                    }
                }
                _ => {}
            }
            let lifted_crest = located.track_type == TrackElemType::UP_25_TO_FLAT && located.has_chain;
            if lifted_crest || located.track_type == TrackElemType::CABLE_LIFT_HILL {
                ride.num_block_brakes = ride.num_block_brakes.saturating_sub(1);
            }
            if located.track_type.is_station() {
                if let Some(loc) = first {
                    stations::remove_station_piece(map, ride, loc, direction, located.station_index);
                }
            }
            if ride.overall_view.is_some() && ride.overall_view == first.map(CoordsXYZ::xy) {
                ride.overall_view = None;
            }
        }

        ActionResult::ok().with_cost(cost).at(self.origin.xyz())
    }
}
