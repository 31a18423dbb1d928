//! Building a design off to the side: the footprint it needs and a scratch
//! park it is fully built into for rendering and costing.

use crate::config::{COORDS_XY_STEP, TRACK_PREVIEW_MAP_SIZE, TRACK_PREVIEW_ORIGIN_XY};
use crate::context::ParkState;
use crate::coords::{CoordsXYZD, TileCoordsXY};
use crate::objects::ObjectRepository;
use crate::ride::RideId;
use crate::tile_map::TileMap;
use crate::track_design::{
    TrackDesign, TrackDesignGameStateData, TRACK_DESIGN_FLAG_HAS_SCENERY,
    TRACK_DESIGN_FLAG_SCENERY_UNAVAILABLE, TRACK_DESIGN_FLAG_VEHICLE_UNAVAILABLE,
};

use super::{place_virtual, TrackPlaceOperation};

/// Footprint of `td` in tiles, measured by an outline pass at the preview
/// origin.
pub fn space_required(td: &TrackDesign) -> TileCoordsXY {
    let mut park = ParkState::default();
    let ride = park.rides.create(td.ride_type());
    let mut ctx = park.ctx();
    ctx.placement.drawing_preview = true;
    let origin = CoordsXYZD::new(TRACK_PREVIEW_ORIGIN_XY, TRACK_PREVIEW_ORIGIN_XY, 0, 0);
    let (state, _) = place_virtual(&mut ctx, td, TrackPlaceOperation::DrawOutlines, true, ride, origin);
    TileCoordsXY::new(
        (state.preview_max.x - state.preview_min.x) / COORDS_XY_STEP + 1,
        (state.preview_max.y - state.preview_min.y) / COORDS_XY_STEP + 1,
    )
}

/// A design built into its own scratch park.
pub struct TrackDesignPreview {
    pub park: ParkState,
    pub ride: RideId,
    pub cost: i64,
    /// `TRACK_DESIGN_FLAG_*` bits.
    pub flags: u8,
}

/// Build `td` in the middle of an empty, fully owned scratch map.
///
/// The cost and availability flags are written to `td.game_state`. Returns
/// `None` when the design cannot be built at all.
pub fn place_preview(td: &mut TrackDesign, objects: &ObjectRepository) -> Option<TrackDesignPreview> {
    td.game_state = TrackDesignGameStateData::default();

    let mut park = ParkState::with_map(TileMap::new(TRACK_PREVIEW_MAP_SIZE, TRACK_PREVIEW_MAP_SIZE));
    park.map.set_all_owned(true);
    park.objects = objects.clone();

    let ride = park.rides.create(td.ride_type());
    let vehicle = park.objects.find(&td.track_and_vehicle.vehicle_object);
    if let Some(built) = park.rides.get_mut(ride) {
        built.vehicle_object = vehicle;
    }

    let centre = TRACK_PREVIEW_MAP_SIZE * COORDS_XY_STEP / 2;
    let mut flags = 0;
    let cost = {
        let mut ctx = park.ctx();
        ctx.placement.drawing_preview = true;

        let probe = CoordsXYZD::new(centre, centre, 16, 0);
        let (probe_state, _) = place_virtual(&mut ctx, td, TrackPlaceOperation::GetPlaceZ, true, ride, probe);
        if probe_state.has_scenery {
            flags |= TRACK_DESIGN_FLAG_HAS_SCENERY;
        }
        let z = probe_state.place_z_result() + 16 - probe_state.place_scenery_z;
        let place_scenery = !probe_state.scenery_unavailable;

        let origin = CoordsXYZD::new(centre, centre, z, 0);
        let (_, result) = place_virtual(
            &mut ctx,
            td,
            TrackPlaceOperation::PlaceTrackPreview,
            place_scenery,
            ride,
            origin,
        );
        if !result.is_ok() {
            crate::ride::demolish_ride(&mut ctx, ride);
            return None;
        }
        if !place_scenery {
            flags |= TRACK_DESIGN_FLAG_SCENERY_UNAVAILABLE;
        }
        result.cost
    };
    if vehicle.is_none() {
        flags |= TRACK_DESIGN_FLAG_VEHICLE_UNAVAILABLE;
    }

    td.game_state.cost = cost;
    td.game_state.flags = flags;
    Some(TrackDesignPreview {
        park,
        ride,
        cost,
        flags,
    })
}
