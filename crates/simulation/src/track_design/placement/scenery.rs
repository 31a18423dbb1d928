//! Scenery is placed after the ride, in two passes over the list: the first
//! places every item, the second reconnects footpath edges now that all the
//! neighbouring paths exist.

use crate::config::COORDS_Z_STEP;
use crate::context::ParkContext;
use crate::coords::{rol4, CoordsXY, CoordsXYZ, CoordsXYZD, Direction};
use crate::footpath;
use crate::game_actions::{
    execute_nested, run_nested, FootpathPlaceFromTrackAction, FootpathRemoveAction, GameAction,
    LargeSceneryPlaceAction, LargeSceneryRemoveAction, SmallSceneryPlaceAction,
    SmallSceneryRemoveAction, WallPlaceAction, WallRemoveAction,
};
use crate::objects::{ObjectIndex, ObjectKind, ObjectRepository};
use crate::track_design::{
    SceneryKind, TrackDesign, TrackDesignSceneryElement, SCENERY_PATH_EDGES_MASK,
    SCENERY_PATH_QUEUE, SCENERY_PATH_SLOPED, SCENERY_PATH_SLOPE_DIRECTION_SHIFT,
};

use super::{TrackDesignState, TrackPlaceOperation};

const PLACE_PASS: u8 = 0;
const PATH_FIXUP_PASS: u8 = 1;

/// Resolve a scenery entry to a loaded object. Footpaths whose surface is
/// missing fall back to the first footpath object available.
fn resolve_object(objects: &ObjectRepository, scenery: &TrackDesignSceneryElement) -> Option<ObjectIndex> {
    if let Some(index) = objects.find(&scenery.scenery_object) {
        return Some(index);
    }
    if scenery.kind() != Some(SceneryKind::Footpath) {
        return None;
    }
    objects
        .iter()
        .find(|(_, o)| matches!(o.kind, ObjectKind::Footpath { .. }))
        .map(|(index, _)| index)
}

/// Whether any scenery item of `td` cannot be resolved.
pub fn scenery_unavailable(td: &TrackDesign, objects: &ObjectRepository) -> bool {
    td.scenery_elements
        .iter()
        .any(|s| s.kind().is_none() || resolve_object(objects, s).is_none())
}

pub(super) fn place_all_scenery(ctx: &mut ParkContext, td: &TrackDesign, state: &mut TrackDesignState) -> i64 {
    let rotation = ctx.placement.current_direction & 3;
    let origin = state.origin;
    let mut cost = 0;
    for pass in [PLACE_PASS, PATH_FIXUP_PASS] {
        if td.has_scenery() {
            state.has_scenery = true;
        }
        if !state.place_scenery {
            continue;
        }
        for scenery in &td.scenery_elements {
            let loc = origin.xy().to_tile_start() + scenery.tile_offset().rotate(rotation);
            state.update_bounds(loc.with_z(origin.z));
            cost += place_scenery_element(ctx, state, scenery, loc, pass, rotation);
        }
    }
    cost
}

fn place_scenery_element(
    ctx: &mut ParkContext,
    state: &mut TrackDesignState,
    scenery: &TrackDesignSceneryElement,
    loc: CoordsXY,
    pass: u8,
    rotation: Direction,
) -> i64 {
    let operation = state.operation;
    let z = state.origin.z + scenery.z * COORDS_Z_STEP;

    match operation {
        TrackPlaceOperation::DrawOutlines => {
            if pass == PLACE_PASS {
                ctx.selection.add_tile(loc);
            }
            return 0;
        }
        TrackPlaceOperation::RemoveGhost => {
            if pass == PLACE_PASS {
                remove_ghost(ctx, scenery, loc.with_z(z), rotation);
            }
            return 0;
        }
        TrackPlaceOperation::GetPlaceZ => {
            let scenery_z = scenery.z * COORDS_Z_STEP + state.place_z;
            state.place_scenery_z = state.place_scenery_z.min(scenery_z);
            if resolve_object(ctx.objects, scenery).is_none() {
                state.scenery_unavailable = true;
            }
            return 0;
        }
        _ => {}
    }

    let (Some(kind), Some(object)) = (scenery.kind(), resolve_object(ctx.objects, scenery)) else {
        state.scenery_unavailable = true;
        return 0;
    };
    let flags = operation.sub_action_flags();
    let item_direction = (rotation + scenery.direction()) & 3;

    let result = match (kind, pass) {
        (SceneryKind::Small, PLACE_PASS) => run_nested(
            &SmallSceneryPlaceAction {
                loc: loc.with_z(z),
                direction: item_direction,
                quadrant: (((scenery.flags >> 2) & 3) + rotation) & 3,
                object,
                colours: scenery.colours(),
                flags,
            },
            ctx,
        ),
        (SceneryKind::Large, PLACE_PASS) => run_nested(
            &LargeSceneryPlaceAction {
                loc: CoordsXYZD::new(loc.x, loc.y, z, item_direction),
                object,
                colours: scenery.colours(),
                flags,
            },
            ctx,
        ),
        (SceneryKind::Wall, PLACE_PASS) => run_nested(
            &WallPlaceAction {
                loc: CoordsXYZD::new(loc.x, loc.y, z, item_direction),
                object,
                colours: scenery.colours(),
                flags,
            },
            ctx,
        ),
        (SceneryKind::Footpath, PLACE_PASS) => {
            let slope_direction = (((scenery.flags >> SCENERY_PATH_SLOPE_DIRECTION_SHIFT) & 3) + rotation) & 3;
            run_nested(
                &FootpathPlaceFromTrackAction {
                    loc: loc.with_z(z),
                    is_sloped: scenery.flags & SCENERY_PATH_SLOPED != 0,
                    slope_direction,
                    surface: object,
                    edges: rol4(scenery.flags & SCENERY_PATH_EDGES_MASK, rotation),
                    is_queue: scenery.flags & SCENERY_PATH_QUEUE != 0,
                    flags,
                },
                ctx,
            )
        }
        (SceneryKind::Footpath, _) => {
            if operation != TrackPlaceOperation::PlaceQuery {
                reconnect_path(ctx, loc.with_z(z));
            }
            return 0;
        }
        _ => return 0,
    };
    if result.is_ok() {
        result.cost
    } else {
        0
    }
}

fn reconnect_path(ctx: &mut ParkContext, loc: CoordsXYZ) {
    if ctx.map.footpath_at(loc).is_none() {
        return;
    }
    footpath::remove_edges_at(ctx.map, loc);
    footpath::connect_edges(ctx.map, loc);
}

fn remove_ghost(ctx: &mut ParkContext, scenery: &TrackDesignSceneryElement, loc: CoordsXYZ, rotation: Direction) {
    let flags = TrackPlaceOperation::RemoveGhost.sub_action_flags();
    let direction = (rotation + scenery.direction()) & 3;
    let Some(kind) = scenery.kind() else {
        return;
    };
    let action: Box<dyn GameAction> = match kind {
        SceneryKind::Small => {
            let Some(object) = ctx.objects.find(&scenery.scenery_object) else {
                return;
            };
            Box::new(SmallSceneryRemoveAction {
                loc,
                quadrant: (((scenery.flags >> 2) & 3) + rotation) & 3,
                object,
                flags,
            })
        }
        SceneryKind::Large => Box::new(LargeSceneryRemoveAction {
            loc: CoordsXYZD::new(loc.x, loc.y, loc.z, direction),
            sequence: 0,
            flags,
        }),
        SceneryKind::Wall => Box::new(WallRemoveAction {
            loc: CoordsXYZD::new(loc.x, loc.y, loc.z, direction),
            flags,
        }),
        SceneryKind::Footpath => Box::new(FootpathRemoveAction { loc, flags }),
    };
    execute_nested(action.as_ref(), ctx);
}
