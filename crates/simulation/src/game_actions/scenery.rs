//! Small scenery, large scenery and walls: placement, removal and the wall
//! clearing that track construction performs.

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::context::ParkContext;
use crate::coords::{
    direction_reverse, rol4, CoordsXY, CoordsXYZ, CoordsXYZD, Direction, COORDS_DIRECTION_DELTA,
};
use crate::objects::{
    LargeSceneryDesc, ObjectIndex, ObjectKind, ObjectRepository, SmallSceneryDesc, SMALL_SCENERY_FULL_TILE,
    SMALL_SCENERY_HALF_SPACE, SMALL_SCENERY_THREE_QUARTERS,
};
use crate::tile_map::{
    can_construct_with_clear_at, clear_removable_scenery, ClearanceRange, ElementClass,
    LargeSceneryElement, SmallSceneryElement, TileElement, TileElementKind, TileMap, WallElement,
    GROUND_UNDERWATER, QUARTER_TILE_FULL,
};

use super::{
    check_capacity, check_location, check_not_paused, ActionFlags, ActionMessage, ActionResult,
    ActionStatus, GameAction,
};

const PLACE_TITLE: ActionMessage = ActionMessage::CantPositionThisHere;
const REMOVE_TITLE: ActionMessage = ActionMessage::CantRemoveThis;

// ---------------------------------------------------------------------------
// Wall clearing
// ---------------------------------------------------------------------------

fn overlaps(element: &TileElement, range: ClearanceRange) -> bool {
    element.base_z < range.clearance_z && element.clearance_z > range.base_z
}

/// Remove walls on `range.loc` that overlap it vertically and stand on one of
/// the edges in the `directions` mask.
pub fn remove_intersecting_walls(map: &mut TileMap, range: ClearanceRange, directions: u8) -> usize {
    map.remove_where(range.loc, |e| match &e.kind {
        TileElementKind::Wall(wall) => {
            directions & (1 << (wall.direction & 3)) != 0 && overlaps(e, range)
        }
        _ => false,
    })
}

/// Remove walls on the four neighbouring tiles that face back towards
/// `range.loc`.
pub fn remove_walls_on_neighbours(map: &mut TileMap, range: ClearanceRange) {
    for d in 0..4u8 {
        let neighbour = ClearanceRange {
            loc: range.loc + COORDS_DIRECTION_DELTA[usize::from(d)],
            ..range
        };
        remove_intersecting_walls(map, neighbour, 1 << direction_reverse(d));
    }
}

fn ghost_matches(flags: ActionFlags, element: &TileElement) -> bool {
    !flags.is_ghost() || element.ghost
}

fn element_not_found() -> ActionResult {
    ActionResult::error(
        ActionStatus::InvalidParameters,
        REMOVE_TITLE,
        ActionMessage::ElementNotFound,
    )
}

fn object_not_found(title: ActionMessage) -> ActionResult {
    ActionResult::error(ActionStatus::InvalidParameters, title, ActionMessage::ObjectNotFound)
}

fn check_not_underwater(ground_flags: u8) -> Result<(), ActionResult> {
    if ground_flags & GROUND_UNDERWATER != 0 {
        return Err(ActionResult::error(
            ActionStatus::Disallowed,
            PLACE_TITLE,
            ActionMessage::CantBuildThisUnderwater,
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Small scenery
// ---------------------------------------------------------------------------

fn small_scenery(
    objects: &ObjectRepository,
    object: ObjectIndex,
    title: ActionMessage,
) -> Result<&SmallSceneryDesc, ActionResult> {
    match objects.get(object).map(|o| &o.kind) {
        Some(ObjectKind::SmallScenery(desc)) => Ok(desc),
        _ => Err(object_not_found(title)),
    }
}

/// Quarters of the tile occupied by a small scenery item.
pub fn small_scenery_quarter(desc: &SmallSceneryDesc, direction: Direction, quadrant: u8) -> u8 {
    if desc.has_flag(SMALL_SCENERY_FULL_TILE) {
        QUARTER_TILE_FULL
    } else if desc.has_flag(SMALL_SCENERY_THREE_QUARTERS) {
        rol4(0b0111, direction)
    } else if desc.has_flag(SMALL_SCENERY_HALF_SPACE) {
        rol4(0b0011, direction)
    } else {
        1 << (quadrant & 3)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct SmallSceneryPlaceAction {
    pub loc: CoordsXYZ,
    pub direction: Direction,
    pub quadrant: u8,
    pub object: ObjectIndex,
    pub colours: [u8; 3],
    pub flags: ActionFlags,
}

impl SmallSceneryPlaceAction {
    fn range(&self, desc: &SmallSceneryDesc) -> (ClearanceRange, u8) {
        let quadrant = if desc.has_flag(SMALL_SCENERY_FULL_TILE) {
            0
        } else {
            self.quadrant
        };
        (
            ClearanceRange::new(self.loc.xy(), self.loc.z, self.loc.z + desc.height),
            small_scenery_quarter(desc, self.direction, quadrant),
        )
    }

    fn validate(&self, ctx: &ParkContext) -> Result<ActionResult, ActionResult> {
        let desc = small_scenery(ctx.objects, self.object, PLACE_TITLE)?;
        check_not_paused(self.flags, ctx, PLACE_TITLE)?;
        check_location(ctx, self.loc, PLACE_TITLE)?;
        check_capacity(ctx, 1, PLACE_TITLE)?;
        let (range, quarter) = self.range(desc);
        let outcome = can_construct_with_clear_at(
            ctx.map,
            ctx.objects,
            range,
            quarter,
            ctx.cheats.disable_clearance_checks,
        )
        .map_err(|obstruction| ActionResult::no_clearance(PLACE_TITLE, obstruction))?;
        check_not_underwater(outcome.ground_flags)?;
        Ok(ActionResult::ok()
            .with_cost(desc.price + outcome.cost)
            .at(self.loc))
    }
}

impl GameAction for SmallSceneryPlaceAction {
    fn flags(&self) -> ActionFlags {
        self.flags
    }

    fn query(&self, ctx: &ParkContext) -> ActionResult {
        self.validate(ctx).unwrap_or_else(|e| e)
    }

    fn execute(&self, ctx: &mut ParkContext) -> ActionResult {
        let result = match self.validate(ctx) {
            Ok(result) => result,
            Err(result) => return result,
        };
        let Ok(desc) = small_scenery(ctx.objects, self.object, PLACE_TITLE) else {
            return object_not_found(PLACE_TITLE);
        };
        let (range, quarter) = self.range(desc);
        let ghost = self.flags.is_ghost();
        if !ghost {
            clear_removable_scenery(ctx.map, ctx.objects, range, quarter);
        }
        let mut element = TileElement::new(
            range.base_z,
            range.clearance_z,
            quarter,
            TileElementKind::SmallScenery(SmallSceneryElement {
                object: self.object,
                direction: self.direction & 3,
                quadrant: self.quadrant & 3,
                colours: self.colours,
            }),
        );
        element.ghost = ghost;
        if ctx.map.insert(self.loc.xy(), element).is_none() {
            return ActionResult::error(
                ActionStatus::NoFreeElements,
                PLACE_TITLE,
                ActionMessage::TileElementLimitReached,
            );
        }
        result
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct SmallSceneryRemoveAction {
    pub loc: CoordsXYZ,
    pub quadrant: u8,
    pub object: ObjectIndex,
    pub flags: ActionFlags,
}

impl SmallSceneryRemoveAction {
    fn matches(&self, element: &TileElement, full_tile: bool) -> bool {
        match &element.kind {
            TileElementKind::SmallScenery(scenery) => {
                element.base_z == self.loc.z
                    && scenery.object == self.object
                    && (full_tile || scenery.quadrant == self.quadrant & 3)
                    && ghost_matches(self.flags, element)
            }
            _ => false,
        }
    }

    fn validate(&self, ctx: &ParkContext) -> Result<ActionResult, ActionResult> {
        let desc = small_scenery(ctx.objects, self.object, REMOVE_TITLE)?;
        check_not_paused(self.flags, ctx, REMOVE_TITLE)?;
        let full_tile = desc.has_flag(SMALL_SCENERY_FULL_TILE);
        if !ctx
            .map
            .elements_at(self.loc.xy())
            .iter()
            .any(|e| self.matches(e, full_tile))
        {
            return Err(element_not_found());
        }
        Ok(ActionResult::ok().with_cost(desc.removal_price).at(self.loc))
    }
}

impl GameAction for SmallSceneryRemoveAction {
    fn flags(&self) -> ActionFlags {
        self.flags
    }

    fn query(&self, ctx: &ParkContext) -> ActionResult {
        self.validate(ctx).unwrap_or_else(|e| e)
    }

    fn execute(&self, ctx: &mut ParkContext) -> ActionResult {
        let result = match self.validate(ctx) {
            Ok(result) => result,
            Err(result) => return result,
        };
        let full_tile = small_scenery(ctx.objects, self.object, REMOVE_TITLE)
            .is_ok_and(|d| d.has_flag(SMALL_SCENERY_FULL_TILE));
        ctx.map.remove_where(self.loc.xy(), |e| self.matches(e, full_tile));
        result
    }
}

// ---------------------------------------------------------------------------
// Large scenery
// ---------------------------------------------------------------------------

fn large_scenery(
    objects: &ObjectRepository,
    object: ObjectIndex,
    title: ActionMessage,
) -> Result<&LargeSceneryDesc, ActionResult> {
    match objects.get(object).map(|o| &o.kind) {
        Some(ObjectKind::LargeScenery(desc)) => Ok(desc),
        _ => Err(object_not_found(title)),
    }
}

/// World position and vertical span of every tile of a large scenery item
/// whose origin is `origin`.
fn large_scenery_tiles(desc: &LargeSceneryDesc, origin: CoordsXYZD) -> Vec<(u8, ClearanceRange)> {
    desc.tiles
        .iter()
        .enumerate()
        .map(|(i, tile)| {
            let loc = origin.xy() + CoordsXY::new(tile.x, tile.y).rotate(origin.direction);
            let z = origin.z + tile.z;
            (i as u8, ClearanceRange::new(loc, z, z + tile.clearance))
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct LargeSceneryPlaceAction {
    pub loc: CoordsXYZD,
    pub object: ObjectIndex,
    pub colours: [u8; 3],
    pub flags: ActionFlags,
}

impl LargeSceneryPlaceAction {
    fn validate(&self, ctx: &ParkContext) -> Result<ActionResult, ActionResult> {
        let desc = large_scenery(ctx.objects, self.object, PLACE_TITLE)?;
        check_not_paused(self.flags, ctx, PLACE_TITLE)?;
        let tiles = large_scenery_tiles(desc, self.loc);
        check_capacity(ctx, tiles.len(), PLACE_TITLE)?;
        let mut cost = desc.price;
        for (_, range) in &tiles {
            check_location(ctx, range.loc.with_z(range.base_z), PLACE_TITLE)?;
            let outcome = can_construct_with_clear_at(
                ctx.map,
                ctx.objects,
                *range,
                QUARTER_TILE_FULL,
                ctx.cheats.disable_clearance_checks,
            )
            .map_err(|obstruction| ActionResult::no_clearance(PLACE_TITLE, obstruction))?;
            check_not_underwater(outcome.ground_flags)?;
            cost += outcome.cost;
        }
        Ok(ActionResult::ok().with_cost(cost).at(self.loc.xyz()))
    }
}

impl GameAction for LargeSceneryPlaceAction {
    fn flags(&self) -> ActionFlags {
        self.flags
    }

    fn query(&self, ctx: &ParkContext) -> ActionResult {
        self.validate(ctx).unwrap_or_else(|e| e)
    }

    fn execute(&self, ctx: &mut ParkContext) -> ActionResult {
        let result = match self.validate(ctx) {
            Ok(result) => result,
            Err(result) => return result,
        };
        let tiles = match large_scenery(ctx.objects, self.object, PLACE_TITLE) {
            Ok(desc) => large_scenery_tiles(desc, self.loc),
            Err(result) => return result,
        };
        let ghost = self.flags.is_ghost();
        for (sequence, range) in tiles {
            if !ghost {
                clear_removable_scenery(ctx.map, ctx.objects, range, QUARTER_TILE_FULL);
            }
            let mut element = TileElement::new(
                range.base_z,
                range.clearance_z,
                QUARTER_TILE_FULL,
                TileElementKind::LargeScenery(LargeSceneryElement {
                    object: self.object,
                    direction: self.loc.direction & 3,
                    sequence,
                    colours: self.colours,
                }),
            );
            element.ghost = ghost;
            if ctx.map.insert(range.loc, element).is_none() {
                return ActionResult::error(
                    ActionStatus::NoFreeElements,
                    PLACE_TITLE,
                    ActionMessage::TileElementLimitReached,
                );
            }
        }
        result
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct LargeSceneryRemoveAction {
    /// Position and facing of the tile with index `sequence`.
    pub loc: CoordsXYZD,
    pub sequence: u8,
    pub flags: ActionFlags,
}

impl LargeSceneryRemoveAction {
    /// Every tile of the addressed item, keyed by sequence index.
    fn locate(&self, ctx: &ParkContext) -> Result<(ObjectIndex, Vec<(u8, ClearanceRange)>), ActionResult> {
        check_not_paused(self.flags, ctx, REMOVE_TITLE)?;
        let direction = self.loc.direction & 3;
        let object = ctx
            .map
            .elements_at(self.loc.xy())
            .iter()
            .find_map(|e| match &e.kind {
                TileElementKind::LargeScenery(s)
                    if e.base_z == self.loc.z
                        && s.direction == direction
                        && s.sequence == self.sequence
                        && ghost_matches(self.flags, e) =>
                {
                    Some(s.object)
                }
                _ => None,
            })
            .ok_or_else(element_not_found)?;
        let desc = large_scenery(ctx.objects, object, REMOVE_TITLE)?;
        let Some(tile) = desc.tiles.get(usize::from(self.sequence)) else {
            return Err(element_not_found());
        };
        let origin_xy = self.loc.xy() - CoordsXY::new(tile.x, tile.y).rotate(direction);
        let origin = CoordsXYZD::new(origin_xy.x, origin_xy.y, self.loc.z - tile.z, direction);
        Ok((object, large_scenery_tiles(desc, origin)))
    }
}

impl GameAction for LargeSceneryRemoveAction {
    fn flags(&self) -> ActionFlags {
        self.flags
    }

    fn query(&self, ctx: &ParkContext) -> ActionResult {
        match self.locate(ctx) {
            Ok(_) => ActionResult::ok().at(self.loc.xyz()),
            Err(result) => result,
        }
    }

    fn execute(&self, ctx: &mut ParkContext) -> ActionResult {
        let (object, tiles) = match self.locate(ctx) {
            Ok(found) => found,
            Err(result) => return result,
        };
        for (sequence, range) in tiles {
            ctx.map.remove_where(range.loc, |e| match &e.kind {
                TileElementKind::LargeScenery(s) => {
                    e.base_z == range.base_z && s.object == object && s.sequence == sequence
                }
                _ => false,
            });
        }
        ActionResult::ok().at(self.loc.xyz())
    }
}

// ---------------------------------------------------------------------------
// Walls
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct WallPlaceAction {
    /// Tile, base height and the edge the wall stands on.
    pub loc: CoordsXYZD,
    pub object: ObjectIndex,
    pub colours: [u8; 3],
    pub flags: ActionFlags,
}

impl WallPlaceAction {
    fn wall_object(&self, ctx: &ParkContext) -> Result<(i32, i64), ActionResult> {
        match ctx.objects.get(self.object).map(|o| &o.kind) {
            Some(ObjectKind::Wall { height, price }) => Ok((*height, *price)),
            _ => Err(object_not_found(PLACE_TITLE)),
        }
    }

    fn validate(&self, ctx: &ParkContext) -> Result<(ClearanceRange, ActionResult), ActionResult> {
        let (height, price) = self.wall_object(ctx)?;
        check_not_paused(self.flags, ctx, PLACE_TITLE)?;
        check_location(ctx, self.loc.xyz(), PLACE_TITLE)?;
        check_capacity(ctx, 1, PLACE_TITLE)?;
        let range = ClearanceRange::new(self.loc.xy(), self.loc.z, self.loc.z + height);
        let direction = self.loc.direction & 3;
        let blocked = !ctx.cheats.disable_clearance_checks
            && ctx.map.elements_at(self.loc.xy()).iter().any(|e| match &e.kind {
                TileElementKind::Wall(wall) => wall.direction == direction && overlaps(e, range),
                _ => false,
            });
        if blocked {
            return Err(ActionResult::error(
                ActionStatus::NoClearance,
                PLACE_TITLE,
                ActionMessage::ObstructedBy(ElementClass::Wall),
            ));
        }
        Ok((range, ActionResult::ok().with_cost(price).at(self.loc.xyz())))
    }
}

impl GameAction for WallPlaceAction {
    fn flags(&self) -> ActionFlags {
        self.flags
    }

    fn query(&self, ctx: &ParkContext) -> ActionResult {
        match self.validate(ctx) {
            Ok((_, result)) => result,
            Err(result) => result,
        }
    }

    fn execute(&self, ctx: &mut ParkContext) -> ActionResult {
        let (range, result) = match self.validate(ctx) {
            Ok(found) => found,
            Err(result) => return result,
        };
        // Walls sit on a tile edge and occupy no quarters.
        let mut element = TileElement::new(
            range.base_z,
            range.clearance_z,
            0,
            TileElementKind::Wall(WallElement {
                object: self.object,
                direction: self.loc.direction & 3,
                colours: self.colours,
            }),
        );
        element.ghost = self.flags.is_ghost();
        if ctx.map.insert(range.loc, element).is_none() {
            return ActionResult::error(
                ActionStatus::NoFreeElements,
                PLACE_TITLE,
                ActionMessage::TileElementLimitReached,
            );
        }
        result
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct WallRemoveAction {
    pub loc: CoordsXYZD,
    pub flags: ActionFlags,
}

impl WallRemoveAction {
    fn matches(&self, element: &TileElement) -> bool {
        match &element.kind {
            TileElementKind::Wall(wall) => {
                element.base_z == self.loc.z
                    && wall.direction == self.loc.direction & 3
                    && ghost_matches(self.flags, element)
            }
            _ => false,
        }
    }

    fn validate(&self, ctx: &ParkContext) -> Result<ActionResult, ActionResult> {
        check_not_paused(self.flags, ctx, REMOVE_TITLE)?;
        if !ctx
            .map
            .elements_at(self.loc.xy())
            .iter()
            .any(|e| self.matches(e))
        {
            return Err(element_not_found());
        }
        Ok(ActionResult::ok().at(self.loc.xyz()))
    }
}

impl GameAction for WallRemoveAction {
    fn flags(&self) -> ActionFlags {
        self.flags
    }

    fn query(&self, ctx: &ParkContext) -> ActionResult {
        self.validate(ctx).unwrap_or_else(|e| e)
    }

    fn execute(&self, ctx: &mut ParkContext) -> ActionResult {
        let result = match self.validate(ctx) {
            Ok(result) => result,
            Err(result) => return result,
        };
        ctx.map.remove_where(self.loc.xy(), |e| self.matches(e));
        result
    }
}
