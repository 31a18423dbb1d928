//! Lookup tables for designs saved by the first game (TD4 and TD4AA).

use park_sim::objects::{ObjectEntryDescriptor, ObjectType};
use park_sim::ride::RideType;

// ---------------------------------------------------------------------------
// Colours
// ---------------------------------------------------------------------------

/// First-game palette index to the current palette.
const COLOURS: [u8; 32] = [
    0, 1, 2, 4, 5, 6, 7, 9, 11, 12, 13, 14, 15, 16, 18, 19, 20, 21, 22, 23, 24, 25, 26, 27, 28, 30,
    31, 29, 3, 10, 17, 8,
];

/// Unknown colours fall back to black.
pub fn colour(rct1_colour: u8) -> u8 {
    COLOURS.get(usize::from(rct1_colour)).copied().unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Ride types
// ---------------------------------------------------------------------------

pub const RCT1_RIDE_TYPE_STEEL_CORKSCREW_ROLLER_COASTER: u8 = 19;
pub const RCT1_RIDE_TYPE_HEDGE_MAZE: u8 = 20;
pub const RCT1_RIDE_TYPE_RIVER_RAPIDS: u8 = 24;
pub const RCT1_RIDE_TYPE_STEEL_TWISTER_ROLLER_COASTER: u8 = 51;

/// Mode byte for a launch that does not pass through the station.
pub const RCT1_RIDE_MODE_POWERED_LAUNCH: u8 = 3;

/// Hedge mazes carry no train; their entry names the maze object instead.
pub const HEDGE_MAZE_OBJECT: &str = "HMAZE";

pub const RCT1_VEHICLE_TYPE_STEEL_ROLLER_COASTER_TRAIN: u8 = 0;
pub const RCT1_VEHICLE_TYPE_NON_LOOPING_STEEL_TWISTER_TRAIN: u8 = 71;
pub const RCT1_VEHICLE_TYPE_HYPERCOASTER_TRAIN: u8 = 79;

const RIDE_TYPES: [RideType; 85] = [
    RideType::CLASSIC_WOODEN_ROLLER_COASTER, // wooden roller coaster
    RideType::STAND_UP_ROLLER_COASTER,       // stand up steel roller coaster
    RideType::SUSPENDED_SWINGING_COASTER,    // suspended roller coaster
    RideType::INVERTED_ROLLER_COASTER,       // inverted roller coaster
    RideType::CLASSIC_MINI_ROLLER_COASTER,   // steel mini roller coaster
    RideType::MINIATURE_RAILWAY,             // miniature railway
    RideType::MONORAIL,                      // monorail
    RideType::MINI_SUSPENDED_COASTER,        // suspended single rail roller coaster
    RideType::BOAT_HIRE,                     // boat hire
    RideType::WOODEN_WILD_MOUSE,             // wooden crazy rodent roller coaster
    RideType::STEEPLECHASE,                  // single rail roller coaster
    RideType::CAR_RIDE,                      // car ride
    RideType::LAUNCHED_FREEFALL,             // launched freefall
    RideType::BOBSLEIGH_COASTER,             // bobsled roller coaster
    RideType::OBSERVATION_TOWER,             // observation tower
    RideType::LOOPING_ROLLER_COASTER,        // steel roller coaster
    RideType::DINGHY_SLIDE,                  // water slide
    RideType::MINE_TRAIN_COASTER,            // mine train roller coaster
    RideType::CHAIRLIFT,                     // chairlift
    RideType::CORKSCREW_ROLLER_COASTER,      // steel corkscrew roller coaster
    RideType::MAZE,                          // hedge maze
    RideType::SPIRAL_SLIDE,                  // spiral slide
    RideType::GO_KARTS,                      // go karts
    RideType::LOG_FLUME,                     // log flume
    RideType::RIVER_RAPIDS,                  // river rapids
    RideType::DODGEMS,                       // dodgems
    RideType::SWINGING_SHIP,                 // swinging ship
    RideType::SWINGING_INVERTER_SHIP,        // swinging inverter ship
    RideType::FOOD_STALL,                    // ice cream stall
    RideType::FOOD_STALL,                    // chips stall
    RideType::DRINK_STALL,                   // drink stall
    RideType::FOOD_STALL,                    // candyfloss stall
    RideType::SHOP,                          // burger bar
    RideType::MERRY_GO_ROUND,                // merry go round
    RideType::SHOP,                          // balloon stall
    RideType::INFORMATION_KIOSK,             // information kiosk
    RideType::TOILETS,                       // toilets
    RideType::FERRIS_WHEEL,                  // ferris wheel
    RideType::MOTION_SIMULATOR,              // motion simulator
    RideType::CINEMA_3D,                     // 3d cinema
    RideType::TOP_SPIN,                      // top spin
    RideType::SPACE_RINGS,                   // space rings
    RideType::REVERSE_FREEFALL_COASTER,      // reverse freefall roller coaster
    RideType::SHOP,                          // souvenir stall
    RideType::VERTICAL_DROP_ROLLER_COASTER,  // vertical roller coaster
    RideType::FOOD_STALL,                    // pizza stall
    RideType::TWIST,                         // twist
    RideType::HAUNTED_HOUSE,                 // haunted house
    RideType::FOOD_STALL,                    // popcorn stall
    RideType::CIRCUS,                        // circus
    RideType::GHOST_TRAIN,                   // ghost train
    RideType::TWISTER_ROLLER_COASTER,        // steel twister roller coaster
    RideType::WOODEN_ROLLER_COASTER,         // wooden twister roller coaster
    RideType::SIDE_FRICTION_ROLLER_COASTER,  // wooden side friction roller coaster
    RideType::STEEL_WILD_MOUSE,              // steel wild mouse roller coaster
    RideType::FOOD_STALL,                    // hot dog stall
    RideType::FOOD_STALL,                    // exotic sea food stall
    RideType::SHOP,                          // hat stall
    RideType::FOOD_STALL,                    // toffee apple stall
    RideType::VIRGINIA_REEL,                 // virginia reel
    RideType::SPLASH_BOATS,                  // river ride
    RideType::MINI_HELICOPTERS,              // cycle monorail
    RideType::LAY_DOWN_ROLLER_COASTER,       // flying roller coaster
    RideType::SUSPENDED_MONORAIL,            // suspended monorail
    RideType::NULL,                          // 40
    RideType::REVERSER_ROLLER_COASTER,       // wooden reverser roller coaster
    RideType::HEARTLINE_TWISTER_COASTER,     // heartline twister roller coaster
    RideType::MINI_GOLF,                     // miniature golf
    RideType::NULL,                          // 44
    RideType::ROTO_DROP,                     // roto drop
    RideType::FLYING_SAUCERS,                // flying saucers
    RideType::CROOKED_HOUSE,                 // crooked house
    RideType::MONORAIL_CYCLES,               // cycle railway
    RideType::COMPACT_INVERTED_COASTER,      // suspended looping roller coaster
    RideType::WATER_COASTER,                 // water coaster
    RideType::AIR_POWERED_VERTICAL_COASTER,  // air powered vertical coaster
    RideType::INVERTED_HAIRPIN_COASTER,      // inverted wild mouse coaster
    RideType::BOAT_HIRE,                     // jet skis
    RideType::SHOP,                          // t shirt stall
    RideType::RIVER_RAFTS,                   // raft ride
    RideType::FOOD_STALL,                    // doughnut shop
    RideType::ENTERPRISE,                    // enterprise
    RideType::DRINK_STALL,                   // coffee shop
    RideType::FOOD_STALL,                    // fried chicken stall
    RideType::DRINK_STALL,                   // lemonade stall
];

/// The current ride type for a first-game ride and vehicle pair. Two coaster
/// types split by train; unknown types map to [`RideType::NULL`].
pub fn ride_type(rct1_ride_type: u8, vehicle_type: u8) -> RideType {
    match (rct1_ride_type, vehicle_type) {
        (RCT1_RIDE_TYPE_STEEL_TWISTER_ROLLER_COASTER, RCT1_VEHICLE_TYPE_NON_LOOPING_STEEL_TWISTER_TRAIN) => {
            RideType::HYPER_TWISTER
        }
        (RCT1_RIDE_TYPE_STEEL_CORKSCREW_ROLLER_COASTER, RCT1_VEHICLE_TYPE_HYPERCOASTER_TRAIN) => {
            RideType::HYPERCOASTER
        }
        _ => RIDE_TYPES
            .get(usize::from(rct1_ride_type))
            .copied()
            .unwrap_or(RideType::NULL),
    }
}

// ---------------------------------------------------------------------------
// Vehicles
// ---------------------------------------------------------------------------

const VEHICLE_OBJECTS: [&str; 89] = [
    "rct1.ride.steel_rc_trains",              // steel roller coaster train
    "rct1.ride.steel_rc_trains_reversed",     // steel roller coaster train backwards
    "rct1.ride.wooden_rc_trains",             // wooden roller coaster train
    "rct1.ride.inverted_trains",              // inverted coaster train
    "rct2.ride.arrsw1",                       // suspended swinging cars
    "rct1.ride.ladybird_trains",              // ladybird cars
    "rct2.ride.togst",                        // standup roller coaster cars
    "rct2.ride.wmspin",                       // spinning cars
    "rct1.ride.single_person_swinging_cars",  // single person swinging chairs
    "rct2.ride.swans",                        // swans pedal boats
    "rct2.ride.mono1",                        // large monorail train
    "rct2.ride.cboat",                        // canoes
    "rct2.ride.rboat",                        // rowing boats
    "rct2.ride.nrl",                          // steam train
    "rct2.ride.wmouse",                       // wooden mouse cars
    "rct2.ride.bboat",                        // bumper boats
    "rct1.ride.wooden_rc_trains_reversed",    // wooden roller coaster train backwards
    "rct1.ride.rocket_cars",                  // rocket cars
    "rct2.ride.steep1",                       // horses
    "rct2.ride.spcar",                        // sportscars
    "rct2.ride.skytr",                        // lying down swinging cars
    "rct2.ride.wmmine",                       // wooden mine cars
    "rct2.ride.arrsw2",                       // suspended swinging airplane cars
    "rct2.ride.mono2",                        // small monorail cars
    "rct2.ride.trike",                        // water tricycles
    "rct2.ride.ssc1",                         // launched freefall car
    "rct2.ride.bob1",                         // bobsleigh cars
    "rct2.ride.ding1",                        // dinghies
    "rct2.ride.obs1",                         // rotating cabin
    "rct2.ride.amt1",                         // mine train
    "rct2.ride.clift1",                       // chairlift cars
    "rct2.ride.arrt1",                        // corkscrew roller coaster train
    "rct2.ride.steep2",                       // motorbikes
    "rct2.ride.rcr",                          // racing cars
    "rct2.ride.truck1",                       // trucks
    "rct2.ride.kart1",                        // go karts
    "rct2.ride.rapboat",                      // rapids boats
    "rct2.ride.lfb1",                         // log flume boats
    "rct2.ride.dodg1",                        // dodgems
    "rct2.ride.swsh1",                        // swinging ship
    "rct2.ride.swsh2",                        // swinging inverter ship
    "rct2.ride.mgr1",                         // merry go round
    "rct2.ride.fwh1",                         // ferris wheel
    "rct2.ride.simpod",                       // simulator pod
    "rct2.ride.c3d",                          // cinema building
    "rct2.ride.topsp1",                       // topspin car
    "rct2.ride.srings",                       // space rings
    "rct2.ride.revf1",                        // reverse freefall roller coaster car
    "rct2.ride.bmvd",                         // vertical roller coaster cars
    "rct2.ride.ctcar",                        // cat cars
    "rct2.ride.twist1",                       // twist arms and cars
    "rct2.ride.hhbuild",                      // haunted house building
    "rct1.ride.log_trains",                   // log cars
    "rct2.ride.circus1",                      // circus tent
    "rct2.ride.gtc",                          // ghost train cars
    "rct2.ride.bmsd",                         // steel twister roller coaster train
    "rct2.ride.mft",                          // wooden twister roller coaster train
    "rct2.ride.sfric1",                       // wooden side friction cars
    "rct2.ride.vcr",                          // vintage cars
    "rct2.ride.nrl2",                         // steam train covered cars
    "rct2.ride.bmsu",                         // stand up steel twister roller coaster train
    "rct2.ride.bmfl",                         // floorless steel twister roller coaster train
    "rct2.ride.smc1",                         // steel mouse cars
    "rct2.ride.clift2",                       // chairlift cars alternative
    "rct2.ride.smono",                        // suspended monorail train
    "rct2.ride.helicar",                      // helicopter cars
    "rct2.ride.vreel",                        // virginia reel tubs
    "rct2.ride.revcar",                       // reverser cars
    "rct2.ride.golf1",                        // golfers
    "rct2.ride.spboat",                       // river ride boats
    "rct2.ride.vekst",                        // flying roller coaster train
    "rct2.ride.bmrb",                         // non looping steel twister roller coaster train
    "rct2.ride.utcar",                        // heartline twister cars
    "rct2.ride.utcarr",                       // heartline twister cars reversed
    "",                                       // reserved
    "rct2.ride.gdrop1",                       // rotodrop car
    "rct2.ride.fsauc",                        // flying saucers
    "rct2.ride.chbuild",                      // crooked house building
    "rct2.ride.monbk",                        // bicycles
    "rct2.ride.arrt2",                        // hypercoaster train
    "rct2.ride.nemt",                         // 4 across inverted coaster train
    "rct2.ride.cstboat",                      // water coaster boats
    "rct2.ride.slcfo",                        // faceoff cars
    "rct2.ride.jski",                         // jet skis
    "rct2.ride.rftboat",                      // raft boats
    "rct2.ride.aml1",                         // american style steam train
    "rct2.ride.thcar",                        // air powered coaster train
    "rct2.ride.ivmc1",                        // suspended wild mouse cars
    "rct2.ride.enterp",                       // enterprise wheel
];

pub fn vehicle_object_identifier(vehicle_type: u8) -> Option<&'static str> {
    VEHICLE_OBJECTS
        .get(usize::from(vehicle_type))
        .copied()
        .filter(|id| !id.is_empty())
}

/// Vehicle entry for a first-game train. Trains that shipped with the second
/// game resolve by their legacy name; the rest keep the full identifier.
pub fn vehicle_object(vehicle_type: u8) -> Option<ObjectEntryDescriptor> {
    let identifier = vehicle_object_identifier(vehicle_type)?;
    let name = match identifier.strip_prefix("rct2.ride.") {
        Some(legacy) => legacy.to_ascii_uppercase(),
        None => identifier.to_string(),
    };
    Some(ObjectEntryDescriptor::new(ObjectType::Ride, &name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colour_table_covers_palette() {
        let mut seen = COLOURS.to_vec();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 32, "got: {seen:?}");
        assert_eq!(colour(3), 4);
        assert_eq!(colour(200), 0);
    }

    #[test]
    fn test_ride_type_splits_by_train() {
        assert_eq!(
            ride_type(RCT1_RIDE_TYPE_STEEL_CORKSCREW_ROLLER_COASTER, 0),
            RideType::CORKSCREW_ROLLER_COASTER
        );
        assert_eq!(
            ride_type(
                RCT1_RIDE_TYPE_STEEL_CORKSCREW_ROLLER_COASTER,
                RCT1_VEHICLE_TYPE_HYPERCOASTER_TRAIN
            ),
            RideType::HYPERCOASTER
        );
        assert_eq!(ride_type(RCT1_RIDE_TYPE_HEDGE_MAZE, 0), RideType::MAZE);
        assert_eq!(ride_type(64, 0), RideType::NULL);
        assert_eq!(ride_type(250, 0), RideType::NULL);
    }

    #[test]
    fn test_vehicle_object_names() {
        let arrow = vehicle_object(31).map(|e| e.name);
        assert_eq!(arrow.as_deref(), Some("ARRT1"), "got: {arrow:?}");
        let steel = vehicle_object(RCT1_VEHICLE_TYPE_STEEL_ROLLER_COASTER_TRAIN).map(|e| e.name);
        assert_eq!(steel.as_deref(), Some("rct1.ride.steel_rc_trains"));
        assert_eq!(vehicle_object(74), None);
        assert_eq!(vehicle_object(200), None);
    }
}
