//! Criterion benchmarks for track design placement.
//!
//! Benchmarks:
//!   - drawOutlines pass over a six-piece circuit
//!   - full place of the same circuit onto a fresh park
//!   - preview build (scratch map, outline pass, cost)
//!
//! Run with: cargo bench -p park_sim --bench placement_bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use park_sim::context::ParkState;
use park_sim::coords::{CoordsXYZD, TileCoordsXYZD};
use park_sim::game_actions::ActionFlags;
use park_sim::objects::ObjectRepository;
use park_sim::ride::RideType;
use park_sim::tile_map::TileMap;
use park_sim::track_data::TrackElemType;
use park_sim::track_design::{
    place_preview, place_track_design, place_virtual, TrackDesign, TrackDesignEntranceElement,
    TrackDesignTrackElement, TrackPlaceOperation,
};

fn station_loop() -> TrackDesign {
    let mut td = TrackDesign {
        name: "Bench Loop".into(),
        ..Default::default()
    };
    td.track_and_vehicle.ride_type = RideType::LOOPING_ROLLER_COASTER;
    td.track_elements = [
        TrackElemType::END_STATION,
        TrackElemType::LEFT_QUARTER_TURN_3_TILES,
        TrackElemType::LEFT_QUARTER_TURN_3_TILES,
        TrackElemType::FLAT,
        TrackElemType::LEFT_QUARTER_TURN_3_TILES,
        TrackElemType::LEFT_QUARTER_TURN_3_TILES,
    ]
    .into_iter()
    .map(TrackDesignTrackElement::new)
    .collect();
    td.entrance_elements.push(TrackDesignEntranceElement {
        location: TileCoordsXYZD::new(0, 1, 0, 3),
        is_exit: false,
    });
    td
}

fn owned_park() -> ParkState {
    let mut park = ParkState::with_map(TileMap::new(32, 32));
    park.map.set_all_owned(true);
    park
}

const ORIGIN: CoordsXYZD = CoordsXYZD {
    x: 256,
    y: 256,
    z: 112,
    direction: 1,
};

// ---------------------------------------------------------------------------
// Benchmark: virtual placement modes
// ---------------------------------------------------------------------------

fn bench_place_virtual(c: &mut Criterion) {
    let mut group = c.benchmark_group("track_design_place");
    let td = station_loop();

    group.bench_function("draw_outlines", |b| {
        let mut park = owned_park();
        let ride = park.rides.create(RideType::LOOPING_ROLLER_COASTER);
        b.iter(|| {
            let (state, _) = place_virtual(
                &mut park.ctx(),
                black_box(&td),
                TrackPlaceOperation::DrawOutlines,
                true,
                ride,
                ORIGIN,
            );
            black_box(state.preview_max)
        });
    });

    group.bench_function("place_fresh_park", |b| {
        b.iter_batched(
            owned_park,
            |mut park| black_box(place_track_design(&mut park.ctx(), &td, ORIGIN, ActionFlags::APPLY).cost),
            criterion::BatchSize::SmallInput,
        );
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// Benchmark: preview
// ---------------------------------------------------------------------------

fn bench_preview(c: &mut Criterion) {
    let mut group = c.benchmark_group("track_design_preview");
    group.sample_size(50);
    let objects = ObjectRepository::default();

    group.bench_function("station_loop", |b| {
        b.iter_batched(
            station_loop,
            |mut td| black_box(place_preview(&mut td, &objects).is_some()),
            criterion::BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, bench_place_virtual, bench_preview);
criterion_main!(benches);
