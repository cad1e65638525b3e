//! Concurrent callers must not interfere with one another

use spimkit_core::{AxisCoordinate, AxisRange, SimulatedStage, StagePositionProvider, TravelLimits};
use spimkit_tiling::{
    exceeds_travel_limits, stage_to_display, AxisRemapTable, FieldOfView, TileGeometryCalculator,
};
use std::thread;

#[test]
fn test_shared_calculator_across_threads() {
    let calc = TileGeometryCalculator::new(FieldOfView::new(664.0, 664.0).unwrap());

    let expected: Vec<u32> = (1..=16u32)
        .map(|i| {
            calc.compute_tile_counts(10.0, 10.0, 1.0, 500.0 * f64::from(i), 100.0, 1.0)
                .unwrap()
                .x_tile_count
        })
        .collect();

    let results: Vec<Vec<u32>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    (1..=16u32)
                        .map(|i| {
                            calc.compute_tile_counts(10.0, 10.0, 1.0, 500.0 * f64::from(i), 100.0, 1.0)
                                .unwrap()
                                .x_tile_count
                        })
                        .collect::<Vec<u32>>()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for result in results {
        assert_eq!(result, expected);
    }
}

#[test]
fn test_polling_stage_while_checking_limits() {
    let stage = SimulatedStage::default();
    let table = AxisRemapTable::dispim();
    let limits = TravelLimits::new(
        AxisRange::new(0.0, 60.0),
        AxisRange::new(0.0, 60.0),
        AxisRange::new(0.0, 60.0),
    );

    thread::scope(|scope| {
        scope.spawn(|| {
            for step in 0..100i64 {
                stage.move_absolute(AxisCoordinate::new(step * 1000, step * 2000, 0));
            }
        });
        scope.spawn(|| {
            for _ in 0..100 {
                let position = stage.sample_position().unwrap();
                let display = stage_to_display(&position, &table);
                // display Z is stage X
                assert!(display.z >= 0.0 && display.z <= 10.0);
            }
        });
        scope.spawn(|| {
            for _ in 0..100 {
                let v = exceeds_travel_limits(
                    &AxisCoordinate::new(59.0, 1.0, 1.0),
                    &AxisCoordinate::new(2.0, 1.0, 1.0),
                    &limits,
                );
                assert_eq!(v.len(), 1);
            }
        });
    });
}
