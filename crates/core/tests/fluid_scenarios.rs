mod common;

use approx::assert_relative_eq;
use fountain_core::{Cell, FluidError, FluidGrid};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn assert_all_zero_except(grid: &FluidGrid, keep: &[(usize, usize)]) {
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            if keep.contains(&(x, y)) {
                continue;
            }
            assert_eq!(
                grid.cell(x, y).unwrap(),
                Cell::ZERO,
                "cell ({x}, {y}) should be untouched"
            );
        }
    }
}

/// Run random injections and steps, returning the final cells
fn random_run(seed: u64, width: usize, height: usize, ticks: usize) -> Vec<Cell> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut grid = FluidGrid::new(width, height).unwrap();
    for _ in 0..ticks {
        if rng.random_bool(0.3) {
            let x = rng.random_range(0..width);
            let y = rng.random_range(0..height);
            grid.set_pressure(x, y, rng.random_range(-50.0..50.0)).unwrap();
        }
        grid.step();
    }
    grid.cells().to_vec()
}

#[test]
fn test_single_injection_first_step() {
    let mut grid = FluidGrid::new(5, 5).unwrap();
    grid.inject_pressure(2, 2).unwrap();
    grid.step();

    // Axis neighbours: full weight, 0.25 * 500
    assert_eq!(grid.read_velocity(1, 2).unwrap().x, -125.0);
    assert_eq!(grid.read_velocity(3, 2).unwrap().x, 125.0);
    assert_eq!(grid.read_velocity(2, 1).unwrap().y, -125.0);
    assert_eq!(grid.read_velocity(2, 3).unwrap().y, 125.0);
    assert_eq!(grid.read_velocity(1, 2).unwrap().y, 0.0);
    assert_eq!(grid.read_velocity(2, 1).unwrap().x, 0.0);

    // Diagonals: half weight on both components, pointing away from the source
    let expected = [
        ((1, 1), (-62.5, -62.5)),
        ((3, 1), (62.5, -62.5)),
        ((1, 3), (-62.5, 62.5)),
        ((3, 3), (62.5, 62.5)),
    ];
    for ((x, y), (vx, vy)) in expected {
        let velocity = grid.read_velocity(x, y).unwrap();
        assert_relative_eq!(velocity.x, vx);
        assert_relative_eq!(velocity.y, vy);
    }

    // The source cell itself is rebuilt from zero velocities
    assert_eq!(grid.cell(2, 2).unwrap(), Cell::ZERO);
    // No pressure anywhere: every input velocity was zero
    assert!(grid.cells().iter().all(|c| c.pressure() == 0.0));

    // Border ring untouched
    for i in 0..5 {
        for (x, y) in [(i, 0), (i, 4), (0, i), (4, i)] {
            assert_eq!(grid.cell(x, y).unwrap(), Cell::ZERO);
        }
    }
}

#[test]
fn test_single_injection_second_step() {
    let mut grid = FluidGrid::new(5, 5).unwrap();
    grid.inject_pressure(2, 2).unwrap();
    grid.step();
    let after_first: Vec<_> = grid.cells().iter().map(Cell::velocity).collect();
    grid.step();

    // Outward flow on every side converges to negative pressure at the source
    assert_relative_eq!(grid.cell(2, 2).unwrap().pressure(), -187.5);

    // Pressures were all zero going in, so velocities carry over unchanged
    let after_second: Vec<_> = grid.cells().iter().map(Cell::velocity).collect();
    assert_eq!(after_first, after_second);
    assert_eq!(grid.generation(), 2);
}

#[test]
fn test_disturbance_spreads_one_ring_per_step() {
    let mut grid = FluidGrid::new(9, 9).unwrap();
    grid.inject_pressure(4, 4).unwrap();
    grid.step();

    let ring: Vec<(usize, usize)> = (3..=5)
        .flat_map(|y| (3..=5).map(move |x| (x, y)))
        .collect();
    assert_all_zero_except(&grid, &ring);
}

#[test]
fn test_zero_grid_is_fixed_point() {
    let mut grid = FluidGrid::new(12, 7).unwrap();
    for _ in 0..100 {
        grid.step();
    }
    assert_eq!(grid.generation(), 100);
    assert_all_zero_except(&grid, &[]);
}

#[test]
fn test_injection_is_local() {
    let mut grid = FluidGrid::new(8, 6).unwrap();
    grid.inject_pressure(1, 1).unwrap();
    for _ in 0..3 {
        grid.step();
    }
    let before = grid.cells().to_vec();

    grid.inject_pressure(5, 3).unwrap();

    let target = 3 * 8 + 5;
    for (idx, (old, new)) in before.iter().zip(grid.cells()).enumerate() {
        if idx == target {
            assert_eq!(new.pressure(), 500.0);
            assert_eq!(new.x_velocity(), old.x_velocity());
            assert_eq!(new.y_velocity(), old.y_velocity());
        } else {
            assert_eq!(new, old);
        }
    }
}

#[test]
fn test_border_velocity_never_changes() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut grid = FluidGrid::new(10, 8).unwrap();

    for _ in 0..50 {
        let x = rng.random_range(1..9);
        let y = rng.random_range(1..7);
        grid.inject_pressure(x, y).unwrap();
        grid.step();

        for y in 0..grid.height() {
            for x in 0..grid.width() {
                if grid.is_border(x, y) {
                    assert_eq!(grid.cell(x, y).unwrap(), Cell::ZERO);
                }
            }
        }
    }
}

#[test]
fn test_border_injection_persists() {
    let mut grid = FluidGrid::new(5, 5).unwrap();
    grid.inject_pressure(0, 2).unwrap();
    grid.step();

    // The stencil still reads it as a neighbour
    assert_eq!(grid.read_velocity(1, 2).unwrap().x, 125.0);

    for _ in 0..5 {
        let border = grid.cell(0, 2).unwrap();
        assert_eq!(border.pressure(), 500.0);
        assert_eq!(border.velocity().x, 0.0);
        assert_eq!(border.velocity().y, 0.0);
        grid.step();
    }
}

#[test]
fn test_step_is_deterministic() {
    let first = random_run(42, 16, 12, 40);
    let second = random_run(42, 16, 12, 40);

    let bits = |cells: &[Cell]| -> Vec<[u32; 3]> {
        cells
            .iter()
            .map(|c| {
                [
                    c.x_velocity().to_bits(),
                    c.y_velocity().to_bits(),
                    c.pressure().to_bits(),
                ]
            })
            .collect()
    };
    assert_eq!(bits(&first), bits(&second));
}

#[test]
fn test_values_are_not_clamped() {
    let mut grid = FluidGrid::new(5, 5).unwrap();
    grid.set_pressure(2, 2, 1.0e6).unwrap();
    grid.step();
    assert_relative_eq!(grid.read_velocity(1, 2).unwrap().x, -250_000.0);

    grid.set_pressure(2, 2, 1.0e6).unwrap();
    grid.step();
    // No clamping between ticks: the second burst stacks on the first
    assert!(grid.read_velocity(1, 2).unwrap().x < -250_000.0);
}

#[test]
fn test_invalid_grids_fail_before_stepping() {
    assert_eq!(
        FluidGrid::new(2, 5).unwrap_err(),
        FluidError::InvalidDimensions {
            width: 2,
            height: 5
        }
    );
    assert_eq!(
        FluidGrid::new(5, 2).unwrap_err(),
        FluidError::InvalidDimensions {
            width: 5,
            height: 2
        }
    );
}

#[test]
fn test_out_of_range_access() {
    let mut grid = FluidGrid::new(4, 4).unwrap();
    assert!(matches!(
        grid.inject_pressure(4, 1),
        Err(FluidError::OutOfBounds { x: 4, y: 1, .. })
    ));
    assert!(matches!(
        grid.read_velocity(0, 9),
        Err(FluidError::OutOfBounds { x: 0, y: 9, .. })
    ));
}
