mod support;

use battleship_view::geometry::{
    buffer_cells, cell_mask, check_complete_layout, check_layout, expand_ship, occupied_cells, ship_cells,
    validate_adjacency, validate_bounds, validate_uniqueness,
};
use battleship_view::{
    random_layout, validate_layout, Coord, GeometryViolation, Orientation, ShipId, ShipLayout,
    ShipPlacement, TOTAL_SHIP_CELLS,
};
use proptest::prelude::*;
use rand::{rngs::SmallRng, SeedableRng};

fn chebyshev(a: Coord, b: Coord) -> u8 {
    a.x.abs_diff(b.x).max(a.y.abs_diff(b.y))
}

#[test]
fn expand_follows_orientation() {
    assert_eq!(
        expand_ship(Coord::new(5, 9), 2, Orientation::Vertical),
        vec![Coord::new(5, 9), Coord::new(5, 10)]
    );
    assert_eq!(
        expand_ship(Coord::new(8, 2), 3, Orientation::Horizontal),
        vec![Coord::new(8, 2), Coord::new(9, 2), Coord::new(10, 2)]
    );
}

#[test]
fn recorded_contract_layouts_are_accepted() {
    for layout in [support::player1_layout(), support::player2_layout()] {
        assert!(validate_layout(&layout), "{} rejected", layout);
        assert_eq!(check_complete_layout(&layout), Ok(()));
    }
}

#[test]
fn out_of_bounds_anchor_is_rejected() {
    let layout = support::player1_layout().with(ShipId::S21, ShipPlacement::horizontal(11, 7));
    assert!(!validate_layout(&layout));
    assert_eq!(
        check_layout(&layout),
        Err(GeometryViolation::OutOfBounds {
            ship: ShipId::S21,
            cell: Coord::new(11, 7)
        })
    );
}

#[test]
fn ship_leaving_the_board_is_rejected() {
    let layout = ShipLayout::unplaced().with(ShipId::S51, ShipPlacement::horizontal(7, 1));
    assert!(matches!(
        check_layout(&layout),
        Err(GeometryViolation::OutOfBounds { ship: ShipId::S51, .. })
    ));
}

#[test]
fn overlap_is_rejected() {
    let layout = ShipLayout::unplaced()
        .with(ShipId::S31, ShipPlacement::horizontal(1, 1))
        .with(ShipId::S32, ShipPlacement::vertical(2, 1));
    assert!(!validate_uniqueness(&occupied_cells(&layout)));
    let err = check_layout(&layout).unwrap_err();
    assert_eq!(err, GeometryViolation::Overlap { cell: Coord::new(2, 1) });
    assert!(err.to_string().starts_with("Ship cells must be unique"));
}

#[test]
fn diagonal_contact_is_rejected() {
    let layout = ShipLayout::unplaced()
        .with(ShipId::S21, ShipPlacement::horizontal(1, 1))
        .with(ShipId::S31, ShipPlacement::horizontal(3, 2));
    assert!(validate_uniqueness(&occupied_cells(&layout)));
    assert!(!validate_adjacency(&layout));
    assert_eq!(
        check_layout(&layout),
        Err(GeometryViolation::Adjacent {
            first: ShipId::S21,
            second: ShipId::S31
        })
    );
}

#[test]
fn one_cell_gap_is_accepted() {
    let layout = ShipLayout::unplaced()
        .with(ShipId::S21, ShipPlacement::horizontal(1, 1))
        .with(ShipId::S31, ShipPlacement::horizontal(4, 1));
    assert!(validate_layout(&layout));
}

#[test]
fn unplaced_ships_are_skipped_until_submission() {
    let partial = ShipLayout::unplaced().with(ShipId::S41, ShipPlacement::vertical(3, 3));
    assert!(validate_layout(&partial));
    assert_eq!(
        check_complete_layout(&partial),
        Err(GeometryViolation::Unplaced(ShipId::S21))
    );
}

#[test]
fn buffer_excludes_own_cells() {
    let cells = ship_cells(ShipId::S21, ShipPlacement::vertical(5, 5));
    let buffer = buffer_cells(&cells);
    assert_eq!(buffer.len(), 10);
    assert!(cells.iter().all(|c| !buffer.contains(c)));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn random_layouts_satisfy_placement_rules(seed in any::<u64>()) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let layout = random_layout(&mut rng).unwrap();
        prop_assert!(validate_layout(&layout));

        let cells = occupied_cells(&layout);
        prop_assert_eq!(cells.len(), TOTAL_SHIP_CELLS);
        prop_assert_eq!(cell_mask(&cells).len(), TOTAL_SHIP_CELLS);
        prop_assert!(validate_bounds(&cells));
        prop_assert!(validate_uniqueness(&cells));

        let ships: Vec<Vec<Coord>> = layout.placed().map(|(id, p)| ship_cells(id, p)).collect();
        for (i, a) in ships.iter().enumerate() {
            for b in ships.iter().skip(i + 1) {
                for ca in a {
                    for cb in b {
                        prop_assert!(chebyshev(*ca, *cb) > 1, "{} touches {}", ca, cb);
                    }
                }
            }
        }
    }

    #[test]
    fn validation_is_deterministic(
        anchors in proptest::collection::vec((0u8..=12, 0u8..=12, any::<bool>()), 5)
    ) {
        let mut layout = ShipLayout::unplaced();
        for (id, (x, y, v)) in ShipId::ALL.into_iter().zip(anchors) {
            let orientation = if v { Orientation::Vertical } else { Orientation::Horizontal };
            layout.set(id, ShipPlacement::new(Coord::new(x, y), orientation));
        }
        let first = check_layout(&layout);
        prop_assert_eq!(first, check_layout(&layout));
        prop_assert_eq!(first.is_ok(), validate_layout(&layout));
    }
}
