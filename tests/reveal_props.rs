mod support;

use battleship_view::{
    DisclosedShip, GamePhase, Identity, LastShotResult, PartialShipTracker, PlayerSlot, ShipId,
    ShipPlacement, ShotOutcome, Coord,
};
use proptest::prelude::*;

fn arb_phase() -> impl Strategy<Value = GamePhase> {
    prop_oneof![
        Just(GamePhase::WaitingP1),
        Just(GamePhase::WaitingP2),
        Just(GamePhase::P1Turn),
        Just(GamePhase::P2Turn),
        Just(GamePhase::P1Wins),
        Just(GamePhase::P2Wins),
    ]
}

fn arb_shot() -> impl Strategy<Value = LastShotResult> {
    (
        0usize..5,
        1u8..=10,
        1u8..=10,
        any::<bool>(),
        prop_oneof![
            Just(ShotOutcome::Miss),
            Just(ShotOutcome::Hit),
            Just(ShotOutcome::Sunk)
        ],
    )
        .prop_map(|(ship, x, y, vertical, outcome)| {
            let placement = if vertical {
                ShipPlacement::vertical(x, y)
            } else {
                ShipPlacement::horizontal(x, y)
            };
            LastShotResult {
                cell: Coord::new(x, y),
                fired_by: Identity::new("ff"),
                outcome,
                disclosed: (outcome == ShotOutcome::Sunk).then_some(DisclosedShip {
                    ship: ShipId::ALL[ship],
                    placement,
                }),
            }
        })
}

#[test]
fn sinking_reveals_the_board_the_turn_moved_away_from() {
    // Player 1 resolved player 2's shot on its own board, handing the
    // turn to player 2.
    let shot = support::sunk(
        Coord::new(5, 10),
        support::bob(),
        ShipId::S21,
        ShipPlacement::vertical(5, 9),
    );
    let tracker = PartialShipTracker::new().update(Some(&shot), GamePhase::P2Turn);
    let reveal = tracker.reveal(PlayerSlot::Player1);
    assert_eq!(reveal.get(ShipId::S21), Some(ShipPlacement::vertical(5, 9)));
    assert_eq!(reveal.occupied_cells(), vec![Coord::new(5, 9), Coord::new(5, 10)]);
    assert_eq!(tracker.reveal(PlayerSlot::Player2).count(), 0);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn reveal_only_grows(steps in proptest::collection::vec((arb_shot(), arb_phase()), 0..40)) {
        let mut tracker = PartialShipTracker::new();
        for (shot, phase) in steps {
            let next = tracker.update(Some(&shot), phase);
            for slot in PlayerSlot::BOTH {
                prop_assert!(tracker.reveal(slot).is_subset_of(next.reveal(slot)));
            }
            tracker = next;
        }
    }

    #[test]
    fn reapplying_a_shot_changes_nothing(
        steps in proptest::collection::vec((arb_shot(), arb_phase()), 1..20)
    ) {
        let mut tracker = PartialShipTracker::new();
        for (shot, phase) in steps {
            let once = tracker.update(Some(&shot), phase);
            let twice = once.update(Some(&shot), phase);
            prop_assert_eq!(once, twice);
            tracker = once;
        }
    }
}
