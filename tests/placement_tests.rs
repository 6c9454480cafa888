mod support;

use battleship_view::{
    random_placement, Coord, GeometryViolation, LayoutDraft, Orientation, ShipId, ShipLayout,
    ShipPlacement,
};
use rand::{rngs::SmallRng, SeedableRng};

#[test]
fn layout_text_form_parses_and_prints() {
    let text = "5,9,v 8,2,h 8,5,h 1,2,h 6,7,h";
    let layout: ShipLayout = text.parse().unwrap();
    assert_eq!(layout, support::player1_layout());
    assert_eq!(layout.to_string(), text);

    let partial: ShipLayout = "- - 3,3,V - -".parse().unwrap();
    assert_eq!(partial.get(ShipId::S32), ShipPlacement::vertical(3, 3));
    assert_eq!(partial.first_unplaced(), Some(ShipId::S21));
    assert_eq!(partial.to_string(), "- - 3,3,v - -");
}

#[test]
fn layout_text_form_rejects_garbage() {
    assert!("1,1,h".parse::<ShipLayout>().is_err());
    assert!("1,1,x - - - -".parse::<ShipLayout>().is_err());
    assert!("1,a,h - - - -".parse::<ShipLayout>().is_err());
    assert!("1,1 - - - -".parse::<ShipLayout>().is_err());
}

#[test]
fn draft_refuses_illegal_moves_and_keeps_its_state() {
    let mut draft = LayoutDraft::new();
    draft
        .place(ShipId::S51, Coord::new(1, 1), Orientation::Horizontal)
        .unwrap();
    let before = *draft.layout();

    let err = draft
        .place(ShipId::S41, Coord::new(2, 2), Orientation::Horizontal)
        .unwrap_err();
    assert!(matches!(err, GeometryViolation::Adjacent { .. }));
    assert_eq!(*draft.layout(), before);

    let err = draft
        .place(ShipId::S41, Coord::new(8, 5), Orientation::Horizontal)
        .unwrap_err();
    assert!(matches!(err, GeometryViolation::OutOfBounds { .. }));
    assert_eq!(*draft.layout(), before);
}

#[test]
fn draft_rotate_and_remove() {
    let mut draft = LayoutDraft::new();
    assert_eq!(
        draft.rotate(ShipId::S21),
        Err(GeometryViolation::Unplaced(ShipId::S21))
    );
    draft
        .place(ShipId::S21, Coord::new(10, 1), Orientation::Vertical)
        .unwrap();
    // Horizontal from x = 10 leaves the board.
    assert!(draft.rotate(ShipId::S21).is_err());
    assert_eq!(draft.layout().get(ShipId::S21), ShipPlacement::vertical(10, 1));

    draft.remove(ShipId::S21);
    assert!(!draft.layout().get(ShipId::S21).is_placed());
}

#[test]
fn draft_finishes_only_when_complete() {
    let mut draft = LayoutDraft::new();
    for (id, placement) in support::player2_layout().placed() {
        assert!(draft.finish().is_err());
        draft.place(id, placement.anchor, placement.orientation).unwrap();
    }
    assert!(draft.is_complete());
    assert_eq!(draft.finish().unwrap(), support::player2_layout());
}

#[test]
fn random_placement_respects_existing_ships() {
    let mut rng = SmallRng::seed_from_u64(7);
    let base = support::player1_layout();
    let mut layout = base;
    layout.clear(ShipId::S41);
    for _ in 0..50 {
        if let Some(p) = random_placement(&layout, ShipId::S41, &mut rng) {
            assert!(battleship_view::validate_layout(&layout.with(ShipId::S41, p)));
        }
    }
}

#[test]
fn draft_resumes_from_a_legal_layout_only() {
    let mut draft = LayoutDraft::from_layout(support::player1_layout()).unwrap();
    assert!(draft.is_complete());
    draft.remove(ShipId::S21);
    assert!(!draft.is_complete());
    assert_eq!(draft.layout().first_unplaced(), Some(ShipId::S21));

    let touching: ShipLayout = "1,1,h 3,2,h 8,5,h 1,8,h 6,10,h".parse().unwrap();
    assert!(matches!(
        LayoutDraft::from_layout(touching),
        Err(GeometryViolation::Adjacent { .. })
    ));
}
