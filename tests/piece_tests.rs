//! Piece tests - shapes, rotation and kick tables

use blockfall::core::piece::{kick_table, spawn_grid, I_KICKS, JLSTZ_KICKS, O_KICKS};
use blockfall::core::Piece;
use blockfall::types::{CellTag, Coord, Orientation, PieceKind};

fn cells(piece: &Piece) -> Vec<(i32, i32)> {
    let mut cells: Vec<_> = piece.grid().occupied_cells().map(|(x, y, _)| (x, y)).collect();
    cells.sort();
    cells
}

#[test]
fn test_spawn_boxes() {
    let sizes: Vec<i32> = PieceKind::ALL
        .iter()
        .map(|&k| Piece::spawn(k).width())
        .collect();
    assert_eq!(sizes, vec![4, 2, 3, 3, 3, 3, 3]);
    for kind in PieceKind::ALL {
        let piece = Piece::spawn(kind);
        assert_eq!(piece.width(), piece.height());
    }
}

#[test]
fn test_spawn_cells_match_table() {
    assert_eq!(
        cells(&Piece::spawn(PieceKind::S)),
        vec![(0, 1), (1, 1), (1, 2), (2, 2)]
    );
    assert_eq!(
        cells(&Piece::spawn(PieceKind::J)),
        vec![(0, 1), (0, 2), (1, 1), (2, 1)]
    );
    assert_eq!(
        cells(&Piece::spawn(PieceKind::O)),
        vec![(0, 0), (0, 1), (1, 0), (1, 1)]
    );
}

#[test]
fn test_four_rotations_restore_shape() {
    for kind in PieceKind::ALL {
        let start = Piece::spawn(kind);

        let mut cw = start.clone();
        cw.rotate_cw().rotate_cw().rotate_cw().rotate_cw();
        assert_eq!(cw, start, "{:?} clockwise", kind);

        let mut ccw = start.clone();
        ccw.rotate_ccw().rotate_ccw().rotate_ccw().rotate_ccw();
        assert_eq!(ccw, start, "{:?} counter-clockwise", kind);
    }
}

#[test]
fn test_ccw_undoes_cw() {
    for kind in PieceKind::ALL {
        let start = Piece::spawn(kind);
        let mut piece = start.clone();
        piece.rotate_cw();
        assert_eq!(piece.orientation(), Orientation::Right);
        piece.rotate_ccw();
        assert_eq!(piece, start);
    }
}

#[test]
fn test_ccw_from_spawn_faces_left() {
    let mut piece = Piece::spawn(PieceKind::L);
    piece.rotate_ccw();
    assert_eq!(piece.orientation(), Orientation::Left);
    // L pointing left: top row hook on the left
    assert_eq!(cells(&piece), vec![(0, 2), (1, 0), (1, 1), (1, 2)]);
}

#[test]
fn test_rotating_a_clone_leaves_original() {
    let original = Piece::spawn(PieceKind::Z);
    let mut candidate = original.clone();
    candidate.rotate_cw();
    assert_eq!(original.orientation(), Orientation::Up);
    assert_ne!(cells(&original), cells(&candidate));
}

#[test]
fn test_ghost_retag_keeps_shape() {
    let mut ghost = Piece::spawn(PieceKind::T);
    ghost.set_all_tags(CellTag::Ghost);
    assert_eq!(cells(&ghost), cells(&Piece::spawn(PieceKind::T)));
    assert!(ghost.grid().cells().iter().all(|c| c.tag == CellTag::Ghost));
}

#[test]
fn test_kick_tables_by_kind() {
    assert!(std::ptr::eq(kick_table(PieceKind::I), &I_KICKS));
    assert!(std::ptr::eq(kick_table(PieceKind::O), &O_KICKS));
    for kind in [PieceKind::J, PieceKind::L, PieceKind::S, PieceKind::T, PieceKind::Z] {
        assert!(std::ptr::eq(kick_table(kind), &JLSTZ_KICKS));
    }
}

#[test]
fn test_right_to_up_reverses_up_to_right() {
    let piece = Piece::spawn(PieceKind::J);
    for i in 0..5 {
        let there = piece.kick_translation(Orientation::Up, Orientation::Right, i);
        let back = piece.kick_translation(Orientation::Right, Orientation::Up, i);
        assert_eq!(there + back, Coord::ZERO);
    }
}

#[test]
fn test_first_kick_is_plain_rotation() {
    for kind in PieceKind::ALL {
        let piece = Piece::spawn(kind);
        for from in Orientation::ALL {
            assert_eq!(
                piece.kick_translation(from, from.rotate_cw(), 0),
                Coord::ZERO,
                "{:?} from {:?}",
                kind,
                from
            );
        }
    }
}

#[test]
fn test_spawn_grid_matches_piece() {
    assert_eq!(
        &spawn_grid(PieceKind::I),
        Piece::spawn(PieceKind::I).grid()
    );
}
