mod board;
mod game;

pub use board::*;
pub use game::*;

#[cfg(test)]
mod test {
    use serde_test::{Token, assert_tokens};

    use super::{
        Action, Board, COLS, Game, GameConfig, Piece, PieceKind, ROWS, RandomSeed, Row, SevenBag,
    };

    const SEED: RandomSeed = [7; 32];

    fn seeded_game() -> Game {
        Game::new(GameConfig::with_seed(SEED))
    }

    fn full_row() -> Row {
        [Some(PieceKind::O); COLS]
    }

    #[test]
    fn pieces_spawn_at_column_3_top_row() {
        for kind in PieceKind::ALL {
            let piece = Piece::new(kind);
            assert_eq!((piece.x, piece.y), (3, 0));
            assert_eq!(piece.grid, kind.shape());
        }
    }

    #[test]
    fn clear_full_rows_without_full_rows_is_a_no_op() {
        let mut board = Board::default();
        board.grid[19][0] = Some(PieceKind::L);
        board.grid[10][9] = Some(PieceKind::T);
        let before = board.clone();
        assert_eq!(board.clear_full_rows(), 0);
        assert_eq!(board, before);
    }

    #[test]
    fn clear_full_rows_compacts_and_pads_on_top() {
        let mut board = Board::default();
        board.grid[2] = full_row();
        board.grid[5] = full_row();
        board.grid[3][0] = Some(PieceKind::S);
        board.grid[19][4] = Some(PieceKind::J);

        assert_eq!(board.clear_full_rows(), 2);
        assert_eq!(board.grid[0], [None; COLS]);
        assert_eq!(board.grid[1], [None; COLS]);
        // row 3 sat below one cleared row, row 19 below both
        assert_eq!(board.grid[4][0], Some(PieceKind::S));
        assert_eq!(board.grid[19][4], Some(PieceKind::J));
        let filled = board
            .grid
            .iter()
            .flatten()
            .filter(|cell| cell.is_some())
            .count();
        assert_eq!(filled, 2);
    }

    #[test]
    fn merge_clips_rows_above_the_top_edge() {
        let mut board = Board::default();
        let mut piece = Piece::new(PieceKind::O);
        piece.y = -1;
        board.merge(&piece);
        assert_eq!(board.grid[0][3], Some(PieceKind::O));
        assert_eq!(board.grid[0][4], Some(PieceKind::O));
        let filled = board
            .grid
            .iter()
            .flatten()
            .filter(|cell| cell.is_some())
            .count();
        assert_eq!(filled, 2);
    }

    #[test]
    fn merge_and_clear_keep_board_dimensions() {
        let mut board = Board::default();
        let mut piece = Piece::new(PieceKind::I);
        while board.try_move(&mut piece, 0, 1) {}
        board.merge(&piece);
        board.grid[5] = full_row();
        board.clear_full_rows();
        assert_eq!(board.grid.len(), ROWS);
        for row in &board.grid {
            assert_eq!(row.len(), COLS);
        }
    }

    #[test]
    fn seven_draws_cover_every_kind_once() {
        let mut bag = SevenBag::new(Some(SEED));
        for _ in 0..4 {
            let mut drawn: Vec<PieceKind> = (0..7).map(|_| bag.next_kind()).collect();
            drawn.sort_by_key(|kind| *kind as u8);
            drawn.dedup();
            assert_eq!(drawn.len(), 7);
        }
    }

    #[test]
    fn no_kind_is_starved_across_refills() {
        let mut bag = SevenBag::new(Some([42; 32]));
        let draws: Vec<PieceKind> = (0..70).map(|_| bag.next_kind()).collect();
        for kind in PieceKind::ALL {
            let positions: Vec<usize> = draws
                .iter()
                .enumerate()
                .filter(|(_, drawn)| **drawn == kind)
                .map(|(i, _)| i)
                .collect();
            assert_eq!(positions.len(), 10);
            for pair in positions.windows(2) {
                assert!(pair[1] - pair[0] <= 13);
            }
        }
    }

    #[test]
    fn four_clockwise_rotations_restore_the_shape() {
        let board = Board::default();
        for kind in PieceKind::ALL {
            let mut piece = Piece::new(kind);
            // clear of the top edge so tall orientations fit
            piece.y = 8;
            let original = piece.grid.clone();
            for _ in 0..4 {
                assert!(board.rotate(&mut piece));
            }
            assert_eq!(piece.grid, original);
        }
    }

    #[test]
    fn blocked_rotation_leaves_the_piece_unchanged() {
        let board = Board::default();
        let mut piece = Piece::new(PieceKind::I);
        assert!(board.rotate(&mut piece));
        piece.x = 9;
        piece.y = 10;
        let grid = piece.grid.clone();
        // back to horizontal would span columns 9..13, off the right edge
        assert!(!board.rotate(&mut piece));
        assert_eq!(piece.grid, grid);
        assert_eq!((piece.x, piece.y), (9, 10));
    }

    #[test]
    fn opposite_moves_cancel() {
        let board = Board::default();
        let mut piece = Piece::new(PieceKind::T);
        assert!(board.try_move(&mut piece, 1, 0));
        assert!(board.try_move(&mut piece, -1, 0));
        assert_eq!((piece.x, piece.y), (3, 0));
    }

    #[test]
    fn moves_into_walls_are_reverted() {
        let board = Board::default();
        let mut piece = Piece::new(PieceKind::O);
        for _ in 0..3 {
            assert!(board.try_move(&mut piece, -1, 0));
        }
        assert!(!board.try_move(&mut piece, -1, 0));
        assert_eq!(piece.x, 0);
    }

    #[test]
    fn apply_dispatches_single_commands() {
        let mut game = seeded_game();
        game.apply(Action::Left);
        assert_eq!(game.piece.x, 2);
        game.apply(Action::Right);
        assert_eq!(game.piece.x, 3);
        game.apply(Action::SoftDrop);
        assert_eq!(game.piece.y, 1);
    }

    #[test]
    fn hard_dropped_i_piece_rests_on_the_floor_without_scoring() {
        let mut game = seeded_game();
        game.piece = Piece::new(PieceKind::I);
        for _ in 0..3 {
            assert!(game.move_left());
        }
        game.hard_drop();
        for col in 0..4 {
            assert_eq!(game.board.grid[ROWS - 1][col], Some(PieceKind::I));
        }
        assert!(game.board.grid[ROWS - 1][4..].iter().all(Option::is_none));
        assert_eq!(game.score, 0);
        assert_eq!(game.lines, 0);
        // a fresh piece is falling again
        assert_eq!((game.piece.x, game.piece.y), (3, 0));
    }

    #[test]
    fn locking_a_full_row_scores_and_levels() {
        let mut game = seeded_game();
        game.lines = 9;
        for col in 4..COLS {
            game.board.grid[ROWS - 1][col] = Some(PieceKind::O);
        }
        game.piece = Piece::new(PieceKind::I);
        for _ in 0..3 {
            game.move_left();
        }
        game.hard_drop();
        assert_eq!(game.score, 100);
        assert_eq!(game.lines, 10);
        assert_eq!(game.level, 2);
        assert_eq!(game.drop_interval(), 920.);
        assert!(game.board.grid[ROWS - 1].iter().all(Option::is_none));
    }

    #[test]
    fn drop_interval_shrinks_per_level_and_floors_at_120() {
        let mut game = seeded_game();
        assert_eq!(game.drop_interval(), 1000.);
        game.level = 2;
        assert_eq!(game.drop_interval(), 920.);
        game.level = 11;
        assert_eq!(game.drop_interval(), 200.);
        game.level = 12;
        assert_eq!(game.drop_interval(), 120.);
        game.level = 40;
        assert_eq!(game.drop_interval(), 120.);
    }

    #[test]
    fn hold_works_once_per_piece_lifetime() {
        let mut game = seeded_game();
        let first = game.piece.kind;
        game.hold();
        assert_eq!(game.hold, Some(first));
        let second = game.piece.kind;
        assert_eq!((game.piece.x, game.piece.y), (3, 0));

        // spent until the next lock
        game.hold();
        assert_eq!(game.hold, Some(first));
        assert_eq!(game.piece.kind, second);

        game.hard_drop();
        let third = game.piece.kind;
        game.hold();
        assert_eq!(game.hold, Some(third));
        assert_eq!(game.piece.kind, first);
        assert_eq!((game.piece.x, game.piece.y), (3, 0));
        assert_eq!(game.piece.grid, first.shape());
    }

    #[test]
    fn tick_drops_only_after_the_interval_elapses() {
        let mut game = seeded_game();
        game.tick(1000.);
        assert_eq!(game.piece.y, 0);
        game.tick(1001.);
        assert_eq!(game.piece.y, 1);
        // clock restarted at 1001
        game.tick(1500.);
        assert_eq!(game.piece.y, 1);
        game.tick(2002.);
        assert_eq!(game.piece.y, 2);
    }

    #[test]
    fn failed_gravity_step_locks_the_piece() {
        let mut game = seeded_game();
        game.piece = Piece::new(PieceKind::O);
        game.piece.y = 18;
        game.tick(1001.);
        assert_eq!(game.board.grid[19][3], Some(PieceKind::O));
        assert_eq!(game.board.grid[18][4], Some(PieceKind::O));
        assert_eq!((game.piece.x, game.piece.y), (3, 0));
    }

    #[test]
    fn overflowing_spawn_locks_without_ending_the_game() {
        let mut game = seeded_game();
        for row in 0..ROWS {
            game.board.grid[row][3] = Some(PieceKind::J);
        }
        game.piece = Piece::new(PieceKind::T);
        game.tick(1001.);
        // the trapped piece locked over the stack and play continues
        assert_eq!(game.board.grid[0][4], Some(PieceKind::T));
        assert_eq!((game.piece.x, game.piece.y), (3, 0));
    }

    #[test]
    fn board_serializes_as_a_flat_cell_tuple() {
        let mut board = Board::default();
        board.grid[0][1] = Some(PieceKind::I);
        board.grid[0][2] = Some(PieceKind::J);
        board.grid[0][3] = Some(PieceKind::Z);
        board.grid[0][4] = Some(PieceKind::O);

        let mut tokens = vec![Token::Tuple { len: 200 }, Token::None];
        for variant in ["I", "J", "Z", "O"] {
            tokens.push(Token::Some);
            tokens.push(Token::UnitVariant {
                name: "PieceKind",
                variant,
            });
        }
        for _ in 0..(200 - 5) {
            tokens.push(Token::None);
        }
        tokens.push(Token::TupleEnd);
        assert_tokens(&board, &tokens);
    }
}
