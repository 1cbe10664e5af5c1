//! Session scenario tests

use std::fs;
use std::io;

use block_blast::core::shapes::find;
use block_blast::core::{
    anchors, Board, JsonFileStore, MemoryStore, Offer, OfferGenerator, Phase, PlaceError,
    ScoreStore, Session, SessionTiming, SimpleRng, StoreError,
};
use block_blast::types::{Color, Point, PopupKind, CLEAR_DELAY_MS, COMBO_POPUP_DELAY_MS, GRID_SIZE};

fn session_with(timing: SessionTiming, store: Box<dyn ScoreStore>) -> Session {
    Session::with_parts(
        OfferGenerator::standard(),
        Box::new(SimpleRng::new(12345)),
        store,
        timing,
    )
}

fn immediate() -> Session {
    session_with(SessionTiming::immediate(), Box::new(MemoryStore::new()))
}

fn offer(ids: [Option<&str>; 3]) -> Offer {
    Offer::new(ids.map(|id| id.and_then(find)))
}

/// Rows 0 and 1 filled except column 0.
fn two_almost_full_rows() -> Board {
    let mut board = Board::new();
    for c in 1..GRID_SIZE as i32 {
        board.set(0, c, Some(Color::Blue));
        board.set(1, c, Some(Color::Blue));
    }
    board
}

#[test]
fn new_session_starts_active_and_empty() {
    let session = Session::new(1);
    assert_eq!(session.phase(), Phase::Active);
    assert!(session.board().is_clear());
    assert_eq!(session.offer().remaining(), 3);
    assert_eq!(session.score(), 0);
    assert_eq!(session.combo(), 0);
    assert!(!session.busy());
}

#[test]
fn two_bars_clear_the_top_row() {
    let mut session = immediate();
    session.set_position(Board::new(), offer([Some("4x1"), Some("4x1"), Some("1x1")]));

    let first = session.try_place(0, Some(Point::new(0, 0))).unwrap();
    assert_eq!(first.score.total, 4);
    assert_eq!(first.lines(), 0);
    assert_eq!(session.score(), 4);

    let second = session.try_place(1, Some(Point::new(0, 4))).unwrap();
    // 4 blocks + 10 for the line, no combo, single line
    assert_eq!(second.score.total, 14);
    assert_eq!(second.rows.as_slice(), &[0]);
    assert!(second.cols.is_empty());
    assert_eq!(session.score(), 18);
    assert_eq!(session.combo(), 1);
    assert!(session.board().is_clear());
}

#[test]
fn clear_is_applied_after_the_delay() {
    let mut session = session_with(SessionTiming::default(), Box::new(MemoryStore::new()));
    session.set_position(Board::new(), offer([Some("4x1"), Some("4x1"), Some("1x1")]));

    assert!(session.attempt_placement(0, Some(Point::new(0, 0))));
    assert!(session.attempt_placement(1, Some(Point::new(0, 4))));

    // Committed but not yet cleared.
    assert!(session.busy());
    assert!(session.board().is_row_full(0));
    assert_eq!(session.clearing().rows.as_slice(), &[0]);
    assert_eq!(session.score(), 4);
    assert_eq!(
        session.try_place(2, Some(Point::new(5, 5))),
        Err(PlaceError::Busy)
    );

    session.tick(CLEAR_DELAY_MS);
    assert!(!session.busy());
    assert!(session.board().is_clear());
    assert!(session.clearing().is_empty());
    assert_eq!(session.score(), 18);
    assert!(session.popups().iter().any(|p| p.kind == PopupKind::Clear && p.text == "CLEAR"));
}

#[test]
fn row_and_column_in_one_move() {
    let mut session = immediate();
    let mut board = Board::new();
    for i in 1..GRID_SIZE as i32 {
        board.set(0, i, Some(Color::Red));
        board.set(i, 0, Some(Color::Red));
    }
    board.set(3, 3, Some(Color::Green));
    session.set_position(board, offer([Some("1x1"), Some("2x2"), None]));

    let placement = session.try_place(0, Some(Point::new(0, 0))).unwrap();
    assert_eq!(placement.lines(), 2);
    // 1 block + 20 for the lines + 40 multi-line bonus
    assert_eq!(placement.score.total, 61);
    assert_eq!(session.score(), 61);
    assert_eq!(session.board().filled_count(), 1);
    assert!(session.board().is_occupied(3, 3));
    assert!(session
        .popups()
        .iter()
        .any(|p| p.text == "+61" && p.kind == PopupKind::Combo));
    assert!(session.popups().iter().any(|p| p.text == "DOUBLE"));
}

#[test]
fn combo_grows_then_resets() {
    let mut session = immediate();
    session.set_position(two_almost_full_rows(), offer([Some("1x1"), Some("1x1"), Some("1x1")]));

    let a = session.try_place(0, Some(Point::new(0, 0))).unwrap();
    assert_eq!(a.score.total, 11);
    assert_eq!(session.combo(), 1);

    let b = session.try_place(1, Some(Point::new(1, 0))).unwrap();
    // 1 + 10 + 15 * 1 * 1
    assert_eq!(b.score.total, 26);
    assert_eq!(b.score.combo_bonus, 15);
    assert_eq!(session.combo(), 2);
    assert!(session.popups().iter().any(|p| p.text == "2x COMBO!"));

    let c = session.try_place(2, Some(Point::new(5, 5))).unwrap();
    assert_eq!(c.score.total, 1);
    assert_eq!(session.combo(), 0);
    assert_eq!(session.score(), 38);
    assert_eq!(session.high_score(), 38);
}

#[test]
fn combo_popup_follows_the_score_popup() {
    let mut session = session_with(SessionTiming::default(), Box::new(MemoryStore::new()));
    session.set_position(two_almost_full_rows(), offer([Some("1x1"), Some("1x1"), Some("1x1")]));

    assert!(session.attempt_placement(0, Some(Point::new(0, 0))));
    session.tick(CLEAR_DELAY_MS);
    assert!(session.attempt_placement(1, Some(Point::new(1, 0))));

    let has_combo = |s: &Session| s.popups().iter().any(|p| p.text == "2x COMBO!");
    assert!(session.popups().iter().any(|p| p.text == "+26"));
    assert!(!has_combo(&session));

    session.tick(COMBO_POPUP_DELAY_MS - 1);
    assert!(!has_combo(&session));
    session.tick(1);
    assert!(has_combo(&session));
}

#[test]
fn last_slot_triggers_one_refill() {
    let mut session = immediate();
    session.set_position(Board::new(), offer([None, None, Some("2x2")]));
    let batches = session.offer_batches();

    assert!(session.attempt_placement(2, Some(Point::new(0, 0))));
    assert_eq!(session.offer_batches(), batches + 1);
    assert_eq!(session.offer().remaining(), 3);
    assert_eq!(session.phase(), Phase::Active);
}

#[test]
fn refill_waits_for_its_delay() {
    let timing = SessionTiming::default();
    let mut session = session_with(timing, Box::new(MemoryStore::new()));
    session.set_position(Board::new(), offer([None, Some("1x1"), None]));

    assert!(session.attempt_placement(1, Some(Point::new(7, 7))));
    assert!(session.busy());
    assert!(session.offer().is_exhausted());
    // Exhausted tray is not game over.
    assert!(!session.game_over());

    session.tick(timing.refill_delay_ms - 1);
    assert!(session.offer().is_exhausted());
    session.tick(1);
    assert!(!session.busy());
    assert_eq!(session.offer().remaining(), 3);
}

#[test]
fn full_board_is_game_over() {
    let mut session = immediate();
    let full = Board::from_rows(&["########"; 8], Color::Red).unwrap();
    session.set_position(full, offer([Some("1x1"), None, None]));

    assert!(session.game_over());
    let before = session.snapshot();
    assert_eq!(
        session.try_place(0, Some(Point::new(0, 0))),
        Err(PlaceError::GameOver)
    );
    assert_eq!(session.snapshot(), before);

    session.reset();
    assert_eq!(session.phase(), Phase::Active);
    assert!(session.board().is_clear());
    assert_eq!(session.score(), 0);
}

#[test]
fn last_single_spent_on_a_dead_board_ends_the_game() {
    let mut session = immediate();
    // One hole per row and column, plus one more in row 0; no two holes touch.
    let mut board = Board::from_rows(&["########"; 8], Color::Red).unwrap();
    for r in 0..GRID_SIZE as i32 {
        board.set(r, (3 * r) % GRID_SIZE as i32, None);
    }
    board.set(0, 4, None);
    session.set_position(board, offer([Some("1x1"), Some("2x2"), Some("3x3")]));
    assert!(!session.game_over());

    let placement = session.try_place(0, Some(Point::new(0, 4))).unwrap();
    assert_eq!(placement.lines(), 0);
    assert!(session.game_over());
    assert_eq!(session.score(), 1);
}

#[test]
fn rejected_attempts_change_nothing() {
    let mut session = immediate();
    let mut board = Board::new();
    board.set(4, 4, Some(Color::Red));
    session.set_position(board, offer([Some("2x2"), None, Some("1x1")]));
    let before = session.snapshot();

    let cases = [
        (9, Some(Point::new(0, 0)), PlaceError::SlotOutOfRange, "invalid_slot"),
        (1, Some(Point::new(0, 0)), PlaceError::SlotEmpty, "invalid_slot"),
        (0, None, PlaceError::NoTarget, "invalid_place"),
        (0, Some(Point::new(3, 3)), PlaceError::DoesNotFit, "invalid_place"),
        (0, Some(Point::new(7, 0)), PlaceError::DoesNotFit, "invalid_place"),
        (2, Some(Point::new(-1, 2)), PlaceError::DoesNotFit, "invalid_place"),
    ];
    for (slot, at, err, code) in cases {
        assert_eq!(session.try_place(slot, at), Err(err));
        assert_eq!(err.code(), code);
        assert!(!session.attempt_placement(slot, at));
        assert_eq!(session.snapshot(), before);
    }
}

#[test]
fn greedy_play_keeps_score_and_combo_laws() {
    for seed in [1, 2, 3, 17, 99] {
        let mut session = Session::with_parts(
            OfferGenerator::standard(),
            Box::new(SimpleRng::new(seed)),
            Box::new(MemoryStore::new()),
            SessionTiming::immediate(),
        );

        for _ in 0..300 {
            if session.game_over() {
                break;
            }
            let offer = *session.offer();
            let Some((slot, at)) = (0..3).find_map(|slot| {
                offer
                    .get(slot)
                    .and_then(|shape| anchors(session.board(), shape).next())
                    .map(|at| (slot, at))
            }) else {
                panic!("seed {seed}: active session without a legal move");
            };

            let score_before = session.score();
            let combo_before = session.combo();
            let placement = session.try_place(slot, Some(at)).unwrap();

            assert!(session.score() >= score_before);
            assert_eq!(session.score(), score_before + placement.score.total);
            if placement.lines() == 0 {
                assert_eq!(session.combo(), 0);
            } else {
                assert_eq!(session.combo(), combo_before + 1);
            }
            assert!(session.high_score() >= session.score());
        }
    }
}

#[test]
fn high_score_survives_reset_and_is_persisted() {
    let mut session = session_with(SessionTiming::immediate(), Box::new(MemoryStore::with_value(3)));
    assert_eq!(session.high_score(), 3);

    session.set_position(Board::new(), offer([Some("2x2"), Some("1x1"), None]));
    assert!(session.attempt_placement(0, Some(Point::new(0, 0))));
    assert_eq!(session.high_score(), 4);
    assert_eq!(session.store().load().unwrap(), Some(4));

    session.reset();
    assert_eq!(session.score(), 0);
    assert_eq!(session.high_score(), 4);
}

#[test]
fn json_store_is_read_at_start_and_written_on_increase() {
    let path = std::env::temp_dir().join(format!("block-blast-session-{}.json", std::process::id()));
    fs::write(&path, r#"{"blockBlastHighScore": 2, "volume": 0.5}"#).unwrap();

    let mut session = session_with(SessionTiming::immediate(), Box::new(JsonFileStore::new(path.clone())));
    assert_eq!(session.high_score(), 2);

    session.set_position(Board::new(), offer([Some("3x3"), Some("1x1"), None]));
    assert!(session.attempt_placement(0, Some(Point::new(2, 2))));

    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["blockBlastHighScore"], 9);
    assert_eq!(raw["volume"], 0.5);

    let _ = fs::remove_file(&path);
}

struct BrokenStore;

impl ScoreStore for BrokenStore {
    fn load(&self) -> Result<Option<u32>, StoreError> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "locked").into())
    }

    fn save(&mut self, _high_score: u32) -> Result<(), StoreError> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "locked").into())
    }
}

#[test]
fn storage_failures_are_not_fatal() {
    let mut session = session_with(SessionTiming::immediate(), Box::new(BrokenStore));
    assert_eq!(session.high_score(), 0);

    session.set_position(Board::new(), offer([Some("2x2"), Some("1x1"), None]));
    assert!(session.attempt_placement(0, Some(Point::new(0, 0))));
    assert_eq!(session.score(), 4);
    assert_eq!(session.high_score(), 4);
}

#[test]
fn reset_mid_clear_drops_the_clear() {
    let mut session = session_with(SessionTiming::default(), Box::new(MemoryStore::new()));
    session.set_position(two_almost_full_rows(), offer([Some("1x1"), Some("1x1"), Some("1x1")]));
    assert!(session.attempt_placement(0, Some(Point::new(0, 0))));
    assert!(session.busy());

    let episode = session.episode_id();
    session.reset();
    assert_eq!(session.episode_id(), episode + 1);
    assert!(!session.busy());
    assert!(!session.tick(CLEAR_DELAY_MS));
    assert!(session.board().is_clear());
    assert_eq!(session.score(), 0);
    assert!(session.popups().is_empty());
}

#[test]
fn reset_mid_clear_still_records_the_high_score() {
    let mut session = session_with(SessionTiming::default(), Box::new(MemoryStore::new()));
    let mut board = Board::new();
    for c in 1..GRID_SIZE as i32 {
        board.set(0, c, Some(Color::Blue));
    }
    session.set_position(board, offer([Some("1x1"), Some("1x1"), None]));

    // 1 block + 10 for the row
    assert!(session.attempt_placement(0, Some(Point::new(0, 0))));
    assert!(session.busy());
    assert_eq!(session.score(), 0);

    session.reset();
    assert_eq!(session.score(), 0);
    assert_eq!(session.high_score(), 11);
    assert_eq!(session.store().load().unwrap(), Some(11));
}

#[test]
fn flush_runs_clear_and_refill() {
    let mut session = session_with(SessionTiming::default(), Box::new(MemoryStore::new()));
    session.set_position(two_almost_full_rows(), offer([Some("1x1"), None, None]));
    assert!(session.attempt_placement(0, Some(Point::new(0, 0))));
    assert!(session.busy());

    assert!(session.flush_pending());
    assert!(!session.busy());
    assert_eq!(session.score(), 11);
    assert_eq!(session.offer().remaining(), 3);
    assert!(!session.flush_pending());
}

#[test]
fn snapshot_mirrors_session() {
    let mut session = session_with(SessionTiming::default(), Box::new(MemoryStore::with_value(50)));
    session.set_position(two_almost_full_rows(), offer([Some("1x1"), Some("1x1"), None]));
    assert!(session.attempt_placement(0, Some(Point::new(0, 0))));

    let snap = session.snapshot();
    assert_eq!(snap.board, *session.board());
    assert_eq!(snap.offer, *session.offer());
    assert_eq!(snap.high_score, 50);
    assert!(snap.busy);
    assert!(!snap.playable());
    assert!(snap.clearing.contains(0, 3));
    assert!(!snap.clearing.contains(1, 3));
    assert_eq!(snap.popups.len(), 1);
    assert_eq!(snap.popups[0].text, "+11");
    assert_eq!(snap.popups[0].at, Point::new(0, 0));

    let mut reused = snap.clone();
    session.tick(CLEAR_DELAY_MS);
    session.snapshot_into(&mut reused);
    assert_eq!(reused, session.snapshot());
    assert!(reused.clearing.is_empty());
}
