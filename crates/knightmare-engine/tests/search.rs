//! Integration tests for the minimax search.
//!
//! Checks mate detection, exact restoration of the position and that
//! alpha-beta pruning never changes the chosen move or its score.

use std::cell::Cell;

use knightmare_core::{GameStatus, Move, Position, Side, Square};
use knightmare_engine::search::MATE_THRESHOLD;
use knightmare_engine::{
    Evaluator, MaterialEvaluator, SearchConfig, SearchEngine, SearchLimits, SearchResult, TieBreak,
};

const MIDDLEGAME_FEN: &str = "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w - - 4 4";

const SCHOLARS_MATE_FEN: &str = "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w - - 4 4";

const ENDGAME_FEN: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";

fn search(fen: &str, depth: u8, pruning: bool) -> SearchResult {
    let mut position: Position = fen.parse().unwrap();
    let side = position.side_to_move();
    let engine = SearchEngine::new(SearchConfig {
        depth,
        tie_break: TieBreak::First,
        pruning,
    });
    let result = engine.search(&mut position, side).unwrap();
    assert_eq!(position, fen.parse::<Position>().unwrap(), "search left the position modified");
    result
}

/// Counts how often the search consults it.
struct CountingEvaluator {
    calls: Cell<u64>,
}

impl Evaluator for CountingEvaluator {
    fn score(&self, position: &Position, perspective: Side, status: GameStatus) -> i32 {
        self.calls.set(self.calls.get() + 1);
        MaterialEvaluator.score(position, perspective, status)
    }
}

// ── Mate detection ────────────────────────────────────────────────────────────

#[test]
fn finds_scholars_mate() {
    let result = search(SCHOLARS_MATE_FEN, 2, true);
    assert_eq!(result.best_move, Some(Move::new(Square::H5, Square::F7)));
    assert!(result.score > MATE_THRESHOLD, "score {} should indicate mate", result.score);
}

#[test]
fn mated_side_has_no_move() {
    let result = search("7k/6Q1/5K2/8/8/8/8/8 b - - 0 1", 3, true);
    assert_eq!(result.best_move, None);
    assert!(result.score < -MATE_THRESHOLD);
}

#[test]
fn stalemated_side_scores_a_draw() {
    let result = search("k7/8/1Q6/8/8/8/8/2K5 b - - 0 1", 2, true);
    assert_eq!(result.best_move, None);
    assert_eq!(result.score, 0);
}

#[test]
fn avoids_walking_into_mate() {
    // Black to move must not allow Qg7# by leaving the queen on g5 unanswered.
    let result = search("6k1/5ppp/8/6Q1/8/8/8/K5R1 b - - 0 1", 2, true);
    assert!(result.score > -MATE_THRESHOLD, "black found no defence: {result:?}");
}

// ── Pruning equivalence ───────────────────────────────────────────────────────

#[test]
fn alpha_beta_matches_plain_minimax() {
    for fen in [MIDDLEGAME_FEN, SCHOLARS_MATE_FEN, ENDGAME_FEN] {
        for depth in 1..=3 {
            let pruned = search(fen, depth, true);
            let plain = search(fen, depth, false);
            assert_eq!(pruned.score, plain.score, "{fen} depth {depth}");
            assert_eq!(pruned.best_move, plain.best_move, "{fen} depth {depth}");
            assert!(pruned.nodes <= plain.nodes);
        }
    }
}

#[test]
fn pruning_skips_work() {
    let plain = search(MIDDLEGAME_FEN, 3, false);
    let pruned = search(MIDDLEGAME_FEN, 3, true);
    assert!(pruned.nodes < plain.nodes, "{} vs {}", pruned.nodes, plain.nodes);
}

#[test]
fn evaluator_is_called_at_the_horizon() {
    let evaluator = CountingEvaluator { calls: Cell::new(0) };
    let engine = SearchEngine::with_evaluator(
        &evaluator,
        SearchConfig {
            depth: 1,
            tie_break: TieBreak::First,
            pruning: false,
        },
    );
    let mut position = Position::new();
    let result = engine.search(&mut position, Side::White).unwrap();
    assert_eq!(result.nodes, 20);
    assert_eq!(evaluator.calls.get(), 20);
}

// ── Budgets and restoration ──────────────────────────────────────────────────

#[test]
fn search_for_side_not_to_move() {
    let mut position = Position::new();
    let engine = SearchEngine::new(SearchConfig {
        depth: 2,
        ..SearchConfig::default()
    });
    let mv = engine.get_next_move(&mut position, Side::Black).unwrap().unwrap();
    assert_eq!(position.piece_at(mv.from).map(|p| p.side), Some(Side::Black));
    assert_eq!(position, Position::new());
}

#[test]
fn time_budget_returns_a_legal_move() {
    let mut position: Position = MIDDLEGAME_FEN.parse().unwrap();
    let engine = SearchEngine::new(SearchConfig {
        depth: 6,
        ..SearchConfig::default()
    })
    .with_limits(SearchLimits {
        max_nodes: None,
        max_time: Some(std::time::Duration::from_millis(50)),
    });
    let result = engine.search(&mut position, Side::White).unwrap();
    let mv = result.best_move.unwrap();
    assert!(position.legal_move_list().contains(mv));
    assert_eq!(position, MIDDLEGAME_FEN.parse::<Position>().unwrap());
}
