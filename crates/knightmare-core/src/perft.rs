//! Perft (performance test) for move generation correctness verification.

use crate::position::Position;

/// Count the leaf nodes of the legal move tree at `depth`.
///
/// Depth 0 returns 1. Depth 1 bulk-counts the legal moves. Every move is
/// played with `apply_move` and taken back with `undo_last`, so the
/// position is unchanged on return.
pub fn perft(position: &mut Position, depth: usize) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = position.legal_move_list();
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0u64;
    for mv in &moves {
        if position.apply_move(mv.from, mv.to).is_ok() {
            nodes += perft(position, depth - 1);
            position.undo_last();
        }
    }
    nodes
}

/// Per-move breakdown of [`perft`], sorted by move text.
pub fn divide(position: &mut Position, depth: usize) -> Vec<(String, u64)> {
    let moves = position.legal_move_list();
    let mut results: Vec<(String, u64)> = Vec::with_capacity(moves.len());
    for mv in &moves {
        if position.apply_move(mv.from, mv.to).is_err() {
            continue;
        }
        let count = if depth <= 1 { 1 } else { perft(position, depth - 1) };
        position.undo_last();
        results.push((mv.to_string(), count));
    }
    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}
