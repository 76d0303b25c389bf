//! Minimax search with alpha-beta pruning.
//!
//! The search plays moves on the caller's [`Position`] and takes them back
//! through a [`MoveGuard`], so the position is identical before and after
//! every call, including early exits through `?` and budget aborts.

use std::ops::{Deref, DerefMut};
use std::time::{Duration, Instant};

use tracing::debug;

use knightmare_core::{GameStatus, Move, MoveOutcome, Position, PositionError, Side};

use crate::eval::{Evaluator, MaterialEvaluator};

/// Score representing an unreachable upper/lower bound.
pub const INF: i32 = 100_000;

/// Base bonus for delivering checkmate, reduced by the ply it happens at.
pub const MATE_SCORE: i32 = 50_000;

/// Scores above this magnitude indicate a forced mate.
pub const MATE_THRESHOLD: i32 = 30_000;

/// Evaluator output is clamped to this magnitude so a mate bonus always
/// dominates an ordinary score.
pub const EVAL_LIMIT: i32 = 10_000;

/// Plies searched when no depth is configured.
pub const DEFAULT_DEPTH: u8 = 4;

/// Which of several equally scored root moves is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieBreak {
    /// The first move reaching the best score (replace on `>`).
    #[default]
    First,
    /// The last move reaching the best score (replace on `>=`). With
    /// pruning enabled a cut-off sibling may tie on a bound rather than
    /// its real value, so this can pick a move that is actually worse.
    Latest,
}

/// Fixed search parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Plies to search. Must be at least 1.
    pub depth: u8,
    pub tie_break: TieBreak,
    /// Alpha-beta cut-offs. Disabling gives plain minimax.
    pub pruning: bool,
}

impl Default for SearchConfig {
    fn default() -> SearchConfig {
        SearchConfig {
            depth: DEFAULT_DEPTH,
            tie_break: TieBreak::First,
            pruning: true,
        }
    }
}

/// Optional budgets. Once one is exhausted the search stops at the next
/// move boundary and falls back to the best fully searched root move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchLimits {
    pub max_nodes: Option<u64>,
    pub max_time: Option<Duration>,
}

/// Result of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    /// `None` when the side has no legal move.
    pub best_move: Option<Move>,
    /// Score of `best_move` in centipawns for the searching side.
    pub score: i32,
    /// Moves played during the search.
    pub nodes: u64,
    /// Depth searched.
    pub depth: u8,
    /// A budget ran out before every root move was searched.
    pub aborted: bool,
}

/// Errors from [`SearchEngine::search`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("search depth must be at least 1")]
    ZeroDepth,
    /// A generated move was refused by the position. Indicates corrupted
    /// state rather than bad input.
    #[error("position rejected a generated move: {0}")]
    Position(#[from] PositionError),
}

/// A move applied to a position for as long as the guard lives.
///
/// Dropping the guard undoes the move.
pub struct MoveGuard<'a> {
    position: &'a mut Position,
    outcome: MoveOutcome,
}

impl<'a> MoveGuard<'a> {
    pub fn apply(position: &'a mut Position, mv: Move) -> Result<MoveGuard<'a>, PositionError> {
        let outcome = position.apply_move(mv.from, mv.to)?;
        Ok(MoveGuard { position, outcome })
    }

    #[inline]
    pub fn outcome(&self) -> MoveOutcome {
        self.outcome
    }
}

impl Deref for MoveGuard<'_> {
    type Target = Position;

    fn deref(&self) -> &Position {
        self.position
    }
}

impl DerefMut for MoveGuard<'_> {
    fn deref_mut(&mut self) -> &mut Position {
        self.position
    }
}

impl Drop for MoveGuard<'_> {
    fn drop(&mut self) {
        self.position.undo_last();
    }
}

/// Per-search mutable state.
struct SearchContext {
    root: Side,
    depth: u8,
    nodes: u64,
    started: Instant,
    limits: SearchLimits,
    aborted: bool,
    best_move: Option<Move>,
    best_score: i32,
}

impl SearchContext {
    fn budget_exhausted(&mut self) -> bool {
        if self.aborted {
            return true;
        }
        if let Some(max) = self.limits.max_nodes
            && self.nodes >= max
        {
            self.aborted = true;
        }
        // The clock is only read every 256 nodes.
        if let Some(max) = self.limits.max_time
            && self.nodes & 255 == 0
            && self.started.elapsed() >= max
        {
            self.aborted = true;
        }
        self.aborted
    }
}

/// Depth-bounded minimax over a [`Position`], scoring leaves with `E`.
#[derive(Debug, Clone)]
pub struct SearchEngine<E = MaterialEvaluator> {
    evaluator: E,
    config: SearchConfig,
    limits: SearchLimits,
}

impl SearchEngine<MaterialEvaluator> {
    /// Engine with the default [`MaterialEvaluator`].
    pub fn new(config: SearchConfig) -> SearchEngine<MaterialEvaluator> {
        SearchEngine::with_evaluator(MaterialEvaluator, config)
    }
}

impl Default for SearchEngine<MaterialEvaluator> {
    fn default() -> Self {
        SearchEngine::new(SearchConfig::default())
    }
}

impl<E: Evaluator> SearchEngine<E> {
    pub fn with_evaluator(evaluator: E, config: SearchConfig) -> SearchEngine<E> {
        SearchEngine {
            evaluator,
            config,
            limits: SearchLimits::default(),
        }
    }

    /// Builder-style budget override.
    pub fn with_limits(mut self, limits: SearchLimits) -> SearchEngine<E> {
        self.limits = limits;
        self
    }

    #[inline]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    #[inline]
    pub fn limits(&self) -> &SearchLimits {
        &self.limits
    }

    #[inline]
    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// The move `side` should play, `None` if it has none.
    pub fn get_next_move(&self, position: &mut Position, side: Side) -> Result<Option<Move>, SearchError> {
        Ok(self.search(position, side)?.best_move)
    }

    /// Search for `side` and report the chosen move with its score.
    ///
    /// `position` is left exactly as it was passed in.
    pub fn search(&self, position: &mut Position, side: Side) -> Result<SearchResult, SearchError> {
        if self.config.depth == 0 {
            return Err(SearchError::ZeroDepth);
        }

        let mut ctx = SearchContext {
            root: side,
            depth: self.config.depth,
            nodes: 0,
            started: Instant::now(),
            limits: self.limits,
            aborted: false,
            best_move: None,
            best_score: -INF,
        };

        let root_moves = position.legal_moves_for(side);
        if root_moves.is_empty() {
            let status = position.status_of(side);
            let score = self.terminal_score(position, side, side, status, 0);
            debug!(%side, %status, score, "no legal moves at root");
            return Ok(SearchResult {
                best_move: None,
                score,
                nodes: 0,
                depth: self.config.depth,
                aborted: false,
            });
        }

        let score = self.minimax(&mut ctx, position, side, 0, -INF, INF, true)?;

        let (best_move, score) = match ctx.best_move {
            Some(mv) => (Some(mv), if ctx.aborted { ctx.best_score } else { score }),
            None => (Some(root_moves[0]), ctx.best_score),
        };

        if ctx.aborted {
            debug!(
                nodes = ctx.nodes,
                elapsed_ms = ctx.started.elapsed().as_millis() as u64,
                "search budget exhausted, using best completed root move"
            );
        }
        debug!(
            %side,
            depth = self.config.depth,
            nodes = ctx.nodes,
            score,
            best = ?best_move,
            "search complete"
        );

        Ok(SearchResult {
            best_move,
            score,
            nodes: ctx.nodes,
            depth: self.config.depth,
            aborted: ctx.aborted,
        })
    }

    /// Score of the node reached after `side` has moved at ply `depth`.
    /// Returns the best (max) or worst (min) score over `side`'s moves.
    #[allow(clippy::too_many_arguments)]
    fn minimax(
        &self,
        ctx: &mut SearchContext,
        position: &mut Position,
        side: Side,
        depth: u8,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
    ) -> Result<i32, SearchError> {
        let moves = position.legal_moves_for(side);
        if moves.is_empty() {
            let status = position.status_of(side);
            return Ok(self.terminal_score(position, ctx.root, side, status, depth));
        }

        let mut best = if maximizing { -INF } else { INF };
        for &mv in &moves {
            if ctx.budget_exhausted() {
                break;
            }

            let score = {
                let mut guard = MoveGuard::apply(position, mv)?;
                ctx.nodes += 1;
                let status = guard.outcome().status;
                if status.is_terminal() {
                    self.terminal_score(&guard, ctx.root, side.opponent(), status, depth + 1)
                } else if depth + 1 >= ctx.depth {
                    self.leaf_score(&guard, ctx.root, status)
                } else {
                    self.minimax(ctx, &mut guard, side.opponent(), depth + 1, alpha, beta, !maximizing)?
                }
            };

            // A child cut short by the budget did not produce a real score.
            if ctx.aborted {
                break;
            }

            if maximizing {
                let improves = match (depth, self.config.tie_break) {
                    (0, TieBreak::Latest) => score >= best,
                    _ => score > best,
                };
                if improves {
                    best = score;
                    if depth == 0 {
                        ctx.best_move = Some(mv);
                        ctx.best_score = score;
                    }
                }
                alpha = alpha.max(best);
            } else {
                best = best.min(score);
                beta = beta.min(best);
            }

            if self.config.pruning && beta <= alpha {
                break;
            }
        }
        Ok(best)
    }

    fn leaf_score(&self, position: &Position, root: Side, status: GameStatus) -> i32 {
        self.evaluator
            .score(position, root, status)
            .clamp(-EVAL_LIMIT, EVAL_LIMIT)
    }

    /// Evaluator score for a finished game, plus a mate bonus that favours
    /// earlier mates. `to_move` is the side that has no way out.
    fn terminal_score(&self, position: &Position, root: Side, to_move: Side, status: GameStatus, ply: u8) -> i32 {
        let base = self.leaf_score(position, root, status);
        if status != GameStatus::Checkmate {
            return base;
        }
        let bonus = MATE_SCORE - i32::from(ply);
        if to_move == root { base - bonus } else { base + bonus }
    }
}
