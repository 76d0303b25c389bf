//! Search and evaluation for knightmare.

pub mod eval;
pub mod search;

pub use eval::{Evaluator, MaterialEvaluator};
pub use search::{
    MoveGuard, SearchConfig, SearchEngine, SearchError, SearchLimits, SearchResult, TieBreak,
};
