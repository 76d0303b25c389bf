//! Precomputed segments between aligned squares.

use crate::bitboard::Bitboard;
use crate::square::Square;

const fn step_toward(from: i8, to: i8) -> i8 {
    if to > from {
        1
    } else if to < from {
        -1
    } else {
        0
    }
}

const fn compute_between() -> [[Bitboard; 64]; 64] {
    let mut table = [[Bitboard::EMPTY; 64]; 64];
    let mut a = 0usize;
    while a < 64 {
        let mut b = 0usize;
        while b < 64 {
            let (fa, ra) = ((a % 8) as i8, (a / 8) as i8);
            let (fb, rb) = ((b % 8) as i8, (b / 8) as i8);
            let (df, dr) = (fb - fa, rb - ra);
            let diagonal = df == dr || df == -dr;
            if a != b && (df == 0 || dr == 0 || diagonal) {
                let (sf, sr) = (step_toward(fa, fb), step_toward(ra, rb));
                let mut bits = 0u64;
                let mut f = fa + sf;
                let mut r = ra + sr;
                while f != fb || r != rb {
                    bits |= 1u64 << (r as usize * 8 + f as usize);
                    f += sf;
                    r += sr;
                }
                table[a][b] = Bitboard::new(bits);
            }
            b += 1;
        }
        a += 1;
    }
    table
}

static BETWEEN: [[Bitboard; 64]; 64] = compute_between();

/// Squares strictly between `a` and `b` when they share a rank, file or
/// diagonal; empty otherwise (including for adjacent squares).
#[inline]
pub fn between(a: Square, b: Square) -> Bitboard {
    BETWEEN[a.index()][b.index()]
}

/// `true` when `a` and `b` share a rank, file or diagonal.
pub fn aligned(a: Square, b: Square) -> bool {
    if a == b {
        return false;
    }
    let df = a.file().abs_diff(b.file());
    let dr = a.rank().abs_diff(b.rank());
    df == 0 || dr == 0 || df == dr
}

#[cfg(test)]
mod tests {
    use super::{aligned, between};
    use crate::square::Square;

    #[test]
    fn file_segment() {
        let seg = between(Square::E1, Square::E8);
        assert_eq!(seg.count(), 6);
        assert!(seg.contains(Square::E2));
        assert!(seg.contains(Square::E7));
        assert!(!seg.contains(Square::E1));
        assert!(!seg.contains(Square::E8));
        assert_eq!(seg, between(Square::E8, Square::E1));
    }

    #[test]
    fn diagonal_segment() {
        let seg = between(Square::A1, Square::D4);
        assert_eq!(seg.count(), 2);
        assert!(seg.contains(Square::B2));
        assert!(seg.contains(Square::C3));
    }

    #[test]
    fn unaligned_and_adjacent_are_empty() {
        assert!(between(Square::A1, Square::B3).is_empty());
        assert!(between(Square::E4, Square::E5).is_empty());
        assert!(between(Square::H1, Square::A2).is_empty());
        assert!(!aligned(Square::A1, Square::B3));
        assert!(aligned(Square::H1, Square::A8));
    }
}
