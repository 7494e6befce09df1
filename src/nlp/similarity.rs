//! Text similarity used to group recurring tickets.
//!
//! The score blends a character-sequence ratio (Ratcliff/Obershelp,
//! `2·M / T` where `M` is the number of characters in matching blocks)
//! with the Jaccard index of the whitespace-separated word sets:
//!
//! ```text
//! score = 0.6 × sequence_ratio + 0.4 × jaccard
//! ```
//!
//! When either side has no words the score is the sequence ratio alone.

use std::collections::{HashMap, HashSet};

/// Sequences at least this long treat very frequent characters as
/// "popular": they can extend a match but never start one.
const AUTOJUNK_MIN_LEN: usize = 200;

const SEQUENCE_WEIGHT: f64 = 0.6;
const WORD_WEIGHT: f64 = 0.4;

/// A normalized text with its matching index built once, so it can be
/// compared against many others.
#[derive(Debug, Clone)]
pub struct PreparedText {
    chars: Vec<char>,
    /// Positions of each non-popular character.
    positions: HashMap<char, Vec<usize>>,
    words: HashSet<String>,
}

impl PreparedText {
    pub fn new(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();

        let mut positions: HashMap<char, Vec<usize>> = HashMap::new();
        for (i, &c) in chars.iter().enumerate() {
            positions.entry(c).or_default().push(i);
        }

        let n = chars.len();
        if n >= AUTOJUNK_MIN_LEN {
            let limit = n / 100 + 1;
            positions.retain(|_, idxs| idxs.len() <= limit);
        }

        let words = text.split_whitespace().map(str::to_string).collect();

        PreparedText {
            chars,
            positions,
            words,
        }
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Match {
    a: usize,
    b: usize,
    size: usize,
}

/// Longest common block of `a[alo..ahi]` and `b[blo..bhi]`, earliest in
/// `a` (then in `b`) on ties.
fn longest_match(
    a: &[char],
    b: &PreparedText,
    (alo, ahi): (usize, usize),
    (blo, bhi): (usize, usize),
) -> Match {
    let bc = &b.chars;
    let mut best = Match {
        a: alo,
        b: blo,
        size: 0,
    };

    // run length of the match ending at b[j], for the previous a index
    let mut prev: HashMap<usize, usize> = HashMap::new();
    for (i, ch) in a.iter().enumerate().take(ahi).skip(alo) {
        let mut current: HashMap<usize, usize> = HashMap::new();
        if let Some(js) = b.positions.get(ch) {
            for &j in js {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }
                let k = j
                    .checked_sub(1)
                    .and_then(|p| prev.get(&p))
                    .copied()
                    .unwrap_or(0)
                    + 1;
                current.insert(j, k);
                if k > best.size {
                    best = Match {
                        a: i + 1 - k,
                        b: j + 1 - k,
                        size: k,
                    };
                }
            }
        }
        prev = current;
    }

    // Popular characters never seed a block but may extend one.
    while best.a > alo && best.b > blo && a[best.a - 1] == bc[best.b - 1] {
        best.a -= 1;
        best.b -= 1;
        best.size += 1;
    }
    while best.a + best.size < ahi
        && best.b + best.size < bhi
        && a[best.a + best.size] == bc[best.b + best.size]
    {
        best.size += 1;
    }

    best
}

/// Total size of the matching blocks found by recursive longest-match
/// splitting.
fn matching_chars(a: &[char], b: &PreparedText) -> usize {
    let mut total = 0;
    let mut queue = vec![((0, a.len()), (0, b.chars.len()))];

    while let Some(((alo, ahi), (blo, bhi))) = queue.pop() {
        let m = longest_match(a, b, (alo, ahi), (blo, bhi));
        if m.size == 0 {
            continue;
        }
        total += m.size;
        if alo < m.a && blo < m.b {
            queue.push(((alo, m.a), (blo, m.b)));
        }
        if m.a + m.size < ahi && m.b + m.size < bhi {
            queue.push(((m.a + m.size, ahi), (m.b + m.size, bhi)));
        }
    }

    total
}

/// Ratcliff/Obershelp ratio in [0, 1]. Two empty texts are identical.
pub fn sequence_ratio(a: &PreparedText, b: &PreparedText) -> f64 {
    let length = a.len() + b.len();
    if length == 0 {
        return 1.0;
    }
    2.0 * matching_chars(&a.chars, b) as f64 / length as f64
}

/// |A ∩ B| / |A ∪ B| over word sets; 0 when both are empty.
pub fn jaccard(a: &PreparedText, b: &PreparedText) -> f64 {
    let union = a.words.union(&b.words).count();
    if union == 0 {
        return 0.0;
    }
    a.words.intersection(&b.words).count() as f64 / union as f64
}

/// Blended similarity of `a` (the reference text) against `b`.
pub fn similarity(a: &PreparedText, b: &PreparedText) -> f64 {
    let seq = sequence_ratio(a, b);
    if a.words.is_empty() || b.words.is_empty() {
        return seq;
    }
    seq * SEQUENCE_WEIGHT + jaccard(a, b) * WORD_WEIGHT
}

/// Convenience wrapper for one-off comparisons.
pub fn text_similarity(a: &str, b: &str) -> f64 {
    similarity(&PreparedText::new(a), &PreparedText::new(b))
}
