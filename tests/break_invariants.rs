//! Property-based invariant tests for the paragraph breaker.
//!
//! Verifies:
//! 1.  Determinism: same items + schedule + options produce identical breaks
//! 2.  Chain shape: lines number 1..=k and positions strictly increase
//! 3.  Predecessor linkage matches the emitted order
//! 4.  Every emitted break position is a legal breakpoint
//! 5.  Every line's adjustment ratio stays within [-1, tolerance]
//! 6.  Cumulative demerits equal an independent per-line recomputation
//! 7.  Fitness classes match an independent classification of the ratio
//! 8.  Optimal status means the chain ends at the last feasible breakpoint
//! 9.  Raising the tolerance never worsens the optimum (fixed paragraphs)
//! 10. The chosen chain matches an exhaustive search on small paragraphs

use parbreak::{paragraph_end, BreakStatus, Breakpoint, Item, ParBreak, Pt, INF};
use proptest::prelude::*;

// ── Fixture helpers ───────────────────────────────────────────────────

fn word_items(word_lengths: &[usize]) -> Vec<Item> {
    let mut items = Vec::new();
    for (index, &len) in word_lengths.iter().enumerate() {
        if index > 0 {
            items.push(Item::new_glue(2.0, 1.0, 1.0));
        }
        for _ in 0..len {
            items.push(Item::new_box(1.0));
        }
    }
    items.extend(paragraph_end());
    items
}

fn is_feasible(items: &[Item], i: usize) -> bool {
    if items[i].is_penalty() {
        items[i].penalty_value() < INF
    } else if items[i].is_glue() {
        i > 0 && items[i - 1].is_box()
    } else {
        false
    }
}

fn last_feasible(items: &[Item]) -> Option<usize> {
    (0..items.len()).rev().find(|&i| is_feasible(items, i))
}

// Exclusive running sums in milli-points, mirroring the published contract
// that entry i excludes item i.
fn milli_sums(items: &[Item]) -> (Vec<i64>, Vec<i64>, Vec<i64>) {
    let mut width = Vec::with_capacity(items.len());
    let mut stretch = Vec::with_capacity(items.len());
    let mut shrink = Vec::with_capacity(items.len());
    let (mut w, mut y, mut z) = (0i64, 0i64, 0i64);
    for item in items {
        width.push(w);
        stretch.push(y);
        shrink.push(z);
        w += item.width().to_milli_i64();
        y += item.stretch().to_milli_i64();
        z += item.shrink().to_milli_i64();
    }
    (width, stretch, shrink)
}

fn segment_ratio(
    items: &[Item],
    sums: &(Vec<i64>, Vec<i64>, Vec<i64>),
    a: usize,
    b: usize,
    target_milli: i64,
) -> f64 {
    let mut ideal = sums.0[b] - sums.0[a];
    if items[b].is_penalty() {
        ideal += items[b].width().to_milli_i64();
    }
    if ideal < target_milli {
        let stretch = sums.1[b] - sums.1[a];
        if stretch > 0 {
            (target_milli - ideal) as f64 / stretch as f64
        } else {
            INF
        }
    } else if ideal > target_milli {
        let shrink = sums.2[b] - sums.2[a];
        if shrink > 0 {
            (target_milli - ideal) as f64 / shrink as f64
        } else {
            INF
        }
    } else {
        0.0
    }
}

fn classify(ratio: f64) -> i32 {
    if ratio < -0.5 {
        0
    } else if ratio <= 0.5 {
        1
    } else if ratio <= 1.0 {
        2
    } else {
        3
    }
}

fn line_demerits(
    items: &[Item],
    ratio: f64,
    a: usize,
    b: usize,
    previous_class: i32,
) -> f64 {
    let penalty = items[b].penalty_value();
    let badness = 100.0 * ratio.abs().powi(3);
    let mut demerits = if penalty >= 0.0 {
        (1.0 + badness + penalty).powi(3)
    } else if penalty > -INF {
        (1.0 + badness).powi(2) - penalty * penalty
    } else {
        (1.0 + badness).powi(2)
    };
    if items[a].is_flagged() && items[b].is_flagged() {
        demerits += 100.0;
    }
    if (classify(ratio) - previous_class).abs() > 1 {
        demerits += 100.0;
    }
    demerits
}

fn target_milli_for(line_lengths: &[Pt], line_index: usize) -> i64 {
    let length = if line_index < line_lengths.len() {
        line_lengths[line_index]
    } else {
        line_lengths[line_lengths.len() - 1]
    };
    length.to_milli_i64()
}

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-6 * a.abs().max(b.abs()).max(1.0)
}

// Recompute cumulative demerits independently along an emitted chain.
fn recompute_chain(items: &[Item], breaks: &[Breakpoint], line_lengths: &[Pt]) -> Vec<f64> {
    let sums = milli_sums(items);
    let mut totals = Vec::with_capacity(breaks.len());
    let mut cumulative = 0.0;
    let mut previous_position = 0usize;
    let mut previous_class = 1;
    for (line_index, brk) in breaks.iter().enumerate() {
        let target = target_milli_for(line_lengths, line_index);
        let ratio = segment_ratio(items, &sums, previous_position, brk.position, target);
        cumulative += line_demerits(items, ratio, previous_position, brk.position, previous_class);
        totals.push(cumulative);
        previous_position = brk.position;
        previous_class = classify(ratio);
    }
    totals
}

// Exhaustive search over every admissible chain that reaches the last
// feasible breakpoint; returns the fewest total demerits found.
fn exhaustive_best(items: &[Item], line_lengths: &[Pt], tolerance: f64) -> Option<f64> {
    let terminal = last_feasible(items)?;
    let sums = milli_sums(items);
    let feasible: Vec<usize> = (0..items.len())
        .filter(|&i| is_feasible(items, i))
        .collect();

    fn descend(
        items: &[Item],
        sums: &(Vec<i64>, Vec<i64>, Vec<i64>),
        feasible: &[usize],
        line_lengths: &[Pt],
        tolerance: f64,
        terminal: usize,
        a: usize,
        line_index: usize,
        previous_class: i32,
        cumulative: f64,
        best: &mut Option<f64>,
    ) {
        for &b in feasible {
            if b <= a {
                continue;
            }
            let target = target_milli_for(line_lengths, line_index);
            let ratio = segment_ratio(items, sums, a, b, target);
            if !(-1.0 <= ratio && ratio <= tolerance) {
                continue;
            }
            let total =
                cumulative + line_demerits(items, ratio, a, b, previous_class);
            if b == terminal {
                if best.map(|d| total < d).unwrap_or(true) {
                    *best = Some(total);
                }
            } else {
                descend(
                    items,
                    sums,
                    feasible,
                    line_lengths,
                    tolerance,
                    terminal,
                    b,
                    line_index + 1,
                    classify(ratio),
                    total,
                    best,
                );
            }
        }
    }

    let mut best = None;
    descend(
        items,
        &sums,
        &feasible,
        line_lengths,
        tolerance,
        terminal,
        0,
        0,
        1,
        0.0,
        &mut best,
    );
    best
}

// ── Strategies ────────────────────────────────────────────────────────

fn arb_word_lengths() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(1usize..=4, 2..10)
}

fn arb_tolerance() -> impl Strategy<Value = f64> {
    prop_oneof![Just(1.0), Just(2.0), Just(5.0)]
}

// ── Properties ────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn emitted_chains_hold_their_invariants(
        word_lengths in arb_word_lengths(),
        target in 6i32..30,
        tolerance in arb_tolerance(),
    ) {
        let items = word_items(&word_lengths);
        let lengths = [Pt::from_i32(target)];
        let engine = ParBreak::builder().tolerance(tolerance).build().unwrap();

        let first = engine.break_paragraph(&items, &lengths);
        let second = engine.break_paragraph(&items, &lengths);
        let out = match (first, second) {
            (Ok(a), Ok(b)) => {
                prop_assert_eq!(&a, &b);
                a
            }
            (Err(a), Err(b)) => {
                prop_assert_eq!(a.to_string(), b.to_string());
                return Ok(());
            }
            _ => {
                prop_assert!(false, "nondeterministic outcome");
                unreachable!()
            }
        };

        prop_assert!(!out.is_empty());
        let mut previous_position = None;
        for (index, brk) in out.breaks.iter().enumerate() {
            prop_assert_eq!(brk.line as usize, index + 1);
            prop_assert!(brk.position < items.len());
            prop_assert!(is_feasible(&items, brk.position));
            prop_assert_eq!(brk.previous, previous_position);
            if let Some(previous) = previous_position {
                prop_assert!(brk.position > previous);
            }
            prop_assert!(brk.ratio >= -1.0 && brk.ratio <= tolerance);
            prop_assert_eq!(brk.fitness_class.rank(), classify(brk.ratio));
            previous_position = Some(brk.position);
        }

        let recomputed = recompute_chain(&items, &out.breaks, &lengths);
        for (brk, total) in out.breaks.iter().zip(&recomputed) {
            prop_assert!(
                approx_eq(brk.demerits, *total),
                "demerits {} != recomputed {}",
                brk.demerits,
                total
            );
        }

        if out.status == BreakStatus::Optimal {
            prop_assert_eq!(
                Some(out.breaks[out.breaks.len() - 1].position),
                last_feasible(&items)
            );
        }
    }
}

// ── Fixed paragraphs: optimality and tolerance monotonicity ──────────

fn total_demerits(engine: &ParBreak, items: &[Item], lengths: &[Pt]) -> f64 {
    let out = engine.break_paragraph(items, lengths).expect("breakable");
    assert_eq!(out.status, BreakStatus::Optimal);
    out.breaks.last().expect("non-empty chain").demerits
}

#[test]
fn search_matches_exhaustive_enumeration() {
    let cases: [(&[usize], i32, f64); 3] = [
        (&[2, 2, 2, 2, 2, 2], 10, 1.0),
        (&[2, 2, 2, 2], 6, 2.0),
        (&[3, 1, 4, 1, 5], 12, 2.0),
    ];
    for (word_lengths, target, tolerance) in cases {
        let items = word_items(word_lengths);
        let lengths = [Pt::from_i32(target)];
        let engine = ParBreak::builder().tolerance(tolerance).build().unwrap();
        let found = total_demerits(&engine, &items, &lengths);
        let best = exhaustive_best(&items, &lengths, tolerance).expect("admissible chain");
        assert!(
            approx_eq(found, best),
            "search found {found}, exhaustive best {best} for {word_lengths:?}"
        );
    }
}

#[test]
fn raising_tolerance_never_worsens_the_optimum() {
    let cases: [(&[usize], i32); 2] = [(&[2, 2, 2, 2, 2, 2], 10), (&[2, 2, 2, 2], 6)];
    for (word_lengths, target) in cases {
        let items = word_items(word_lengths);
        let lengths = [Pt::from_i32(target)];
        let tight = ParBreak::builder().tolerance(1.0).build().unwrap();
        let loose = ParBreak::builder().tolerance(2.0).build().unwrap();
        let tight_best = total_demerits(&tight, &items, &lengths);
        let loose_best = total_demerits(&loose, &items, &lengths);
        assert!(loose_best <= tight_best + 1e-9);
    }
}
