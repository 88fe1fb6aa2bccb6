// Unit tests for word mover's distance over a small hand-built vocabulary.

use docintegrity::embedding::traits::SentenceDistance;
use docintegrity::embedding::vectors::{tokenize, WordVectors};
use docintegrity::embedding::wmd::{earth_movers, relaxed_lower_bound};

fn model() -> WordVectors {
    WordVectors::from_entries(vec![
        ("king", vec![0.9, 0.1, 0.0]),
        ("queen", vec![0.85, 0.2, 0.05]),
        ("royal", vec![0.8, 0.3, 0.1]),
        ("apple", vec![0.0, 0.1, 0.95]),
        ("fruit", vec![0.05, 0.15, 0.9]),
        ("the", vec![0.4, 0.4, 0.4]),
        ("ate", vec![0.1, 0.9, 0.2]),
        ("an", vec![0.3, 0.5, 0.3]),
    ])
    .unwrap()
}

fn tokens(sentence: &str) -> Vec<String> {
    tokenize(sentence)
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// ============================================================
// Basic properties
// ============================================================

#[test]
fn identical_sentences_are_zero_apart() {
    let m = model();
    let d = m.distance(&tokens("the king ate an apple"), &tokens("the king ate an apple"));
    assert!(d.abs() < 1e-9, "got {d}");
}

#[test]
fn distance_is_symmetric() {
    let m = model();
    let pairs = [
        ("the king ate an apple", "the queen ate fruit"),
        ("royal royal king", "apple"),
        ("the the the king", "queen fruit"),
    ];
    for (a, b) in pairs {
        let ab = m.distance(&tokens(a), &tokens(b));
        let ba = m.distance(&tokens(b), &tokens(a));
        assert!(approx(ab, ba), "{a:?} vs {b:?}: {ab} != {ba}");
    }
}

#[test]
fn word_order_and_case_do_not_matter() {
    let m = model();
    let d = m.distance(&tokens("The King ate an Apple"), &tokens("apple an ate king the"));
    assert!(d.abs() < 1e-9, "got {d}");
}

#[test]
fn related_words_are_closer_than_unrelated_ones() {
    let m = model();
    let close = m.distance(&tokens("the king ate"), &tokens("the queen ate"));
    let far = m.distance(&tokens("the king ate"), &tokens("the apple ate"));
    assert!(close < far, "{close} should be below {far}");
}

#[test]
fn orthogonal_single_words_are_sqrt_two_apart() {
    let m = WordVectors::from_entries(vec![("north", vec![1.0, 0.0]), ("east", vec![0.0, 3.0])])
        .unwrap();
    let d = m.distance(&tokens("north"), &tokens("east"));
    assert!(approx(d, 2f64.sqrt()), "got {d}");
}

// ============================================================
// Out-of-vocabulary handling
// ============================================================

#[test]
fn unknown_words_are_ignored() {
    let m = model();
    let d = m.distance(&tokens("the king zzyzx"), &tokens("the king"));
    assert!(d.abs() < 1e-9, "got {d}");
}

#[test]
fn nothing_in_vocabulary_is_infinitely_far() {
    let m = model();
    assert_eq!(m.distance(&tokens("zzyzx qwerty"), &tokens("the king")), f64::INFINITY);
    assert_eq!(m.distance(&[], &tokens("the king")), f64::INFINITY);
    assert_eq!(m.distance_below(&tokens("zzyzx"), &tokens("zzyzx"), f64::MAX), None);
}

// ============================================================
// Pruned evaluation
// ============================================================

#[test]
fn pruned_distance_agrees_with_full_distance() {
    let m = model();
    let sentences = [
        "the king ate an apple",
        "the queen ate fruit",
        "royal fruit",
        "an apple",
        "the the king",
    ];
    for a in sentences {
        for b in sentences {
            let full = m.distance(&tokens(a), &tokens(b));
            for cutoff in [0.05, 0.2, 0.5, 1.0, 2.0] {
                match m.distance_below(&tokens(a), &tokens(b), cutoff) {
                    Some(d) => {
                        assert!(approx(d, full), "{a:?}/{b:?}: {d} != {full}");
                        assert!(d < cutoff);
                    }
                    None => assert!(full >= cutoff - 1e-9, "{a:?}/{b:?} pruned at {full}"),
                }
            }
        }
    }
}

#[test]
fn relaxed_bound_never_exceeds_exact_cost() {
    // Deterministic pseudo-random problems
    let mut seed: u64 = 0x5eed;
    let mut next = move || {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        ((seed >> 33) as f64) / ((1u64 << 31) as f64)
    };

    for n in 1..5 {
        for m in 1..5 {
            let mut supply: Vec<f64> = (0..n).map(|_| next() + 0.1).collect();
            let mut demand: Vec<f64> = (0..m).map(|_| next() + 0.1).collect();
            let (s, d): (f64, f64) = (supply.iter().sum(), demand.iter().sum());
            supply.iter_mut().for_each(|w| *w /= s);
            demand.iter_mut().for_each(|w| *w /= d);
            let cost: Vec<f64> = (0..n * m).map(|_| next() * 2.0).collect();

            let bound = relaxed_lower_bound(&supply, &demand, &cost);
            let exact = earth_movers(&supply, &demand, &cost);
            assert!(bound <= exact + 1e-9, "{n}x{m}: bound {bound} > exact {exact}");
        }
    }
}
