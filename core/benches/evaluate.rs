//! Evaluate benchmarks — the hot path.
//!
//! Measures: scalar and nested element matching over snapshots of growing
//! size, hit vs. miss (a miss always scans every key), and trace overhead.

use flatmatch::prelude::*;
use flatmatch::{explain_nested, AttributePattern};

fn main() {
    divan::main();
}

// ═══════════════════════════════════════════════════════════════════════════════
// Test fixtures
// ═══════════════════════════════════════════════════════════════════════════════

/// A security-group-like snapshot with `n` ingress rules of four attributes each.
fn ingress_state(n: usize) -> FlatState {
    let mut state = FlatState::new().with("ingress.#", n.to_string());
    for i in 0..n {
        let id = 1000 + i * 7;
        state.insert(format!("ingress.{id}.from_port"), (8000 + i).to_string());
        state.insert(format!("ingress.{id}.to_port"), (8000 + i).to_string());
        state.insert(format!("ingress.{id}.protocol"), "tcp");
        state.insert(format!("ingress.{id}.cidr_blocks.0"), "10.0.0.0/8");
    }
    state
}

/// A snapshot with `n` scalar set members.
fn tag_state(n: usize) -> FlatState {
    (0..n)
        .map(|i| (format!("tags.{}", 3000 + i), format!("tag-{i}")))
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════════════
// Pattern parsing
// ═══════════════════════════════════════════════════════════════════════════════

#[divan::bench]
fn parse_pattern() -> AttributePattern {
    AttributePattern::parse(divan::black_box("ingress.0.cidr_blocks.*")).unwrap()
}

// ═══════════════════════════════════════════════════════════════════════════════
// Scalar
// ═══════════════════════════════════════════════════════════════════════════════

#[divan::bench(args = [10, 100, 1000])]
fn scalar_hit(bencher: divan::Bencher, n: usize) {
    let state = tag_state(n);
    let expected = format!("tag-{}", n / 2);

    bencher.bench_local(|| match_scalar(&state, "tags.*", &expected));
}

#[divan::bench(args = [10, 100, 1000])]
fn scalar_miss(bencher: divan::Bencher, n: usize) {
    let state = tag_state(n);

    bencher.bench_local(|| match_scalar(&state, "tags.*", "absent"));
}

// ═══════════════════════════════════════════════════════════════════════════════
// Nested
// ═══════════════════════════════════════════════════════════════════════════════

#[divan::bench(args = [10, 100, 1000])]
fn nested_hit(bencher: divan::Bencher, n: usize) {
    let state = ingress_state(n);
    let port = (8000 + n / 2).to_string();
    let criteria = ValueCriteria::new()
        .with("from_port", port.as_str())
        .with("protocol", "tcp");

    bencher.bench_local(|| match_nested(&state, "ingress.*", &criteria));
}

#[divan::bench(args = [10, 100, 1000])]
fn nested_miss(bencher: divan::Bencher, n: usize) {
    let state = ingress_state(n);
    // Every element confirms "protocol", none confirms the port.
    let criteria = ValueCriteria::new()
        .with("from_port", "22")
        .with("protocol", "tcp");

    bencher.bench_local(|| match_nested(&state, "ingress.*", &criteria));
}

// ═══════════════════════════════════════════════════════════════════════════════
// Trace overhead
// ═══════════════════════════════════════════════════════════════════════════════

#[divan::bench(args = [10, 100, 1000])]
fn nested_trace(bencher: divan::Bencher, n: usize) {
    let state = ingress_state(n);
    let criteria = ValueCriteria::new().with("from_port", "22");

    bencher.bench_local(|| explain_nested(&state, "ingress.*", &criteria));
}
