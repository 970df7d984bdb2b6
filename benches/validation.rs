//! Benchmarks for field validation primitives.
//!
//! These benchmarks measure the regex and string operations behind the
//! per-keystroke validators.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use regex::Regex;

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

fn bench_email_regex_compile(c: &mut Criterion) {
    c.bench_function("email_regex_compile", |b| {
        b.iter(|| Regex::new(black_box(EMAIL_PATTERN)))
    });
}

fn bench_email_regex_match(c: &mut Criterion) {
    let re = Regex::new(EMAIL_PATTERN).unwrap();

    c.bench_function("email_regex_match_valid", |b| {
        b.iter(|| re.is_match(black_box("ops@acme-shipping.com")))
    });

    c.bench_function("email_regex_match_invalid", |b| {
        b.iter(|| re.is_match(black_box("not-an-email")))
    });
}

fn bench_comma_strip_parse(c: &mut Criterion) {
    let input = "1,500,000.50";

    c.bench_function("comma_strip_parse", |b| {
        b.iter(|| black_box(input).replace(',', "").parse::<f64>())
    });
}

criterion_group!(
    benches,
    bench_email_regex_compile,
    bench_email_regex_match,
    bench_comma_strip_parse
);
criterion_main!(benches);
