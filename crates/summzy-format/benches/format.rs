//! Benchmarks for markdown conversion and chunking.

#![allow(clippy::format_push_string)] // Benchmark setup code, performance not critical

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use summzy_format::{chunk, format_markdown, prepare_messages, strip_formatting};

/// Generate a summary-shaped document: headings, bullets, links and code.
fn generate_summary(sections: usize) -> String {
    let mut md = String::with_capacity(sections * 400);
    md.push_str("# Summary\n\n");

    for i in 0..sections {
        md.push_str(&format!("## Part {i}\n\n"));
        md.push_str(&format!(
            "This part costs $5.{i:02} (approx) and has **bold**, _italic_ and ~~old~~ text.\n"
        ));
        md.push_str(&format!("- See [source {i}](https://example.com/wiki/Item_({i}))\n"));
        md.push_str("- Run `cargo doc --open` to read more!\n");
        md.push_str("```sh\necho \"done\" > out.txt\n```\n\n");
    }
    md
}

fn bench_format_simple(c: &mut Criterion) {
    c.bench_function("format_simple_markdown", |b| {
        b.iter(|| format_markdown(black_box("**Total:** $5.00 (approx)!")));
    });
}

fn bench_format_varying_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("format_by_size");

    for sections in [5, 20, 100] {
        let markdown = generate_summary(sections);
        group.throughput(Throughput::Bytes(markdown.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("markdown", format!("{sections}_sections")),
            &markdown,
            |b, md| b.iter(|| format_markdown(md)),
        );
    }

    group.finish();
}

fn bench_format_unbalanced(c: &mut Criterion) {
    let mut group = c.benchmark_group("format_unbalanced_line");

    for repeats in [1_000, 10_000] {
        let line = "[a](x **_b ".repeat(repeats);
        group.throughput(Throughput::Bytes(line.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(repeats), &line, |b, md| {
            b.iter(|| format_markdown(md));
        });
    }

    group.finish();
}

fn bench_chunk(c: &mut Criterion) {
    let rendered = format_markdown(&generate_summary(100));

    c.bench_function("chunk_4096", |b| {
        b.iter(|| chunk(black_box(&rendered), 4096));
    });
}

fn bench_strip(c: &mut Criterion) {
    let rendered = format_markdown(&generate_summary(20));

    c.bench_function("strip_formatting", |b| {
        b.iter(|| strip_formatting(black_box(&rendered)));
    });
}

fn bench_prepare_messages(c: &mut Criterion) {
    let markdown = generate_summary(100);

    c.bench_function("prepare_messages_4000", |b| {
        b.iter(|| prepare_messages(black_box(&markdown), 4000));
    });
}

criterion_group!(
    benches,
    bench_format_simple,
    bench_format_varying_sizes,
    bench_format_unbalanced,
    bench_chunk,
    bench_strip,
    bench_prepare_messages
);
criterion_main!(benches);
