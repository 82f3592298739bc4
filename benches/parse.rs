use criterion::{black_box, criterion_group, criterion_main, Criterion};
use repopulse::aggregate::aggregate;
use repopulse::language::IgnoreSet;
use repopulse::model::TimeWindow;
use repopulse::parse::parse_log;
use std::fmt::Write;

fn synthetic_log(commits: usize) -> String {
    let mut text = String::new();
    for i in 0..commits {
        let _ = writeln!(text, "dev{}|2024-01-{:02}T12:00:00+00:00", i % 7, i % 28 + 1);
        let _ = writeln!(text, "{}\t{}\tsrc/module_{}.rs", i % 40, i % 9, i % 13);
        let _ = writeln!(text, "{}\t0\tdocs/page_{}.md", i % 5, i % 3);
        if i % 10 == 0 {
            let _ = writeln!(text, "-\t-\tassets/logo.png");
        }
        text.push('\n');
    }
    text
}

fn bench_parse(c: &mut Criterion) {
    let text = synthetic_log(5_000);
    c.bench_function("parse_log 5k commits", |b| {
        b.iter(|| parse_log(black_box(&text)).count())
    });

    let records: Vec<_> = parse_log(&text).collect();
    let window = TimeWindow::all_time("All Time");
    let ignore = IgnoreSet::new();
    c.bench_function("aggregate 5k commits", |b| {
        b.iter(|| aggregate(black_box(&records), &window, &ignore))
    });
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
