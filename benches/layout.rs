use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use markmind::layout::{apply_layout, Point};
use markmind::parser::parse_outline;
use markmind::render::render_svg;
use markmind::style::{GlobalLayoutOptions, StyleResolver};
use markmind::theme::Theme;
use std::hint::black_box;

fn outline_source(branches: usize, depth: usize) -> String {
    let mut out = String::from("# Benchmark root\n");
    for branch in 0..branches {
        out.push_str(&format!("- branch {branch} with a medium length label\n"));
        let mut indent = String::from("  ");
        for level in 0..depth {
            out.push_str(&format!("{indent}- nested item {branch}.{level}\n"));
            indent.push_str("  ");
        }
    }
    out
}

fn styles_for(layout: &str) -> StyleResolver {
    let mut styles = StyleResolver::new();
    styles.set_fast_metrics(true);
    styles
        .set_global_layout_type(layout, &GlobalLayoutOptions::default())
        .expect("known layout type");
    styles
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for (name, branches, depth) in [("small", 6, 2), ("medium", 24, 3), ("large", 80, 4)] {
        let source = outline_source(branches, depth);
        group.bench_with_input(BenchmarkId::from_parameter(name), &source, |b, source| {
            b.iter(|| parse_outline(black_box(source)));
        });
    }
    group.finish();
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    let source = outline_source(24, 3);
    for layout in ["horizontal", "vertical", "taproot", "classic"] {
        let styles = styles_for(layout);
        group.bench_with_input(BenchmarkId::from_parameter(layout), &styles, |b, styles| {
            b.iter(|| {
                let mut tree = parse_outline(black_box(&source)).expect("parse");
                apply_layout(&mut tree, Point::new(0.0, 0.0), styles)
            });
        });
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let styles = styles_for("taproot");
    let theme = Theme::light();
    let source = outline_source(24, 3);
    let mut tree = parse_outline(&source).expect("parse");
    apply_layout(&mut tree, Point::new(0.0, 0.0), &styles).expect("layout");
    c.bench_function("render_svg", |b| {
        b.iter(|| render_svg(black_box(&tree), &theme, &styles));
    });
}

criterion_group!(benches, bench_parse, bench_layout, bench_render);
criterion_main!(benches);
