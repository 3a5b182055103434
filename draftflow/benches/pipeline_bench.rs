//! Benchmarks for the guardrail stages on a long article.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use draftflow::core::ContentOrigin;
use draftflow::normalizer::Normalizer;
use draftflow::seo::SeoOptimizer;
use draftflow::testing::ArticleFixture;
use draftflow::validator::Validator;

fn guardrail_benchmark(c: &mut Criterion) {
    let fixture = ArticleFixture::new("Merawat Monstera di Dalam Ruangan")
        .with_sections(&["Media Tanam", "Penyiraman", "Cahaya", "Pemupukan", "Hama"])
        .with_word_count(3000);
    let content = fixture.build();
    let outline = fixture.outline();

    let normalizer = Normalizer::default();
    c.bench_function("normalize_3000_words", |b| {
        b.iter(|| normalizer.normalize(black_box(content.clone())));
    });

    let validator = Validator::default();
    c.bench_function("validate_3000_words", |b| {
        b.iter(|| validator.validate(black_box(&content)));
    });
    c.bench_function("validate_outline_3000_words", |b| {
        b.iter(|| validator.validate_outline(black_box(&outline), black_box(&content.body)));
    });

    let optimizer = SeoOptimizer::default();
    c.bench_function("seo_generated_3000_words", |b| {
        b.iter(|| optimizer.optimize(black_box(content.clone()), ContentOrigin::Generated));
    });
    c.bench_function("seo_human_3000_words", |b| {
        b.iter(|| optimizer.optimize(black_box(content.clone()), ContentOrigin::Human));
    });
}

criterion_group!(benches, guardrail_benchmark);
criterion_main!(benches);
