// SPDX-License-Identifier: PMPL-1.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Benchmarks for seobot fixers and validators

use criterion::{criterion_group, criterion_main, Criterion};
use seobot::config::SiteConfig;
use seobot::fixer::{run_comprehensive_seo_fix, SeoData};
use seobot::rules::{optimize_description, optimize_title};
use seobot::schema::validate_document;
use std::hint::black_box;
use std::path::Path;

const PAGE: &str = include_str!("../tests/fixtures/site/blog/post.html");
const SERVICES: &str = include_str!("../tests/fixtures/site/services.html");

fn bench_optimize_strings(c: &mut Criterion) {
    c.bench_function("optimize_title", |b| {
        b.iter(|| optimize_title(black_box("SEO"), black_box("Digital Frontier"), 45, 60))
    });

    c.bench_function("optimize_description", |b| {
        b.iter(|| optimize_description(black_box("Marketing insights and guides."), 120, 160))
    });
}

fn bench_comprehensive_fix(c: &mut Criterion) {
    let site = SiteConfig::default();
    let seo = SeoData {
        title: "Answer Engine Optimization".to_string(),
        description: String::new(),
        canonical_url: "https://digitalfrontier.app/blog/post".to_string(),
    };

    c.bench_function("comprehensive_fix", |b| {
        b.iter(|| run_comprehensive_seo_fix(black_box(PAGE), black_box(&seo), black_box(&site)))
    });
}

fn bench_schema_validation(c: &mut Criterion) {
    let site = SiteConfig::default();
    let path = Path::new("services.html");

    c.bench_function("schema_validation", |b| {
        b.iter(|| validate_document(black_box(path), black_box(SERVICES), black_box(&site)))
    });
}

criterion_group!(
    benches,
    bench_optimize_strings,
    bench_comprehensive_fix,
    bench_schema_validation
);
criterion_main!(benches);
