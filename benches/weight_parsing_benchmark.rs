//! Weight parsing benchmarks: unit normalization and product page scraping
//!
//! Scraping dominates when the vendor record has no weight, so both the
//! table hit and the worst case (no match, every pattern tried) are measured.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use part_weight_resolver::domain::services::{PackageInference, UnitNormalizer};
use part_weight_resolver::infrastructure::parsing::HtmlWeightScraper;

const EXPRESSIONS: &[&str] = &[
    "5.500 mg",
    "0.0335 g",
    "1,250.5 grams",
    "0.25 oz",
    "1.2 lbs",
    "Approx. 12 kg per reel",
    "see datasheet",
];

fn product_page(rows: usize, weight_row: bool) -> String {
    let mut html = String::from("<html><body><table>");
    for i in 0..rows {
        html.push_str(&format!("<tr><th>Attribute {i}</th><td>Value {i}</td></tr>"));
    }
    if weight_row {
        html.push_str("<tr><th>Unit Weight:</th><td>1,200 mg</td></tr>");
    }
    html.push_str("</table></body></html>");
    html
}

fn benchmark_unit_normalizer(c: &mut Criterion) {
    let normalizer = UnitNormalizer::new();
    c.bench_function("unit_normalizer_mixed_expressions", |b| {
        b.iter(|| {
            for expression in EXPRESSIONS {
                black_box(normalizer.to_pounds(black_box(expression)));
            }
        });
    });
}

fn benchmark_package_inference(c: &mut Criterion) {
    let inference = PackageInference::new();
    let text = "GRM21BR71H104KA01L Multilayer Ceramic Capacitors MLCC - SMD/SMT 0805 0.1uF";
    c.bench_function("package_inference_detect", |b| {
        b.iter(|| black_box(inference.detect(black_box(text))));
    });
}

fn benchmark_html_scraper(c: &mut Criterion) {
    let Ok(scraper) = HtmlWeightScraper::new() else {
        return;
    };
    let hit = product_page(60, true);
    let miss = product_page(60, false);

    let mut group = c.benchmark_group("html_weight_scraper");
    group.bench_function("table_hit", |b| {
        b.iter(|| black_box(scraper.extract(black_box(&hit)).ok()));
    });
    group.bench_function("no_match", |b| {
        b.iter(|| black_box(scraper.extract(black_box(&miss)).ok()));
    });
    group.finish();
}

criterion_group!(
    benches,
    benchmark_unit_normalizer,
    benchmark_package_inference,
    benchmark_html_scraper
);
criterion_main!(benches);
