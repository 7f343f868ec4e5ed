//! Extraction throughput on list pages of growing size
//!
//! Measures document parsing separately from the extraction pipeline so a
//! regression in either shows up on its own.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use neo_page_data::{PageDataService, PageDocument, ParsingConfig};

const URL: &str = "https://blog.example.com/";

fn list_page(rows: usize) -> String {
    let body: String = (0..rows)
        .map(|i| {
            format!(
                r#"<tr data-post-id="{i}"><td>{i}</td><td>Post {i}</td>
                   <td>https://blog.example.com/2024/01/post-{i}.html</td>
                   <td><time datetime="2024-01-01T00:00:00Z">Jan 1</time></td>
                   <td>January 1, 2024</td><td>Ana</td>
                   <td><ul><li><a href="/search/label/Travel">Travel</a></li></ul></td>
                   <td>Snippet {i}</td><td>(No image)</td></tr>"#
            )
        })
        .collect();
    format!(
        r#"<html><head><title>Road Notes</title></head><body>
           <header class="neo-site-header"><h1><a href="/">Road Notes</a></h1></header>
           <div class="neo-homepage-data"><h2>Latest posts</h2>
             <table id="neo-data-table-posts"><tbody>{body}</tbody></table>
           </div></body></html>"#
    )
}

fn document_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_document");
    for rows in [10, 100, 500] {
        let html = list_page(rows);
        group.bench_with_input(BenchmarkId::from_parameter(rows), &html, |b, html| {
            b.iter(|| PageDocument::parse(black_box(html), URL));
        });
    }
    group.finish();
}

fn page_extraction(c: &mut Criterion) {
    let config = ParsingConfig::default();
    let mut group = c.benchmark_group("page_data");
    for rows in [10, 100, 500] {
        let html = list_page(rows);
        group.bench_with_input(BenchmarkId::from_parameter(rows), &html, |b, html| {
            b.iter_batched(
                || PageDocument::parse(html, URL),
                |document| {
                    let service = PageDataService::new(document, &config).unwrap();
                    black_box(service.page_data())
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, document_parsing, page_extraction);
criterion_main!(benches);
