use criterion::{black_box, criterion_group, criterion_main, Criterion};
use proofmark_differ::{diff_documents, diff_words, DiffConfig, Target};
use proofmark_document::Node;

const DRAFT: &str = "Their is a number of reasons why the team decided too postpone the \
    launch. First, the onboarding flow were not ready. Second, nobody had wrote \
    the migration guide yet, and the support staff was still learning the product.";

const CORRECTED: &str = "There are a number of reasons why the team decided to postpone the \
    launch. First, the onboarding flow was not ready. Second, nobody had written \
    the migration guide yet, and the support staff were still learning the product.";

fn diff_paragraph(c: &mut Criterion) {
    c.bench_function("diff_words_paragraph", |b| {
        b.iter(|| diff_words(black_box(DRAFT), black_box(CORRECTED)))
    });
}

fn diff_document(c: &mut Criterion) {
    let paragraphs: Vec<Node> = (0..8)
        .map(|_| Node::paragraph(vec![Node::text(DRAFT)]))
        .collect();
    let doc = Node::doc(paragraphs);
    let corrected = vec![CORRECTED; 8].join("\n");
    let config = DiffConfig::default();

    c.bench_function("diff_documents_plain_text", |b| {
        b.iter(|| diff_documents(black_box(&doc), Target::Text(&corrected), &config))
    });
}

criterion_group!(benches, diff_paragraph, diff_document);
criterion_main!(benches);
