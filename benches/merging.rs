use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, SamplingMode, Throughput};
use wordbpe::{CorpusItem, MergeConfig, VocabularyBuilder};

fn build_corpus() -> Vec<CorpusItem> {
    let stems = ["low", "new", "wid", "hug", "pun", "tok", "merg", "spl"];
    let suffixes = ["", "er", "est", "s", "ing", "ed"];
    let mut corpus = Vec::with_capacity(stems.len() * suffixes.len() * 16);
    for round in 0..16u64 {
        for stem in stems {
            for suffix in suffixes {
                let word = format!("{stem}{suffix}{}", char::from(b'a' + (round % 26) as u8));
                corpus.push(CorpusItem::new(word, round + 1));
            }
        }
    }
    corpus
}

fn bench_merging(c: &mut Criterion) {
    let corpus = build_corpus();
    let total_chars: usize = corpus.iter().map(|item| item.word.chars().count()).sum();

    let mut group = c.benchmark_group("build_vocabulary");
    group.throughput(Throughput::Elements(total_chars as u64));
    group.sampling_mode(SamplingMode::Flat);
    for weighted in [false, true] {
        let cfg = MergeConfig::builder()
            .target_vocab_size(256)
            .weight_by_frequency(weighted)
            .show_progress(false)
            .build()
            .expect("configuration");
        let label = if weighted { "weighted" } else { "unweighted" };
        group.bench_function(BenchmarkId::from_parameter(label), |b| {
            b.iter(|| {
                let mut builder =
                    VocabularyBuilder::with_config(corpus.iter().cloned(), cfg.clone())
                        .expect("builder");
                let vocab = builder.build_vocabulary().expect("build");
                let _ = black_box(vocab);
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_merging);
criterion_main!(benches);
