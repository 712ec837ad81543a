//! Throughput benchmarks for the preprocessor + lexer pipeline.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use chert_diagnostic::ErrorSink;
use chert_lexer::Lexer;
use chert_lexer_core::{CodeBuffer, StrSource};
use chert_pp::Preprocessor;

/// Generate a C translation unit with `n` small functions and a few
/// macros exercised throughout.
fn generate_source(n: usize) -> String {
    let mut src = String::with_capacity(n * 160);
    src.push_str("#define SCALE 4\n");
    src.push_str("#define CLAMP(x, lo, hi) ((x) < (lo) ? (lo) : ((x) > (hi) ? (hi) : (x)))\n");
    for i in 0..n {
        src.push_str(&format!(
            "static int fn_{i}(int a, unsigned long b) {{\n    /* mix of literals */\n    double d = {i}.5e1;\n    int c = CLAMP(a * SCALE, 0, 0x7fffffff);\n    return c + (int)(b % 17uLL) + d;\n}}\n"
        ));
    }
    src
}

fn lex_all_raw(source: &str) -> usize {
    let sink = ErrorSink::new();
    let mut lexer = Lexer::new(StrSource::new(source), sink);
    let mut count = 0;
    loop {
        match lexer.next() {
            Ok(Some(token)) => {
                count += 1;
                if token.is_eof() {
                    return count;
                }
            }
            Ok(None) => {}
            Err(_) => return count,
        }
    }
}

fn lex_all_preprocessed(source: &str) -> usize {
    let sink = ErrorSink::new();
    let pp = Preprocessor::new(CodeBuffer::new(source), sink.clone());
    let mut lexer = Lexer::new(pp, sink);
    let mut count = 0;
    loop {
        match lexer.next() {
            Ok(Some(token)) => {
                count += 1;
                if token.is_eof() {
                    return count;
                }
            }
            Ok(None) => {}
            Err(_) => return count,
        }
    }
}

fn bench_lexer(c: &mut Criterion) {
    let source = generate_source(200);

    let mut group = c.benchmark_group("lex");
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("raw_scanner", |b| {
        b.iter(|| lex_all_raw(black_box(&source)));
    });
    group.bench_function("preprocessed", |b| {
        b.iter(|| lex_all_preprocessed(black_box(&source)));
    });
    group.finish();
}

criterion_group!(benches, bench_lexer);
criterion_main!(benches);
