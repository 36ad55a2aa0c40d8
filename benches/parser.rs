use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use std::collections::HashMap;
use vesper::keywords::load_keywords;
use vesper::parser::Parser;
use vesper::scanner::token::TokenType;
use vesper::scanner::Scanner;

fn parse(source: &str, keywords: &HashMap<String, TokenType>) {
    let program = Parser::new(Scanner::new(source, keywords)).parse();
    assert!(program.is_ok());
}

fn long_expr(c: &mut Criterion) {
    let keywords = load_keywords(None).unwrap();
    let mut group = c.benchmark_group("long-expr");

    let mut source = "1".to_string();
    for _i in 0..1000 {
        source.push_str(" + 1");
    }
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("long-expr", |b| b.iter(|| parse(&source, &keywords)));
}

fn stress_precedence(c: &mut Criterion) {
    let keywords = load_keywords(None).unwrap();
    let mut group = c.benchmark_group("stress-precedence");

    let mut source = "1".to_string();
    for _i in 0..200 {
        source.push_str(" == 2 < 3 + 5 * 5");
    }
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("stress-precedence", |b| {
        b.iter(|| parse(&source, &keywords))
    });
}

criterion_group!(benches, long_expr, stress_precedence);
criterion_main!(benches);
