// tokpeg. Token-stream PEG parsing
// Copyright (c) 2018 Dragoș Tiselice
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

use criterion::{criterion_group, criterion_main, Criterion};

use tokpeg::Lexer;
use tokpeg_grammars::minic::{self, MiniCLexer};
use tokpeg_vm::Parser;

fn source(functions: usize) -> String {
    (0..functions)
        .map(|i| {
            format!(
                "int f{i}(int a, int b) {{\n    int c = a * {i} + b;\n    while (c > 0) {{\n        \
                 c--;\n        if (c == b) break; else c = c - 1;\n    }}\n    return f{i}(c, a);\n}}\n",
                i = i
            )
        })
        .collect()
}

fn criterion_benchmark(c: &mut Criterion) {
    let data = source(200);
    let tokens = MiniCLexer.lex(&data).unwrap();

    c.bench_function("minic lexer", |b| b.iter(|| MiniCLexer.lex(&data).unwrap()));

    let parser = Parser::builder(minic::grammar())
        .with_lexer(MiniCLexer)
        .build();
    c.bench_function("minic parser", |b| {
        b.iter(|| parser.parse(tokens.clone()).unwrap())
    });

    let parser = Parser::builder_from(&parser)
        .with_memoization(false)
        .build();
    c.bench_function("minic parser without memoization", |b| {
        b.iter(|| parser.parse(tokens.clone()).unwrap())
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
