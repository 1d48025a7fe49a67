use std::hint::black_box;
use std::io::Cursor;

use criterion::{Criterion, criterion_group, criterion_main};

fn bench_reader(c: &mut Criterion) {
    let content = make_env_content(2_000);

    c.bench_function("parse_reader", |b| {
        b.iter(|| {
            let reader = Cursor::new(black_box(content.as_bytes()));
            dotparse::parse_reader(reader).expect("parse should succeed")
        });
    });
}

fn make_env_content(entries: usize) -> String {
    let mut content = String::with_capacity(entries * 24);
    for idx in 0..entries {
        content.push_str("export KEY_");
        content.push_str(&idx.to_string());
        content.push_str("=\"value\"\n");
    }
    content
}

criterion_group!(benches, bench_reader);
criterion_main!(benches);
