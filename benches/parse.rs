use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

fn synthetic_config(blocks: usize) -> String {
    let mut source = String::new();
    for i in 0..blocks {
        source.push_str(&format!(
            "server{i} \"host-{i}.example\" {{\n    listen 0.0.0.0:8080\n    root \"/var/www/site {i}\"\n    tls {{\n        cert /etc/certs/site-{i}.pem\n    }}\n}}\n"
        ));
    }
    source
}

fn bench_parse(c: &mut Criterion) {
    let source = synthetic_config(200);

    c.bench_function("parse_200_blocks", |b| {
        b.iter(|| blockconf::parse_str(black_box(&source)).unwrap())
    });
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
