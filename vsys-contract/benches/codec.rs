use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use vsys_contract::{Contract, DataEntry, TemplateVariant, decode_list, encode_list, token_template};

fn data_stack() -> Vec<DataEntry> {
    vec![
        DataEntry::amount(1_000_000).unwrap(),
        DataEntry::amount(100).unwrap(),
        DataEntry::short_text("benchmark token").unwrap(),
        DataEntry::address(&[7u8; 26]).unwrap(),
        DataEntry::boolean(true).unwrap(),
    ]
}

fn bench_data_stack(c: &mut Criterion) {
    let entries = data_stack();
    let bytes = encode_list(&entries).unwrap();

    c.bench_function("encode_data_stack", |b| {
        b.iter(|| encode_list(black_box(&entries)))
    });
    c.bench_function("decode_data_stack", |b| {
        b.iter(|| decode_list(black_box(&bytes)))
    });
}

fn bench_contract(c: &mut Criterion) {
    let contract = token_template(TemplateVariant::WithSplit).unwrap();
    let bytes = contract.to_bytes().unwrap();

    c.bench_function("encode_token_template", |b| {
        b.iter(|| black_box(contract).to_bytes())
    });
    c.bench_function("decode_token_template", |b| {
        b.iter(|| Contract::from_bytes(black_box(&bytes)))
    });
    c.bench_function("decode_template_descriptors", |b| {
        b.iter(|| black_box(contract).descriptors())
    });
}

criterion_group!(benches, bench_data_stack, bench_contract);
criterion_main!(benches);
