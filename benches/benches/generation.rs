//! Generation throughput.
//!
//! - **properties**: flat key-path file, parse + lower + emit (embed mode)
//! - **schema**: JSON Schema document, parse + lower + emit (shape mode)
//! - **messages**: message template analysis

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use shapegen_typegen::input::{JsonSchemaParser, Parser};
use shapegen_typegen::lower::{lower_source, lower_tree};
use shapegen_typegen::{
    EmissionMode, GenerationOptions, ParseOptions, generate_java_type, generate_rust_type,
    parse_properties,
};

fn properties_source(sections: usize) -> String {
    let mut text = String::new();
    for s in 0..sections {
        text.push_str(&format!("section{s}.name=Section {s}\n"));
        text.push_str(&format!("section{s}.port={}\n", 8000 + s));
        text.push_str(&format!("section{s}.enabled={}\n", s % 2 == 0));
        text.push_str(&format!("section{s}.ratio=0.{s}\n"));
        text.push_str(&format!("section{s}.pool.max-size={}\n", s * 4));
    }
    text
}

fn schema_source(properties: usize) -> String {
    let fields: Vec<String> = (0..properties)
        .map(|i| match i % 4 {
            0 => format!("\"field{i}\": {{\"type\": \"string\", \"maxLength\": 64}}"),
            1 => format!("\"field{i}\": {{\"type\": \"integer\", \"format\": \"int64\", \"minimum\": 0}}"),
            2 => format!("\"field{i}\": {{\"type\": \"boolean\"}}"),
            _ => format!("\"field{i}\": {{\"type\": \"array\", \"items\": {{\"type\": \"number\"}}}}"),
        })
        .collect();
    format!(
        "{{\"$schema\": \"http://json-schema.org/draft-07/schema#\", \"type\": \"object\", \"required\": [\"field0\"], \"properties\": {{{}}}}}",
        fields.join(", ")
    )
}

fn bench_properties(c: &mut Criterion) {
    let mut group = c.benchmark_group("properties");
    let options = GenerationOptions::default();

    for sections in [10, 100, 1000] {
        let text = properties_source(sections);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("java", sections), &text, |b, text| {
            b.iter(|| {
                let tree = parse_properties(black_box(text), &ParseOptions::default()).unwrap();
                generate_java_type(&lower_tree("AppConfig", &tree, &options), &options)
            })
        });
        group.bench_with_input(BenchmarkId::new("rust", sections), &text, |b, text| {
            b.iter(|| {
                let tree = parse_properties(black_box(text), &ParseOptions::default()).unwrap();
                generate_rust_type(&lower_tree("AppConfig", &tree, &options), &options)
            })
        });
    }
    group.finish();
}

fn bench_schema(c: &mut Criterion) {
    let mut group = c.benchmark_group("schema");
    let options = GenerationOptions {
        mode: EmissionMode::Shape,
        ..Default::default()
    };
    let parse = ParseOptions::default();

    for properties in [8, 64, 512] {
        let document = schema_source(properties);
        group.throughput(Throughput::Bytes(document.len() as u64));
        group.bench_with_input(BenchmarkId::new("java", properties), &document, |b, document| {
            b.iter(|| {
                let source = JsonSchemaParser.parse(black_box(document.as_bytes()), &parse).unwrap();
                match lower_source("Record", "record", &source, &options).unwrap() {
                    shapegen_typegen::Declarations::Type(decl) => generate_java_type(&decl, &options),
                    shapegen_typegen::Declarations::Messages(_) => unreachable!(),
                }
            })
        });
    }
    group.finish();
}

fn bench_messages(c: &mut Criterion) {
    let templates = [
        ("plain", "Shop"),
        ("simple", "Hello {name}, welcome back"),
        ("typed", "Order {id} shipped on {date, date, short} for {total, number, currency}"),
        (
            "plural",
            "{count, plural, =0{No items} one{1 item in {cart}} other{{count} items in {cart}}}",
        ),
    ];

    let mut group = c.benchmark_group("messages");
    for (name, template) in templates {
        group.bench_with_input(BenchmarkId::new("analyze", name), template, |b, template| {
            b.iter(|| shapegen_messages::analyze(black_box(template)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_properties, bench_schema, bench_messages);
criterion_main!(benches);
