use criterion::{black_box, criterion_group, criterion_main, Criterion};
use datatypes::prelude::*;
use datatypes::SparseArray;

message! {
    LINE_ITEM = "LineItem" {
        scalar "sku": Text { namespace "ebl" };
        scalar "quantity": Integer { attribute };
        scalar "unitPrice": Float;
        scalar "taxable": Boolean;
    }
    ORDER = "Order" {
        scalar "orderID": Text { attribute };
        scalar "customerName": Text;
        array "lineItems": LINE_ITEM { namespace "ebl" };
    }
}

fn sample(n: usize) -> Raw {
    let items: Vec<Raw> = (0..n)
        .map(|i| {
            raw_map! {
                "sku" => format!("SKU-{i:04}"),
                "@quantity" => (i % 7) as i64,
                "unit_price" => "19.99",
                "taxable" => i % 2 == 0,
            }
        })
        .collect();
    raw_map! {
        "order_id" => "A-1001",
        "customer_name" => "Jane Roe",
        "line_items" => items,
    }
}

fn construct_bench(c: &mut Criterion) {
    let raw = sample(64);
    c.bench_function("construct_64_items", |b| {
        b.iter(|| Object::from_raw(*ORDER, black_box(&raw)))
    });
}

fn represent_bench(c: &mut Criterion) {
    let obj = Object::from_raw(*ORDER, &sample(64)).unwrap();
    c.bench_function("to_hash_64_items", |b| b.iter(|| black_box(&obj).to_hash()));
    c.bench_function("to_representation_plain_64_items", |b| {
        b.iter(|| black_box(&obj).to_representation(&ReprOptions::plain()))
    });
}

fn sparse_merge_bench(c: &mut Criterion) {
    let raw = Raw::mapping((0..32).map(|i| ((i * 4).to_string(), Raw::from(i))));
    c.bench_function("sparse_merge_32_of_128", |b| {
        b.iter(|| {
            let mut arr = SparseArray::new(Integer.type_ref());
            arr.merge_raw(black_box(&raw)).map(|_| arr.len())
        })
    });
}

criterion_group!(benches, construct_bench, represent_bench, sparse_merge_bench);
criterion_main!(benches);
