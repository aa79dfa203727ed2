use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use pocket_ledger::ledger::{Ledger, Transaction, TransactionKind, DATE_FORMAT};
use pocket_ledger::storage::{CsvStore, JsonStore, TransactionStore};
use tempfile::tempdir;

const CATEGORIES: [&str; 4] = ["Food", "Rent", "Salary", "Transport"];

fn sample_transactions(count: usize) -> Vec<Transaction> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    (0..count)
        .map(|idx| {
            let date = start + Duration::days((idx * 7 % 365) as i64);
            let kind = if idx % 5 == 0 {
                TransactionKind::Income
            } else {
                TransactionKind::Expense
            };
            Transaction::new(
                &date.format(DATE_FORMAT).to_string(),
                10.0 + (idx % 90) as f64,
                kind,
                CATEGORIES[idx % CATEGORIES.len()],
            )
            .unwrap()
        })
        .collect()
}

fn bench_mutations(c: &mut Criterion) {
    let seed = Ledger::from_transactions(sample_transactions(black_box(5_000)));

    c.bench_function("add_into_5k", |b| {
        b.iter_batched(
            || seed.clone(),
            |mut ledger| {
                ledger
                    .add("2024-06-15", 42.0, TransactionKind::Expense, "Food")
                    .unwrap();
                black_box(ledger);
            },
            BatchSize::LargeInput,
        )
    });

    c.bench_function("summary_5k", |b| {
        b.iter(|| black_box(seed.summary()))
    });

    c.bench_function("category_totals_5k", |b| {
        b.iter(|| black_box(seed.category_totals()))
    });
}

fn bench_storage(c: &mut Criterion) {
    let transactions = sample_transactions(black_box(10_000));
    let dir = tempdir().expect("tempdir");
    let csv = CsvStore::new(dir.path().join("transactions.csv"));
    let json = JsonStore::new(dir.path().join("transactions.json"));

    c.bench_function("csv_save_10k", |b| {
        b.iter(|| csv.save(&transactions).expect("save csv"))
    });
    c.bench_function("json_save_10k", |b| {
        b.iter(|| json.save(&transactions).expect("save json"))
    });

    csv.save(&transactions).expect("seed csv");
    json.save(&transactions).expect("seed json");

    c.bench_function("csv_load_10k", |b| {
        b.iter(|| black_box(csv.load().expect("load csv")))
    });
    c.bench_function("json_load_10k", |b| {
        b.iter(|| black_box(json.load().expect("load json")))
    });
}

criterion_group!(benches, bench_mutations, bench_storage);
criterion_main!(benches);
