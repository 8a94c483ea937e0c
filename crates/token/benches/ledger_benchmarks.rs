use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use rankblock_auth::{InMemoryAccountDirectory, SignerSet};
use rankblock_core::{AccountName, Amount, Symbol};
use rankblock_events::InMemoryEventBus;
use rankblock_token::{InMemoryLedgerStore, LedgerConfig, Notification, TokenLedger};

type Ledger =
    TokenLedger<InMemoryLedgerStore, InMemoryAccountDirectory, InMemoryEventBus<Notification>>;

fn name(s: &str) -> AccountName {
    AccountName::new(s).unwrap()
}

fn rb(value: i64) -> Amount {
    Amount::new(value, Symbol::new(4, "RB"))
}

/// Ledger with RB created and `funded` units issued to alice.
fn setup_ledger(funded: i64) -> Ledger {
    let directory = InMemoryAccountDirectory::with_accounts(
        ["rankblock", "issuer", "alice", "bob"].map(name),
    );
    let mut ledger = TokenLedger::new(
        LedgerConfig::new(name("rankblock")),
        InMemoryLedgerStore::new(),
        directory,
        InMemoryEventBus::new(),
    );
    ledger
        .create_token(
            &SignerSet::single(name("rankblock")),
            name("issuer"),
            rb(rankblock_core::MAX_AMOUNT),
        )
        .unwrap();
    if funded > 0 {
        ledger
            .issue(&SignerSet::single(name("issuer")), name("alice"), rb(funded), "")
            .unwrap();
    }
    ledger
}

fn bench_operation_latency(c: &mut Criterion) {
    let mut group = c.benchmark_group("operation_latency");

    group.bench_function("issue_to_issuer", |b| {
        let mut ledger = setup_ledger(0);
        let auth = SignerSet::single(name("issuer"));
        let issuer = name("issuer");
        b.iter(|| {
            ledger
                .issue(&auth, issuer.clone(), black_box(rb(1)), "")
                .unwrap();
        });
    });

    group.bench_function("issue_with_forward", |b| {
        let mut ledger = setup_ledger(0);
        let auth = SignerSet::single(name("issuer"));
        let bob = name("bob");
        b.iter(|| {
            ledger.issue(&auth, bob.clone(), black_box(rb(1)), "").unwrap();
        });
    });

    // Alternates direction so neither balance is ever erased.
    group.bench_function("transfer_round_trip", |b| {
        let mut ledger = setup_ledger(1_000_000);
        let auth = SignerSet::single(name("alice")).with(name("bob"));
        let (alice, bob) = (name("alice"), name("bob"));
        ledger.transfer(&auth, alice.clone(), bob.clone(), rb(1), "").unwrap();
        b.iter(|| {
            ledger
                .transfer(&auth, alice.clone(), bob.clone(), black_box(rb(1)), "")
                .unwrap();
            ledger
                .transfer(&auth, bob.clone(), alice.clone(), black_box(rb(1)), "")
                .unwrap();
        });
    });

    group.bench_function("rejected_overdraft", |b| {
        let mut ledger = setup_ledger(10);
        let auth = SignerSet::single(name("alice"));
        let (alice, bob) = (name("alice"), name("bob"));
        b.iter(|| {
            black_box(ledger.transfer(&auth, alice.clone(), bob.clone(), rb(11), "")).unwrap_err();
        });
    });

    group.finish();
}

fn bench_transfer_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("transfer_throughput");

    for batch_size in [1, 10, 100, 1000].iter() {
        group.throughput(Throughput::Elements(*batch_size as u64));
        group.bench_with_input(
            BenchmarkId::new("sequential_transfers", batch_size),
            batch_size,
            |b, &size| {
                let mut ledger = setup_ledger(rankblock_core::MAX_AMOUNT / 2);
                let auth = SignerSet::single(name("alice"));
                let (alice, bob) = (name("alice"), name("bob"));
                b.iter(|| {
                    for _ in 0..size {
                        ledger
                            .transfer(&auth, alice.clone(), bob.clone(), rb(1), "")
                            .unwrap();
                    }
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_operation_latency, bench_transfer_throughput);
criterion_main!(benches);
