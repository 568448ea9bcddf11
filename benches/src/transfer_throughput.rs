use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;
use walletpay::prelude::*;

struct InstantApproval;

#[async_trait]
impl Authorizer for InstantApproval {
    async fn authorize(&self, _transfer: &Transfer) -> Result<bool, AuthorizationError> {
        Ok(true)
    }
}

type Bench = TransferOrchestrator<
    Arc<InMemoryLedger>,
    Arc<InMemoryLedger>,
    InstantApproval,
    QueueNotifier<ChannelPublisher>,
>;

/// Ledger with `num_accounts` funded wallets and an orchestrator over it
fn setup(num_accounts: usize) -> (Bench, Vec<Identifier>) {
    let ledger = Arc::new(InMemoryLedger::new());
    let ids: Vec<Identifier> = (0..num_accounts)
        .map(|i| {
            let id = Identifier::generate();
            ledger
                .insert_account(&Account::new(
                    id,
                    format!("Account {i}"),
                    format!("account{i}@example.com"),
                    Credential::new("pw"),
                    Role::Ordinary,
                    Some(Money::new(Currency::Ngn, Amount::from_minor_units(1_000_000_000))),
                    Utc::now(),
                ))
                .unwrap();
            id
        })
        .collect();

    // Receiver dropped: publishing fails and is only logged
    let (publisher, _) = ChannelPublisher::new(1);
    let orchestrator = TransferOrchestrator::new(
        Arc::clone(&ledger),
        ledger,
        InstantApproval,
        QueueNotifier::new(publisher, "bench"),
    );
    (orchestrator, ids)
}

/// Benchmark sequential transfers with different account counts
fn bench_sequential_transfers(c: &mut Criterion) {
    let mut group = c.benchmark_group("sequential_transfers");
    let runtime = Runtime::new().unwrap();

    for num_accounts in [2usize, 100, 10_000] {
        group.bench_with_input(
            BenchmarkId::from_parameter(num_accounts),
            &num_accounts,
            |b, &num_accounts| {
                let (orchestrator, ids) = setup(num_accounts);
                let cancel = CancellationToken::new();
                let mut i = 0usize;

                b.to_async(&runtime).iter(|| {
                    let payer = ids[i % ids.len()];
                    let payee = ids[(i + 1) % ids.len()];
                    i += 1;
                    let request =
                        CreateTransferRequest::new(payer.to_string(), payee.to_string(), 1);
                    let orchestrator = &orchestrator;
                    let cancel = &cancel;
                    async move { black_box(orchestrator.create_transfer(&request, cancel).await) }
                });
            },
        );
    }

    group.finish();
}

/// Benchmark a burst of concurrent transfers, contended vs spread out
fn bench_concurrent_transfers(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_transfers");
    let runtime = Runtime::new().unwrap();

    for (name, num_accounts) in [("hot_pair", 2usize), ("spread_1000", 1_000)] {
        group.bench_function(name, |b| {
            let (orchestrator, ids) = setup(num_accounts);
            let cancel = CancellationToken::new();

            b.to_async(&runtime).iter_batched(
                || {
                    (0..256)
                        .map(|i| {
                            CreateTransferRequest::new(
                                ids[i % ids.len()].to_string(),
                                ids[(i + 1) % ids.len()].to_string(),
                                1,
                            )
                        })
                        .collect::<Vec<_>>()
                },
                |requests| {
                    let orchestrator = &orchestrator;
                    let cancel = &cancel;
                    async move {
                        let results = futures::future::join_all(
                            requests.iter().map(|r| orchestrator.create_transfer(r, cancel)),
                        )
                        .await;
                        black_box(results)
                    }
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_sequential_transfers, bench_concurrent_transfers);
criterion_main!(benches);
