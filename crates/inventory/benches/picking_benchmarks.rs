use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use palletrack_catalog::Category;
use palletrack_core::SlotId;
use palletrack_inventory::{BatchMode, ReceiptLine, Warehouse};
use palletrack_locations::SlotRange;

/// One lot of one SKU spread over `slots` positions with varied balances.
fn spread_lot(slots: u32) -> Warehouse {
    let mut wh = Warehouse::new();
    wh.add_slot_range(SlotRange::new("R", "1", 1..=slots, 1..=1).unwrap())
        .unwrap();
    for slot in 1..=slots {
        let line = ReceiptLine {
            sku: "SOY-900".to_string(),
            name: "Soybean oil".to_string(),
            category: Category::Oil,
            quantity: u64::from(slot % 17 + 1),
            lot_number: "L1".to_string(),
            slot_id: SlotId::new(format!("R1.{slot:02}.001")),
            image_url: None,
        };
        wh.receive(line).unwrap();
    }
    wh
}

fn bench_plan_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan_dispatch");

    for slots in [10u32, 100, 1_000].iter() {
        let wh = spread_lot(*slots);
        let target = wh.ledger().total_units() / 2;
        group.throughput(Throughput::Elements(u64::from(*slots)));
        group.bench_with_input(BenchmarkId::new("half_of_lot", slots), &wh, |b, wh| {
            b.iter(|| {
                let plan = wh.plan_dispatch("SOY-900", "L1", black_box(target)).unwrap();
                black_box(plan);
            });
        });
    }

    group.finish();
}

fn bench_execute_pick_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("execute_pick_plan");
    group.sample_size(50);

    for mode in [BatchMode::ContinueOnError, BatchMode::AllOrNothing] {
        let wh = spread_lot(200);
        let plan = wh
            .plan_dispatch("SOY-900", "L1", wh.ledger().total_units() / 2)
            .unwrap();
        group.bench_with_input(BenchmarkId::new("half_of_lot", mode), &plan, |b, plan| {
            b.iter_batched(
                || wh.clone(),
                |mut wh| black_box(wh.execute_pick_plan(plan, mode)),
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_plan_dispatch, bench_execute_pick_plan);
criterion_main!(benches);
