use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use fee_keeper::{run, run_async, Ledger, MemoryBackend, PaymentPolicy};
use std::fmt::Write as _;
use std::io;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use tokio::runtime::Runtime;

const STUDENTS: usize = 200;
const PAYMENTS_PER_STUDENT: usize = 50;
const COMMANDS: usize = STUDENTS * (PAYMENTS_PER_STUDENT + 1);

/// Adds every student, then interleaves their payments.
fn write_script(path: &Path) {
    let mut script = String::from("command,id,name,amount\n");
    for s in 0..STUDENTS {
        writeln!(script, "add,S{},Student {},10000.00", s, s).unwrap();
    }
    for p in 0..PAYMENTS_PER_STUDENT {
        for s in 0..STUDENTS {
            writeln!(script, "pay,S{},,{}.25", s, p % 7).unwrap();
        }
    }
    std::fs::write(path, script).unwrap();
}

fn replay_commands(c: &mut Criterion) {
    let dir = TempDir::new().unwrap();
    let script = dir.path().join("commands.csv");
    write_script(&script);

    let mut group = c.benchmark_group("throughput");

    group.throughput(Throughput::Elements(COMMANDS as u64));
    group.measurement_time(Duration::from_secs(20));
    group.sample_size(30);

    group.bench_function("sync_replay_200_students_10K_payments", |b| {
        b.iter(|| {
            let (mut ledger, _) = Ledger::open(MemoryBackend::new(), PaymentPolicy::AllowCredit);
            run(&script, &mut ledger, io::sink()).unwrap();
        });
    });

    group.bench_function("async_replay_200_students_10K_payments", |b| {
        let rt = Runtime::new().unwrap();
        let script = &script;
        b.to_async(rt).iter(|| async move {
            let (ledger, _) = Ledger::open(MemoryBackend::new(), PaymentPolicy::AllowCredit);
            run_async(&script, ledger, io::sink()).await.unwrap();
        });
    });

    group.finish();
}

criterion_group!(benches, replay_commands);
criterion_main!(benches);
