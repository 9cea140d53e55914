//! Benchmarks for membership reconciliation.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use rollcall::config::SessionConfig;
use rollcall::directory::memory::InMemoryDirectory;
use rollcall::group::GroupRecord;
use rollcall::scope::Scope;
use rollcall::session::MembershipSession;
use rollcall::subject::SubjectProfile;

fn fixture_directory() -> InMemoryDirectory {
    let scope = Scope::new("/org").unwrap();
    let groups = (1..=500)
        .map(|i| {
            GroupRecord::new(
                format!("g-{i:04}"),
                format!("Group {i:04}"),
                scope.clone(),
                i % 4 != 0,
            )
        })
        .collect();
    InMemoryDirectory::new(groups)
}

fn fixture_subject() -> SubjectProfile {
    let mut subject = SubjectProfile::new("u-bench", Scope::new("/org").unwrap());
    for i in 0..8 {
        subject = subject.with_static_membership(format!("g-{:04}", 2 * i + 1));
    }
    for i in 8..12 {
        subject = subject.with_dynamic_membership(format!("g-{:04}", 2 * i + 1));
    }
    subject
}

fn bench_cold_reconcile(c: &mut Criterion) {
    let session = MembershipSession::new(fixture_directory(), SessionConfig::default());
    let mut subject = fixture_subject();

    c.bench_function("reconcile_cold_500", |bench| {
        bench.iter(|| {
            session.invalidate();
            black_box(session.reconcile(&mut subject).unwrap())
        })
    });
}

fn bench_cached_reconcile(c: &mut Criterion) {
    let session = MembershipSession::new(fixture_directory(), SessionConfig::default());
    let mut subject = fixture_subject();
    session.reconcile(&mut subject).unwrap();

    c.bench_function("reconcile_cached_500", |bench| {
        bench.iter(|| black_box(session.reconcile(&mut subject).unwrap()))
    });
}

fn bench_filtered_search(c: &mut Criterion) {
    let session = MembershipSession::new(fixture_directory(), SessionConfig::default());
    let scope = Scope::new("/org").unwrap();

    c.bench_function("search_named_500", |bench| {
        bench.iter(|| black_box(session.search(&scope, "Group 0123").unwrap()))
    });
}

criterion_group!(
    benches,
    bench_cold_reconcile,
    bench_cached_reconcile,
    bench_filtered_search
);
criterion_main!(benches);
