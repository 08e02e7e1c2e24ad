use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use approvalgate_approval::{
    ApprovalGateService, Collaborators, GateRequest, NewCustomer, NotifierConfig, SiteInfo,
    UpdateApproval,
};
use approvalgate_core::{SessionId, UserId};
use approvalgate_infra::{
    InMemoryApprovalRepository, InMemorySessionStore, InMemoryUserDirectory, LogMailTransport,
};

fn service() -> ApprovalGateService {
    let collaborators = Collaborators {
        directory: Arc::new(InMemoryUserDirectory::new()),
        sessions: Arc::new(InMemorySessionStore::default()),
        approvals: Arc::new(InMemoryApprovalRepository::new()),
        mailer: Arc::new(LogMailTransport),
    };
    ApprovalGateService::new(
        collaborators,
        NotifierConfig {
            site: SiteInfo::new("Bench Shop", "http://localhost"),
            admin_email: "admin@example.com".to_string(),
        },
    )
}

/// Registers `n` customers and returns one signed-in session per customer.
fn populate(svc: &ApprovalGateService, n: usize) -> Vec<(UserId, SessionId)> {
    (0..n)
        .map(|i| {
            let id = svc
                .register_customer(NewCustomer {
                    username: format!("customer{i}"),
                    email: format!("customer{i}@example.com"),
                    display_name: None,
                })
                .unwrap();
            (id, svc.sign_in(&format!("customer{i}")).unwrap())
        })
        .collect()
}

fn bench_gate_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("gate_evaluate");
    group.throughput(Throughput::Elements(1));

    for users in [10usize, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::new("approved_customer", users), &users, |b, &n| {
            let svc = service();
            let admin_id = svc.ensure_administrator("admin", "admin@example.com").unwrap();
            let admin = svc.actor_for(admin_id).unwrap();
            let sessions = populate(&svc, n);
            let (target, session) = sessions[n / 2];
            svc.update_approval(&admin, UpdateApproval { user_id: target, approved: true })
                .unwrap();
            let request = GateRequest::new("/shop/", Some(session));

            b.iter(|| black_box(svc.evaluate(black_box(&request)).unwrap()));
        });
    }

    group.bench_function("anonymous", |b| {
        let svc = service();
        let request = GateRequest::new("/shop/", None);
        b.iter(|| black_box(svc.evaluate(black_box(&request)).unwrap()));
    });

    group.finish();
}

fn bench_approval_toggle(c: &mut Criterion) {
    let mut group = c.benchmark_group("approval_toggle");
    group.throughput(Throughput::Elements(2));

    // One rising edge (mail) and one re-arm per iteration.
    group.bench_function("approve_then_revoke", |b| {
        let svc = service();
        let admin_id = svc.ensure_administrator("admin", "admin@example.com").unwrap();
        let admin = svc.actor_for(admin_id).unwrap();
        let (target, _) = populate(&svc, 1)[0];

        b.iter(|| {
            for approved in [true, false] {
                black_box(
                    svc.update_approval(&admin, UpdateApproval { user_id: target, approved })
                        .unwrap(),
                );
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_gate_evaluate, bench_approval_toggle);
criterion_main!(benches);
