//! # Relay Guard Policy Benchmarks
//!
//! Every inbound message and upload goes through the policy rules, so
//! their cost should not grow with the size of the ban lists.
//!
//! | Path | Target |
//! |------|--------|
//! | `check_message` with 10k bans | < 5µs |
//! | `check_upload` with 10k blocked addresses | < 5µs |
//! | `check_filter` gift-wrap filter | < 1µs |

use std::net::{IpAddr, Ipv4Addr};

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rg_01_access_control::AccessControlState;
use rg_02_policy_engine::{rules, PolicyConfig};
use shared_types::{IdentityKey, Kind, Message, RequestContext, SubscriptionFilter};

fn hex_key(n: u32) -> IdentityKey {
    IdentityKey::new(format!("{:064x}", n))
}

fn populated_state(size: u32) -> AccessControlState {
    let mut state = AccessControlState::default();
    for n in 0..size {
        state
            .ban_identity(hex_key(n), "spam".to_string())
            .expect("distinct keys");
        let addr = IpAddr::V4(Ipv4Addr::from(0x0A00_0000 + n));
        state
            .block_address(addr, "flood".to_string())
            .expect("distinct addresses");
    }
    state
}

fn bench_check_message(c: &mut Criterion) {
    let mut group = c.benchmark_group("rg-02-check-message");
    let config = PolicyConfig::default();
    let ctx = RequestContext::anonymous().from_addr(IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1)));
    let msg = Message::new("1".repeat(64), hex_key(u32::MAX), Kind(1));

    for size in [100u32, 10_000] {
        let state = populated_state(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &state, |b, state| {
            b.iter(|| rules::check_message(black_box(state), &config, &ctx, black_box(&msg)))
        });
    }
    group.finish();
}

fn bench_check_upload(c: &mut Criterion) {
    let mut group = c.benchmark_group("rg-02-check-upload");
    let config = PolicyConfig::default();
    let state = populated_state(10_000);
    let blocked = RequestContext::anonymous().from_addr(IpAddr::V4(Ipv4Addr::from(0x0A00_0010)));
    let actor = hex_key(u32::MAX);

    group.bench_function("blocked-address", |b| {
        b.iter(|| rules::check_upload(black_box(&state), &config, &blocked, black_box(&actor)))
    });
    group.finish();
}

fn bench_check_filter(c: &mut Criterion) {
    let reader = hex_key(7);
    let ctx = RequestContext::anonymous().authenticated(reader.clone());
    let filter = SubscriptionFilter::new()
        .kind(Kind::GIFT_WRAP)
        .tag("#p", ["p", reader.as_str()]);

    c.bench_function("rg-02-check-filter/gift-wrap", |b| {
        b.iter(|| rules::check_filter(black_box(&ctx), black_box(&filter)))
    });
}

criterion_group!(benches, bench_check_message, bench_check_upload, bench_check_filter);
criterion_main!(benches);
