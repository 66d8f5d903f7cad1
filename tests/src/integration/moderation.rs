//! # Admin Commands → Policy Decisions
//!
//! Every scenario issues commands through `AdminDispatcher::handle` and
//! observes the effect through `PolicyEngine`.

use std::net::IpAddr;

use rg_01_access_control::{AdminMethod, ErrorClass, MethodSet, Notice};
use rg_02_policy_engine::{PolicyConfig, PolicyDecision, RejectReason};
use rg_03_admin_dispatch::{AdminRequest, DispatchError};
use serde_json::json;
use shared_types::{Kind, RequestContext};

use super::fixtures::{key, message, root, TestRelay};

fn addr(s: &str) -> IpAddr {
    s.parse().unwrap()
}

// =============================================================================
// BLOCK / UNBLOCK ROUND TRIP
// =============================================================================

#[tokio::test]
async fn test_blocking_an_address_forbids_uploads_until_unblocked() {
    let relay = TestRelay::open().await;
    let uploader = key('7');
    let blocked = RequestContext::anonymous().from_addr(addr("192.0.2.7"));
    let elsewhere = RequestContext::anonymous().from_addr(addr("198.51.100.1"));

    let decision = relay
        .policy
        .evaluate_upload_request(&blocked, &uploader, 1024, "png")
        .await;
    assert!(!decision.is_rejected());
    assert_eq!(decision.status.http_code(), 200);

    let response = relay
        .dispatcher
        .handle(&root(), &AdminRequest::new("blockip", vec![json!("192.0.2.7"), json!("abuse")]))
        .await
        .unwrap();
    assert_eq!(response.to_json(), json!(true));

    let decision = relay
        .policy
        .evaluate_upload_request(&blocked, &uploader, 1024, "png")
        .await;
    assert!(decision.is_rejected());
    assert_eq!(decision.status.http_code(), 403);
    assert_eq!(decision.decision.message(), "blocked: this address is blocked");

    let other = relay
        .policy
        .evaluate_upload_request(&elsewhere, &uploader, 1024, "png")
        .await;
    assert!(!other.is_rejected());

    let msg = message('1', &uploader, 1);
    assert_eq!(
        relay.policy.evaluate_incoming_message(&blocked, &msg).await,
        PolicyDecision::Reject(RejectReason::AddressBlocked)
    );

    relay
        .dispatcher
        .handle(&root(), &AdminRequest::new("unblockip", vec![json!("192.0.2.7"), json!("appeal")]))
        .await
        .unwrap();

    let decision = relay
        .policy
        .evaluate_upload_request(&blocked, &uploader, 1024, "png")
        .await;
    assert!(!decision.is_rejected());
    assert_eq!(decision.status.http_code(), 200);

    assert_eq!(
        relay.notices.notices(),
        vec![
            Notice::AddressBlocked {
                addr: addr("192.0.2.7"),
                reason: "abuse".into()
            },
            Notice::AddressUnblocked {
                addr: addr("192.0.2.7"),
                reason: "appeal".into()
            },
        ]
    );
}

#[tokio::test]
async fn test_unblocking_an_address_that_was_never_blocked_is_not_found() {
    let relay = TestRelay::open().await;

    let err = relay
        .dispatcher
        .handle(&root(), &AdminRequest::new("unblockip", vec![json!("203.0.113.5")]))
        .await
        .unwrap_err();

    assert_eq!(err.class(), ErrorClass::NotFound);
    assert!(relay.notices.notices().is_empty());
}

// =============================================================================
// IDENTITY BANS
// =============================================================================

#[tokio::test]
async fn test_banning_an_identity_purges_content_and_rejects_new_messages() {
    let spammer = key('c');
    let neighbour = key('9');
    let spam = vec![message('1', &spammer, 1), message('2', &spammer, 7)];
    let kept = message('3', &neighbour, 1);

    let mut content = spam.clone();
    content.push(kept.clone());
    let relay = TestRelay::new(PolicyConfig::default(), content).await;

    relay
        .dispatcher
        .handle(
            &root(),
            &AdminRequest::new("banpubkey", vec![json!(spammer.as_str()), json!("spam")]),
        )
        .await
        .unwrap();

    for msg in &spam {
        assert!(!relay.content.contains(msg), "Failed for: {}", msg.id);
    }
    assert!(relay.content.contains(&kept));

    let ctx = RequestContext::anonymous();
    assert_eq!(
        relay
            .policy
            .evaluate_incoming_message(&ctx, &message('4', &spammer, 1))
            .await
            .message(),
        "blocked: you are banned"
    );
    assert_eq!(
        relay
            .policy
            .evaluate_incoming_message(&ctx, &message('5', &neighbour, 1))
            .await,
        PolicyDecision::Accept
    );

    let uploads = relay
        .policy
        .evaluate_upload_request(&ctx, &spammer, 10, "jpg")
        .await;
    assert_eq!(uploads.status.http_code(), 403);

    let listed = relay
        .dispatcher
        .handle(&root(), &AdminRequest::new("listbannedpubkeys", vec![]))
        .await
        .unwrap();
    assert_eq!(
        listed.to_json(),
        json!([{"pubkey": spammer.as_str(), "reason": "spam"}])
    );
}

#[tokio::test]
async fn test_allowing_a_banned_identity_is_rejected() {
    let relay = TestRelay::open().await;
    let target = key('f');

    relay
        .dispatcher
        .handle(&root(), &AdminRequest::new("banpubkey", vec![json!(target.as_str())]))
        .await
        .unwrap();

    let err = relay
        .dispatcher
        .handle(&root(), &AdminRequest::new("allowpubkey", vec![json!(target.as_str())]))
        .await
        .unwrap_err();

    assert!(matches!(err, DispatchError::Store(_)));
    assert!(relay.store.list_allowed_identities().await.is_empty());
}

#[tokio::test]
async fn test_failed_cascade_leaves_identity_unbanned() {
    let spammer = key('c');
    let relay = TestRelay::new(PolicyConfig::default(), vec![message('1', &spammer, 1)]).await;
    relay.content.fail_deletes(true);

    let err = relay
        .dispatcher
        .handle(&root(), &AdminRequest::new("banpubkey", vec![json!(spammer.as_str())]))
        .await
        .unwrap_err();

    assert_eq!(err.class(), ErrorClass::DependentOperationFailure);
    assert!(relay.store.list_banned_identities().await.is_empty());
    assert_eq!(
        relay
            .policy
            .evaluate_incoming_message(&RequestContext::anonymous(), &message('2', &spammer, 1))
            .await,
        PolicyDecision::Accept
    );
}

// =============================================================================
// ALLOW LISTS
// =============================================================================

#[tokio::test]
async fn test_identity_allow_list_admits_only_allowed_identities() {
    let config = PolicyConfig {
        identity_allow_list: true,
        kind_allow_list: false,
    };
    let relay = TestRelay::new(config, Vec::new()).await;
    let member = key('b');
    let ctx = RequestContext::anonymous();

    assert_eq!(
        relay
            .policy
            .evaluate_incoming_message(&ctx, &message('1', &member, 1))
            .await
            .message(),
        "restricted: you are not allowed"
    );

    relay
        .dispatcher
        .handle(
            &root(),
            &AdminRequest::new("allowpubkey", vec![json!(member.as_str()), json!("paid")]),
        )
        .await
        .unwrap();

    assert_eq!(
        relay
            .policy
            .evaluate_incoming_message(&ctx, &message('1', &member, 1))
            .await,
        PolicyDecision::Accept
    );
    assert!(!relay
        .policy
        .evaluate_upload_request(&ctx, &member, 1, "mp4")
        .await
        .is_rejected());
}

#[tokio::test]
async fn test_kind_rules() {
    let config = PolicyConfig {
        identity_allow_list: false,
        kind_allow_list: true,
    };
    let relay = TestRelay::new(config, Vec::new()).await;
    let author = key('a');
    let ctx = RequestContext::anonymous();

    relay
        .dispatcher
        .handle(&root(), &AdminRequest::new("allowkind", vec![json!(1)]))
        .await
        .unwrap();
    relay
        .dispatcher
        .handle(&root(), &AdminRequest::new("disallowkind", vec![json!(4)]))
        .await
        .unwrap();

    let cases = vec![
        (1u16, ""),
        (4, "blocked: kind not allowed"),
        (30023, "restricted: kind not allowed"),
    ];

    for (kind, expected) in cases {
        let decision = relay
            .policy
            .evaluate_incoming_message(&ctx, &message('1', &author, kind))
            .await;
        match expected {
            "" => assert_eq!(decision, PolicyDecision::Accept, "Failed for: {}", kind),
            text => assert_eq!(decision.message(), text, "Failed for: {}", kind),
        }
    }

    let listed = relay
        .dispatcher
        .handle(&root(), &AdminRequest::new("listallowedkinds", vec![]))
        .await
        .unwrap();
    assert_eq!(listed.to_json(), json!([1]));
    assert_eq!(relay.store.list_disallowed_kinds().await, vec![Kind(4)]);
}

// =============================================================================
// DELEGATED ADMINS
// =============================================================================

#[tokio::test]
async fn test_delegated_moderator_is_limited_to_granted_methods() {
    let author = key('a');
    let bad = message('b', &author, 1);
    let relay = TestRelay::new(PolicyConfig::default(), vec![bad.clone()]).await;
    let moderator = key('d');

    relay
        .dispatcher
        .handle(
            &root(),
            &AdminRequest::new(
                "grantadmin",
                vec![json!(moderator.as_str()), json!(["banevent", "listbannedevents"])],
            ),
        )
        .await
        .unwrap();

    relay
        .dispatcher
        .handle(
            &moderator,
            &AdminRequest::new("banevent", vec![json!(bad.id.as_str()), json!("illegal")]),
        )
        .await
        .unwrap();
    assert!(!relay.content.contains(&bad));
    assert_eq!(
        relay
            .policy
            .evaluate_incoming_message(&RequestContext::anonymous(), &bad)
            .await
            .message(),
        "blocked: event is banned"
    );

    let err = relay
        .dispatcher
        .handle(&moderator, &AdminRequest::new("blockip", vec![json!("192.0.2.1")]))
        .await
        .unwrap_err();
    assert!(matches!(err, DispatchError::MethodNotPermitted { .. }));
    assert!(relay.store.list_blocked_addresses().await.is_empty());

    let revoked = relay
        .dispatcher
        .handle(
            &root(),
            &AdminRequest::new(
                "revokeadmin",
                vec![json!(moderator.as_str()), json!(["banevent", "listbannedevents"])],
            ),
        )
        .await
        .unwrap();
    assert_eq!(revoked.to_json(), json!(true));
    assert_eq!(relay.store.admin_methods(&moderator).await, None);

    let err = relay
        .dispatcher
        .handle(&moderator, &AdminRequest::new("listbannedevents", vec![]))
        .await
        .unwrap_err();
    assert!(matches!(err, DispatchError::NotAnAdmin(_)));
}

#[tokio::test]
async fn test_wildcard_grant_reaches_every_method() {
    let relay = TestRelay::open().await;
    let deputy = key('e');

    relay
        .dispatcher
        .handle(&root(), &AdminRequest::new("grantadmin", vec![json!(deputy.as_str()), json!(["*"])]))
        .await
        .unwrap();

    let methods = relay.store.admin_methods(&deputy).await.unwrap();
    for method in AdminMethod::ALL {
        assert!(
            rg_01_access_control::permits(&methods, *method),
            "Failed for: {}",
            method
        );
    }
    assert_eq!(methods, MethodSet::from([AdminMethod::Wildcard]));
}
