//! # Reports → Moderation Queue → Bans

use rg_02_policy_engine::PolicyConfig;
use rg_03_admin_dispatch::AdminRequest;
use serde_json::json;
use shared_types::{ContentId, Kind, Message, RequestContext, Tag};

use super::fixtures::{key, message, root, TestRelay};

fn report(id_char: char, target: &Message, text: &str) -> Message {
    Message::new(id_char.to_string().repeat(64), key('8'), Kind::REPORTING)
        .with_tag(Tag::new(["e", target.id.as_str(), "spam"]))
        .with_tag(Tag::new(["p", target.author.as_str()]))
        .with_content(text)
}

#[tokio::test]
async fn test_stored_report_queues_content_for_moderation() {
    let offending = message('1', &key('a'), 1);
    let relay = TestRelay::new(PolicyConfig::default(), vec![offending.clone()]).await;

    let flagged = relay
        .policy
        .on_message_stored(&report('2', &offending, "scam link"))
        .await
        .unwrap();
    assert_eq!(flagged, 1);

    let listed = relay
        .dispatcher
        .handle(&root(), &AdminRequest::new("listeventsneedingmoderation", vec![]))
        .await
        .unwrap();
    assert_eq!(
        listed.to_json(),
        json!([{"id": offending.id.as_str(), "reason": "scam link"}])
    );
}

#[tokio::test]
async fn test_only_report_kind_with_full_ids_is_queued() {
    let relay = TestRelay::open().await;
    let target = message('1', &key('a'), 1);

    let not_a_report = Message::new("3".repeat(64), key('8'), Kind(1))
        .with_tag(Tag::new(["e", target.id.as_str()]));
    let short_id = Message::new("4".repeat(64), key('8'), Kind::REPORTING)
        .with_tag(Tag::new(["e", "abc"]));

    let cases = vec![not_a_report, short_id];
    for msg in cases {
        assert_eq!(
            relay.policy.on_message_stored(&msg).await.unwrap(),
            0,
            "Failed for: {}",
            msg.id
        );
    }
    assert!(relay.store.list_pending_moderation().await.is_empty());
}

#[tokio::test]
async fn test_repeated_report_replaces_text() {
    let relay = TestRelay::open().await;
    let target = message('1', &key('a'), 1);

    relay
        .policy
        .on_message_stored(&report('2', &target, "first"))
        .await
        .unwrap();
    relay
        .policy
        .on_message_stored(&report('3', &target, "second"))
        .await
        .unwrap();

    assert_eq!(
        relay.store.list_pending_moderation().await,
        vec![(ContentId::from(target.id.as_str()), "second".to_string())]
    );
}

#[tokio::test]
async fn test_moderator_bans_reported_content() {
    let offending = message('1', &key('a'), 1);
    let relay = TestRelay::new(PolicyConfig::default(), vec![offending.clone()]).await;

    relay
        .policy
        .on_message_stored(&report('2', &offending, "illegal"))
        .await
        .unwrap();

    let queue = relay.store.list_pending_moderation().await;
    let (id, reason) = &queue[0];
    relay
        .dispatcher
        .handle(
            &root(),
            &AdminRequest::new("banevent", vec![json!(id.as_str()), json!(reason)]),
        )
        .await
        .unwrap();

    assert!(relay.content.is_empty());
    assert_eq!(
        relay
            .policy
            .evaluate_incoming_message(&RequestContext::anonymous(), &offending)
            .await
            .message(),
        "blocked: event is banned"
    );
    assert_eq!(
        relay.store.list_banned_content().await,
        vec![(id.clone(), "illegal".to_string())]
    );
}
