use std::sync::Arc;

use chrono::Utc;
use easykatka::adapter::notifier::DeliveryNotifier;
use easykatka::app::{ChangeMonitor, Roster};
use easykatka::domain::{HeroCatalog, MatchId};
use easykatka::port::ChatId;
use easykatka::testkit::delivery::{RecordingDelivery, Sent};
use easykatka::testkit::domain::{account, feed, match_record};
use easykatka::testkit::provider::FakeProvider;

#[tokio::test]
async fn new_matches_reach_the_notification_chat_in_order() {
    let (a, b) = (account(1), account(2));
    let provider = FakeProvider::new()
        .with_profile(a, "Dendi", "")
        .with_profile(b, "Puppey", "")
        .with_feed(a, feed(&[1]))
        .with_feed(a, vec![match_record(3, 2, false), match_record(2, 1, true), match_record(1, 1, true)])
        .with_feed(b, feed(&[50]))
        .with_feed(b, feed(&[50]));
    let delivery = Arc::new(RecordingDelivery::new());
    let notifier = Arc::new(DeliveryNotifier::new(delivery.clone(), ChatId(-100)));
    let roster = Roster::from_accounts(vec![a, b]).unwrap();

    let mut monitor = ChangeMonitor::new(
        Arc::new(provider),
        Arc::new(HeroCatalog::new([(1, "Axe"), (2, "Pudge")])),
        roster,
        notifier,
    )
    .with_timezone(Utc);

    monitor.prime_names().await;
    let cold = monitor.poll_cycle().await;
    assert_eq!(cold.notified, 0);
    assert!(delivery.sent().is_empty());

    let warm = monitor.poll_cycle().await;
    assert_eq!(warm.notified, 2);
    assert_eq!(monitor.watermarks().get(a), Some(MatchId(3)));
    assert_eq!(monitor.watermarks().get(b), Some(MatchId(50)));

    let sent = delivery.sent();
    assert_eq!(
        sent[0],
        Sent::Text {
            chat: ChatId(-100),
            text: "New match: Dendi | Axe | ✅ | 1/1/1 | 30:00 | 2023-11-14 22:13".to_string(),
            mode: None,
        }
    );
    assert_eq!(
        sent[1].text(),
        "New match: Dendi | Pudge | ❌ | 1/1/1 | 30:00 | 2023-11-14 22:13"
    );
}

#[tokio::test]
async fn delivery_failures_do_not_stop_the_cycle() {
    let (a, b) = (account(1), account(2));
    let provider = FakeProvider::new()
        .with_feed(a, feed(&[1]))
        .with_feed(a, feed(&[2, 1]))
        .with_feed(b, feed(&[7]))
        .with_feed(b, feed(&[8, 7]));
    let delivery = Arc::new(RecordingDelivery::new());
    delivery.fail_sends(true);
    let notifier = Arc::new(DeliveryNotifier::new(delivery.clone(), ChatId(1)));

    let mut monitor = ChangeMonitor::new(
        Arc::new(provider),
        Arc::new(HeroCatalog::default()),
        Roster::from_accounts(vec![a, b]).unwrap(),
        notifier,
    );

    monitor.poll_cycle().await;
    let report = monitor.poll_cycle().await;
    assert_eq!(report.notified, 2);
    assert_eq!(report.failed, 0);
    assert_eq!(monitor.watermarks().get(b), Some(MatchId(8)));
}
