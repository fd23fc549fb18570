use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use easykatka::adapter::telegram::{
    CommandContext, CommandHandler, CommandRegistry, DispatchSettings, Dispatcher, Responder,
};
use easykatka::app::{App, Config, ReportSettings, Roster, Services, TeammateSource};
use easykatka::domain::HeroCatalog;
use easykatka::error::{DeliveryError, Error};
use easykatka::port::{ChatId, ParseMode};
use easykatka::testkit::delivery::{empty_update, text_update, RecordingDelivery, Sent};
use easykatka::testkit::domain::{account, feed, peer};
use easykatka::testkit::provider::FakeProvider;

fn roster(ids: &[i64]) -> Roster {
    Roster::from_accounts(ids.iter().map(|id| account(*id)).collect()).expect("non-empty roster")
}

fn context(provider: Arc<FakeProvider>, ids: &[i64]) -> CommandContext {
    CommandContext {
        provider,
        roster: Arc::new(roster(ids)),
        heroes: Arc::new(HeroCatalog::new([(1, "Axe")])),
        settings: ReportSettings::default(),
    }
}

fn dispatcher(delivery: &Arc<RecordingDelivery>, ctx: CommandContext) -> Dispatcher {
    dispatcher_with(delivery, ctx, DispatchSettings::default())
}

fn dispatcher_with(
    delivery: &Arc<RecordingDelivery>,
    ctx: CommandContext,
    settings: DispatchSettings,
) -> Dispatcher {
    Dispatcher::new(
        delivery.clone(),
        CommandRegistry::standard(TeammateSource::Peers),
        ctx,
        settings,
    )
}

fn texts(delivery: &RecordingDelivery) -> Vec<String> {
    delivery.sent().iter().map(|s| s.text().to_string()).collect()
}

#[tokio::test]
async fn offset_moves_past_every_update() {
    let delivery = Arc::new(RecordingDelivery::new().with_poll(Ok(vec![
        empty_update(5),
        text_update(6, 1, "hello"),
        text_update(7, 1, "/chatid"),
    ])));
    let mut dispatcher = dispatcher(&delivery, context(Arc::new(FakeProvider::new()), &[1]));

    let err = dispatcher.run().await.unwrap_err();
    assert_eq!(err, DeliveryError::Rejected("poll script exhausted".to_string()));
    assert_eq!(delivery.offsets(), vec![0, 8]);
    assert_eq!(dispatcher.offset(), 8);
    assert_eq!(
        delivery.sent(),
        vec![Sent::Text {
            chat: ChatId(1),
            text: "chat_id: 1".to_string(),
            mode: None,
        }]
    );
}

#[tokio::test]
async fn chatid_answers_in_the_requesting_group() {
    let delivery = Arc::new(RecordingDelivery::new());
    let mut dispatcher = dispatcher(&delivery, context(Arc::new(FakeProvider::new()), &[1]));

    dispatcher
        .process_batch(vec![text_update(1, -42, "  /chatid@easykatka_bot  ")])
        .await
        .unwrap();
    assert_eq!(texts(&delivery), vec!["chat_id: -42"]);
}

#[tokio::test]
async fn unrecognized_messages_are_ignored() {
    let provider = Arc::new(FakeProvider::new());
    let delivery = Arc::new(RecordingDelivery::new());
    let mut dispatcher = dispatcher(&delivery, context(provider.clone(), &[1]));

    dispatcher
        .process_batch(vec![
            text_update(10, 1, "hello"),
            text_update(11, 1, "/help"),
            text_update(12, 1, "/stats"),
            empty_update(13),
        ])
        .await
        .unwrap();
    assert!(delivery.sent().is_empty());
    assert!(provider.calls().is_empty());
    assert_eq!(dispatcher.offset(), 14);
}

#[tokio::test]
async fn stat_with_avatar_sends_photo_then_table() {
    let a = account(1);
    let provider = Arc::new(
        FakeProvider::new()
            .with_profile(a, "Dendi", "https://cdn.example/avatar.jpg")
            .with_feed(a, feed(&[3, 2, 1])),
    );
    let delivery = Arc::new(RecordingDelivery::new());
    let mut dispatcher = dispatcher(&delivery, context(provider, &[1]));

    dispatcher
        .process_batch(vec![text_update(1, 7, "/stat")])
        .await
        .unwrap();

    let sent = delivery.sent();
    assert_eq!(sent.len(), 2);
    match &sent[0] {
        Sent::Photo { chat, url, caption, mode } => {
            assert_eq!(*chat, ChatId(7));
            assert_eq!(url, "https://cdn.example/avatar.jpg");
            let caption = caption.as_deref().unwrap();
            assert!(caption.starts_with("<b>Recent matches (Dendi)</b>\n"));
            assert!(caption.contains("Win rate (last 20): 100.0%"));
            assert_eq!(*mode, Some(ParseMode::Html));
        }
        other => panic!("expected photo, got {other:?}"),
    }
    match &sent[1] {
        Sent::Text { text, mode, .. } => {
            assert!(text.starts_with("<pre>"));
            assert!(text.ends_with("</pre>"));
            assert_eq!(text.matches("Axe").count(), 3);
            assert_eq!(*mode, Some(ParseMode::Html));
        }
        other => panic!("expected text, got {other:?}"),
    }
}

#[tokio::test]
async fn stat_without_avatar_prefixes_first_chunk() {
    let a = account(1);
    let provider = Arc::new(
        FakeProvider::new()
            .with_profile(a, "<b>oss</b>", "")
            .with_feed(a, feed(&[1])),
    );
    let delivery = Arc::new(RecordingDelivery::new());
    let mut dispatcher = dispatcher(&delivery, context(provider, &[1]));

    dispatcher
        .process_batch(vec![text_update(1, 7, "/stat")])
        .await
        .unwrap();

    let texts = texts(&delivery);
    assert_eq!(texts.len(), 1);
    assert!(texts[0].starts_with("<b>Recent matches (&lt;b&gt;oss&lt;/b&gt;)</b>\n"));
    assert!(texts[0].contains("</b>\n<pre>"));
}

#[tokio::test]
async fn stat_failure_for_one_player_continues_with_the_next() {
    let provider = Arc::new(
        FakeProvider::new()
            .failing(account(1))
            .with_feed(account(2), feed(&[1])),
    );
    let delivery = Arc::new(RecordingDelivery::new());
    let mut dispatcher = dispatcher(&delivery, context(provider, &[1, 2]));

    dispatcher
        .process_batch(vec![text_update(1, 7, "/stat")])
        .await
        .unwrap();

    let sent = delivery.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(
        sent[0],
        Sent::Text {
            chat: ChatId(7),
            text: "Error: request fake://profile/1 failed: 503: unavailable".to_string(),
            mode: None,
        }
    );
    assert!(sent[1].text().starts_with("<b>Recent matches (unknown)</b>"));
}

#[tokio::test]
async fn long_reports_are_split_into_ordered_chunks() {
    let a = account(1);
    let provider = Arc::new(
        FakeProvider::new()
            .with_profile(a, "Dendi", "")
            .with_feed(a, feed(&[10, 9, 8, 7, 6, 5, 4, 3, 2, 1])),
    );
    let delivery = Arc::new(RecordingDelivery::new());
    let settings = DispatchSettings {
        max_message_len: 150,
        ..DispatchSettings::default()
    };
    let mut dispatcher = dispatcher_with(&delivery, context(provider, &[1]), settings);

    dispatcher
        .process_batch(vec![text_update(1, 7, "/stat")])
        .await
        .unwrap();

    let texts = texts(&delivery);
    assert!(texts.len() > 1);
    assert!(texts[0].starts_with("<b>Recent matches (Dendi)</b>"));
    let mut joined = String::new();
    for (i, text) in texts.iter().enumerate() {
        let open = text.find("<pre>").unwrap();
        if i > 0 {
            assert_eq!(open, 0, "continuation {i} has a header");
        }
        assert!(text.ends_with("</pre>"));
        let body = &text[open + "<pre>".len()..text.len() - "</pre>".len()];
        assert!(body.chars().count() <= 150 - 11, "chunk {i} too long");
        joined.push_str(body);
    }
    assert_eq!(joined.matches("Axe").count(), 10);
}

#[tokio::test]
async fn rating_replies_with_titled_leaderboard() {
    let a = account(1);
    let provider = Arc::new(
        FakeProvider::new()
            .with_profile(a, "Dendi", "")
            .with_feed(a, feed(&[2, 1])),
    );
    let delivery = Arc::new(RecordingDelivery::new());
    let mut dispatcher = dispatcher(&delivery, context(provider, &[1]));

    dispatcher
        .process_batch(vec![text_update(1, 7, "/rating")])
        .await
        .unwrap();

    let texts = texts(&delivery);
    assert_eq!(texts.len(), 1);
    assert!(texts[0].starts_with("<b>Win rate leaderboard (last 20)</b>\n<pre>"));
    assert!(texts[0].contains("Dendi"));
}

#[tokio::test]
async fn friends_rejects_bad_sample_size() {
    let provider = Arc::new(FakeProvider::new());
    let delivery = Arc::new(RecordingDelivery::new());
    let mut dispatcher = dispatcher(&delivery, context(provider.clone(), &[1]));

    dispatcher
        .process_batch(vec![
            text_update(1, 7, "/friends abc"),
            text_update(2, 7, "/friends 0"),
        ])
        .await
        .unwrap();

    assert_eq!(
        texts(&delivery),
        vec!["Error: usage: /friends <number>", "Error: usage: /friends <number>"]
    );
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn friends_passes_sample_size_upstream() {
    let a = account(1);
    let provider = Arc::new(FakeProvider::new().with_peers(a, vec![peer(2, Some("B"), 5)]));
    let delivery = Arc::new(RecordingDelivery::new());
    let mut dispatcher = dispatcher(&delivery, context(provider.clone(), &[1]));

    dispatcher
        .process_batch(vec![text_update(1, 7, "/friends@bot 5")])
        .await
        .unwrap();

    assert!(provider.calls().contains(&"with:1:2:5".to_string()));
    let texts = texts(&delivery);
    assert!(texts[0].starts_with("<b>Best teammates by win rate (last 5 games)</b>\n<pre>"));
    assert!(texts[0].contains("no data"));
}

#[tokio::test]
async fn failed_reply_is_fatal() {
    let delivery = Arc::new(RecordingDelivery::new());
    delivery.fail_sends(true);
    let mut dispatcher = dispatcher(&delivery, context(Arc::new(FakeProvider::new()), &[1]));

    let err = dispatcher
        .process_batch(vec![text_update(4, 7, "/chatid"), text_update(5, 7, "/chatid")])
        .await
        .unwrap_err();
    assert_eq!(err, DeliveryError::Rejected("sends disabled".to_string()));
    assert_eq!(dispatcher.offset(), 5);
}

#[tokio::test]
async fn failed_error_reply_is_tolerated() {
    let provider = Arc::new(FakeProvider::new().failing(account(1)));
    let delivery = Arc::new(RecordingDelivery::new());
    delivery.fail_sends(true);
    let mut dispatcher = dispatcher(&delivery, context(provider, &[1]));

    dispatcher
        .process_batch(vec![text_update(1, 7, "/rating"), text_update(2, 7, "/friends x")])
        .await
        .unwrap();
    assert_eq!(dispatcher.offset(), 3);
}

#[tokio::test(start_paused = true)]
async fn transport_failures_are_retried_after_delay() {
    let delivery = Arc::new(
        RecordingDelivery::new()
            .with_poll(Err(DeliveryError::Transport("connection reset".to_string())))
            .with_poll(Ok(vec![text_update(3, 1, "/chatid")])),
    );
    let mut dispatcher = dispatcher(&delivery, context(Arc::new(FakeProvider::new()), &[1]));

    let started = tokio::time::Instant::now();
    let err = dispatcher.run().await.unwrap_err();
    assert!(!err.is_transport());
    assert!(started.elapsed() >= Duration::from_secs(2));
    assert_eq!(delivery.offsets(), vec![0, 0, 4]);
    assert_eq!(texts(&delivery), vec!["chat_id: 1"]);
}

#[tokio::test]
async fn rejected_poll_is_fatal() {
    let delivery = Arc::new(
        RecordingDelivery::new()
            .with_poll(Err(DeliveryError::Rejected("Unauthorized".to_string())))
            .with_poll(Ok(vec![text_update(1, 1, "/chatid")])),
    );
    let mut dispatcher = dispatcher(&delivery, context(Arc::new(FakeProvider::new()), &[1]));

    let err = dispatcher.run().await.unwrap_err();
    assert_eq!(err, DeliveryError::Rejected("Unauthorized".to_string()));
    assert_eq!(delivery.offsets(), vec![0]);
    assert!(delivery.sent().is_empty());
}

struct Ping;

#[async_trait]
impl CommandHandler for Ping {
    async fn handle(
        &self,
        _ctx: &CommandContext,
        args: &[&str],
        reply: &Responder<'_>,
    ) -> Result<(), DeliveryError> {
        reply.plain(&format!("pong {}", args.join(" "))).await
    }
}

#[tokio::test]
async fn custom_registry_routes_only_its_commands() {
    let delivery = Arc::new(RecordingDelivery::new());
    let registry = CommandRegistry::new().register("ping", "Liveness check", Ping);
    let mut dispatcher = Dispatcher::new(
        delivery.clone(),
        registry,
        context(Arc::new(FakeProvider::new()), &[1]),
        DispatchSettings::default(),
    );

    dispatcher
        .process_batch(vec![text_update(1, 7, "/ping a b"), text_update(2, 7, "/chatid")])
        .await
        .unwrap();
    assert_eq!(texts(&delivery), vec!["pong a b"]);
}

#[tokio::test]
async fn bot_mode_ends_with_delivery_error() {
    let provider = Arc::new(FakeProvider::new());
    let delivery = Arc::new(RecordingDelivery::new().with_poll(Ok(vec![text_update(1, 9, "/chatid")])));
    let services = Services {
        provider,
        heroes: Arc::new(HeroCatalog::default()),
        roster: roster(&[1]),
    };

    let err = App::bot(
        &Config::default(),
        services,
        delivery.clone(),
        CommandRegistry::standard(TeammateSource::Roster),
        None,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, Error::Delivery(DeliveryError::Rejected(_))));
    assert_eq!(texts(&delivery), vec!["chat_id: 9"]);
}
