use std::sync::Arc;

use gymbot_push::{DispatchReport, Dispatcher, PushError};
use gymbot_schedule::Schedule;
use gymbot_subscriptions::{SubscriberStore, Topic};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::compose;
use crate::error::{ConversationError, Result};
use crate::fallback;
use crate::intent::Intent;
use crate::reply::Reply;
use crate::state::SessionState;
use crate::turn::Turn;

/// Topic users opt into from `Setup Push Notifications`.
pub const ALERT_TOPIC: Topic = Topic::ClassCanceled;

/// Result of handling one turn.
#[derive(Debug)]
pub struct TurnOutcome {
    pub reply: Reply,
    pub state: SessionState,
    /// Background push batch started by this turn. Dropping the handle
    /// detaches the batch; it still runs to completion.
    pub dispatch: Option<JoinHandle<std::result::Result<DispatchReport, PushError>>>,
}

/// Routes each turn to exactly one handler.
///
/// Holds the process-wide dependencies; constructed once at startup.
pub struct TurnRouter {
    schedule: Arc<Schedule>,
    store: Arc<dyn SubscriberStore>,
    dispatcher: Arc<Dispatcher>,
}

impl TurnRouter {
    pub fn new(
        schedule: Arc<Schedule>,
        store: Arc<dyn SubscriberStore>,
        dispatcher: Arc<Dispatcher>,
    ) -> Self {
        Self {
            schedule,
            store,
            dispatcher,
        }
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Handle one turn. Must run inside a tokio runtime, since
    /// `Test Notification` spawns its dispatch batch.
    pub fn handle(&self, turn: Turn) -> Result<TurnOutcome> {
        let mut state = turn.state;
        fallback::reset_unless_fallback(turn.intent, &mut state);
        let mut dispatch = None;

        debug!(intent = %turn.intent, fallback_count = state.fallback_count, "routing turn");
        let mut reply = match turn.intent {
            Intent::Welcome => compose::welcome(),
            Intent::ClassList => {
                let day = turn.resolved_day();
                let classes = self.schedule.class_list(day)?;
                compose::class_list(day, &classes, turn.args.from_daily_update)
            }
            Intent::SetupUpdates => compose::setup_updates(),
            Intent::FinishUpdateSetup => compose::finish_update_setup(turn.args.update_registered),
            Intent::SetupPush => compose::setup_push(ALERT_TOPIC),
            Intent::FinishPushSetup => self.finish_push_setup(&turn)?,
            Intent::ClassCanceled => {
                let day = turn.resolved_day();
                let labels = self.schedule.class_labels(day)?;
                compose::class_canceled(day, labels.first().map(String::as_str))
            }
            Intent::TestNotification => {
                info!(topic = %ALERT_TOPIC, "starting notification batch");
                dispatch = Some(self.dispatcher.spawn(ALERT_TOPIC));
                compose::notification_sent()
            }
            Intent::Fallback => compose::fallback(fallback::record_fallback(&mut state)),
            Intent::NoInput => compose::no_input(fallback::no_input_step(
                turn.args.reprompt_count,
                turn.args.final_reprompt,
            )),
        };

        if !turn.screen {
            reply.suggestions.clear();
        }

        Ok(TurnOutcome {
            reply,
            state,
            dispatch,
        })
    }

    /// Persist the opt-in when permission was granted.
    fn finish_push_setup(&self, turn: &Turn) -> Result<Reply> {
        if !turn.args.permission_granted {
            info!("push permission declined");
            return Ok(compose::push_opt_in(false));
        }

        let user_id = turn
            .args
            .updates_user_id
            .as_deref()
            .or(turn.conversation_id.as_deref())
            .ok_or(ConversationError::MissingUserId)?;

        let subscriber = self.store.add(user_id, ALERT_TOPIC)?;
        info!(id = %subscriber.id, topic = %ALERT_TOPIC, "push subscriber added");
        Ok(compose::push_opt_in(true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reply::{Directive, Helper};
    use async_trait::async_trait;
    use chrono::Weekday;
    use gymbot_push::{AccessToken, Notification, PushTransport};
    use gymbot_schedule::ScheduleEntry;
    use gymbot_subscriptions::{db::init_db, SqliteSubscriberStore};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts sends; optionally fails every one of them.
    #[derive(Default)]
    struct CountingTransport {
        sends: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl PushTransport for CountingTransport {
        async fn authorize(&self) -> gymbot_push::error::Result<AccessToken> {
            Ok(AccessToken::new("t"))
        }

        async fn send(
            &self,
            _token: &AccessToken,
            _n: &Notification,
        ) -> gymbot_push::error::Result<()> {
            self.sends.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(PushError::Api {
                    status: 503,
                    message: "unavailable".into(),
                });
            }
            Ok(())
        }
    }

    struct Fixture {
        router: TurnRouter,
        store: Arc<SqliteSubscriberStore>,
        transport: Arc<CountingTransport>,
    }

    fn fixture_with(transport: CountingTransport) -> Fixture {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        init_db(&conn).unwrap();
        let store = Arc::new(SqliteSubscriberStore::new(conn));
        let transport = Arc::new(transport);
        let dispatcher = Arc::new(Dispatcher::new(
            store.clone(),
            transport.clone(),
            "Class update",
            "en-US",
        ));
        let schedule = Arc::new(Schedule::from_entries(vec![
            ScheduleEntry::new(Weekday::Mon, "Yoga", "6am"),
            ScheduleEntry::new(Weekday::Mon, "Yoga", "6am"),
            ScheduleEntry::new(Weekday::Mon, "Spin", "7am"),
            ScheduleEntry::new(Weekday::Tue, "Zumba", "6pm"),
        ]));
        Fixture {
            router: TurnRouter::new(schedule, store.clone(), dispatcher),
            store,
            transport,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(CountingTransport::default())
    }

    fn turn(intent: Intent) -> Turn {
        Turn::new(intent, Weekday::Mon)
    }

    #[test]
    fn three_fallbacks_then_session_ends() {
        let f = fixture();
        let mut state = SessionState::default();
        let mut directives = Vec::new();

        for _ in 0..3 {
            let mut t = turn(Intent::Fallback);
            t.state = state;
            let outcome = f.router.handle(t).unwrap();
            state = outcome.state;
            directives.push((outcome.reply.directive, outcome.reply.text()));
        }

        assert_eq!(directives[0].0, Directive::Ask);
        assert_eq!(directives[0].1, "Sorry, what was that?");
        assert_eq!(directives[1].0, Directive::Ask);
        assert!(directives[1].1.contains("class schedule"));
        assert_eq!(directives[2].0, Directive::Close);
        assert_eq!(state.fallback_count, 3);
    }

    #[test]
    fn understood_turn_resets_fallback_count() {
        let f = fixture();
        for intent in [Intent::Welcome, Intent::ClassList, Intent::NoInput, Intent::SetupPush] {
            let mut t = turn(intent);
            t.state.fallback_count = 2;
            assert_eq!(f.router.handle(t).unwrap().state.fallback_count, 0);
        }
    }

    #[test]
    fn class_list_defaults_to_today_and_dedupes() {
        let f = fixture();
        let outcome = f.router.handle(turn(Intent::ClassList)).unwrap();
        assert!(outcome
            .reply
            .text()
            .starts_with("On Monday we offer the following classes: Yoga at 6am, Spin at 7am."));
        assert_eq!(outcome.reply.directive, Directive::Ask);
    }

    #[test]
    fn class_list_for_requested_day() {
        let f = fixture();
        let mut t = turn(Intent::ClassList);
        t.day = Some(Weekday::Tue);
        let outcome = f.router.handle(t).unwrap();
        assert!(outcome.reply.text().contains("On Tuesday"));
        assert!(outcome.reply.text().contains("Zumba at 6pm"));
    }

    #[test]
    fn class_list_for_unscheduled_day_fails() {
        let f = fixture();
        let mut t = turn(Intent::ClassList);
        t.day = Some(Weekday::Sun);
        assert!(matches!(
            f.router.handle(t),
            Err(ConversationError::Schedule(_))
        ));
    }

    #[test]
    fn daily_update_turn_closes() {
        let f = fixture();
        let mut t = turn(Intent::ClassList);
        t.args.from_daily_update = true;
        t.screen = true;
        let outcome = f.router.handle(t).unwrap();
        assert_eq!(outcome.reply.directive, Directive::Close);
        assert!(outcome.reply.suggestions.is_empty());
    }

    #[test]
    fn suggestions_only_on_screen_surfaces() {
        let f = fixture();
        assert!(f.router.handle(turn(Intent::Welcome)).unwrap().reply.suggestions.is_empty());

        let mut t = turn(Intent::Welcome);
        t.screen = true;
        assert!(!f.router.handle(t).unwrap().reply.suggestions.is_empty());
    }

    #[test]
    fn opt_in_declined_writes_nothing() {
        let f = fixture();
        let mut t = turn(Intent::FinishPushSetup);
        t.conversation_id = Some("conv-1".into());
        let outcome = f.router.handle(t).unwrap();

        assert_eq!(outcome.reply.text(), "Ok, I won't alert you.");
        assert!(outcome.reply.is_closing());
        assert!(f.store.find_by_topic(ALERT_TOPIC).unwrap().is_empty());
    }

    #[test]
    fn opt_in_granted_prefers_updates_user_id() {
        let f = fixture();
        let mut t = turn(Intent::FinishPushSetup);
        t.args.permission_granted = true;
        t.args.updates_user_id = Some("push-user".into());
        t.conversation_id = Some("conv-1".into());
        let outcome = f.router.handle(t).unwrap();

        assert_eq!(outcome.reply.text(), "Ok, I'll start alerting you.");
        let subs = f.store.find_by_topic(ALERT_TOPIC).unwrap();
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].user_id, "push-user");
        assert_eq!(subs[0].topic.as_str(), "Class Canceled");
    }

    #[test]
    fn opt_in_falls_back_to_conversation_id() {
        let f = fixture();
        let mut t = turn(Intent::FinishPushSetup);
        t.args.permission_granted = true;
        t.conversation_id = Some("conv-9".into());
        f.router.handle(t).unwrap();

        let subs = f.store.find_by_topic(ALERT_TOPIC).unwrap();
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].user_id, "conv-9");
    }

    #[test]
    fn opt_in_without_any_identifier_is_rejected() {
        let f = fixture();
        let mut t = turn(Intent::FinishPushSetup);
        t.args.permission_granted = true;
        assert!(matches!(
            f.router.handle(t),
            Err(ConversationError::MissingUserId)
        ));
    }

    #[test]
    fn setup_turns_request_platform_helpers() {
        let f = fixture();
        let updates = f.router.handle(turn(Intent::SetupUpdates)).unwrap().reply;
        assert_eq!(updates.helper, Some(Helper::DailyUpdate(Intent::ClassList)));

        let push = f.router.handle(turn(Intent::SetupPush)).unwrap().reply;
        assert_eq!(push.helper, Some(Helper::PushPermission(ALERT_TOPIC)));
    }

    #[test]
    fn finish_update_setup_follows_registration_status() {
        let f = fixture();
        let mut t = turn(Intent::FinishUpdateSetup);
        t.args.update_registered = true;
        assert!(f.router.handle(t).unwrap().reply.text().contains("I'll start"));
        assert!(f
            .router
            .handle(turn(Intent::FinishUpdateSetup))
            .unwrap()
            .reply
            .text()
            .contains("won't"));
    }

    #[test]
    fn no_input_escalates_on_platform_count() {
        let f = fixture();
        let mut t = turn(Intent::NoInput);
        t.args.reprompt_count = 1;
        assert!(!f.router.handle(t).unwrap().reply.is_closing());

        let mut t = turn(Intent::NoInput);
        t.args.reprompt_count = 2;
        t.args.final_reprompt = true;
        assert!(f.router.handle(t).unwrap().reply.is_closing());
    }

    #[tokio::test]
    async fn trigger_with_no_subscribers_sends_nothing_but_confirms() {
        let f = fixture();
        let outcome = f.router.handle(turn(Intent::TestNotification)).unwrap();

        assert!(outcome.reply.is_closing());
        assert!(outcome.reply.text().contains("sending a notification"));

        let report = outcome.dispatch.expect("no batch started").await.unwrap().unwrap();
        assert_eq!(report.attempted, 0);
        assert_eq!(f.transport.sends.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn trigger_with_failing_delivery_still_confirms() {
        let f = fixture_with(CountingTransport {
            fail: true,
            ..Default::default()
        });
        let sub = f.store.add("push-user", ALERT_TOPIC).unwrap();

        let outcome = f.router.handle(turn(Intent::TestNotification)).unwrap();
        assert!(outcome.reply.text().contains("sending a notification"));

        let report = outcome.dispatch.expect("no batch started").await.unwrap().unwrap();
        assert_eq!(report.failed, 1);
        assert_eq!(f.transport.sends.load(Ordering::SeqCst), 1);
        assert_eq!(f.store.get(&sub.id).unwrap(), Some(sub));
    }

    /// Holds every send until the gate is opened.
    struct GatedTransport {
        gate: Arc<tokio::sync::Notify>,
    }

    #[async_trait]
    impl PushTransport for GatedTransport {
        async fn authorize(&self) -> gymbot_push::error::Result<AccessToken> {
            Ok(AccessToken::new("t"))
        }

        async fn send(
            &self,
            _token: &AccessToken,
            _n: &Notification,
        ) -> gymbot_push::error::Result<()> {
            self.gate.notified().await;
            Ok(())
        }
    }

    #[tokio::test]
    async fn reply_returns_before_delivery_finishes() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        init_db(&conn).unwrap();
        let store = Arc::new(SqliteSubscriberStore::new(conn));
        store.add("push-user", ALERT_TOPIC).unwrap();

        let gate = Arc::new(tokio::sync::Notify::new());
        let transport = Arc::new(GatedTransport { gate: gate.clone() });
        let dispatcher = Arc::new(Dispatcher::new(store.clone(), transport, "t", "en-US"));
        let schedule = Arc::new(Schedule::from_entries(vec![ScheduleEntry::new(
            Weekday::Mon,
            "Yoga",
            "6am",
        )]));
        let router = TurnRouter::new(schedule, store, dispatcher);

        let outcome = router.handle(turn(Intent::TestNotification)).unwrap();
        assert!(outcome.reply.text().contains("sending a notification"));
        let batch = outcome.dispatch.expect("no batch started");
        assert!(!batch.is_finished());

        gate.notify_one();
        let report = batch.await.unwrap().unwrap();
        assert_eq!(report.attempted, 1);
        assert_eq!(report.delivered, 1);
    }

    #[test]
    fn class_canceled_names_first_class_of_the_day() {
        let f = fixture();
        let outcome = f.router.handle(turn(Intent::ClassCanceled)).unwrap();
        assert!(outcome.reply.is_closing());
        assert!(outcome.reply.text().starts_with("Sorry, Yoga at 6am on Monday"));
    }
}
