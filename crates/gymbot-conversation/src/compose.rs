//! Scripted replies. Every function here is pure: inputs in, [`Reply`] out.

use chrono::Weekday;
use gymbot_schedule::day_name;
use gymbot_subscriptions::Topic;

use crate::fallback::{Escalation, NoInputStep};
use crate::intent::Intent;
use crate::reply::{Helper, Reply};

const MAIN_MENU: [&str; 3] = ["Classes", "Daily updates", "Cancelation alerts"];
const CLASS_LIST_FOLLOW_UP: [&str; 2] = ["Send daily", "Send cancelations"];

pub fn welcome() -> Reply {
    Reply::ask(
        "Welcome to Action Gym! I can tell you today's classes, send you the \
         schedule every day, or alert you when a class is canceled. What would you like?",
    )
    .with_suggestions(&MAIN_MENU)
}

/// The class list for `day`. `classes` is already deduplicated and joined.
///
/// A turn re-invoked by the daily update gets a short sign-off and closes;
/// a live turn asks what to do next.
pub fn class_list(day: Weekday, classes: &str, from_daily_update: bool) -> Reply {
    let day = day_name(day);
    let mut message = if classes.is_empty() {
        format!("There are no classes on {day}. ")
    } else {
        format!("On {day} we offer the following classes: {classes}. ")
    };

    if from_daily_update {
        message.push_str("Hope to see you soon at Action Gym!");
        return Reply::close(message);
    }

    message.push_str(
        "Would you like to receive daily reminders of upcoming classes, \
         subscribe to notifications about cancelations, or can I help you with anything else?",
    );
    Reply::ask(message).with_suggestions(&CLASS_LIST_FOLLOW_UP)
}

pub fn setup_updates() -> Reply {
    Reply::ask("Sure, let's set up daily updates.").with_helper(Helper::DailyUpdate(Intent::ClassList))
}

pub fn finish_update_setup(registered: bool) -> Reply {
    if registered {
        Reply::close("Ok, I'll start giving you daily updates.")
    } else {
        Reply::close("Ok, I won't give you daily updates.")
    }
}

pub fn setup_push(topic: Topic) -> Reply {
    Reply::ask("Sure, let's set up cancelation alerts.").with_helper(Helper::PushPermission(topic))
}

pub fn push_opt_in(granted: bool) -> Reply {
    if granted {
        Reply::close("Ok, I'll start alerting you.")
    } else {
        Reply::close("Ok, I won't alert you.")
    }
}

/// Turn opened by tapping a cancelation alert. `first_class` is the day's
/// first scheduled class label, if any.
pub fn class_canceled(day: Weekday, first_class: Option<&str>) -> Reply {
    let day = day_name(day);
    match first_class {
        Some(class) => Reply::close(format!(
            "Sorry, {class} on {day} has been canceled. We hope to see you at another class!"
        )),
        None => Reply::close(format!("There are no classes scheduled on {day}.")),
    }
}

pub fn notification_sent() -> Reply {
    Reply::close("Ok, I'm sending a notification to everyone who signed up for cancelation alerts.")
}

pub fn fallback(step: Escalation) -> Reply {
    match step {
        Escalation::Mild => Reply::ask("Sorry, what was that?"),
        Escalation::Detailed => Reply::ask(
            "I didn't quite get that. I can tell you our class schedule, \
             send you daily updates, or alert you about canceled classes. Which would you like?",
        )
        .with_suggestions(&MAIN_MENU),
        Escalation::Terminal => {
            Reply::close("Sorry, I'm still having trouble. So let's stop here for now. Bye.")
        }
    }
}

pub fn no_input(step: NoInputStep) -> Reply {
    match step {
        NoInputStep::First => Reply::ask("Sorry, I didn't hear that. What would you like to do?"),
        NoInputStep::Second => Reply::ask(
            "If you're still there, I can tell you today's classes. Just say classes.",
        ),
        NoInputStep::Final => Reply::close("Okay, let's try this again later."),
    }
}
