//! Reply texts

use chrono::{DateTime, FixedOffset};
use punchclock_core::{ClockOut, ReminderPlan};
use punchclock_store::WorkSession;
use punchclock_util::{duration_hours, format_clock_time, format_datetime_full, format_hours_clock};

/// Text of the clock-out reminder
pub const GO_HOME: &str = "Go home!\n/clock_out";

pub const HELP: &str = "/clock_in - Clock in\n\
/clock_out - Clock out\n\
/time_budget - Get time budget\n\
/status - Show the running session\n\
/help - Get help";

pub const INTERNAL_ERROR: &str = "Something went wrong, the failure has been reported.";

pub const NO_OPEN_SESSION: &str = "No ongoing work session found, you are not clocked in.";

fn budget_text(hours: f64) -> String {
    format!("{} ({:.2} hours)", format_hours_clock(hours), hours)
}

pub fn clocked_in(session: &WorkSession, plan: &ReminderPlan) -> String {
    format!(
        "Clocked in at {}.\nYou should clock out at {}.\nYour regular work end time is {}.",
        format_datetime_full(&session.clock_in),
        format_clock_time(&plan.due_at),
        format_clock_time(&plan.regular_end),
    )
}

pub fn already_clocked_in(open: &WorkSession) -> String {
    format!(
        "You are already clocked in since {}. Clock out first.",
        format_datetime_full(&open.clock_in)
    )
}

pub fn clocked_out(out: &ClockOut, budget_hours: f64) -> String {
    let clock_out = out.session.clock_out.unwrap_or(out.session.clock_in + out.worked);
    format!(
        "Clocked out at {}. You worked {:.1} hours.\nYour current time budget is {}.",
        format_datetime_full(&clock_out),
        out.worked_hours(),
        budget_text(budget_hours),
    )
}

pub fn time_budget(hours: f64) -> String {
    format!("Your time budget is {}.", budget_text(hours))
}

pub fn status(
    open: Option<&WorkSession>,
    reminder_due: Option<DateTime<FixedOffset>>,
    now: DateTime<FixedOffset>,
) -> String {
    let Some(open) = open else {
        return "You are not clocked in.".to_string();
    };

    let mut text = format!(
        "Clocked in since {} ({:.1} hours so far).",
        format_datetime_full(&open.clock_in),
        duration_hours(now - open.clock_in),
    );
    if let Some(due) = reminder_due {
        text.push_str(&format!("\nReminder due at {}.", format_clock_time(&due)));
    }
    text
}

pub fn unknown_command(name: &str) -> String {
    format!("Unknown command /{}. Send /help for the list of commands.", name)
}
