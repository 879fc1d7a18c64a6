//! Outreach templates: one email + SMS triad per segment.
//!
//! Tokens left in the text for the caller:
//!   [First Name]  recipient's first name
//!   [Short Link]  shortened booking link for SMS
//! [Booking Link] is filled by template_for().
//!
//! Substitution is a plain string replace. Nothing is escaped or validated.
//! Every SMS body ends with the same static opt-out line.

use crate::classifier::Segment;
use serde::{Deserialize, Serialize};

pub const FIRST_NAME: &str = "[First Name]";
pub const BOOKING_LINK: &str = "[Booking Link]";
pub const SHORT_LINK: &str = "[Short Link]";

const OPT_OUT: &str = "Reply STOP to opt out.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub email_subject: String,
    pub email_body:    String,
    pub sms:           String,
}

impl Template {
    /// Fill the recipient tokens.
    pub fn personalize(&self, first_name: &str, short_link: &str) -> Template {
        let fill = |text: &str| {
            text.replace(FIRST_NAME, first_name)
                .replace(SHORT_LINK, short_link)
        };
        Template {
            email_subject: fill(self.email_subject.as_str()),
            email_body:    fill(self.email_body.as_str()),
            sms:           fill(self.sms.as_str()),
        }
    }
}

struct Canned {
    subject: &'static str,
    body:    &'static str,
    sms:     &'static str,
}

pub fn template_for(segment: Segment, booking_link: &str) -> Template {
    render(canned(Some(segment)), booking_link)
}

/// Lookup by display label; unknown labels get the default template.
pub fn template_for_label(label: &str, booking_link: &str) -> Template {
    render(canned(label.parse().ok()), booking_link)
}

/// First whitespace-separated token of a display name.
pub fn first_name_of(name: &str) -> &str {
    name.split_whitespace().next().unwrap_or("")
}

fn render(canned: Canned, booking_link: &str) -> Template {
    Template {
        email_subject: canned.subject.replace(BOOKING_LINK, booking_link),
        email_body:    canned.body.replace(BOOKING_LINK, booking_link),
        sms:           format!("{} {OPT_OUT}", canned.sms.replace(BOOKING_LINK, booking_link)),
    }
}

fn canned(segment: Option<Segment>) -> Canned {
    match segment {
        Some(Segment::Vip) => Canned {
            subject: "A thank-you for our favourite regulars, [First Name]",
            body: "Hi [First Name],\n\n\
                   You're one of our most valued customers and we wanted to say thanks. \
                   As a VIP you get first pick of appointment times this month.\n\n\
                   Reserve your spot: [Booking Link]\n\nSee you soon!",
            sms: "Hi [First Name], VIP early access is open. Grab your preferred time: [Short Link]",
        },
        Some(Segment::Loyal) => Canned {
            subject: "[First Name], you've earned a little something",
            body: "Hi [First Name],\n\n\
                   Thanks for coming back again and again. Your next visit includes a \
                   complimentary upgrade on us.\n\n\
                   Book whenever suits you: [Booking Link]\n\nThank you for your loyalty!",
            sms: "Hi [First Name], thanks for being a regular! Your next visit has a free upgrade: [Short Link]",
        },
        Some(Segment::BigSpender) => Canned {
            subject: "Something premium for you, [First Name]",
            body: "Hi [First Name],\n\n\
                   We've put together our premium packages and thought of you first. \
                   Take a look and book the one that fits.\n\n\
                   See the packages: [Booking Link]\n\nWarm regards",
            sms: "Hi [First Name], our new premium packages are live. Have a look: [Short Link]",
        },
        Some(Segment::New) => Canned {
            subject: "Great to meet you, [First Name]!",
            body: "Hi [First Name],\n\n\
                   Thanks for visiting us for the first time. We'd love to see you again, \
                   so here's 10% off your second visit.\n\n\
                   Book your next visit: [Booking Link]\n\nWelcome aboard!",
            sms: "Hi [First Name], thanks for your first visit! Enjoy 10% off your next one: [Short Link]",
        },
        Some(Segment::Promising) => Canned {
            subject: "[First Name], ready for round two?",
            body: "Hi [First Name],\n\n\
                   It was great seeing you recently. Regular visits get the best results, \
                   so we've held a few slots for you over the next two weeks.\n\n\
                   Pick a time: [Booking Link]\n\nTalk soon!",
            sms: "Hi [First Name], we've held a few slots for you this fortnight. Book here: [Short Link]",
        },
        Some(Segment::AtRisk) => Canned {
            subject: "We miss you, [First Name]",
            body: "Hi [First Name],\n\n\
                   It's been a while since your last visit and we'd love to have you back. \
                   Here's 15% off when you book in the next 30 days.\n\n\
                   Come back and see us: [Booking Link]\n\nHope to see you soon!",
            sms: "Hi [First Name], we miss you! 15% off if you book in the next 30 days: [Short Link]",
        },
        Some(Segment::Lapsed) => Canned {
            subject: "It's been too long, [First Name]",
            body: "Hi [First Name],\n\n\
                   A lot has changed since your last visit. We'd love to show you around \
                   again with 20% off your return booking.\n\n\
                   Book your return visit: [Booking Link]\n\nAll the best",
            sms: "Hi [First Name], it's been a while! 20% off your return visit: [Short Link]",
        },
        Some(Segment::Hibernating) => Canned {
            subject: "[First Name], here's what's new",
            body: "Hi [First Name],\n\n\
                   We've added new services and opening hours since we last saw you. \
                   Whenever you're ready, we're here.\n\n\
                   See what's new and book: [Booking Link]\n\nCheers",
            sms: "Hi [First Name], lots new since your last visit. Take a look: [Short Link]",
        },
        None => Canned {
            subject: "Hello from all of us, [First Name]",
            body: "Hi [First Name],\n\n\
                   Just checking in. If you'd like to book your next visit, \
                   it only takes a minute.\n\n\
                   Book online: [Booking Link]\n\nThanks!",
            sms: "Hi [First Name], book your next visit anytime: [Short Link]",
        },
    }
}
