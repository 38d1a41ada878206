use askama::Template;

use crate::{Result, Submission};

/// Rendered in place of optional fields the submitter left out.
pub const PLACEHOLDER: &str = "-";

#[derive(Template)]
#[template(path = "contact.html")]
struct ContactHtmlTemplate<'a> {
    name: &'a str,
    email: &'a str,
    phone: &'a str,
    subject: &'a str,
    message: &'a str,
}

#[derive(Template)]
#[template(path = "contact.txt")]
struct ContactTextTemplate<'a> {
    name: &'a str,
    email: &'a str,
    phone: &'a str,
    subject: &'a str,
    message: &'a str,
}

/// Email derived from a submission, ready to hand to a sender.
///
/// Sender and recipient are not part of it: both come from deployment
/// configuration so a submission can never redirect the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub subject: String,
    pub reply_to: String,
    pub text: String,
    pub html: String,
}

impl OutboundMessage {
    pub fn from_submission(submission: &Submission) -> Result<Self> {
        submission.check()?;

        let name = submission.name.trim();
        let email = submission.email.trim();
        let message = submission.message.trim();
        let phone = submission.phone().unwrap_or(PLACEHOLDER);
        let subject = submission.subject().unwrap_or(PLACEHOLDER);

        let html = ContactHtmlTemplate {
            name,
            email,
            phone,
            subject,
            message,
        }
        .render()?;

        let text = ContactTextTemplate {
            name,
            email,
            phone,
            subject,
            message,
        }
        .render()?;

        Ok(Self {
            subject: subject_line(name, submission.subject()),
            reply_to: email.to_owned(),
            text,
            html,
        })
    }
}

fn subject_line(name: &str, subject: Option<&str>) -> String {
    match subject {
        Some(subject) => format!("({subject}) New message from {name}"),
        None => format!("New message from {name}"),
    }
}
