//! Contact form validation and simulated submission.

use core::cell::{Cell, RefCell};
use core::fmt;
use core::time::Duration;
use markup::{Element, Html};
use serde::{Deserialize, Serialize};
use tokio::time;

const NAME_MIN: usize = 2;
const NAME_MAX: usize = 100;
const MESSAGE_MIN: usize = 10;
const MESSAGE_MAX: usize = 1000;

/// Form fields in display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Name,
    Email,
    Message,
}

impl Field {
    pub const ALL: [Self; 3] = [Self::Name, Self::Email, Self::Message];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Message => "message",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Email => "Email",
            Self::Message => "Message",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}

/// What the visitor typed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDraft {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactDraft {
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Message => &self.message,
        }
    }

    fn value_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
            Field::Message => &mut self.message,
        }
    }
}

/// Per-field validation messages. At most one message per field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: Vec<(Field, &'static str)>,
}

impl FieldErrors {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.errors
            .iter()
            .find(|(candidate, _)| *candidate == field)
            .map(|(_, message)| *message)
    }

    pub fn entries(&self) -> impl Iterator<Item = (Field, &'static str)> + '_ {
        self.errors.iter().copied()
    }

    fn clear(&mut self, field: Field) {
        self.errors.retain(|(candidate, _)| *candidate != field);
    }
}

fn is_valid_email(raw: &str) -> bool {
    if raw.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = raw.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|label| {
            !label.is_empty()
                && label
                    .chars()
                    .all(|ch| ch.is_ascii_alphanumeric() || ch == '-')
        })
}

fn check(field: Field, value: &str) -> Option<&'static str> {
    let length = value.chars().count();
    match field {
        Field::Name if length < NAME_MIN => Some("Name must be at least 2 characters"),
        Field::Name if length > NAME_MAX => Some("Name must be less than 100 characters"),
        Field::Email if !is_valid_email(value) => Some("Please enter a valid email address"),
        Field::Message if length < MESSAGE_MIN => Some("Message must be at least 10 characters"),
        Field::Message if length > MESSAGE_MAX => {
            Some("Message must be less than 1000 characters")
        }
        Field::Name | Field::Email | Field::Message => None,
    }
}

/// Validate every field.
pub fn validate(draft: &ContactDraft) -> FieldErrors {
    FieldErrors {
        errors: Field::ALL
            .into_iter()
            .filter_map(|field| check(field, draft.value(field)).map(|message| (field, message)))
            .collect(),
    }
}

/// Confirmation shown after a successful submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub title: String,
    pub description: String,
}

impl Toast {
    pub fn render(&self) -> Html {
        Element::new("div")
            .class("toast")
            .attr("role", "status")
            .child(Element::new("strong").text(&self.title).build())
            .child(Element::new("p").text(&self.description).build())
            .build()
    }
}

/// Result of pressing submit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; nothing was sent
    Invalid(FieldErrors),
    /// A previous submission is still in flight
    Busy,
    /// Sent; the form was reset
    Sent(Toast),
}

/// Contact form controller.
pub struct ContactForm {
    draft: RefCell<ContactDraft>,
    errors: RefCell<FieldErrors>,
    submitting: Cell<bool>,
    delay: Duration,
    toasts: RefCell<Vec<Toast>>,
}

impl ContactForm {
    /// `delay` simulates the round trip to the mail backend.
    pub fn new(delay: Duration) -> Self {
        Self {
            draft: RefCell::new(ContactDraft::default()),
            errors: RefCell::new(FieldErrors::default()),
            submitting: Cell::new(false),
            delay,
            toasts: RefCell::new(Vec::new()),
        }
    }

    /// Update one field. Clears that field's error once it becomes valid.
    pub fn set(&self, field: Field, value: impl Into<String>) {
        let value = value.into();
        if check(field, &value).is_none() {
            self.errors.borrow_mut().clear(field);
        }
        *self.draft.borrow_mut().value_mut(field) = value;
    }

    pub fn draft(&self) -> ContactDraft {
        self.draft.borrow().clone()
    }

    pub fn errors(&self) -> FieldErrors {
        self.errors.borrow().clone()
    }

    #[inline]
    pub fn is_submitting(&self) -> bool {
        self.submitting.get()
    }

    /// Toasts shown so far, oldest first.
    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.borrow().clone()
    }

    /// Validate and send. A second call while one is in flight is rejected.
    pub async fn submit(&self) -> SubmitOutcome {
        if self.submitting.get() {
            log::debug!("contact submit ignored: already sending");
            return SubmitOutcome::Busy;
        }
        let draft = self.draft();
        let errors = validate(&draft);
        if !errors.is_empty() {
            log::debug!("contact form has {} invalid field(s)", errors.len());
            *self.errors.borrow_mut() = errors.clone();
            return SubmitOutcome::Invalid(errors);
        }
        self.errors.borrow_mut().errors.clear();

        self.submitting.set(true);
        match serde_json::to_string(&draft) {
            Ok(payload) => log::debug!("sending contact payload {payload}"),
            Err(err) => log::warn!("contact payload not serializable: {err}"),
        }
        time::sleep(self.delay).await;
        self.submitting.set(false);

        *self.draft.borrow_mut() = ContactDraft::default();
        let toast = Toast {
            title: "Message sent!".to_owned(),
            description: "Thanks for reaching out. We'll get back to you within 24 hours."
                .to_owned(),
        };
        log::info!("contact message from {} sent", draft.email);
        self.toasts.borrow_mut().push(toast.clone());
        SubmitOutcome::Sent(toast)
    }

    /// The form with the current draft, each field's error under it and the
    /// submit button disabled while sending.
    pub fn render(&self) -> Html {
        render_form(&self.draft.borrow(), &self.errors.borrow(), self.submitting.get())
    }
}

fn render_field(field: Field, value: &str, error: Option<&str>) -> Html {
    let name = field.name();
    let mut input = match field {
        Field::Message => Element::new("textarea")
            .attr("rows", "5")
            .text(value),
        Field::Name | Field::Email => Element::new("input")
            .attr("type", if field == Field::Email { "email" } else { "text" })
            .attr("value", value),
    }
    .id(name)
    .attr("name", name);
    let mut wrapper = Element::new("div")
        .class("field")
        .attr("data-field", name)
        .child(Element::new("label").attr("for", name).text(field.label()).build());
    if let Some(message) = error {
        let error_id = format!("{name}-error");
        input = input
            .attr("aria-invalid", "true")
            .attr("aria-describedby", &error_id);
        wrapper = wrapper.child(input.build()).child(
            Element::new("p")
                .id(error_id)
                .class("field-error")
                .text(message)
                .build(),
        );
    } else {
        wrapper = wrapper.child(input.build());
    }
    wrapper.build()
}

/// Contact form markup for `draft`, with `errors` shown inside their fields.
pub fn render_form(draft: &ContactDraft, errors: &FieldErrors, submitting: bool) -> Html {
    let button = Element::new("button")
        .attr("type", "submit")
        .class("button button-primary");
    let button = if submitting {
        button.attr("disabled", "").text("Sending...")
    } else {
        button.text("Send message")
    };
    Element::new("form")
        .class("contact-form")
        .attr("data-contact-form", "true")
        .attr("novalidate", "")
        .children(
            Field::ALL
                .into_iter()
                .map(|field| render_field(field, draft.value(field), errors.get(field))),
        )
        .child(button.build())
        .build()
}
