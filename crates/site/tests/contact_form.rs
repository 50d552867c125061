mod common;

#[cfg(test)]
mod tests {
    use super::common::{advance, init_logging};
    use core::time::Duration;
    use site::{ContactForm, Field, SubmitOutcome};
    use std::rc::Rc;
    use tokio::task::{self, LocalSet};

    fn filled(form: &ContactForm, name: &str) {
        form.set(Field::Name, name);
        form.set(Field::Email, "maya@harbor.example");
        form.set(Field::Message, "We need a new marketing site by spring.");
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn one_character_name_is_flagged_on_that_field_only() {
        init_logging();
        let form = ContactForm::new(Duration::from_millis(1500));
        filled(&form, "A");
        let SubmitOutcome::Invalid(errors) = form.submit().await else {
            panic!("expected validation errors");
        };
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get(Field::Name),
            Some("Name must be at least 2 characters")
        );
        assert_eq!(errors.get(Field::Email), None);
        assert_eq!(errors.get(Field::Message), None);
        let html = form.render();
        assert!(html.contains("<p id=\"name-error\" class=\"field-error\">"));
        assert!(!html.contains("email-error"));
        assert_eq!(form.draft().name, "A");

        form.set(Field::Name, "Al");
        assert!(form.errors().is_empty());
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn every_invalid_field_reports_its_own_message() {
        init_logging();
        let form = ContactForm::new(Duration::from_millis(1500));
        form.set(Field::Email, "not-an-email");
        form.set(Field::Message, "Hi");
        let SubmitOutcome::Invalid(errors) = form.submit().await else {
            panic!("expected validation errors");
        };
        let messages: Vec<_> = errors.entries().collect();
        assert_eq!(
            messages,
            [
                (Field::Name, "Name must be at least 2 characters"),
                (Field::Email, "Please enter a valid email address"),
                (Field::Message, "Message must be at least 10 characters"),
            ]
        );
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn valid_submission_waits_then_toasts_and_resets() {
        init_logging();
        LocalSet::new()
            .run_until(async {
                let form = Rc::new(ContactForm::new(Duration::from_millis(1500)));
                filled(&form, "Maya Chen");

                let first = task::spawn_local({
                    let form = Rc::clone(&form);
                    async move { form.submit().await }
                });
                advance(10).await;
                assert!(form.is_submitting());
                assert_eq!(form.submit().await, SubmitOutcome::Busy);

                advance(1_000).await;
                assert!(form.toasts().is_empty());
                advance(500).await;

                let outcome = first.await;
                assert!(matches!(outcome, Ok(SubmitOutcome::Sent(_))));
                assert!(!form.is_submitting());
                assert_eq!(form.toasts().len(), 1);
                assert_eq!(form.draft().name, "");
                assert!(form.toasts()[0].render().contains("Message sent!"));
            })
            .await;
    }
}
