//! Note form validation before native submission.

use crate::bus::{EventBus, PageEvent};
use crate::error::ValidationError;
use crate::init::Env;
use crate::page::{Page, Query};
use crate::toast::Toast;

/// Minimum trimmed title length, in UTF-16 code units.
pub const MIN_TITLE_CHARS: usize = 3;

/// Minimum trimmed content length, in UTF-16 code units.
pub const MIN_CONTENT_CHARS: usize = 10;

/// Whitespace as the browser's `String.prototype.trim` sees it.
///
/// That is Unicode `White_Space` plus the byte order mark, minus U+0085.
fn is_form_whitespace(c: char) -> bool {
    c == '\u{FEFF}' || (c.is_whitespace() && c != '\u{0085}')
}

/// Trim `text` the way the browser trims form values.
fn trim_form_value(text: &str) -> &str {
    text.trim_matches(is_form_whitespace)
}

/// Length of `text` as the browser reports it, in UTF-16 code units.
///
/// Characters outside the Basic Multilingual Plane (most emoji) count twice.
pub(crate) fn form_value_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Check a note's title and content. The first failing rule wins.
///
/// Both values are trimmed before checking; lengths count UTF-16 code
/// units.
pub fn validate_note(title: &str, content: &str) -> Result<(), ValidationError> {
    let title = trim_form_value(title);
    let content = trim_form_value(content);

    if title.is_empty() || content.is_empty() {
        return Err(ValidationError::MissingField);
    }
    if form_value_len(title) < MIN_TITLE_CHARS {
        return Err(ValidationError::TitleTooShort {
            min: MIN_TITLE_CHARS,
        });
    }
    if form_value_len(content) < MIN_CONTENT_CHARS {
        return Err(ValidationError::ContentTooShort {
            min: MIN_CONTENT_CHARS,
        });
    }
    Ok(())
}

/// Blocks submission of one note form while its fields are invalid.
pub struct FormValidator<P: Page> {
    env: Env<P>,
    form: P::Node,
    title: P::Node,
    content: P::Node,
}

impl<P: Page> Clone for FormValidator<P> {
    fn clone(&self) -> Self {
        Self {
            env: self.env.clone(),
            form: self.form.clone(),
            title: self.title.clone(),
            content: self.content.clone(),
        }
    }
}

impl<P: Page> FormValidator<P> {
    /// Attach a validator to every form that has both note fields.
    pub fn install(env: &Env<P>, bus: &EventBus<P::Node>) -> Vec<Self> {
        let page = &env.page;
        let validators: Vec<Self> = page
            .find_all(Query::Forms)
            .into_iter()
            .filter_map(|form| {
                let title = page.find_in(&form, Query::TitleField)?;
                let content = page.find_in(&form, Query::ContentField)?;
                Some(Self {
                    env: env.clone(),
                    form,
                    title,
                    content,
                })
            })
            .collect();

        for validator in &validators {
            let validator = validator.clone();
            bus.subscribe(move |event, dispatch| {
                let PageEvent::Submit { form, .. } = event else {
                    return;
                };
                if *form != validator.form || dispatch.default_prevented() {
                    return;
                }
                if let Err(err) = validator.check() {
                    dispatch.prevent_default();
                    tracing::debug!(%err, "note submission blocked");
                    validator.env.toasts.notify(Toast::error(err.to_string()));
                }
            });
        }

        tracing::debug!(count = validators.len(), "form validators installed");
        validators
    }

    /// Validate the form's current field values.
    pub fn check(&self) -> Result<(), ValidationError> {
        let page = &self.env.page;
        validate_note(&page.value(&self.title), &page.value(&self.content))
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakePage, ManualTimers, MemoryDraftStore};
    use crate::UiConfig;
    use std::rc::Rc;

    #[test]
    fn test_rules_in_order() {
        assert_eq!(validate_note("", "content here"), Err(ValidationError::MissingField));
        assert_eq!(validate_note("Title", "   "), Err(ValidationError::MissingField));
        // Missing wins over too-short.
        assert_eq!(validate_note("Hi", ""), Err(ValidationError::MissingField));
        assert_eq!(
            validate_note("Hi", "This is a long enough note."),
            Err(ValidationError::TitleTooShort { min: 3 })
        );
        assert_eq!(
            validate_note("Groceries", "Milk."),
            Err(ValidationError::ContentTooShort { min: 10 })
        );
        assert_eq!(validate_note("Groceries", "Milk, eggs, bread."), Ok(()));
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ValidationError::MissingField.to_string(),
            "Please fill in both title and content fields"
        );
        assert_eq!(
            validate_note("Hi", "This is a long enough note.")
                .unwrap_err()
                .to_string(),
            "Title must be at least 3 characters long"
        );
        assert_eq!(
            validate_note("Groceries", "Milk.").unwrap_err().to_string(),
            "Content must be at least 10 characters long"
        );
    }

    #[test]
    fn test_trims_before_measuring() {
        assert_eq!(
            validate_note("  ab  ", "0123456789"),
            Err(ValidationError::TitleTooShort { min: 3 })
        );
        assert_eq!(
            validate_note("abc", "   012345678   "),
            Err(ValidationError::ContentTooShort { min: 10 })
        );
        assert_eq!(validate_note(" abc ", "\n0123456789\n"), Ok(()));
    }

    #[test]
    fn test_boundaries() {
        for title_len in 0..6 {
            for content_len in 0..14 {
                let title = "t".repeat(title_len);
                let content = "c".repeat(content_len);
                let blocked =
                    title_len == 0 || content_len == 0 || title_len < 3 || content_len < 10;
                assert_eq!(validate_note(&title, &content).is_err(), blocked);
            }
        }
    }

    #[test]
    fn test_counts_utf16_units_not_bytes() {
        assert_eq!(validate_note("日本語", "これは十分に長いノートです"), Ok(()));
    }

    #[test]
    fn test_astral_characters_count_twice() {
        // Two emoji are four UTF-16 units.
        assert_eq!(validate_note("🎉🎉", "0123456789"), Ok(()));
        assert_eq!(validate_note("abc", "😀😀😀😀😀"), Ok(()));
        assert_eq!(
            validate_note("🎉", "0123456789"),
            Err(ValidationError::TitleTooShort { min: 3 })
        );
        assert_eq!(
            validate_note("abc", "😀😀😀😀"),
            Err(ValidationError::ContentTooShort { min: 10 })
        );
    }

    #[test]
    fn test_byte_order_mark_is_whitespace() {
        assert_eq!(
            validate_note("\u{FEFF}", "0123456789"),
            Err(ValidationError::MissingField)
        );
        assert_eq!(validate_note("\u{FEFF}abc\u{FEFF}", "0123456789"), Ok(()));
        // NEL survives trimming, so it still counts toward the length.
        assert_eq!(trim_form_value("\u{0085}ab"), "\u{0085}ab");
        assert_eq!(validate_note("\u{0085}ab", "0123456789"), Ok(()));
    }

    fn setup() -> (Rc<FakePage>, Env<FakePage>, EventBus<crate::testing::NodeId>) {
        let page = Rc::new(FakePage::new());
        let env = Env::new(
            page.clone(),
            Rc::new(ManualTimers::new()),
            Rc::new(MemoryDraftStore::new()),
            UiConfig::default(),
        );
        (page, env, EventBus::new())
    }

    #[test]
    fn test_blocks_invalid_submit_with_toast() {
        let (page, env, bus) = setup();
        let form = page.add_note_form();
        let validators = FormValidator::install(&env, &bus);
        assert_eq!(validators.len(), 1);

        page.set_value(&form.title, "Hi");
        page.set_value(&form.content, "This is a long enough note.");
        let result = bus.dispatch(&PageEvent::Submit {
            form: form.form,
            submitter: Some(form.submit),
        });

        assert!(result.default_prevented());
        let toasts = page.toasts();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].message, "Title must be at least 3 characters long");
        assert_eq!(toasts[0].class_name, "alert alert-error alert-toast");
    }

    #[test]
    fn test_allows_valid_submit() {
        let (page, env, bus) = setup();
        let form = page.add_note_form();
        FormValidator::install(&env, &bus);

        page.set_value(&form.title, "Groceries");
        page.set_value(&form.content, "Milk, eggs, bread.");
        let result = bus.dispatch(&PageEvent::Submit {
            form: form.form,
            submitter: None,
        });

        assert!(!result.default_prevented());
        assert!(page.toasts().is_empty());
    }

    #[test]
    fn test_ignores_other_forms() {
        let (page, env, bus) = setup();
        page.add_note_form();
        let search = page.add_form();
        let validators = FormValidator::install(&env, &bus);
        assert_eq!(validators.len(), 1);

        let result = bus.dispatch(&PageEvent::Submit {
            form: search,
            submitter: None,
        });
        assert!(!result.default_prevented());
        assert!(page.toasts().is_empty());
    }
}
