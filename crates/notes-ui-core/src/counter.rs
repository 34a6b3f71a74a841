//! Live character count under the note content field.

use std::rc::Rc;

use crate::bus::{EventBus, PageEvent};
use crate::init::Env;
use crate::page::{Page, Query};
use crate::validation::form_value_len;

/// Human-readable character count of `text`, counted like the browser
/// counts form values.
pub fn character_count_label(text: &str) -> String {
    match form_value_len(text) {
        1 => "1 character".to_string(),
        n => format!("{n} characters"),
    }
}

struct CounterInner<P: Page> {
    page: Rc<P>,
    field: P::Node,
    node: P::Node,
}

pub struct CharacterCounter<P: Page> {
    inner: Rc<CounterInner<P>>,
}

impl<P: Page> Clone for CharacterCounter<P> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<P: Page> CharacterCounter<P> {
    pub fn install(env: &Env<P>, bus: &EventBus<P::Node>) -> Option<Self> {
        if !env.config.character_counter {
            return None;
        }
        let field = env.page.find_first(Query::ContentField)?;
        let node = env.page.mount_counter(&field)?;

        let counter = Self {
            inner: Rc::new(CounterInner {
                page: env.page.clone(),
                field,
                node,
            }),
        };
        counter.refresh();

        let handler = counter.clone();
        bus.subscribe(move |event, _| {
            if let PageEvent::Input { target } = event {
                if *target == handler.inner.field {
                    handler.refresh();
                }
            }
        });

        Some(counter)
    }

    /// Update the label from the field's current value.
    pub fn refresh(&self) {
        let inner = &self.inner;
        let label = character_count_label(&inner.page.value(&inner.field));
        inner.page.set_text(&inner.node, &label);
    }

    /// The counter element.
    pub fn node(&self) -> &P::Node {
        &self.inner.node
    }
}
