//! Smooth scrolling for same-page anchors.

use crate::bus::{EventBus, PageEvent};
use crate::init::Env;
use crate::page::{Page, Query};

/// Element id targeted by an in-page href like `#section`.
///
/// Returns `None` for hrefs that aren't fragments, and for a bare `#`.
pub fn fragment_id(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

/// Replaces jump-to-anchor navigation with a smooth scroll.
pub struct SmoothScroll<P: Page> {
    env: Env<P>,
    links: Vec<P::Node>,
}

impl<P: Page> Clone for SmoothScroll<P> {
    fn clone(&self) -> Self {
        Self {
            env: self.env.clone(),
            links: self.links.clone(),
        }
    }
}

impl<P: Page> SmoothScroll<P> {
    pub fn install(env: &Env<P>, bus: &EventBus<P::Node>) -> Self {
        let scroll = Self {
            env: env.clone(),
            links: env.page.find_all(Query::FragmentLinks),
        };

        if !scroll.links.is_empty() {
            let handler = scroll.clone();
            bus.subscribe(move |event, dispatch| {
                let PageEvent::Click { target } = event else {
                    return;
                };
                let page = &handler.env.page;
                let Some(link) = handler.links.iter().find(|l| page.contains(l, target)) else {
                    return;
                };
                dispatch.prevent_default();
                handler.scroll_to(link);
            });
        }

        tracing::debug!(count = scroll.links.len(), "smooth scroll links installed");
        scroll
    }

    /// Scroll to the element `link` points at. Returns false if it's absent.
    pub fn scroll_to(&self, link: &P::Node) -> bool {
        let page = &self.env.page;
        let href = page.attribute(link, "href").unwrap_or_default();
        match fragment_id(&href).and_then(|id| page.element_by_id(id)) {
            Some(target) => {
                page.scroll_into_view(&target);
                true
            }
            None => {
                tracing::debug!(%href, "scroll target not found");
                false
            }
        }
    }

    pub fn links(&self) -> &[P::Node] {
        &self.links
    }
}
