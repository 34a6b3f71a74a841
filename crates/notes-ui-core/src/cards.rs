//! Staggered entrance animation for note cards.

use std::rc::Rc;

use crate::init::Env;
use crate::page::{Page, Query};

/// Animation delay for the card at `index`, in seconds.
///
/// Rounded to the millisecond so `3 × 0.1` comes out as `0.3`.
pub fn stagger_delay(index: usize, step_secs: f64) -> f64 {
    (index as f64 * step_secs * 1000.0).round() / 1000.0
}

/// CSS `animation-delay` value for the card at `index`.
pub fn stagger_delay_css(index: usize, step_secs: f64) -> String {
    format!("{}s", stagger_delay(index, step_secs))
}

/// The page's note cards with their animation timing applied.
pub struct CardAnimations<P: Page> {
    cards: Vec<P::Node>,
    observed: bool,
}

impl<P: Page> CardAnimations<P> {
    /// Stagger every card and hold its animation until it becomes visible.
    ///
    /// Without visibility observation the animations simply run.
    pub fn install(env: &Env<P>) -> Self {
        let page = &env.page;
        let cards = page.find_all(Query::NoteCards);

        for (index, card) in cards.iter().enumerate() {
            page.set_style(
                card,
                "animation-delay",
                &stagger_delay_css(index, env.config.card_stagger_secs),
            );
            page.set_style(card, "animation-play-state", "paused");
        }

        let weak_page = Rc::downgrade(page);
        let observed = !cards.is_empty()
            && page.observe_visibility(
                &cards,
                Rc::new(move |card: &P::Node| {
                    if let Some(page) = weak_page.upgrade() {
                        page.set_style(card, "animation-play-state", "running");
                    }
                }),
            );

        if !observed {
            for card in &cards {
                page.set_style(card, "animation-play-state", "running");
            }
        }

        tracing::debug!(count = cards.len(), observed, "card animations installed");
        Self { cards, observed }
    }

    pub fn cards(&self) -> &[P::Node] {
        &self.cards
    }

    /// Whether cards wait for visibility before animating.
    pub fn is_observed(&self) -> bool {
        self.observed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakePage, ManualTimers, MemoryDraftStore};
    use crate::UiConfig;

    fn env(page: Rc<FakePage>) -> Env<FakePage> {
        Env::new(
            page,
            Rc::new(ManualTimers::new()),
            Rc::new(MemoryDraftStore::new()),
            UiConfig::default(),
        )
    }

    #[test]
    fn test_delay_is_index_times_step() {
        for i in 0..50 {
            let expected = i as f64 * 0.1;
            assert!((stagger_delay(i, 0.1) - expected).abs() < 1e-9, "index {i}");
        }
    }

    #[test]
    fn test_delay_css() {
        assert_eq!(stagger_delay_css(0, 0.1), "0s");
        assert_eq!(stagger_delay_css(1, 0.1), "0.1s");
        assert_eq!(stagger_delay_css(3, 0.1), "0.3s");
        assert_eq!(stagger_delay_css(10, 0.1), "1s");
        assert_eq!(stagger_delay_css(12, 0.1), "1.2s");
    }

    #[test]
    fn test_cards_run_when_visible() {
        let page = Rc::new(FakePage::new());
        let cards: Vec<_> = (0..4).map(|_| page.add_card()).collect();
        let installed = CardAnimations::install(&env(page.clone()));

        assert!(installed.is_observed());
        assert_eq!(page.observed_count(), 4);
        for (i, card) in cards.iter().enumerate() {
            assert_eq!(
                page.style(card, "animation-delay"),
                Some(stagger_delay_css(i, 0.1))
            );
            assert_eq!(page.style(card, "animation-play-state").as_deref(), Some("paused"));
        }

        page.reveal(cards[2]);
        assert_eq!(
            page.style(&cards[2], "animation-play-state").as_deref(),
            Some("running")
        );
        assert_eq!(
            page.style(&cards[0], "animation-play-state").as_deref(),
            Some("paused")
        );
        assert_eq!(page.observed_count(), 3);
    }

    #[test]
    fn test_cards_run_without_observer() {
        let page = Rc::new(FakePage::new());
        page.set_observer_supported(false);
        let cards: Vec<_> = (0..3).map(|_| page.add_card()).collect();
        let installed = CardAnimations::install(&env(page.clone()));

        assert!(!installed.is_observed());
        for card in &cards {
            assert_eq!(
                page.style(card, "animation-play-state").as_deref(),
                Some("running")
            );
        }
        assert_eq!(page.style(&cards[2], "animation-delay").as_deref(), Some("0.2s"));
    }

    #[test]
    fn test_no_cards() {
        let page = Rc::new(FakePage::new());
        let installed = CardAnimations::install(&env(page.clone()));
        assert!(installed.cards().is_empty());
        assert_eq!(page.observed_count(), 0);
    }
}
