//! Pure state transitions: (Page, Action) → Transition.
//!
//! Fully testable without a terminal. The page geometry is read-only input;
//! scroll positions are always clamped to it.

use crate::types::SectionId;

use super::state::{Action, Effect, Metrics, Page, Transition};

/// Pure state transition function.
///
/// Given the current page, an action, and the current document geometry,
/// produces the next transition. The effects boundary interprets the result.
pub fn update(page: Page, action: &Action, metrics: &Metrics) -> Transition {
    let max = metrics.max_scroll();

    match action {
        Action::ScrollDown => {
            let scroll = page.scroll.saturating_add(1);
            scroll_to(page, scroll, max)
        }
        Action::ScrollUp => {
            let scroll = page.scroll.saturating_sub(1);
            scroll_to(page, scroll, max)
        }
        Action::PageDown => {
            let scroll = page.scroll.saturating_add(page_step(metrics));
            scroll_to(page, scroll, max)
        }
        Action::PageUp => {
            let scroll = page.scroll.saturating_sub(page_step(metrics));
            scroll_to(page, scroll, max)
        }
        Action::Top => scroll_to(page, 0, max),
        Action::Bottom => scroll_to(page, max, max),
        Action::NumberKey(n) => match SectionId::from_number(*n) {
            Some(section) => {
                let jumped = Page {
                    menu_open: false,
                    ..page
                };
                scroll_to(jumped, metrics.top_of(section), max)
            }
            None => Transition::Page(page),
        },
        Action::ToggleMenu => Transition::Page(Page {
            menu_open: !page.menu_open,
            ..page
        }),
        Action::Back => Transition::Page(Page {
            menu_open: false,
            ..page
        }),
        Action::NextTab => {
            let count = metrics.experience_count;
            let active_experience = if count == 0 {
                0
            } else {
                (page.active_experience + 1) % count
            };
            Transition::Page(Page {
                active_experience,
                ..page
            })
        }
        Action::PrevTab => {
            let count = metrics.experience_count;
            let active_experience = match count {
                0 => 0,
                _ if page.active_experience == 0 => count - 1,
                _ => (page.active_experience - 1).min(count - 1),
            };
            Transition::Page(Page {
                active_experience,
                ..page
            })
        }
        Action::ToggleTheme => Transition::Effect(Effect::ToggleTheme),
        Action::Quit => Transition::Quit,
    }
}

// ============================================================================
// HELPERS
// ============================================================================

/// One viewport minus a line of overlap, at least one row.
fn page_step(metrics: &Metrics) -> u16 {
    metrics.viewport_height.saturating_sub(1).max(1)
}

fn scroll_to(page: Page, scroll: u16, max: u16) -> Transition {
    Transition::Page(Page {
        scroll: scroll.min(max),
        ..page
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> Metrics {
        Metrics {
            section_tops: [30, 45, 60, 90, 110, 120, 130],
            document_height: 150,
            viewport_height: 20,
            experience_count: 3,
        }
    }

    fn page_at(scroll: u16) -> Page {
        Page {
            scroll,
            ..Page::default()
        }
    }

    fn expect_page(transition: Transition) -> Page {
        match transition {
            Transition::Page(page) => page,
            other => panic!("Expected Page, got {:?}", other),
        }
    }

    // -- Scrolling --

    #[test]
    fn scroll_down_moves_one_row() {
        let page = expect_page(update(page_at(0), &Action::ScrollDown, &metrics()));
        assert_eq!(page.scroll, 1);
    }

    #[test]
    fn scroll_up_at_top_stays() {
        let page = expect_page(update(page_at(0), &Action::ScrollUp, &metrics()));
        assert_eq!(page.scroll, 0);
    }

    #[test]
    fn scroll_down_clamps_at_bottom() {
        let m = metrics();
        let page = expect_page(update(page_at(m.max_scroll()), &Action::ScrollDown, &m));
        assert_eq!(page.scroll, 130);
    }

    #[test]
    fn page_down_keeps_one_line_of_overlap() {
        let page = expect_page(update(page_at(10), &Action::PageDown, &metrics()));
        assert_eq!(page.scroll, 29);
        let page = expect_page(update(page, &Action::PageUp, &metrics()));
        assert_eq!(page.scroll, 10);
    }

    #[test]
    fn page_step_is_at_least_one_row() {
        let m = Metrics {
            viewport_height: 1,
            document_height: 10,
            ..metrics()
        };
        let page = expect_page(update(page_at(0), &Action::PageDown, &m));
        assert_eq!(page.scroll, 1);
    }

    #[test]
    fn top_and_bottom_jump_to_ends() {
        let page = expect_page(update(page_at(50), &Action::Bottom, &metrics()));
        assert_eq!(page.scroll, 130);
        let page = expect_page(update(page, &Action::Top, &metrics()));
        assert_eq!(page.scroll, 0);
    }

    #[test]
    fn short_document_never_scrolls() {
        let m = Metrics {
            document_height: 10,
            viewport_height: 40,
            ..metrics()
        };
        let page = expect_page(update(page_at(0), &Action::PageDown, &m));
        assert_eq!(page.scroll, 0);
    }

    // -- Section navigation --

    #[test]
    fn number_key_jumps_to_section() {
        let page = expect_page(update(page_at(0), &Action::NumberKey(3), &metrics()));
        assert_eq!(page.scroll, 60);
    }

    #[test]
    fn number_key_clamps_to_max_scroll() {
        let page = expect_page(update(page_at(0), &Action::NumberKey(7), &metrics()));
        assert_eq!(page.scroll, 130);
    }

    #[test]
    fn number_key_closes_menu() {
        let open = Page {
            menu_open: true,
            ..Page::default()
        };
        let page = expect_page(update(open, &Action::NumberKey(1), &metrics()));
        assert!(!page.menu_open);
        assert_eq!(page.scroll, 30);
    }

    #[test]
    fn out_of_range_number_is_noop() {
        let start = page_at(12);
        let page = expect_page(update(start.clone(), &Action::NumberKey(9), &metrics()));
        assert_eq!(page, start);
    }

    // -- Menu --

    #[test]
    fn toggle_menu_flips() {
        let page = expect_page(update(Page::default(), &Action::ToggleMenu, &metrics()));
        assert!(page.menu_open);
        let page = expect_page(update(page, &Action::ToggleMenu, &metrics()));
        assert!(!page.menu_open);
    }

    #[test]
    fn back_closes_menu_and_keeps_scroll() {
        let open = Page {
            scroll: 7,
            menu_open: true,
            ..Page::default()
        };
        let page = expect_page(update(open, &Action::Back, &metrics()));
        assert!(!page.menu_open);
        assert_eq!(page.scroll, 7);
    }

    // -- Experience tabs --

    #[test]
    fn next_tab_wraps_around() {
        let page = Page {
            active_experience: 2,
            ..Page::default()
        };
        let page = expect_page(update(page, &Action::NextTab, &metrics()));
        assert_eq!(page.active_experience, 0);
    }

    #[test]
    fn prev_tab_wraps_to_last() {
        let page = expect_page(update(Page::default(), &Action::PrevTab, &metrics()));
        assert_eq!(page.active_experience, 2);
    }

    #[test]
    fn tabs_without_experience_stay_at_zero() {
        let m = Metrics {
            experience_count: 0,
            ..metrics()
        };
        let page = expect_page(update(Page::default(), &Action::NextTab, &m));
        assert_eq!(page.active_experience, 0);
        let page = expect_page(update(page, &Action::PrevTab, &m));
        assert_eq!(page.active_experience, 0);
    }

    // -- Effects --

    #[test]
    fn toggle_theme_requests_effect() {
        let result = update(page_at(4), &Action::ToggleTheme, &metrics());
        assert_eq!(result, Transition::Effect(Effect::ToggleTheme));
    }

    #[test]
    fn quit_from_anywhere() {
        let open = Page {
            menu_open: true,
            ..Page::default()
        };
        assert_eq!(update(open, &Action::Quit, &metrics()), Transition::Quit);
    }
}
