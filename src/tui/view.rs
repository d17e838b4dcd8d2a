//! Pure rendering: map App state to ratatui widget trees.
//!
//! The page is laid out as one tall document of styled lines. `render()`
//! shows the slice under the current scroll offset between a fixed header
//! and a help line, with the navigation menu drawn over it when open.
//!
//! Layout never depends on reveal state: a hidden section keeps its height
//! and renders as blank rows, so revealing it does not move anything.

use ratatui::layout::{Constraint, Layout, Margin, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::reveal::Bounds;
use crate::types::{Portfolio, SectionId};

use super::palette::{palette, Palette};
use super::state::{App, Metrics, Page};

/// Columns left blank on each side of the document.
const SIDE_MARGIN: u16 = 2;

/// Narrowest column the document is wrapped to.
const MIN_WRAP_WIDTH: u16 = 16;

/// Cursor drawn after the typewriter caption.
const CARET: &str = "▌";

// ============================================================================
// DOCUMENT LAYOUT
// ============================================================================

/// The laid-out page.
#[derive(Debug, Default)]
pub struct Document {
    pub lines: Vec<Line<'static>>,
    /// First row of each section, in [`SectionId::ALL`] order.
    pub section_tops: [u16; 7],
    /// Rows occupied by each section.
    pub section_heights: [u16; 7],
}

impl Document {
    pub fn height(&self) -> u16 {
        u16::try_from(self.lines.len()).unwrap_or(u16::MAX)
    }

    /// Reveal target for one section.
    pub fn bounds_of(&self, section: SectionId) -> Bounds {
        let i = section.index();
        Bounds::new(u32::from(self.section_tops[i]), u32::from(self.section_heights[i]))
    }

    /// Reveal targets for every section, in page order.
    pub fn section_bounds(&self) -> impl Iterator<Item = (SectionId, Bounds)> + '_ {
        SectionId::ALL.iter().map(|section| (*section, self.bounds_of(*section)))
    }

    pub fn metrics(&self, viewport_height: u16, experience_count: usize) -> Metrics {
        Metrics {
            section_tops: self.section_tops,
            document_height: self.height(),
            viewport_height,
            experience_count,
        }
    }
}

/// Rows available to the document for a terminal of `height` rows.
pub fn viewport_height(height: u16) -> u16 {
    height.saturating_sub(2)
}

/// Columns the document is wrapped to for a terminal of `width` columns.
pub fn wrap_width(width: u16) -> u16 {
    width.saturating_sub(SIDE_MARGIN * 2).max(MIN_WRAP_WIDTH)
}

/// Lay out the whole page for a wrap width and viewport height.
///
/// The hero fills at least one viewport.
pub fn layout_document(app: &App, width: u16, viewport_height: u16) -> Document {
    let colors = palette(app.theme.current());
    let width = usize::from(width.max(MIN_WRAP_WIDTH));
    let mut doc = Document::default();

    let mut hero = hero_lines(&app.portfolio, app.typewriter.text(), colors, width);
    while hero.len() < usize::from(viewport_height) {
        hero.push(Line::default());
    }
    doc.lines.extend(hero);

    for section in SectionId::ALL {
        let i = section.index();
        let mut lines = section_lines(section, &app.portfolio, &app.page, colors, width);
        lines.push(Line::default());

        doc.section_tops[i] = u16::try_from(doc.lines.len()).unwrap_or(u16::MAX);
        doc.section_heights[i] = u16::try_from(lines.len()).unwrap_or(u16::MAX);

        if app.is_revealed(section) {
            doc.lines.extend(lines);
        } else {
            doc.lines.extend(std::iter::repeat_n(Line::default(), lines.len()));
        }
    }

    doc.lines.extend(footer_lines(&app.portfolio, colors));
    doc
}

// ============================================================================
// TEXT HELPERS
// ============================================================================

/// Greedy word wrap to `width` terminal columns. Words wider than a line
/// are split between characters.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in text.split_whitespace() {
        for piece in split_to_width(word, width) {
            let piece_width = piece.width();
            let needed = if current_width == 0 {
                piece_width
            } else {
                current_width + 1 + piece_width
            };
            if current_width > 0 && needed > width {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            if current_width > 0 {
                current.push(' ');
                current_width += 1;
            }
            current.push_str(&piece);
            current_width += piece_width;
        }
    }

    if current_width > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Cut a word into pieces no wider than `width` columns. A glyph wider than
/// the whole line gets a piece of its own.
fn split_to_width(word: &str, width: usize) -> Vec<String> {
    if word.width() <= width {
        return vec![word.to_string()];
    }
    let mut pieces = Vec::new();
    let mut piece = String::new();
    let mut piece_width = 0;
    for c in word.chars() {
        let w = c.width().unwrap_or(0);
        if piece_width > 0 && piece_width + w > width {
            pieces.push(std::mem::take(&mut piece));
            piece_width = 0;
        }
        piece.push(c);
        piece_width += w;
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}

fn styled_wrap(text: &str, style: Style, width: usize) -> Vec<Line<'static>> {
    wrap(text, width)
        .into_iter()
        .map(|l| Line::from(Span::styled(l, style)))
        .collect()
}

/// Wrap with a bullet on the first line and a hanging indent after it.
fn bullet_wrap(bullet: &str, text: &str, colors: &Palette, width: usize) -> Vec<Line<'static>> {
    let indent = bullet.width();
    wrap(text, width.saturating_sub(indent))
        .into_iter()
        .enumerate()
        .map(|(i, l)| {
            let lead = if i == 0 {
                Span::styled(bullet.to_string(), colors.accent)
            } else {
                Span::raw(" ".repeat(indent))
            };
            Line::from(vec![lead, Span::styled(l, colors.text)])
        })
        .collect()
}

/// Pack short labels into lines of padded chips.
fn chip_lines(items: &[String], style: Style, width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut used = 0;

    for item in items {
        let chip = format!(" {} ", item);
        let len = chip.width();
        let gap = if spans.is_empty() { 0 } else { 1 };
        if !spans.is_empty() && used + gap + len > width {
            lines.push(Line::from(std::mem::take(&mut spans)));
            used = 0;
        }
        if !spans.is_empty() {
            spans.push(Span::raw(" "));
            used += 1;
        }
        spans.push(Span::styled(chip, style));
        used += len;
    }
    if !spans.is_empty() {
        lines.push(Line::from(spans));
    }
    lines
}

// ============================================================================
// HERO
// ============================================================================

fn hero_lines(portfolio: &Portfolio, caption: &str, colors: &Palette, width: usize) -> Vec<Line<'static>> {
    let profile = &portfolio.profile;
    let mut lines = vec![
        Line::default(),
        Line::from(Span::styled(profile.greeting.clone(), colors.accent)),
        Line::from(Span::styled(profile.name.clone(), colors.title)),
        Line::from(vec![
            Span::styled(caption.to_string(), colors.heading),
            Span::styled(CARET, colors.accent),
        ]),
        Line::default(),
    ];
    lines.extend(styled_wrap(&profile.summary, colors.text, width));
    lines.push(Line::default());
    lines.push(Line::from(vec![
        Span::styled("[7]", colors.accent),
        Span::styled(" Contact me", colors.dim),
    ]));
    lines
}

// ============================================================================
// SECTIONS
// ============================================================================

fn section_lines(
    section: SectionId,
    portfolio: &Portfolio,
    page: &Page,
    colors: &Palette,
    width: usize,
) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!("{:02}. ", section.index() + 1), colors.accent),
            Span::styled(section.title(), colors.heading),
        ]),
        Line::from(Span::styled("─".repeat(width.min(40)), colors.dim)),
    ];

    match section {
        SectionId::About => {
            for (i, paragraph) in portfolio.profile.about.iter().enumerate() {
                if i > 0 {
                    lines.push(Line::default());
                }
                lines.extend(styled_wrap(paragraph, colors.text, width));
            }
            if let Some(resume) = &portfolio.profile.resume_file {
                lines.push(Line::default());
                lines.push(Line::from(vec![
                    Span::styled("Résumé: ", colors.dim),
                    Span::styled(resume.clone(), colors.accent),
                ]));
            }
        }
        SectionId::Skills => {
            for (i, category) in portfolio.skills.iter().enumerate() {
                if i > 0 {
                    lines.push(Line::default());
                }
                lines.push(Line::from(Span::styled(category.title.clone(), colors.title)));
                lines.extend(chip_lines(&category.skills, colors.tag, width));
            }
        }
        SectionId::Experience => experience_lines(portfolio, page, colors, width, &mut lines),
        SectionId::Projects => {
            for (i, project) in portfolio.projects.iter().enumerate() {
                if i > 0 {
                    lines.push(Line::default());
                }
                lines.push(Line::from(Span::styled(project.title.clone(), colors.title)));
                lines.extend(styled_wrap(&project.description, colors.text, width));
                lines.extend(chip_lines(&project.tags, colors.tag, width));
            }
        }
        SectionId::Certifications => {
            for cert in &portfolio.certifications {
                lines.extend(bullet_wrap("✓ ", &cert.name, colors, width));
                lines.push(Line::from(Span::styled(format!("  {}", cert.issuer), colors.dim)));
            }
        }
        SectionId::Education => {
            for edu in &portfolio.education {
                lines.push(Line::from(Span::styled(edu.degree.clone(), colors.title)));
                lines.push(Line::from(Span::styled(
                    format!("{} · {}", edu.institution, edu.period),
                    colors.dim,
                )));
            }
        }
        SectionId::Contact => {
            let contact = &portfolio.contact;
            lines.extend(styled_wrap(&contact.message, colors.text, width));
            lines.push(Line::default());
            lines.push(Line::from(vec![
                Span::styled("Email  ", colors.dim),
                Span::styled(contact.email.clone(), colors.accent),
            ]));
            if let Some(phone) = &contact.phone {
                lines.push(Line::from(vec![
                    Span::styled("Phone  ", colors.dim),
                    Span::styled(phone.clone(), colors.accent),
                ]));
            }
        }
    }

    lines
}

fn experience_lines(
    portfolio: &Portfolio,
    page: &Page,
    colors: &Palette,
    width: usize,
    lines: &mut Vec<Line<'static>>,
) {
    if portfolio.experience.is_empty() {
        return;
    }
    let active = page.active_experience.min(portfolio.experience.len() - 1);

    let mut tabs = Vec::new();
    for (i, entry) in portfolio.experience.iter().enumerate() {
        if i > 0 {
            tabs.push(Span::styled(" │ ", colors.dim));
        }
        let style = if i == active { colors.active_tab } else { colors.inactive_tab };
        tabs.push(Span::styled(entry.company.clone(), style));
    }
    lines.push(Line::from(tabs));
    lines.push(Line::default());

    let entry = &portfolio.experience[active];
    lines.push(Line::from(vec![
        Span::styled(entry.role.clone(), colors.title),
        Span::styled(format!(" @ {}", entry.company), colors.accent),
    ]));
    lines.push(Line::from(Span::styled(entry.period.clone(), colors.dim)));
    for point in &entry.points {
        lines.extend(bullet_wrap("▸ ", point, colors, width));
    }
}

fn footer_lines(portfolio: &Portfolio, colors: &Palette) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        format!("© {}", portfolio.profile.name),
        colors.dim,
    ))];
    if let Some(credit) = &portfolio.footer_credit {
        lines.push(Line::from(Span::styled(credit.clone(), colors.dim)));
    }
    lines
}

// ============================================================================
// FRAME
// ============================================================================

/// Render the page to the terminal frame.
pub fn render(app: &App, frame: &mut Frame) {
    let area = frame.area();
    let colors = palette(app.theme.current());

    // Common layout: header at top, document in middle, help at bottom
    let chunks = Layout::vertical([
        Constraint::Length(1), // header
        Constraint::Min(0),    // document
        Constraint::Length(1), // help
    ])
    .split(area);

    frame.render_widget(Block::default().style(colors.base), area);
    frame.render_widget(render_header(app, colors, chunks[0].width), chunks[0]);
    frame.render_widget(render_help(colors), chunks[2]);

    let body = chunks[1].inner(Margin {
        horizontal: SIDE_MARGIN,
        vertical: 0,
    });
    let doc = layout_document(app, wrap_width(area.width), viewport_height(area.height));
    let visible: Vec<Line<'static>> = doc
        .lines
        .into_iter()
        .skip(usize::from(app.page.scroll))
        .take(usize::from(body.height))
        .collect();
    frame.render_widget(Paragraph::new(visible).style(colors.base), body);

    if app.page.menu_open {
        render_menu(colors, frame, chunks[1]);
    }
}

/// Header: initials, section links (or a menu hint when narrow), theme mark.
fn render_header(app: &App, colors: &Palette, width: u16) -> Paragraph<'static> {
    let style = if app.page.header_elevated() {
        colors.header_elevated
    } else {
        colors.header
    };
    let theme_mark = if app.theme.current().is_dark() { "☾" } else { "☀" };

    let mut nav: Vec<Span<'static>> = Vec::new();
    for section in SectionId::ALL {
        nav.push(Span::styled(format!(" {}", section.index() + 1), colors.accent));
        nav.push(Span::raw(format!(" {}", section.label())));
    }
    let nav_len: usize = nav.iter().map(Span::width).sum();

    let initials = format!(" {} ", app.portfolio.profile.initials);
    // initials, nav, theme mark and spacing
    let fits = initials.width() + nav_len + 4 <= usize::from(width);

    let mut spans = vec![Span::styled(initials, colors.accent)];
    if fits {
        spans.extend(nav);
    } else {
        spans.push(Span::styled(" [m]", colors.accent));
        spans.push(Span::raw(" Menu"));
    }
    spans.push(Span::raw(format!("  {}", theme_mark)));

    Paragraph::new(Line::from(spans)).style(style)
}

fn render_help(colors: &Palette) -> Paragraph<'static> {
    Paragraph::new(Span::styled(
        "[j/k] scroll  [1-7] jump  [h/l] tabs  [t] theme  [m] menu  [q] quit",
        colors.help,
    ))
}

/// Navigation overlay anchored to the top right of the document.
fn render_menu(colors: &Palette, frame: &mut Frame, area: Rect) {
    let height = (SectionId::ALL.len() as u16 + 2).min(area.height);
    let width = 24.min(area.width);
    let menu_area = Rect {
        x: area.x + area.width - width,
        y: area.y,
        width,
        height,
    };

    let items: Vec<Line<'static>> = SectionId::ALL
        .iter()
        .map(|section| {
            Line::from(vec![
                Span::styled(format!(" {}  ", section.index() + 1), colors.accent),
                Span::raw(section.label()),
            ])
        })
        .collect();

    frame.render_widget(Clear, menu_area);
    frame.render_widget(
        Paragraph::new(items)
            .style(colors.menu)
            .block(Block::default().borders(Borders::ALL).title(" Menu ")),
        menu_area,
    );
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::builtin_portfolio;
    use crate::reveal::{RootMargin, TerminalViewport};
    use crate::theme::{FixedSignal, MemoryStore, ThemeController};
    use crate::types::ThemePreference;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::time::Instant;

    fn make_terminal(width: u16, height: u16) -> Terminal<TestBackend> {
        let backend = TestBackend::new(width, height);
        Terminal::new(backend).unwrap()
    }

    fn make_app() -> App {
        let theme = ThemeController::new(Box::new(MemoryStore::new()), Box::new(FixedSignal(None)));
        App::new(builtin_portfolio().unwrap(), theme, TerminalViewport::new(0, 22))
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    // -- wrap --

    #[test]
    fn wrap_breaks_on_words() {
        assert_eq!(wrap("the quick brown fox", 10), vec!["the quick", "brown fox"]);
    }

    #[test]
    fn wrap_splits_overlong_words() {
        assert_eq!(wrap("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn wrap_empty_text_is_one_blank_line() {
        assert_eq!(wrap("", 10), vec![String::new()]);
    }

    #[test]
    fn wrap_counts_characters_not_bytes() {
        assert_eq!(wrap("résumé café", 6), vec!["résumé", "café"]);
    }

    #[test]
    fn wrap_measures_wide_glyphs_in_columns() {
        let lines = wrap("漢字漢字漢字 漢字", 6);
        assert!(lines.iter().all(|l| Line::from(l.clone()).width() <= 6));
        assert_eq!(lines, vec!["漢字漢", "字漢字", "漢字"]);
    }

    #[test]
    fn wrap_gives_oversized_glyph_its_own_line() {
        assert_eq!(wrap("a漢b", 1), vec!["a", "漢", "b"]);
    }

    #[test]
    fn chips_pack_wide_labels_by_columns() {
        let items: Vec<String> = ["漢字", "漢字"].iter().map(|s| s.to_string()).collect();
        // each chip is 6 columns wide, two do not fit in 10
        let lines = chip_lines(&items, Style::new(), 10);
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.width() <= 10));
    }

    #[test]
    fn wide_content_sizes_section_by_columns() {
        let mut app = make_app();
        let i = SectionId::Contact.index();
        app.portfolio.contact.message = "a".into();
        let short = layout_document(&app, 40, 20).section_heights[i];
        // 80 columns of text at a 40 column wrap
        app.portfolio.contact.message = "漢".repeat(40);
        let wide = layout_document(&app, 40, 20).section_heights[i];
        assert_eq!(wide, short + 1);
    }

    #[test]
    fn chips_pack_into_width() {
        let items: Vec<String> = ["ab", "cd", "ef"].iter().map(|s| s.to_string()).collect();
        // " ab " + " " + " cd " = 9 columns, the third chip wraps
        let lines = chip_lines(&items, Style::new(), 10);
        assert_eq!(lines.len(), 2);
        assert_eq!(line_text(&lines[0]), " ab   cd ");
    }

    // -- layout --

    #[test]
    fn hero_fills_the_viewport() {
        let app = make_app();
        let doc = layout_document(&app, 60, 40);
        assert!(doc.section_tops[0] >= 40);
    }

    #[test]
    fn sections_are_in_page_order() {
        let app = make_app();
        let doc = layout_document(&app, 60, 20);
        assert!(doc.section_tops.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(doc.metrics(20, 3).top_of(SectionId::Skills), doc.section_tops[1]);
    }

    #[test]
    fn hidden_sections_keep_their_height() {
        let mut app = make_app();
        let shown = layout_document(&app, 60, 20);

        let handle = app.revealer.observe(Bounds::new(10_000, 10), RootMargin(0));
        app.reveals.push((SectionId::Projects, handle));
        let hidden = layout_document(&app, 60, 20);

        assert_eq!(shown.lines.len(), hidden.lines.len());
        assert_eq!(shown.section_tops, hidden.section_tops);
        let i = SectionId::Projects.index();
        let top = usize::from(hidden.section_tops[i]);
        let rows = usize::from(hidden.section_heights[i]);
        assert!(hidden.lines[top..top + rows].iter().all(|l| line_text(l).is_empty()));
        assert!(line_text(&shown.lines[top]).contains("Key Initiatives"));
    }

    #[test]
    fn experience_shows_only_active_tab() {
        let mut app = make_app();
        app.page.active_experience = 1;
        let doc = layout_document(&app, 80, 20);
        let text: Vec<String> = doc.lines.iter().map(line_text).collect();
        let second = &app.portfolio.experience[1];
        let first = &app.portfolio.experience[0];
        assert!(text.iter().any(|l| l.contains(&format!("{} @ {}", second.role, second.company))));
        assert!(!text.iter().any(|l| l.contains(&format!("{} @ {}", first.role, first.company))));
    }

    #[test]
    fn caption_follows_typewriter() {
        let mut app = make_app();
        let t0 = Instant::now();
        app.typewriter.start(t0);
        app.typewriter.fire_next();
        app.typewriter.fire_next();
        let doc = layout_document(&app, 60, 20);
        let caption = line_text(&doc.lines[3]);
        assert_eq!(caption, format!("{}{}", app.typewriter.text(), CARET));
        assert_eq!(app.typewriter.text().chars().count(), 2);
    }

    #[test]
    fn section_bounds_cover_each_section() {
        let app = make_app();
        let doc = layout_document(&app, 60, 20);
        let bounds: Vec<(SectionId, Bounds)> = doc.section_bounds().collect();
        assert_eq!(bounds.len(), 7);
        assert_eq!(bounds[0].1.top, u32::from(doc.section_tops[0]));
        assert!(bounds.iter().all(|(_, b)| b.height > 2));
    }

    // -- frame --

    #[test]
    fn page_renders_without_panic() {
        let mut terminal = make_terminal(80, 24);
        let app = make_app();
        terminal
            .draw(|frame| render(&app, frame))
            .expect("render should not panic");
    }

    #[test]
    fn tiny_terminal_renders_without_panic() {
        let mut terminal = make_terminal(10, 3);
        let mut app = make_app();
        app.page.menu_open = true;
        terminal
            .draw(|frame| render(&app, frame))
            .expect("render should not panic");
    }

    #[test]
    fn top_of_page_shows_name_and_nav() {
        let mut terminal = make_terminal(120, 24);
        let app = make_app();
        terminal.draw(|frame| render(&app, frame)).unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("Samuel Owusu"));
        assert!(text.contains("1 About"));
        assert!(text.contains("[q] quit"));
    }

    #[test]
    fn narrow_header_offers_menu() {
        let mut terminal = make_terminal(40, 24);
        let app = make_app();
        terminal.draw(|frame| render(&app, frame)).unwrap();
        let first_row: String = screen_text(&terminal).lines().next().unwrap_or("").to_string();
        assert!(first_row.contains("[m] Menu"));
    }

    #[test]
    fn menu_overlay_lists_sections() {
        let mut terminal = make_terminal(80, 24);
        let mut app = make_app();
        app.page.menu_open = true;
        terminal.draw(|frame| render(&app, frame)).unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("Menu"));
        assert!(text.contains("Certifications"));
    }

    #[test]
    fn scrolled_page_shows_section_heading() {
        let mut terminal = make_terminal(80, 24);
        let mut app = make_app();
        let doc = layout_document(&app, wrap_width(80), viewport_height(24));
        app.page.scroll = doc.section_tops[SectionId::Education.index()];
        terminal.draw(|frame| render(&app, frame)).unwrap();
        assert!(screen_text(&terminal).contains("Education"));
    }

    #[test]
    fn dark_theme_paints_dark_background() {
        let mut terminal = make_terminal(40, 10);
        let mut app = make_app();
        app.theme.apply_theme(ThemePreference::Dark);
        terminal.draw(|frame| render(&app, frame)).unwrap();
        let buffer = terminal.backend().buffer();
        assert_eq!(Some(buffer[(20, 5)].bg), palette(ThemePreference::Dark).base.bg);
    }
}
