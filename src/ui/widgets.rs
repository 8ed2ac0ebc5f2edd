//! Custom TUI widgets

use super::theme::ThemeColors;
use crate::keyboard::KeyEventTracker;
use crate::typing::{EngineStatus, ResultLog, TypingEngine, WordState};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Widget},
};
use std::ops::Range;
use std::time::Instant;

fn panel<'a>(title: &'a str, colors: &ThemeColors) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.dim))
        .title_style(Style::default().fg(colors.accent).add_modifier(Modifier::BOLD))
}

/// Four stat cards for the keyboard tester
pub struct InfoPanel<'a> {
    tracker: &'a KeyEventTracker,
    now: Instant,
    colors: ThemeColors,
}

impl<'a> InfoPanel<'a> {
    pub fn new(tracker: &'a KeyEventTracker, now: Instant, colors: ThemeColors) -> Self {
        Self {
            tracker,
            now,
            colors,
        }
    }

    fn cards(&self) -> [(&'static str, String, String, bool); 4] {
        let state = self.tracker.state();
        let (last, last_sub) = match &state.last_event {
            Some(event) => (
                event.code.to_string(),
                format!("Code: {}", event.numeric_code),
            ),
            None => ("-".to_string(), String::new()),
        };
        let active = self.tracker.active_count();
        [
            ("LAST KEY", last, last_sub, true),
            (
                "ACTIVE KEYS",
                active.to_string(),
                "NKRO Count".to_string(),
                active > 0,
            ),
            (
                "SPEED",
                format!("{:.1}", self.tracker.throughput(self.now)),
                "Keys / Sec".to_string(),
                false,
            ),
            (
                "TOTAL TESTED",
                self.tracker.tested_count().to_string(),
                "Unique Keys".to_string(),
                false,
            ),
        ]
    }
}

impl<'a> Widget for InfoPanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let card_w = area.width / 4;
        if card_w < 8 || area.height < 3 {
            return;
        }

        for (i, (label, value, sub, highlight)) in self.cards().into_iter().enumerate() {
            let rect = Rect::new(area.x + card_w * i as u16, area.y, card_w, area.height);
            let border = if highlight {
                self.colors.accent
            } else {
                self.colors.dim
            };
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border));
            let inner = block.inner(rect);
            block.render(rect, buf);

            let lines = [
                (label, Style::default().fg(self.colors.dim)),
                (
                    value.as_str(),
                    Style::default()
                        .fg(self.colors.accent)
                        .add_modifier(Modifier::BOLD),
                ),
                (sub.as_str(), Style::default().fg(self.colors.dim)),
            ];
            for (row, (text, style)) in lines.into_iter().enumerate() {
                if row as u16 >= inner.height {
                    break;
                }
                let text: String = text.chars().take(inner.width as usize).collect();
                let x = inner.x + (inner.width.saturating_sub(text.chars().count() as u16)) / 2;
                buf.set_string(x, inner.y + row as u16, &text, style);
            }
        }
    }
}

/// Newest-first key history
pub struct HistoryPanel<'a> {
    tracker: &'a KeyEventTracker,
    colors: ThemeColors,
}

impl<'a> HistoryPanel<'a> {
    pub fn new(tracker: &'a KeyEventTracker, colors: ThemeColors) -> Self {
        Self { tracker, colors }
    }
}

impl<'a> Widget for HistoryPanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let log = &self.tracker.state().event_log;
        let title = format!("Key History ({} events)", log.len());
        let block = panel(&title, &self.colors);
        let inner = block.inner(area);
        block.render(area, buf);

        if log.is_empty() {
            buf.set_string(
                inner.x + 1,
                inner.y,
                "No keys pressed yet",
                Style::default().fg(self.colors.dim),
            );
            return;
        }

        for (row, event) in log.iter().take(inner.height as usize).enumerate() {
            let time = event.wall_time.format("%H:%M:%S%.3f").to_string();
            let line = Line::from(vec![
                Span::styled(
                    format!(" {:^7} ", event.display_label()),
                    Style::default()
                        .fg(self.colors.accent)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("{:<16}", event.code.as_str()),
                    Style::default().fg(self.colors.fg),
                ),
                Span::styled(time, Style::default().fg(self.colors.dim)),
            ]);
            buf.set_line(inner.x, inner.y + row as u16, &line, inner.width);
        }
    }
}

/// Split `words` into lines no wider than `width` cells, as index ranges
pub fn wrap_words(words: &[String], width: u16) -> Vec<Range<usize>> {
    let width = width.max(1) as usize;
    let mut lines = Vec::new();
    let mut start = 0;
    let mut used = 0;

    for (i, word) in words.iter().enumerate() {
        let len = word.chars().count();
        let needed = if used == 0 { len } else { used + 1 + len };
        if needed > width && used > 0 {
            lines.push(start..i);
            start = i;
            used = len;
        } else {
            used = needed;
        }
    }
    if start < words.len() {
        lines.push(start..words.len());
    }
    lines
}

/// Speed test view: stats header, word stream and overlays
pub struct SpeedTestPanel<'a> {
    engine: &'a TypingEngine,
    colors: ThemeColors,
}

impl<'a> SpeedTestPanel<'a> {
    pub fn new(engine: &'a TypingEngine, colors: ThemeColors) -> Self {
        Self { engine, colors }
    }

    fn header(&self) -> Line<'static> {
        let stats = self.engine.stats();
        let remaining = self.engine.time_remaining();
        let dim = Style::default().fg(self.colors.dim);
        let label = |text: &str| Span::styled(text.to_string(), dim);
        let value = |text: String| {
            Span::styled(
                text,
                Style::default()
                    .fg(self.colors.accent)
                    .add_modifier(Modifier::BOLD),
            )
        };
        Line::from(vec![
            label(" WPM "),
            value(stats.wpm.to_string()),
            label("   ACC "),
            value(format!("{}%", stats.accuracy_percent)),
            label("   TIME "),
            value(format!("{}:{:02}", remaining / 60, remaining % 60)),
            label(&format!(
                "   {} / {}s / {}",
                self.engine.difficulty().name(),
                self.engine.time_limit().secs(),
                self.engine.status().name()
            )),
        ])
    }

    /// Spans for the word under the cursor, coloured per typed character
    fn current_word_spans(&self) -> Vec<Span<'static>> {
        let target: Vec<char> = self.engine.current_word().chars().collect();
        let typed: Vec<char> = self.engine.current_input().chars().collect();
        let mut spans = Vec::with_capacity(target.len().max(typed.len()));

        for i in 0..target.len().max(typed.len()) {
            let (ch, style) = match (typed.get(i), target.get(i)) {
                (Some(t), Some(e)) if t == e => (*e, Style::default().fg(self.colors.correct)),
                (Some(_), Some(e)) => (*e, Style::default().fg(self.colors.incorrect)),
                (Some(t), None) => (
                    *t,
                    Style::default()
                        .fg(self.colors.incorrect)
                        .add_modifier(Modifier::CROSSED_OUT),
                ),
                (None, Some(e)) => (*e, Style::default().fg(self.colors.fg)),
                (None, None) => break,
            };
            let style = if i == typed.len() {
                style.add_modifier(Modifier::UNDERLINED)
            } else {
                style
            };
            spans.push(Span::styled(ch.to_string(), style));
        }
        spans
    }

    fn word_spans(&self, index: usize) -> Vec<Span<'static>> {
        let word = &self.engine.words()[index];
        let style = match self.engine.word_state(index) {
            WordState::Current => return self.current_word_spans(),
            WordState::Correct => Style::default().fg(self.colors.correct),
            WordState::Incorrect => Style::default()
                .fg(self.colors.incorrect)
                .add_modifier(Modifier::UNDERLINED),
            WordState::Pending => Style::default().fg(self.colors.dim),
        };
        vec![Span::styled(word.clone(), style)]
    }

    fn render_overlay(&self, area: Rect, buf: &mut Buffer, lines: &[(String, Style)]) {
        let width = lines
            .iter()
            .map(|(text, _)| text.chars().count() as u16)
            .max()
            .unwrap_or(0)
            + 4;
        let height = lines.len() as u16 + 2;
        if width > area.width || height > area.height {
            return;
        }
        let rect = Rect::new(
            area.x + (area.width - width) / 2,
            area.y + (area.height - height) / 2,
            width,
            height,
        );
        Clear.render(rect, buf);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.colors.accent))
            .style(Style::default().bg(self.colors.bg));
        let inner = block.inner(rect);
        block.render(rect, buf);
        for (row, (text, style)) in lines.iter().enumerate() {
            let x = inner.x + (inner.width.saturating_sub(text.chars().count() as u16)) / 2;
            buf.set_string(x, inner.y + row as u16, text, *style);
        }
    }
}

impl<'a> Widget for SpeedTestPanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = panel("Speed Test", &self.colors);
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height < 3 || inner.width < 20 {
            return;
        }

        buf.set_line(inner.x, inner.y, &self.header(), inner.width);

        let text_area = Rect::new(inner.x + 1, inner.y + 2, inner.width - 2, inner.height - 2);
        let words = self.engine.words();
        let cursor = self.engine.cursor_index();
        let lines = wrap_words(words, text_area.width);
        let current_line = lines
            .iter()
            .position(|range| range.contains(&cursor))
            .unwrap_or(0);
        let first = current_line.saturating_sub(1);

        for (row, range) in lines
            .iter()
            .skip(first)
            .take(text_area.height as usize)
            .enumerate()
        {
            let mut spans = Vec::new();
            for index in range.clone() {
                if index > range.start {
                    spans.push(Span::raw(" "));
                }
                spans.extend(self.word_spans(index));
            }
            buf.set_line(
                text_area.x,
                text_area.y + row as u16,
                &Line::from(spans),
                text_area.width,
            );
        }

        match self.engine.status() {
            EngineStatus::Idle if cursor == 0 => {
                let hint = "Start typing to begin";
                buf.set_string(
                    inner.x + inner.width.saturating_sub(hint.len() as u16 + 1),
                    inner.y,
                    hint,
                    Style::default().fg(self.colors.dim),
                );
            }
            EngineStatus::Paused => {
                let style = Style::default()
                    .fg(self.colors.warn)
                    .add_modifier(Modifier::BOLD);
                self.render_overlay(
                    inner,
                    buf,
                    &[
                        ("PAUSED".to_string(), style),
                        (
                            "Press Esc to resume".to_string(),
                            Style::default().fg(self.colors.dim),
                        ),
                    ],
                );
            }
            EngineStatus::Finished => {
                let stats = self.engine.stats();
                let big = Style::default()
                    .fg(self.colors.accent)
                    .add_modifier(Modifier::BOLD);
                let dim = Style::default().fg(self.colors.dim);
                self.render_overlay(
                    inner,
                    buf,
                    &[
                        ("Test Complete".to_string(), big),
                        (format!("{} WPM", stats.wpm), big),
                        (format!("{}% accuracy", stats.accuracy_percent), big),
                        (
                            format!(
                                "{} correct / {} incorrect chars",
                                stats.correct_chars, stats.incorrect_chars
                            ),
                            dim,
                        ),
                        ("Press Enter to play again".to_string(), dim),
                    ],
                );
            }
            _ => {}
        }
    }
}

/// Recent speed test results
pub struct ResultsPanel<'a> {
    results: &'a ResultLog,
    colors: ThemeColors,
}

impl<'a> ResultsPanel<'a> {
    pub fn new(results: &'a ResultLog, colors: ThemeColors) -> Self {
        Self { results, colors }
    }
}

impl<'a> Widget for ResultsPanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = match self.results.best_wpm() {
            Some(best) => format!("Recent Results (best {best} wpm)"),
            None => "Recent Results".to_string(),
        };
        let block = panel(&title, &self.colors);
        let inner = block.inner(area);
        block.render(area, buf);

        if self.results.is_empty() {
            buf.set_string(
                inner.x + 1,
                inner.y,
                "No finished tests yet",
                Style::default().fg(self.colors.dim),
            );
            return;
        }

        for (row, result) in self.results.iter().take(inner.height as usize).enumerate() {
            let line = Line::from(vec![
                Span::styled(
                    format!(" {} ", result.finished_at.format("%H:%M:%S")),
                    Style::default().fg(self.colors.dim),
                ),
                Span::styled(
                    format!("{:>4} wpm ", result.wpm),
                    Style::default()
                        .fg(self.colors.accent)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("{:>3}% ", result.accuracy_percent),
                    Style::default().fg(self.colors.correct),
                ),
                Span::styled(
                    format!(
                        "{} {}s, {} words",
                        result.difficulty, result.time_limit, result.words_committed
                    ),
                    Style::default().fg(self.colors.fg),
                ),
            ]);
            buf.set_line(inner.x, inner.y + row as u16, &line, inner.width);
        }
    }
}

/// Widget for the help screen
pub struct HelpPanel {
    colors: ThemeColors,
}

impl HelpPanel {
    pub fn new(colors: ThemeColors) -> Self {
        Self { colors }
    }
}

impl Widget for HelpPanel {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = panel("Help - KeyDeck", &self.colors);
        let inner = block.inner(area);
        block.render(area, buf);

        let help_text = [
            " COMMANDS",
            " Ctrl+T  switch mode        Ctrl+R  reset",
            " Ctrl+L  next layout        Ctrl+S  sound profile",
            " Ctrl+G  RGB mode           Ctrl+D  dark/light theme",
            " Ctrl+E  difficulty         Ctrl+N  time limit",
            " Ctrl+Q  quit",
            "",
            " SPEED TEST",
            " Space ends a word, Esc pauses, Enter restarts a finished test",
        ];

        for (i, line) in help_text.iter().enumerate() {
            if i as u16 >= inner.height {
                break;
            }
            let style = if line.chars().nth(1).is_some_and(|c| c.is_uppercase())
                && line.trim() == line.trim().to_uppercase()
            {
                Style::default()
                    .fg(self.colors.warn)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.colors.fg)
            };
            buf.set_string(inner.x, inner.y + i as u16, line, style);
        }
    }
}

/// Status bar widget
pub struct StatusBar<'a> {
    mode: &'a str,
    layout: &'a str,
    settings: String,
    message: Option<&'a str>,
    colors: ThemeColors,
}

impl<'a> StatusBar<'a> {
    pub fn new(mode: &'a str, layout: &'a str, settings: String, colors: ThemeColors) -> Self {
        Self {
            mode,
            layout,
            settings,
            message: None,
            colors,
        }
    }

    pub fn message(mut self, message: Option<&'a str>) -> Self {
        self.message = message;
        self
    }
}

impl<'a> Widget for StatusBar<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bg_style = Style::default().bg(self.colors.key_idle).fg(self.colors.fg);
        for x in area.x..area.x + area.width {
            buf.set_string(x, area.y, " ", bg_style);
        }

        let left = format!(" {} | {} ", self.mode, self.layout);
        buf.set_string(area.x, area.y, &left, bg_style.add_modifier(Modifier::BOLD));

        if let Some(msg) = self.message {
            let msg_style = bg_style.fg(self.colors.accent);
            let msg_x = area.x + (area.width / 2).saturating_sub(msg.len() as u16 / 2);
            buf.set_string(msg_x, area.y, msg, msg_style);
        }

        let right = format!(" {} | Ctrl+K keys ", self.settings);
        let right_x = area.x + area.width.saturating_sub(right.len() as u16);
        buf.set_string(right_x, area.y, &right, bg_style);
    }
}

/// Tab bar widget
pub struct TabBar<'a> {
    tabs: &'a [&'a str],
    selected: usize,
    colors: ThemeColors,
}

impl<'a> TabBar<'a> {
    pub fn new(tabs: &'a [&'a str], selected: usize, colors: ThemeColors) -> Self {
        Self {
            tabs,
            selected,
            colors,
        }
    }
}

impl<'a> Widget for TabBar<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut x = area.x;
        let idle = Style::default().fg(self.colors.fg).bg(self.colors.key_idle);

        for (i, tab) in self.tabs.iter().enumerate() {
            let style = if i == self.selected {
                Style::default()
                    .fg(self.colors.key_text_active)
                    .bg(self.colors.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                idle
            };

            let label = format!(" {} ", tab);
            let width = label.chars().count() as u16;

            if x + width <= area.x + area.width {
                buf.set_string(x, area.y, &label, style);
                x += width;

                if i < self.tabs.len() - 1 && x < area.x + area.width {
                    buf.set_string(x, area.y, "|", idle.fg(self.colors.dim));
                    x += 1;
                }
            }
        }

        for fill_x in x..area.x + area.width {
            buf.set_string(fill_x, area.y, " ", idle);
        }
    }
}
