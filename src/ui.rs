//! UI rendering for the terminal user interface.
//!
//! `Areas::compute` is the only place the screen is split up; drawing and
//! mouse hit-testing both go through it.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock};

use crate::app::{App, Focus, Section};
use crate::audio::MediaElement;
use crate::config::{ControlsSettings, UiSettings};
use crate::format::{fmt_opt_time, fmt_time};
use crate::library::Track;

const NOTE_GLYPH: &str = "♪";
const COVER_GLYPH: &str = "▣";
const SIDEBAR_WIDTH: u16 = 14;

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("space", "play/pause");
    map.insert("n/p", "next/prev");
    map.insert("r/s", "repeat/shuffle");
    map.insert("j/k", "up/down");
    map.insert("gg/G", "top/bottom");
    map.insert("enter", "play card");
    map.insert("a", "add to queue");
    map.insert("1-3/tab", "section");
    map.insert("/", "search");
    map.insert("o", "add files");
    map.insert("+/-", "volume");
    map.insert("q", "quit");
    map
});

/// Render the controls help text, incorporating the skip offset.
fn controls_text(skip_seconds: u64) -> String {
    let order = [
        "space", "←/→", "n/p", "r/s", "j/k", "gg/G", "enter", "a", "1-3/tab", "/", "o", "+/-",
        "q",
    ];
    order
        .iter()
        .filter_map(|k| {
            if *k == "←/→" {
                Some(format!("[←/→] skip -/+{skip_seconds}s"))
            } else {
                CONTROLS_MAP.get(k).map(|v| format!("[{k}] {v}"))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Screen regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Areas {
    pub header: Rect,
    pub sidebar: Rect,
    pub prompt: Rect,
    pub cards: Rect,
    pub transport: Rect,
    pub now_playing: Rect,
    pub seek_bar: Rect,
    pub times: Rect,
    pub footer: Rect,
    pub status: Rect,
}

impl Areas {
    pub fn compute(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(4),
                Constraint::Length(5),
                Constraint::Length(5),
                Constraint::Length(1),
            ])
            .split(area);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(10)])
            .split(rows[1]);

        let main = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(1)])
            .split(body[1]);

        let transport = rows[2];
        let inner = Block::bordered().inner(transport);
        let lines = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(inner);

        Self {
            header: rows[0],
            sidebar: body[0],
            prompt: main[0],
            cards: main[1],
            transport,
            now_playing: lines[0],
            seek_bar: lines[1],
            times: lines[2],
            footer: rows[3],
            status: rows[4],
        }
    }

    /// Map a click at (`column`, `row`) to a seek bar percentage.
    pub fn seek_percent(&self, column: u16, row: u16) -> Option<f64> {
        let bar = self.seek_bar;
        if bar.width == 0 || row != bar.y || column < bar.x || column >= bar.x + bar.width {
            return None;
        }
        let span = bar.width.saturating_sub(1).max(1) as f64;
        Some(((column - bar.x) as f64 / span * 100.0).clamp(0.0, 100.0))
    }
}

fn card_item(track: &Track, is_current: bool) -> ListItem<'static> {
    let glyph = if track.cover.is_some() {
        COVER_GLYPH
    } else {
        NOTE_GLYPH
    };
    let title = if track.title.is_empty() {
        "Unknown".to_string()
    } else {
        track.title.clone()
    };
    let marker = if is_current { "▶ " } else { "  " };

    let first = Line::from(vec![
        Span::raw(marker),
        Span::raw(format!("{glyph} ")),
        Span::styled(title, Style::default().add_modifier(Modifier::BOLD)),
    ]);
    let second = Line::from(vec![
        Span::raw("    "),
        Span::raw(track.artist.clone()).dim(),
        Span::raw(format!("  {}", track.origin.label())).dim(),
        Span::raw("  [enter] Play  [a] Add to Queue"),
    ]);
    ListItem::new(vec![first, second])
}

fn empty_hint(section: Section) -> &'static str {
    match section {
        Section::Search => "No results. Press / to search.",
        Section::Library => "No local files. Press o to add a file or folder.",
        Section::Queue => "The queue is empty.",
    }
}

fn draw_sidebar<M: MediaElement>(frame: &mut Frame, app: &App<M>, area: Rect) {
    let items: Vec<ListItem> = Section::ALL
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let count = app.view(*s).len();
            ListItem::new(format!("{} {} ({count})", i + 1, s.title()))
        })
        .collect();

    let mut state = ListState::default();
    state.select(Section::ALL.iter().position(|s| *s == app.section));

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" browse "))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_prompt<M: MediaElement>(frame: &mut Frame, app: &App<M>, area: Rect) {
    let (title, text, active) = match (app.section, app.focus) {
        (_, Focus::Path) => (" add files ", app.path_input.as_str(), true),
        (Section::Search, focus) => (" search ", app.search_input.as_str(), focus == Focus::Search),
        (Section::Library, _) => (" add files (o) ", app.path_input.as_str(), false),
        (Section::Queue, _) => (" queue ", "", false),
    };

    let line = if active {
        Line::from(vec![Span::raw(text.to_string()), Span::raw("_").slow_blink()])
    } else if app.section == Section::Queue {
        let pos = app
            .controller
            .current()
            .map_or("-".to_string(), |c| (c + 1).to_string());
        Line::from(format!("{pos} / {}", app.controller.queue().len()))
    } else {
        Line::from(text.to_string()).dim()
    };

    let mut block = Block::bordered()
        .title(title)
        .padding(Padding::horizontal(1));
    if active {
        block = block.border_style(Style::default().add_modifier(Modifier::BOLD));
    }
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn draw_cards<M: MediaElement>(frame: &mut Frame, app: &App<M>, area: Rect) {
    let view = app.active_view();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", app.section.title().to_lowercase()));

    if let Some(notice) = view.notice() {
        let p = Paragraph::new(notice.to_string())
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(p, area);
        return;
    }
    if view.is_empty() {
        let p = Paragraph::new(empty_hint(app.section))
            .dim()
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(p, area);
        return;
    }

    let current = app.controller.current();
    let items: Vec<ListItem> = view
        .cards()
        .iter()
        .map(|card| {
            let is_current = app.section == Section::Queue && current == Some(card.index);
            card_item(&card.track, is_current)
        })
        .collect();

    let mut state = ListState::default();
    if app.focus == Focus::Cards {
        state.select(Some(view.cursor()));
    }
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_transport<M: MediaElement>(frame: &mut Frame, app: &App<M>, areas: &Areas) {
    let c = &app.controller;
    frame.render_widget(Block::bordered().title(" now playing "), areas.transport);

    let icon = if c.playing_icon() { "⏸" } else { "▶" };
    let (title, artist) = match c.now_playing() {
        Some(t) if !t.title.is_empty() => (t.title.clone(), t.artist.clone()),
        Some(t) => ("Unknown title".to_string(), t.artist.clone()),
        None => ("Unknown title".to_string(), String::new()),
    };
    let mut spans = vec![
        Span::raw(format!(" {icon} ")),
        Span::styled(title, Style::default().add_modifier(Modifier::BOLD)),
    ];
    if !artist.is_empty() {
        spans.push(Span::raw(format!(" · {artist}")));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), areas.now_playing);

    let ratio = (c.seek_value() / 100.0).clamp(0.0, 1.0);
    let gauge = Gauge::default()
        .ratio(ratio)
        .label("")
        .gauge_style(Style::default().add_modifier(Modifier::BOLD));
    frame.render_widget(gauge, areas.seek_bar);

    let on_off = |b: bool| if b { "on" } else { "off" };
    let cover = match c.now_playing().and_then(|t| t.cover.as_deref()) {
        Some(url) => url.to_string(),
        None => NOTE_GLYPH.to_string(),
    };
    let times = format!(
        " {} / {}  repeat: {}  shuffle: {}  vol: {:.0}%  art: {cover}",
        fmt_time(c.displayed_time()),
        fmt_opt_time(c.duration()),
        on_off(c.repeat()),
        on_off(c.shuffle()),
        c.volume() * 100.0,
    );
    frame.render_widget(Paragraph::new(times), areas.times);
}

/// Render the entire UI into the provided `frame`.
pub fn draw<M: MediaElement>(
    frame: &mut Frame,
    app: &App<M>,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let areas = Areas::compute(frame.area());

    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" encore ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, areas.header);

    draw_sidebar(frame, app, areas.sidebar);
    draw_prompt(frame, app, areas.prompt);
    draw_cards(frame, app, areas.cards);
    draw_transport(frame, app, &areas);

    let footer = Paragraph::new(controls_text(controls_settings.skip_seconds))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, areas.footer);

    if let Some(status) = app.status.as_deref() {
        frame.render_widget(Paragraph::new(format!(" {status}")).italic(), areas.status);
    }
}
