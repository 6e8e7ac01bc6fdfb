use nr_core::ArticleViewModel;
use nr_fetch::FeedSession;
use rand::Rng;
use tui::backend::Backend;
use tui::layout::{Constraint, Direction, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Span, Spans, Text};
use tui::widgets::{Block, Borders, List, ListItem, Paragraph, Wrap};
use tui::Frame;

use crate::app::{App, Screen};

const ROW_GREY: Color = Color::Rgb(240, 244, 247);
const ROW_WHITE: Color = Color::Rgb(255, 255, 255);
const ROW_COLORS: [Color; 2] = [ROW_GREY, ROW_WHITE];
const TEXT: Color = Color::Black;
const MUTED: Color = Color::DarkGray;

pub fn draw<B: Backend, R: Rng>(f: &mut Frame<B>, app: &mut App, session: &FeedSession<R>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(f.size());

    match app.screen().clone() {
        Screen::List => draw_list(f, chunks[0], app, session),
        Screen::Detail { id, article } => {
            let live = session.articles().iter().find(|a| a.id == id);
            draw_detail(f, chunks[0], live.unwrap_or(&article));
        }
    }
    draw_status(f, chunks[1], app, session);
}

fn draw_list<B: Backend, R: Rng>(
    f: &mut Frame<B>,
    area: Rect,
    app: &mut App,
    session: &FeedSession<R>,
) {
    let width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = session
        .articles()
        .iter()
        .enumerate()
        .map(|(index, article)| {
            let views = session.view_count(index).unwrap_or_default();
            let mut count = format!("View count: {}", views);
            if article.image_data().is_some() {
                count.push_str("  ▣");
            }
            let lines = vec![
                Spans::from(Span::styled(
                    truncate(&article.title, width),
                    Style::default().fg(TEXT).add_modifier(Modifier::BOLD),
                )),
                Spans::from(Span::styled(count, Style::default().fg(MUTED))),
            ];
            ListItem::new(Text::from(lines))
                .style(Style::default().bg(ROW_COLORS[index % ROW_COLORS.len()]))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" News "))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    f.render_stateful_widget(list, area, app.list_state_mut());
}

fn draw_detail<B: Backend>(f: &mut Frame<B>, area: Rect, article: &ArticleViewModel) {
    let image = match (article.image_data(), &article.image_url) {
        (Some(bytes), _) => format!("[image, {} bytes]", bytes.len()),
        (None, Some(_)) => "[loading image…]".to_string(),
        (None, None) => "[no image]".to_string(),
    };
    let website = if article.website_url.is_empty() {
        Span::styled("No website", Style::default().fg(MUTED))
    } else {
        Span::styled(
            "[w] Visit website",
            Style::default().add_modifier(Modifier::UNDERLINED),
        )
    };

    let lines = vec![
        Spans::from(Span::styled(image, Style::default().fg(MUTED))),
        Spans::from(""),
        Spans::from(article.description.as_str()),
        Spans::from(""),
        Spans::from(vec![
            Span::raw(format!("Published by {}", article.publisher)),
            Span::raw("    "),
            Span::styled(article.date.as_str(), Style::default().fg(MUTED)),
        ]),
        Spans::from(""),
        Spans::from(website),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", article.title)),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn draw_status<B: Backend, R: Rng>(
    f: &mut Frame<B>,
    area: Rect,
    app: &App,
    session: &FeedSession<R>,
) {
    let hints = match app.screen() {
        Screen::List => "↑/↓ move  enter open  r refresh  q quit",
        Screen::Detail { .. } => "w visit website  esc back  q quit",
    };
    let loading = if session.is_loading() { " ⟳" } else { "" };
    let line = Spans::from(vec![
        Span::raw(format!("{}{}", app.status(), loading)),
        Span::raw("  |  "),
        Span::styled(hints, Style::default().fg(MUTED)),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn truncate(text: &str, width: usize) -> String {
    if width == 0 || text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}
