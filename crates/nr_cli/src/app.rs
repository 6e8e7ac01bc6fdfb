use std::io;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use futures::StreamExt;
use nr_core::{ArticleId, ArticleViewModel};
use nr_fetch::{Applied, FeedSession};
use rand::Rng;
use tracing::info;
use tui::backend::{Backend, CrosstermBackend};
use tui::widgets::ListState;
use tui::Terminal;

use crate::browser::{self, Browser};
use crate::ui;

#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    List,
    /// Keeps its own copy of the article; the live one is looked up by id
    /// when drawing so a refresh underneath does not change what is shown.
    Detail {
        id: ArticleId,
        article: ArticleViewModel,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    None,
    Quit,
    Refresh,
    Select(usize),
    Back,
    VisitWebsite,
}

pub struct App {
    screen: Screen,
    list_state: ListState,
    status: String,
    should_quit: bool,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            screen: Screen::List,
            list_state: ListState::default(),
            status: "Loading…".to_string(),
            should_quit: false,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn selected(&self) -> Option<usize> {
        self.list_state.selected()
    }

    pub fn list_state_mut(&mut self) -> &mut ListState {
        &mut self.list_state
    }

    /// Maps a key press to a command for the current screen.
    pub fn handle_key(&mut self, key: KeyEvent, len: usize) -> Command {
        if key.kind == KeyEventKind::Release {
            return Command::None;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Command::Quit;
        }

        match self.screen {
            Screen::List => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => Command::Quit,
                KeyCode::Char('r') | KeyCode::F(5) => Command::Refresh,
                KeyCode::Down | KeyCode::Char('j') => {
                    self.move_selection(1, len);
                    Command::None
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    self.move_selection(-1, len);
                    Command::None
                }
                KeyCode::Home | KeyCode::Char('g') => {
                    self.list_state.select((len > 0).then_some(0));
                    Command::None
                }
                KeyCode::End | KeyCode::Char('G') => {
                    self.list_state.select(len.checked_sub(1));
                    Command::None
                }
                KeyCode::Enter => match self.list_state.selected() {
                    Some(index) if index < len => Command::Select(index),
                    _ => Command::None,
                },
                _ => Command::None,
            },
            Screen::Detail { .. } => match key.code {
                KeyCode::Char('q') => Command::Quit,
                KeyCode::Esc | KeyCode::Backspace | KeyCode::Left | KeyCode::Char('h') => {
                    Command::Back
                }
                KeyCode::Char('w') | KeyCode::Char('o') | KeyCode::Enter => Command::VisitWebsite,
                _ => Command::None,
            },
        }
    }

    fn move_selection(&mut self, delta: isize, len: usize) {
        if len == 0 {
            self.list_state.select(None);
            return;
        }
        let next = match self.list_state.selected() {
            Some(current) => (current as isize + delta).clamp(0, len as isize - 1) as usize,
            None => 0,
        };
        self.list_state.select(Some(next));
    }

    pub async fn execute<R: Rng>(
        &mut self,
        command: Command,
        session: &mut FeedSession<R>,
        browser: &dyn Browser,
    ) -> anyhow::Result<()> {
        match command {
            Command::None => {}
            Command::Quit => self.should_quit = true,
            Command::Refresh => {
                let generation = session.refresh();
                self.status = format!("Refreshing… (#{})", generation);
            }
            Command::Select(index) => {
                let article = session.select(index)?.clone();
                session.request_image(index).await?;
                self.screen = Screen::Detail {
                    id: article.id.clone(),
                    article,
                };
            }
            Command::Back => {
                self.screen = Screen::List;
            }
            Command::VisitWebsite => {
                if let Screen::Detail { article, .. } = &self.screen {
                    match browser::visit(browser, &article.website_url) {
                        Ok(true) => self.status = format!("Opened {}", article.website_url),
                        Ok(false) => {}
                        Err(err) => self.status = format!("Could not open browser: {}", err),
                    }
                }
            }
        }
        Ok(())
    }

    /// Updates the status line and keeps the selection inside the new page.
    pub fn on_applied(&mut self, applied: &Applied, len: usize) {
        match applied {
            Applied::Refreshed { count, .. } => {
                self.status = format!("{} articles", count);
                let selected = match self.list_state.selected() {
                    Some(index) if index < len => Some(index),
                    _ if len > 0 => Some(0),
                    _ => None,
                };
                self.list_state.select(selected);
            }
            Applied::FetchFailed { error, .. } => {
                self.status = format!("Refresh failed: {}", error);
            }
            Applied::Stale { .. } | Applied::ImageAttached { .. } | Applied::ImageFailed { .. } => {}
        }
    }
}

/// Takes over the terminal until the user quits.
pub async fn run<R: Rng>(session: &mut FeedSession<R>, browser: &dyn Browser) -> anyhow::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = event_loop(&mut terminal, session, browser).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

async fn event_loop<B: Backend, R: Rng>(
    terminal: &mut Terminal<B>,
    session: &mut FeedSession<R>,
    browser: &dyn Browser,
) -> anyhow::Result<()> {
    let mut app = App::new();
    let mut keys = EventStream::new();
    session.refresh();

    loop {
        terminal.draw(|f| ui::draw(f, &mut app, session))?;
        if app.should_quit() {
            info!("quitting");
            return Ok(());
        }

        tokio::select! {
            Some(event) = session.next_event() => {
                let applied = session.apply(event).await?;
                app.on_applied(&applied, session.articles().len());
                if let Some(index) = app.selected() {
                    session.request_image(index).await?;
                }
            }
            key = keys.next() => match key {
                Some(Ok(Event::Key(key))) => {
                    let command = app.handle_key(key, session.articles().len());
                    app.execute(command, session, browser).await?;
                    if let (Screen::List, Some(index)) = (app.screen(), app.selected()) {
                        session.request_image(index).await?;
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(err)) => return Err(err.into()),
                None => return Ok(()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{loaded_session, RecordingBrowser};
    use nr_core::FetchError;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_navigation_stays_in_bounds() {
        let mut app = App::new();
        assert_eq!(app.handle_key(key(KeyCode::Down), 3), Command::None);
        assert_eq!(app.selected(), Some(0));
        app.handle_key(key(KeyCode::Down), 3);
        app.handle_key(key(KeyCode::Down), 3);
        app.handle_key(key(KeyCode::Down), 3);
        assert_eq!(app.selected(), Some(2));
        app.handle_key(key(KeyCode::Up), 3);
        assert_eq!(app.selected(), Some(1));
        app.handle_key(key(KeyCode::Char('g')), 3);
        assert_eq!(app.selected(), Some(0));
        app.handle_key(key(KeyCode::Down), 0);
        assert_eq!(app.selected(), None);
    }

    #[test]
    fn test_list_keys() {
        let mut app = App::new();
        assert_eq!(app.handle_key(key(KeyCode::Enter), 3), Command::None);
        app.handle_key(key(KeyCode::Down), 3);
        assert_eq!(app.handle_key(key(KeyCode::Enter), 3), Command::Select(0));
        assert_eq!(app.handle_key(key(KeyCode::Char('r')), 3), Command::Refresh);
        assert_eq!(app.handle_key(key(KeyCode::Char('q')), 3), Command::Quit);
        assert_eq!(
            app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), 3),
            Command::Quit
        );
    }

    #[tokio::test]
    async fn test_select_opens_detail_and_counts_view() {
        let mut session = loaded_session(5).await;
        let browser = RecordingBrowser::default();
        let mut app = App::new();

        app.list_state_mut().select(Some(3));
        let command = app.handle_key(key(KeyCode::Enter), session.articles().len());
        app.execute(command, &mut session, &browser).await.unwrap();

        assert_eq!(session.counters().as_slice(), &[0, 0, 0, 1, 0]);
        match app.screen() {
            Screen::Detail { article, .. } => {
                assert_eq!(article, session.article(3).unwrap());
            }
            other => panic!("unexpected screen {:?}", other),
        }

        let command = app.handle_key(key(KeyCode::Char('w')), session.articles().len());
        assert_eq!(command, Command::VisitWebsite);
        app.execute(command, &mut session, &browser).await.unwrap();
        assert_eq!(
            *browser.opened.borrow(),
            vec![session.article(3).unwrap().website_url.clone()]
        );

        let command = app.handle_key(key(KeyCode::Esc), session.articles().len());
        app.execute(command, &mut session, &browser).await.unwrap();
        assert_eq!(app.screen(), &Screen::List);
    }

    #[tokio::test]
    async fn test_out_of_range_select_is_an_error() {
        let mut session = loaded_session(2).await;
        let mut app = App::new();
        let result = app
            .execute(Command::Select(4), &mut session, &RecordingBrowser::default())
            .await;
        assert!(result.is_err());
        assert_eq!(session.counters().as_slice(), &[0, 0]);
    }

    #[tokio::test]
    async fn test_refresh_result_updates_status_and_selection() {
        let session = loaded_session(4).await;
        let mut app = App::new();
        app.list_state_mut().select(Some(9));
        app.on_applied(
            &Applied::Refreshed {
                generation: 1,
                count: 4,
            },
            session.articles().len(),
        );
        assert_eq!(app.status(), "4 articles");
        assert_eq!(app.selected(), Some(0));

        app.on_applied(
            &Applied::FetchFailed {
                generation: 2,
                error: FetchError::Status {
                    status: 429,
                    message: "rateLimited".to_string(),
                },
            },
            4,
        );
        assert_eq!(app.status(), "Refresh failed: server returned HTTP 429: rateLimited");
        assert_eq!(app.selected(), Some(0));
    }
}
