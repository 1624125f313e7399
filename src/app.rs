use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::config::Settings;
use crate::games::breakout::BreakoutGame;
use crate::games::flappy::FlappyGame;
use crate::games::game2048::Game2048;
use crate::games::snake::SnakeGame;
use crate::games::{Game, GameEvent, GameMode};
use crate::input::{intent_for_key, InputQueue, Intent, SwipeTracker};
use crate::leaderboard::{LeaderboardClient, LeaderboardEntry, Response, DEFAULT_LIMIT};
use crate::scores::{HighScores, KeyValueStore, MAX_USERNAME_CHARS};

const STATUS_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Home,
    Snake,
    Breakout,
    Flappy,
    Game2048,
}

impl Tab {
    pub fn all() -> &'static [Tab] {
        &[Tab::Home, Tab::Snake, Tab::Breakout, Tab::Flappy, Tab::Game2048]
    }

    pub fn title(&self) -> &str {
        match self {
            Tab::Home => " Home ",
            Tab::Snake => " Snake ",
            Tab::Breakout => " Breakout ",
            Tab::Flappy => " Flappy ",
            Tab::Game2048 => " 2048 ",
        }
    }

    pub fn index(&self) -> usize {
        Tab::all().iter().position(|t| t == self).unwrap_or(0)
    }

    /// Game tabs in home-menu order.
    pub fn games() -> &'static [Tab] {
        &Tab::all()[1..]
    }
}

/// A finished round waiting for a name before it is saved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingScore {
    pub mode: GameMode,
    pub score: u32,
}

pub struct App<S: KeyValueStore> {
    pub should_quit: bool,
    pub current_tab: Tab,
    /// Index into `Tab::games()` for the home menu.
    pub selected_game: usize,
    pub snake: SnakeGame,
    pub breakout: BreakoutGame,
    pub flappy: FlappyGame,
    pub game2048: Game2048,
    pub high_scores: HighScores<S>,
    pub show_hall_of_fame: bool,
    pub entering_name: bool,
    pub name_buffer: String,
    pub pending: Option<PendingScore>,
    /// Most recent finished round on the active tab, eligible for `L`.
    pub last_result: Option<PendingScore>,
    pub submitted: bool,
    pub global_board: Option<(GameMode, Vec<LeaderboardEntry>)>,
    /// Where the active game was last drawn; mouse positions are relative to it.
    pub game_area: Rect,
    leaderboard: LeaderboardClient,
    status: Option<(String, Duration)>,
    inputs: InputQueue,
    swipe: SwipeTracker,
}

impl<S: KeyValueStore> App<S> {
    pub fn new(
        settings: &Settings,
        high_scores: HighScores<S>,
        leaderboard: LeaderboardClient,
    ) -> Self {
        let mut app = Self {
            should_quit: false,
            current_tab: Tab::Home,
            selected_game: 0,
            snake: SnakeGame::new(settings.snake_mode),
            breakout: BreakoutGame::new(settings.breakout_difficulty),
            flappy: FlappyGame::new(settings.flappy_difficulty),
            game2048: Game2048::new(),
            high_scores,
            show_hall_of_fame: false,
            entering_name: false,
            name_buffer: String::new(),
            pending: None,
            last_result: None,
            submitted: false,
            global_board: None,
            game_area: Rect::default(),
            leaderboard,
            status: None,
            inputs: InputQueue::new(),
            swipe: SwipeTracker::default(),
        };
        for &tab in Tab::games() {
            app.refresh_high_score(tab);
            app.restore_appearance(tab);
        }
        app
    }

    fn game_mut(&mut self, tab: Tab) -> Option<&mut dyn Game> {
        match tab {
            Tab::Home => None,
            Tab::Snake => Some(&mut self.snake),
            Tab::Breakout => Some(&mut self.breakout),
            Tab::Flappy => Some(&mut self.flappy),
            Tab::Game2048 => Some(&mut self.game2048),
        }
    }

    pub fn game(&self, tab: Tab) -> Option<&dyn Game> {
        match tab {
            Tab::Home => None,
            Tab::Snake => Some(&self.snake),
            Tab::Breakout => Some(&self.breakout),
            Tab::Flappy => Some(&self.flappy),
            Tab::Game2048 => Some(&self.game2048),
        }
    }

    /// Mode whose scores the home menu shows for the selected tile.
    pub fn selected_mode(&self) -> GameMode {
        let tab = Tab::games()
            .get(self.selected_game)
            .copied()
            .unwrap_or(Tab::Snake);
        self.game(tab).map(|g| g.mode()).unwrap_or(GameMode::SnakeClassic)
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_ref().map(|(text, _)| text.as_str())
    }

    pub fn leaderboard_available(&self) -> bool {
        self.leaderboard.is_available()
    }

    fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some((text.into(), STATUS_TTL));
    }

    fn refresh_high_score(&mut self, tab: Tab) {
        let Some(mode) = self.game(tab).map(|g| g.mode()) else {
            return;
        };
        let best = self.high_scores.best_score(mode);
        if let Some(game) = self.game_mut(tab) {
            game.set_high_score(best);
        }
    }

    fn restore_appearance(&mut self, tab: Tab) {
        let Some(choices) = self.game(tab).map(|g| g.appearance()) else {
            return;
        };
        for (key, _) in choices {
            let Some(value) = self.high_scores.preference(key) else {
                continue;
            };
            if let Some(game) = self.game_mut(tab) {
                game.restore_appearance(key, &value);
            }
        }
    }

    fn save_appearance(&mut self, tab: Tab) {
        let Some(choices) = self.game(tab).map(|g| g.appearance()) else {
            return;
        };
        for (key, value) in choices {
            if let Err(e) = self.high_scores.set_preference(key, value) {
                log::warn!("could not store {key}: {e}");
            }
        }
    }

    /// One frame: apply queued input, advance the active game, then react to
    /// what happened.
    pub fn on_frame(&mut self, elapsed: Duration) {
        self.poll_leaderboard();
        if let Some((_, ttl)) = &mut self.status {
            *ttl = ttl.saturating_sub(elapsed);
            if ttl.is_zero() {
                self.status = None;
            }
        }

        // Gameplay is frozen while the name overlay is up.
        if self.entering_name {
            return;
        }

        let tab = self.current_tab;
        let intents: Vec<Intent> = self.inputs.drain().collect();
        let Some(game) = self.game_mut(tab) else {
            return;
        };
        let mut events = Vec::new();
        let mut variant_changed = false;
        for intent in intents {
            variant_changed |= intent == Intent::CycleVariant;
            events.extend(game.handle_input(intent));
        }
        events.extend(game.update(elapsed));
        let mode = game.mode();

        if variant_changed {
            self.refresh_high_score(tab);
        }
        for event in events {
            self.on_game_event(tab, mode, event);
        }
    }

    fn on_game_event(&mut self, tab: Tab, mode: GameMode, event: GameEvent) {
        match event {
            GameEvent::Started => {
                log::debug!("{} started", mode.key());
                self.last_result = None;
                self.submitted = false;
            }
            GameEvent::LevelComplete { level } => {
                log::info!("{} reached level {level}", mode.key());
            }
            GameEvent::Won => {
                log::info!("{} won", mode.key());
                self.set_status("You reached 2048!");
            }
            GameEvent::GameOver { score } => {
                log::info!("{} over with {score}", mode.key());
                self.on_game_over(tab, mode, score);
            }
            GameEvent::AppearanceChanged => self.save_appearance(tab),
            _ => {}
        }
    }

    fn on_game_over(&mut self, tab: Tab, mode: GameMode, score: u32) {
        let result = PendingScore { mode, score };
        self.last_result = Some(result);
        self.submitted = false;
        if score == 0 {
            return;
        }
        if self.high_scores.qualifies(mode, score) && !self.high_scores.has_username() {
            self.pending = Some(result);
            self.entering_name = true;
            self.name_buffer.clear();
            return;
        }
        self.record(tab, result);
    }

    fn record(&mut self, tab: Tab, result: PendingScore) {
        let qualifies = self.high_scores.qualifies(result.mode, result.score);
        match self.high_scores.save_score(result.mode, result.score) {
            // Equal scores keep their order, so the new entry is the last of its score.
            Ok(entries) if qualifies => {
                if let Some(i) = entries.iter().rposition(|e| e.score == result.score) {
                    let rank = i + 1;
                    self.set_status(format!("New high score! #{rank} in {}", result.mode.title()));
                }
            }
            Ok(_) => {}
            Err(e) => {
                log::warn!("could not save score: {e}");
                self.set_status("Score could not be saved");
            }
        }
        self.refresh_high_score(tab);
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if self.entering_name {
            self.handle_name_input(key);
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') if self.current_tab == Tab::Home => {
                self.should_quit = true;
                return;
            }
            KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => {
                self.switch_tab(-1);
                return;
            }
            KeyCode::Tab => {
                self.switch_tab(1);
                return;
            }
            KeyCode::BackTab => {
                self.switch_tab(-1);
                return;
            }
            KeyCode::Esc if self.current_tab != Tab::Home => {
                self.go_to(Tab::Home);
                return;
            }
            _ => {}
        }

        if self.current_tab == Tab::Home {
            self.handle_home_key(key);
            return;
        }

        if matches!(key.code, KeyCode::Char('l') | KeyCode::Char('L')) {
            self.submit_to_leaderboard();
            return;
        }
        if let Some(intent) = intent_for_key(key) {
            self.inputs.push(intent);
        }
    }

    fn handle_home_key(&mut self, key: KeyEvent) {
        let count = Tab::games().len();
        match key.code {
            KeyCode::Char(c @ '1'..='9') => {
                let idx = c as usize - '1' as usize;
                if let Some(&tab) = Tab::games().get(idx) {
                    self.selected_game = idx;
                    self.go_to(tab);
                }
            }
            KeyCode::Right | KeyCode::Down => self.select_game((self.selected_game + 1) % count),
            KeyCode::Left | KeyCode::Up => {
                self.select_game((self.selected_game + count - 1) % count)
            }
            KeyCode::Enter => {
                if let Some(&tab) = Tab::games().get(self.selected_game) {
                    self.go_to(tab);
                }
            }
            KeyCode::Char('h') | KeyCode::Char('H') => {
                self.show_hall_of_fame = !self.show_hall_of_fame;
                if self.show_hall_of_fame {
                    self.fetch_global_board();
                }
            }
            _ => {}
        }
    }

    fn select_game(&mut self, idx: usize) {
        self.selected_game = idx;
        self.global_board = None;
        if self.show_hall_of_fame {
            self.fetch_global_board();
        }
    }

    fn handle_name_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                if let Err(e) = self.high_scores.set_username(&self.name_buffer) {
                    log::warn!("could not store username: {e}");
                }
                self.finish_name_entry();
            }
            // Skipping still records the score, under the default name.
            KeyCode::Esc => self.finish_name_entry(),
            KeyCode::Backspace => {
                self.name_buffer.pop();
            }
            KeyCode::Char(c) if !c.is_control() => {
                if self.name_buffer.chars().count() < MAX_USERNAME_CHARS {
                    self.name_buffer.push(c);
                }
            }
            _ => {}
        }
    }

    fn finish_name_entry(&mut self) {
        self.entering_name = false;
        self.name_buffer.clear();
        if let Some(result) = self.pending.take() {
            self.record(self.current_tab, result);
        }
    }

    pub fn on_mouse(&mut self, mouse: MouseEvent) {
        if self.entering_name || self.current_tab == Tab::Home {
            return;
        }
        let area = self.game_area;
        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(MouseButton::Left)
                if self.current_tab == Tab::Breakout && area.width > 0 =>
            {
                let offset = mouse.column.saturating_sub(area.x) as f32;
                let fraction = (offset / area.width as f32).clamp(0.0, 1.0);
                self.inputs.push(Intent::Pointer(fraction));
            }
            MouseEventKind::Down(MouseButton::Left) => self.swipe.press(mouse.column, mouse.row),
            MouseEventKind::Up(MouseButton::Left) => {
                if !self.swipe.is_tracking() {
                    return;
                }
                match self.swipe.release(mouse.column, mouse.row) {
                    Some(direction) => self.inputs.push(Intent::Steer(direction)),
                    None => self.inputs.push(Intent::Action),
                }
            }
            _ => {}
        }
    }

    fn submit_to_leaderboard(&mut self) {
        let Some(result) = self.last_result else {
            return;
        };
        let over = self.game(self.current_tab).is_some_and(|g| g.is_game_over());
        if !over || self.game(self.current_tab).map(|g| g.mode()) != Some(result.mode) {
            return;
        }
        if self.submitted {
            self.set_status("Already submitted");
            return;
        }
        let name = self.high_scores.username();
        match self.leaderboard.submit(result.mode, &name, i64::from(result.score)) {
            Ok(initials) => {
                self.submitted = true;
                self.set_status(format!("Submitting {} as {initials}...", result.score));
            }
            Err(e) => self.set_status(format!("Leaderboard: {e}")),
        }
    }

    fn fetch_global_board(&mut self) {
        if !self.leaderboard.is_available() {
            return;
        }
        let mode = self.selected_mode();
        if let Err(e) = self.leaderboard.fetch(mode, DEFAULT_LIMIT) {
            self.set_status(format!("Leaderboard: {e}"));
        }
    }

    fn poll_leaderboard(&mut self) {
        for response in self.leaderboard.poll() {
            match response {
                Response::Submitted { mode, name, score } => {
                    self.set_status(format!("Submitted {score} as {name} to {}", mode.title()));
                }
                Response::Fetched { mode, entries } => {
                    self.global_board = Some((mode, entries));
                }
                Response::Failed { mode, error } => {
                    self.set_status(format!("{} leaderboard: {error}", mode.title()));
                }
            }
        }
    }

    fn switch_tab(&mut self, step: isize) {
        let tabs = Tab::all();
        let len = tabs.len() as isize;
        let idx = (self.current_tab.index() as isize + step).rem_euclid(len) as usize;
        self.go_to(tabs[idx]);
    }

    fn go_to(&mut self, tab: Tab) {
        if tab == self.current_tab {
            return;
        }
        // Input meant for the old tab must not leak into the new one.
        self.inputs.clear();
        self.swipe = SwipeTracker::default();
        self.last_result = None;
        self.submitted = false;
        self.current_tab = tab;
        if let Some(idx) = Tab::games().iter().position(|&t| t == tab) {
            self.selected_game = idx;
        }
        self.refresh_high_score(tab);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::game2048::Board;
    use crate::leaderboard::FileLeaderboard;
    use crate::scores::MemoryStore;

    const FRAME: Duration = Duration::from_millis(16);

    fn app() -> App<MemoryStore> {
        App::new(
            &Settings::default(),
            HighScores::new(MemoryStore::new()),
            LeaderboardClient::disabled(),
        )
    }

    fn press(app: &mut App<MemoryStore>, code: KeyCode) {
        app.on_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    /// Run frames until `done` holds or a couple of seconds pass.
    fn pump_until(app: &mut App<MemoryStore>, done: impl Fn(&App<MemoryStore>) -> bool) -> bool {
        let deadline = std::time::Instant::now() + Duration::from_secs(2);
        while std::time::Instant::now() < deadline {
            app.on_frame(FRAME);
            if done(app) {
                return true;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        false
    }

    /// Put 2048 one move away from game over with `score` already banked.
    fn nearly_lost_2048(app: &mut App<MemoryStore>, score: u32) {
        let board = Board::from_rows([[0, 2, 4, 8], [4, 2, 4, 16], [2, 4, 2, 4], [4, 2, 4, 2]]);
        app.game2048.load(board, score);
    }

    #[test]
    fn tab_cycles_and_wraps() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.current_tab, Tab::Snake);
        press(&mut app, KeyCode::BackTab);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.current_tab, Tab::Game2048);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.current_tab, Tab::Home);
    }

    #[test]
    fn q_only_quits_from_home() {
        let mut app = app();
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.current_tab, Tab::Flappy);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);
        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn ctrl_c_quits_anywhere() {
        let mut app = app();
        app.entering_name = true;
        app.on_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn keys_reach_the_active_game_in_order() {
        let mut app = app();
        press(&mut app, KeyCode::Char('1'));
        press(&mut app, KeyCode::Up);
        app.on_frame(FRAME);
        assert!(!app.snake.state().body.is_empty());
        assert_eq!(app.snake.state().phase, crate::games::snake::Phase::Running);
    }

    #[test]
    fn first_high_score_asks_for_a_name() {
        let mut app = app();
        press(&mut app, KeyCode::Char('4'));
        nearly_lost_2048(&mut app, 120);
        press(&mut app, KeyCode::Left);
        app.on_frame(FRAME);

        assert!(app.entering_name);
        assert_eq!(app.pending, Some(PendingScore { mode: GameMode::Game2048, score: 120 }));
        for c in "Ada".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);

        assert!(!app.entering_name);
        let saved = app.high_scores.load_scores(GameMode::Game2048);
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].username, "Ada");
        assert_eq!(saved[0].score, 120);
    }

    #[test]
    fn known_player_saves_without_prompt() {
        let mut app = app();
        app.high_scores.set_username("Bo").unwrap();
        press(&mut app, KeyCode::Char('4'));
        nearly_lost_2048(&mut app, 64);
        press(&mut app, KeyCode::Left);
        app.on_frame(FRAME);

        assert!(!app.entering_name);
        assert_eq!(app.high_scores.best_score(GameMode::Game2048), 64);
        assert_eq!(app.last_result, Some(PendingScore { mode: GameMode::Game2048, score: 64 }));
    }

    #[test]
    fn skipping_name_entry_saves_as_default_player() {
        let mut app = app();
        press(&mut app, KeyCode::Char('4'));
        nearly_lost_2048(&mut app, 32);
        press(&mut app, KeyCode::Left);
        app.on_frame(FRAME);
        press(&mut app, KeyCode::Char('x'));
        press(&mut app, KeyCode::Esc);

        assert!(!app.high_scores.has_username());
        let best = app.high_scores.best_entry(GameMode::Game2048).unwrap();
        assert_eq!(best.username, "Player");
    }

    #[test]
    fn tied_score_outside_top_ten_is_not_announced() {
        let mut app = app();
        app.high_scores.set_username("Eve").unwrap();
        for _ in 0..10 {
            app.high_scores.save_score(GameMode::Game2048, 100).unwrap();
        }
        press(&mut app, KeyCode::Char('4'));
        nearly_lost_2048(&mut app, 100);
        press(&mut app, KeyCode::Left);
        app.on_frame(FRAME);

        assert!(!app.entering_name);
        assert_eq!(app.status(), None);
        assert!(app.high_scores.load_scores(GameMode::Game2048).iter().all(|e| e.score == 100));
    }

    #[test]
    fn tied_score_ranks_below_earlier_ties() {
        let mut app = app();
        app.high_scores.set_username("Eve").unwrap();
        app.high_scores.save_score(GameMode::Game2048, 200).unwrap();
        app.high_scores.save_score(GameMode::Game2048, 100).unwrap();
        press(&mut app, KeyCode::Char('4'));
        nearly_lost_2048(&mut app, 100);
        press(&mut app, KeyCode::Left);
        app.on_frame(FRAME);

        assert_eq!(app.status(), Some("New high score! #3 in 2048"));
    }

    #[test]
    fn global_board_follows_the_selected_game() {
        let path = std::env::temp_dir()
            .join(format!("pocketcade-hall-{}", std::process::id()))
            .join("board.json");
        let mut app = App::new(
            &Settings::default(),
            HighScores::new(MemoryStore::new()),
            LeaderboardClient::spawn(FileLeaderboard::new(&path)),
        );
        press(&mut app, KeyCode::Char('h'));
        assert!(app.show_hall_of_fame);
        assert!(pump_until(&mut app, |a| a.global_board.is_some()));

        press(&mut app, KeyCode::Right);
        assert_eq!(app.selected_mode(), GameMode::Breakout);
        assert!(app.global_board.is_none());
        assert!(pump_until(&mut app, |a| a.global_board.is_some()));
        assert_eq!(app.global_board.as_ref().map(|(mode, _)| *mode), Some(GameMode::Breakout));

        drop(app);
        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn theme_choice_persists_across_launches() {
        let mut app = app();
        press(&mut app, KeyCode::Char('1'));
        press(&mut app, KeyCode::Char('t'));
        press(&mut app, KeyCode::Char('k'));
        press(&mut app, KeyCode::Char('k'));
        app.on_frame(FRAME);
        assert_eq!(app.high_scores.preference("snakeTheme").as_deref(), Some("night"));
        assert_eq!(app.high_scores.preference("snakeSkin").as_deref(), Some("robot"));

        let App { high_scores, .. } = app;
        let reopened = App::new(&Settings::default(), high_scores, LeaderboardClient::disabled());
        assert_eq!(
            reopened.snake.appearance(),
            vec![("snakeTheme", "night"), ("snakeSkin", "robot")]
        );
        assert_eq!(reopened.breakout.appearance(), vec![("breakoutTheme", "default")]);
    }

    #[test]
    fn leaderboard_submit_without_backend_sets_status() {
        let mut app = app();
        app.high_scores.set_username("Cy").unwrap();
        press(&mut app, KeyCode::Char('4'));
        nearly_lost_2048(&mut app, 16);
        press(&mut app, KeyCode::Left);
        app.on_frame(FRAME);

        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.status(), Some("Leaderboard: leaderboard not configured"));
        assert!(!app.submitted);
    }

    #[test]
    fn leaderboard_submit_happens_once_per_round() {
        let path = std::env::temp_dir()
            .join(format!("pocketcade-app-{}", std::process::id()))
            .join("board.json");
        let mut app = App::new(
            &Settings::default(),
            HighScores::new(MemoryStore::new()),
            LeaderboardClient::spawn(FileLeaderboard::new(&path)),
        );
        app.high_scores.set_username("dee").unwrap();
        press(&mut app, KeyCode::Char('4'));
        nearly_lost_2048(&mut app, 16);
        press(&mut app, KeyCode::Left);
        app.on_frame(FRAME);

        press(&mut app, KeyCode::Char('L'));
        assert!(app.submitted);
        assert_eq!(app.status(), Some("Submitting 16 as DEE..."));
        press(&mut app, KeyCode::Char('L'));
        assert_eq!(app.status(), Some("Already submitted"));
        assert!(pump_until(&mut app, |a| a.status() == Some("Submitted 16 as DEE to 2048")));
        drop(app);
        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn status_expires() {
        let mut app = app();
        app.set_status("hello");
        app.on_frame(Duration::from_secs(3));
        assert_eq!(app.status(), Some("hello"));
        app.on_frame(Duration::from_secs(2));
        assert_eq!(app.status(), None);
    }

    #[test]
    fn pointer_moves_follow_mouse_in_breakout() {
        let mut app = app();
        press(&mut app, KeyCode::Char('2'));
        app.game_area = Rect::new(0, 0, 100, 40);
        app.on_mouse(MouseEvent {
            kind: MouseEventKind::Moved,
            column: 0,
            row: 10,
            modifiers: KeyModifiers::NONE,
        });
        app.on_frame(FRAME);
        assert_eq!(app.breakout.state().paddle_x, 0.0);
    }

    #[test]
    fn drag_becomes_swipe() {
        let mut app = app();
        press(&mut app, KeyCode::Char('1'));
        app.game_area = Rect::new(0, 0, 80, 40);
        let at = |kind, column, row| MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        };
        app.on_mouse(at(MouseEventKind::Down(MouseButton::Left), 40, 20));
        app.on_mouse(at(MouseEventKind::Up(MouseButton::Left), 40, 10));
        app.on_frame(FRAME);
        assert_eq!(app.snake.state().phase, crate::games::snake::Phase::Running);
    }

    #[test]
    fn switching_tabs_drops_pending_input() {
        let mut app = app();
        press(&mut app, KeyCode::Char('1'));
        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('1'));
        app.on_frame(FRAME);
        assert_eq!(app.snake.state().phase, crate::games::snake::Phase::NotStarted);
    }
}
