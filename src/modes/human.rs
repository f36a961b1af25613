use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Interval, MissedTickBehavior, interval};

use crate::game::{Action, GameEngine, Ladder, LevelConfig, Phase, Signal};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;
use crate::score::{ScoreBridge, ScoreRecord};

/// Number of entries on the leaderboard screen
pub const LEADERBOARD_SIZE: usize = 5;

/// Tick rate used while no level is running
const IDLE_TICK: Duration = Duration::from_millis(100);

/// What the terminal is currently showing
pub enum Screen {
    Menu { high_score: Option<ScoreRecord> },
    Playing(GameEngine),
    Completed { final_score: u32 },
    Leaderboard { records: Vec<ScoreRecord> },
}

pub struct HumanMode {
    screen: Screen,
    ladder: Arc<Ladder>,
    bridge: ScoreBridge,
    first_level: u32,
    seed: u64,
    levels_started: u64,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(ladder: Arc<Ladder>, bridge: ScoreBridge, first_level: u32, seed: u64) -> Self {
        let high_score = bridge.high_score();

        Self {
            screen: Screen::Menu { high_score },
            ladder,
            bridge,
            first_level,
            seed,
            levels_started: 0,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut tick_timer = level_timer(self.tick_interval());

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                // Game logic tick
                _ = tick_timer.tick() => {
                    self.update_game();
                }

                // Render frame
                _ = render_timer.tick() => {
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.screen, &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }

            // Each level runs at its own pace
            let wanted = self.tick_interval();
            if tick_timer.period() != wanted {
                tick_timer = level_timer(wanted);
            }
        }

        Ok(())
    }

    fn tick_interval(&self) -> Duration {
        match &self.screen {
            Screen::Playing(engine) => engine.state().config.tick_interval,
            _ => IDLE_TICK,
        }
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            let action = self.input_handler.handle_key_event(key);
            self.handle_key(action);
        }
    }

    fn handle_key(&mut self, action: KeyAction) {
        if action == KeyAction::Quit {
            self.should_quit = true;
            return;
        }

        if let KeyAction::GameAction(game_action) = action {
            if let Screen::Playing(engine) = &mut self.screen {
                if let Some(signal) = engine.handle_action(game_action) {
                    self.on_signal(signal);
                }
                return;
            }
        }

        match self.screen {
            Screen::Menu { .. } => match action {
                KeyAction::GameAction(Action::Confirm | Action::TogglePause) => self.start_game(),
                KeyAction::Leaderboard => {
                    let records = self.bridge.leaderboard(LEADERBOARD_SIZE);
                    self.screen = Screen::Leaderboard { records };
                }
                _ => {}
            },
            Screen::Completed { .. } => {
                if let KeyAction::GameAction(Action::Confirm | Action::Cancel) = action {
                    self.bridge.end_session();
                    self.show_menu();
                }
            }
            Screen::Leaderboard { .. } => {
                if let KeyAction::GameAction(Action::Confirm | Action::Cancel) = action {
                    self.show_menu();
                }
            }
            Screen::Playing(_) => {}
        }
    }

    fn update_game(&mut self) {
        let Screen::Playing(engine) = &mut self.screen else {
            return;
        };

        let interval = engine.state().config.tick_interval;
        let counted = engine.state().phase == Phase::Playing;
        let result = engine.tick();

        if counted {
            self.metrics.on_tick(&result.info, interval);
        }
        if let Some(signal) = result.signal {
            self.on_signal(signal);
        }
    }

    fn on_signal(&mut self, signal: Signal) {
        match signal {
            Signal::AdvanceToLevel(config) => {
                self.metrics.on_level_cleared();
                self.enter_level(config);
            }
            Signal::GameCompleted { final_score } => {
                self.metrics.on_level_cleared();
                self.screen = Screen::Completed { final_score };
            }
            Signal::ReturnToMenu => self.show_menu(),
        }
    }

    fn start_game(&mut self) {
        // Every new game gets its own session
        self.bridge.end_session();
        self.metrics.on_game_start();

        let config = self
            .ladder
            .get(self.first_level)
            .unwrap_or_else(|| self.ladder.first())
            .clone();
        self.enter_level(config);
    }

    fn enter_level(&mut self, config: LevelConfig) {
        self.levels_started += 1;
        let seed = self.seed.wrapping_add(self.levels_started);
        let engine = GameEngine::new(config, Arc::clone(&self.ladder), self.bridge.clone(), seed);
        self.screen = Screen::Playing(engine);
    }

    fn show_menu(&mut self) {
        self.screen = Screen::Menu {
            high_score: self.bridge.high_score(),
        };
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

fn level_timer(period: Duration) -> Interval {
    let mut timer = interval(period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer
}
