use std::sync::Arc;

use super::{
    action::{Action, Direction},
    config::LevelConfig,
    food::FoodSpawner,
    grid::Position,
    levels::Ladder,
    progression::{Phase, PhaseEvent, Signal},
    snake::Snake,
    state::{CollisionType, GameState},
};
use crate::score::ScoreBridge;

/// Information about a step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepInfo {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Type of collision if one occurred
    pub collision_type: Option<CollisionType>,
    /// Whether the head crossed an open edge
    pub wrapped: bool,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Additional information about the step
    pub info: StepInfo,
    /// Notification for the shell, if the step ended the level
    pub signal: Option<Signal>,
}

/// Runs one level: owns its state and resolves ticks and input
pub struct GameEngine {
    state: GameState,
    ladder: Arc<Ladder>,
    bridge: ScoreBridge,
    spawner: FoodSpawner,
}

impl GameEngine {
    /// Start `config` with a one-cell snake at the grid center heading right
    pub fn new(config: LevelConfig, ladder: Arc<Ladder>, bridge: ScoreBridge, seed: u64) -> Self {
        let center = config.grid().center();
        let snake = Snake::new(center, Direction::Right);
        Self::with_snake(config, ladder, bridge, seed, snake)
    }

    /// Start `config` from an explicit snake
    pub fn with_snake(
        config: LevelConfig,
        ladder: Arc<Ladder>,
        bridge: ScoreBridge,
        seed: u64,
        snake: Snake,
    ) -> Self {
        let score = bridge.hydrate();
        if score > config.score_threshold {
            tracing::warn!(
                level = config.level,
                score,
                threshold = config.score_threshold,
                "hydrated score is past this level's threshold"
            );
        } else if (config.score_threshold - score) % config.points_per_food != 0 {
            tracing::warn!(
                level = config.level,
                score,
                threshold = config.score_threshold,
                "threshold is not a whole number of foods away and will be overshot"
            );
        }

        tracing::info!(
            level = config.level,
            rows = config.rows,
            columns = config.columns,
            walled = config.walled,
            threshold = config.score_threshold,
            "level started"
        );

        let mut engine = Self {
            state: GameState::new(config, snake, score),
            ladder,
            bridge,
            spawner: FoodSpawner::new(seed),
        };

        engine.state.food = engine
            .spawner
            .spawn(&engine.state.grid, &engine.state.snake);
        if engine.state.food.is_none() || engine.state.has_reached_threshold() {
            engine.apply(PhaseEvent::ThresholdMet);
        }

        engine
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Run one simulation step
    pub fn tick(&mut self) -> StepResult {
        let mut info = StepInfo::default();

        let signal = match self.state.phase {
            Phase::Playing => self.move_snake(&mut info),
            Phase::ThresholdReached { .. } => {
                self.apply(PhaseEvent::Elapsed(self.state.config.tick_interval))
            }
            Phase::Paused | Phase::Advancing | Phase::Completed | Phase::GameOver => None,
        };

        StepResult { info, signal }
    }

    /// Apply a decoded player action
    pub fn handle_action(&mut self, action: Action) -> Option<Signal> {
        match self.state.phase {
            Phase::Playing => match action {
                Action::Turn(direction) => {
                    self.state.snake.turn(direction);
                    None
                }
                Action::TogglePause => self.apply(PhaseEvent::TogglePause),
                Action::Confirm | Action::Cancel => None,
            },
            Phase::Paused => match action {
                Action::TogglePause => self.apply(PhaseEvent::TogglePause),
                Action::Cancel => Some(Signal::ReturnToMenu),
                Action::Turn(_) | Action::Confirm => None,
            },
            Phase::GameOver | Phase::Completed => match action {
                Action::Confirm | Action::Cancel => {
                    self.bridge.end_session();
                    Some(Signal::ReturnToMenu)
                }
                Action::Turn(_) | Action::TogglePause => None,
            },
            Phase::ThresholdReached { .. } | Phase::Advancing => None,
        }
    }

    fn is_final_level(&self) -> bool {
        self.state.config.is_final_level || self.ladder.next_after(self.state.config.level).is_none()
    }

    fn apply(&mut self, event: PhaseEvent) -> Option<Signal> {
        let before = self.state.phase;
        let after = before.transition(event, self.is_final_level());
        self.state.phase = after;

        if before == after {
            return None;
        }

        let level = self.state.config.level;
        let score = self.state.score;
        match after {
            Phase::ThresholdReached { .. } if !matches!(before, Phase::ThresholdReached { .. }) => {
                tracing::info!(level, score, "level threshold reached");
                None
            }
            Phase::Advancing => {
                let next = self.ladder.next_after(level).cloned()?;
                tracing::info!(level, next = next.level, score, "advancing");
                Some(Signal::AdvanceToLevel(next))
            }
            Phase::Completed => {
                tracing::info!(level, score, "game completed");
                Some(Signal::GameCompleted { final_score: score })
            }
            _ => None,
        }
    }

    /// Where the head goes next, or what it hits
    fn resolve_target(&self) -> Result<(Position, bool), CollisionType> {
        let grid = &self.state.grid;
        let head = self.state.snake.head();
        let candidate = head.moved_in_direction(self.state.snake.direction);

        if grid.hits_wall(candidate) {
            return Err(CollisionType::Wall);
        }

        let wraps = !grid.in_bounds(candidate) || !grid.in_bounds(head);
        let target = if wraps { grid.wrap(candidate) } else { candidate };

        if grid.is_obstacle(target) {
            return Err(CollisionType::Obstacle);
        }
        if self.state.snake.occupies(target) {
            return Err(CollisionType::SelfCollision);
        }

        Ok((target, wraps))
    }

    fn move_snake(&mut self, info: &mut StepInfo) -> Option<Signal> {
        let (target, wrapped) = match self.resolve_target() {
            Ok(resolved) => resolved,
            Err(collision) => {
                info.collision_type = Some(collision);
                tracing::info!(
                    level = self.state.config.level,
                    score = self.state.score,
                    ?collision,
                    "game over"
                );
                return self.apply(PhaseEvent::Collided);
            }
        };

        if self.state.has_reached_threshold() {
            return self.apply(PhaseEvent::ThresholdMet);
        }

        let ate_food = self.state.food == Some(target);
        self.state.snake.advance(target, ate_food);
        self.state.steps += 1;
        info.wrapped = wrapped;
        debug_assert!(
            self.state.snake.has_unique_cells(),
            "snake body overlaps itself"
        );

        if !ate_food {
            return None;
        }

        info.ate_food = true;
        self.state.score = self
            .state
            .score
            .saturating_add(self.state.config.points_per_food);
        self.bridge.record(self.state.score);

        self.state.food = self.spawner.spawn(&self.state.grid, &self.state.snake);
        if self.state.food.is_none() {
            tracing::info!(level = self.state.config.level, "board cleared");
            return self.apply(PhaseEvent::ThresholdMet);
        }
        if self.state.has_reached_threshold() {
            if self.state.score > self.state.config.score_threshold {
                tracing::warn!(
                    level = self.state.config.level,
                    score = self.state.score,
                    threshold = self.state.config.score_threshold,
                    "score overshot the threshold"
                );
            }
            return self.apply(PhaseEvent::ThresholdMet);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::{
        InMemorySessionManager, MemoryScoreStore, ScoreQueue, ScoreStore, SessionManager,
    };
    use std::time::Duration;

    struct Harness {
        engine: GameEngine,
        queue: ScoreQueue,
        store: Arc<MemoryScoreStore>,
        sessions: Arc<InMemorySessionManager>,
    }

    fn harness_with_store(
        config: LevelConfig,
        body: Vec<Position>,
        direction: Direction,
        store: Arc<MemoryScoreStore>,
        sessions: Arc<InMemorySessionManager>,
    ) -> Harness {
        let (bridge, queue) = ScoreBridge::new(store.clone(), sessions.clone());
        let snake = Snake::from_body(body, direction).unwrap();
        let engine =
            GameEngine::with_snake(config, Arc::new(Ladder::default()), bridge, 9, snake);
        Harness {
            engine,
            queue,
            store,
            sessions,
        }
    }

    fn harness(config: LevelConfig, body: Vec<Position>, direction: Direction) -> Harness {
        harness_with_store(
            config,
            body,
            direction,
            Arc::new(MemoryScoreStore::new("ada")),
            Arc::new(InMemorySessionManager::new()),
        )
    }

    fn p(x: i32, y: i32) -> Position {
        Position::new(x, y)
    }

    #[test]
    fn test_new_spawns_at_center() {
        let (bridge, _queue) = ScoreBridge::new(
            Arc::new(MemoryScoreStore::new("ada")),
            Arc::new(InMemorySessionManager::new()),
        );
        let engine = GameEngine::new(
            LevelConfig::sandbox(35, 25),
            Arc::new(Ladder::default()),
            bridge,
            1,
        );

        let state = engine.state();
        assert_eq!(state.snake.body(), &[p(17, 12)]);
        assert_eq!(state.snake.direction, Direction::Right);
        assert_eq!(state.score, 0);
        assert_eq!(state.phase, Phase::Playing);
        assert!(state.food.is_some());
    }

    #[test]
    fn test_basic_movement() {
        let mut h = harness(LevelConfig::sandbox(10, 10), vec![p(5, 5)], Direction::Right);
        h.engine.state.food = Some(p(0, 0));

        let result = h.engine.tick();

        assert_eq!(result.info, StepInfo::default());
        assert_eq!(result.signal, None);
        assert_eq!(h.engine.state().snake.body(), &[p(6, 5)]);
        assert_eq!(h.engine.state().steps, 1);
    }

    #[test]
    fn test_wall_collision() {
        let config = LevelConfig::sandbox(10, 10).with_walls(true);
        let mut h = harness(config, vec![p(9, 5), p(8, 5)], Direction::Right);
        h.engine.state.food = Some(p(0, 0));

        let result = h.engine.tick();

        assert_eq!(result.info.collision_type, Some(CollisionType::Wall));
        assert!(h.engine.state().is_game_over());
        assert_eq!(h.engine.state().snake.body(), &[p(9, 5), p(8, 5)]);
    }

    #[test]
    fn test_wrap_on_open_edge() {
        let mut h = harness(LevelConfig::sandbox(10, 10), vec![p(9, 5)], Direction::Right);
        h.engine.state.food = Some(p(3, 3));

        let result = h.engine.tick();

        assert!(result.info.wrapped);
        assert!(!result.info.ate_food);
        assert_eq!(h.engine.state().snake.head(), p(0, 5));
        assert_eq!(h.engine.state().snake.len(), 1);
    }

    #[test]
    fn test_wrap_vertical_edges() {
        let mut h = harness(
            LevelConfig::sandbox(10, 8),
            vec![p(4, 0), p(4, 1)],
            Direction::Up,
        );
        h.engine.state.food = Some(p(0, 0));

        h.engine.tick();
        assert_eq!(h.engine.state().snake.body(), &[p(4, 7), p(4, 0)]);
    }

    #[test]
    fn test_obstacle_collision() {
        let config = LevelConfig::sandbox(10, 10).with_obstacles([p(6, 5)]);
        let mut h = harness(config, vec![p(5, 5)], Direction::Right);
        h.engine.state.food = Some(p(0, 0));

        let result = h.engine.tick();

        assert_eq!(result.info.collision_type, Some(CollisionType::Obstacle));
        assert!(h.engine.state().is_game_over());
        assert_eq!(h.engine.state().snake.body(), &[p(5, 5)]);
    }

    #[test]
    fn test_wrapping_into_pillar_is_fatal() {
        let config = LevelConfig::sandbox(10, 10).with_obstacles([p(0, 5)]);
        let mut h = harness(config, vec![p(9, 5)], Direction::Right);
        h.engine.state.food = Some(p(3, 3));

        let result = h.engine.tick();
        assert_eq!(result.info.collision_type, Some(CollisionType::Obstacle));
    }

    #[test]
    fn test_wrapping_into_body_is_fatal() {
        // Tail sits on the far edge; the head wraps straight onto it
        let body = vec![p(9, 5), p(9, 6), p(0, 6), p(0, 5), p(0, 4)];
        let mut h = harness(LevelConfig::sandbox(10, 10), body.clone(), Direction::Right);
        h.engine.state.food = Some(p(3, 3));

        let result = h.engine.tick();

        assert_eq!(
            result.info.collision_type,
            Some(CollisionType::SelfCollision)
        );
        assert!(h.engine.state().is_game_over());
        assert_eq!(h.engine.state().snake.body(), body.as_slice());
    }

    #[test]
    fn test_self_collision() {
        let body = vec![p(5, 5), p(5, 6), p(6, 6), p(6, 5)];
        let mut h = harness(LevelConfig::sandbox(10, 10), body.clone(), Direction::Right);
        h.engine.state.food = Some(p(0, 0));

        let result = h.engine.tick();

        assert_eq!(
            result.info.collision_type,
            Some(CollisionType::SelfCollision)
        );
        assert!(h.engine.state().is_game_over());
        assert_eq!(h.engine.state().snake.body(), body.as_slice());
    }

    #[test]
    fn test_food_consumption() {
        let config = LevelConfig::sandbox(10, 10).with_obstacles([p(1, 1), p(2, 2)]);
        let mut h = harness(config, vec![p(5, 5)], Direction::Right);
        h.engine.state.food = Some(p(6, 5));

        let result = h.engine.tick();

        let state = h.engine.state();
        assert!(result.info.ate_food);
        assert_eq!(state.score, 10);
        assert_eq!(state.snake.body(), &[p(6, 5), p(5, 5)]);

        let food = state.food.unwrap();
        assert!(!state.snake.occupies(food));
        assert!(!state.grid.is_obstacle(food));

        let write = h.queue.try_recv().unwrap();
        assert_eq!(write.value, 10);
        assert_eq!(write.session, h.sessions.current_session().unwrap());
    }

    #[test]
    fn test_prevent_reversal() {
        let mut h = harness(LevelConfig::sandbox(10, 10), vec![p(5, 5)], Direction::Right);

        h.engine.handle_action(Action::Turn(Direction::Left));
        assert_eq!(h.engine.state().snake.direction, Direction::Right);

        h.engine.handle_action(Action::Turn(Direction::Up));
        assert_eq!(h.engine.state().snake.direction, Direction::Up);

        h.engine.handle_action(Action::Turn(Direction::Down));
        assert_eq!(h.engine.state().snake.direction, Direction::Up);
    }

    #[test]
    fn test_pause_gates_movement_and_turns() {
        let mut h = harness(LevelConfig::sandbox(10, 10), vec![p(5, 5)], Direction::Right);
        h.engine.state.food = Some(p(0, 0));

        assert_eq!(h.engine.handle_action(Action::TogglePause), None);
        assert!(h.engine.state().is_paused());

        h.engine.tick();
        h.engine.handle_action(Action::Turn(Direction::Up));
        assert_eq!(h.engine.state().snake.body(), &[p(5, 5)]);
        assert_eq!(h.engine.state().snake.direction, Direction::Right);

        h.engine.handle_action(Action::TogglePause);
        h.engine.tick();
        assert_eq!(h.engine.state().snake.head(), p(6, 5));
    }

    #[test]
    fn test_cancel_while_paused_returns_to_menu() {
        let mut h = harness(LevelConfig::sandbox(10, 10), vec![p(5, 5)], Direction::Right);
        let session = h.sessions.current_session().unwrap();

        assert_eq!(h.engine.handle_action(Action::Cancel), None);
        h.engine.handle_action(Action::TogglePause);
        assert_eq!(
            h.engine.handle_action(Action::Cancel),
            Some(Signal::ReturnToMenu)
        );
        assert_eq!(h.sessions.current_session().unwrap(), session);
    }

    #[test]
    fn test_game_over_ignores_gameplay_and_ends_session() {
        let config = LevelConfig::sandbox(10, 10).with_walls(true);
        let mut h = harness(config, vec![p(9, 5)], Direction::Right);
        h.engine.state.food = Some(p(0, 0));
        let session = h.sessions.current_session().unwrap();

        h.engine.tick();
        assert!(h.engine.state().is_game_over());

        assert_eq!(h.engine.handle_action(Action::Turn(Direction::Up)), None);
        assert_eq!(h.engine.handle_action(Action::TogglePause), None);
        assert!(h.engine.state().is_game_over());
        assert_eq!(h.engine.tick().signal, None);

        assert_eq!(
            h.engine.handle_action(Action::Confirm),
            Some(Signal::ReturnToMenu)
        );
        assert_ne!(h.sessions.current_session().unwrap(), session);
    }

    #[test]
    fn test_cancel_leaves_game_over() {
        let config = LevelConfig::sandbox(10, 10).with_walls(true);
        let mut h = harness(config, vec![p(9, 5)], Direction::Right);
        h.engine.state.food = Some(p(0, 0));
        let session = h.sessions.current_session().unwrap();

        h.engine.tick();
        assert!(h.engine.state().is_game_over());

        assert_eq!(
            h.engine.handle_action(Action::Cancel),
            Some(Signal::ReturnToMenu)
        );
        assert_ne!(h.sessions.current_session().unwrap(), session);
    }

    #[test]
    fn test_score_past_threshold_still_ends_level() {
        // Started at 0 on a level whose threshold isn't a multiple of 10
        let config = LevelConfig::sandbox(10, 10).with_threshold(25);
        let mut h = harness(config, vec![p(1, 5)], Direction::Right);

        for (tick, x) in (2..5).enumerate() {
            h.engine.state.food = Some(p(x, 5));
            h.engine.tick();
            if tick < 2 {
                assert_eq!(h.engine.state().phase, Phase::Playing);
            }
        }

        let state = h.engine.state();
        assert_eq!(state.score, 30);
        assert!(state.is_leveling_up());

        let frozen = state.snake.body().to_vec();
        h.engine.tick();
        assert_eq!(h.engine.state().snake.body(), frozen.as_slice());
        assert_eq!(h.engine.state().score, 30);
    }

    #[test]
    fn test_threshold_freezes_then_completes() {
        let config = LevelConfig::sandbox(10, 10).with_threshold(10);
        let mut h = harness(config, vec![p(5, 5)], Direction::Right);
        h.engine.state.food = Some(p(6, 5));

        h.engine.tick();
        assert!(h.engine.state().is_leveling_up());
        let frozen_body = h.engine.state().snake.body().to_vec();

        // 200ms ticks, 2s delay
        for _ in 0..9 {
            assert_eq!(h.engine.tick().signal, None);
            assert_eq!(h.engine.state().snake.body(), frozen_body.as_slice());
            assert_eq!(h.engine.state().score, 10);
            assert_eq!(h.engine.handle_action(Action::TogglePause), None);
        }

        assert_eq!(
            h.engine.tick().signal,
            Some(Signal::GameCompleted { final_score: 10 })
        );
        assert_eq!(h.engine.state().phase, Phase::Completed);
    }

    #[test]
    fn test_threshold_advances_to_next_level() {
        let mut config = LevelConfig::sandbox(10, 10).with_threshold(10);
        config.is_final_level = false;
        config.tick_interval = Duration::from_secs(1);
        let mut h = harness(config, vec![p(5, 5)], Direction::Right);
        h.engine.state.food = Some(p(6, 5));

        h.engine.tick();
        assert_eq!(h.engine.tick().signal, None);

        let expected = Ladder::default().get(2).cloned().unwrap();
        assert_eq!(
            h.engine.tick().signal,
            Some(Signal::AdvanceToLevel(expected))
        );
        assert!(h.engine.state().phase.is_terminal());
    }

    #[test]
    fn test_hydrated_score_carries_over() {
        let store = Arc::new(MemoryScoreStore::new("ada"));
        let sessions = Arc::new(InMemorySessionManager::new());
        let session = sessions.current_session().unwrap();
        store.set_current_score(&session, 700).unwrap();

        let config = LevelConfig::sandbox(10, 10).with_threshold(1900);
        let mut h = harness_with_store(config, vec![p(5, 5)], Direction::Right, store, sessions);
        assert_eq!(h.engine.state().score, 700);

        h.engine.state.food = Some(p(6, 5));
        h.engine.tick();
        assert_eq!(h.engine.state().score, 710);
        assert_eq!(h.queue.try_recv().unwrap().value, 710);
        assert_eq!(h.store.current_score(&session).unwrap(), 700);
    }

    #[test]
    fn test_hydrated_score_at_threshold_starts_frozen() {
        let store = Arc::new(MemoryScoreStore::new("ada"));
        let sessions = Arc::new(InMemorySessionManager::new());
        store
            .set_current_score(&sessions.current_session().unwrap(), 200)
            .unwrap();

        let h = harness_with_store(
            LevelConfig::sandbox(10, 10),
            vec![p(5, 5)],
            Direction::Right,
            store,
            sessions,
        );
        assert!(h.engine.state().is_leveling_up());
    }

    #[test]
    fn test_filling_the_board_clears_the_level() {
        let mut h = harness(
            LevelConfig::sandbox(3, 1),
            vec![p(1, 0), p(0, 0)],
            Direction::Right,
        );
        h.engine.state.food = Some(p(2, 0));

        let result = h.engine.tick();

        assert!(result.info.ate_food);
        assert_eq!(h.engine.state().food, None);
        assert!(h.engine.state().is_leveling_up());
    }

    #[test]
    fn test_same_seed_same_food() {
        let a = harness(LevelConfig::sandbox(20, 20), vec![p(10, 10)], Direction::Right);
        let b = harness(LevelConfig::sandbox(20, 20), vec![p(10, 10)], Direction::Right);
        assert_eq!(a.engine.state().food, b.engine.state().food);
    }
}
