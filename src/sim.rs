use log::debug;
use rand::Rng;

use crate::{Cell, GridInt};
use crate::config::GameConfig;
use crate::food::spawn_food;
use crate::snake::{Collision, Direction, MoveResult, Snake};

#[derive(Debug, PartialEq)]
pub enum TickOutcome {
    Moved,
    /// Food was eaten; the tick source should run at `interval_ms` from now on.
    Ate { interval_ms: f64 },
    Collided(Collision),
    /// The snake fills the grid, there is nowhere left to put food.
    Won,
}

/// State of one running game. Replaced wholesale on start and restart.
#[derive(Clone, Debug)]
pub struct Simulation {
    grid_size: GridInt,
    snake: Snake,
    food: Cell,
    pending: Option<Direction>,
    score: u32,
    interval_ms: f64,
    speed_factor: f64,
    min_interval_ms: f64,
    food_score: u32,
}

impl Simulation {
    pub fn new<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R) -> Self {
        let center = config.grid_size / 2;
        let snake = Snake::new((center, center), config.initial_snake_length, Direction::Right);
        Self::with_snake(config, snake, rng)
    }

    pub fn with_snake<R: Rng + ?Sized>(config: &GameConfig, snake: Snake, rng: &mut R) -> Self {
        let food = spawn_food(rng, config.grid_size, &snake).unwrap_or_else(|| snake.head());

        Simulation {
            grid_size: config.grid_size,
            snake,
            food,
            pending: None,
            score: 0,
            interval_ms: config.initial_speed_ms,
            speed_factor: config.speed_factor,
            min_interval_ms: config.min_interval_ms,
            food_score: config.food_score,
        }
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Cell {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    pub fn grid_size(&self) -> GridInt {
        self.grid_size
    }

    pub fn direction(&self) -> Direction {
        self.snake.get_direction()
    }

    #[cfg(test)]
    pub fn place_food(&mut self, food: Cell) {
        self.food = food;
    }

    /// Queues a turn for the next tick. Returns false, leaving everything
    /// untouched, when `dir` would reverse the snake onto itself.
    pub fn request_direction(&mut self, dir: Direction) -> bool {
        if dir == self.snake.get_direction().opposite() {
            return false;
        }

        self.pending = Some(dir);
        true
    }

    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> TickOutcome {
        if let Some(dir) = self.pending.take() {
            self.snake.set_direction(dir);
        }

        match self.snake.move_step(self.grid_size, Some(self.food)) {
            MoveResult::Crashed(collision) => TickOutcome::Collided(collision),
            MoveResult::Moved { old_tail: Some(_), .. } => TickOutcome::Moved,
            MoveResult::Moved { old_tail: None, new_head } => {
                self.score += self.food_score;
                self.interval_ms = (self.interval_ms * self.speed_factor).max(self.min_interval_ms);
                debug!("ate food at {:?}, score {}, interval {:.1}ms", new_head, self.score, self.interval_ms);

                match spawn_food(rng, self.grid_size, &self.snake) {
                    Some(food) => {
                        self.food = food;
                        TickOutcome::Ate { interval_ms: self.interval_ms }
                    }
                    None => TickOutcome::Won,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snake::Direction::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn cells(sim: &Simulation) -> Vec<Cell> {
        sim.snake().body().iter().copied().collect()
    }

    fn setup() -> (Simulation, StdRng) {
        let mut rng = StdRng::seed_from_u64(42);
        let sim = Simulation::new(&GameConfig::default(), &mut rng);
        (sim, rng)
    }

    #[test]
    fn new_game_layout() {
        let (sim, _) = setup();
        assert_eq!(cells(&sim), vec![(10, 10), (9, 10), (8, 10)]);
        assert_eq!(sim.direction(), Right);
        assert_eq!(sim.score(), 0);
        assert_eq!(sim.interval_ms(), 200.0);
        assert!(!sim.snake().contains(sim.food()));
    }

    #[test]
    fn one_tick_moves_right() {
        let (mut sim, mut rng) = setup();
        sim.place_food((0, 0));

        assert_eq!(sim.tick(&mut rng), TickOutcome::Moved);
        assert_eq!(cells(&sim), vec![(11, 10), (10, 10), (9, 10)]);
    }

    #[test]
    fn wall_ends_the_game() {
        let mut rng = StdRng::seed_from_u64(3);
        let snake = Snake::from_cells(&[(19, 10), (18, 10), (17, 10)], Right);
        let mut sim = Simulation::with_snake(&GameConfig::default(), snake, &mut rng);
        let before = cells(&sim);

        assert_eq!(sim.tick(&mut rng), TickOutcome::Collided(Collision::Wall));
        assert_eq!(cells(&sim), before);
        assert_eq!(sim.score(), 0);
    }

    #[test]
    fn eating_scores_grows_and_respawns_food() {
        let (mut sim, mut rng) = setup();
        sim.place_food((11, 10));

        assert_eq!(sim.tick(&mut rng), TickOutcome::Ate { interval_ms: 180.0 });
        assert_eq!(sim.score(), 10);
        assert_eq!(cells(&sim), vec![(11, 10), (10, 10), (9, 10), (8, 10)]);
        assert!(!sim.snake().contains(sim.food()));
    }

    #[test]
    fn length_changes_only_when_eating() {
        let (mut sim, mut rng) = setup();

        // Wander in a loop that stays on the board
        let turns = [Up, Left, Down, Right];
        for step in 0..200 {
            if step % 3 == 0 {
                sim.request_direction(turns[(step / 3) % 4]);
            }
            let before = sim.snake().len();
            let next = {
                let mut probe = sim.snake().clone();
                if let Some(dir) = sim.pending {
                    probe.set_direction(dir);
                }
                probe.next_head()
            };
            let lands_on_food = next == sim.food();

            match sim.tick(&mut rng) {
                TickOutcome::Moved => assert!(!lands_on_food && sim.snake().len() == before),
                TickOutcome::Ate { .. } => assert!(lands_on_food && sim.snake().len() == before + 1),
                _ => break,
            }
        }
    }

    #[test]
    fn score_and_speed_after_repeated_meals() {
        let config = GameConfig { min_interval_ms: 1.0, ..Default::default() };
        let mut rng = StdRng::seed_from_u64(9);
        let snake = Snake::from_cells(&[(0, 0)], Right);
        let mut sim = Simulation::with_snake(&config, snake, &mut rng);

        for n in 1..=5 {
            let head = sim.snake().head();
            sim.place_food((head.0 + 1, head.1));
            assert!(matches!(sim.tick(&mut rng), TickOutcome::Ate { .. }));

            assert_eq!(sim.score(), 10 * n);
            let expected = 200.0 * 0.9f64.powi(n as i32);
            assert!((sim.interval_ms() - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn interval_never_drops_below_floor() {
        let (mut sim, mut rng) = setup();
        sim.interval_ms = 41.0;
        sim.place_food((11, 10));

        assert_eq!(sim.tick(&mut rng), TickOutcome::Ate { interval_ms: 40.0 });
    }

    #[test]
    fn reversal_request_changes_nothing() {
        let (mut sim, mut rng) = setup();
        sim.place_food((0, 0));

        assert!(!sim.request_direction(Left));
        assert_eq!(sim.pending, None);
        assert_eq!(sim.direction(), Right);

        sim.tick(&mut rng);
        assert_eq!(sim.snake().head(), (11, 10));
    }

    #[test]
    fn pending_turn_applies_on_next_tick() {
        let (mut sim, mut rng) = setup();
        sim.place_food((0, 0));

        assert!(sim.request_direction(Up));
        assert_eq!(sim.direction(), Right);

        sim.tick(&mut rng);
        assert_eq!(sim.direction(), Up);
        assert_eq!(sim.snake().head(), (10, 9));
    }

    #[test]
    fn filling_the_grid_wins() {
        let config = GameConfig { grid_size: 2, ..Default::default() };
        let mut rng = StdRng::seed_from_u64(5);
        let snake = Snake::from_cells(&[(0, 1), (0, 0), (1, 0)], Down);
        let mut sim = Simulation::with_snake(&config, snake, &mut rng);
        assert_eq!(sim.food(), (1, 1));

        assert!(sim.request_direction(Right));
        assert_eq!(sim.tick(&mut rng), TickOutcome::Won);
        assert_eq!(sim.snake().len(), 4);
        assert_eq!(sim.score(), 10);
    }
}
