use std::time::{Duration, Instant};

use anyhow::Result;
use log::{debug, info, warn};
use rand::Rng;

use crate::config::GameConfig;
use crate::input::Command;
use crate::render::{draw_scene, Surface};
use crate::scheduler::{interval_from_ms, TickScheduler};
use crate::sim::{Simulation, TickOutcome};
use crate::store::HighScoreStore;

/// Where the game currently is. `Paused` keeps the session alive but every
/// tick is a no-op.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Running,
    Paused,
    GameOver,
}

/// The three mutually exclusive panels a front end can show.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Panel {
    Menu,
    Playing,
    GameOver,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Everything the controller needs from a front end besides drawing.
pub trait Presenter: Surface {
    fn show_panel(&mut self, panel: Panel);
    fn set_paused(&mut self, paused: bool);
    fn set_score(&mut self, score: u32);
    fn set_high_score(&mut self, score: u32);
    fn set_final_score(&mut self, score: u32, won: bool);
    /// Pushes everything drawn or changed since the last call to the screen.
    fn present(&mut self) -> Result<()>;
}

/// Owns the running simulation and the tick source, and routes input and
/// ticks to them.
pub struct SnakeGame<P, S, R> {
    config: GameConfig,
    screen: Screen,
    sim: Option<Simulation>,
    scheduler: TickScheduler,
    high_score: u32,
    store: S,
    rng: R,
    view: P,
}

impl<P: Presenter, S: HighScoreStore, R: Rng> SnakeGame<P, S, R> {
    pub fn new(config: GameConfig, view: P, store: S, rng: R) -> Self {
        let high_score = match store.get() {
            Ok(score) => score.unwrap_or(0),
            Err(e) => {
                warn!("could not read high score: {:#}", e);
                0
            }
        };

        SnakeGame {
            config,
            screen: Screen::Menu,
            sim: None,
            scheduler: TickScheduler::new(),
            high_score,
            store,
            rng,
            view,
        }
    }

    /// Puts the menu on screen with the stored high score.
    pub fn show_intro(&mut self) -> Result<()> {
        self.view.set_high_score(self.high_score);
        self.view.show_panel(Panel::Menu);
        self.view.present()
    }

    pub fn into_view(self) -> P {
        self.view
    }

    /// How long the input loop may block before [`SnakeGame::update`] is due.
    pub fn time_until_tick(&self, now: Instant) -> Option<Duration> {
        self.scheduler.time_until_next(now)
    }

    pub fn handle(&mut self, cmd: Command, now: Instant) -> Result<Flow> {
        match (cmd, self.screen) {
            (Command::Quit, _) => return Ok(Flow::Quit),
            (Command::Start, Screen::Menu) | (Command::Restart, Screen::GameOver) => self.play(now)?,
            (Command::Menu, Screen::Running)
            | (Command::Menu, Screen::Paused)
            | (Command::Menu, Screen::GameOver) => self.return_to_menu()?,
            (Command::TogglePause, Screen::Running) | (Command::TogglePause, Screen::Paused) => self.toggle_pause()?,
            (Command::Move(dir), Screen::Running) => {
                if let Some(sim) = self.sim.as_mut() {
                    sim.request_direction(dir);
                }
            }
            // Direction keys do nothing while paused, and stray keys on the
            // other screens are ignored
            _ => {}
        }

        Ok(Flow::Continue)
    }

    /// Runs at most one tick if the tick source says one is due.
    pub fn update(&mut self, now: Instant) -> Result<()> {
        if self.scheduler.poll(now) {
            self.tick(now)?;
        }
        Ok(())
    }

    /// Starts a fresh session, discarding whatever came before.
    pub fn play(&mut self, now: Instant) -> Result<()> {
        let sim = Simulation::new(&self.config, &mut self.rng);
        info!("new game, interval {}ms", sim.interval_ms());

        self.scheduler.start(interval_from_ms(sim.interval_ms()), now);
        self.sim = Some(sim);
        self.screen = Screen::Running;

        self.view.set_paused(false);
        self.view.set_score(0);
        self.view.show_panel(Panel::Playing);
        self.draw()
    }

    fn tick(&mut self, now: Instant) -> Result<()> {
        if self.screen != Screen::Running {
            return Ok(());
        }

        let sim = match self.sim.as_mut() {
            Some(sim) => sim,
            None => return Ok(()),
        };

        match sim.tick(&mut self.rng) {
            TickOutcome::Moved => self.draw(),
            TickOutcome::Ate { interval_ms } => {
                let score = sim.score();
                self.scheduler.reschedule(interval_from_ms(interval_ms), now);
                self.record_score(score);
                self.draw()
            }
            TickOutcome::Collided(collision) => {
                info!("game over: hit {:?} with score {}", collision, sim.score());
                self.game_over(false)
            }
            TickOutcome::Won => {
                let score = sim.score();
                self.record_score(score);
                info!("snake fills the board, score {}", score);
                self.game_over(true)
            }
        }
    }

    fn record_score(&mut self, score: u32) {
        self.view.set_score(score);

        if score > self.high_score {
            self.high_score = score;
            if let Err(e) = self.store.set(score) {
                warn!("could not save high score {}: {:#}", score, e);
            }
            self.view.set_high_score(score);
        }
    }

    fn game_over(&mut self, won: bool) -> Result<()> {
        self.scheduler.stop();
        self.screen = Screen::GameOver;

        let score = self.sim.as_ref().map_or(0, |sim| sim.score());
        self.view.set_final_score(score, won);
        self.view.show_panel(Panel::GameOver);
        self.draw()
    }

    fn toggle_pause(&mut self) -> Result<()> {
        self.screen = match self.screen {
            Screen::Running => Screen::Paused,
            _ => Screen::Running,
        };
        debug!("pause toggled, now {:?}", self.screen);

        self.view.set_paused(self.screen == Screen::Paused);
        self.view.present()
    }

    fn return_to_menu(&mut self) -> Result<()> {
        self.scheduler.stop();
        self.screen = Screen::Menu;
        self.view.set_paused(false);
        self.view.show_panel(Panel::Menu);
        self.view.present()
    }

    fn draw(&mut self) -> Result<()> {
        if let Some(sim) = self.sim.as_ref() {
            draw_scene(&mut self.view, sim, self.config.cell_size());
        }
        self.view.present()
    }
}
