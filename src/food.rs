use rand::Rng;

use crate::{Cell, GridInt};
use crate::snake::Snake;

/// Picks a cell uniformly over the grid, resampling until it is off the snake.
/// Returns `None` once the snake covers the whole grid.
pub fn spawn_food<R: Rng + ?Sized>(rng: &mut R, grid_size: GridInt, snake: &Snake) -> Option<Cell> {
    let cells = grid_size as usize * grid_size as usize;
    if snake.len() >= cells {
        return None;
    }

    loop {
        let candidate = (rng.gen_range(0..grid_size), rng.gen_range(0..grid_size));
        if !snake.contains(candidate) {
            return Some(candidate);
        }
    }
}
