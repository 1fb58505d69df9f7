use std::collections::VecDeque;

use crate::{Cell, GridInt};
use Direction::*;
use MoveResult::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    pub fn delta(self) -> (GridInt, GridInt) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Collision {
    Wall,
    Body,
}

#[derive(Debug, PartialEq, Eq)]
pub enum MoveResult {
    Moved { new_head: Cell, old_tail: Option<Cell> },
    Crashed(Collision),
}

/// The snake's body, stored head first.
#[derive(Clone, Debug)]
pub struct Snake {
    body: VecDeque<Cell>,
    direction: Direction,
}

impl Snake {
    /// Lays out `size` segments trailing behind `head`, opposite to `direction`.
    pub fn new(head: Cell, size: GridInt, direction: Direction) -> Self {
        let diff = direction.delta();

        let body = (0..size.max(1))
            .map(|i| (head.0 - diff.0 * i, head.1 - diff.1 * i))
            .collect();
        Snake { body, direction }
    }

    #[cfg(test)]
    pub fn from_cells(cells: &[Cell], direction: Direction) -> Self {
        assert!(!cells.is_empty(), "a snake needs at least one segment");
        Snake { body: cells.iter().copied().collect(), direction }
    }

    pub fn body(&self) -> &VecDeque<Cell> {
        &self.body
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    pub fn next_head(&self) -> Cell {
        let (x, y) = self.head();
        let (dx, dy) = self.direction.delta();
        (x + dx, y + dy)
    }

    /// Moves one step in the current direction. The tail is kept when the
    /// new head lands on `food`, otherwise it is dropped.
    pub fn move_step(&mut self, grid_size: GridInt, food: Option<Cell>) -> MoveResult {
        let new_head = self.next_head();

        if !in_bounds(new_head, grid_size) {
            return Crashed(Collision::Wall);
        }

        // The tail still counts: it has not moved out of the way yet
        if self.contains(new_head) {
            return Crashed(Collision::Body);
        }

        self.body.push_front(new_head);

        if food == Some(new_head) {
            Moved { new_head, old_tail: None }
        } else {
            let old_tail = self.body.pop_back();
            Moved { new_head, old_tail }
        }
    }

    /// Returns whether the direction was changed. Reversals are refused.
    pub fn set_direction(&mut self, new_direction: Direction) -> bool {
        if new_direction == self.direction.opposite() {
            return false;
        }

        self.direction = new_direction;
        true
    }

    pub fn get_direction(&self) -> Direction {
        self.direction
    }
}

pub fn in_bounds(cell: Cell, grid_size: GridInt) -> bool {
    (0..grid_size).contains(&cell.0) && (0..grid_size).contains(&cell.1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn starting_snake() -> Snake {
        Snake::new((10, 10), 3, Right)
    }

    #[test]
    fn new_snake_trails_behind_head() {
        let snake = starting_snake();
        assert_eq!(snake.body().iter().copied().collect::<Vec<_>>(), vec![(10, 10), (9, 10), (8, 10)]);

        let snake = Snake::new((5, 5), 2, Up);
        assert_eq!(snake.body().iter().copied().collect::<Vec<_>>(), vec![(5, 5), (5, 6)]);
    }

    #[test]
    fn plain_step_drops_the_tail() {
        let mut snake = starting_snake();
        let res = snake.move_step(20, None);

        assert_eq!(res, Moved { new_head: (11, 10), old_tail: Some((8, 10)) });
        assert_eq!(snake.body().iter().copied().collect::<Vec<_>>(), vec![(11, 10), (10, 10), (9, 10)]);
    }

    #[test]
    fn step_onto_food_keeps_the_tail() {
        let mut snake = starting_snake();
        let res = snake.move_step(20, Some((11, 10)));

        assert_eq!(res, Moved { new_head: (11, 10), old_tail: None });
        assert_eq!(snake.len(), 4);
    }

    #[test]
    fn leaving_the_grid_is_a_wall_crash() {
        let mut snake = Snake::from_cells(&[(19, 10), (18, 10)], Right);
        assert_eq!(snake.move_step(20, None), Crashed(Collision::Wall));
        assert_eq!(snake.len(), 2);

        let mut snake = Snake::from_cells(&[(0, 0)], Up);
        assert_eq!(snake.move_step(20, None), Crashed(Collision::Wall));

        let mut snake = Snake::from_cells(&[(0, 3)], Left);
        assert_eq!(snake.move_step(20, None), Crashed(Collision::Wall));

        let mut snake = Snake::from_cells(&[(4, 19)], Down);
        assert_eq!(snake.move_step(20, None), Crashed(Collision::Wall));
    }

    #[test]
    fn running_into_itself_is_a_body_crash() {
        // Head at (5,5) heading down into (5,6), which is part of the body
        let cells = [(5, 5), (6, 5), (6, 6), (5, 6), (4, 6)];
        let mut snake = Snake::from_cells(&cells, Down);
        assert_eq!(snake.move_step(20, None), Crashed(Collision::Body));
    }

    #[test]
    fn moving_into_the_current_tail_still_crashes() {
        let cells = [(5, 5), (6, 5), (6, 6), (5, 6)];
        let mut snake = Snake::from_cells(&cells, Down);
        assert_eq!(snake.move_step(20, None), Crashed(Collision::Body));
    }

    #[test]
    fn reversal_is_refused() {
        let mut snake = starting_snake();
        assert!(!snake.set_direction(Left));
        assert_eq!(snake.get_direction(), Right);

        assert!(snake.set_direction(Up));
        assert!(!snake.set_direction(Down));
        assert_eq!(snake.get_direction(), Up);
    }

    #[test]
    fn bounds() {
        assert!(in_bounds((0, 0), 20));
        assert!(in_bounds((19, 19), 20));
        assert!(!in_bounds((20, 0), 20));
        assert!(!in_bounds((0, -1), 20));
    }
}
