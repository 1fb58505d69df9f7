use crate::sim::Simulation;
use crate::snake::Direction;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const BACKGROUND: Rgb = Rgb(0xff, 0xff, 0xff);
pub const GRID_LINE: Rgb = Rgb(0xee, 0xee, 0xee);
pub const SNAKE_BODY: Rgb = Rgb(0xff, 0xd7, 0x00);
pub const SNAKE_TAIL: Rgb = Rgb(0xda, 0xa5, 0x20);
pub const EYE: Rgb = Rgb(0, 0, 0);
pub const FOOD: Rgb = Rgb(0xf4, 0x43, 0x36);

/// Something that accepts draw commands in pixel coordinates.
pub trait Surface {
    fn clear(&mut self, color: Rgb);
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Rgb);
    fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), color: Rgb);
    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Rgb);
}

/// Redraws the whole board: background, grid, snake, food. `cell` is the
/// side of one grid cell in pixels.
pub fn draw_scene<S: Surface + ?Sized>(surface: &mut S, sim: &Simulation, cell: f64) {
    let canvas_size = cell * sim.grid_size() as f64;

    surface.clear(BACKGROUND);

    for i in 0..=sim.grid_size() {
        let offset = i as f64 * cell;
        surface.stroke_line((offset, 0.0), (offset, canvas_size), GRID_LINE);
        surface.stroke_line((0.0, offset), (canvas_size, offset), GRID_LINE);
    }

    let body = sim.snake().body();
    let last = body.len() - 1;
    for (i, &(x, y)) in body.iter().enumerate() {
        let color = if i == last && last > 0 { SNAKE_TAIL } else { SNAKE_BODY };
        let (px, py) = (x as f64 * cell, y as f64 * cell);
        surface.fill_rect(px, py, cell - 1.0, cell - 1.0, color);

        if i == 0 {
            draw_eyes(surface, px, py, cell, sim.direction());
        }
    }

    let (fx, fy) = sim.food();
    surface.fill_circle(
        fx as f64 * cell + cell / 2.0,
        fy as f64 * cell + cell / 2.0,
        cell / 2.0 - 1.0,
        FOOD,
    );
}

fn draw_eyes<S: Surface + ?Sized>(surface: &mut S, px: f64, py: f64, cell: f64, dir: Direction) {
    let size = cell / 6.0;
    let offset = cell / 4.0;

    let eyes = match dir {
        Direction::Right => [
            (px + cell - offset, py + offset),
            (px + cell - offset, py + cell - offset - size),
        ],
        Direction::Left => [
            (px + offset - size, py + offset),
            (px + offset - size, py + cell - offset - size),
        ],
        Direction::Up => [
            (px + offset, py + offset - size),
            (px + cell - offset - size, py + offset - size),
        ],
        Direction::Down => [
            (px + offset, py + cell - offset),
            (px + cell - offset - size, py + cell - offset),
        ],
    };

    for &(ex, ey) in eyes.iter() {
        surface.fill_rect(ex, ey, size, size, EYE);
    }
}
