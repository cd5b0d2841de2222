use crate::grid::COLUMNS;
use crate::grid::Grid;
use crate::grid::ROWS;

/// Hex values of braille dots
///
/// ```text
///  1   8
///  2  10
///  4  20
/// 40  80
/// ```
///
/// Where the base blank pattern is codepoint `0x2800` (or U+2800)
///
/// To get other configurations, just add the numbers above.
const BRAILLE_EMPTY: u32 = 0x2800;

/// Renders a buffer of on/off dots as braille text, two dots wide and four tall per character.
pub struct Camera {
    /// The cell buffer
    cb: Vec<bool>,

    /// The frame buffer.
    fb: String,

    /// Codepoints. This allows us to construct the framebuffer more easily
    cp: Vec<u32>,

    /// Width of the cell buffer, in dots
    w: usize,

    /// Height of the cell buffer, in dots
    h: usize,
}

impl Camera {
    pub fn new(w: usize, h: usize) -> Self {
        let cb = vec![false; w * h];

        // Let `w` and `h` refer to width and height of the cell buffer. Then `bw = ceil(w / 2)`
        // and `bh = ceil(h / 4)` are the width and height of braille characters of our framebuffer
        let (bw, bh) = (w.div_ceil(2), h.div_ceil(4));
        let cp = vec![BRAILLE_EMPTY; bw * bh];

        // Each braille character is 3 bytes, and newlines one byte.
        let fb = String::with_capacity(3 * (bw * bh) + bh);

        Self { cb, fb, cp, w, h }
    }

    /// Camera large enough to show the whole grid with `cell_size` x `cell_size` dots per cell
    pub fn for_grid(cell_size: usize) -> Self {
        Self::new(COLUMNS * cell_size, ROWS * cell_size)
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    /// Turns on a single dot of the cell buffer
    pub fn draw_pixel(&mut self, x: usize, y: usize) {
        assert!(x < self.w, "x is out of bounds");
        assert!(y < self.h, "y is out of bounds");

        let i = self.xy_from(x, y);

        self.cb[i] = true;
    }

    /// Turns on an `s` x `s` square of dots with its top left corner at (`x`, `y`)
    pub fn draw_square(&mut self, x: usize, y: usize, s: usize) {
        assert!(x + s <= self.w, "x is out of bounds");
        assert!(y + s <= self.h, "y is out of bounds");

        for dy in 0..s {
            for dx in 0..s {
                let i = self.xy_from(x + dx, y + dy);
                self.cb[i] = true
            }
        }
    }

    /// Draw every live cell of `grid` as a filled square. The camera should come from
    /// [`Camera::for_grid`] with the same `cell_size`.
    pub fn draw_grid(&mut self, grid: &Grid, cell_size: usize) {
        for (row, column) in grid.live_cells() {
            self.draw_square(column * cell_size, row * cell_size, cell_size);
        }
    }

    /// Reset the cell buffer
    pub fn reset(&mut self) {
        self.cb.fill(false);
    }

    /// Turn the cell buffer into braille text, one line per four rows of dots.
    pub fn render(&mut self) -> &str {
        let bw = self.w.div_ceil(2);

        // compute new codepoints
        self.cp.fill(BRAILLE_EMPTY);

        for (n, &px) in self.cb.iter().enumerate() {
            if px {
                let (x, y) = (n % self.w, n / self.w);
                self.cp[(y / 4) * bw + (x / 2)] += Self::get_hex_value(x, y);
            }
        }

        // update framebuffer
        self.fb.clear();

        for (i, &c) in self.cp.iter().enumerate() {
            if i > 0 && i % bw == 0 {
                self.fb.push('\n');
            }

            // Every codepoint in U+2800..=U+28FF is a braille pattern
            self.fb.push(char::from_u32(c).unwrap_or(' '));
        }
        self.fb.push('\n');

        &self.fb
    }

    fn xy_from(&self, x: usize, y: usize) -> usize {
        y * self.w + x
    }

    fn get_hex_value(x: usize, y: usize) -> u32 {
        match (x % 2, y % 4) {
            (0, 0) => 0x1,
            (1, 0) => 0x8,
            (0, 1) => 0x2,
            (1, 1) => 0x10,
            (0, 2) => 0x4,
            (1, 2) => 0x20,
            (0, 3) => 0x40,
            (1, 3) => 0x80,
            _ => unreachable!(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::Camera;
    use crate::grid::Grid;

    #[test]
    fn empty_frame_shape() {
        let mut cam = Camera::new(5, 6);

        let frame = cam.render();

        // 5 dots wide is 3 characters, 6 dots tall is 2 lines
        assert_eq!(frame, "⠀⠀⠀\n⠀⠀⠀\n");
    }

    #[test]
    fn single_dots() {
        let mut cam = Camera::new(2, 4);

        cam.draw_pixel(0, 0);
        assert_eq!(cam.render(), "⠁\n");

        cam.draw_pixel(1, 3);
        assert_eq!(cam.render(), "⢁\n");

        cam.reset();
        assert_eq!(cam.render(), "⠀\n");
    }

    #[test]
    fn full_square() {
        let mut cam = Camera::new(2, 4);

        cam.draw_square(0, 0, 2);
        assert_eq!(cam.render(), "⠛\n");
    }

    #[test]
    #[should_panic(expected = "x is out of bounds")]
    fn square_past_edge() {
        let mut cam = Camera::new(4, 4);

        cam.draw_square(3, 0, 2);
    }

    #[test]
    fn grid_corners() {
        let mut grid = Grid::new();
        grid.set(0, 0).unwrap();
        grid.set(9, 9).unwrap();

        let mut cam = Camera::for_grid(4);
        assert_eq!((cam.width(), cam.height()), (40, 40));

        cam.draw_grid(&grid, 4);
        let frame = cam.render().to_string();
        let lines: Vec<&str> = frame.lines().collect();

        assert_eq!(lines.len(), 10);
        assert!(lines.iter().all(|line| line.chars().count() == 20));

        // A 4x4 square of dots is two full braille characters side by side
        assert!(lines[0].starts_with("⣿⣿⠀"));
        assert!(lines[9].ends_with("⠀⣿⣿"));
        assert!(lines[1..9].iter().all(|line| line.chars().all(|c| c == '⠀')));
    }
}
