//! Seeded blob generator for mineral maps.
//!
//! Deposits are grown in two passes:
//!
//! 1. **Random walks** from `num_blobs` distinct seed cells, each walking
//!    `max(1, target / num_blobs)` steps and filling the cells it crosses.
//! 2. **Frontier growth**: empty 4-neighbours of filled cells are picked at
//!    random until exactly `⌊rows · cols · fill_ratio⌋` cells are filled.
//!
//! All randomness comes from the caller's RNG, so a fixed seed yields a fixed map.

use rand::seq::index;
use rand::Rng;

use super::error::WorldError;
use super::grid::WorldGrid;

const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

/// Parameters of the clustered random-walk generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlobGenerator {
    /// Target fraction of mineral cells, in `[0, 1]`.
    pub fill_ratio: f64,
    /// Number of distinct blob seeds.
    pub num_blobs: usize,
}

impl BlobGenerator {
    /// Creates a generator with the given fill ratio and blob count.
    pub fn new(fill_ratio: f64, num_blobs: usize) -> Self {
        Self {
            fill_ratio,
            num_blobs,
        }
    }

    /// Generates a `rows × cols` world.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        rows: usize,
        cols: usize,
        rng: &mut R,
    ) -> Result<WorldGrid, WorldError> {
        if rows == 0 || cols == 0 {
            return Err(WorldError::EmptyGrid { rows, cols });
        }
        if !(0.0..=1.0).contains(&self.fill_ratio) {
            return Err(WorldError::InvalidFillRatio(self.fill_ratio));
        }
        let cells = rows * cols;
        if self.num_blobs > cells {
            return Err(WorldError::TooManyBlobs {
                blobs: self.num_blobs,
                cells,
            });
        }

        let target = (cells as f64 * self.fill_ratio).floor() as usize;
        let mut canvas = Canvas::new(rows, cols);

        let steps_per_blob = (target / self.num_blobs.max(1)).max(1);
        for seed in index::sample(rng, cells, self.num_blobs) {
            canvas.random_walk(seed, steps_per_blob, target, rng);
        }

        canvas.grow_frontier(target, rng);

        WorldGrid::from_cells(rows, cols, canvas.cells)
    }
}

impl Default for BlobGenerator {
    fn default() -> Self {
        Self::new(0.1, 10)
    }
}

/// Mutable working grid used while generating.
struct Canvas {
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
    filled: usize,
}

impl Canvas {
    fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![false; rows * cols],
            filled: 0,
        }
    }

    fn fill(&mut self, idx: usize) {
        if !self.cells[idx] {
            self.cells[idx] = true;
            self.filled += 1;
        }
    }

    fn neighbours(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        let (x, y) = ((idx / self.cols) as isize, (idx % self.cols) as isize);
        DIRECTIONS.iter().filter_map(move |&(dx, dy)| {
            let (nx, ny) = (x + dx, y + dy);
            let inside = nx >= 0 && ny >= 0 && (nx as usize) < self.rows && (ny as usize) < self.cols;
            inside.then(|| nx as usize * self.cols + ny as usize)
        })
    }

    /// Walks from `start`, filling visited cells and clamping at the edges.
    fn random_walk<R: Rng + ?Sized>(&mut self, start: usize, steps: usize, target: usize, rng: &mut R) {
        let (mut x, mut y) = ((start / self.cols) as isize, (start % self.cols) as isize);
        for _ in 0..steps {
            if self.filled >= target {
                return;
            }
            self.fill(x as usize * self.cols + y as usize);

            let (dx, dy) = DIRECTIONS[rng.gen_range(0..DIRECTIONS.len())];
            x = (x + dx).clamp(0, self.rows as isize - 1);
            y = (y + dy).clamp(0, self.cols as isize - 1);
        }
    }

    /// Fills frontier cells until `target` cells are filled.
    fn grow_frontier<R: Rng + ?Sized>(&mut self, target: usize, rng: &mut R) {
        let mut frontier = Vec::new();
        let mut queued = vec![false; self.cells.len()];

        for idx in 0..self.cells.len() {
            if self.cells[idx] {
                self.enqueue_neighbours(idx, &mut frontier, &mut queued);
            }
        }

        while self.filled < target {
            let idx = if frontier.is_empty() {
                log::warn!("blob frontier exhausted, placing a deposit at random");
                let empty: Vec<usize> = (0..self.cells.len()).filter(|&i| !self.cells[i]).collect();
                empty[rng.gen_range(0..empty.len())]
            } else {
                frontier.swap_remove(rng.gen_range(0..frontier.len()))
            };

            if self.cells[idx] {
                continue;
            }
            self.fill(idx);
            self.enqueue_neighbours(idx, &mut frontier, &mut queued);
        }
    }

    fn enqueue_neighbours(&self, idx: usize, frontier: &mut Vec<usize>, queued: &mut [bool]) {
        for n in self.neighbours(idx) {
            if !self.cells[n] && !queued[n] {
                queued[n] = true;
                frontier.push(n);
            }
        }
    }
}
