//! Module grid of a symbol and its mask penalty score.
//!
//! Coordinates passed to [`Symbol`] methods ignore the quiet zone: (0, 0) is
//! the top left module of the top left finder pattern. The quiet zone only
//! shows up when the grid is turned into a matrix.

const PENALTY_N1: i32 = 3;
const PENALTY_N2: i32 = 3;
const PENALTY_N3: i32 = 40;
const PENALTY_N4: i32 = 10;

/// A square grid of modules, each with a value and a used flag.
#[derive(Clone, PartialEq, Eq, Debug)]
pub(crate) struct Symbol {
    /// Module values at `[y * full_size + x]`, quiet zone included.
    modules: Vec<bool>,
    /// Whether the module at the same index has been written.
    used: Vec<bool>,
    full_size: usize,
    symbol_size: usize,
    quiet_zone: usize,
}

impl Symbol {
    /// Creates an empty `symbol_size` grid with a light border of
    /// `quiet_zone` modules on every side.
    pub fn new(symbol_size: usize, quiet_zone: usize) -> Self {
        let full_size = symbol_size + 2 * quiet_zone;
        Self {
            modules: vec![false; full_size * full_size],
            used: vec![false; full_size * full_size],
            full_size,
            symbol_size,
            quiet_zone,
        }
    }

    pub fn symbol_size(&self) -> usize {
        self.symbol_size
    }

    pub fn full_size(&self) -> usize {
        self.full_size
    }

    pub fn quiet_zone(&self) -> usize {
        self.quiet_zone
    }

    fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.symbol_size && y < self.symbol_size);
        (y + self.quiet_zone) * self.full_size + x + self.quiet_zone
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        self.modules[self.index(x, y)]
    }

    /// Returns true if the module at (x, y) has not been written yet.
    pub fn is_empty(&self, x: usize, y: usize) -> bool {
        !self.used[self.index(x, y)]
    }

    pub fn set(&mut self, x: usize, y: usize, isdark: bool) {
        let i = self.index(x, y);
        self.modules[i] = isdark;
        self.used[i] = true;
    }

    /// Writes `pattern` with its top left corner at (x, y).
    pub fn set_pattern<const W: usize>(&mut self, x: usize, y: usize, pattern: &[[bool; W]]) {
        for (dy, row) in pattern.iter().enumerate() {
            for (dx, &isdark) in row.iter().enumerate() {
                self.set(x + dx, y + dy, isdark);
            }
        }
    }

    /// Number of modules inside the symbol that were never written.
    pub fn num_empty_modules(&self) -> usize {
        (0..self.symbol_size)
            .flat_map(|y| (0..self.symbol_size).map(move |x| (x, y)))
            .filter(|&(x, y)| self.is_empty(x, y))
            .count()
    }

    /// Consumes the grid, returning the module values row-major with the
    /// quiet zone included.
    pub fn into_modules(self) -> Vec<bool> {
        self.modules
    }

    /// Sum of the four penalty rules, evaluated without the quiet zone.
    pub fn penalty_score(&self) -> i32 {
        self.penalty1() + self.penalty2() + self.penalty3() + self.penalty4()
    }

    /// Runs of same-colored modules in a row or column. A run reaching six
    /// modules scores N1 + 1, every further module one more.
    fn penalty1(&self) -> i32 {
        let size = self.symbol_size;
        let mut result: i32 = 0;
        for a in 0..size {
            for line in [Line::Column(a), Line::Row(a)] {
                let mut runcolor = self.at(line, 0);
                let mut runlength: i32 = 1;
                for k in 1..size {
                    let color = self.at(line, k);
                    if color != runcolor {
                        runcolor = color;
                        runlength = 1;
                        continue;
                    }
                    runlength += 1;
                    if runlength == 6 {
                        result += PENALTY_N1 + 1;
                    } else if runlength > 6 {
                        result += 1;
                    }
                }
            }
        }
        result
    }

    /// Every 2x2 block of one color scores N2.
    fn penalty2(&self) -> i32 {
        let mut blocks: i32 = 0;
        for y in 1..self.symbol_size {
            for x in 1..self.symbol_size {
                let color = self.get(x, y);
                if color == self.get(x - 1, y)
                    && color == self.get(x, y - 1)
                    && color == self.get(x - 1, y - 1)
                {
                    blocks += 1;
                }
            }
        }
        blocks * PENALTY_N2
    }

    /// Finder-like 1:1:3:1:1 runs with four light modules on one side score
    /// N3. Light modules are assumed before the first module of each line.
    fn penalty3(&self) -> i32 {
        let size = self.symbol_size;
        let mut result: i32 = 0;
        for a in 0..size {
            for line in [Line::Row(a), Line::Column(a)] {
                let mut window: u16 = 0;
                for k in 0..size {
                    window = (window << 1) | u16::from(self.at(line, k));
                    let found = match window & 0x7ff {
                        0x05d | 0x5d0 => true,
                        _ => k == size - 1 && window & 0x7f == 0x5d,
                    };
                    if found {
                        result += PENALTY_N3;
                        window = 0xff;
                    }
                }
            }
        }
        result
    }

    /// N4 for every full 5% the dark ratio deviates from one half.
    fn penalty4(&self) -> i32 {
        let total = (self.symbol_size * self.symbol_size) as i32;
        let dark = (0..self.symbol_size)
            .flat_map(|y| (0..self.symbol_size).map(move |x| (x, y)))
            .filter(|&(x, y)| self.get(x, y))
            .count() as i32;
        let deviation = (total / 2 - dark).abs();
        PENALTY_N4 * (deviation / (total / 20))
    }

    fn at(&self, line: Line, k: usize) -> bool {
        match line {
            Line::Row(y) => self.get(k, y),
            Line::Column(x) => self.get(x, k),
        }
    }
}

#[derive(Clone, Copy)]
enum Line {
    Row(usize),
    Column(usize),
}
