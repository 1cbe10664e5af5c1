//! Shapes module - the static polyomino catalog
//!
//! Every shape is a rectangular occupancy pattern written as text rows
//! (`#` occupied, `.` empty) plus a fixed color. Shapes are never rotated and
//! never mutated; the session and the offer generator share them as
//! `&'static Shape` references into [`CATALOG`].

use crate::types::{Color, MEDIUM_SHAPE_CELLS, SMALL_SHAPE_MAX_CELLS};

/// A polyomino definition
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shape {
    id: &'static str,
    pattern: &'static [&'static str],
    color: Color,
}

impl Shape {
    pub const fn new(id: &'static str, pattern: &'static [&'static str], color: Color) -> Self {
        Self { id, pattern, color }
    }

    /// Catalog identity
    pub fn id(&self) -> &'static str {
        self.id
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Height of the occupancy matrix
    pub const fn rows(&self) -> usize {
        self.pattern.len()
    }

    /// Width of the occupancy matrix
    pub const fn cols(&self) -> usize {
        if self.pattern.is_empty() {
            0
        } else {
            self.pattern[0].len()
        }
    }

    /// Occupied-cell count (the shape's "size")
    pub const fn cell_count(&self) -> usize {
        let mut n = 0;
        let mut r = 0;
        while r < self.pattern.len() {
            let bytes = self.pattern[r].as_bytes();
            let mut c = 0;
            while c < bytes.len() {
                if bytes[c] == b'#' {
                    n += 1;
                }
                c += 1;
            }
            r += 1;
        }
        n
    }

    /// Whether matrix cell (row, col) is occupied; false outside the matrix
    pub fn is_occupied(&self, row: usize, col: usize) -> bool {
        self.pattern
            .get(row)
            .and_then(|line| line.as_bytes().get(col))
            .is_some_and(|&b| b == b'#')
    }

    /// Occupied cells as (row, col) offsets from the top-left anchor
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.pattern.iter().enumerate().flat_map(|(r, line)| {
            line.bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'#')
                .map(move |(c, _)| (r as i32, c as i32))
        })
    }

    pub const fn bucket(&self) -> SizeBucket {
        SizeBucket::for_cells(self.cell_count())
    }
}

/// Size class used by the offer generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeBucket {
    /// At most 3 blocks
    Small,
    /// Exactly 4 blocks
    Medium,
    /// 5 blocks or more
    Large,
}

impl SizeBucket {
    pub const ALL: [SizeBucket; 3] = [SizeBucket::Small, SizeBucket::Medium, SizeBucket::Large];

    pub const fn for_cells(cells: usize) -> Self {
        if cells <= SMALL_SHAPE_MAX_CELLS {
            SizeBucket::Small
        } else if cells == MEDIUM_SHAPE_CELLS {
            SizeBucket::Medium
        } else {
            SizeBucket::Large
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SizeBucket::Small => "small",
            SizeBucket::Medium => "medium",
            SizeBucket::Large => "large",
        }
    }
}

/// Number of catalog shapes that fall into `bucket`
pub const fn bucket_len(shapes: &[Shape], bucket: SizeBucket) -> usize {
    let mut n = 0;
    let mut i = 0;
    while i < shapes.len() {
        if shapes[i].bucket() as u8 == bucket as u8 {
            n += 1;
        }
        i += 1;
    }
    n
}

const CATALOG_SHAPES: [Shape; 37] = [
    // Single
    Shape::new("1x1", &["#"], Color::Red),
    // Lines
    Shape::new("2x1", &["##"], Color::Orange),
    Shape::new("1x2", &["#", "#"], Color::Orange),
    Shape::new("3x1", &["###"], Color::Yellow),
    Shape::new("1x3", &["#", "#", "#"], Color::Yellow),
    Shape::new("4x1", &["####"], Color::Cyan),
    Shape::new("1x4", &["#", "#", "#", "#"], Color::Cyan),
    Shape::new("5x1", &["#####"], Color::Blue),
    Shape::new("1x5", &["#", "#", "#", "#", "#"], Color::Blue),
    // Squares
    Shape::new("2x2", &["##", "##"], Color::Green),
    Shape::new("3x3", &["###", "###", "###"], Color::Indigo),
    // Rectangles
    Shape::new("2x3", &["###", "###"], Color::Teal),
    Shape::new("3x2", &["##", "##", "##"], Color::Teal),
    // Small corners
    Shape::new("Cor-TL", &["##", "#."], Color::Pink),
    Shape::new("Cor-TR", &["##", ".#"], Color::Pink),
    Shape::new("Cor-BL", &["#.", "##"], Color::Pink),
    Shape::new("Cor-BR", &[".#", "##"], Color::Pink),
    // L
    Shape::new("L-Up", &["#.", "#.", "##"], Color::Orange),
    Shape::new("L-Right", &["###", "#.."], Color::Orange),
    Shape::new("L-Down", &["##", ".#", ".#"], Color::Orange),
    Shape::new("L-Left", &["..#", "###"], Color::Orange),
    // J
    Shape::new("J-Up", &[".#", ".#", "##"], Color::Blue),
    Shape::new("J-Right", &["#..", "###"], Color::Blue),
    Shape::new("J-Down", &["##", "#.", "#."], Color::Blue),
    Shape::new("J-Left", &["###", "..#"], Color::Blue),
    // Big corners
    Shape::new("Big-TL", &["###", "#..", "#.."], Color::Indigo),
    Shape::new("Big-TR", &["###", "..#", "..#"], Color::Indigo),
    Shape::new("Big-BL", &["#..", "#..", "###"], Color::Indigo),
    Shape::new("Big-BR", &["..#", "..#", "###"], Color::Indigo),
    // Z / S
    Shape::new("Z-H", &["##.", ".##"], Color::Red),
    Shape::new("Z-V", &[".#", "##", "#."], Color::Red),
    Shape::new("S-H", &[".##", "##."], Color::Green),
    Shape::new("S-V", &["#.", "##", ".#"], Color::Green),
    // T
    Shape::new("T-Up", &[".#.", "###"], Color::Purple),
    Shape::new("T-Down", &["###", ".#."], Color::Purple),
    Shape::new("T-Left", &[".#", "##", ".#"], Color::Purple),
    Shape::new("T-Right", &["#.", "##", "#."], Color::Purple),
];

const _: () = assert!(
    bucket_len(&CATALOG_SHAPES, SizeBucket::Small) > 0,
    "catalog has no small shapes"
);
const _: () = assert!(
    bucket_len(&CATALOG_SHAPES, SizeBucket::Medium) > 0,
    "catalog has no medium shapes"
);
const _: () = assert!(
    bucket_len(&CATALOG_SHAPES, SizeBucket::Large) > 0,
    "catalog has no large shapes"
);

/// The canonical shape catalog
pub static CATALOG: [Shape; 37] = CATALOG_SHAPES;

/// Look up a catalog shape by id
pub fn find(id: &str) -> Option<&'static Shape> {
    CATALOG.iter().find(|s| s.id == id)
}
