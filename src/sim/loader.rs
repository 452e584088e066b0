/// Board loader: the comma-separated board source format.
///
/// ## Format (kept byte-compatible with the course-board files):
///   ```text
///   width,height
///   <height lines of width comma-separated tile ids>
///   ```
///
/// ## Tile id table:
///   0 = floor   1 = wall   2 = pit   3 = spawn
///   4/5/6/7 = belt north/east/south/west
///
/// ## Sources (priority order):
///   1. `boards/` directory (individual `.csv` files, sorted by name)
///   2. Built-in embedded boards

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::board::Board;
use crate::domain::tile::Tile;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("cannot read board file: {0}")]
    Io(#[from] std::io::Error),
    #[error("board source is empty")]
    MissingHeader,
    #[error("bad dimension header {0:?} (want \"width,height\")")]
    BadHeader(String),
    #[error("board declares {expected} rows but has {found}")]
    RowCount { expected: usize, found: usize },
    #[error("row {row} has {found} cells, want {expected}")]
    RowWidth { row: usize, expected: usize, found: usize },
    #[error("cell ({col},{row}) is not a tile id: {text:?}")]
    BadCell { row: usize, col: usize, text: String },
    #[error("cell ({col},{row}) has unknown tile id {id}")]
    UnknownTile { row: usize, col: usize, id: u32 },
    #[error("board has zero area")]
    Empty,
}

/// One selectable board: a disk file or a compiled-in fallback.
#[derive(Clone, Debug)]
pub struct BoardEntry {
    pub name: String,
    pub source: BoardSource,
}

#[derive(Clone, Debug)]
pub enum BoardSource {
    File(PathBuf),
    Embedded(&'static str),
}

// ══════════════════════════════════════════════════════════════
// Parsing
// ══════════════════════════════════════════════════════════════

/// Parse a board from source text. Trailing blank lines are
/// tolerated; everything else malformed is a LoadError.
pub fn parse_board(source: &str) -> Result<Board, LoadError> {
    let mut lines: Vec<&str> = source.lines().collect();
    while lines.last().map_or(false, |l| l.trim().is_empty()) {
        lines.pop();
    }
    let (header, body) = match lines.split_first() {
        Some(split) => split,
        None => return Err(LoadError::MissingHeader),
    };
    let (width, height) = parse_header(header)?;
    if width == 0 || height == 0 {
        return Err(LoadError::Empty);
    }
    if body.len() != height {
        return Err(LoadError::RowCount {
            expected: height,
            found: body.len(),
        });
    }

    let mut rows = Vec::with_capacity(height);
    for (y, line) in body.iter().enumerate() {
        let cells: Vec<&str> = line.split(',').collect();
        if cells.len() != width {
            return Err(LoadError::RowWidth {
                row: y,
                expected: width,
                found: cells.len(),
            });
        }
        let mut row = Vec::with_capacity(width);
        for (x, cell) in cells.iter().enumerate() {
            let text = cell.trim();
            let id: u32 = text.parse().map_err(|_| LoadError::BadCell {
                row: y,
                col: x,
                text: text.to_string(),
            })?;
            let tile = Tile::from_id(id).ok_or(LoadError::UnknownTile {
                row: y,
                col: x,
                id,
            })?;
            row.push(tile);
        }
        rows.push(row);
    }
    Ok(Board::from_rows(rows))
}

fn parse_header(line: &str) -> Result<(usize, usize), LoadError> {
    let bad = || LoadError::BadHeader(line.to_string());
    let parts: Vec<&str> = line.split(',').collect();
    if parts.len() != 2 {
        return Err(bad());
    }
    let width: usize = parts[0].trim().parse().map_err(|_| bad())?;
    let height: usize = parts[1].trim().parse().map_err(|_| bad())?;
    Ok((width, height))
}

/// Write a board back out in the canonical source format.
pub fn serialize_board(board: &Board) -> String {
    let mut out = format!("{},{}\n", board.width(), board.height());
    for row in board.rows() {
        let ids: Vec<String> = row.iter().map(|t| t.id().to_string()).collect();
        out.push_str(&ids.join(","));
        out.push('\n');
    }
    out
}

// ══════════════════════════════════════════════════════════════
// Sources
// ══════════════════════════════════════════════════════════════

pub fn load_board_file(path: &Path) -> Result<Board, LoadError> {
    let content = std::fs::read_to_string(path)?;
    parse_board(&content)
}

pub fn load_entry(entry: &BoardEntry) -> Result<Board, LoadError> {
    match &entry.source {
        BoardSource::File(path) => load_board_file(path),
        BoardSource::Embedded(source) => parse_board(source),
    }
}

/// Every selectable board: `.csv` files from the boards directory
/// first (sorted by file name), then the built-ins. Unreadable or
/// malformed disk files still get listed — the selection screen
/// reports the load failure when they are picked.
pub fn list_boards(dir: &Path) -> Vec<BoardEntry> {
    let mut entries = Vec::new();

    if dir.is_dir() {
        if let Ok(read) = std::fs::read_dir(dir) {
            let mut files: Vec<PathBuf> = read
                .flatten()
                .map(|e| e.path())
                .filter(|p| p.extension().map_or(false, |e| e == "csv"))
                .collect();
            files.sort();
            for path in files {
                let name = path
                    .file_stem()
                    .unwrap_or_default()
                    .to_string_lossy()
                    .to_string();
                entries.push(BoardEntry {
                    name,
                    source: BoardSource::File(path),
                });
            }
        }
    }

    for (name, source) in EMBEDDED_BOARDS {
        entries.push(BoardEntry {
            name: format!("{} (built-in)", name),
            source: BoardSource::Embedded(source),
        });
    }

    entries
}

// ══════════════════════════════════════════════════════════════
// Embedded fallback boards
// ══════════════════════════════════════════════════════════════

pub const EMBEDDED_BOARDS: &[(&str, &str)] = &[
    (
        "Proving Grounds",
        "12,9\n\
         0,0,0,0,0,0,0,0,0,0,0,0\n\
         0,0,0,0,0,0,0,0,0,0,0,0\n\
         0,0,1,0,0,0,0,0,2,0,0,0\n\
         0,0,0,2,0,0,0,0,0,0,0,0\n\
         0,0,0,0,0,1,1,0,0,0,0,0\n\
         0,0,0,5,5,5,5,0,0,0,0,0\n\
         0,0,0,0,0,0,0,0,0,0,0,0\n\
         0,3,0,0,0,3,0,0,0,3,0,0\n\
         0,0,0,0,0,0,0,0,0,0,0,0\n",
    ),
    (
        "Conveyor Yard",
        "14,10\n\
         0,0,0,0,0,0,0,0,0,0,0,0,0,0\n\
         0,5,5,5,5,5,5,5,5,5,5,6,0,0\n\
         0,4,0,0,0,0,0,0,0,0,0,6,0,0\n\
         0,4,0,1,1,0,0,1,1,0,0,6,0,0\n\
         0,4,0,0,0,0,2,0,0,0,0,6,0,0\n\
         0,4,0,0,0,2,0,0,0,0,0,6,0,0\n\
         0,4,0,1,1,0,0,1,1,0,0,6,0,0\n\
         0,4,0,0,0,0,0,0,0,0,0,6,0,0\n\
         0,4,7,7,7,7,7,7,7,7,7,7,0,0\n\
         0,3,0,3,0,0,0,0,0,3,0,3,0,0\n",
    ),
    (
        "The Drop",
        "10,8\n\
         0,0,0,0,0,0,0,0,0,0\n\
         0,2,0,0,1,0,0,2,0,0\n\
         0,0,0,0,0,0,0,0,0,0\n\
         0,0,1,0,2,0,1,0,0,0\n\
         0,0,0,0,0,0,0,0,0,0\n\
         0,6,0,0,0,0,0,4,0,0\n\
         0,0,0,0,0,0,0,0,0,0\n\
         0,0,0,3,0,0,3,0,0,0\n",
    ),
];

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
