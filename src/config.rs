/// External configuration loader.
///
/// Reads `botrally.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub deal: DealConfig,
    pub pace: PaceConfig,
    pub boards_dir: PathBuf,
    pub free_drive: bool,
}

#[derive(Clone, Debug)]
pub struct DealConfig {
    pub hand_size: usize,
    pub registers: usize,
}

#[derive(Clone, Debug)]
pub struct PaceConfig {
    pub tick_rate_ms: u64,
    pub card_delay_ticks: u32, // ticks between card plays during execution
    pub belt_delay_ticks: u32, // extra pause before the conveyor pass
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    deal: TomlDeal,
    #[serde(default)]
    pace: TomlPace,
    #[serde(default)]
    boards: TomlBoards,
    #[serde(default)]
    game: TomlGame,
}

#[derive(Deserialize, Debug)]
struct TomlDeal {
    #[serde(default = "default_hand_size")]
    hand_size: usize,
    #[serde(default = "default_registers")]
    registers: usize,
}

#[derive(Deserialize, Debug)]
struct TomlPace {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
    #[serde(default = "default_card_delay")]
    card_delay_ticks: u32,
    #[serde(default = "default_belt_delay")]
    belt_delay_ticks: u32,
}

#[derive(Deserialize, Debug)]
struct TomlBoards {
    #[serde(default = "default_boards_dir")]
    dir: String,
}

#[derive(Deserialize, Debug)]
struct TomlGame {
    #[serde(default)]
    free_drive: bool,
}

// ── Defaults ──

fn default_hand_size() -> usize { 7 }
fn default_registers() -> usize { 5 }
fn default_tick_rate() -> u64 { 40 }
fn default_card_delay() -> u32 { 12 }   // ~0.5s per play at 40ms tick
fn default_belt_delay() -> u32 { 6 }
fn default_boards_dir() -> String { "boards".into() }

impl Default for TomlDeal {
    fn default() -> Self {
        TomlDeal {
            hand_size: default_hand_size(),
            registers: default_registers(),
        }
    }
}

impl Default for TomlPace {
    fn default() -> Self {
        TomlPace {
            tick_rate_ms: default_tick_rate(),
            card_delay_ticks: default_card_delay(),
            belt_delay_ticks: default_belt_delay(),
        }
    }
}

impl Default for TomlBoards {
    fn default() -> Self {
        TomlBoards {
            dir: default_boards_dir(),
        }
    }
}

impl Default for TomlGame {
    fn default() -> Self {
        TomlGame { free_drive: false }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `botrally.toml`, searching the candidate
    /// directories in order. Missing file or missing keys gracefully
    /// fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();

        let toml_cfg = load_toml(&search_dirs);

        // A program needs one card per register
        let mut hand_size = toml_cfg.deal.hand_size;
        if hand_size < toml_cfg.deal.registers {
            eprintln!(
                "Warning: deal.hand_size {} is below deal.registers {}; raising it.",
                hand_size, toml_cfg.deal.registers
            );
            hand_size = toml_cfg.deal.registers;
        }

        // Resolve the boards directory
        let boards_dir_str = &toml_cfg.boards.dir;
        let boards_dir = if PathBuf::from(boards_dir_str).is_absolute() {
            PathBuf::from(boards_dir_str)
        } else {
            // Search candidate dirs for the boards folder
            search_dirs
                .iter()
                .map(|d| d.join(boards_dir_str))
                .find(|p| p.is_dir())
                .unwrap_or_else(|| PathBuf::from(boards_dir_str))
        };

        GameConfig {
            deal: DealConfig {
                hand_size,
                registers: toml_cfg.deal.registers,
            },
            pace: PaceConfig {
                tick_rate_ms: toml_cfg.pace.tick_rate_ms,
                card_delay_ticks: toml_cfg.pace.card_delay_ticks,
                belt_delay_ticks: toml_cfg.pace.belt_delay_ticks,
            },
            boards_dir,
            free_drive: toml_cfg.game.free_drive,
        }
    }
}

/// Directories searched for `botrally.toml` and the boards folder, in
/// priority order: the BOTRALLY_DATA override, the executable's
/// directory (symlinks resolved), the working directory, the XDG data
/// home, and the system share directory. Duplicates are dropped.
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = Vec::new();
    fn add(p: PathBuf, dirs: &mut Vec<PathBuf>) {
        if p.is_dir() && !dirs.contains(&p) {
            dirs.push(p);
        }
    }

    if let Ok(data) = std::env::var("BOTRALLY_DATA") {
        add(PathBuf::from(data), &mut dirs);
    }
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            add(parent.to_path_buf(), &mut dirs);
        }
    }
    if let Ok(cwd) = std::env::current_dir() {
        add(cwd, &mut dirs);
    }
    if let Ok(home) = std::env::var("HOME") {
        add(PathBuf::from(home).join(".local/share/botrally"), &mut dirs);
    }
    add(PathBuf::from("/usr/share/botrally"), &mut dirs);

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }
    dirs
}

/// First readable, parsable `botrally.toml` among the candidates;
/// defaults otherwise. Parse errors warn and fall back rather than
/// aborting the game.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("botrally.toml");
        if !path.exists() {
            continue;
        }
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                eprintln!("Warning: could not read {}: {e}", path.display());
                continue;
            }
        };
        match toml::from_str::<TomlConfig>(&text) {
            Ok(cfg) => return cfg,
            Err(e) => {
                eprintln!("Warning: botrally.toml parse error: {e}");
                eprintln!("Using default settings.");
                return TomlConfig::default();
            }
        }
    }
    TomlConfig::default()
}
