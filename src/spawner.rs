//! Wave composition and formation layout.
//!
//! A wave is a batch of enemies laid out by one [`Formation`].  Layouts are
//! expressed as [`Slot`]s (column within a row span, fractional row) and
//! turned into playfield positions by [`spawn_enemy`].

use rand::Rng;

use crate::constants::{
    DIVE_ENABLE_CHANCE, ENEMY_SIZE, FIELD_WIDTH, FORMATION_MARGIN, FORMATION_ROW_SPACING,
    FORMATION_TOP, TANK_SIZE,
};
use crate::difficulty::DifficultyConfig;
use crate::entities::{Enemy, EnemyKind};

/// Widest single row a formation will lay out.
const MAX_COLUMNS: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Formation {
    Linear,
    VShape,
    Arc,
    Zigzag,
    Diamond,
    Random,
}

impl Formation {
    /// In unlock order.
    pub const ALL: &'static [Formation] = &[
        Formation::Linear,
        Formation::VShape,
        Formation::Arc,
        Formation::Zigzag,
        Formation::Diamond,
        Formation::Random,
    ];
}

/// Position of one enemy within a formation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Slot {
    /// Column index, may be fractional.
    pub column: f32,
    /// Number of columns the row spans; x is interpolated across it.
    pub columns: usize,
    /// Row offset below the top formation row, may be fractional.
    pub row: f32,
}

/// A freshly spawned wave.
#[derive(Clone, Debug)]
pub struct Wave {
    pub index: u32,
    pub formation: Formation,
    pub enemies: Vec<Enemy>,
}

/// Pick the formation for wave `wave` of the level.
///
/// The very first wave of level 1 is always linear.  Otherwise a random
/// unlocked formation is chosen, avoiding `previous` when there is any
/// other choice.
pub fn choose_formation(
    difficulty: &DifficultyConfig,
    wave: u32,
    previous: Option<Formation>,
    rng: &mut impl Rng,
) -> Formation {
    if difficulty.level == 1 && wave == 0 {
        return Formation::Linear;
    }
    let unlocked = difficulty.unlocked_formations();
    let candidates: Vec<Formation> = unlocked
        .iter()
        .copied()
        .filter(|f| unlocked.len() == 1 || Some(*f) != previous)
        .collect();
    candidates[rng.gen_range(0..candidates.len())]
}

/// Lay out `count` enemies.  Everything but [`Formation::Random`] is
/// deterministic.
pub fn layout(formation: Formation, count: usize, rng: &mut impl Rng) -> Vec<Slot> {
    if count == 0 {
        return Vec::new();
    }
    match formation {
        Formation::Linear => linear(count),
        Formation::VShape => {
            let center = (count - 1) as f32 / 2.0;
            (0..count)
                .map(|i| Slot {
                    column: i as f32,
                    columns: count,
                    row: (center - (i as f32 - center).abs()) * 0.5,
                })
                .collect()
        }
        Formation::Arc => (0..count)
            .map(|i| {
                let t = if count > 1 {
                    i as f32 / (count - 1) as f32
                } else {
                    0.5
                };
                Slot {
                    column: i as f32,
                    columns: count,
                    row: ((t * std::f32::consts::PI).sin() * 2.0).max(0.0),
                }
            })
            .collect(),
        Formation::Zigzag => (0..count)
            .map(|i| Slot {
                column: i as f32,
                columns: count,
                row: (i % 2) as f32,
            })
            .collect(),
        Formation::Diamond => diamond(count),
        Formation::Random => {
            let columns = count.min(MAX_COLUMNS);
            (0..count)
                .map(|_| Slot {
                    column: rng.gen_range(0.0..=(columns - 1) as f32),
                    columns,
                    row: rng.gen_range(0.0f32..3.0),
                })
                .collect()
        }
    }
}

/// Rows of up to [`MAX_COLUMNS`], each row centred on the widest one.
fn linear(count: usize) -> Vec<Slot> {
    let columns = count.min(MAX_COLUMNS);
    (0..count)
        .map(|i| {
            let row = i / columns;
            let in_row = (count - row * columns).min(columns);
            let offset = (columns - in_row) as f32 / 2.0;
            Slot {
                column: offset + (i % columns) as f32,
                columns,
                row: row as f32,
            }
        })
        .collect()
}

/// Concentric rows widening by one up to a peak and narrowing again.
fn diamond(count: usize) -> Vec<Slot> {
    let mut widths = Vec::new();
    let mut remaining = count;
    let mut width = 1;
    let mut growing = true;
    while remaining > 0 {
        let take = width.min(remaining);
        widths.push(take);
        remaining -= take;
        // Peak once the rest would not fill a mirrored lower half.
        if growing && remaining <= width * (width + 1) / 2 {
            growing = false;
        }
        width = if growing { width + 1 } else { width.saturating_sub(1).max(1) };
    }

    let span = widths.iter().copied().max().unwrap_or(1);
    widths
        .iter()
        .enumerate()
        .flat_map(|(row, &w)| {
            let offset = (span - w) as f32 / 2.0;
            (0..w).map(move |j| Slot {
                column: offset + j as f32,
                columns: span,
                row: row as f32,
            })
        })
        .collect()
}

/// Roll an enemy kind against the level's cumulative type chances.
pub fn roll_kind(difficulty: &DifficultyConfig, rng: &mut impl Rng) -> EnemyKind {
    let roll: f64 = rng.gen();
    let shooter = difficulty.shooter_chance;
    let tank = shooter + difficulty.tank_chance;
    let fast = tank + difficulty.fast_chance;
    if roll < shooter {
        EnemyKind::Shooter
    } else if roll < tank {
        EnemyKind::Tank
    } else if roll < fast {
        EnemyKind::Fast
    } else {
        EnemyKind::Basic
    }
}

/// Create the enemy for one slot.  `x` is interpolated across the playfield
/// width; a one-column row is centred.
pub fn spawn_enemy(slot: Slot, difficulty: &DifficultyConfig, rng: &mut impl Rng) -> Enemy {
    let kind = roll_kind(difficulty, rng);
    let size = if kind == EnemyKind::Tank { TANK_SIZE } else { ENEMY_SIZE };
    let left = FORMATION_MARGIN;
    let span = FIELD_WIDTH - 2.0 * FORMATION_MARGIN - size;

    let t = if slot.columns > 1 {
        (slot.column / (slot.columns - 1) as f32).clamp(0.0, 1.0)
    } else {
        0.5
    };
    let x = left + t * span;
    let y = FORMATION_TOP + slot.row * FORMATION_ROW_SPACING;

    let can_dive = difficulty.diving_enabled && rng.gen_bool(DIVE_ENABLE_CHANCE);
    Enemy::new(kind, x, y, difficulty, can_dive)
}

/// Build wave `wave` of the level, or `None` once every wave has spawned.
pub fn spawn_wave(
    difficulty: &DifficultyConfig,
    wave: u32,
    previous: Option<Formation>,
    rng: &mut impl Rng,
) -> Option<Wave> {
    if wave >= difficulty.max_waves {
        return None;
    }
    let formation = choose_formation(difficulty, wave, previous, rng);
    let count = difficulty.wave_size(wave) as usize;
    let enemies = layout(formation, count, rng)
        .into_iter()
        .map(|slot| spawn_enemy(slot, difficulty, rng))
        .collect();
    Some(Wave {
        index: wave,
        formation,
        enemies,
    })
}
