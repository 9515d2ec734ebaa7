use space_shooter::constants::*;
use space_shooter::difficulty::DifficultyConfig;
use space_shooter::entities::{EnemyKind, Entity};
use space_shooter::spawner::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

// ── Waves ─────────────────────────────────────────────────────────────────────

#[test]
fn level_one_first_wave() {
    let mut rng = seeded_rng();
    let d = DifficultyConfig::for_level(1);
    let wave = spawn_wave(&d, 0, None, &mut rng).unwrap();

    assert_eq!(wave.formation, Formation::Linear);
    assert_eq!(wave.enemies.len(), 5);
    assert!(wave.enemies.iter().all(|e| e.kind == EnemyKind::Basic));
    assert!(wave.enemies.iter().all(|e| !e.can_dive));
    // One row, all at the same height
    assert!(wave.enemies.iter().all(|e| e.slot_y == FORMATION_TOP));
}

#[test]
fn no_wave_past_max() {
    let mut rng = seeded_rng();
    let d = DifficultyConfig::for_level(4);
    assert!(spawn_wave(&d, d.max_waves - 1, None, &mut rng).is_some());
    assert!(spawn_wave(&d, d.max_waves, None, &mut rng).is_none());
    assert!(spawn_wave(&d, d.max_waves + 5, None, &mut rng).is_none());
}

#[test]
fn wave_size_follows_difficulty() {
    let mut rng = seeded_rng();
    let d = DifficultyConfig::for_level(9);
    for wave in 0..d.max_waves {
        let spawned = spawn_wave(&d, wave, None, &mut rng).unwrap();
        assert_eq!(spawned.enemies.len() as u32, d.wave_size(wave));
        assert_eq!(spawned.index, wave);
    }
}

#[test]
fn high_level_mixes_kinds() {
    let mut rng = seeded_rng();
    let d = DifficultyConfig::for_level(12);
    let mut seen = std::collections::HashSet::new();
    for _ in 0..20 {
        for e in spawn_wave(&d, 0, None, &mut rng).unwrap().enemies {
            seen.insert(e.kind);
        }
    }
    assert_eq!(seen.len(), 4);
}

#[test]
fn level_one_rolls_only_basic() {
    let mut rng = seeded_rng();
    let d = DifficultyConfig::for_level(1);
    for _ in 0..500 {
        assert_eq!(roll_kind(&d, &mut rng), EnemyKind::Basic);
    }
}

// ── Formation choice ──────────────────────────────────────────────────────────

#[test]
fn first_wave_of_level_one_always_linear() {
    let d = DifficultyConfig::for_level(1);
    for seed in 0..50 {
        let mut rng = StdRng::seed_from_u64(seed);
        assert_eq!(
            choose_formation(&d, 0, Some(Formation::Linear), &mut rng),
            Formation::Linear
        );
    }
}

#[test]
fn choice_avoids_previous() {
    let mut rng = seeded_rng();
    let d = DifficultyConfig::for_level(10);
    for _ in 0..200 {
        let f = choose_formation(&d, 1, Some(Formation::Arc), &mut rng);
        assert_ne!(f, Formation::Arc);
        assert!(d.unlocked_formations().contains(&f));
    }
}

#[test]
fn choice_stays_within_unlocked() {
    let mut rng = seeded_rng();
    let d = DifficultyConfig::for_level(2);
    for _ in 0..200 {
        let f = choose_formation(&d, 0, None, &mut rng);
        assert!(d.unlocked_formations().contains(&f));
    }
    // With two unlocked and one excluded, the other is forced
    let d = DifficultyConfig::for_level(1);
    assert_eq!(
        choose_formation(&d, 1, Some(Formation::Linear), &mut rng),
        Formation::VShape
    );
}

// ── Layouts ───────────────────────────────────────────────────────────────────

#[test]
fn every_layout_places_every_enemy() {
    let mut rng = seeded_rng();
    for &formation in Formation::ALL {
        for count in 0..=20 {
            let slots = layout(formation, count, &mut rng);
            assert_eq!(slots.len(), count, "{formation:?} x{count}");
            for slot in slots {
                assert!(slot.column.is_finite() && slot.row.is_finite());
                assert!(slot.column >= 0.0 && slot.row >= 0.0);
            }
        }
    }
}

#[test]
fn spawned_enemies_inside_field() {
    let mut rng = seeded_rng();
    let d = DifficultyConfig::for_level(12);
    for &formation in Formation::ALL {
        for count in [1, 2, 5, 9, 16] {
            for slot in layout(formation, count, &mut rng) {
                let e = spawn_enemy(slot, &d, &mut rng);
                assert!(e.slot_x >= FORMATION_MARGIN, "{formation:?}");
                assert!(
                    e.bounds().right() <= FIELD_WIDTH - FORMATION_MARGIN + 0.01,
                    "{formation:?}"
                );
                assert!(e.slot_y >= FORMATION_TOP && e.slot_y <= FORMATION_FLOOR);
            }
        }
    }
}

#[test]
fn single_enemy_is_centred() {
    let mut rng = seeded_rng();
    let d = DifficultyConfig::for_level(1);
    for &formation in &[Formation::Linear, Formation::VShape, Formation::Arc, Formation::Diamond] {
        let slots = layout(formation, 1, &mut rng);
        let e = spawn_enemy(slots[0], &d, &mut rng);
        let (cx, _) = e.bounds().center();
        assert!((cx - FIELD_WIDTH / 2.0).abs() < 0.01, "{formation:?}: {cx}");
    }
}

#[test]
fn linear_wraps_into_rows() {
    let mut rng = seeded_rng();
    let slots = layout(Formation::Linear, 12, &mut rng);
    assert!(slots[..8].iter().all(|s| s.row == 0.0));
    assert!(slots[8..].iter().all(|s| s.row == 1.0));
    // Short last row is centred under the first
    assert_eq!(slots[8].column, 2.0);
}

#[test]
fn v_shape_is_symmetric() {
    let mut rng = seeded_rng();
    let slots = layout(Formation::VShape, 7, &mut rng);
    for i in 0..7 {
        assert_eq!(slots[i].row, slots[6 - i].row);
    }
    assert!(slots[3].row > slots[0].row);
}

#[test]
fn arc_peaks_in_the_middle() {
    let mut rng = seeded_rng();
    let slots = layout(Formation::Arc, 5, &mut rng);
    assert!(slots[0].row.abs() < 1e-6);
    assert!((slots[2].row - 2.0).abs() < 1e-6);
    assert!(slots[1].row < slots[2].row);
}

#[test]
fn zigzag_alternates_rows() {
    let mut rng = seeded_rng();
    let rows: Vec<f32> = layout(Formation::Zigzag, 6, &mut rng)
        .iter()
        .map(|s| s.row)
        .collect();
    assert_eq!(rows, vec![0.0, 1.0, 0.0, 1.0, 0.0, 1.0]);
}

#[test]
fn diamond_widens_then_narrows() {
    let mut rng = seeded_rng();
    let slots = layout(Formation::Diamond, 9, &mut rng);
    let mut per_row = vec![0; 5];
    for s in &slots {
        per_row[s.row as usize] += 1;
    }
    assert_eq!(per_row, vec![1, 2, 3, 2, 1]);
}
