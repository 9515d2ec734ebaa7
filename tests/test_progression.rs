use space_shooter::constants::*;
use space_shooter::entities::{Enemy, EnemyKind};
use space_shooter::difficulty::DifficultyConfig;
use space_shooter::progression::*;
use space_shooter::spawner::Formation;
use space_shooter::timers::{Scheduler, TimerKind};

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn started() -> LevelProgression {
    let mut p = LevelProgression::new(ProgressionTiming::default());
    p.start(0);
    p
}

fn count_cleared(events: &[ProgressEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, ProgressEvent::LevelCleared { .. }))
        .count()
}

/// Level 1 with its single wave spawned at 1000 ms and then wiped out.
fn cleared_level_one(rng: &mut StdRng) -> (LevelProgression, Vec<Enemy>) {
    let mut p = started();
    let mut enemies = Vec::new();
    p.fire_due_timers(FIRST_WAVE_DELAY_MS, &mut enemies, rng);
    assert_eq!(enemies.len(), 5);
    enemies.clear();
    (p, enemies)
}

// ── Scheduler ─────────────────────────────────────────────────────────────────

#[test]
fn scheduler_arm_replaces() {
    let mut s = Scheduler::new();
    s.arm(TimerKind::NextWave, 0, 100);
    s.arm(TimerKind::NextWave, 0, 500);
    assert_eq!(s.pending(), 1);
    assert_eq!(s.deadline(TimerKind::NextWave), Some(500));
    assert_eq!(s.pop_due(100), None);
    assert_eq!(s.pop_due(500), Some(TimerKind::NextWave));
    assert_eq!(s.pop_due(10_000), None); // one-shot
}

#[test]
fn scheduler_pops_earliest_first() {
    let mut s = Scheduler::new();
    s.arm(TimerKind::LevelAdvance, 0, 300);
    s.arm(TimerKind::GraceExpiry, 0, 100);
    s.arm(TimerKind::SafetyPoll, 0, 100);
    assert_eq!(s.pop_due(1_000), Some(TimerKind::GraceExpiry));
    assert_eq!(s.pop_due(1_000), Some(TimerKind::SafetyPoll));
    assert_eq!(s.pop_due(1_000), Some(TimerKind::LevelAdvance));
    assert_eq!(s.pop_due(1_000), None);
}

#[test]
fn scheduler_cancel() {
    let mut s = Scheduler::new();
    s.arm(TimerKind::ConfirmCompletion, 0, 10);
    assert!(s.cancel(TimerKind::ConfirmCompletion));
    assert!(!s.cancel(TimerKind::ConfirmCompletion));
    assert_eq!(s.pop_due(100), None);

    s.arm(TimerKind::NextWave, 0, 10);
    s.arm(TimerKind::SafetyPoll, 0, 10);
    s.cancel_all();
    assert_eq!(s.pending(), 0);
}

// ── Start ─────────────────────────────────────────────────────────────────────

#[test]
fn start_schedules_first_wave() {
    let p = started();
    assert_eq!(p.level(), 1);
    assert_eq!(p.phase(), Phase::Active);
    assert_eq!(p.waves_spawned(), 0);
    assert!(p.is_just_started());
    assert_eq!(
        p.timers().deadline(TimerKind::NextWave),
        Some(FIRST_WAVE_DELAY_MS)
    );
    assert_eq!(
        p.timers().deadline(TimerKind::GraceExpiry),
        Some(GRACE_WINDOW_MS)
    );
}

#[test]
fn first_wave_is_linear_basics() {
    let mut rng = seeded_rng();
    let mut p = started();
    let mut enemies = Vec::new();

    assert!(p.fire_due_timers(FIRST_WAVE_DELAY_MS - 1, &mut enemies, &mut rng).is_empty());
    let events = p.fire_due_timers(FIRST_WAVE_DELAY_MS, &mut enemies, &mut rng);
    assert_eq!(
        events,
        vec![ProgressEvent::WaveSpawned {
            level: 1,
            wave: 0,
            formation: Formation::Linear,
            enemies: 5,
        }]
    );
    assert!(enemies.iter().all(|e| e.kind == EnemyKind::Basic));
    assert_eq!(p.waves_spawned(), 1);
    assert!(!p.timers().is_armed(TimerKind::NextWave));
    assert!(p.timers().is_armed(TimerKind::CompletionFallback));
}

#[test]
fn restart_drops_old_timers() {
    let mut rng = seeded_rng();
    let (mut p, mut enemies) = cleared_level_one(&mut rng);
    p.fire_due_timers(GRACE_WINDOW_MS, &mut enemies, &mut rng);
    assert_eq!(p.phase(), Phase::Completing);

    p.start(10_000);
    assert_eq!(p.phase(), Phase::Active);
    assert!(!p.timers().is_armed(TimerKind::ConfirmCompletion));
    assert!(!p.timers().is_armed(TimerKind::CompletionFallback));
    assert_eq!(
        p.timers().deadline(TimerKind::NextWave),
        Some(10_000 + FIRST_WAVE_DELAY_MS)
    );
}

// ── Completion guards ─────────────────────────────────────────────────────────

#[test]
fn empty_field_before_first_wave_is_not_cleared() {
    let mut p = started();
    assert!(!p.is_level_cleared(0));
    assert!(!p.check_completion(500, 0));
}

#[test]
fn grace_window_suppresses_completion() {
    let mut rng = seeded_rng();
    let (mut p, _) = cleared_level_one(&mut rng);
    assert!(p.is_just_started());
    assert!(!p.check_completion(GRACE_WINDOW_MS - 1, 0));
    assert_eq!(p.phase(), Phase::Active);
}

#[test]
fn enemies_alive_is_not_cleared() {
    let mut rng = seeded_rng();
    let (mut p, mut enemies) = cleared_level_one(&mut rng);
    enemies.push(Enemy::new(
        EnemyKind::Basic,
        100.0,
        100.0,
        &DifficultyConfig::for_level(1),
        false,
    ));
    p.fire_due_timers(GRACE_WINDOW_MS, &mut enemies, &mut rng);
    assert!(!p.is_just_started());
    assert!(!p.is_level_cleared(enemies.len()));
    assert_eq!(p.phase(), Phase::Active);
}

#[test]
fn grace_expiry_prompts_completion() {
    let mut rng = seeded_rng();
    let (mut p, mut enemies) = cleared_level_one(&mut rng);
    let events = p.fire_due_timers(GRACE_WINDOW_MS, &mut enemies, &mut rng);
    assert!(events.is_empty());
    assert_eq!(p.phase(), Phase::Completing);
    assert_eq!(
        p.timers().deadline(TimerKind::ConfirmCompletion),
        Some(GRACE_WINDOW_MS + COMPLETION_CONFIRM_MS)
    );
}

// ── Completion and advance ────────────────────────────────────────────────────

#[test]
fn completion_fires_once_under_repeated_polling() {
    let mut rng = seeded_rng();
    let (mut p, mut enemies) = cleared_level_one(&mut rng);
    let mut events = Vec::new();

    let mut now = GRACE_WINDOW_MS;
    while now <= 10_000 {
        events.extend(p.fire_due_timers(now, &mut enemies, &mut rng));
        for _ in 0..3 {
            p.check_completion(now, enemies.len());
        }
        now += 16;
    }

    assert_eq!(count_cleared(&events), 1);
    assert_eq!(p.level(), 2);
}

#[test]
fn confirmation_then_advance() {
    let mut rng = seeded_rng();
    let (mut p, mut enemies) = cleared_level_one(&mut rng);
    p.fire_due_timers(GRACE_WINDOW_MS, &mut enemies, &mut rng);

    let confirm_at = GRACE_WINDOW_MS + COMPLETION_CONFIRM_MS;
    let events = p.fire_due_timers(confirm_at, &mut enemies, &mut rng);
    assert_eq!(events, vec![ProgressEvent::LevelCleared { level: 1 }]);
    assert_eq!(p.phase(), Phase::Advancing);
    assert!(p.is_victory_in_progress());
    assert_eq!(p.timers().pending(), 1);
    assert!(!p.check_completion(confirm_at, 0));

    let advance_at = confirm_at + LEVEL_ADVANCE_DELAY_MS;
    assert!(p
        .fire_due_timers(advance_at - 1, &mut enemies, &mut rng)
        .is_empty());
    let events = p.fire_due_timers(advance_at, &mut enemies, &mut rng);
    assert_eq!(events[0], ProgressEvent::LevelStarted { level: 2 });
    assert!(matches!(
        events[1],
        ProgressEvent::WaveSpawned { level: 2, wave: 0, .. }
    ));
    assert_eq!(p.level(), 2);
    assert_eq!(p.difficulty().level, 2);
    assert_eq!(p.waves_spawned(), 1);
    assert_eq!(p.phase(), Phase::Active);
    assert!(!p.is_victory_in_progress());
    assert!(p.is_just_started());
    assert_eq!(enemies.len(), DifficultyConfig::for_level(2).wave_size(0) as usize);
    // Level 2 has a second wave
    assert!(p.timers().is_armed(TimerKind::NextWave));
}

#[test]
fn confirmation_revalidates() {
    let mut rng = seeded_rng();
    let (mut p, mut enemies) = cleared_level_one(&mut rng);
    p.fire_due_timers(GRACE_WINDOW_MS, &mut enemies, &mut rng);
    assert_eq!(p.phase(), Phase::Completing);

    enemies.push(Enemy::new(
        EnemyKind::Basic,
        100.0,
        100.0,
        &DifficultyConfig::for_level(1),
        false,
    ));
    let events = p.fire_due_timers(GRACE_WINDOW_MS + COMPLETION_CONFIRM_MS, &mut enemies, &mut rng);
    assert!(events.is_empty());
    assert_eq!(p.phase(), Phase::Active);
    assert_eq!(p.level(), 1);
}

#[test]
fn second_wave_spawns_after_delay() {
    let mut rng = seeded_rng();
    let mut p = started();
    let mut enemies = Vec::new();
    let mut now = 0;
    // Run level 1 through to level 2
    while p.level() == 1 {
        now += 16;
        p.fire_due_timers(now, &mut enemies, &mut rng);
        enemies.clear();
        p.check_completion(now, 0);
        assert!(now < 20_000);
    }
    let started_at = now;
    let delay = p.difficulty().wave_delay_ms;
    assert_eq!(p.waves_spawned(), 1);

    while p.waves_spawned() < 2 {
        now += 16;
        p.fire_due_timers(now, &mut enemies, &mut rng);
        assert!(now < started_at + 10_000);
    }
    assert!(now >= started_at + delay);
    assert!(now < started_at + delay + 16);
    assert!(p.timers().is_armed(TimerKind::CompletionFallback));
}

#[test]
fn formations_do_not_repeat_back_to_back() {
    let mut rng = seeded_rng();
    let mut p = started();
    let mut enemies = Vec::new();
    let mut previous: Option<Formation> = None;
    let mut now = 0;

    while p.level() < 8 {
        now += 16;
        for event in p.fire_due_timers(now, &mut enemies, &mut rng) {
            if let ProgressEvent::WaveSpawned { formation, wave, .. } = event {
                if wave > 0 {
                    assert_ne!(Some(formation), previous);
                }
                previous = Some(formation);
            }
        }
        enemies.clear();
        p.check_completion(now, 0);
        assert!(now < 600_000);
    }
}

// ── Game over ─────────────────────────────────────────────────────────────────

#[test]
fn game_over_halts_everything() {
    let mut rng = seeded_rng();
    let mut p = started();
    let mut enemies = Vec::new();
    p.enter_game_over();

    assert_eq!(p.phase(), Phase::GameOver);
    assert_eq!(p.timers().pending(), 0);
    assert!(p.fire_due_timers(60_000, &mut enemies, &mut rng).is_empty());
    assert!(enemies.is_empty());
    assert!(!p.check_completion(60_000, 0));
    assert!(p.spawn_next_wave(60_000, &mut enemies, &mut rng).is_none());
}
