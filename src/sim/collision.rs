//! Per-tick interception and damage resolution
//!
//! Three passes in a fixed order. Interceptions run first so a player shot
//! that neutralizes an enemy shot can never also damage the enemy in the
//! same tick. The resolver only flips entity flags and drives the enemy;
//! score and lives are applied by the caller from the returned report.

use glam::Vec2;

use super::enemy::Enemy;
use super::entities::{EnemyShot, EntityList, PlayerShot};
use crate::consts::*;
use crate::within_radius;

/// A player shot landing on the enemy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyHit {
    pub pos: Vec2,
    pub lethal: bool,
}

/// What happened during one resolution
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionReport {
    /// Positions of neutralized enemy shots, one per player/enemy pair
    pub interceptions: Vec<Vec2>,
    pub hits: Vec<EnemyHit>,
    /// Enemy crossed the contact boundary this tick
    pub breakthrough: bool,
}

/// Interception radius for the current projectile speed.
///
/// Faster shots move further per tick, so the radius grows with speed to
/// keep opposing shots from skipping past each other between samples.
pub fn interception_radius(projectile_speed: f32) -> f32 {
    let boost = 1.0 + 0.5 * (projectile_speed - 1.0).max(0.0);
    (INTERCEPT_RADIUS * boost).min(INTERCEPT_RADIUS_MAX)
}

/// Run the three collision passes
pub fn resolve(
    player_shots: &mut EntityList<PlayerShot>,
    enemy_shots: &mut EntityList<EnemyShot>,
    enemy: Option<&mut Enemy>,
    intercept_radius: f32,
) -> CollisionReport {
    let mut report = CollisionReport::default();

    // Pass 1: shot vs shot
    for shot in player_shots.iter_mut() {
        if !shot.alive {
            continue;
        }
        if let Some(target) = enemy_shots
            .iter_mut()
            .find(|e| e.alive && within_radius(shot.pos, e.pos, intercept_radius))
        {
            shot.alive = false;
            target.alive = false;
            report.interceptions.push(target.pos);
        }
    }

    let Some(enemy) = enemy else {
        return report;
    };

    // Pass 2: surviving player shots vs enemy
    for shot in player_shots.iter_mut() {
        if !enemy.is_active() {
            break;
        }
        if !shot.alive || !within_radius(shot.pos, enemy.pos, ENEMY_HIT_RADIUS) {
            continue;
        }
        shot.alive = false;
        let lethal = enemy.take_damage();
        report.hits.push(EnemyHit { pos: shot.pos, lethal });
    }

    // Pass 3: breakthrough, regardless of remaining health
    if enemy.is_active() && enemy.reached_contact() {
        enemy.die();
        report.breakthrough = true;
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::enemy::EnemyVariant;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn enemy_with_hp(hp: u32) -> Enemy {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut e = Enemy::spawn(1, 0, &mut rng);
        e.hp = hp;
        e.max_hp = hp;
        e.pos = Vec2::new(500.0, 220.0);
        e
    }

    fn player_shot_at(pos: Vec2) -> PlayerShot {
        let mut s = PlayerShot::new(pos + Vec2::X, 440.0);
        s.pos = pos;
        s
    }

    fn enemy_shot_at(pos: Vec2) -> EnemyShot {
        let mut s = EnemyShot::new(pos, EnemyVariant::GrumpyBlob, 1.0);
        s.pos = pos;
        s
    }

    #[test]
    fn test_interception_blocks_damage_same_tick() {
        let mut enemy = enemy_with_hp(3);
        let mut players = EntityList::new();
        let mut enemies = EntityList::new();
        // Both shots sit inside the enemy hit radius too
        players.push(player_shot_at(enemy.pos - Vec2::new(10.0, 0.0)));
        enemies.push(enemy_shot_at(enemy.pos - Vec2::new(20.0, 0.0)));

        let report = resolve(&mut players, &mut enemies, Some(&mut enemy), 35.0);
        assert_eq!(report.interceptions.len(), 1);
        assert!(report.hits.is_empty());
        assert_eq!(enemy.hp, 3);
        assert_eq!(players.live_count(), 0);
        assert_eq!(enemies.live_count(), 0);
    }

    #[test]
    fn test_first_match_wins() {
        let mut players = EntityList::new();
        let mut enemies = EntityList::new();
        players.push(player_shot_at(Vec2::new(400.0, 100.0)));
        enemies.push(enemy_shot_at(Vec2::new(405.0, 100.0)));
        enemies.push(enemy_shot_at(Vec2::new(410.0, 100.0)));

        let report = resolve(&mut players, &mut enemies, None, 35.0);
        assert_eq!(report.interceptions.len(), 1);
        assert_eq!(enemies.live_count(), 1);
    }

    #[test]
    fn test_each_pair_counts_once() {
        let mut players = EntityList::new();
        let mut enemies = EntityList::new();
        players.push(player_shot_at(Vec2::new(400.0, 100.0)));
        players.push(player_shot_at(Vec2::new(402.0, 100.0)));
        enemies.push(enemy_shot_at(Vec2::new(405.0, 100.0)));

        let report = resolve(&mut players, &mut enemies, None, 35.0);
        assert_eq!(report.interceptions.len(), 1);
        assert_eq!(players.live_count(), 1);

        let again = resolve(&mut players, &mut enemies, None, 35.0);
        assert!(again.interceptions.is_empty());
    }

    #[test]
    fn test_hits_until_lethal_then_stop() {
        let mut enemy = enemy_with_hp(2);
        let mut players = EntityList::new();
        let mut enemies: EntityList<EnemyShot> = EntityList::new();
        for _ in 0..3 {
            players.push(player_shot_at(enemy.pos));
        }

        let report = resolve(&mut players, &mut enemies, Some(&mut enemy), 35.0);
        assert_eq!(report.hits.len(), 2);
        assert!(!report.hits[0].lethal);
        assert!(report.hits[1].lethal);
        assert!(enemy.is_dying());
        assert_eq!(enemy.hp, 0);
        // Third shot is left alone
        assert_eq!(players.live_count(), 1);
    }

    #[test]
    fn test_dying_enemy_takes_no_damage() {
        let mut enemy = enemy_with_hp(2);
        enemy.die();
        let mut players = EntityList::new();
        let mut enemies: EntityList<EnemyShot> = EntityList::new();
        players.push(player_shot_at(enemy.pos));

        let report = resolve(&mut players, &mut enemies, Some(&mut enemy), 35.0);
        assert!(report.hits.is_empty());
        assert_eq!(enemy.hp, 2);
        assert_eq!(players.live_count(), 1);
    }

    #[test]
    fn test_breakthrough_at_full_health() {
        let mut enemy = enemy_with_hp(3);
        enemy.pos.x = CONTACT_X - 1.0;
        let mut players: EntityList<PlayerShot> = EntityList::new();
        let mut enemies: EntityList<EnemyShot> = EntityList::new();

        let report = resolve(&mut players, &mut enemies, Some(&mut enemy), 35.0);
        assert!(report.breakthrough);
        assert!(enemy.is_dying());
        assert_eq!(enemy.hp, 3);

        // Already dying: no second breakthrough
        let report = resolve(&mut players, &mut enemies, Some(&mut enemy), 35.0);
        assert!(!report.breakthrough);
    }

    #[test]
    fn test_interception_radius_grows_and_caps() {
        assert_eq!(interception_radius(1.0), INTERCEPT_RADIUS);
        assert_eq!(interception_radius(0.5), INTERCEPT_RADIUS);
        assert!(interception_radius(1.3) > INTERCEPT_RADIUS);
        assert_eq!(interception_radius(10.0), INTERCEPT_RADIUS_MAX);
    }
}
