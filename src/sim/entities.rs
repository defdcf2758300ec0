//! Transient entity collections
//!
//! Player shots, enemy shots, particles and floating text all share one
//! lifecycle contract: they update once per tick and are pruned as soon as
//! `is_expired` reports true. `EntityList` is the generic harness that steps
//! and prunes any of them.

use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::enemy::EnemyVariant;
use crate::consts::*;
use crate::within_radius;

/// Something a transient entity reports back to the game loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntityEvent {
    /// An enemy shot reached the defender
    HitDefender { pos: Vec2 },
}

/// Shared state handed to entity updates
pub struct UpdateCtx<'a> {
    pub rng: &'a mut Pcg32,
    /// Particles spawned during the update, appended after the step
    pub spawned: &'a mut Vec<Particle>,
}

/// Lifecycle contract for every transient entity
pub trait Transient {
    fn update(&mut self, ctx: &mut UpdateCtx<'_>) -> Option<EntityEvent>;
    fn is_expired(&self) -> bool;
}

/// Homogeneous container with reverse-order step/prune
#[derive(Debug, Clone)]
pub struct EntityList<T> {
    items: Vec<T>,
}

impl<T> Default for EntityList<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Transient> EntityList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    /// Number of entities not yet expired
    pub fn live_count(&self) -> usize {
        self.items.iter().filter(|e| !e.is_expired()).count()
    }

    /// Update every entity and drop the expired ones.
    ///
    /// Walks indices from the back so removal never skips an element.
    /// Entities already expired before the step are dropped without updating.
    pub fn step(&mut self, ctx: &mut UpdateCtx<'_>) -> Vec<EntityEvent> {
        let mut events = Vec::new();
        for i in (0..self.items.len()).rev() {
            if self.items[i].is_expired() {
                self.items.remove(i);
                continue;
            }
            if let Some(event) = self.items[i].update(ctx) {
                events.push(event);
            }
            if self.items[i].is_expired() {
                self.items.remove(i);
            }
        }
        events
    }
}

impl<'a, T> IntoIterator for &'a EntityList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Bounded position history, oldest first
#[derive(Debug, Clone)]
pub struct Trail {
    points: VecDeque<Vec2>,
    capacity: usize,
}

impl Trail {
    pub fn new(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn record(&mut self, pos: Vec2) {
        self.points.push_back(pos);
        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.points.iter().copied()
    }
}

/// Shot fired by a correct answer, homing on where the enemy stood
#[derive(Debug, Clone)]
pub struct PlayerShot {
    pub pos: Vec2,
    pub vel: Vec2,
    pub alive: bool,
    pub age: u32,
    pub trail: Trail,
    /// Pitch of the answered note, tints the shot
    pub frequency: f32,
}

impl PlayerShot {
    pub fn new(target: Vec2, frequency: f32) -> Self {
        let pos = Vec2::new(PLAYER_SHOT_ORIGIN_X, DEFENDER_Y);
        let dir = (target - pos).try_normalize().unwrap_or(Vec2::X);
        Self {
            pos,
            vel: dir * PLAYER_SHOT_SPEED,
            alive: true,
            age: 0,
            trail: Trail::new(PLAYER_SHOT_TRAIL),
            frequency,
        }
    }

    /// Hue derived from pitch (higher notes shift toward violet)
    pub fn hue(&self) -> f32 {
        200.0 + (self.frequency - 261.0) / 4.0
    }
}

impl Transient for PlayerShot {
    fn update(&mut self, ctx: &mut UpdateCtx<'_>) -> Option<EntityEvent> {
        self.age += 1;
        self.trail.record(self.pos);
        self.pos += self.vel;
        if self.pos.x > FIELD_WIDTH + 50.0 || self.pos.x < -50.0 {
            self.alive = false;
        }
        if self.age.is_multiple_of(2) {
            let style = ParticleStyle {
                color: 0x88ccff,
                radius: Some(2.5),
                speed: 0.6,
                decay: Some(0.09),
                gravity: 0.0,
                glow: true,
                ..ParticleStyle::default()
            };
            ctx.spawned.push(Particle::new(self.pos, &style, ctx.rng));
        }
        None
    }

    fn is_expired(&self) -> bool {
        !self.alive
    }
}

/// Projectile fired by the enemy toward the defender lane
#[derive(Debug, Clone)]
pub struct EnemyShot {
    pub pos: Vec2,
    pub vel: Vec2,
    pub alive: bool,
    pub age: u32,
    pub trail: Trail,
    pub variant: EnemyVariant,
    /// Lane the shot aims at
    pub target_y: f32,
    /// Cosmetic spin
    pub rotation: f32,
}

impl EnemyShot {
    pub fn new(origin: Vec2, variant: EnemyVariant, speed_multiplier: f32) -> Self {
        let target = Vec2::new(DEFENDER_X, ENEMY_SHOT_LANE_Y);
        let dir = (target - origin).try_normalize().unwrap_or(Vec2::NEG_X);
        let speed = (ENEMY_SHOT_BASE_SPEED + variant.id() as f32 * 0.5) * speed_multiplier;
        Self {
            pos: origin,
            vel: dir * speed,
            alive: true,
            age: 0,
            trail: Trail::new(ENEMY_SHOT_TRAIL),
            variant,
            target_y: target.y,
            rotation: 0.0,
        }
    }

    pub fn size(&self) -> f32 {
        10.0 + self.variant.id() as f32 * 1.5
    }
}

impl Transient for EnemyShot {
    fn update(&mut self, ctx: &mut UpdateCtx<'_>) -> Option<EntityEvent> {
        self.age += 1;
        self.rotation += 0.12;
        self.trail.record(self.pos);
        self.pos += self.vel;

        if self.age.is_multiple_of(3) {
            let style = ParticleStyle {
                color: self.variant.spark_color(),
                radius: Some(2.0),
                speed: 0.4,
                decay: Some(0.12),
                gravity: 0.0,
                ..ParticleStyle::default()
            };
            ctx.spawned.push(Particle::new(self.pos, &style, ctx.rng));
        }

        let defender = Vec2::new(DEFENDER_X, DEFENDER_Y - 20.0);
        if self.pos.x < CONTACT_X && within_radius(self.pos, defender, DEFENDER_HIT_RADIUS) {
            self.alive = false;
            return Some(EntityEvent::HitDefender { pos: self.pos });
        }
        if self.pos.x < -30.0 {
            self.alive = false;
        }
        None
    }

    fn is_expired(&self) -> bool {
        !self.alive
    }
}

/// Particle shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParticleKind {
    #[default]
    Circle,
    Star,
    Note,
    Ring,
    Ember,
}

/// Spawn parameters for a particle
#[derive(Debug, Clone, Copy)]
pub struct ParticleStyle {
    pub kind: ParticleKind,
    /// Fixed launch angle, random if None
    pub angle: Option<f32>,
    pub speed: f32,
    /// Initial upward kick
    pub up: f32,
    pub decay: Option<f32>,
    pub radius: Option<f32>,
    pub color: u32,
    pub gravity: f32,
    pub glow: bool,
}

impl Default for ParticleStyle {
    fn default() -> Self {
        Self {
            kind: ParticleKind::Circle,
            angle: None,
            speed: 4.0,
            up: 1.2,
            decay: None,
            radius: None,
            color: 0xffcc44,
            gravity: 0.09,
            glow: false,
        }
    }
}

/// Cosmetic particle
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 1.0 at spawn, expired at 0
    pub life: f32,
    pub decay: f32,
    pub radius: f32,
    pub color: u32,
    pub kind: ParticleKind,
    pub rotation: f32,
    pub spin: f32,
    pub gravity: f32,
    pub glow: bool,
}

impl Particle {
    pub fn new(pos: Vec2, style: &ParticleStyle, rng: &mut Pcg32) -> Self {
        let angle = style
            .angle
            .unwrap_or_else(|| rng.random::<f32>() * std::f32::consts::TAU);
        let speed = style.speed * (rng.random::<f32>() * 0.7 + 0.65);
        Self {
            pos,
            vel: Vec2::new(angle.cos() * speed, angle.sin() * speed - style.up),
            life: 1.0,
            decay: style
                .decay
                .unwrap_or_else(|| 0.016 + rng.random::<f32>() * 0.022),
            radius: style.radius.unwrap_or_else(|| rng.random::<f32>() * 5.0 + 2.0),
            color: style.color,
            kind: style.kind,
            rotation: rng.random::<f32>() * std::f32::consts::TAU,
            spin: (rng.random::<f32>() - 0.5) * 0.18,
            gravity: style.gravity,
            glow: style.glow,
        }
    }
}

impl Transient for Particle {
    fn update(&mut self, _ctx: &mut UpdateCtx<'_>) -> Option<EntityEvent> {
        self.life -= self.decay;
        self.pos += self.vel;
        self.vel.y += self.gravity;
        self.vel.x *= 0.972;
        self.rotation += self.spin;
        None
    }

    fn is_expired(&self) -> bool {
        self.life <= 0.0
    }
}

/// Rising, fading label ("+10", "DESTROYED!")
#[derive(Debug, Clone)]
pub struct FloatText {
    pub pos: Vec2,
    pub text: String,
    pub color: u32,
    pub size: f32,
    pub life: f32,
    pub decay: f32,
    pub vy: f32,
}

impl FloatText {
    pub fn new(pos: Vec2, text: impl Into<String>, color: u32, size: f32) -> Self {
        Self {
            pos,
            text: text.into(),
            color,
            size,
            life: 1.0,
            decay: 0.013,
            vy: -1.9,
        }
    }
}

impl Transient for FloatText {
    fn update(&mut self, _ctx: &mut UpdateCtx<'_>) -> Option<EntityEvent> {
        self.life -= self.decay;
        self.pos.y += self.vy;
        self.vy *= 0.952;
        None
    }

    fn is_expired(&self) -> bool {
        self.life <= 0.0
    }
}

/// Spawn `count` particles of one style
pub fn burst(
    out: &mut Vec<Particle>,
    rng: &mut Pcg32,
    pos: Vec2,
    count: usize,
    style: &ParticleStyle,
) {
    out.extend((0..count).map(|_| Particle::new(pos, style, rng)));
}

/// Star/ring/note explosion used for hits and interceptions
pub fn note_explosion(out: &mut Vec<Particle>, rng: &mut Pcg32, pos: Vec2, color: u32) {
    let base = ParticleStyle {
        color,
        ..ParticleStyle::default()
    };
    burst(
        out,
        rng,
        pos,
        12,
        &ParticleStyle {
            speed: 7.0,
            radius: Some(4.5),
            kind: ParticleKind::Star,
            gravity: 0.06,
            glow: true,
            ..base
        },
    );
    burst(
        out,
        rng,
        pos,
        10,
        &ParticleStyle {
            color: 0xffffff,
            speed: 11.0,
            radius: Some(2.8),
            decay: Some(0.05),
            ..base
        },
    );
    burst(
        out,
        rng,
        pos,
        6,
        &ParticleStyle {
            speed: 3.5,
            radius: Some(7.0),
            kind: ParticleKind::Ring,
            decay: Some(0.025),
            gravity: 0.0,
            ..base
        },
    );
    burst(
        out,
        rng,
        pos,
        10,
        &ParticleStyle {
            kind: ParticleKind::Note,
            radius: Some(3.5),
            gravity: 0.035,
            decay: Some(0.02),
            glow: true,
            ..base
        },
    );
    burst(
        out,
        rng,
        pos,
        8,
        &ParticleStyle {
            color: 0xffee88,
            speed: 3.0,
            radius: Some(3.0),
            kind: ParticleKind::Ember,
            gravity: 0.08,
            ..base
        },
    );
}

/// Small spark when the enemy absorbs a hit
pub fn hit_spark(out: &mut Vec<Particle>, rng: &mut Pcg32, pos: Vec2) {
    let base = ParticleStyle::default();
    burst(
        out,
        rng,
        pos,
        7,
        &ParticleStyle {
            color: 0xffee88,
            speed: 4.5,
            radius: Some(3.5),
            kind: ParticleKind::Star,
            decay: Some(0.058),
            ..base
        },
    );
    burst(
        out,
        rng,
        pos,
        5,
        &ParticleStyle {
            color: 0xff8800,
            speed: 7.0,
            radius: Some(2.2),
            gravity: 0.12,
            decay: Some(0.065),
            ..base
        },
    );
}

/// Burst on the defender when a life is lost
pub fn defender_hit(out: &mut Vec<Particle>, rng: &mut Pcg32, pos: Vec2) {
    let base = ParticleStyle::default();
    burst(
        out,
        rng,
        pos,
        12,
        &ParticleStyle {
            color: 0xff4400,
            speed: 5.0,
            radius: Some(4.0),
            kind: ParticleKind::Star,
            gravity: 0.07,
            decay: Some(0.04),
            glow: true,
            ..base
        },
    );
    burst(
        out,
        rng,
        pos,
        8,
        &ParticleStyle {
            color: 0xff8800,
            speed: 8.0,
            radius: Some(2.5),
            decay: Some(0.055),
            ..base
        },
    );
    burst(
        out,
        rng,
        pos,
        5,
        &ParticleStyle {
            color: 0xff0000,
            speed: 2.5,
            radius: Some(6.0),
            kind: ParticleKind::Ring,
            decay: Some(0.03),
            gravity: 0.0,
            ..base
        },
    );
}
