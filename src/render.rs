//! Drawing interface
//!
//! The simulation never reads anything back from rendering. Every entity
//! describes itself as primitives on a `Surface`; the host decides how to
//! rasterize them (canvas, GPU batch, or a recorded `DrawList`).

use glam::Vec2;
use serde::Serialize;

use crate::consts::*;
use crate::notes::NOTES;
use crate::sim::{Enemy, EnemyShot, FloatText, GameState, Particle, ParticleKind, PlayerShot};

/// Linear RGBA in 0..1
pub type Color = [f32; 4];

/// 0xRRGGBB plus alpha
pub fn rgb(hex: u32, alpha: f32) -> Color {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
        alpha.clamp(0.0, 1.0),
    ]
}

/// HSL (hue in degrees) to RGBA
pub fn hsl(hue: f32, saturation: f32, lightness: f32, alpha: f32) -> Color {
    let h = hue.rem_euclid(360.0) / 60.0;
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = lightness - c / 2.0;
    [r + m, g + m, b + m, alpha.clamp(0.0, 1.0)]
}

/// Primitive sink
pub trait Surface {
    fn circle(&mut self, center: Vec2, radius: f32, color: Color);
    fn ring(&mut self, center: Vec2, radius: f32, width: f32, color: Color);
    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color);
    fn text(&mut self, pos: Vec2, text: &str, size: f32, color: Color);
    /// Camera offset applied to everything drawn afterwards (screen shake)
    fn set_offset(&mut self, offset: Vec2);
}

pub trait Draw {
    fn draw(&self, surface: &mut dyn Surface);
}

/// Fading trail from oldest to newest point
fn draw_trail(
    surface: &mut dyn Surface,
    points: &[Vec2],
    width: f32,
    color: impl Fn(f32) -> Color,
) {
    let n = points.len() as f32;
    for (i, pair) in points.windows(2).enumerate() {
        let t = (i + 1) as f32 / n;
        surface.line(pair[0], pair[1], width * t, color(t));
    }
}

impl Draw for PlayerShot {
    fn draw(&self, surface: &mut dyn Surface) {
        let hue = self.hue();
        let points: Vec<Vec2> = self.trail.points().collect();
        draw_trail(surface, &points, 6.0, |t| hsl(hue, 1.0, 0.7, t * 0.8));
        surface.circle(self.pos, 9.0, hsl(hue, 1.0, 0.6, 0.35));
        surface.circle(self.pos, 5.0, rgb(0xffffff, 1.0));
    }
}

impl Draw for EnemyShot {
    fn draw(&self, surface: &mut dyn Surface) {
        let color = self.variant.shot_color();
        let points: Vec<Vec2> = self.trail.points().collect();
        draw_trail(surface, &points, self.size() * 0.6, |t| rgb(color, t * 0.6));
        surface.circle(self.pos, self.size(), rgb(color, 0.9));
        let spoke = Vec2::from_angle(self.rotation) * self.size() * 0.7;
        surface.line(self.pos - spoke, self.pos + spoke, 2.0, rgb(self.variant.spark_color(), 1.0));
    }
}

impl Draw for Particle {
    fn draw(&self, surface: &mut dyn Surface) {
        let color = rgb(self.color, self.life);
        let r = self.radius * self.life.max(0.2);
        match self.kind {
            ParticleKind::Ring => {
                surface.ring(self.pos, self.radius * (2.0 - self.life), 2.0, color)
            }
            ParticleKind::Star => {
                for k in 0..3 {
                    let angle = self.rotation + k as f32 * std::f32::consts::FRAC_PI_3;
                    let arm = Vec2::from_angle(angle) * r;
                    surface.line(self.pos - arm, self.pos + arm, 1.5, color);
                }
            }
            ParticleKind::Note => {
                surface.circle(self.pos, r, color);
                let stem = self.pos + Vec2::new(r, 0.0);
                surface.line(stem, stem + Vec2::new(0.0, -3.0 * r), 1.0, color);
            }
            ParticleKind::Circle | ParticleKind::Ember => surface.circle(self.pos, r, color),
        }
        if self.glow {
            surface.circle(self.pos, r * 2.2, rgb(self.color, self.life * 0.2));
        }
    }
}

impl Draw for FloatText {
    fn draw(&self, surface: &mut dyn Surface) {
        surface.text(self.pos, &self.text, self.size, rgb(self.color, self.life));
    }
}

impl Draw for Enemy {
    fn draw(&self, surface: &mut dyn Surface) {
        let fade = 1.0 - self.death_progress();
        if fade <= 0.0 {
            return;
        }
        let pos = self.pos + Vec2::new(0.0, self.bob.sin() * 4.0);
        let radius = 28.0 * self.scale * (1.0 + self.squash) * (0.5 + 0.5 * fade);
        let body = if self.hit_flash > 0 && self.hit_flash % 4 < 2 {
            0xffffff
        } else {
            self.variant.shot_color()
        };
        surface.circle(pos, radius, rgb(body, fade));
        // Anger tints the eyes red as it closes in
        let eye = rgb(0xffffff, fade);
        let pupil = [self.anger, 0.0, 0.0, fade];
        for side in [-1.0, 1.0] {
            let e = pos + Vec2::new(side * radius * 0.35, -radius * 0.25);
            surface.circle(e, radius * 0.18, eye);
            surface.circle(e, radius * 0.08, pupil);
        }

        // Health bar
        if self.max_hp > 1 && self.is_active() {
            let w = radius * 1.6;
            let left = pos + Vec2::new(-w / 2.0, -radius - 12.0);
            let filled = w * self.hp as f32 / self.max_hp as f32;
            surface.line(left, left + Vec2::new(w, 0.0), 5.0, rgb(0x333333, 0.8));
            surface.line(left, left + Vec2::new(filled, 0.0), 5.0, rgb(0x44ee88, 1.0));
        }
    }
}

/// Staff lines plus the prompt note head (or the revealed answer)
fn draw_prompt(state: &GameState, surface: &mut dyn Surface) {
    const LEFT: f32 = 40.0;
    const TOP: f32 = 30.0;
    const GAP: f32 = 10.0;
    let bottom = TOP + 4.0 * GAP;
    for i in 0..5 {
        let y = TOP + i as f32 * GAP;
        surface.line(Vec2::new(LEFT, y), Vec2::new(LEFT + 120.0, y), 1.0, rgb(0xdddddd, 0.9));
    }
    surface.text(Vec2::new(LEFT, bottom + 18.0), state.clef.as_str(), 12.0, rgb(0xaaaaaa, 1.0));

    let (index, color) = match (state.revealed_note, state.current_note) {
        (Some(n), _) => (n, 0xff5555),
        (None, Some(n)) => (n, 0xffffff),
        (None, None) => return,
    };
    let Some(note) = NOTES.get(index) else { return };
    let step = state.clef.staff_position(note);
    let head = Vec2::new(LEFT + 60.0, bottom - step as f32 * GAP / 2.0);
    // Ledger lines below or above the staff
    for ledger in (step..0).filter(|s| s % 2 == 0).chain((10..=step).filter(|s| s % 2 == 0)) {
        let y = bottom - ledger as f32 * GAP / 2.0;
        let half = Vec2::new(10.0, 0.0);
        let at = Vec2::new(head.x, y);
        surface.line(at - half, at + half, 1.0, rgb(0xdddddd, 0.9));
    }
    surface.circle(head, GAP * 0.55, rgb(color, 1.0));

    // Timer bar
    let w = 120.0 * state.timer_fraction();
    let y = bottom + 28.0;
    surface.line(Vec2::new(LEFT, y), Vec2::new(LEFT + w, y), 4.0, rgb(0x44aaff, 1.0));
}

/// Draw a whole frame in back-to-front order
pub fn draw_scene(state: &GameState, surface: &mut dyn Surface) {
    surface.set_offset(state.shake.offset);

    surface.line(
        Vec2::new(CONTACT_X, FIELD_HEIGHT * 0.3),
        Vec2::new(CONTACT_X, FIELD_HEIGHT),
        1.0,
        rgb(0xff4444, 0.25),
    );
    surface.circle(Vec2::new(DEFENDER_X, DEFENDER_Y), 26.0, rgb(0x3366cc, 1.0));

    if let Some(enemy) = &state.enemy {
        enemy.draw(surface);
    }
    for shot in &state.enemy_shots {
        shot.draw(surface);
    }
    for shot in &state.player_shots {
        shot.draw(surface);
    }
    for p in &state.particles {
        p.draw(surface);
    }
    for f in &state.floats {
        f.draw(surface);
    }

    surface.set_offset(Vec2::ZERO);
    draw_prompt(state, surface);
}

/// One recorded primitive
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Circle { center: Vec2, radius: f32, color: Color },
    Ring { center: Vec2, radius: f32, width: f32, color: Color },
    Line { from: Vec2, to: Vec2, width: f32, color: Color },
    Text { pos: Vec2, text: String, size: f32, color: Color },
}

/// Surface that records primitives (offset already applied) for a host
/// that rasterizes elsewhere
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
    offset: Vec2,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
        self.offset = Vec2::ZERO;
    }
}

impl Surface for DrawList {
    fn circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::Circle {
            center: center + self.offset,
            radius,
            color,
        });
    }

    fn ring(&mut self, center: Vec2, radius: f32, width: f32, color: Color) {
        self.commands.push(DrawCommand::Ring {
            center: center + self.offset,
            radius,
            width,
            color,
        });
    }

    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        self.commands.push(DrawCommand::Line {
            from: from + self.offset,
            to: to + self.offset,
            width,
            color,
        });
    }

    fn text(&mut self, pos: Vec2, text: &str, size: f32, color: Color) {
        self.commands.push(DrawCommand::Text {
            pos: pos + self.offset,
            text: text.to_string(),
            size,
            color,
        });
    }

    fn set_offset(&mut self, offset: Vec2) {
        self.offset = offset;
    }
}
