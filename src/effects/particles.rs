use rand::Rng;
use std::f32::consts::TAU;

use crate::game::Position;

/// Slowest and fastest particle speed, in cells per tick
const MIN_SPEED: f32 = 0.1;
const MAX_SPEED: f32 = 0.25;

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Position in cell units; fractional while in flight
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub lifetime: u32,
    pub max_lifetime: u32,
}

impl Particle {
    /// Remaining life in `0.0..=1.0`, used to fade the particle out
    pub fn intensity(&self) -> f32 {
        if self.max_lifetime == 0 {
            0.0
        } else {
            self.lifetime as f32 / self.max_lifetime as f32
        }
    }

    /// The grid cell the particle is currently over
    pub fn cell(&self) -> Position {
        Position::new(self.x.floor() as i32, self.y.floor() as i32)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Burst `count` particles outward from the centre of `origin`
    pub fn emit<R: Rng>(&mut self, rng: &mut R, origin: Position, count: usize, lifetime: u32) {
        let (cx, cy) = (origin.x as f32 + 0.5, origin.y as f32 + 0.5);

        for _ in 0..count {
            let angle = rng.gen_range(0.0..TAU);
            let speed = rng.gen_range(MIN_SPEED..MAX_SPEED);
            self.particles.push(Particle {
                x: cx,
                y: cy,
                vx: speed * angle.cos(),
                vy: speed * angle.sin(),
                lifetime,
                max_lifetime: lifetime,
            });
        }
    }

    /// Move every particle one tick and drop the expired ones
    pub fn update(&mut self) {
        for particle in &mut self.particles {
            particle.x += particle.vx;
            particle.y += particle.vy;
            particle.lifetime = particle.lifetime.saturating_sub(1);
        }
        self.particles.retain(|p| p.lifetime > 0);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
