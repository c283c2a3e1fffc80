//! Cosmetic sand spray
//!
//! Particles never touch the grid. The pool has a fixed capacity; emits
//! beyond it are dropped and expired particles are swap-removed.

use glam::Vec2;
use rand::Rng;

/// Seconds a particle lives at most
pub const PARTICLE_LIFETIME: f32 = 0.6;

/// Velocity damping per second
const DRAG: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Seconds left
    pub life: f32,
    pub color: [f32; 3],
}

#[derive(Debug, Clone)]
pub struct ParticlePool {
    capacity: usize,
    particles: Vec<Particle>,
}

impl ParticlePool {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            particles: Vec::with_capacity(capacity),
        }
    }

    /// Spray `count` grains from `position`, roughly along `direction`
    pub fn emit(
        &mut self,
        position: Vec2,
        direction: Vec2,
        color: [f32; 3],
        count: usize,
        rng: &mut impl Rng,
    ) {
        let free = self.capacity - self.particles.len();
        for _ in 0..count.min(free) {
            let spread = Vec2::new(rng.gen_range(-1.0..=1.0), rng.gen_range(-1.0..=1.0));
            let speed: f32 = rng.gen_range(8.0..=24.0);
            self.particles.push(Particle {
                position,
                velocity: (direction + spread * 0.6) * speed,
                life: rng.gen_range(PARTICLE_LIFETIME * 0.5..=PARTICLE_LIFETIME),
                color,
            });
        }
    }

    /// Advance all particles by `dt` seconds and drop the expired ones
    pub fn step(&mut self, dt: f32) {
        let damping = (1.0 - DRAG * dt).max(0.0);
        let mut i = 0;
        while i < self.particles.len() {
            let p = &mut self.particles[i];
            p.life -= dt;
            if p.life <= 0.0 {
                self.particles.swap_remove(i);
                continue;
            }
            p.position += p.velocity * dt;
            p.velocity *= damping;
            i += 1;
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}
