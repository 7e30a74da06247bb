//! Projectile simulation
//!
//! The single in-flight piece moves in straight lines and bounces
//! elastically off the side walls. Reaching the ceiling is a placement
//! trigger, not a bounce, so there is no vertical reflection here.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::grid::Color;
use crate::aim_direction;

/// Side wall that reflected the projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Wall {
    Left,
    Right,
}

impl Wall {
    /// Normal pointing back into the field
    #[inline]
    pub fn normal(self) -> Vec2 {
        match self {
            Wall::Left => Vec2::X,
            Wall::Right => Vec2::NEG_X,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Color,
    pub radius: f32,
}

impl Projectile {
    /// A piece resting in the launcher
    pub fn loaded(pos: Vec2, color: Color, radius: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            color,
            radius,
        }
    }

    /// Set velocity from an aim angle (degrees, 90 = straight up)
    pub fn launch(&mut self, angle_deg: f32, speed: f32) {
        self.vel = aim_direction(angle_deg) * speed;
    }

    #[inline]
    pub fn is_moving(&self) -> bool {
        self.vel != Vec2::ZERO
    }

    /// Top edge of the piece
    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y - self.radius
    }

    /// Advance one tick, bouncing off the side walls of a field `width` wide
    pub fn step(&mut self, width: f32) -> Option<Wall> {
        self.pos += self.vel;

        let wall = if self.pos.x - self.radius < 0.0 {
            self.pos.x = self.radius;
            Some(Wall::Left)
        } else if self.pos.x + self.radius > width {
            self.pos.x = width - self.radius;
            Some(Wall::Right)
        } else {
            None
        };

        if let Some(wall) = wall {
            let normal = wall.normal();
            // Only reflect when heading into the wall
            if self.vel.dot(normal) < 0.0 {
                self.vel = reflect_velocity(self.vel, normal);
            }
        }
        wall
    }
}

/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn piece(x: f32, y: f32) -> Projectile {
        Projectile::loaded(Vec2::new(x, y), Color(0), 16.0)
    }

    #[test]
    fn test_launch_straight_up() {
        let mut p = piece(176.0, 272.0);
        p.launch(90.0, 8.0);
        assert!(p.vel.x.abs() < 1e-5);
        assert!((p.vel.y + 8.0).abs() < 1e-5);
    }

    #[test]
    fn test_launch_left_of_vertical_goes_left() {
        let mut p = piece(176.0, 272.0);
        p.launch(150.0, 8.0);
        assert!(p.vel.x < 0.0);
        assert!(p.vel.y < 0.0);
    }

    #[test]
    fn test_step_without_wall() {
        let mut p = piece(100.0, 200.0);
        p.vel = Vec2::new(3.0, -4.0);
        assert_eq!(p.step(320.0), None);
        assert_eq!(p.pos, Vec2::new(103.0, 196.0));
    }

    #[test]
    fn test_right_wall_bounce_clamps_and_flips() {
        let mut p = piece(300.0, 200.0);
        p.vel = Vec2::new(7.0, -4.0);
        assert_eq!(p.step(320.0), Some(Wall::Right));
        assert_eq!(p.pos.x, 304.0);
        assert_eq!(p.vel, Vec2::new(-7.0, -4.0));
    }

    #[test]
    fn test_left_wall_bounce_clamps_and_flips() {
        let mut p = piece(20.0, 200.0);
        p.vel = Vec2::new(-7.0, -4.0);
        assert_eq!(p.step(320.0), Some(Wall::Left));
        assert_eq!(p.pos.x, 16.0);
        assert_eq!(p.vel, Vec2::new(7.0, -4.0));
    }

    #[test]
    fn test_ceiling_is_not_reflected() {
        let mut p = piece(100.0, 10.0);
        p.vel = Vec2::new(0.0, -8.0);
        p.step(320.0);
        assert!(p.top() < 0.0);
        assert!(p.vel.y < 0.0);
    }

    proptest! {
        #[test]
        fn prop_bounce_preserves_speed_and_flips_once(
            x in 17.0f32..303.0,
            vx in prop_oneof![(-15.0f32..-0.5), (0.5f32..15.0)],
            vy in -15.0f32..-0.5,
        ) {
            let mut p = piece(x, 200.0);
            p.vel = Vec2::new(vx, vy);
            let before = p.vel;
            let wall = p.step(320.0);

            prop_assert!((p.vel.x.abs() - before.x.abs()).abs() < 1e-6);
            prop_assert_eq!(p.vel.y, before.y);
            if wall.is_some() {
                prop_assert_eq!(p.vel.x.signum(), -before.x.signum());
            } else {
                prop_assert_eq!(p.vel.x, before.x);
            }
            prop_assert!(p.pos.x >= p.radius && p.pos.x <= 320.0 - p.radius);
        }
    }
}
