//! Lead-pursuit intercept solver.
//!
//! Solves |D + V·t| = s·t for the earliest positive t, where D is the target
//! offset from the launch origin, V the target velocity and s the projectile
//! speed. Targets are assumed to hold constant velocity.

use bulwark_core::types::{Position, Velocity};

use crate::collaborators::{InterceptSolution, TrajectoryService};

/// Below this, the quadratic term is treated as zero (projectile speed equals target speed).
const DEGENERATE_EPS: f64 = 1e-9;

#[derive(Debug, Clone, Copy, Default)]
pub struct LeadSolver;

impl TrajectoryService for LeadSolver {
    fn intercept(
        &self,
        origin: &Position,
        target_pos: &Position,
        target_vel: &Velocity,
        projectile_speed: f64,
    ) -> Option<InterceptSolution> {
        if projectile_speed <= 0.0 {
            return None;
        }

        let d = target_pos.as_dvec3() - origin.as_dvec3();
        let v = target_vel.as_dvec3();

        let c = d.length_squared();
        if c < DEGENERATE_EPS {
            return Some(InterceptSolution {
                point: *target_pos,
                time_secs: 0.0,
            });
        }

        let a = v.length_squared() - projectile_speed * projectile_speed;
        let b = 2.0 * d.dot(v);

        let t = if a.abs() < DEGENERATE_EPS {
            // Linear case: b·t + c = 0.
            if b >= 0.0 {
                return None;
            }
            -c / b
        } else {
            let disc = b * b - 4.0 * a * c;
            if disc < 0.0 {
                return None;
            }
            let sqrt_disc = disc.sqrt();
            let t1 = (-b - sqrt_disc) / (2.0 * a);
            let t2 = (-b + sqrt_disc) / (2.0 * a);
            match (t1 > 0.0, t2 > 0.0) {
                (true, true) => t1.min(t2),
                (true, false) => t1,
                (false, true) => t2,
                (false, false) => return None,
            }
        };

        Some(InterceptSolution {
            point: target_pos.advanced_by(target_vel, t),
            time_secs: t,
        })
    }
}
