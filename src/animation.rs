use std::time::{SystemTime, UNIX_EPOCH};

use bevy::prelude::*;

use crate::celestial::asteroids::Asteroid;
use crate::config::{DriftClock, SolarSystemConfig};

/// Accumulated Euler rotation (XYZ order) advanced by a fixed rate every frame.
///
/// The angles grow without wrapping; the transform only ever sees the
/// quaternion built from them.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct Spin {
    pub angles: Vec3,
    pub rate: Vec3,
}

impl Spin {
    pub fn new(angles: Vec3, rate: Vec3) -> Self {
        Self { angles, rate }
    }

    pub fn about_y(rate: f32) -> Self {
        Self::new(Vec3::ZERO, Vec3::new(0.0, rate, 0.0))
    }

    pub fn advance(&mut self) {
        self.angles += self.rate;
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.angles.x, self.angles.y, self.angles.z)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SchedulerStatus {
    #[default]
    Running,
    Stopped,
}

/// Drives the per-frame animation and is the handle for stopping it.
#[derive(Resource, Debug, Default)]
pub struct FrameScheduler {
    frame: u64,
    limit: Option<u64>,
    status: SchedulerStatus,
}

impl FrameScheduler {
    pub fn with_limit(limit: Option<u64>) -> Self {
        Self {
            limit,
            ..default()
        }
    }

    /// Counts one animated frame. Returns false once the scheduler is stopped,
    /// either explicitly or because the frame limit has been reached.
    pub fn tick(&mut self) -> bool {
        if self.status == SchedulerStatus::Stopped {
            return false;
        }
        if let Some(limit) = self.limit {
            if self.frame >= limit {
                self.status = SchedulerStatus::Stopped;
                return false;
            }
        }
        self.frame += 1;
        true
    }

    pub fn stop(&mut self) {
        self.status = SchedulerStatus::Stopped;
    }

    pub fn is_running(&self) -> bool {
        self.status == SchedulerStatus::Running
    }

    pub fn status(&self) -> SchedulerStatus {
        self.status
    }

    /// Number of frames that have been animated so far.
    pub fn frames(&self) -> u64 {
        self.frame
    }
}

pub fn animation_running(scheduler: Res<FrameScheduler>) -> bool {
    scheduler.is_running()
}

pub struct AnimationPlugin;

impl Plugin for AnimationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FrameScheduler>()
            .init_resource::<SolarSystemConfig>()
            .add_systems(
                Update,
                (
                    advance_frame,
                    (spin_bodies, drift_asteroids)
                        .chain()
                        .run_if(animation_running),
                )
                    .chain(),
            );
    }
}

fn advance_frame(mut scheduler: ResMut<FrameScheduler>) {
    if !scheduler.is_running() {
        return;
    }
    if !scheduler.tick() {
        info!("Animation stopped after {} frames", scheduler.frames());
    }
}

fn spin_bodies(mut bodies: Query<(&mut Spin, &mut Transform)>) {
    for (mut spin, mut transform) in bodies.iter_mut() {
        spin.advance();
        transform.rotation = spin.rotation();
    }
}

fn drift_asteroids(
    time: Res<Time>,
    config: Res<SolarSystemConfig>,
    mut asteroids: Query<(&Asteroid, &mut Transform)>,
) {
    let belt = &config.asteroid_belt;
    let now_ms = clock_millis(belt.drift_clock, &time);
    let lateral = lateral_offset(now_ms, belt.lateral_frequency, belt.lateral_amplitude);

    for (asteroid, mut transform) in asteroids.iter_mut() {
        transform.translation.x += lateral;
        transform.translation.z = drift_depth(
            transform.translation.z,
            asteroid.velocity,
            belt.depth_floor,
            belt.depth_reset,
        );
    }
}

fn clock_millis(clock: DriftClock, time: &Time) -> f64 {
    match clock {
        DriftClock::WallClock => SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|since_epoch| since_epoch.as_secs_f64() * 1000.0)
            .unwrap_or(0.0),
        DriftClock::Elapsed => time.elapsed_seconds_f64() * 1000.0,
    }
}

/// Sideways nudge shared by the whole belt for a given instant.
pub fn lateral_offset(now_ms: f64, frequency: f64, amplitude: f32) -> f32 {
    (now_ms * frequency).sin() as f32 * amplitude
}

/// Moves a depth coordinate one frame towards `floor`; dropping below it jumps to `reset`.
pub fn drift_depth(depth: f32, velocity: f32, floor: f32, reset: f32) -> f32 {
    let next = depth - velocity;
    if next < floor {
        reset
    } else {
        next
    }
}
