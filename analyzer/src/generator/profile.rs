use crate::workflow::runner::RaceData;
use anyhow::{ensure, Context};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use sogcore::math::geodesy::destination;
use sogcore::prelude::VesselId;
use sogcore::race_interface::{Course, Fix, RaceSetup, Tag, Team, VesselPositions, Waypoint};

const NM_PER_DEGREE_LAT: f64 = 60.0;
const GLITCH_JUMP_NM: f64 = 5.0;

/// Configuration for generating a synthetic race.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub boats: usize,
    pub fixes_per_boat: usize,
    pub interval_s: i64,
    pub start_time: i64,
    pub start_lat: f64,
    pub start_lon: f64,
    pub bearing_deg: f64,
    pub speed_kn: f64,
    pub speed_spread_kn: f64,
    /// Standard jitter applied to every reported position.
    pub noise_nm: f64,
    /// Every n-th fix is reported several miles off the true position; 0 disables.
    pub glitch_every: usize,
    /// Every n-th fix is transmitted twice; 0 disables.
    pub duplicate_every: usize,
    pub waypoints: usize,
    pub seed: u64,
    pub description: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            boats: 4,
            fixes_per_boat: 240,
            interval_s: 60,
            start_time: 1_751_104_800,
            start_lat: 50.766,
            start_lon: -1.300,
            bearing_deg: 110.0,
            speed_kn: 7.5,
            speed_spread_kn: 1.5,
            noise_nm: 0.005,
            glitch_every: 37,
            duplicate_every: 11,
            waypoints: 4,
            seed: 7,
            description: None,
        }
    }
}

impl GeneratorConfig {
    fn normalized_waypoints(&self) -> usize {
        self.waypoints.max(2)
    }
}

fn jitter(rng: &mut StdRng, noise_nm: f64) -> f64 {
    if noise_nm > 0.0 {
        rng.gen_range(-noise_nm..noise_nm) / NM_PER_DEGREE_LAT
    } else {
        0.0
    }
}

fn build_course(config: &GeneratorConfig) -> Vec<Waypoint> {
    let count = config.normalized_waypoints();
    let leg_hours = (config.fixes_per_boat.saturating_sub(1)) as f64 * config.interval_s as f64 / 3600.0;
    let course_nm = config.speed_kn * leg_hours;

    (0..count)
        .map(|idx| {
            let along = course_nm * idx as f64 / (count - 1) as f64;
            let (lat, lon) = destination(config.start_lat, config.start_lon, config.bearing_deg, along);
            if idx == 0 {
                Waypoint::named(lat, lon, "Start")
            } else {
                Waypoint::new(lat, lon)
            }
        })
        .collect()
}

fn build_boat(config: &GeneratorConfig, id: VesselId, rng: &mut StdRng) -> VesselPositions {
    let spread = if config.speed_spread_kn > 0.0 {
        rng.gen_range(-config.speed_spread_kn..config.speed_spread_kn)
    } else {
        0.0
    };
    let speed_kn = (config.speed_kn + spread).max(0.5);
    let step_nm = speed_kn * config.interval_s as f64 / 3600.0;

    let mut moments = Vec::with_capacity(config.fixes_per_boat + config.fixes_per_boat / 4);
    let (mut lat, mut lon) = (config.start_lat, config.start_lon);

    for idx in 0..config.fixes_per_boat {
        let timestamp = config.start_time + idx as i64 * config.interval_s;
        let (mut reported_lat, mut reported_lon) = (
            lat + jitter(rng, config.noise_nm),
            lon + jitter(rng, config.noise_nm),
        );
        if config.glitch_every > 0 && idx > 0 && idx % config.glitch_every == 0 {
            let off_bearing = rng.gen_range(0.0..360.0);
            (reported_lat, reported_lon) =
                destination(reported_lat, reported_lon, off_bearing, GLITCH_JUMP_NM);
        }

        let fix = Fix::new(timestamp, reported_lat, reported_lon);
        moments.push(fix);
        if config.duplicate_every > 0 && idx % config.duplicate_every == 0 {
            moments.push(fix);
        }

        (lat, lon) = destination(lat, lon, config.bearing_deg, step_nm);
    }

    moments.shuffle(rng);
    VesselPositions { id, moments }
}

/// Builds a seeded synthetic race: one straight course and a fleet sailing it.
///
/// Boats with odd ids are tagged "IRC 1", even ids "IRC 2".
pub fn build_race(config: &GeneratorConfig) -> anyhow::Result<RaceData> {
    ensure!(config.interval_s > 0, "fix interval must be positive");
    config
        .fixes_per_boat
        .checked_mul(config.boats)
        .context("overflow computing fix count for generator")?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let tags = vec![
        Tag {
            id: 1,
            name: "IRC 1".into(),
        },
        Tag {
            id: 2,
            name: "IRC 2".into(),
        },
    ];

    let mut teams = Vec::with_capacity(config.boats);
    let mut boats = Vec::with_capacity(config.boats);
    for idx in 0..config.boats {
        let id = idx as VesselId + 1;
        teams.push(Team {
            id,
            name: format!("Synthetic {:02}", id),
            tags: vec![if id % 2 == 1 { 1 } else { 2 }],
        });
        boats.push(build_boat(config, id, &mut rng));
    }

    let setup = RaceSetup {
        course: Some(Course {
            nodes: build_course(config),
        }),
        tags,
        teams,
    };

    Ok(RaceData {
        race_id: format!("synthetic-{}", config.seed),
        setup,
        boats,
    })
}
