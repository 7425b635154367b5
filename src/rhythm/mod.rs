/// Rhythm model - static body tables and activation pattern generation
/// Pure data and pure functions; the transport and GUI both consume this

/// The nine modeled solar-system bodies. Closed set, fixed at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Body {
    Mercury,
    Venus,
    Earth,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
}

impl Body {
    pub const ALL: [Body; 9] = [
        Body::Mercury,
        Body::Venus,
        Body::Earth,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Uranus,
        Body::Neptune,
        Body::Pluto,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Body::Mercury => "Mercury",
            Body::Venus => "Venus",
            Body::Earth => "Earth",
            Body::Mars => "Mars",
            Body::Jupiter => "Jupiter",
            Body::Saturn => "Saturn",
            Body::Uranus => "Uranus",
            Body::Neptune => "Neptune",
            Body::Pluto => "Pluto",
        }
    }

    /// Sidereal orbital period in days. Input to the orbital ratio policy,
    /// never used directly for timing.
    pub fn orbital_period_days(self) -> f64 {
        match self {
            Body::Mercury => 87.97,
            Body::Venus => 224.70,
            Body::Earth => 365.26,
            Body::Mars => 686.98,
            Body::Jupiter => 4332.59,
            Body::Saturn => 10759.22,
            Body::Uranus => 30688.5,
            Body::Neptune => 60182.0,
            Body::Pluto => 90560.0,
        }
    }

    /// Note assigned to this body, or None for bodies that only render
    /// visually and never trigger audio.
    pub fn pitch(self) -> Option<&'static str> {
        match self {
            Body::Mercury => Some("C5"),
            Body::Venus => Some("A4"),
            Body::Earth => Some("G4"),
            Body::Mars => Some("E4"),
            Body::Jupiter => Some("C3"),
            Body::Saturn => Some("A2"),
            Body::Uranus => Some("G2"),
            Body::Neptune => Some("E2"),
            Body::Pluto => None,
        }
    }

    /// Display color (RGB), used only for rendering.
    pub fn color(self) -> (u8, u8, u8) {
        match self {
            Body::Mercury => (0xb1, 0xad, 0xad),
            Body::Venus => (0xe6, 0xc8, 0x7c),
            Body::Earth => (0x4f, 0x94, 0xcd),
            Body::Mars => (0xc1, 0x44, 0x0e),
            Body::Jupiter => (0xd8, 0xa0, 0x6a),
            Body::Saturn => (0xe3, 0xd9, 0xb0),
            Body::Uranus => (0x7d, 0xe2, 0xd1),
            Body::Neptune => (0x36, 0x5f, 0xc4),
            Body::Pluto => (0x9b, 0x87, 0x70),
        }
    }
}

/// How a body's rhythm ratio is derived. The two policies are alternative
/// renditions of the same idea and are never mixed for one body set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RatioPolicy {
    /// Proportional to the real orbital period against a reference body:
    /// ratio = round(period(body) / period(reference) * base_unit), min 1.
    /// Produces large ratios for the outer planets.
    Orbital { reference: Body, base_unit: u32 },
    /// Hand-picked small-integer table, independent of the real periods.
    /// Meant for a short cycle where every body fires at least once.
    Simplified,
}

impl RatioPolicy {
    pub fn ratio(self, body: Body) -> u32 {
        match self {
            RatioPolicy::Orbital {
                reference,
                base_unit,
            } => {
                let scaled = body.orbital_period_days() / reference.orbital_period_days()
                    * base_unit as f64;
                (scaled.round() as u32).max(1)
            }
            RatioPolicy::Simplified => simplified_ratio(body),
        }
    }
}

fn simplified_ratio(body: Body) -> u32 {
    match body {
        Body::Mercury => 1,
        Body::Venus => 3,
        Body::Earth => 4,
        Body::Mars => 6,
        Body::Jupiter => 8,
        Body::Saturn => 12,
        Body::Uranus => 16,
        Body::Neptune => 24,
        Body::Pluto => 48,
    }
}

/// Active ratio policy plus the cycle length the patterns and the beat
/// counter wrap at. Chosen once at startup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RhythmConfig {
    pub policy: RatioPolicy,
    pub cycle_length: usize,
}

impl RhythmConfig {
    /// Compact demo preset: small-integer ratios over a short cycle.
    pub fn simplified() -> Self {
        Self {
            policy: RatioPolicy::Simplified,
            cycle_length: 48,
        }
    }

    /// True-to-orbit preset: ratios proportional to the real periods with
    /// Mercury as the unit, over a cycle long enough that the outer planets
    /// fire more than just at the wrap.
    pub fn orbital() -> Self {
        Self {
            policy: RatioPolicy::Orbital {
                reference: Body::Mercury,
                base_unit: 1,
            },
            cycle_length: 1024,
        }
    }

    pub fn ratio(&self, body: Body) -> u32 {
        self.policy.ratio(body)
    }

    pub fn pattern(&self, body: Body) -> Vec<bool> {
        generate_pattern(self.ratio(body), self.cycle_length)
    }
}

/// Expand a rhythm ratio into a fixed-length activation sequence:
/// index i is active iff i is a multiple of `ratio`.
///
/// Deterministic and side-effect free. A zero ratio or cycle length is a
/// contract violation by the caller, not a runtime condition.
pub fn generate_pattern(ratio: u32, cycle_length: usize) -> Vec<bool> {
    assert!(ratio >= 1, "rhythm ratio must be a positive integer");
    assert!(cycle_length >= 1, "cycle length must be a positive integer");

    (0..cycle_length).map(|i| i % ratio as usize == 0).collect()
}
