//! Vehicle model table.

/// Per-vehicle physical description. The state layout a vehicle reports is
/// `[pos(3), rot(4), linvel(3), angvel(3), heading(3), up(3), throttle(r)]`,
/// so the state dimension is `19 + rotor_count` and the action vector is the
/// per-rotor throttle command.
#[derive(Clone, Debug)]
pub struct VehicleModel {
    pub name: String,
    /// Mass of one vehicle in kg.
    pub mass: f32,
    pub rotor_count: usize,
}

impl VehicleModel {
    /// Looks up a named preset. Returns `None` for unknown model names.
    #[must_use]
    pub fn preset(name: &str) -> Option<Self> {
        let (mass, rotor_count) = match name {
            "crazyflie" => (0.028, 4),
            "hummingbird" => (0.716, 4),
            _ => return None,
        };
        Some(Self {
            name: name.to_owned(),
            mass,
            rotor_count,
        })
    }

    #[must_use]
    pub fn state_dim(&self) -> usize {
        19 + self.rotor_count
    }

    #[must_use]
    pub fn action_dim(&self) -> usize {
        self.rotor_count
    }
}
