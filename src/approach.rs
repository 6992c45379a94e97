use serde::{Deserialize, Serialize};

/// One of the four roads feeding the intersection, identified by the
/// direction its traffic travels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Approach {
    /// Entering at the western boundary, travelling east.
    WestEast,
    /// Entering at the eastern boundary, travelling west.
    EastWest,
    /// Entering at the northern boundary, travelling south.
    NorthSouth,
    /// Entering at the southern boundary, travelling north.
    SouthNorth,
}

/// A lane within an approach, numbered 1..3 from the road centre line
/// outward. Each sublane has a fixed directional role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sublane {
    /// The innermost lane; receives turning traffic and cannot be spawned into.
    Inner,
    /// The middle lane; crosses straight through under signal control.
    Through,
    /// The outermost lane; free-flowing, turns into a perpendicular approach.
    Turn,
}

/// The world axis along which an approach's traffic travels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// The per-approach motion parameters: which axis changes while travelling,
/// the per-tick sign of that change, and which side of the road centre line
/// the approach's sublanes sit on.
#[derive(Clone, Copy, Debug)]
pub struct ApproachSpec {
    pub axis: Axis,
    pub sign: f64,
    pub lateral_sign: f64,
}

/// Motion parameters indexed by [Approach::index].
const SPECS: [ApproachSpec; 4] = [
    // WestEast: +x, lanes on the southern (y+) half
    ApproachSpec { axis: Axis::X, sign: 1.0, lateral_sign: 1.0 },
    // EastWest: -x, lanes on the northern half
    ApproachSpec { axis: Axis::X, sign: -1.0, lateral_sign: -1.0 },
    // NorthSouth: +y, lanes on the western half
    ApproachSpec { axis: Axis::Y, sign: 1.0, lateral_sign: -1.0 },
    // SouthNorth: -y, lanes on the eastern half
    ApproachSpec { axis: Axis::Y, sign: -1.0, lateral_sign: 1.0 },
];

impl Approach {
    /// All four approaches in index order, which is also the deterministic
    /// tie-break order used by the signal scheduler.
    pub const ALL: [Approach; 4] = [
        Approach::WestEast,
        Approach::EastWest,
        Approach::NorthSouth,
        Approach::SouthNorth,
    ];

    /// Gets the approach's index, 0..4.
    pub fn index(self) -> usize {
        match self {
            Approach::WestEast => 0,
            Approach::EastWest => 1,
            Approach::NorthSouth => 2,
            Approach::SouthNorth => 3,
        }
    }

    /// Parses the single-letter wire name used by the vehicle feed.
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'A' => Some(Approach::WestEast),
            'B' => Some(Approach::EastWest),
            'C' => Some(Approach::NorthSouth),
            'D' => Some(Approach::SouthNorth),
            _ => None,
        }
    }

    /// The single-letter wire name used by the vehicle feed.
    pub fn letter(self) -> char {
        ['A', 'B', 'C', 'D'][self.index()]
    }

    /// Gets the approach's motion parameters.
    pub fn spec(self) -> &'static ApproachSpec {
        &SPECS[self.index()]
    }

    /// The approach a left-turning vehicle exits onto.
    pub fn left_exit(self) -> Approach {
        match self {
            Approach::WestEast => Approach::SouthNorth,
            Approach::EastWest => Approach::NorthSouth,
            Approach::NorthSouth => Approach::WestEast,
            Approach::SouthNorth => Approach::EastWest,
        }
    }

    /// The approach a right-turning vehicle exits onto.
    pub fn right_exit(self) -> Approach {
        match self {
            Approach::WestEast => Approach::NorthSouth,
            Approach::EastWest => Approach::SouthNorth,
            Approach::NorthSouth => Approach::EastWest,
            Approach::SouthNorth => Approach::WestEast,
        }
    }
}

impl Sublane {
    /// Gets the sublane's index, 1..=3, counted from the road centre line.
    pub fn index(self) -> u8 {
        match self {
            Sublane::Inner => 1,
            Sublane::Through => 2,
            Sublane::Turn => 3,
        }
    }

    /// Looks up a sublane by its 1-based index.
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            1 => Some(Sublane::Inner),
            2 => Some(Sublane::Through),
            3 => Some(Sublane::Turn),
            _ => None,
        }
    }

    /// Whether vehicles may be spawned into this sublane. The inner sublane
    /// is reserved as a turn destination.
    pub fn is_spawn_point(self) -> bool {
        !matches!(self, Sublane::Inner)
    }
}
