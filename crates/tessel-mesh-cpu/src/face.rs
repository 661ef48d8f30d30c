use serde::{Deserialize, Serialize};
use tessel_blocks::FaceDirection;
use tessel_geom::Vec3;

/// Cube faces in emission order. `index()` is also the face slot in light volumes.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Face {
    Top = 0,
    PosX = 1,
    PosZ = 2,
    NegX = 3,
    NegZ = 4,
    Bottom = 5,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::Top,
        Face::PosX,
        Face::PosZ,
        Face::NegX,
        Face::NegZ,
        Face::Bottom,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Integer step `(dx, dy, dz)` to the neighbor across this face.
    #[inline]
    pub fn delta(self) -> (isize, isize, isize) {
        match self {
            Face::Top => (0, 1, 0),
            Face::PosX => (1, 0, 0),
            Face::PosZ => (0, 0, 1),
            Face::NegX => (-1, 0, 0),
            Face::NegZ => (0, 0, -1),
            Face::Bottom => (0, -1, 0),
        }
    }

    #[inline]
    pub fn normal(self) -> Vec3 {
        let (dx, dy, dz) = self.delta();
        Vec3::new(dx as f32, dy as f32, dz as f32)
    }

    #[inline]
    pub fn direction(self) -> FaceDirection {
        match self {
            Face::Top => FaceDirection::Top,
            Face::Bottom => FaceDirection::Bottom,
            _ => FaceDirection::Side,
        }
    }

    /// Faces on which a liquid never draws against a transparent neighbor.
    /// Top is the only face without this exception.
    #[inline]
    pub fn liquid_culls(self) -> bool {
        !matches!(self, Face::Top)
    }

    #[inline]
    pub fn geometry(self, secondary: bool) -> GeometryId {
        use GeometryId::*;
        match (self, secondary) {
            (Face::Top, false) => Py,
            (Face::Top, true) => Py2,
            (Face::PosX, false) => Px,
            (Face::PosX, true) => Px2,
            (Face::PosZ, false) => Pz,
            (Face::PosZ, true) => Pz2,
            (Face::NegX, false) => Nx,
            (Face::NegX, true) => Nx2,
            (Face::NegZ, false) => Nz,
            (Face::NegZ, true) => Nz2,
            (Face::Bottom, false) => Ny,
            (Face::Bottom, true) => Ny2,
        }
    }
}

/// Identifier of a pre-baked face shape.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryId {
    Py,
    Py2,
    Px,
    Px2,
    Pz,
    Pz2,
    Nx,
    Nx2,
    Nz,
    Nz2,
    Ny,
    Ny2,
    Cross1,
    Cross2,
}

impl GeometryId {
    pub const ALL: [GeometryId; 14] = [
        GeometryId::Py,
        GeometryId::Py2,
        GeometryId::Px,
        GeometryId::Px2,
        GeometryId::Pz,
        GeometryId::Pz2,
        GeometryId::Nx,
        GeometryId::Nx2,
        GeometryId::Nz,
        GeometryId::Nz2,
        GeometryId::Ny,
        GeometryId::Ny2,
        GeometryId::Cross1,
        GeometryId::Cross2,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GeometryId::Py => "py",
            GeometryId::Py2 => "py2",
            GeometryId::Px => "px",
            GeometryId::Px2 => "px2",
            GeometryId::Pz => "pz",
            GeometryId::Pz2 => "pz2",
            GeometryId::Nx => "nx",
            GeometryId::Nx2 => "nx2",
            GeometryId::Nz => "nz",
            GeometryId::Nz2 => "nz2",
            GeometryId::Ny => "ny",
            GeometryId::Ny2 => "ny2",
            GeometryId::Cross1 => "cross1",
            GeometryId::Cross2 => "cross2",
        }
    }

    /// The cube face a face geometry belongs to; `None` for plant crosses.
    pub fn face(self) -> Option<Face> {
        use GeometryId::*;
        match self {
            Py | Py2 => Some(Face::Top),
            Px | Px2 => Some(Face::PosX),
            Pz | Pz2 => Some(Face::PosZ),
            Nx | Nx2 => Some(Face::NegX),
            Nz | Nz2 => Some(Face::NegZ),
            Ny | Ny2 => Some(Face::Bottom),
            Cross1 | Cross2 => None,
        }
    }

    pub fn is_secondary(self) -> bool {
        use GeometryId::*;
        matches!(self, Py2 | Px2 | Pz2 | Nx2 | Nz2 | Ny2)
    }
}

impl std::fmt::Display for GeometryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
