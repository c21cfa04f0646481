//! Small value types shared by the geometry decoders.

use schema::{Record, SchemaResult};

/// A 3D vector of `f32` components.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[must_use]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[must_use]
    pub const fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Reads the `x`, `y`, `z` fields of a record.
    pub(crate) fn from_record(record: &Record<'_>) -> SchemaResult<Self> {
        Ok(Self::new(record.f32("x")?, record.f32("y")?, record.f32("z")?))
    }

    /// Reads a nested `x`, `y`, `z` record stored under `name`.
    pub(crate) fn from_field(record: &Record<'_>, name: &str) -> SchemaResult<Self> {
        Self::from_record(record.record(name)?)
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self::new(x, y, z)
    }
}
