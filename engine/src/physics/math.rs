//! Conversions between engine math (glam) and the physics backend's math (nalgebra).

use glam::{Quat, Vec3};
use rapier3d::{
    na::{Quaternion, Translation3, UnitQuaternion},
    prelude::{Isometry, Real, Vector},
};

#[inline]
pub fn to_vector(v: Vec3) -> Vector<Real> {
    Vector::new(v.x, v.y, v.z)
}

#[inline]
pub fn from_vector(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

#[inline]
pub fn to_rotation(q: Quat) -> UnitQuaternion<Real> {
    UnitQuaternion::from_quaternion(Quaternion::new(q.w, q.x, q.y, q.z))
}

#[inline]
pub fn from_rotation(q: &UnitQuaternion<Real>) -> Quat {
    Quat::from_xyzw(q.i, q.j, q.k, q.w)
}

#[inline]
pub fn to_isometry(position: Vec3, rotation: Quat) -> Isometry<Real> {
    Isometry::from_parts(
        Translation3::new(position.x, position.y, position.z),
        to_rotation(rotation),
    )
}

#[inline]
pub fn from_isometry(isometry: &Isometry<Real>) -> (Vec3, Quat) {
    (
        from_vector(&isometry.translation.vector),
        from_rotation(&isometry.rotation),
    )
}
