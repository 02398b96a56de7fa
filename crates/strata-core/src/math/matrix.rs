// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Defines the `Mat4` and `DMat4` types.

use super::{DVec4, Vec3, Vec4};
use std::ops::Mul;

// --- Mat4 ---

/// A 4x4 column-major matrix with `f32` components.
///
/// This is the working precision of every transform stack: it is what ends up in
/// push-constant memory, so the layout is `#[repr(C)]` and `Pod` and its byte size
/// is exactly [`Mat4::SIZE`].
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct Mat4 {
    /// The columns of the matrix. `cols[0]` is the first column, and so on.
    pub cols: [Vec4; 4],
}

impl Mat4 {
    /// The size in bytes of one matrix as uploaded to the GPU.
    pub const SIZE: u32 = std::mem::size_of::<Self>() as u32;

    /// The 4x4 identity matrix.
    pub const IDENTITY: Self = Self {
        cols: [Vec4::X, Vec4::Y, Vec4::Z, Vec4::W],
    };

    /// A 4x4 matrix with all elements set to 0.
    pub const ZERO: Self = Self {
        cols: [Vec4::ZERO; 4],
    };

    /// Creates a new matrix from four column vectors.
    #[inline]
    pub fn from_cols(c0: Vec4, c1: Vec4, c2: Vec4, c3: Vec4) -> Self {
        Self {
            cols: [c0, c1, c2, c3],
        }
    }

    /// Returns a row of the matrix as a `Vec4`.
    #[inline]
    pub fn get_row(&self, index: usize) -> Vec4 {
        Vec4 {
            x: self.cols[0].get(index),
            y: self.cols[1].get(index),
            z: self.cols[2].get(index),
            w: self.cols[3].get(index),
        }
    }

    /// Creates a translation matrix.
    #[inline]
    pub fn from_translation(v: Vec3) -> Self {
        Self {
            cols: [Vec4::X, Vec4::Y, Vec4::Z, Vec4::from_vec3(v, 1.0)],
        }
    }

    /// Creates a non-uniform scaling matrix.
    #[inline]
    pub fn from_scale(scale: Vec3) -> Self {
        Self {
            cols: [
                Vec4::new(scale.x, 0.0, 0.0, 0.0),
                Vec4::new(0.0, scale.y, 0.0, 0.0),
                Vec4::new(0.0, 0.0, scale.z, 0.0),
                Vec4::W,
            ],
        }
    }

    /// Returns the matrix as a flat column-major array.
    #[inline]
    pub fn to_cols_array(&self) -> [f32; 16] {
        bytemuck::cast(*self)
    }

    /// Returns the raw bytes of the matrix, ready for a push-constant upload.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

impl Default for Mat4 {
    /// Returns the 4x4 identity matrix.
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul<Mat4> for Mat4 {
    type Output = Self;
    /// Multiplies this matrix by another `Mat4`. Matrix multiplication is not commutative.
    #[inline]
    fn mul(self, rhs: Mat4) -> Self::Output {
        let mut result_cols = [Vec4::ZERO; 4];
        for (c_idx, target_col) in result_cols.iter_mut().enumerate() {
            let col_from_rhs = rhs.cols[c_idx];
            *target_col = Vec4 {
                x: self.get_row(0).dot(col_from_rhs),
                y: self.get_row(1).dot(col_from_rhs),
                z: self.get_row(2).dot(col_from_rhs),
                w: self.get_row(3).dot(col_from_rhs),
            };
        }
        Mat4 { cols: result_cols }
    }
}

impl Mul<Vec4> for Mat4 {
    type Output = Vec4;
    /// Transforms a `Vec4` by this matrix.
    #[inline]
    fn mul(self, rhs: Vec4) -> Self::Output {
        self.cols[0] * rhs.x + self.cols[1] * rhs.y + self.cols[2] * rhs.z + self.cols[3] * rhs.w
    }
}

impl From<DMat4> for Mat4 {
    /// Narrows a double-precision matrix to the stack's working precision.
    #[inline]
    fn from(m: DMat4) -> Self {
        Self {
            cols: m.cols.map(Vec4::from),
        }
    }
}

// --- DMat4 ---

/// A 4x4 column-major matrix with `f64` components.
///
/// Only used as an input type: transform stacks accept it and store the
/// narrowed [`Mat4`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct DMat4 {
    /// The columns of the matrix. `cols[0]` is the first column, and so on.
    pub cols: [DVec4; 4],
}

impl DMat4 {
    /// The 4x4 identity matrix.
    pub const IDENTITY: Self = Self {
        cols: [DVec4::X, DVec4::Y, DVec4::Z, DVec4::W],
    };

    /// Creates a new matrix from four column vectors.
    #[inline]
    pub fn from_cols(c0: DVec4, c1: DVec4, c2: DVec4, c3: DVec4) -> Self {
        Self {
            cols: [c0, c1, c2, c3],
        }
    }

    /// Creates a translation matrix.
    #[inline]
    pub fn from_translation(x: f64, y: f64, z: f64) -> Self {
        Self {
            cols: [DVec4::X, DVec4::Y, DVec4::Z, DVec4::new(x, y, z, 1.0)],
        }
    }
}

impl Default for DMat4 {
    /// Returns the 4x4 identity matrix.
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mat4_size_is_one_push_constant_block() {
        assert_eq!(Mat4::SIZE, 64);
        assert_eq!(Mat4::IDENTITY.as_bytes().len(), 64);
    }

    #[test]
    fn test_mat4_identity_default() {
        assert_eq!(Mat4::default(), Mat4::IDENTITY);
        let m = Mat4::from_scale(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(m * Mat4::IDENTITY, m);
        assert_eq!(Mat4::IDENTITY * m, m);
    }

    #[test]
    fn test_mat4_translation_then_scale() {
        let t = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let s = Mat4::from_scale(Vec3::new(2.0, 2.0, 2.0));
        let p = (t * s) * Vec4::new(1.0, 1.0, 1.0, 1.0);
        assert_relative_eq!(p.x, 3.0);
        assert_relative_eq!(p.y, 4.0);
        assert_relative_eq!(p.z, 5.0);
        assert_relative_eq!(p.w, 1.0);
    }

    #[test]
    fn test_mat4_cols_array_is_column_major() {
        let m = Mat4::from_translation(Vec3::new(7.0, 8.0, 9.0));
        let a = m.to_cols_array();
        assert_eq!(&a[12..16], &[7.0, 8.0, 9.0, 1.0]);
    }

    #[test]
    fn test_dmat4_narrows_to_mat4() {
        let d = DMat4::from_translation(1.0e6 + 0.5, -3.25, 0.0);
        let m: Mat4 = d.into();
        assert_relative_eq!(m.cols[3].x, 1_000_000.5);
        assert_relative_eq!(m.cols[3].y, -3.25);
        assert_eq!(Mat4::from(DMat4::IDENTITY), Mat4::IDENTITY);
    }
}
