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

//! Provides the small set of math primitives the state tracker works with.
//!
//! Transform stacks store single-precision [`Mat4`] values because that is what
//! gets uploaded as push constants. Scene code frequently accumulates transforms
//! in double precision, so [`DMat4`] exists as an input type that narrows to
//! `Mat4` on conversion.

pub mod color;
pub mod dimension;
pub mod matrix;
pub mod vector;

pub use self::color::LinearRgba;
pub use self::dimension::Extent2D;
pub use self::matrix::{DMat4, Mat4};
pub use self::vector::{DVec4, Vec3, Vec4};

