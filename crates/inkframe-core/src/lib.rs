//! Inkframe Core Types and Definitions
//!
//! This crate provides the foundational types of the inkframe scene compiler.
//! It includes:
//!
//! - **Geometry**: Points, sizes and bounding boxes ([`geometry`] module)
//! - **Colors**: CSS colors that keep their source token ([`color::Color`])
//! - **Styles**: Optional and resolved visual attributes ([`style`] module)
//! - **Primitives**: The atomic drawables of a scene ([`primitive::Primitive`])
//! - **Defaults**: The style defaulter ([`defaults::apply_defaults`])
//! - **Frame IR**: The sparse input of the compiler ([`ir`] module)
//! - **Errors**: Structured compile errors ([`error::CompileError`])

pub mod color;
pub mod defaults;
pub mod error;
pub mod geometry;
pub mod ir;
pub mod primitive;
pub mod style;
