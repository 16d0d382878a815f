//! Domain model module declarations.

pub mod note;
