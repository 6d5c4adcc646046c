//! Document model types.
//!
//! A [`Document`] exclusively owns its [`Section`]s. Section order is
//! (page number, discovery order within the page) and is relied on by
//! positional index keys downstream.

mod document;
mod section;

pub use document::{Document, DocumentStats};
pub use section::{Section, SectionType};
