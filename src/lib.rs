//! The library code for the `diarymap` static site generator. The
//! architecture can be generally broken down into three distinct steps:
//!
//! 1. Loading the inputs: the diary manuscript is rendered from markdown
//!    ([`crate::markdown`]) and the place and timeline datasets are parsed
//!    from JSON ([`crate::place`], [`crate::timeline`]) and checked for
//!    structural and referential integrity ([`crate::validate`]).
//! 2. Annotating the rendered manuscript: a keyword index is built from the
//!    place collection ([`crate::index`]) and a tag-aware scan wraps every
//!    place mention found in literal text in a marker element carrying the
//!    place's identifier ([`crate::annotate`]).
//! 3. Assembling the output: the annotated manuscript, the serialized
//!    datasets, and a version stamp ([`crate::version`]) are substituted
//!    into the page template and written as one self-contained HTML file
//!    ([`crate::assemble`]).
//!
//! Of the three, the second step is the interesting one: the annotator must
//! find keyword mentions inside already-rendered markup without ever
//! matching inside a tag, and longer keywords must beat shorter keywords
//! that are substrings of them. Everything is single-threaded and runs to
//! completion in one pass per invocation; [`crate::build::build_site`] ties
//! the steps together.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod annotate;
pub mod assemble;
pub mod build;
pub mod config;
pub mod index;
pub mod markdown;
pub mod place;
pub mod timeline;
pub mod validate;
pub mod version;
