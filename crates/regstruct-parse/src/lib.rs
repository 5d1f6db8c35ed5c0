//! Hierarchical parser for formally structured legal text.
//!
//! Stages run leaf-first over one normalised text: chapter and section
//! segmentation, article extraction, paragraph decomposition, then the
//! per-article extractors (cross-references, definitions, requirements, key
//! actors, entities). [`Parser`] wires them together.

mod actors;
mod articles;
mod config;
mod definitions;
mod error;
mod interval;
mod normalize;
mod paragraphs;
mod pipeline;
mod recitals;
mod references;
mod requirements;
mod segment;

pub use actors::{extract_entities, identify_key_actors};
pub use articles::extract_articles;
pub use config::ParseConfig;
pub use definitions::extract_definitions;
pub use error::ParseError;
pub use interval::{IntervalIndex, Spanned};
pub use normalize::{collapse_whitespace, normalize_text};
pub use paragraphs::decompose_paragraphs;
pub use pipeline::Parser;
pub use recitals::{ADOPTION_MARKER, extract_recitals};
pub use references::extract_cross_references;
pub use requirements::{ArticleRequirements, Classification, RequirementClassifier};
pub use segment::{segment_chapters, segment_sections};
