pub mod actor;
pub mod definitions;
pub mod model;
pub mod ordinal;
pub mod view;

pub use actor::{ActorType, UnknownActorType};
pub use definitions::DefinitionMap;
pub use model::{
    Article, Chapter, CrossReference, Definition, Entity, KeyActorMention, Paragraph,
    ParsedArticle, ParsedDocument, Recital, Requirement, Section, Subparagraph, Subsubparagraph,
    TimeRequirement,
};
pub use ordinal::{Ordinal, OrdinalKind, OrdinalOrder, number_key};
