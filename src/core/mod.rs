pub mod context;
pub mod generator;
pub mod grammar;
pub mod ligature;
pub mod markup;
pub mod pipeline;
pub mod section;
pub mod summary;
