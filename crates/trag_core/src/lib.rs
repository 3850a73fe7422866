pub mod chunk;
pub mod corpus;
pub mod error;
pub mod normalize;
