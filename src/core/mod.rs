pub mod assembler;
pub mod etl;
pub mod loader;
pub mod model_builder;
pub mod pipeline;

#[cfg(test)]
pub(crate) mod test_support;

pub use crate::domain::model::{
    CardModel, CardTemplate, ColumnIndices, Deck, Field, Note, Package, Record, Row, Table,
    TransformResult,
};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
