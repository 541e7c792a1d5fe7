use crate::domain::model::{ColumnIndices, Table, TransformResult};
use crate::utils::error::Result;

pub trait Storage {
    fn exists(&self, path: &str) -> bool;
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
}

pub trait ConfigProvider {
    fn input_path(&self) -> &str;
    fn media_dir(&self) -> &str;
    fn output_path(&self) -> &str;
    fn delimiter(&self) -> u8;
    fn front_column(&self) -> &str;
    fn back_column(&self) -> &str;
    fn deck_name(&self) -> &str;
    fn model_name(&self) -> &str;
    fn template_name(&self) -> &str;
    fn front_template(&self) -> &str;
    fn back_template(&self) -> &str;
    fn css(&self) -> &str;
}

/// The stages run strictly in order; the first error ends the run.
pub trait Pipeline {
    fn extract(&self) -> Result<Table>;
    fn validate(&self, table: &Table) -> Result<ColumnIndices>;
    fn transform(&self, table: Table, columns: ColumnIndices) -> Result<TransformResult>;
    fn load(&self, result: TransformResult) -> Result<String>;
}
