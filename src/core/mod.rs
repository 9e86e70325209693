pub mod assign;
pub mod catalog;
pub mod clean;
pub mod client;
pub mod etl;
pub mod parser;
pub mod pipeline;
pub mod resolver;

pub use crate::domain::model::{OrderRow, ParsedReply, Resolution, TransformResult};
pub use crate::domain::ports::{
    ConfigProvider, Cooldown, Pipeline, ProgressSink, Storage, TextGenerator,
};
pub use crate::utils::error::Result;
