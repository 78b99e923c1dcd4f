mod assets;
mod tools;

pub use assets::AssetConfig;
pub use tools::ToolConfig;
