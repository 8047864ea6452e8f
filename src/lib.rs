pub mod app;
pub mod cli;
pub mod config;
pub mod output;
pub mod requests;
pub mod utils;
pub mod view;

pub use view::{
    ObjectScope, RemoteEndpoints, RenderContext, RenderedView, ViewError, ViewListSettings,
};

#[cfg(test)]
mod tests;
