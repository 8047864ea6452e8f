use serde::Serialize;

use crate::view::{RemoteEndpoints, RenderedView, ViewListSettings};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Html,
    Json,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "html" | "htm" => Some(Self::Html),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".html") || lower.ends_with(".htm") {
        return Some(OutputFormat::Html);
    }
    None
}

/// One rendered view list together with the request that produced it.
#[derive(Clone, Debug, Serialize)]
pub struct OutputRecord {
    pub settings: ViewListSettings,
    pub rendered: RenderedView,
}

#[derive(Debug, Serialize)]
struct JsonPage<'a> {
    endpoints: &'a RemoteEndpoints,
    views: &'a [OutputRecord],
}

pub fn render_html(records: &[OutputRecord]) -> Vec<u8> {
    let mut out = String::new();
    for r in records {
        out.push_str(&r.rendered.to_html());
    }
    out.into_bytes()
}

pub fn render_json(endpoints: &RemoteEndpoints, records: &[OutputRecord]) -> Vec<u8> {
    let page = JsonPage {
        endpoints,
        views: records,
    };
    let mut out = serde_json::to_vec_pretty(&page).unwrap_or_else(|_| b"{}".to_vec());
    out.push(b'\n');
    out
}

pub fn render(
    format: OutputFormat,
    endpoints: &RemoteEndpoints,
    records: &[OutputRecord],
) -> Vec<u8> {
    match format {
        OutputFormat::Html => render_html(records),
        OutputFormat::Json => render_json(endpoints, records),
    }
}
