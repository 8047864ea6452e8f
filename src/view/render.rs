use std::collections::HashSet;
use std::fmt;
use std::fmt::Write;

use serde::Serialize;
use tracing::{debug, trace};

use super::{ViewError, ViewListSettings};
use crate::requests;
use crate::utils::{escape_html, join_url};

const LOADING_IMAGE: &str = "gfx/lovd_loading.gif";

/// Where the remote LOVD serves its script bundle and stylesheet from.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RemoteEndpoints {
    pub install_url: String,
    pub lovd_url: String,
}

impl RemoteEndpoints {
    pub fn new(install_url: impl Into<String>, lovd_url: impl Into<String>) -> Self {
        Self {
            install_url: install_url.into(),
            lovd_url: lovd_url.into(),
        }
    }

    /// Both the scripts and the stylesheet come from the same installation.
    pub fn single(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            install_url: url.clone(),
            lovd_url: url,
        }
    }

    pub fn script_url(&self) -> String {
        join_url(&self.install_url, "inc-js.php")
    }

    pub fn stylesheet_url(&self) -> String {
        join_url(&self.lovd_url, "styles.css")
    }
}

/// Markup for one view list, split the way it is emitted into the page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RenderedView {
    pub viewlistid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assets: Option<String>,
    pub form: String,
    pub script: String,
}

impl RenderedView {
    pub fn to_html(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for RenderedView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(assets) = &self.assets {
            f.write_str(assets)?;
        }
        f.write_str(&self.form)?;
        f.write_str(&self.script)
    }
}

/// Per-page rendering state. Create one per response and drop it afterwards.
#[derive(Debug)]
pub struct RenderContext {
    endpoints: RemoteEndpoints,
    assets_loaded: bool,
    rendered: HashSet<String>,
}

impl RenderContext {
    pub fn new(endpoints: RemoteEndpoints) -> Self {
        Self {
            endpoints,
            assets_loaded: false,
            rendered: HashSet::new(),
        }
    }

    pub fn endpoints(&self) -> &RemoteEndpoints {
        &self.endpoints
    }

    pub fn assets_loaded(&self) -> bool {
        self.assets_loaded
    }

    pub fn rendered_ids(&self) -> impl Iterator<Item = &str> {
        self.rendered.iter().map(|s| s.as_str())
    }

    /// Returns the script bundle reference and the stylesheet injection the
    /// first time it is called on this context, `None` afterwards.
    ///
    /// The page head is out of our hands, so the stylesheet link is appended
    /// at runtime once the bundle has made jQuery available.
    pub fn load_assets(&mut self) -> Option<String> {
        if self.assets_loaded {
            return None;
        }
        self.assets_loaded = true;

        let script_url = self.endpoints.script_url();
        let stylesheet_url = self.endpoints.stylesheet_url();
        trace!(%script_url, %stylesheet_url, "emitting view list assets");

        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<script type="text/javascript" src="{}"> </script>"#,
            escape_html(&script_url)
        );
        let _ = write!(
            out,
            "\n<script type=\"text/javascript\">\n  $(\"head\").append('<link rel=\"stylesheet\" type=\"text/css\" href=\"{}\">');\n</script>\n\n",
            escape_js_single_quoted(&escape_html(&stylesheet_url))
        );
        Some(out)
    }

    pub fn render(&mut self, settings: &ViewListSettings) -> Result<RenderedView, ViewError> {
        settings.validate()?;
        if self.rendered.contains(&settings.viewlistid) {
            return Err(ViewError::DuplicateListId {
                id: settings.viewlistid.clone(),
            });
        }

        debug!(
            viewlistid = %settings.viewlistid,
            object = %settings.object,
            skipped = settings.cols_to_skip.len(),
            filters = settings.search.len(),
            "rendering view list"
        );

        let assets = self.load_assets();
        let form = render_form(settings);
        let script = render_init_script(&settings.viewlistid);
        self.rendered.insert(settings.viewlistid.clone());

        Ok(RenderedView {
            viewlistid: settings.viewlistid.clone(),
            assets,
            form,
            script,
        })
    }

    /// Same as [`RenderContext::render`], for settings that arrive untyped.
    pub fn render_value(
        &mut self,
        settings: Option<&serde_json::Value>,
    ) -> Result<RenderedView, ViewError> {
        let settings = ViewListSettings::from_value(settings)?;
        self.render(&settings)
    }

    pub fn view_full_data(
        &mut self,
        gene: &str,
        transcript_id: &str,
    ) -> Result<RenderedView, ViewError> {
        let settings = requests::full_data(gene, transcript_id)?;
        self.render(&settings)
    }

    pub fn view_individuals(&mut self) -> Result<RenderedView, ViewError> {
        self.render(&requests::individuals())
    }

    pub fn view_phenotypes(&mut self, disease_id: &str) -> Result<RenderedView, ViewError> {
        let settings = requests::phenotypes(disease_id)?;
        self.render(&settings)
    }
}

fn hidden_input(out: &mut String, name: &str, value: &str) {
    let _ = writeln!(
        out,
        r#"  <input type="hidden" name="{}" value="{}">"#,
        escape_html(name),
        escape_html(value)
    );
}

fn render_form(settings: &ViewListSettings) -> String {
    let id = &settings.viewlistid;
    let mut out = String::new();

    // Sorting and searching go through the Ajax engine, never a real submit.
    let _ = writeln!(
        out,
        r##"<form action="#" method="get" id="viewlistForm_{id}" style="margin : 0px;" onsubmit="return false;">"##
    );
    hidden_input(&mut out, "viewlistid", id);
    hidden_input(&mut out, "object", &settings.object);
    if let Some(scope) = &settings.object_id {
        hidden_input(&mut out, "object_id", &scope.to_string());
    }
    if let Some(row) = &settings.id {
        hidden_input(&mut out, "id", row);
    }
    hidden_input(&mut out, "order", "");

    for col in &settings.cols_to_skip {
        hidden_input(&mut out, &format!("skip[{col}]"), "1");
    }
    for (field, value) in &settings.search {
        hidden_input(&mut out, &format!("search_{field}"), value);
    }

    // Replaced by the remote engine once the first Ajax response arrives.
    let _ = write!(
        out,
        "\n  <div class=\"LOVD\" id=\"viewlistDiv_{id}\"><img src=\"{LOADING_IMAGE}\" alt=\"Loading...\"></div></form><br>\n\n"
    );
    out
}

fn render_init_script(viewlistid: &str) -> String {
    let id = escape_js_single_quoted(viewlistid);
    format!(
        "<script type=\"text/javascript\">\n  check_list['{id}'] = [];\n  lovd_AJAX_viewListSubmit('{id}');\n</script>\n\n"
    )
}

fn escape_js_single_quoted(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}
