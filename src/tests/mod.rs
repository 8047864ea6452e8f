use std::io::Write;

use serde_json::json;

use crate::view::{ObjectScope, RemoteEndpoints, RenderContext, ViewError, ViewListSettings};

fn ctx() -> RenderContext {
    RenderContext::new(RemoteEndpoints::new(
        "https://lovd.example/shared/",
        "https://lovd.example/shared",
    ))
}

fn hidden_names(form: &str) -> Vec<String> {
    form.lines()
        .filter(|l| l.contains(r#"type="hidden""#))
        .filter_map(|l| {
            let start = l.find(r#"name=""#)? + 6;
            let end = l[start..].find('"')? + start;
            Some(l[start..end].to_string())
        })
        .collect()
}

#[test]
fn escape_html_covers_attribute_breakers() {
    assert_eq!(
        crate::utils::escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
        "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#039;Jerry&#039;&lt;/a&gt;"
    );
    assert_eq!(crate::utils::escape_html("IVD"), "IVD");
}

#[test]
fn join_url_inserts_single_slash() {
    assert_eq!(
        crate::utils::join_url("https://lovd.example/shared/", "inc-js.php"),
        "https://lovd.example/shared/inc-js.php"
    );
    assert_eq!(
        crate::utils::join_url("https://lovd.example/shared", "/styles.css"),
        "https://lovd.example/shared/styles.css"
    );
}

#[test]
fn list_id_charset() {
    assert!(crate::utils::is_safe_list_id("viewlistForm_Phenotypes_for_Disease_42"));
    assert!(crate::utils::is_safe_list_id("CustomVL_VIEW"));
    assert!(!crate::utils::is_safe_list_id("x'];alert(1);//"));
    assert!(!crate::utils::is_safe_list_id("two words"));
    assert!(!crate::utils::is_safe_list_id(""));
}

#[test]
fn assets_are_emitted_once_per_context() {
    let mut ctx = ctx();
    let first = ctx.load_assets().unwrap();
    assert!(first.contains(r#"src="https://lovd.example/shared/inc-js.php""#));
    assert!(first.contains(r#"$("head").append("#));
    assert!(first.contains(r#"href="https://lovd.example/shared/styles.css""#));
    for _ in 0..5 {
        assert!(ctx.load_assets().is_none());
    }
    assert!(ctx.assets_loaded());
}

#[test]
fn assets_follow_the_first_render_only() {
    let mut ctx = ctx();
    let first = ctx.view_individuals().unwrap();
    let second = ctx.view_phenotypes("42").unwrap();
    assert!(first.assets.is_some());
    assert!(second.assets.is_none());
    assert!(ctx.load_assets().is_none());
}

#[test]
fn fresh_context_loads_assets_again() {
    let mut page_one = ctx();
    assert!(page_one.load_assets().is_some());
    let mut page_two = RenderContext::new(RemoteEndpoints::single("https://other.example"));
    let assets = page_two.load_assets().unwrap();
    assert!(assets.contains("https://other.example/inc-js.php"));
    assert!(assets.contains("https://other.example/styles.css"));
}

#[test]
fn render_rejects_missing_list_id_without_side_effects() {
    let mut ctx = ctx();
    let settings = ViewListSettings::new("", "Individual");
    assert_eq!(
        ctx.render(&settings).unwrap_err(),
        ViewError::MissingField {
            field: "viewlistid"
        }
    );
    assert!(!ctx.assets_loaded());
    assert_eq!(ctx.rendered_ids().count(), 0);
}

#[test]
fn render_rejects_missing_object() {
    let mut ctx = ctx();
    let err = ctx.render(&ViewListSettings::new("Individuals", " ")).unwrap_err();
    assert_eq!(err, ViewError::MissingField { field: "object" });
}

#[test]
fn render_value_rejects_absent_and_non_mapping_settings() {
    let mut ctx = ctx();
    assert_eq!(ctx.render_value(None).unwrap_err(), ViewError::MissingSettings);
    assert_eq!(
        ctx.render_value(Some(&json!("Individuals"))).unwrap_err(),
        ViewError::NotAMapping { kind: "string" }
    );
    assert_eq!(
        ctx.render_value(Some(&json!(["Individuals"]))).unwrap_err(),
        ViewError::NotAMapping { kind: "sequence" }
    );
    assert_eq!(
        ctx.render_value(Some(&json!({"object": "Individual"})))
            .unwrap_err(),
        ViewError::MissingField {
            field: "viewlistid"
        }
    );
    assert!(!ctx.assets_loaded());
}

#[test]
fn render_value_accepts_numeric_ids() {
    let mut ctx = ctx();
    let view = ctx
        .render_value(Some(&json!({
            "viewlistid": "Phenotypes_7",
            "object": "Phenotype",
            "object_id": 7,
            "cols_to_skip": ["diseaseid"],
            "search": {"diseaseid": 7},
        })))
        .unwrap();
    assert!(view.form.contains(r#"name="object_id" value="7""#));
    assert!(view.form.contains(r#"name="search_diseaseid" value="7""#));
}

#[test]
fn unsafe_list_id_is_rejected() {
    let mut ctx = ctx();
    let err = ctx
        .render(&ViewListSettings::new("a'b", "Individual"))
        .unwrap_err();
    assert!(matches!(
        err,
        ViewError::InvalidField {
            field: "viewlistid",
            ..
        }
    ));
}

#[test]
fn duplicate_list_id_on_one_page_is_rejected() {
    let mut ctx = ctx();
    ctx.view_individuals().unwrap();
    assert_eq!(
        ctx.view_individuals().unwrap_err(),
        ViewError::DuplicateListId {
            id: "Individuals".to_string()
        }
    );
    ctx.view_phenotypes("1").unwrap();
    ctx.view_phenotypes("2").unwrap();
    assert_eq!(ctx.rendered_ids().count(), 3);
}

#[test]
fn full_data_requires_gene_and_transcript() {
    let mut ctx = ctx();
    assert_eq!(
        ctx.view_full_data("", "00001").unwrap_err(),
        ViewError::MissingField { field: "gene" }
    );
    assert_eq!(
        ctx.view_full_data("IVD", "  ").unwrap_err(),
        ViewError::MissingField {
            field: "transcript_id"
        }
    );
    assert!(!ctx.assets_loaded());
}

#[test]
fn full_data_form_has_exactly_the_expected_fields() {
    let mut ctx = ctx();
    let view = ctx.view_full_data("IVD", "00001").unwrap();
    assert_eq!(
        hidden_names(&view.form),
        vec![
            "viewlistid",
            "object",
            "object_id",
            "id",
            "order",
            "skip[chromosome]",
            "search_transcriptid",
        ]
    );
    assert!(view.form.contains(r#"name="viewlistid" value="CustomVL_VIEW""#));
    assert!(view.form.contains(
        r#"name="object" value="VariantOnTranscript,VariantOnGenome,Screening,Individual""#
    ));
    assert!(view.form.contains(r#"name="object_id" value="IVD""#));
    assert!(view.form.contains(r#"name="id" value="00001""#));
    assert!(view.form.contains(r#"name="order" value="""#));
    assert!(view.form.contains(r#"name="skip[chromosome]" value="1""#));
    assert!(view.form.contains(r#"name="search_transcriptid" value="00001""#));
}

#[test]
fn individuals_form_has_no_skips_or_filters() {
    let mut ctx = ctx();
    let view = ctx.view_individuals().unwrap();
    assert_eq!(
        hidden_names(&view.form),
        vec!["viewlistid", "object", "order"]
    );
    assert!(view.form.contains(r#"name="object" value="Individual""#));
    assert!(!view.form.contains("skip["));
    assert!(!view.form.contains("search_"));
}

#[test]
fn phenotypes_list_id_carries_the_disease() {
    let settings = crate::requests::phenotypes("42").unwrap();
    assert_eq!(settings.viewlistid, "viewlistForm_Phenotypes_for_Disease_42");
    assert_eq!(settings.object_id, Some(ObjectScope::Single("42".to_string())));

    let mut ctx = ctx();
    let view = ctx.render(&settings).unwrap();
    assert!(view.form.contains(r#"name="skip[diseaseid]" value="1""#));
    assert!(view.form.contains(r#"name="skip[individualid]" value="1""#));
    assert!(view.form.contains(r#"name="search_diseaseid" value="42""#));
    assert!(view
        .script
        .contains("lovd_AJAX_viewListSubmit('viewlistForm_Phenotypes_for_Disease_42');"));
}

#[test]
fn phenotypes_require_disease_id() {
    assert_eq!(
        crate::requests::phenotypes("").unwrap_err(),
        ViewError::MissingField {
            field: "disease_id"
        }
    );
}

#[test]
fn form_placeholder_and_script_share_the_list_id() {
    let mut ctx = ctx();
    let view = ctx.view_individuals().unwrap();
    assert!(view.form.starts_with(
        r##"<form action="#" method="get" id="viewlistForm_Individuals" style="margin : 0px;" onsubmit="return false;">"##
    ));
    assert!(view.form.contains(
        r#"<div class="LOVD" id="viewlistDiv_Individuals"><img src="gfx/lovd_loading.gif" alt="Loading..."></div></form>"#
    ));
    assert!(view.script.contains("check_list['Individuals'] = [];"));
    assert!(view.script.contains("lovd_AJAX_viewListSubmit('Individuals');"));

    let html = view.to_html();
    let assets_at = html.find("inc-js.php").unwrap();
    let form_at = html.find("<form").unwrap();
    let script_at = html.find("check_list").unwrap();
    assert!(assets_at < form_at && form_at < script_at);
}

#[test]
fn filter_values_cannot_break_out_of_the_attribute() {
    let mut ctx = ctx();
    let settings = ViewListSettings::new("Search", "VariantOnGenome")
        .search("owner", r#""><script>alert(1)</script>"#);
    let view = ctx.render(&settings).unwrap();
    assert!(view.form.contains(
        r#"name="search_owner" value="&quot;&gt;&lt;script&gt;alert(1)&lt;/script&gt;""#
    ));
    assert!(!view.form.contains("<script>"));
}

#[test]
fn list_scope_is_comma_joined() {
    let mut ctx = ctx();
    let settings = ViewListSettings::new("Custom", "Custom_ViewList").with_object_id(vec![
        "VariantOnTranscript".to_string(),
        "VariantOnGenome".to_string(),
    ]);
    let view = ctx.render(&settings).unwrap();
    assert!(view
        .form
        .contains(r#"name="object_id" value="VariantOnTranscript,VariantOnGenome""#));
}

#[test]
fn json_output_carries_settings_and_markup() {
    let mut ctx = ctx();
    let settings = crate::requests::individuals();
    let rendered = ctx.render(&settings).unwrap();
    let records = vec![crate::output::OutputRecord { settings, rendered }];
    let bytes = crate::output::render(crate::output::OutputFormat::Json, ctx.endpoints(), &records);
    let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(value["views"][0]["settings"]["object"], "Individual");
    assert_eq!(value["views"][0]["rendered"]["viewlistid"], "Individuals");
    assert_eq!(
        value["endpoints"]["install_url"],
        "https://lovd.example/shared/"
    );
}

#[test]
fn output_format_parsing() {
    use crate::output::{infer_format_from_path, OutputFormat};
    assert_eq!(OutputFormat::parse(" HTML "), Some(OutputFormat::Html));
    assert_eq!(OutputFormat::parse("json"), Some(OutputFormat::Json));
    assert_eq!(OutputFormat::parse("xml"), None);
    assert_eq!(infer_format_from_path("page.htm"), Some(OutputFormat::Html));
    assert_eq!(infer_format_from_path("page.txt"), None);
}

#[test]
fn config_file_views_and_urls_load() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
install_url: https://lovd.example/shared/
base_url: https://static.example/
views:
  ivd:
    viewlistid: CustomVL_IVD
    object: VariantOnGenome
    object_id: [IVD, ACADM]
    id: 12
"#
    )
    .unwrap();
    let cfg = crate::config::load_config(&file.path().to_path_buf(), false).unwrap();
    assert_eq!(cfg.lovd_url.as_deref(), Some("https://static.example/"));
    let view = cfg.view("ivd").unwrap();
    assert_eq!(
        view.object_id,
        Some(ObjectScope::List(vec!["IVD".to_string(), "ACADM".to_string()]))
    );
    assert_eq!(view.id.as_deref(), Some("12"));
    assert!(matches!(
        cfg.view("missing"),
        Err(crate::config::ConfigError::UnknownView { .. })
    ));
}

#[test]
fn missing_config_is_optional_only_when_allowed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yml");
    assert!(crate::config::load_config(&path, true).is_ok());
    assert!(matches!(
        crate::config::load_config(&path, false),
        Err(crate::config::ConfigError::NotFound { .. })
    ));
}

#[test]
fn default_config_file_is_written_and_parses() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.yml");
    crate::config::ensure_default_config_file(&path).unwrap();
    let cfg = crate::config::load_config(&path, false).unwrap();
    assert_eq!(cfg.no_color, Some(false));
    assert!(cfg.views.is_empty());
}

#[test]
fn settings_file_must_be_a_mapping() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("view.json");
    std::fs::write(&path, r#"["not", "a", "mapping"]"#).unwrap();
    let err = crate::config::load_settings_file(&path).unwrap_err();
    assert!(matches!(
        err,
        crate::config::ConfigError::InvalidView {
            source: ViewError::NotAMapping { .. },
            ..
        }
    ));

    std::fs::write(&path, "").unwrap();
    let err = crate::config::load_settings_file(&path).unwrap_err();
    assert!(matches!(
        err,
        crate::config::ConfigError::InvalidView {
            source: ViewError::MissingSettings,
            ..
        }
    ));
}
