//! Canned view-list requests for the pages that embed remote LOVD data.
//!
//! None of these check whether the gene, transcript or disease exists on the
//! remote side. When it doesn't, the remote engine just shows an empty list.

use crate::view::{ViewError, ViewListSettings};

pub const FULL_DATA_VIEWLIST_ID: &str = "CustomVL_VIEW";
pub const FULL_DATA_OBJECTS: &str = "VariantOnTranscript,VariantOnGenome,Screening,Individual";

pub const INDIVIDUALS_VIEWLIST_ID: &str = "Individuals";
pub const INDIVIDUAL_OBJECT: &str = "Individual";

pub const PHENOTYPES_VIEWLIST_PREFIX: &str = "viewlistForm_Phenotypes_for_Disease_";
pub const PHENOTYPE_OBJECT: &str = "Phenotype";

fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str, ViewError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ViewError::MissingField { field });
    }
    Ok(value)
}

/// The "full data view" of one gene, restricted to one transcript (its
/// internal id on the remote LOVD).
pub fn full_data(gene: &str, transcript_id: &str) -> Result<ViewListSettings, ViewError> {
    let gene = required(gene, "gene")?;
    let transcript_id = required(transcript_id, "transcript_id")?;

    Ok(ViewListSettings::new(FULL_DATA_VIEWLIST_ID, FULL_DATA_OBJECTS)
        .with_object_id(gene)
        .with_id(transcript_id)
        .skip_column("chromosome")
        .search("transcriptid", transcript_id))
}

pub fn individuals() -> ViewListSettings {
    ViewListSettings::new(INDIVIDUALS_VIEWLIST_ID, INDIVIDUAL_OBJECT)
}

/// Phenotypes of one disease. The list id carries the disease id so several
/// diseases can be shown on the same page.
pub fn phenotypes(disease_id: &str) -> Result<ViewListSettings, ViewError> {
    let disease_id = required(disease_id, "disease_id")?;

    Ok(ViewListSettings::new(
        format!("{PHENOTYPES_VIEWLIST_PREFIX}{disease_id}"),
        PHENOTYPE_OBJECT,
    )
    .with_object_id(disease_id)
    .skip_column("diseaseid")
    .skip_column("individualid")
    .search("diseaseid", disease_id))
}
