//! Visualization module: in-memory charts for the analysis payload.

pub mod chart;
pub use chart::{encode_base64, render_grouped_bars, GroupedCounts};

use crate::error::Result;

/// Payload key of the survival-by-sex chart
pub const SEX_SURVIVAL_CHART: &str = "sex_survival";

/// Group label for a predicted class
pub fn outcome_label(class: u8) -> &'static str {
    if class == 1 {
        "Survived (1)"
    } else {
        "Deceased (0)"
    }
}

/// Count of rows per raw sex value, split by predicted class, as a
/// base64-encoded SVG. Without predictions every row lands in one
/// "No prediction" group.
pub fn sex_survival_chart(sex_values: &[Option<String>], classes: Option<&[u8]>) -> Result<String> {
    let categories: Vec<String> = sex_values
        .iter()
        .map(|v| v.clone().unwrap_or_else(|| "unknown".to_string()))
        .collect();

    let groups: Vec<String> = match classes {
        Some(classes) => classes.iter().map(|c| outcome_label(*c).to_string()).collect(),
        None => vec!["No prediction".to_string(); categories.len()],
    };

    let counts = GroupedCounts::tally(&categories, &groups)?;
    let svg = render_grouped_bars("Survival Count by Gender", "Sex", &counts)?;
    Ok(encode_base64(svg.as_bytes()))
}
