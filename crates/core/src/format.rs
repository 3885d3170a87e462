use std::time::Duration;

use crate::workflow::Analysis;

/// Format a duration as `4.2s` or `3m 12s`
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        let whole = d.as_secs();
        format!("{}m {}s", whole / 60, whole % 60)
    }
}

/// Format an analysis as markdown
pub fn format_analysis(analysis: &Analysis) -> String {
    let mut output = String::new();
    output.push_str("# Analysis Result\n\n");
    output.push_str(&format!(
        "**Video:** {} | **Model:** {}\n\n",
        analysis.display_name, analysis.model
    ));
    output.push_str(analysis.content.trim_end());
    output.push('\n');
    output
}
