// Reporting and output for rfiscan
// Supports CSV, Markdown, and JSON export

use chrono::Local;
use std::fs::File;
use std::io::Write;

use crate::models::Finding;

/// Escape CSV field to prevent formula injection attacks
/// Cells starting with =, +, -, @, or tab are prefixed with single quote
fn escape_csv_field(field: &str) -> String {
    if field.is_empty() {
        return String::new();
    }

    let first_char = field.chars().next().unwrap();
    let needs_escaping = matches!(first_char, '=' | '+' | '-' | '@' | '\t');

    if needs_escaping || field.contains(',') || field.contains('"') {
        if needs_escaping {
            format!("\"'{}\"", field.replace('"', "\"\""))
        } else {
            format!("\"{}\"", field.replace('"', "\"\""))
        }
    } else {
        field.to_string()
    }
}

pub fn export_csv(findings: &[Finding]) -> Result<String, std::io::Error> {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let filename = format!("rfiscan_report_{}.csv", timestamp);
    let mut file = File::create(&filename)?;

    writeln!(file, "URL,Parameter,Evasion,InclusionURL")?;
    for finding in findings {
        writeln!(
            file,
            "{},{},{},{}",
            escape_csv_field(&finding.url),
            escape_csv_field(&finding.param),
            finding.evasion,
            escape_csv_field(&finding.inclusion_url)
        )?;
    }

    Ok(filename)
}

pub fn export_markdown(findings: &[Finding]) -> Result<String, std::io::Error> {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let filename = format!("rfiscan_report_{}.md", timestamp);
    let mut file = File::create(&filename)?;

    writeln!(file, "# rfiscan Report\n")?;
    for finding in findings {
        writeln!(
            file,
            "- **{}** param `{}` evasion `{}`: `{}`",
            finding.url, finding.param, finding.evasion, finding.inclusion_url
        )?;
    }

    Ok(filename)
}

pub fn export_json(findings: &[Finding]) -> Result<String, std::io::Error> {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let filename = format!("rfiscan_report_{}.json", timestamp);
    let file = File::create(&filename)?;

    serde_json::to_writer_pretty(file, findings)?;

    Ok(filename)
}
