use std::fmt::Write;

use serde::Serialize;

use super::scan::{FileReport, FileStatus, ScanResult, ScanSummary};
use super::OutputFormat;
use crate::config::ExtensionTable;
use crate::model::{ClassInfo, Declaration, ModifierSet};

const INDENT: &str = "  ";

/// Format any serializable value as JSON.
pub fn format_json<T: Serialize>(value: &T, format: &OutputFormat) -> String {
    match format {
        OutputFormat::Compact => serde_json::to_string(value).unwrap_or_default(),
        OutputFormat::Json | OutputFormat::Text => {
            serde_json::to_string_pretty(value).unwrap_or_default()
        }
    }
}

pub fn format_scan(result: &ScanResult, format: &OutputFormat) -> String {
    match format {
        OutputFormat::Json | OutputFormat::Compact => format_json(result, format),
        OutputFormat::Text => {
            let mut output = String::new();
            for report in &result.files {
                write_report(&mut output, report);
            }
            output.push_str(&format_summary(&result.summary, result.duration_ms));
            output
        }
    }
}

fn write_report(out: &mut String, report: &FileReport) {
    match &report.status {
        FileStatus::Extracted { classes, recovered } => {
            let _ = writeln!(out, "{}", report.path);
            for error in recovered {
                let _ = writeln!(out, "{}recovered from {}", INDENT, error);
            }
            for class in classes {
                write_class(out, class, 1);
            }
        }
        FileStatus::SyntaxFailed { errors } => {
            let _ = writeln!(out, "{} (syntax errors)", report.path);
            for error in errors {
                let _ = writeln!(out, "{}{}", INDENT, error);
            }
        }
        FileStatus::Error { message } => {
            let _ = writeln!(out, "{} (error: {})", report.path, message);
        }
    }
}

/// One line per declaration, nested members indented under their class.
fn write_class(out: &mut String, class: &ClassInfo, depth: usize) {
    let pad = INDENT.repeat(depth);
    let _ = writeln!(
        out,
        "{}{}{} {}  (line {})",
        pad,
        modifier_prefix(&class.modifiers),
        class.kind,
        class.name.short_name(),
        class.line_span.start.line,
    );
    let pad = INDENT.repeat(depth + 1);
    for child in class.children() {
        match child {
            Declaration::Class(nested) => write_class(out, nested, depth + 1),
            Declaration::Method(method) => {
                let _ = writeln!(
                    out,
                    "{}{}{}",
                    pad,
                    modifier_prefix(&method.modifiers),
                    method.name.signature()
                );
            }
            Declaration::Field(field) => {
                let _ = writeln!(
                    out,
                    "{}{}{}:{}",
                    pad,
                    modifier_prefix(&field.modifiers),
                    field.name.name,
                    field.name.type_signature
                );
            }
        }
    }
}

fn modifier_prefix(modifiers: &ModifierSet) -> String {
    if modifiers.is_empty() {
        String::new()
    } else {
        format!("{} ", modifiers)
    }
}

pub fn format_summary(summary: &ScanSummary, duration_ms: u128) -> String {
    format!(
        "Scanned {} files: {} extracted, {} with syntax errors, {} failed; {} classes, {} methods, {} fields ({}ms)\n",
        summary.files,
        summary.extracted,
        summary.syntax_failed,
        summary.errors,
        summary.classes,
        summary.methods,
        summary.fields,
        duration_ms,
    )
}

pub fn format_extensions(table: &ExtensionTable, format: &OutputFormat) -> String {
    match format {
        OutputFormat::Json | OutputFormat::Compact => format_json(table, format),
        OutputFormat::Text => {
            let implemented: Vec<String> = table
                .implemented
                .iter()
                .map(|(ext, language)| format!("{} ({})", ext, language))
                .collect();
            let planned: Vec<&str> = table.planned.iter().map(String::as_str).collect();
            let non_source: Vec<&str> = table.non_source.iter().map(String::as_str).collect();
            format!(
                "implemented: {}\nplanned:     {}\nnon-source:  {}\n",
                implemented.join(", "),
                planned.join(" "),
                non_source.join(" "),
            )
        }
    }
}
