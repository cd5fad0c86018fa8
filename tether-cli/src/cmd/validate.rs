use std::path::{Path, PathBuf};

use serde::Serialize;
use tether_core::{parse_request_str, DocumentFormat, Validate};

use crate::exit_codes;
use crate::output::{print_error, print_result, OutputFormat};
use crate::OutputArgs;

#[derive(Serialize)]
struct ValidateResult {
    path: String,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
}

/// Validates one request document, or every document under `<dir>/requests`.
pub async fn validate_cmd(path: &Path, output: OutputArgs) -> i32 {
    let files = match collect_files(path) {
        Ok(f) => f,
        Err(e) => {
            print_error(output.format, output.quiet, &e);
            return exit_codes::RUNTIME_ERROR;
        }
    };

    let mut results = Vec::with_capacity(files.len());
    for file in &files {
        match validate_file(file) {
            Ok(r) => results.push(r),
            Err(e) => {
                print_error(output.format, output.quiet, &e);
                return exit_codes::RUNTIME_ERROR;
            }
        }
    }

    let all_valid = results.iter().all(|r| r.valid);
    if output.format == OutputFormat::Text && !output.quiet {
        for r in &results {
            if r.valid {
                println!("ok: {}", r.path);
            } else {
                eprintln!("error: {} failed validation", r.path);
                for e in &r.errors {
                    eprintln!("- {e}");
                }
            }
        }
    } else {
        print_result(output.format, output.quiet, &results);
    }

    if all_valid {
        exit_codes::SUCCESS
    } else {
        exit_codes::VALIDATION_FAILED
    }
}

fn collect_files(path: &Path) -> Result<Vec<PathBuf>, String> {
    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }
    let dir = path.join("requests");
    let entries = std::fs::read_dir(&dir).map_err(|e| format!("failed to read {}: {e}", dir.display()))?;
    let mut files: Vec<PathBuf> = entries
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| {
            matches!(
                p.extension().and_then(|e| e.to_str()),
                Some("yaml" | "yml" | "json")
            )
        })
        .collect();
    files.sort();
    Ok(files)
}

fn validate_file(path: &Path) -> Result<ValidateResult, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    let display = path.display().to_string();

    let parsed = match parse_request_str(&content, DocumentFormat::Auto) {
        Ok(p) => p,
        Err(e) => {
            return Ok(ValidateResult {
                path: display,
                valid: false,
                request_id: None,
                errors: vec![e.to_string()],
            })
        }
    };

    let errors = match parsed.document.validate() {
        Ok(()) => Vec::new(),
        Err(err) => err
            .violations
            .iter()
            .map(|v| format!("{}: {}", v.path, v.message))
            .collect(),
    };
    Ok(ValidateResult {
        path: display,
        valid: errors.is_empty(),
        request_id: Some(parsed.document.meta.id),
        errors,
    })
}
