//! Content Validator - last check before anything touches the disk.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;
use tracing::{debug, instrument};

use crate::domain::{RenderedContent, SecretGuard, ValidationResult};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{[^{}]*\}\}").expect("valid regex literal"));

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Also report medium-severity secret findings, as warnings.
    pub strict: bool,
}

pub struct ContentValidator {
    secrets: SecretGuard,
    options: ValidationOptions,
}

impl ContentValidator {
    pub fn new(secrets: SecretGuard, options: ValidationOptions) -> Self {
        Self { secrets, options }
    }

    #[instrument(skip_all, fields(template = %rendered.metadata.template_id, strict = self.options.strict))]
    pub fn validate(&self, rendered: RenderedContent) -> ValidationResult {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        let mut texts = vec![("primary", rendered.primary.as_str())];
        if let Some(secondary) = &rendered.secondary {
            texts.push(("secondary", secondary.as_str()));
        }

        for (label, text) in &texts {
            self.check_secrets(label, text, &mut errors, &mut warnings);
        }

        for section in missing_sections(&rendered.primary, &rendered.metadata.required_sections) {
            errors.push(format!("Missing required section: {}", section));
        }
        if let Some(secondary) = &rendered.secondary {
            let required = &rendered.metadata.secondary_required_sections;
            for section in missing_sections(secondary, required) {
                errors.push(format!(
                    "Missing required section in secondary document: {}",
                    section
                ));
            }
        }

        let mut unresolved = BTreeSet::new();
        for (_, text) in &texts {
            for token in PLACEHOLDER.find_iter(text) {
                unresolved.insert(token.as_str().to_string());
            }
        }
        errors.extend(
            unresolved
                .into_iter()
                .map(|token| format!("Unresolved placeholder: {}", token)),
        );

        for (label, text) in &texts {
            warnings.extend(heading_jumps(text).into_iter().map(|(line, from, to)| {
                format!(
                    "Heading level jumps from {} to {} on line {} of the {} document",
                    from, to, line, label
                )
            }));
        }

        debug!(errors = errors.len(), warnings = warnings.len(), "Validation finished");
        ValidationResult::new(rendered, errors, warnings)
    }

    fn check_secrets(
        &self,
        label: &str,
        text: &str,
        errors: &mut Vec<String>,
        warnings: &mut Vec<String>,
    ) {
        for finding in self.secrets.detect_secrets(text, self.options.strict) {
            let message = format!("{} in {} document", finding.describe(), label);
            if finding.severity.is_blocking() {
                errors.push(message);
            } else {
                warnings.push(message);
            }
        }
    }
}

fn missing_sections<'a>(text: &str, required: &'a [String]) -> Vec<&'a str> {
    required
        .iter()
        .filter(|section| !text.lines().any(|line| line.trim_end() == section.as_str()))
        .map(String::as_str)
        .collect()
}

/// `(line, previous level, level)` for each heading that skips a level.
///
/// Headings inside fenced code blocks are ignored.
pub fn heading_jumps(text: &str) -> Vec<(usize, usize, usize)> {
    let mut jumps = Vec::new();
    let mut in_fence = false;
    let mut previous: Option<usize> = None;

    for (idx, line) in text.lines().enumerate() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        let Some(level) = heading_level(line) else {
            continue;
        };
        if let Some(prev) = previous {
            if level > prev + 1 {
                jumps.push((idx + 1, prev, level));
            }
        }
        previous = Some(level);
    }
    jumps
}

fn heading_level(line: &str) -> Option<usize> {
    let hashes = line.chars().take_while(|c| *c == '#').count();
    if !(1..=6).contains(&hashes) {
        return None;
    }
    match line[hashes..].chars().next() {
        None | Some(' ') | Some('\t') => Some(hashes),
        _ => None,
    }
}
