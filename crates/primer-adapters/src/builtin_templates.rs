//! Built-in templates.
//!
//! Every template under `templates/` is embedded at compile time with
//! `include_str!` and parsed through the same manifest code path as user
//! templates, so the binary never depends on files next to it.
//!
//! | id            | used for                        |
//! |---------------|---------------------------------|
//! | `nextjs`      | nextjs                          |
//! | `react`       | react-vite, react, vite         |
//! | `fastapi`     | fastapi, python                 |
//! | `django`      | django, flask                   |
//! | `go`          | go, rust                        |
//! | `generic`     | nodejs, unknown, and fallback   |
//! | `conventions` | secondary `CONVENTIONS.md`      |

use tracing::{debug, instrument};

use primer_core::domain::{DomainError, Template};

use crate::template_loader::TemplateManifest;

/// (directory, manifest, body)
const EMBEDDED: &[(&str, &str, &str)] = &[
    (
        "conventions",
        include_str!("../templates/conventions/template.toml"),
        include_str!("../templates/conventions/body.md"),
    ),
    (
        "django",
        include_str!("../templates/django/template.toml"),
        include_str!("../templates/django/body.md"),
    ),
    (
        "fastapi",
        include_str!("../templates/fastapi/template.toml"),
        include_str!("../templates/fastapi/body.md"),
    ),
    (
        "generic",
        include_str!("../templates/generic/template.toml"),
        include_str!("../templates/generic/body.md"),
    ),
    (
        "go",
        include_str!("../templates/go/template.toml"),
        include_str!("../templates/go/body.md"),
    ),
    (
        "nextjs",
        include_str!("../templates/nextjs/template.toml"),
        include_str!("../templates/nextjs/body.md"),
    ),
    (
        "react",
        include_str!("../templates/react/template.toml"),
        include_str!("../templates/react/body.md"),
    ),
];

/// Parse every embedded template.
///
/// # Errors
///
/// Returns [`DomainError::InvalidTemplate`] if an embedded manifest does not
/// parse, which only happens when the shipped files are broken.
#[instrument]
pub fn all_templates() -> Result<Vec<Template>, DomainError> {
    let templates = EMBEDDED
        .iter()
        .map(|(dir, manifest, body)| {
            TemplateManifest::parse(manifest, &format!("builtin:{dir}/template.toml"))?
                .into_template(*body)
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!(count = templates.len(), "Parsed built-in templates");
    Ok(templates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use primer_core::domain::SecretGuard;

    #[test]
    fn every_builtin_parses() {
        let templates = all_templates().unwrap();
        assert_eq!(templates.len(), EMBEDDED.len());
    }

    #[test]
    fn directory_matches_id() {
        for ((dir, _, _), template) in EMBEDDED.iter().zip(all_templates().unwrap()) {
            assert_eq!(template.id.as_str(), *dir);
        }
    }

    #[test]
    fn required_sections_appear_in_body() {
        for template in all_templates().unwrap() {
            for section in &template.required_sections {
                assert!(
                    template.body.lines().any(|line| line.trim_end() == section),
                    "{} is missing {}",
                    template.id,
                    section
                );
            }
        }
    }

    #[test]
    fn bodies_contain_nothing_secret_like() {
        let guard = SecretGuard::default();
        for template in all_templates().unwrap() {
            let findings = guard.detect_secrets(&template.body, true);
            assert!(findings.is_empty(), "{}: {:?}", template.id, findings);
        }
    }
}
