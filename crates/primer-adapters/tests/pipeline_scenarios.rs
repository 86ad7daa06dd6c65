//! End-to-end pipeline tests over the real adapters.

use std::{fs, path::Path, sync::Arc};

use primer_adapters::{InMemoryStore, LocalFilesystem, MarkerRenderer, MemoryFilesystem};
use primer_core::{
    application::ports::TemplateRenderer,
    domain::{ProjectType, Router, Template, TemplateId},
    prelude::*,
};
use regex::Regex;
use tempfile::TempDir;

fn local_service() -> GenerateService {
    GenerateService::new(
        Arc::new(LocalFilesystem::new()),
        Arc::new(InMemoryStore::with_builtin().unwrap()),
        Arc::new(MarkerRenderer::new()),
    )
    .unwrap()
}

/// A `demo/` directory inside a temp root, so the project name is stable.
fn demo_dir(temp: &TempDir) -> std::path::PathBuf {
    let dir = temp.path().join("demo");
    fs::create_dir(&dir).unwrap();
    dir
}

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

// ── Scenario A: Next.js app router ──────────────────────────────────────────

#[test]
fn nextjs_app_router_renders_nextjs_template() {
    let temp = TempDir::new().unwrap();
    let dir = demo_dir(&temp);
    write(
        &dir,
        "package.json",
        r#"{"name":"demo","dependencies":{"next":"14.2.5","react":"18.3.1"}}"#,
    );
    fs::create_dir(dir.join("app")).unwrap();

    let service = local_service();
    let descriptor = service.scan(&dir).unwrap();
    assert_eq!(descriptor.project_type, ProjectType::Nextjs);
    assert_eq!(descriptor.framework.router, Some(Router::App));
    assert_eq!(descriptor.framework.version.as_deref(), Some("14.2.5"));
    assert!((descriptor.confidence - 0.95).abs() < f64::EPSILON);

    let report = service
        .run(GenerationRequest::new(&dir).dry_run(true))
        .unwrap();
    assert!(report.success, "errors: {:?}", report.errors);
    assert_eq!(report.template_id, TemplateId::new("nextjs"));

    let preview = report.preview.unwrap();
    assert!(preview.starts_with("# demo\n"));
    assert!(!preview.contains("{{PROJECT_NAME}}"));
    assert!(preview.contains("Routes live under `app/`"));
    assert!(!dir.join("AGENTS.md").exists(), "dry run must not write");
}

#[test]
fn confidence_grows_with_rule_specificity() {
    let service = local_service();
    let confidence = |package_json: &str, app_dir: bool| {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "package.json", package_json);
        if app_dir {
            fs::create_dir(temp.path().join("app")).unwrap();
        }
        service.scan(temp.path()).unwrap().confidence
    };

    let app = confidence(r#"{"dependencies":{"next":"14.2.5"}}"#, true);
    let unknown_router = confidence(r#"{"dependencies":{"next":"14.2.5"}}"#, false);
    let plain_node = confidence(r#"{"dependencies":{"lodash":"4.17.21"}}"#, false);

    assert!(app >= unknown_router);
    assert!(unknown_router >= plain_node);
    assert!((0.0..=1.0).contains(&plain_node));
}

// ── Scenario B: empty directory ─────────────────────────────────────────────

#[test]
fn empty_directory_falls_back_to_generic() {
    let temp = TempDir::new().unwrap();
    let dir = demo_dir(&temp);
    let service = local_service();

    let descriptor = service.scan(&dir).unwrap();
    assert_eq!(descriptor.project_type, ProjectType::Unknown);
    assert_eq!(descriptor.confidence, 0.0);

    let report = service
        .run(GenerationRequest::new(&dir).dry_run(true))
        .unwrap();
    assert!(report.success);
    assert_eq!(report.template_id, TemplateId::generic());
}

#[test]
fn missing_directory_is_fatal() {
    let temp = TempDir::new().unwrap();
    let err = local_service()
        .run(GenerationRequest::new(temp.path().join("nope")))
        .unwrap_err();
    assert!(err.to_string().contains("nope"));
}

// ── Scenario C: unresolved placeholder ──────────────────────────────────────

#[test]
fn unresolved_placeholder_blocks_the_write() {
    let temp = TempDir::new().unwrap();
    let dir = demo_dir(&temp);

    let store = InMemoryStore::new();
    store
        .insert(
            Template::builder()
                .id(TemplateId::generic())
                .body("# {{PROJECT_NAME}}\n\nOwner: {{UNSET_VAR}}\n")
                .build()
                .unwrap(),
        )
        .unwrap();
    let service = GenerateService::new(
        Arc::new(LocalFilesystem::new()),
        Arc::new(store),
        Arc::new(MarkerRenderer::new()),
    )
    .unwrap();

    let report = service.run(GenerationRequest::new(&dir)).unwrap();
    assert!(!report.success);
    assert!(
        report
            .errors
            .iter()
            .any(|e| e == "Unresolved placeholder: {{UNSET_VAR}}"),
        "errors: {:?}",
        report.errors
    );
    assert!(report.written_files.is_empty());
    assert_eq!(fs::read_dir(&dir).unwrap().count(), 0);
}

// ── Scenario D: backups ─────────────────────────────────────────────────────

#[test]
fn existing_document_is_backed_up_before_overwrite() {
    let temp = TempDir::new().unwrap();
    let dir = demo_dir(&temp);
    write(&dir, "AGENTS.md", "# Hand written\n");
    write(&dir, ".gitignore", "target/\n");

    let report = local_service().run(GenerationRequest::new(&dir)).unwrap();
    assert!(report.success, "errors: {:?}", report.errors);
    assert_eq!(report.written_files, vec!["AGENTS.md", "CONVENTIONS.md"]);
    assert_eq!(report.backup_files.len(), 1);

    let backup_name = Regex::new(r"^AGENTS\.md\.backup\.\d{8}-\d{6}(-\d+)?$").unwrap();
    assert!(backup_name.is_match(&report.backup_files[0]));
    assert_eq!(
        fs::read_to_string(dir.join(&report.backup_files[0])).unwrap(),
        "# Hand written\n"
    );
    assert!(fs::read_to_string(dir.join("AGENTS.md")).unwrap().starts_with("# demo"));

    let ignore = fs::read_to_string(dir.join(".gitignore")).unwrap();
    assert!(ignore.starts_with("target/\n"));
    assert!(ignore.contains("AGENTS.md.backup.*"));
    assert!(ignore.contains("CONVENTIONS.md.backup.*"));
    assert!(report.ignore_updated);
}

#[test]
fn ignore_file_is_not_created_without_backups() {
    let temp = TempDir::new().unwrap();
    let dir = demo_dir(&temp);

    let report = local_service()
        .run(GenerationRequest::new(&dir).preferences(Preferences::default().with_secondary(false)))
        .unwrap();
    assert!(report.success);
    assert_eq!(report.written_files, vec!["AGENTS.md"]);
    assert!(!dir.join(".gitignore").exists());
    assert!(!dir.join("CONVENTIONS.md").exists());
}

#[test]
fn failed_write_restores_original_bytes() {
    let fs = MemoryFilesystem::new();
    fs.add_file("/work/demo/AGENTS.md", "original \u{2713}\r\n");
    fs.fail_next_write_to("/work/demo/AGENTS.md");

    let service = GenerateService::new(
        Arc::new(fs.clone()),
        Arc::new(InMemoryStore::with_builtin().unwrap()),
        Arc::new(MarkerRenderer::new()),
    )
    .unwrap();

    let report = service.run(GenerationRequest::new("/work/demo")).unwrap();
    assert!(!report.success);
    assert!(report.errors[0].starts_with("Writing AGENTS.md failed"));
    assert!(report.warnings.iter().any(|w| w.starts_with("Restored AGENTS.md from")));

    assert_eq!(
        fs.read_file(Path::new("/work/demo/AGENTS.md")).as_deref(),
        Some("original \u{2713}\r\n")
    );
    assert!(fs.read_file(Path::new("/work/demo/CONVENTIONS.md")).is_none());
    assert_eq!(report.backup_files.len(), 1);
}

#[test]
fn failed_secondary_write_restores_both_documents() {
    let fs = MemoryFilesystem::new();
    fs.add_file("/work/demo/AGENTS.md", "original primary\n");
    fs.add_file("/work/demo/CONVENTIONS.md", "original conventions\n");
    fs.fail_next_write_to("/work/demo/CONVENTIONS.md");

    let service = GenerateService::new(
        Arc::new(fs.clone()),
        Arc::new(InMemoryStore::with_builtin().unwrap()),
        Arc::new(MarkerRenderer::new()),
    )
    .unwrap();

    let report = service.run(GenerationRequest::new("/work/demo")).unwrap();
    assert!(!report.success);
    assert!(report.validated);
    assert!(report.errors[0].starts_with("Writing CONVENTIONS.md failed"));
    assert!(report.written_files.is_empty());
    assert!(report.warnings.iter().any(|w| w.starts_with("Restored AGENTS.md from")));
    assert!(report.warnings.iter().any(|w| w.starts_with("Restored CONVENTIONS.md from")));

    assert_eq!(
        fs.read_file(Path::new("/work/demo/AGENTS.md")).as_deref(),
        Some("original primary\n")
    );
    assert_eq!(
        fs.read_file(Path::new("/work/demo/CONVENTIONS.md")).as_deref(),
        Some("original conventions\n")
    );

    assert_eq!(report.backup_files.len(), 2);
    let ignore = fs.read_file(Path::new("/work/demo/.gitignore")).unwrap();
    assert!(ignore.contains("AGENTS.md.backup.*"));
    assert!(ignore.contains("CONVENTIONS.md.backup.*"));
}

#[test]
fn failed_secondary_write_removes_new_primary() {
    let fs = MemoryFilesystem::new();
    fs.add_dir("/work/demo");
    fs.fail_next_write_to("/work/demo/CONVENTIONS.md");

    let service = GenerateService::new(
        Arc::new(fs.clone()),
        Arc::new(InMemoryStore::with_builtin().unwrap()),
        Arc::new(MarkerRenderer::new()),
    )
    .unwrap();

    let report = service.run(GenerationRequest::new("/work/demo")).unwrap();
    assert!(!report.success);
    assert!(report.backup_files.is_empty());
    assert!(fs.read_file(Path::new("/work/demo/AGENTS.md")).is_none());
    assert!(fs.read_file(Path::new("/work/demo/.gitignore")).is_none());
}

// ── Properties ──────────────────────────────────────────────────────────────

#[test]
fn render_round_trip_and_conditional_drop() {
    let renderer = MarkerRenderer::new();
    let mut vars = Variables::new();
    vars.try_set("X", "v").unwrap();
    vars.try_set("FLAG", false).unwrap();

    let once = renderer.render("a {{X}} b", &vars);
    assert_eq!(once, "a v b");
    assert_eq!(renderer.render(&once, &vars), once);

    assert_eq!(renderer.render("{{#IF FLAG}}body{{/IF}}", &vars), "");
    vars.try_set("FLAG", true).unwrap();
    assert_eq!(renderer.render("{{#IF FLAG}}body{{/IF}}", &vars), "body");
}

#[test]
fn github_token_is_detected_once_and_redacted() {
    let guard = SecretGuard::default();
    let token = format!("ghp_{}", "a1B2c3D4e5F6g7H8i9J0k1L2m3N4o5P6q7R8s9T0");
    let text = format!("export GH={token}\n");

    let findings = guard.detect_secrets(&text, false);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].severity, primer_core::domain::Severity::Critical);
    assert!(!guard.redact_secrets(&text).contains(&token));
}

#[test]
fn traversal_is_rejected() {
    use primer_core::domain::{PathOperation, security::has_path_traversal};

    let guard = PathGuard::new(&PathPolicy::for_outputs(&["AGENTS.md"])).unwrap();
    assert!(!guard.is_path_allowed("../../etc/passwd", PathOperation::Read));
    assert!(has_path_traversal("..%2f..%2fetc"));
}
