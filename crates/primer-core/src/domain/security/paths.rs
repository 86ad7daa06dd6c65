//! Read and write allow/deny policy for project-relative paths.

use glob::Pattern;
use std::path::Path;

use crate::domain::error::DomainError;
use crate::domain::value_objects::PathOperation;

/// Name of the ignore-list file the writer maintains.
pub const IGNORE_FILE: &str = ".gitignore";

/// Glob lists for both directions. Read and write lists are independent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPolicy {
    pub read_allow: Vec<String>,
    pub read_deny: Vec<String>,
    pub write_allow: Vec<String>,
    pub write_deny: Vec<String>,
}

impl PathPolicy {
    /// Default policy: read anything except credential material, write only
    /// the named outputs, their backups and the ignore file.
    pub fn for_outputs(output_names: &[&str]) -> Self {
        let mut write_allow = Vec::with_capacity(output_names.len() * 2 + 1);
        for name in output_names {
            write_allow.push((*name).to_string());
            write_allow.push(format!("{}.backup.*", name));
        }
        write_allow.push(IGNORE_FILE.to_string());

        Self {
            read_allow: vec!["*".into()],
            read_deny: [
                ".env", ".env.*", "*.pem", "*.key", "*.p12", "*.pfx", "id_rsa", "id_dsa",
                "id_ecdsa", "id_ed25519", ".ssh", ".aws", ".gnupg", ".netrc", ".npmrc", ".pypirc",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            write_allow,
            write_deny: [".git", ".env", ".env.*", ".ssh", "node_modules", "target", "vendor"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

struct CompiledLists {
    allow: Vec<Pattern>,
    deny: Vec<Pattern>,
}

fn compile(patterns: &[String]) -> Result<Vec<Pattern>, DomainError> {
    patterns
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|e| DomainError::InvalidPathPattern {
                pattern: p.clone(),
                reason: e.to_string(),
            })
        })
        .collect()
}

/// Checks paths against a compiled [`PathPolicy`].
pub struct PathGuard {
    read: CompiledLists,
    write: CompiledLists,
}

impl std::fmt::Debug for PathGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathGuard")
            .field("read_allow", &self.read.allow.len())
            .field("write_allow", &self.write.allow.len())
            .finish()
    }
}

impl PathGuard {
    pub fn new(policy: &PathPolicy) -> Result<Self, DomainError> {
        Ok(Self {
            read: CompiledLists {
                allow: compile(&policy.read_allow)?,
                deny: compile(&policy.read_deny)?,
            },
            write: CompiledLists {
                allow: compile(&policy.write_allow)?,
                deny: compile(&policy.write_deny)?,
            },
        })
    }

    /// Decide whether `op` may touch `path`.
    ///
    /// Order: traversal check, deny globs, allow globs, default deny. A deny
    /// glob wins on the whole path or any single component. An allow glob
    /// passes on the whole path, any trailing sub-path, or any component.
    pub fn is_path_allowed(&self, path: impl AsRef<Path>, op: PathOperation) -> bool {
        let normalized = path.as_ref().to_string_lossy().replace('\\', "/");
        if normalized.is_empty() || has_path_traversal(&normalized) {
            return false;
        }

        let lists = match op {
            PathOperation::Read => &self.read,
            PathOperation::Write => &self.write,
        };
        let components: Vec<&str> = normalized
            .split('/')
            .filter(|c| !c.is_empty() && *c != ".")
            .collect();

        let denied = lists.deny.iter().any(|p| {
            p.matches(&normalized) || components.iter().any(|c| p.matches(c))
        });
        if denied {
            return false;
        }

        lists.allow.iter().any(|p| {
            p.matches(&normalized)
                || (0..components.len()).any(|i| p.matches(&components[i..].join("/")))
                || components.iter().any(|c| p.matches(c))
        })
    }
}

/// Whether `path` contains a `..` segment as written or after one or two
/// rounds of percent-decoding.
pub fn has_path_traversal(path: &str) -> bool {
    let once = percent_decode(path);
    let twice = percent_decode(&once);
    [path, once.as_str(), twice.as_str()]
        .iter()
        .any(|candidate| candidate.split(['/', '\\']).any(|seg| seg == ".."))
}

fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hex = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2]));
            if let (Some(hi), Some(lo)) = hex {
                out.push((hi << 4) | lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guard() -> PathGuard {
        PathGuard::new(&PathPolicy::for_outputs(&["AGENTS.md", "CONVENTIONS.md"])).unwrap()
    }

    #[test]
    fn plain_traversal() {
        assert!(has_path_traversal("../etc/passwd"));
        assert!(has_path_traversal("a/../../b"));
        assert!(has_path_traversal("..\\windows"));
        assert!(!has_path_traversal("a/b..c/d"));
        assert!(!has_path_traversal("./AGENTS.md"));
    }

    #[test]
    fn encoded_traversal() {
        assert!(has_path_traversal("%2e%2e/secret"));
        assert!(has_path_traversal("%2E%2E%2Fsecret"));
        assert!(has_path_traversal("..%5cwindows"));
        assert!(has_path_traversal("%252e%252e%252fsecret"));
    }

    #[test]
    fn triple_encoding_is_not_decoded() {
        assert!(!has_path_traversal("%25252e%25252e/x"));
    }

    #[test]
    fn writes_limited_to_outputs() {
        let g = guard();
        assert!(g.is_path_allowed("AGENTS.md", PathOperation::Write));
        assert!(g.is_path_allowed("CONVENTIONS.md", PathOperation::Write));
        assert!(g.is_path_allowed("AGENTS.md.backup.20260101-120000", PathOperation::Write));
        assert!(g.is_path_allowed(".gitignore", PathOperation::Write));
        assert!(!g.is_path_allowed("README.md", PathOperation::Write));
        assert!(!g.is_path_allowed("src/main.rs", PathOperation::Write));
    }

    #[test]
    fn deny_beats_allow() {
        let g = guard();
        assert!(!g.is_path_allowed(".git/AGENTS.md", PathOperation::Write));
        assert!(!g.is_path_allowed("node_modules/AGENTS.md", PathOperation::Write));
    }

    #[test]
    fn traversal_is_denied_for_both_directions() {
        let g = guard();
        assert!(!g.is_path_allowed("../AGENTS.md", PathOperation::Write));
        assert!(!g.is_path_allowed("%2e%2e/package.json", PathOperation::Read));
    }

    #[test]
    fn reads_skip_credentials() {
        let g = guard();
        assert!(g.is_path_allowed("package.json", PathOperation::Read));
        assert!(g.is_path_allowed("app/page.tsx", PathOperation::Read));
        assert!(!g.is_path_allowed(".env", PathOperation::Read));
        assert!(!g.is_path_allowed("config/.env.production", PathOperation::Read));
        assert!(!g.is_path_allowed("certs/server.pem", PathOperation::Read));
    }

    #[test]
    fn backslashes_are_normalised() {
        let g = guard();
        assert!(!g.is_path_allowed(".git\\config", PathOperation::Write));
        assert!(g.is_path_allowed("sub\\AGENTS.md", PathOperation::Write));
    }

    #[test]
    fn empty_path_is_denied() {
        assert!(!guard().is_path_allowed("", PathOperation::Read));
    }

    #[test]
    fn bad_glob_is_rejected() {
        let policy = PathPolicy {
            read_allow: vec!["[".into()],
            read_deny: vec![],
            write_allow: vec![],
            write_deny: vec![],
        };
        assert!(PathGuard::new(&policy).is_err());
    }
}
