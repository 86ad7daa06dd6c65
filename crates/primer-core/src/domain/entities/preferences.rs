//! User preferences and their merge into the placeholder mapping.

use serde::{Deserialize, Serialize};

use super::descriptor::ProjectDescriptor;
use super::variables::{Value, Variables};
use crate::domain::value_objects::{CodeStyle, Focus};

/// What the user asked for on top of what the scanner found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Falls back to "A <Framework> project".
    pub description: Option<String>,
    pub code_style: CodeStyle,
    /// Replaces the scanned dependency list when set.
    pub dependencies_override: Option<Vec<String>>,
    pub generate_secondary: bool,
    pub focus: Focus,
    /// Arbitrary variables, merged after everything else.
    pub extra: Variables,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            description: None,
            code_style: CodeStyle::default(),
            dependencies_override: None,
            generate_secondary: true,
            focus: Focus::default(),
            extra: Variables::new(),
        }
    }
}

impl Preferences {
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_code_style(mut self, style: CodeStyle) -> Self {
        self.code_style = style;
        self
    }

    pub fn with_focus(mut self, focus: Focus) -> Self {
        self.focus = focus;
        self
    }

    pub fn with_dependencies(mut self, deps: Vec<String>) -> Self {
        self.dependencies_override = Some(deps);
        self
    }

    pub fn with_secondary(mut self, generate: bool) -> Self {
        self.generate_secondary = generate;
        self
    }

    pub fn with_extra(mut self, extra: Variables) -> Self {
        self.extra = extra;
        self
    }

    /// Description used when none was given.
    pub fn default_description(descriptor: &ProjectDescriptor) -> String {
        match &descriptor.framework.name {
            Some(name) => format!("A {} project", name),
            None => "A software project".to_string(),
        }
    }

    /// Overlay these preferences on `variables`. Pure; the input is not
    /// modified.
    pub fn merge_into(&self, variables: &Variables, descriptor: &ProjectDescriptor) -> Variables {
        let mut merged = variables.clone();

        let description = self
            .description
            .clone()
            .unwrap_or_else(|| Self::default_description(descriptor));
        merged.set("PROJECT_DESCRIPTION", description);

        merged.set("CODE_STYLE", self.code_style.as_str());
        merged.set("STYLE_FUNCTIONAL", self.code_style == CodeStyle::Functional);
        merged.set("STYLE_OOP", self.code_style == CodeStyle::Oop);
        merged.set("STYLE_MIXED", self.code_style == CodeStyle::Mixed);

        merged.set("FOCUS", self.focus.as_str());
        merged.set("FOCUS_SECURITY", self.focus == Focus::Security);
        merged.set("FOCUS_PERFORMANCE", self.focus == Focus::Performance);
        merged.set("FOCUS_ACCESSIBILITY", self.focus == Focus::Accessibility);

        merged.set("GENERATE_SECONDARY", self.generate_secondary);

        if let Some(deps) = &self.dependencies_override {
            merged.set("DEPENDENCIES", Value::String(deps.join(", ")));
        }

        merged.extend(&self.extra);
        merged
    }
}
