//! Marker renderer: `{{#IF NAME}}...{{/IF}}` blocks and `{{NAME}}` tokens.
//!
//! Rendering runs in two passes over the template text:
//!
//! 1. Conditional blocks are lexed into [`Segment`]s and each block is kept
//!    (body only) or dropped. Blocks never nest: a start marker inside an
//!    open block is plain body text.
//! 2. Placeholders are substituted in a single forward scan. Substituted
//!    text is never rescanned and unknown names stay verbatim.

use primer_core::{
    application::ports::TemplateRenderer,
    domain::Variables,
};
use tracing::{instrument, trace};

const OPEN: &str = "{{";
const CLOSE: &str = "}}";
const IF_START: &str = "{{#IF";
const IF_END: &str = "{{/IF}}";

/// One lexed piece of a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    Block { condition: &'a str, body: &'a str },
}

/// Split `template` into text and conditional blocks.
///
/// Malformed start markers and start markers with no matching end marker
/// are left in the text. Stray end markers are text too.
pub fn segments(template: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut text_start = 0;
    let mut cursor = 0;

    while let Some(found) = template[cursor..].find(IF_START) {
        let start = cursor + found;
        let after_keyword = start + IF_START.len();

        let Some((condition, open_end)) = parse_condition(template, after_keyword) else {
            cursor = after_keyword;
            continue;
        };
        let Some(close) = template[open_end..].find(IF_END).map(|i| open_end + i) else {
            cursor = open_end;
            continue;
        };

        if start > text_start {
            out.push(Segment::Text(&template[text_start..start]));
        }
        out.push(Segment::Block {
            condition,
            body: &template[open_end..close],
        });
        cursor = close + IF_END.len();
        text_start = cursor;
    }

    if text_start < template.len() {
        out.push(Segment::Text(&template[text_start..]));
    }
    out
}

/// Parse ` NAME}}` following `{{#IF`. Returns the name and the index just
/// past the closing braces.
fn parse_condition(template: &str, from: usize) -> Option<(&str, usize)> {
    let rest = &template[from..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let close = rest.find(CLOSE)?;
    let name = rest[..close].trim();
    Variables::is_valid_name(name).then_some((name, from + close + CLOSE.len()))
}

/// First pass: resolve conditional blocks.
pub fn resolve_blocks(template: &str, variables: &Variables) -> String {
    let mut out = String::with_capacity(template.len());
    for segment in segments(template) {
        match segment {
            Segment::Text(text) => out.push_str(text),
            Segment::Block { condition, body } => {
                if variables.is_truthy(condition) {
                    out.push_str(body);
                } else {
                    trace!(condition, "Dropping block");
                }
            }
        }
    }
    out
}

/// Second pass: replace `{{NAME}}` with the variable's text.
pub fn substitute(text: &str, variables: &Variables) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find(OPEN) {
        out.push_str(&rest[..open]);
        let token = &rest[open..];
        let inner_start = OPEN.len();

        let replacement = token[inner_start..].find(CLOSE).and_then(|close| {
            let name = &token[inner_start..inner_start + close];
            let value = variables.get(name).filter(|_| Variables::is_valid_name(name))?;
            Some((value.to_text(), inner_start + close + CLOSE.len()))
        });

        match replacement {
            Some((value, consumed)) => {
                out.push_str(&value);
                rest = &token[consumed..];
            }
            None => {
                out.push_str(OPEN);
                rest = &token[inner_start..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Renderer for `{{NAME}}` placeholders and `{{#IF NAME}}` blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkerRenderer;

impl MarkerRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl TemplateRenderer for MarkerRenderer {
    #[instrument(skip_all, fields(len = template.len(), variables = variables.len()))]
    fn render(&self, template: &str, variables: &Variables) -> String {
        substitute(&resolve_blocks(template, variables), variables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use primer_core::domain::Value;

    fn vars(pairs: &[(&str, Value)]) -> Variables {
        let mut v = Variables::new();
        for (name, value) in pairs {
            v.try_set(*name, value.clone()).unwrap();
        }
        v
    }

    fn render(template: &str, variables: &Variables) -> String {
        MarkerRenderer::new().render(template, variables)
    }

    #[test]
    fn text_without_markers_is_unchanged() {
        let vars = vars(&[("NAME", Value::from("demo"))]);
        for t in ["", "plain text", "# Heading\n\n- a\n- b\n", "{ single } braces"] {
            assert_eq!(render(t, &vars), t);
        }
    }

    #[test]
    fn substitutes_known_names() {
        let vars = vars(&[
            ("NAME", Value::from("demo")),
            ("PORT", Value::from(5173u16)),
            ("CONFIDENCE", Value::from(0.95)),
            ("SSR", Value::from(true)),
            ("DEPS", Value::List(vec!["a (1)".into(), "b (2)".into()])),
            ("ROUTER", Value::Null),
        ]);
        assert_eq!(
            render(
                "{{NAME}}:{{PORT}}:{{CONFIDENCE}}:{{SSR}}:{{DEPS}}:[{{ROUTER}}]",
                &vars
            ),
            "demo:5173:0.95:true:a (1), b (2):[]"
        );
    }

    #[test]
    fn unknown_names_stay_verbatim() {
        let vars = vars(&[("NAME", Value::from("demo"))]);
        assert_eq!(render("{{NAME}} {{OTHER}}", &vars), "demo {{OTHER}}");
        assert_eq!(render("{{ not a name }}", &vars), "{{ not a name }}");
    }

    #[test]
    fn substituted_text_is_not_rescanned() {
        let vars = vars(&[
            ("A", Value::from("{{B}}")),
            ("B", Value::from("nope")),
        ]);
        assert_eq!(render("{{A}}", &vars), "{{B}}");
    }

    #[test]
    fn blocks_follow_truthiness() {
        let template = "a{{#IF X}}[kept]{{/IF}}b";
        let cases = [
            (Value::from(true), true),
            (Value::from("yes"), true),
            (Value::from(1u16), true),
            (Value::List(vec![]), true),
            (Value::from(false), false),
            (Value::from(""), false),
            (Value::from("false"), false),
            (Value::from(0.0), false),
            (Value::Null, false),
        ];
        for (value, kept) in cases {
            let out = render(template, &vars(&[("X", value.clone())]));
            let expected = if kept { "a[kept]b" } else { "ab" };
            assert_eq!(out, expected, "value {:?}", value);
        }
        assert_eq!(render(template, &Variables::new()), "ab");
    }

    #[test]
    fn dropped_block_leaves_surrounding_text_intact() {
        let vars = vars(&[("OFF", Value::from(false))]);
        let before = "# Title\n\nIntro.\n";
        let after = "\n## Next\n";
        let t = format!("{before}{{{{#IF OFF}}}}\nsecret stuff {{{{NAME}}}}\n{{{{/IF}}}}{after}");
        assert_eq!(render(&t, &vars), format!("{before}{after}"));
    }

    #[test]
    fn kept_block_substitutes_inside() {
        let vars = vars(&[("ON", Value::from(true)), ("NAME", Value::from("demo"))]);
        assert_eq!(render("{{#IF ON}}Hi {{NAME}}{{/IF}}", &vars), "Hi demo");
    }

    #[test]
    fn blocks_do_not_nest() {
        let vars = vars(&[("A", Value::from(true)), ("B", Value::from(false))]);
        // The inner start marker is body text and the first end marker closes A.
        assert_eq!(
            render("{{#IF A}}x{{#IF B}}y{{/IF}}z{{/IF}}", &vars),
            "x{{#IF B}}yz{{/IF}}"
        );
    }

    #[test]
    fn unmatched_markers_are_literal() {
        let vars = vars(&[("A", Value::from(true))]);
        assert_eq!(render("{{#IF A}} never closed", &vars), "{{#IF A}} never closed");
        assert_eq!(render("stray {{/IF}} end", &vars), "stray {{/IF}} end");
        assert_eq!(render("{{#IF}}x{{/IF}}", &vars), "{{#IF}}x{{/IF}}");
    }

    #[test]
    fn rendering_is_idempotent_for_plain_values() {
        let vars = vars(&[
            ("NAME", Value::from("demo")),
            ("SSR", Value::from(true)),
            ("OFF", Value::Null),
        ]);
        let template = "# {{NAME}}\n{{#IF SSR}}SSR on{{/IF}}{{#IF OFF}}off{{/IF}} {{UNKNOWN}}\n";
        let once = render(template, &vars);
        assert_eq!(render(&once, &vars), once);
    }

    #[test]
    fn segments_expose_blocks() {
        let segs = segments("a{{#IF X}}b{{/IF}}c");
        assert_eq!(
            segs,
            vec![
                Segment::Text("a"),
                Segment::Block { condition: "X", body: "b" },
                Segment::Text("c"),
            ]
        );
    }
}
