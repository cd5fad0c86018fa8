use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Placeholder(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub segments: Vec<Segment>,
}

impl Template {
    /// Replaces every placeholder found in `vars`; unknown placeholders are kept verbatim.
    pub fn render(&self, vars: &BTreeMap<String, String>) -> String {
        let mut out = String::new();
        for seg in &self.segments {
            match seg {
                Segment::Literal(l) => out.push_str(l),
                Segment::Placeholder(name) => match vars.get(name) {
                    Some(v) => out.push_str(v),
                    None => {
                        out.push_str("{{");
                        out.push_str(name);
                        out.push_str("}}");
                    }
                },
            }
        }
        out
    }

    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Placeholder(p) => Some(p.as_str()),
            Segment::Literal(_) => None,
        })
    }
}

/// Splits `input` into literal text and `{{ name }}` placeholders.
///
/// An unclosed `{{` and an empty `{{}}` are kept as literal text.
pub fn parse_template(input: &str) -> Template {
    let mut segments = Vec::new();
    let mut buf = String::new();
    let mut rest = input;

    while let Some(start) = rest.find("{{") {
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            break;
        };
        let name = after[..end].trim();
        if name.is_empty() {
            buf.push_str(&rest[..start + 2 + end + 2]);
            rest = &after[end + 2..];
            continue;
        }
        buf.push_str(&rest[..start]);
        if !buf.is_empty() {
            segments.push(Segment::Literal(std::mem::take(&mut buf)));
        }
        segments.push(Segment::Placeholder(name.to_string()));
        rest = &after[end + 2..];
    }

    buf.push_str(rest);
    if !buf.is_empty() {
        segments.push(Segment::Literal(buf));
    }

    Template { segments }
}

pub fn render_template(input: &str, vars: &BTreeMap<String, String>) -> String {
    if !input.contains("{{") {
        return input.to_string();
    }
    parse_template(input).render(vars)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars() -> BTreeMap<String, String> {
        let mut m = BTreeMap::new();
        m.insert("host".to_string(), "api.example.com".to_string());
        m.insert("token".to_string(), "abc123".to_string());
        m
    }

    #[test]
    fn renders_known_placeholders() {
        let out = render_template("https://{{host}}/me?t={{ token }}", &vars());
        assert_eq!(out, "https://api.example.com/me?t=abc123");
    }

    #[test]
    fn keeps_unknown_placeholders() {
        let out = render_template("Bearer {{missing}}", &vars());
        assert_eq!(out, "Bearer {{missing}}");
    }

    #[test]
    fn keeps_unclosed_and_empty_braces() {
        assert_eq!(render_template("a {{ b", &vars()), "a {{ b");
        assert_eq!(render_template("{{}}{{host}}", &vars()), "{{}}api.example.com");
    }

    #[test]
    fn json_bodies_survive() {
        let body = r#"{"token": "{{token}}", "nested": {"a": 1}}"#;
        assert_eq!(
            render_template(body, &vars()),
            r#"{"token": "abc123", "nested": {"a": 1}}"#
        );
    }

    #[test]
    fn lists_placeholders() {
        let tpl = parse_template("{{a}}-{{b}}");
        assert_eq!(tpl.placeholders().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
