use anyhow::Context;
use handlebars::Handlebars;
use serde_json::Value;

/// The compiled templates of one alert.
///
/// String fields register directly; structured fields are serialized to
/// YAML text first, so `{{field}}` expansions can sit anywhere inside the
/// structure, and the rendered text is re-parsed afterwards. Strict mode
/// makes a reference to an absent context field a render error.
#[derive(Debug)]
pub struct TemplateSet {
    registry: Handlebars<'static>,
}

impl TemplateSet {
    pub fn new() -> Self {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        // templates produce yaml and urls, not html
        registry.register_escape_fn(handlebars::no_escape);
        Self { registry }
    }

    pub fn add_string(&mut self, name: &str, template: &str) -> anyhow::Result<()> {
        self.registry
            .register_template_string(name, template)
            .with_context(|| format!("compiling template {name:?}"))?;
        Ok(())
    }

    /// Registers a structured field by serializing it to YAML text.
    pub fn add_value(&mut self, name: &str, value: &Value) -> anyhow::Result<()> {
        let text = serde_yaml::to_string(value)
            .with_context(|| format!("serializing template {name:?}"))?;
        self.add_string(name, &text)
    }

    pub fn render(&self, name: &str, ctx: &Value) -> anyhow::Result<String> {
        self.registry
            .render(name, ctx)
            .with_context(|| format!("rendering template {name:?}"))
    }

    /// Renders a structured field and re-parses it. The YAML round trip
    /// guarantees string keys at every level of the result.
    pub fn render_value(&self, name: &str, ctx: &Value) -> anyhow::Result<Value> {
        let text = self.render(name, ctx)?;
        serde_yaml::from_str(&text)
            .with_context(|| format!("re-parsing rendered template {name:?}"))
    }
}

impl Default for TemplateSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renders_fields_from_the_context() {
        let mut set = TemplateSet::new();
        set.add_string("greeting", "hello {{name}}").unwrap();
        let out = set.render("greeting", &json!({"name": "world"})).unwrap();
        assert_eq!(out, "hello world");
    }

    #[test]
    fn absent_fields_are_render_errors() {
        let mut set = TemplateSet::new();
        set.add_string("broken", "{{missing}}").unwrap();
        assert!(set.render("broken", &json!({"name": "x"})).is_err());
    }

    #[test]
    fn structured_values_round_trip_with_expansions() {
        let mut set = TemplateSet::new();
        set.add_value(
            "search",
            &json!({"query": {"query_string": {"query": "level:{{level}}"}}}),
        )
        .unwrap();

        let out = set
            .render_value("search", &json!({"level": "error"}))
            .unwrap();
        assert_eq!(
            out,
            json!({"query": {"query_string": {"query": "level:error"}}})
        );
    }

    #[test]
    fn rendered_output_is_not_html_escaped() {
        let mut set = TemplateSet::new();
        set.add_string("url", "http://x/{{q}}").unwrap();
        let out = set.render("url", &json!({"q": "a&b=c"})).unwrap();
        assert_eq!(out, "http://x/a&b=c");
    }
}
