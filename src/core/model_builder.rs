use crate::core::{CardModel, CardTemplate, ConfigProvider, Field};
use crate::utils::ids::generate_unique_id;

pub const DEFAULT_MODEL_NAME: &str = "Modelo Básico";
pub const DEFAULT_TEMPLATE_NAME: &str = "Cartão 1";
pub const DEFAULT_FRONT_TEMPLATE: &str = "{{Frente}}";
pub const DEFAULT_BACK_TEMPLATE: &str = "{{Verso}}";
pub const DEFAULT_FIELDS: [&str; 2] = ["Frente", "Verso"];

pub const DEFAULT_CSS: &str = r#".card {
    font-family: Arial, sans-serif;
    font-size: 20px;
    text-align: left;
    color: #333;
    background-color: #f9f9f9;
    padding: 20px;
}
"#;

/// Factory for [`CardModel`]. Fields and templates fall back to a two-field
/// front/back layout unless overridden.
#[derive(Debug, Clone)]
pub struct ModelBuilder {
    name: String,
    front_template: String,
    back_template: String,
    template_name: String,
    css: String,
    fields: Option<Vec<Field>>,
    templates: Option<Vec<CardTemplate>>,
}

impl ModelBuilder {
    pub fn new(
        name: impl Into<String>,
        front_template: impl Into<String>,
        back_template: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            front_template: front_template.into(),
            back_template: back_template.into(),
            template_name: DEFAULT_TEMPLATE_NAME.to_string(),
            css: String::new(),
            fields: None,
            templates: None,
        }
    }

    pub fn template_name(mut self, name: impl Into<String>) -> Self {
        self.template_name = name.into();
        self
    }

    pub fn css(mut self, css: impl Into<String>) -> Self {
        self.css = css.into();
        self
    }

    pub fn fields(mut self, fields: Vec<Field>) -> Self {
        self.fields = Some(fields);
        self
    }

    /// Replaces the single template built from the front/back markup.
    pub fn templates(mut self, templates: Vec<CardTemplate>) -> Self {
        self.templates = Some(templates);
        self
    }

    pub fn build(self) -> CardModel {
        let fields = self
            .fields
            .unwrap_or_else(|| DEFAULT_FIELDS.iter().map(|name| Field::new(*name)).collect());

        let templates = self.templates.unwrap_or_else(|| {
            vec![CardTemplate {
                name: self.template_name,
                qfmt: self.front_template,
                afmt: self.back_template,
            }]
        });

        CardModel {
            id: generate_unique_id(),
            name: self.name,
            fields,
            templates,
            css: self.css,
        }
    }
}

/// Card model whose fields are named after the configured input columns.
pub fn build_model<C: ConfigProvider>(config: &C) -> CardModel {
    let model = ModelBuilder::new(
        config.model_name(),
        config.front_template(),
        config.back_template(),
    )
    .template_name(config.template_name())
    .fields(vec![
        Field::new(config.front_column()),
        Field::new(config.back_column()),
    ])
    .css(config.css())
    .build();

    tracing::debug!("Built card model '{}' (id {})", model.name, model.id);
    model
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::MockConfig;

    #[test]
    fn test_defaults_give_front_back_layout() {
        let model = ModelBuilder::new(DEFAULT_MODEL_NAME, DEFAULT_FRONT_TEMPLATE, DEFAULT_BACK_TEMPLATE)
            .css(DEFAULT_CSS)
            .build();

        let names: Vec<&str> = model.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Frente", "Verso"]);
        assert_eq!(model.templates.len(), 1);
        assert_eq!(model.templates[0].name, "Cartão 1");
        assert_eq!(model.templates[0].qfmt, "{{Frente}}");
        assert_eq!(model.templates[0].afmt, "{{Verso}}");
        assert!(model.css.contains(".card"));
        assert!((1i64 << 30..1i64 << 31).contains(&model.id));
    }

    #[test]
    fn test_overrides_replace_defaults() {
        let templates = vec![
            CardTemplate {
                name: "Forward".to_string(),
                qfmt: "{{Q}}".to_string(),
                afmt: "{{A}}".to_string(),
            },
            CardTemplate {
                name: "Reverse".to_string(),
                qfmt: "{{A}}".to_string(),
                afmt: "{{Q}}".to_string(),
            },
        ];

        let model = ModelBuilder::new("Custom", "ignored", "ignored")
            .fields(vec![Field::new("Q"), Field::new("A")])
            .templates(templates.clone())
            .build();

        assert_eq!(model.fields, vec![Field::new("Q"), Field::new("A")]);
        assert_eq!(model.templates, templates);
    }

    #[test]
    fn test_build_model_uses_configured_columns() {
        let model = build_model(&MockConfig::new());

        assert_eq!(model.name, "Test Model");
        assert_eq!(model.fields, vec![Field::new("Frente"), Field::new("Verso")]);
        assert_eq!(model.templates[0].name, "Card 1");
    }
}
