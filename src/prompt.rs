//! Prompt rendering backed by minijinja.
//!
//! Every route template is registered once, under the route's path, in an
//! `Environment` with auto-escaping disabled (prompts are plain text) and
//! strict undefined handling (an unbound placeholder is an error, never an
//! empty string). Substituted values are emitted as-is and never evaluated
//! as template source.

use std::collections::{BTreeMap, HashSet};

use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use thiserror::Error;

use crate::routes::PromptRoute;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Template engine error: {0}")]
    Engine(#[from] minijinja::Error),
}

impl TemplateError {
    /// Whether the failure was a placeholder with no bound value.
    pub fn is_unbound(&self) -> bool {
        match self {
            TemplateError::Engine(e) => e.kind() == minijinja::ErrorKind::UndefinedError,
        }
    }
}

/// The compiled prompt templates of a route table.
pub struct PromptEngine {
    env: Environment<'static>,
}

impl PromptEngine {
    /// Compile each route's template, named by its path.
    pub fn new(routes: &'static [PromptRoute]) -> Result<Self, TemplateError> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_undefined_behavior(UndefinedBehavior::Strict);

        for route in routes {
            env.add_template(route.path, route.template)?;
        }

        Ok(Self { env })
    }

    /// Render template `name` with `(placeholder, value)` pairs.
    pub fn render(&self, name: &str, values: &[(&str, &str)]) -> Result<String, TemplateError> {
        let ctx: BTreeMap<&str, &str> = values.iter().copied().collect();
        let template = self.env.get_template(name)?;
        Ok(template.render(ctx)?)
    }

    /// Variables template `name` reads from its context.
    pub fn placeholders(&self, name: &str) -> Result<HashSet<String>, TemplateError> {
        let template = self.env.get_template(name)?;
        Ok(template.undeclared_variables(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::{RouteMethod, ROUTES};

    static SAMPLE: &[PromptRoute] = &[
        PromptRoute {
            path: "/repeat",
            method: RouteMethod::Post,
            template: "{{ a }} and {{ a }}",
            bindings: &[],
            log_response: false,
        },
        PromptRoute {
            path: "/accented",
            method: RouteMethod::Post,
            template: "École {{ x }} — fin",
            bindings: &[],
            log_response: false,
        },
    ];

    #[test]
    fn test_render_substitutes_named_values() {
        let engine = PromptEngine::new(ROUTES).unwrap();
        let out = engine
            .render("/", &[("cycle", "early"), ("college_name", "Columbia University")])
            .unwrap();
        assert_eq!(out, "When is the early deadline for Columbia University");
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let engine = PromptEngine::new(ROUTES).unwrap();
        let out = engine
            .render("/ask-question", &[("question", "what is {{ name }} or {name}?")])
            .unwrap();
        assert_eq!(out, "what is {{ name }} or {name}?");
    }

    #[test]
    fn test_html_is_not_escaped() {
        let engine = PromptEngine::new(ROUTES).unwrap();
        let out = engine
            .render("/ask-question", &[("question", "<a href=\"x\">'&'</a>")])
            .unwrap();
        assert_eq!(out, "<a href=\"x\">'&'</a>");
    }

    #[test]
    fn test_repeated_placeholder() {
        let engine = PromptEngine::new(SAMPLE).unwrap();
        assert_eq!(engine.render("/repeat", &[("a", "x")]).unwrap(), "x and x");
        let names = engine.placeholders("/repeat").unwrap();
        assert_eq!(names, HashSet::from(["a".to_string()]));
    }

    #[test]
    fn test_unbound_placeholder_fails() {
        let engine = PromptEngine::new(ROUTES).unwrap();
        let err = engine.render("/get-how-reviewed", &[]).unwrap_err();
        assert!(err.is_unbound());
    }

    #[test]
    fn test_unknown_template_fails() {
        let engine = PromptEngine::new(ROUTES).unwrap();
        let err = engine.render("/nope", &[]).unwrap_err();
        assert!(!err.is_unbound());
    }

    #[test]
    fn test_malformed_template_rejected_at_build() {
        static BROKEN: &[PromptRoute] = &[PromptRoute {
            path: "/broken",
            method: RouteMethod::Get,
            template: "open {{ brace",
            bindings: &[],
            log_response: false,
        }];
        assert!(PromptEngine::new(BROKEN).is_err());
    }

    #[test]
    fn test_multibyte_text_preserved() {
        let engine = PromptEngine::new(SAMPLE).unwrap();
        assert_eq!(
            engine.render("/accented", &[("x", "été")]).unwrap(),
            "École été — fin"
        );
    }
}
