// src/mock/template.rs
//! Mock class template
//!
//! Renders a [`ResolvedEntity`] into a mock class:
//!
//! ```text
//! class StoreMock: Store {
//!     init() {}
//!
//!     var countSetCallCount = 0
//!     var count: Int = 0 { didSet { countSetCallCount += 1 } }
//!
//!     var resetCallCount = 0
//!     var resetHandler: (() -> ())?
//!     func reset() {
//!         resetCallCount += 1
//!         if let resetHandler = resetHandler {
//!             resetHandler()
//!         }
//!     }
//! }
//! ```

use crate::mock::defaults::{capitalize_first_letter, default_value};
use crate::mock::entity::{Member, Param, ResolvedEntity};
use crate::model::{RenderResult, Renderer};
use crate::utils::errors::RenderError;
use std::collections::HashMap;

const INDENT: &str = "    ";

/// Renders resolved protocol entities into mock classes
#[derive(Debug, Clone, Default)]
pub struct MockRenderer;

impl MockRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render `entity` as a mock conforming to `key`, named after `encloser`.
    ///
    /// Returns an empty string when there is nothing to mock.
    pub fn render_mock(
        &self,
        entity: &ResolvedEntity,
        key: &str,
        encloser: &str,
    ) -> Result<String, RenderError> {
        if key.trim().is_empty() || encloser.trim().is_empty() {
            return Err(RenderError::new(format!(
                "entity at offset {} has no name",
                entity.model.offset
            )));
        }

        let members = entity.all_members();
        if members.is_empty() {
            return Ok(String::new());
        }

        let mut name_counts: HashMap<&str, usize> = HashMap::new();
        for member in members.iter().copied() {
            if let Member::Method { name, .. } = member {
                *name_counts.entry(name.as_str()).or_default() += 1;
            }
        }

        let mut blocks = vec![format!("{}init() {{}}", INDENT)];
        for member in members {
            let block = match member {
                Member::Variable {
                    name,
                    type_name,
                    is_static,
                } => render_variable(name, type_name, *is_static),
                Member::Method {
                    name,
                    params,
                    return_type,
                    is_static,
                } => {
                    let overloaded = name_counts.get(name.as_str()).copied().unwrap_or(0) > 1;
                    let handler_base = if overloaded {
                        overload_name(name, params)
                    } else {
                        name.clone()
                    };
                    render_method(
                        name,
                        &handler_base,
                        params,
                        return_type.as_deref(),
                        *is_static,
                    )
                }
            };
            blocks.push(block);
        }

        Ok(format!(
            "class {}Mock: {} {{\n{}\n}}\n",
            encloser,
            key,
            blocks.join("\n\n")
        ))
    }
}

impl Renderer<ResolvedEntity> for MockRenderer {
    fn render(&self, entity: &ResolvedEntity) -> Result<RenderResult, RenderError> {
        let text = self.render_mock(entity, &entity.key, &entity.model.name)?;
        Ok(RenderResult::new(text, entity.model.offset))
    }
}

fn static_prefix(is_static: bool) -> &'static str {
    if is_static {
        "static "
    } else {
        ""
    }
}

/// `load(id:)` and `load(url:)` get handlers `loadId` and `loadUrl`
fn overload_name(name: &str, params: &[Param]) -> String {
    let suffix: String = params
        .iter()
        .map(|p| capitalize_first_letter(&p.label))
        .collect();
    format!("{}{}", name, suffix)
}

fn render_variable(name: &str, type_name: &str, is_static: bool) -> String {
    let prefix = static_prefix(is_static);
    let declaration = match default_value(type_name) {
        Some(value) => format!("{}var {}: {} = {}", prefix, name, type_name, value),
        None => format!("{}var {}: {}!", prefix, name, type_name),
    };

    [
        format!("{}{}var {}SetCallCount = 0", INDENT, prefix, name),
        format!(
            "{}{} {{ didSet {{ {}SetCallCount += 1 }} }}",
            INDENT, declaration, name
        ),
    ]
    .join("\n")
}

fn render_method(
    name: &str,
    handler_base: &str,
    params: &[Param],
    return_type: Option<&str>,
    is_static: bool,
) -> String {
    let prefix = static_prefix(is_static);
    let call_count = format!("{}CallCount", handler_base);
    let handler = format!("{}Handler", handler_base);

    let param_types: Vec<&str> = params.iter().map(|p| p.type_name.as_str()).collect();
    let param_decls: Vec<String> = params
        .iter()
        .map(|p| format!("{}: {}", p.label, p.type_name))
        .collect();
    let args: Vec<&str> = params.iter().map(|p| p.label.as_str()).collect();

    let signature = match return_type {
        Some(ret) => format!("{}func {}({}) -> {}", prefix, name, param_decls.join(", "), ret),
        None => format!("{}func {}({})", prefix, name, param_decls.join(", ")),
    };

    let mut lines = vec![
        format!("{}{}var {} = 0", INDENT, prefix, call_count),
        format!(
            "{}{}var {}: (({}) -> ({}))?",
            INDENT,
            prefix,
            handler,
            param_types.join(", "),
            return_type.unwrap_or("")
        ),
        format!("{}{} {{", INDENT, signature),
        format!("{0}{0}{1} += 1", INDENT, call_count),
        format!("{0}{0}if let {1} = {1} {{", INDENT, handler),
    ];

    let invocation = format!("{}({})", handler, args.join(", "));
    match return_type {
        Some(ret) => {
            lines.push(format!("{0}{0}{0}return {1}", INDENT, invocation));
            lines.push(format!("{0}{0}}}", INDENT));
            match default_value(ret) {
                Some(value) => lines.push(format!("{0}{0}return {1}", INDENT, value)),
                None => lines.push(format!(
                    "{0}{0}fatalError(\"{1} returns can't have a default value thus its handler must be set\")",
                    INDENT, handler
                )),
            }
        }
        None => {
            lines.push(format!("{0}{0}{0}{1}", INDENT, invocation));
            lines.push(format!("{0}{0}}}", INDENT));
        }
    }
    lines.push(format!("{}}}", INDENT));

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::entity::EntityModel;

    fn store() -> ResolvedEntity {
        ResolvedEntity::new(
            EntityModel::new("Store", 120)
                .with_member(Member::variable("count", "Int"))
                .with_member(Member::method("reset", vec![], None)),
        )
    }

    #[test]
    fn test_render_store() {
        let result = MockRenderer::new().render(&store()).unwrap();
        let expected = "\
class StoreMock: Store {
    init() {}

    var countSetCallCount = 0
    var count: Int = 0 { didSet { countSetCallCount += 1 } }

    var resetCallCount = 0
    var resetHandler: (() -> ())?
    func reset() {
        resetCallCount += 1
        if let resetHandler = resetHandler {
            resetHandler()
        }
    }
}
";
        assert_eq!(result.text, expected);
        assert_eq!(result.position, 120);
    }

    #[test]
    fn test_method_with_return_value() {
        let entity = ResolvedEntity::new(EntityModel::new("Fetcher", 0).with_member(
            Member::method("fetch", vec![Param::new("id", "String")], Some("Int")),
        ));

        let text = MockRenderer::new().render(&entity).unwrap().text;
        assert!(text.contains("var fetchHandler: ((String) -> (Int))?"));
        assert!(text.contains("func fetch(id: String) -> Int {"));
        assert!(text.contains("return fetchHandler(id)"));
        assert!(text.contains("        return 0"));
    }

    #[test]
    fn test_unknown_return_type_requires_handler() {
        let entity = ResolvedEntity::new(
            EntityModel::new("Factory", 0)
                .with_member(Member::method("make", vec![], Some("Widget"))),
        );

        let text = MockRenderer::new().render(&entity).unwrap().text;
        assert!(text.contains("fatalError(\"makeHandler returns can't have a default value"));
    }

    #[test]
    fn test_static_and_unknown_variable() {
        let entity = ResolvedEntity::new(
            EntityModel::new("Env", 0)
                .with_member(Member::variable("current", "Env").into_static()),
        );

        let text = MockRenderer::new().render(&entity).unwrap().text;
        assert!(text.contains("    static var currentSetCallCount = 0"));
        assert!(text.contains("    static var current: Env! { didSet"));
    }

    #[test]
    fn test_overloads_get_distinct_handlers() {
        let entity = ResolvedEntity::new(
            EntityModel::new("Loader", 0)
                .with_member(Member::method("load", vec![Param::new("id", "String")], None))
                .with_member(Member::method("load", vec![Param::new("url", "URL")], None)),
        );

        let text = MockRenderer::new().render(&entity).unwrap().text;
        assert!(text.contains("var loadIdHandler: ((String) -> ())?"));
        assert!(text.contains("var loadUrlHandler: ((URL) -> ())?"));
    }

    #[test]
    fn test_inherited_members_rendered() {
        let entity = store().with_inherited(vec![Member::variable("name", "String?")]);

        let text = MockRenderer::new().render(&entity).unwrap().text;
        assert!(text.contains("var name: String? = nil"));
    }

    #[test]
    fn test_key_and_encloser() {
        let entity = store().with_key("Storing");
        let text = MockRenderer::new().render(&entity).unwrap().text;
        assert!(text.starts_with("class StoreMock: Storing {"));
    }

    #[test]
    fn test_no_members_renders_empty() {
        let entity = ResolvedEntity::new(EntityModel::new("Marker", 64));
        let result = MockRenderer::new().render(&entity).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.position, 64);
    }

    #[test]
    fn test_missing_name_is_an_error() {
        let entity = ResolvedEntity::new(EntityModel::new("", 8));
        assert!(MockRenderer::new().render(&entity).is_err());
    }
}
