//! Minimal mustache-style template engine
//!
//! Supports `{{path}}` variables with dotted-path lookup, `{{this}}`
//! inside loops, `{{#if path}} … {{else}} … {{/if}}` conditionals, and
//! `{{#each path}} … {{/each}}` loops. Templates are compiled by a small
//! recursive-descent parser over a fixed token set, so blocks nest
//! correctly. This is a deliberate behavior change from the portal's
//! historical engine, whose chained-regex substitution could not handle
//! nested blocks.

use miette::Diagnostic;
use serde_json::Value;
use thiserror::Error;

/// Errors raised while compiling a template
#[derive(Debug, Error, Diagnostic)]
pub enum TemplateError {
    #[error("unterminated '{{{{' tag at byte {0}")]
    #[diagnostic(code(plaza::template::unterminated))]
    UnterminatedTag(usize),

    #[error("{0} without a matching open block")]
    #[diagnostic(code(plaza::template::unexpected_close))]
    UnexpectedClose(String),

    #[error("unclosed block: {0}")]
    #[diagnostic(code(plaza::template::unclosed_block))]
    UnclosedBlock(String),
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Text(String),
    Var(String),
    IfOpen(String),
    Else,
    IfClose,
    EachOpen(String),
    EachClose,
}

#[derive(Debug, Clone)]
enum Node {
    Text(String),
    Var(String),
    If {
        path: String,
        then_body: Vec<Node>,
        else_body: Vec<Node>,
    },
    Each {
        path: String,
        body: Vec<Node>,
    },
}

/// A compiled template
#[derive(Debug, Clone)]
pub struct Template {
    nodes: Vec<Node>,
}

impl Template {
    /// Compile template source
    pub fn compile(source: &str) -> Result<Self, TemplateError> {
        let tokens = lex(source)?;
        let mut position = 0;
        let nodes = parse_block(&tokens, &mut position, None)?;
        Ok(Self { nodes })
    }

    /// Render against a data context
    pub fn render(&self, data: &Value) -> String {
        let mut out = String::new();
        render_nodes(&self.nodes, data, &mut out);
        out
    }
}

/// Compile and render in one step
pub fn render_str(source: &str, data: &Value) -> Result<String, TemplateError> {
    Ok(Template::compile(source)?.render(data))
}

fn lex(source: &str) -> Result<Vec<Token>, TemplateError> {
    let mut tokens = Vec::new();
    let mut rest = source;
    let mut consumed = 0;

    while let Some(open) = rest.find("{{") {
        if open > 0 {
            tokens.push(Token::Text(rest[..open].to_string()));
        }
        let after_open = &rest[open + 2..];
        let close = after_open
            .find("}}")
            .ok_or(TemplateError::UnterminatedTag(consumed + open))?;

        let inner = after_open[..close].trim();
        tokens.push(classify(inner));

        consumed += open + 2 + close + 2;
        rest = &after_open[close + 2..];
    }

    if !rest.is_empty() {
        tokens.push(Token::Text(rest.to_string()));
    }

    Ok(tokens)
}

fn classify(inner: &str) -> Token {
    if let Some(path) = inner.strip_prefix("#if ") {
        Token::IfOpen(path.trim().to_string())
    } else if let Some(path) = inner.strip_prefix("#each ") {
        Token::EachOpen(path.trim().to_string())
    } else if inner == "else" {
        Token::Else
    } else if inner == "/if" {
        Token::IfClose
    } else if inner == "/each" {
        Token::EachClose
    } else {
        Token::Var(inner.to_string())
    }
}

/// What a nested parse is waiting for
#[derive(Debug, Clone, Copy, PartialEq)]
enum Terminator {
    IfArm,
    Each,
}

/// Parse nodes until the expected terminator (or end of input at the top
/// level). Leaves the terminator token unconsumed for the caller.
fn parse_block(
    tokens: &[Token],
    position: &mut usize,
    terminator: Option<Terminator>,
) -> Result<Vec<Node>, TemplateError> {
    let mut nodes = Vec::new();

    while *position < tokens.len() {
        match &tokens[*position] {
            Token::Text(text) => {
                nodes.push(Node::Text(text.clone()));
                *position += 1;
            }
            Token::Var(path) => {
                nodes.push(Node::Var(path.clone()));
                *position += 1;
            }
            Token::IfOpen(path) => {
                *position += 1;
                let then_body = parse_block(tokens, position, Some(Terminator::IfArm))?;
                let mut else_body = Vec::new();
                if matches!(tokens.get(*position), Some(Token::Else)) {
                    *position += 1;
                    else_body = parse_block(tokens, position, Some(Terminator::IfArm))?;
                }
                match tokens.get(*position) {
                    Some(Token::IfClose) => *position += 1,
                    _ => return Err(TemplateError::UnclosedBlock(format!("{{{{#if {}}}}}", path))),
                }
                nodes.push(Node::If {
                    path: path.clone(),
                    then_body,
                    else_body,
                });
            }
            Token::EachOpen(path) => {
                *position += 1;
                let body = parse_block(tokens, position, Some(Terminator::Each))?;
                match tokens.get(*position) {
                    Some(Token::EachClose) => *position += 1,
                    _ => {
                        return Err(TemplateError::UnclosedBlock(format!(
                            "{{{{#each {}}}}}",
                            path
                        )))
                    }
                }
                nodes.push(Node::Each {
                    path: path.clone(),
                    body,
                });
            }
            Token::Else | Token::IfClose => {
                if terminator == Some(Terminator::IfArm) {
                    return Ok(nodes);
                }
                return Err(TemplateError::UnexpectedClose(
                    describe(&tokens[*position]).to_string(),
                ));
            }
            Token::EachClose => {
                if terminator == Some(Terminator::Each) {
                    return Ok(nodes);
                }
                return Err(TemplateError::UnexpectedClose("{{/each}}".to_string()));
            }
        }
    }

    match terminator {
        None => Ok(nodes),
        Some(Terminator::IfArm) => Err(TemplateError::UnclosedBlock("{{#if}}".to_string())),
        Some(Terminator::Each) => Err(TemplateError::UnclosedBlock("{{#each}}".to_string())),
    }
}

fn describe(token: &Token) -> &'static str {
    match token {
        Token::Else => "{{else}}",
        Token::IfClose => "{{/if}}",
        Token::EachClose => "{{/each}}",
        _ => "token",
    }
}

fn render_nodes(nodes: &[Node], scope: &Value, out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Var(path) => out.push_str(&stringify(lookup(scope, path).as_ref())),
            Node::If {
                path,
                then_body,
                else_body,
            } => {
                if is_truthy(lookup(scope, path).as_ref()) {
                    render_nodes(then_body, scope, out);
                } else {
                    render_nodes(else_body, scope, out);
                }
            }
            Node::Each { path, body } => {
                if let Some(Value::Array(items)) = lookup(scope, path) {
                    for item in &items {
                        render_nodes(body, item, out);
                    }
                }
            }
        }
    }
}

/// Dotted-path lookup over the scope. `this` refers to the scope itself,
/// and a trailing `length` segment resolves to the element count on
/// arrays.
fn lookup(scope: &Value, path: &str) -> Option<Value> {
    let segments: Vec<&str> = path.split('.').collect();
    let mut current = scope;

    for (index, segment) in segments.iter().enumerate() {
        if *segment == "this" {
            continue;
        }
        match current {
            Value::Object(map) => current = map.get(*segment)?,
            Value::Array(items) if *segment == "length" && index == segments.len() - 1 => {
                return Some(Value::from(items.len()));
            }
            _ => return None,
        }
    }

    Some(current.clone())
}

fn stringify(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(Value::Bool(flag)) => flag.to_string(),
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| stringify(Some(item)))
            .collect::<Vec<_>>()
            .join(","),
        Some(Value::Object(_)) => String::new(),
    }
}

fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(text)) => !text.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(_)) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_variable_substitution() {
        let data = json!({"metadata": {"title": "Población"}});
        let html = render_str("<h1>{{metadata.title}}</h1>", &data).unwrap();
        assert_eq!(html, "<h1>Población</h1>");
    }

    #[test]
    fn test_missing_variable_renders_empty() {
        let data = json!({});
        let html = render_str("[{{nope.nothing}}]", &data).unwrap();
        assert_eq!(html, "[]");
    }

    #[test]
    fn test_conditional_true_and_false() {
        let tpl = "{{#if visualization}}chart{{/if}}";
        assert_eq!(
            render_str(tpl, &json!({"visualization": {"type": "bar"}})).unwrap(),
            "chart"
        );
        assert_eq!(render_str(tpl, &json!({})).unwrap(), "");
    }

    #[test]
    fn test_conditional_else() {
        let tpl = "{{#if results.length}}hits{{else}}none{{/if}}";
        assert_eq!(render_str(tpl, &json!({"results": [1]})).unwrap(), "hits");
        assert_eq!(render_str(tpl, &json!({"results": []})).unwrap(), "none");
    }

    #[test]
    fn test_each_loop_with_this() {
        let data = json!({"tags": ["a", "b", "c"]});
        let html = render_str("{{#each tags}}<i>{{this}}</i>{{/each}}", &data).unwrap();
        assert_eq!(html, "<i>a</i><i>b</i><i>c</i>");
    }

    #[test]
    fn test_each_loop_item_fields() {
        let data = json!({"rows": [{"n": 1}, {"n": 2}]});
        let html = render_str("{{#each rows}}{{n}};{{/each}}", &data).unwrap();
        assert_eq!(html, "1;2;");
    }

    #[test]
    fn test_nested_blocks() {
        // the historical regex engine got this wrong; nesting must work
        let data = json!({
            "datasets": [
                {"title": "A", "tags": ["x", "y"]},
                {"title": "B", "tags": []}
            ]
        });
        let tpl = "{{#each datasets}}{{title}}:{{#if tags}}{{#each tags}}{{this}}.{{/each}}{{else}}-{{/if}} {{/each}}";
        let html = render_str(tpl, &data).unwrap();
        assert_eq!(html, "A:x.y. B:- ");
    }

    #[test]
    fn test_unterminated_tag() {
        let err = Template::compile("hello {{name").unwrap_err();
        assert!(matches!(err, TemplateError::UnterminatedTag(_)));
    }

    #[test]
    fn test_unclosed_block() {
        let err = Template::compile("{{#if a}}body").unwrap_err();
        assert!(matches!(err, TemplateError::UnclosedBlock(_)));
    }

    #[test]
    fn test_unexpected_close() {
        let err = Template::compile("body{{/if}}").unwrap_err();
        assert!(matches!(err, TemplateError::UnexpectedClose(_)));
    }

    #[test]
    fn test_array_length_lookup() {
        let data = json!({"results": [1, 2, 3]});
        assert_eq!(
            render_str("{{results.length}} resultados", &data).unwrap(),
            "3 resultados"
        );
    }

    #[test]
    fn test_array_stringifies_joined() {
        let data = json!({"tags": ["a", "b"]});
        assert_eq!(render_str("{{tags}}", &data).unwrap(), "a,b");
    }
}
