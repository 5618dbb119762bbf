use stache::{Template, Value};

fn render(template: &str, data: &Value) -> String {
    Template::compile(template)
        .expect("compile failed")
        .render(data)
        .expect("render failed")
}

#[test]
fn test_pure_text_renders_verbatim() {
    let data = Value::default();
    assert_eq!(render("", &data), "");
    assert_eq!(render("no tags here }} {", &data), "no tags here }} {");
    assert_eq!(render("line one\nline two\n", &data), "line one\nline two\n");
}

#[test]
fn test_variable_is_escaped() {
    let mut data = Value::default();
    data.set("x", "<b>\"&'");
    assert_eq!(render("{{x}}", &data), "&lt;b&gt;&quot;&amp;&apos;");
}

#[test]
fn test_unescaped_forms_are_verbatim() {
    let mut data = Value::default();
    data.set("x", "<b>\"&'");
    assert_eq!(render("{{{x}}}", &data), "<b>\"&'");
    assert_eq!(render("{{&x}}", &data), "<b>\"&'");
}

#[test]
fn test_missing_name_renders_empty() {
    let data = Value::default();
    assert_eq!(render("a{{missing}}b", &data), "ab");
    assert_eq!(render("a{{missing.deeper}}b", &data), "ab");
}

#[test]
fn test_dotted_lookup() {
    let mut c = Value::default();
    c.set("c", "ok");
    let mut b = Value::default();
    b.set("b", c);
    let mut data = Value::default();
    data.set("a", b);
    assert_eq!(render("{{a.b.c}}", &data), "ok");

    let mut flat = Value::default();
    flat.set("a", "x");
    assert_eq!(render("{{a.b}}", &flat), "");
}

#[test]
fn test_dotted_lookup_restarts_per_frame() {
    // The section frame resolves "a" but not "a.b"; the walk falls through
    // to the root frame and starts over from "a".
    let mut root_a = Value::default();
    root_a.set("b", "ok");
    let mut shadow = Value::default();
    shadow.set("a", Value::default());
    let mut data = Value::default();
    data.set("outer", shadow);
    data.set("a", root_a);
    assert_eq!(render("{{#outer}}{{a.b}}{{/outer}}", &data), "ok");
}

#[test]
fn test_section_over_list() {
    let mut data = Value::default();
    let mut xs = Value::list();
    for n in ["1", "2", "3"] {
        let mut item = Value::default();
        item.set("n", n);
        xs.append(item);
    }
    data.set("xs", xs);
    assert_eq!(render("{{#xs}}{{n}}{{/xs}}", &data), "123");
}

#[test]
fn test_section_over_falsy_values() {
    for falsy in [Value::Bool(false), Value::list()] {
        let mut data = Value::default();
        data.set("b", falsy);
        assert_eq!(render("{{#b}}Y{{/b}}", &data), "");
        assert_eq!(render("{{^b}}Y{{/b}}", &data), "Y");
    }
    let absent = Value::default();
    assert_eq!(render("{{#b}}Y{{/b}}", &absent), "");
    assert_eq!(render("{{^b}}Y{{/b}}", &absent), "Y");
}

#[test]
fn test_section_over_truthy_scalar() {
    let mut data = Value::default();
    data.set("b", true);
    assert_eq!(render("{{#b}}Y{{/b}}", &data), "Y");
    assert_eq!(render("{{^b}}Y{{/b}}", &data), "");
}

#[test]
fn test_section_pushes_object_frame() {
    let mut user = Value::default();
    user.set("name", "ana");
    let mut data = Value::default();
    data.set("user", user);
    data.set("site", "example");
    assert_eq!(
        render("{{#user}}{{name}}@{{site}}{{/user}}", &data),
        "ana@example"
    );
}

#[test]
fn test_implicit_iterator() {
    let mut data = Value::default();
    data.set("xs", Value::from(vec![Value::from("a"), Value::from("b")]));
    assert_eq!(render("{{#xs}}{{.}}{{/xs}}", &data), "ab");
}

#[test]
fn test_set_delimiter() {
    let mut data = Value::default();
    data.set("x", "v");
    assert_eq!(render("{{=<% %>=}}<%x%>", &data), "v");
    // Tags in the old style are literal text after the switch.
    assert_eq!(render("{{=<% %>=}}<%x%>{{x}}", &data), "v{{x}}");
}

#[test]
fn test_partial() {
    let mut data = Value::default();
    data.set("x", "z");
    data.set("p", Value::partial(|| "[{{x}}]".to_string()));
    assert_eq!(render("{{>p}}", &data), "[z]");
}

#[test]
fn test_partial_sees_current_context() {
    let mut item = Value::default();
    item.set("n", "7");
    let mut data = Value::default();
    data.set("xs", Value::from(vec![item]));
    data.set("row", Value::partial(|| "n={{n}};".to_string()));
    assert_eq!(render("{{#xs}}{{>row}}{{/xs}}", &data), "n=7;");
}

#[test]
fn test_variable_lambda_output_is_rendered() {
    let mut data = Value::default();
    data.set("x", "v");
    data.set("f", Value::lambda(|_: &str| "{{x}}!".to_string()));
    assert_eq!(render("{{f}}", &data), "v!");
}

#[test]
fn test_variable_lambda_result_is_escaped() {
    let mut data = Value::default();
    data.set("f", Value::lambda(|_: &str| "<raw>".to_string()));
    assert_eq!(render("{{f}}", &data), "&lt;raw&gt;");
    assert_eq!(render("{{&f}}", &data), "<raw>");
}

#[test]
fn test_variable_lambda_receives_empty_text() {
    let mut data = Value::default();
    data.set(
        "f",
        Value::lambda(|text: &str| format!("[{}]", text.len())),
    );
    assert_eq!(render("{{f}}", &data), "[0]");
}

#[test]
fn test_section_lambda_receives_verbatim_text() {
    let mut data = Value::default();
    data.set("n", "x");
    data.set(
        "f",
        Value::lambda(|text: &str| text.replace("{{", "[").replace("}}", "]")),
    );
    // The lambda sees the unrendered body, tags included.
    assert_eq!(render("{{#f}}hi {{n}}{{/f}}", &data), "hi [n]");
}

#[test]
fn test_section_lambda_output_renders_under_context() {
    let mut data = Value::default();
    data.set("name", "ana");
    data.set(
        "bold",
        Value::lambda(|text: &str| format!("<b>{}</b>", text)),
    );
    // The lambda result is parsed and rendered, and written unescaped.
    assert_eq!(
        render("{{#bold}}{{name}}{{/bold}}", &data),
        "<b>ana</b>"
    );
}

#[test]
fn test_section_lambda_parses_with_current_delimiters() {
    let mut data = Value::default();
    data.set("x", "v");
    data.set("f", Value::lambda(|text: &str| format!("{}!", text)));
    // The delimiter switch is in force when the lambda's output is parsed.
    assert_eq!(
        render("{{=<% %>=}}<%#f%><%x%><%/f%>", &data),
        "v!"
    );
}

#[test]
fn test_render_to_collects_chunks_in_order() {
    let mut data = Value::default();
    data.set("x", "mid");
    let template = Template::compile("a {{x}} z").unwrap();
    let mut chunks = Vec::new();
    template
        .render_to(&data, &mut |chunk| chunks.push(chunk.to_string()))
        .unwrap();
    assert_eq!(chunks.concat(), "a mid z");
    assert!(chunks.len() >= 3);
}

#[test]
fn test_render_to_writer() {
    let mut data = Value::default();
    data.set("x", "v");
    let template = Template::compile("[{{x}}]").unwrap();
    let mut sink = Vec::new();
    template.render_to_writer(&data, &mut sink).unwrap();
    assert_eq!(sink, b"[v]");
}

#[test]
fn test_idempotent_compile() {
    let source = "{{#xs}}{{.}},{{/xs}}{{^xs}}none{{/xs}}";
    let mut data = Value::default();
    data.set("xs", Value::from(vec![Value::from("a"), Value::from("b")]));
    let first = render(source, &data);
    let second = render(source, &data);
    assert_eq!(first, "a,b,");
    assert_eq!(first, second);
}

#[test]
fn test_repeated_render_of_one_template() {
    let template = Template::compile("{{=<% %>=}}<%x%>").unwrap();
    let mut data = Value::default();
    data.set("x", "v");
    // Delimiter state lives in the per-render context, not the tree.
    assert_eq!(template.render(&data).unwrap(), "v");
    assert_eq!(template.render(&data).unwrap(), "v");
}
