use crate::ast::{Component, TagKind};
use crate::context::Context;
use crate::delim::DelimiterSet;
use crate::error::Result;
use crate::parser;
use crate::text;
use crate::value::{Lambda, Value};

/// Render a sequence of sibling components in order. Section components own
/// their bodies, so this never descends into children itself.
pub(crate) fn render_children(
    children: &[Component],
    ctx: &mut Context<'_>,
    out: &mut dyn FnMut(&str),
) -> Result<()> {
    for comp in children {
        render_component(comp, ctx, out)?;
    }
    Ok(())
}

fn render_component(
    comp: &Component,
    ctx: &mut Context<'_>,
    out: &mut dyn FnMut(&str),
) -> Result<()> {
    if comp.is_text() {
        out(&comp.text);
        return Ok(());
    }

    match comp.tag.kind {
        TagKind::Variable | TagKind::UnescapedVariable => {
            let escaped = comp.tag.kind == TagKind::Variable;
            match ctx.get(&comp.tag.name) {
                Some(Value::Str(s)) => {
                    if escaped {
                        out(&text::escape(s));
                    } else {
                        out(s);
                    }
                }
                Some(Value::Lambda(lambda)) => {
                    render_lambda(lambda, "", false, escaped, ctx, out)?;
                }
                _ => {}
            }
        }
        TagKind::SectionBegin => match ctx.get(&comp.tag.name) {
            Some(Value::Lambda(lambda)) => {
                let section_text = comp.tag.section_text.as_deref().unwrap_or("");
                render_lambda(lambda, section_text, true, false, ctx, out)?;
            }
            Some(var) if var.is_false() || var.is_empty_list() => {}
            Some(Value::List(items)) => {
                for item in items {
                    ctx.with_frame(item, |ctx| render_children(&comp.children, ctx, out))?;
                }
            }
            Some(var) => {
                ctx.with_frame(var, |ctx| render_children(&comp.children, ctx, out))?;
            }
            None => {}
        },
        TagKind::SectionBeginInverted => {
            let absent_or_falsy = match ctx.get(&comp.tag.name) {
                None => true,
                Some(var) => var.is_false() || var.is_empty_list(),
            };
            if absent_or_falsy {
                render_children(&comp.children, ctx, out)?;
            }
        }
        TagKind::Partial => {
            if let Some(Value::Partial(partial)) = ctx.get_partial(&comp.tag.name) {
                let source = partial.call();
                let mut delims = DelimiterSet::default();
                let sub = parser::parse(&source, &mut delims)?;
                render_children(&sub.children, ctx, out)?;
            }
        }
        TagKind::SetDelimiter => {
            if let Some(delims) = &comp.tag.delimiters {
                ctx.delimiters = delims.clone();
            }
        }
        TagKind::Comment | TagKind::SectionEnd | TagKind::Invalid => {}
    }
    Ok(())
}

/// Call a lambda, parse its output as a template and render that under the
/// current context. Section lambdas parse under the context's current
/// markers (set-delimiter tags in the output stick); variable lambdas
/// always parse under the defaults and the whole result is escaped when
/// the variable form asks for it.
fn render_lambda(
    lambda: &Lambda,
    text_arg: &str,
    use_context_delims: bool,
    escaped: bool,
    ctx: &mut Context<'_>,
    out: &mut dyn FnMut(&str),
) -> Result<()> {
    let produced = lambda.call(text_arg);
    let sub = if use_context_delims {
        parser::parse(&produced, &mut ctx.delimiters)?
    } else {
        let mut delims = DelimiterSet::default();
        parser::parse(&produced, &mut delims)?
    };
    let mut buf = String::new();
    render_children(&sub.children, ctx, &mut |chunk| buf.push_str(chunk))?;
    if escaped {
        out(&text::escape(&buf));
    } else {
        out(&buf);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_str(template: &str, data: &Value) -> String {
        let mut delims = DelimiterSet::default();
        let root = parser::parse(template, &mut delims).expect("parse failed");
        let mut ctx = Context::new(data);
        let mut buf = String::new();
        render_children(&root.children, &mut ctx, &mut |chunk| buf.push_str(chunk))
            .expect("render failed");
        buf
    }

    #[test]
    fn test_comment_renders_nothing() {
        assert_eq!(render_str("a{{! ignored }}b", &Value::default()), "ab");
    }

    #[test]
    fn test_non_string_variable_renders_nothing() {
        let mut data = Value::default();
        data.set("flag", true);
        data.set("obj", Value::default());
        assert_eq!(render_str("[{{flag}}{{obj}}]", &data), "[]");
    }

    #[test]
    fn test_section_skips_descent_into_skipped_body() {
        let mut data = Value::default();
        data.set("off", false);
        data.set("x", "visible");
        assert_eq!(render_str("{{#off}}{{x}}{{/off}}done", &data), "done");
    }
}
