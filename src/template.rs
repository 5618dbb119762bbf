use std::io::Write;

use crate::ast::Component;
use crate::context::Context;
use crate::delim::DelimiterSet;
use crate::error::Result;
use crate::parser;
use crate::render;
use crate::value::Value;

/// A compiled template: parse once with [`Template::compile`], render any
/// number of times. The parsed tree is immutable after compilation, so a
/// `Template` can be shared across threads; each render call builds its own
/// context over the data it is given.
#[derive(Debug, Clone)]
pub struct Template {
    root: Component,
}

impl Template {
    /// Parse `source` into a render-ready tree. The first malformed
    /// construct aborts the parse; the error message names the byte offset
    /// of the offending tag.
    pub fn compile(source: &str) -> Result<Template> {
        let mut delims = DelimiterSet::default();
        let root = parser::parse(source, &mut delims)?;
        Ok(Template { root })
    }

    /// Render against `data`, collecting the output into a `String`.
    pub fn render(&self, data: &Value) -> Result<String> {
        let mut out = String::new();
        self.render_to(data, &mut |chunk| out.push_str(chunk))?;
        Ok(out)
    }

    /// Render against `data`, handing output chunks to `out` in order.
    pub fn render_to(&self, data: &Value, out: &mut dyn FnMut(&str)) -> Result<()> {
        let mut ctx = Context::new(data);
        render::render_children(&self.root.children, &mut ctx, out)
    }

    /// Render against `data` into an `io::Write` sink. Sink failures stop
    /// the render and surface as [`crate::TemplateError::Io`].
    pub fn render_to_writer<W: Write>(&self, data: &Value, writer: &mut W) -> Result<()> {
        let mut io_error = None;
        self.render_to(data, &mut |chunk| {
            if io_error.is_none()
                && let Err(e) = writer.write_all(chunk.as_bytes())
            {
                io_error = Some(e);
            }
        })?;
        match io_error {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }
}
