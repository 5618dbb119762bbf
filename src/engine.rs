use crate::cache;
use crate::error::Result;
use crate::value::Value;

/// Render `source` against `data` in one call, compiling through a
/// process-wide cache so repeated renders of the same source skip the
/// parser.
pub fn render_template(source: &str, data: &Value) -> Result<String> {
    let template = cache::get_template(source)?;
    template.render(data)
}
