use std::sync::{Arc, LazyLock};

use dashmap::DashMap;
use log::debug;

use crate::error::Result;
use crate::template::Template;

/// Compiled templates keyed by their source text. Parse failures are not
/// cached.
static TEMPLATE_CACHE: LazyLock<DashMap<String, Arc<Template>>> = LazyLock::new(DashMap::new);

pub(crate) fn get_template(source: &str) -> Result<Arc<Template>> {
    if let Some(hit) = TEMPLATE_CACHE.get(source) {
        return Ok(Arc::clone(hit.value()));
    }
    let template = Arc::new(Template::compile(source)?);
    debug!("compiled and cached template ({} bytes)", source.len());
    TEMPLATE_CACHE.insert(source.to_string(), Arc::clone(&template));
    Ok(template)
}
