use swc_core::ecma::visit::VisitWith;
use tracing::instrument;

use crate::{
    js_string, parse_module, relative_specifier, resolve_specifier, BuildSession,
    CssPlaceholderScanner, FederationError, Output, OutputBundle, SourcePatcher,
};

/// Stylesheet path as `dynamicLoadingCss` expects it: relative to the
/// directory of the remote entry, without a leading `./`.
fn css_href(remote_entry: &str, css_file: &str) -> String {
    let relative = relative_specifier(remote_entry, css_file);
    if let Some(inside) = relative.strip_prefix("./") {
        return inside.to_string();
    }
    relative
}

pub fn rewrite_css_placeholders(session: &BuildSession, code: &str, file_name: &str) -> Result<String, FederationError> {
    let parsed = parse_module(code, file_name)?;
    let mut scanner = CssPlaceholderScanner::default();
    parsed.module.visit_with(&mut scanner);
    if scanner.placeholders.is_empty() {
        return Ok(code.to_string());
    }

    let mut patcher = SourcePatcher::new(code);
    for placeholder in &scanner.placeholders {
        // Placeholders carry the chunk path relative to the remote entry.
        let chunk_key = resolve_specifier(file_name, &placeholder.key);
        match session.module_css.get(&chunk_key) {
            Some(css_file) => {
                let (start, end) = parsed.range(placeholder.literal);
                patcher.overwrite(start, end, js_string(&css_href(file_name, css_file)));
            }
            None => {
                tracing::trace!("no stylesheet for {}", chunk_key);
                let (span, replacement) = placeholder.removal;
                let (start, end) = parsed.range(span);
                patcher.overwrite(start, end, replacement);
            }
        }
    }
    patcher.finish()
}

/// Points every CSS side-load in the remote entry at its stylesheet, or drops it.
#[instrument(skip_all)]
pub fn rewrite_css_side_loads(session: &BuildSession, bundle: &mut OutputBundle) {
    let Some(remote_entry) = &session.remote_entry else {
        return;
    };
    let Some(chunk) = bundle.get_mut(remote_entry).and_then(Output::as_chunk_mut) else {
        return;
    };
    match rewrite_css_placeholders(session, &chunk.code, remote_entry) {
        Ok(code) => chunk.code = code,
        Err(err) => tracing::error!("skip css rewrite for {}: {}", remote_entry, err),
    }
}
