use swc_core::{
    common::{sync::Lrc, BytePos, FileName, Globals, SourceMap, Span, GLOBALS},
    ecma::{
        ast::{EsVersion, Module},
        parser::{parse_file_as_module, Syntax},
    },
};
use tracing::instrument;

use crate::FederationError;

/// A parsed chunk, able to map swc spans back to byte offsets of its source.
#[derive(Debug)]
pub struct ParsedModule {
    pub module: Module,
    start_pos: BytePos,
}

impl ParsedModule {
    pub fn offset(&self, pos: BytePos) -> usize {
        (pos.0 - self.start_pos.0) as usize
    }

    pub fn range(&self, span: Span) -> (usize, usize) {
        (self.offset(span.lo), self.offset(span.hi))
    }
}

#[instrument(skip_all, fields(file = file_name))]
pub fn parse_module(source_code: &str, file_name: &str) -> Result<ParsedModule, FederationError> {
    let cm: Lrc<SourceMap> = Default::default();
    let fm = cm.new_source_file(FileName::Custom(file_name.to_string()), source_code.to_string());
    let mut recovered = vec![];
    let module = GLOBALS
        .set(&Globals::new(), || {
            parse_file_as_module(
                &fm,
                Syntax::Es(Default::default()),
                EsVersion::Es2022,
                None,
                &mut recovered,
            )
        })
        .map_err(|err| FederationError::Parse {
            file: file_name.to_string(),
            message: format!("{:?}", err.kind()),
        })?;
    if !recovered.is_empty() {
        tracing::trace!("recovered from {} syntax errors", recovered.len());
    }
    Ok(ParsedModule {
        module,
        start_pos: fm.start_pos,
    })
}
