use indexmap::IndexMap;
use swc_core::{
    common::{BytePos, Span},
    ecma::{
        ast::{CallExpr, Expr, ExprStmt, ImportDecl, ImportSpecifier, Lit, ModuleExportName},
        visit::{noop_visit_type, Visit, VisitWith},
    },
};

use crate::{basename, DYNAMIC_LOADING_CSS_PREFIX};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportBinding {
    Named { imported: String, local: String },
    Default { local: String },
    Namespace { local: String },
}

#[derive(Debug, Clone)]
pub struct SharedImport {
    pub span: Span,
    /// Shared module name the import resolves to.
    pub name: String,
    /// Specifier as written in the chunk.
    pub src: String,
    pub bindings: Vec<ImportBinding>,
}

/// Finds static imports of emitted shared chunks.
pub struct SharedImportScanner<'a> {
    shared_by_file_name: &'a IndexMap<&'a str, &'a str>,
    pub imports: Vec<SharedImport>,
    /// End of the last static import of any kind.
    pub last_import_end: Option<BytePos>,
}

impl<'a> SharedImportScanner<'a> {
    pub fn new(shared_by_file_name: &'a IndexMap<&'a str, &'a str>) -> Self {
        Self {
            shared_by_file_name,
            imports: vec![],
            last_import_end: None,
        }
    }
}

fn export_name(name: &ModuleExportName) -> String {
    match name {
        ModuleExportName::Ident(ident) => ident.sym.to_string(),
        ModuleExportName::Str(s) => s.value.to_string(),
    }
}

impl<'a> Visit for SharedImportScanner<'a> {
    noop_visit_type!();

    fn visit_import_decl(&mut self, node: &ImportDecl) {
        self.last_import_end = Some(
            self.last_import_end
                .map_or(node.span.hi, |end| end.max(node.span.hi)),
        );
        if node.type_only {
            return;
        }
        let src = node.src.value.to_string();
        let Some(name) = self.shared_by_file_name.get(basename(&src)) else {
            return;
        };
        let bindings = node
            .specifiers
            .iter()
            .map(|specifier| match specifier {
                ImportSpecifier::Named(named) => ImportBinding::Named {
                    imported: named
                        .imported
                        .as_ref()
                        .map(export_name)
                        .unwrap_or_else(|| named.local.sym.to_string()),
                    local: named.local.sym.to_string(),
                },
                ImportSpecifier::Default(default) => ImportBinding::Default {
                    local: default.local.sym.to_string(),
                },
                ImportSpecifier::Namespace(namespace) => ImportBinding::Namespace {
                    local: namespace.local.sym.to_string(),
                },
            })
            .collect();
        self.imports.push(SharedImport {
            span: node.span,
            name: name.to_string(),
            src,
            bindings,
        });
    }
}

#[derive(Debug, Clone)]
pub struct CssPlaceholder {
    /// Span of the string literal carrying the placeholder.
    pub literal: Span,
    /// Span to drop when no stylesheet pairs with the placeholder, and the
    /// text to leave in its place.
    pub removal: (Span, &'static str),
    /// Chunk path after the placeholder prefix, relative to the file
    /// carrying it and without a leading `./`.
    pub key: String,
}

/// Finds calls whose first argument is a CSS side-load placeholder.
#[derive(Debug, Default)]
pub struct CssPlaceholderScanner {
    pub placeholders: Vec<CssPlaceholder>,
}

impl CssPlaceholderScanner {
    fn placeholder_of(call: &CallExpr) -> Option<(Span, String)> {
        let arg = call.args.first()?;
        if arg.spread.is_some() {
            return None;
        }
        let Expr::Lit(Lit::Str(literal)) = arg.expr.as_ref() else {
            return None;
        };
        let value: &str = &literal.value;
        let (_, key) = value.split_once(DYNAMIC_LOADING_CSS_PREFIX)?;
        Some((
            literal.span,
            key.strip_prefix("./").unwrap_or(key).to_string(),
        ))
    }
}

impl Visit for CssPlaceholderScanner {
    noop_visit_type!();

    fn visit_expr_stmt(&mut self, node: &ExprStmt) {
        if let Expr::Call(call) = node.expr.as_ref() {
            if let Some((literal, key)) = Self::placeholder_of(call) {
                self.placeholders.push(CssPlaceholder {
                    literal,
                    removal: (node.span, ""),
                    key,
                });
                return;
            }
        }
        node.visit_children_with(self);
    }

    fn visit_call_expr(&mut self, node: &CallExpr) {
        if let Some((literal, key)) = Self::placeholder_of(node) {
            self.placeholders.push(CssPlaceholder {
                literal,
                removal: (node.span, "void 0"),
                key,
            });
            return;
        }
        node.visit_children_with(self);
    }
}
