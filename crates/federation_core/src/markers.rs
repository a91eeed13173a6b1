//! Names shared between the build output and the runtime of every
//! participant. They are part of the wire contract and must stay stable.

/// Prefix of the synthetic input that forces a distinct chunk per shared module.
pub const SHARED_INPUT_PREFIX: &str = "__rf_input__";

/// Virtual module id of the remote-entry helper.
pub const REMOTE_ENTRY_HELPER_ID: &str = "__remoteEntryHelper__";

pub const DYNAMIC_LOADING_CSS: &str = "dynamicLoadingCss";
pub const DYNAMIC_LOADING_CSS_PREFIX: &str = "__v__css__";

/// Local alias for `import()` inside the helper so the bundler leaves the load alone.
pub const IMPORT_ALIAS: &str = "__federation_import";

pub const FN_IMPORT: &str = "__rf_fn__import";
pub const VAR_GLOBAL: &str = "__rf_var__global";
pub const VAR_MODULE_MAP: &str = "__rf_var__moduleMap";

/// Property of `globalThis` holding the shared scope handed to `init`.
pub const VAR_SHARED: &str = "__rf_var__shared";

pub fn shared_input_name(name: &str) -> String {
    format!("{SHARED_INPUT_PREFIX}{name}")
}

/// Compile-time placeholder a host emits for an import of a shared module.
pub fn share_scope_token(name: &str) -> String {
    format!("__rf_shareScope__${{{name}}}")
}

pub fn expose_marker(public_name: &str) -> String {
    format!("__rf_shared__${{{public_name}}}")
}
