//! jq pre-filter applied to each input document before matching.
use anyhow::{anyhow, Context, Result};
use jaq_core::{load, Compiler, Ctx, RcIter};
use jaq_json::Val;
use serde_json::Value;

/// Run `filter_src` over `input`; every jq output becomes one document.
pub fn run_jaq(filter_src: &str, input: &Value) -> Result<Vec<Value>> {
    let loader = load::Loader::new(jaq_std::defs().chain(jaq_json::defs()));
    let arena = load::Arena::default();
    let program = load::File { code: filter_src, path: () };

    let modules = loader
        .load(&arena, program)
        .map_err(|errs| format_load_errors("parse", errs))?;

    let filter = Compiler::default()
        .with_funs(jaq_std::funs().chain(jaq_json::funs()))
        .compile(modules)
        .map_err(|errs| format_load_errors("compile", errs))?;

    let inputs = RcIter::new(core::iter::empty());
    let mut it = filter.run((Ctx::new([], &inputs), Val::from(input.clone())));

    let mut out = Vec::new();
    while let Some(item) = it.next() {
        let v = item.map_err(|e| anyhow!("jq `{filter_src}` failed on document: {e:?}"))?;
        // Val: Display -> JSON text
        let text = format!("{v}");
        let value = serde_json::from_str::<Value>(&text)
            .with_context(|| format!("jq produced non-JSON output: {text}"))?;
        out.push(value);
    }
    log::debug!("jq `{filter_src}` produced {} document(s)", out.len());
    Ok(out)
}

// Loader and compiler both report per-file error lists; only the payload differs.
fn format_load_errors<E: std::fmt::Debug>(
    stage: &str,
    errs: Vec<(load::File<&str, ()>, E)>,
) -> anyhow::Error {
    let detail = errs
        .iter()
        .map(|(file, err)| format!("{stage} error in `{}`: {err:?}", file.code))
        .collect::<Vec<_>>()
        .join("\n");
    anyhow!(detail)
}
